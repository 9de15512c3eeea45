use raycrawl::collection::Collection;
use raycrawl::frame::Frame;
use raycrawl::map::{default_maze_path, GridCatalog};
use raycrawl::minimap::Minimap;
use raycrawl::motion::{Intent, Intents, MotionLoops};
use raycrawl::pose::Pose;
use raycrawl::render::Renderer;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator};
use sdl2::video::WindowContext;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// helper trait to convert strings into std::error types
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

// initial dimensions of screen
const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

const TARGET_FPS: u64 = 60;

// where the player starts on every grid
const SPAWN: (f32, f32) = (1., 1.);

fn intent_for(key: Keycode) -> Option<Intent> {
    match key {
        Keycode::W => Some(Intent::Forward),
        Keycode::S => Some(Intent::Backward),
        Keycode::A => Some(Intent::StrafeLeft),
        Keycode::D => Some(Intent::StrafeRight),
        Keycode::Left => Some(Intent::TurnLeft),
        Keycode::Right => Some(Intent::TurnRight),
        _ => None,
    }
}

fn streaming_texture(
    creator: &TextureCreator<WindowContext>,
    (width, height): (u32, u32),
) -> anyhow::Result<Texture<'_>> {
    Ok(creator.create_texture_streaming(PixelFormatEnum::ARGB8888, width.max(1), height.max(1))?)
}

/// copy the software frame into an ARGB8888 streaming texture of the same size
fn upload(texture: &mut Texture, frame: &Frame) -> anyhow::Result<()> {
    let row_bytes = frame.width() * 4;
    let mut pixels = frame.pixels();
    texture
        .with_lock(None, |buf: &mut [u8], pitch: usize| {
            for line in buf.chunks_mut(pitch).take(frame.height()) {
                for (dst, px) in line[..row_bytes].chunks_exact_mut(4).zip(&mut pixels) {
                    dst.copy_from_slice(&px.to_argb().to_ne_bytes());
                }
            }
        })
        .ah()
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("RAYCRAWL_LOG");

    let maze_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_maze_path);

    log::info!("loading grids");
    let catalog = Arc::new(GridCatalog::with_defaults(&maze_path)?);
    let active = Arc::new(AtomicUsize::new(GridCatalog::MAZE));
    let pose = Arc::new(Pose::new(SPAWN.0, SPAWN.1, 0.));
    let intents = Arc::new(Intents::default());

    // sdl boilerplate
    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    log::info!("initializing video");
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let window = video
        .window("raycrawl", WIDTH, HEIGHT)
        .position_centered()
        .resizable()
        .build()?;
    log::info!("creating canvas");
    let mut canvas = window.into_canvas().build()?;
    let texture_creator = canvas.texture_creator();
    log::info!("pumping events");
    let mut events = sdl_ctx.event_pump().ah()?;

    log::info!("starting motion loops");
    let mut motion = MotionLoops::spawn(
        Arc::clone(&pose),
        Arc::clone(&catalog),
        Arc::clone(&active),
        Arc::clone(&intents),
    )?;

    let mut collection = Collection::test_objects();
    let mut renderer = Renderer::default();
    let mut minimap = Minimap::new();

    let mut size = canvas.output_size().ah()?;
    let mut frame = Frame::new(size.0 as usize, size.1 as usize);
    let mut texture = streaming_texture(&texture_creator, size)?;
    minimap.handle_parent_resize(size.0 as i32, size.1 as i32);

    let delta = Duration::from_millis(1_000 / TARGET_FPS);

    'main_loop: loop {
        let prev = Instant::now();

        // handle events
        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(Keycode::Tab),
                    repeat: false,
                    ..
                } => {
                    let next = (active.load(Ordering::Relaxed) + 1) % catalog.len();
                    active.store(next, Ordering::Relaxed);
                    pose.reset(SPAWN.0, SPAWN.1, pose.heading_deg());
                    log::debug!("switched to grid {next}");
                }
                Event::KeyDown {
                    keycode: Some(k), ..
                } => {
                    if let Some(intent) = intent_for(k) {
                        intents.set(intent, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(intent) = intent_for(k) {
                        intents.set(intent, false);
                    }
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    minimap.click(x, y);
                }
                _ => {}
            }
        }

        let output = canvas.output_size().ah()?;
        if output != size {
            log::debug!("window resized to {}x{}", output.0, output.1);
            size = output;
            frame.resize(size.0 as usize, size.1 as usize);
            texture = streaming_texture(&texture_creator, size)?;
            minimap.handle_parent_resize(size.0 as i32, size.1 as i32);
        }

        let id = active.load(Ordering::Relaxed);
        let Some(grid) = catalog.get(id) else {
            anyhow::bail!("no grid with id {id}");
        };
        let snapshot = pose.snapshot();
        minimap.set_state(grid, snapshot);
        collection.handle_pickups(grid, &snapshot);

        // draw game
        if renderer.render_frame(&mut frame, grid, &snapshot, collection.world_objects()) {
            minimap.draw(&mut frame);
            upload(&mut texture, &frame)?;
            canvas.copy(&texture, None, None).ah()?;
            canvas.present();
        }

        let diff = prev.elapsed();
        if diff < delta {
            std::thread::sleep(delta - diff);
        }
    }

    motion.stop();
    let names = collection
        .bag()
        .map(|object| object.name.as_str())
        .collect::<Vec<_>>();
    log::info!("collected {} item(s): {}", names.len(), names.join(", "));

    Ok(())
}
