use crate::map::GridCatalog;
use crate::pose::Pose;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// world units per second
pub const MOVE_SPEED: f32 = 3.;
/// degrees per second
pub const ROTATE_SPEED: f32 = 90.;
/// pause between motion loop iterations
pub const TICK: Duration = Duration::from_millis(10);

/// Held-key state written by the input handler and polled by the motion loops.
#[derive(Default)]
pub struct Intents {
    forward: AtomicBool,
    backward: AtomicBool,
    strafe_left: AtomicBool,
    strafe_right: AtomicBool,
    turn_left: AtomicBool,
    turn_right: AtomicBool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
}

impl Intents {
    fn flag(&self, intent: Intent) -> &AtomicBool {
        match intent {
            Intent::Forward => &self.forward,
            Intent::Backward => &self.backward,
            Intent::StrafeLeft => &self.strafe_left,
            Intent::StrafeRight => &self.strafe_right,
            Intent::TurnLeft => &self.turn_left,
            Intent::TurnRight => &self.turn_right,
        }
    }

    pub fn set(&self, intent: Intent, held: bool) {
        self.flag(intent).store(held, Ordering::Relaxed)
    }

    pub fn is_held(&self, intent: Intent) -> bool {
        self.flag(intent).load(Ordering::Relaxed)
    }

    /// (forward, strafe) movement for `dt` seconds
    pub fn movement(&self, dt: f32) -> (f32, f32) {
        let forward = self.axis(Intent::Forward) - self.axis(Intent::Backward);
        let strafe = self.axis(Intent::StrafeRight) - self.axis(Intent::StrafeLeft);
        (forward * MOVE_SPEED * dt, strafe * MOVE_SPEED * dt)
    }

    /// heading change in degrees for `dt` seconds
    pub fn rotation(&self, dt: f32) -> f32 {
        (self.axis(Intent::TurnRight) - self.axis(Intent::TurnLeft)) * ROTATE_SPEED * dt
    }

    fn axis(&self, intent: Intent) -> f32 {
        if self.is_held(intent) {
            1.
        } else {
            0.
        }
    }
}

/// Apply one movement tick against the active grid.
pub fn movement_tick(
    pose: &Pose,
    catalog: &GridCatalog,
    active: &AtomicUsize,
    intents: &Intents,
    dt: f32,
) -> bool {
    let (forward, strafe) = intents.movement(dt);
    if forward == 0. && strafe == 0. {
        return false;
    }
    let Some(grid) = catalog.get(active.load(Ordering::Relaxed)) else {
        return false;
    };
    pose.step(grid, forward, strafe)
}

/// Apply one rotation tick.
pub fn rotation_tick(pose: &Pose, intents: &Intents, dt: f32) -> bool {
    let delta = intents.rotation(dt);
    if delta == 0. {
        return false;
    }
    pose.rotate(delta);
    true
}

/// Movement and rotation threads. Both stop and are joined on drop.
pub struct MotionLoops {
    running: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl MotionLoops {
    pub fn spawn(
        pose: Arc<Pose>,
        catalog: Arc<GridCatalog>,
        active: Arc<AtomicUsize>,
        intents: Arc<Intents>,
    ) -> anyhow::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let mut handles = Vec::with_capacity(2);

        handles.push(spawn_loop("move-loop", &running, {
            let (pose, intents) = (Arc::clone(&pose), Arc::clone(&intents));
            move |dt| {
                movement_tick(&pose, &catalog, &active, &intents, dt);
            }
        })?);
        handles.push(spawn_loop("rotate-loop", &running, move |dt| {
            rotation_tick(&pose, &intents, dt);
        })?);

        log::debug!("motion loops started");
        Ok(Self { running, handles })
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                log::error!("motion loop panicked");
            }
        }
    }
}

impl Drop for MotionLoops {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_loop(
    name: &str,
    running: &Arc<AtomicBool>,
    mut tick: impl FnMut(f32) + Send + 'static,
) -> anyhow::Result<JoinHandle<()>> {
    let running = Arc::clone(running);
    let handle = std::thread::Builder::new()
        .name(name.into())
        .spawn(move || {
            let mut last = Instant::now();
            while running.load(Ordering::Relaxed) {
                let now = Instant::now();
                tick((now - last).as_secs_f32());
                last = now;
                std::thread::sleep(TICK);
            }
        })?;
    Ok(handle)
}
