use crate::color::Color;
use tiny_skia::{
    ColorU8, FillRule, Mask, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8, Stroke,
    Transform,
};

/// Integer screen rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.w).min(other.x + other.w);
        let y1 = (self.y + self.h).min(other.y + other.h);
        Rect::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }

    fn to_skia(self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }
}

/// Software render target backed by a tiny-skia pixmap.
///
/// Shapes go through tiny-skia paths without anti-aliasing, so a pixel is
/// covered exactly when its centre is inside. Wall and object columns take a
/// direct-write fast path. Everything clips against the frame and the
/// optional clip rectangle.
pub struct Frame {
    width: usize,
    height: usize,
    /// `None` while either dimension is zero
    pixmap: Option<Pixmap>,
    clip: Option<Rect>,
    clip_mask: Option<Mask>,
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = false;
    paint
}

fn premultiplied(color: Color) -> PremultipliedColorU8 {
    ColorU8::from_rgba(color.r, color.g, color.b, color.a).premultiply()
}

fn polygon_path(points: &[(i32, i32)]) -> Option<Path> {
    let (&(x0, y0), rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x0 as f32, y0 as f32);
    for &(x, y) in rest {
        pb.line_to(x as f32, y as f32);
    }
    pb.close();
    pb.finish()
}

fn rounded_rect_path(rect: Rect, radius: f32) -> Option<Path> {
    let (x, y, w, h) = (rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32);
    let rad = radius.min(w / 2.).min(h / 2.);

    let mut pb = PathBuilder::new();
    pb.move_to(x + rad, y);
    pb.line_to(x + w - rad, y);
    pb.quad_to(x + w, y, x + w, y + rad);
    pb.line_to(x + w, y + h - rad);
    pb.quad_to(x + w, y + h, x + w - rad, y + h);
    pb.line_to(x + rad, y + h);
    pb.quad_to(x, y + h, x, y + h - rad);
    pb.line_to(x, y + rad);
    pb.quad_to(x, y, x + rad, y);
    pb.close();
    pb.finish()
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        let mut this = Self {
            width,
            height,
            pixmap: Pixmap::new(width as u32, height as u32),
            clip: None,
            clip_mask: None,
        };
        this.clear(Color::BLACK);
        this
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    /// every pixel in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixmap
            .iter()
            .flat_map(|pixmap| pixmap.pixels().iter())
            .map(|px| {
                let c = px.demultiply();
                Color::rgba(c.red(), c.green(), c.blue(), c.alpha())
            })
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        let pixmap = self.pixmap.as_ref()?;
        let c = pixmap.pixel(x as u32, y as u32)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// reallocate only if the dimensions changed
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            *self = Self::new(width, height);
        }
    }

    /// fill the whole frame, ignoring the clip and the colour's alpha
    pub fn clear(&mut self, color: Color) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
        }
    }

    pub fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
        self.clip_mask = clip.and_then(|rect| {
            let mut mask = Mask::new(self.width as u32, self.height as u32)?;
            let path = PathBuilder::from_rect(rect.intersect(&self.full()).to_skia()?);
            mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
            Some(mask)
        });
    }

    fn full(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn bounds(&self) -> Rect {
        match self.clip {
            Some(clip) => self.full().intersect(&clip),
            None => self.full(),
        }
    }

    fn fill_path(&mut self, path: &Path, color: Color, rule: FillRule) {
        if self.clip.is_some() && self.clip_mask.is_none() {
            // clip rectangle entirely off the frame
            return;
        }
        if let Some(pixmap) = &mut self.pixmap {
            let mask = self.clip_mask.as_ref();
            pixmap.fill_path(path, &paint(color), rule, Transform::identity(), mask);
        }
    }

    /// Vertical line from `y0` to `y1`, both inclusive.
    ///
    /// Opaque colours are written straight into the pixmap.
    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Color) {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        if !color.is_opaque() {
            return self.fill_rect(Rect::new(x, lo, 1, hi - lo + 1), color);
        }

        let b = self.bounds();
        let width = self.width;
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        if b.is_empty() || x < b.x || x >= b.x + b.w {
            return;
        }
        let px = premultiplied(color);
        let pixels = pixmap.pixels_mut();
        for y in lo.max(b.y)..=hi.min(b.y + b.h - 1) {
            pixels[y as usize * width + x as usize] = px;
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some(r) = rect.to_skia() {
            self.fill_path(&PathBuilder::from_rect(r), color, FillRule::Winding);
        }
    }

    /// filled rectangle with rounded corners of the given radius
    pub fn fill_round_rect(&mut self, rect: Rect, radius: i32, color: Color) {
        if rect.is_empty() {
            return;
        }
        if let Some(path) = rounded_rect_path(rect, radius.max(0) as f32) {
            self.fill_path(&path, color, FillRule::Winding);
        }
    }

    /// Even-odd fill. Fewer than three vertices draws nothing.
    pub fn fill_polygon(&mut self, points: &[(i32, i32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        if let Some(path) = polygon_path(points) {
            self.fill_path(&path, color, FillRule::EvenOdd);
        }
    }

    /// one pixel wide closed outline
    pub fn stroke_polygon(&mut self, points: &[(i32, i32)], color: Color) {
        if self.clip.is_some() && self.clip_mask.is_none() {
            return;
        }
        let Some(path) = polygon_path(points) else {
            return;
        };
        if let Some(pixmap) = &mut self.pixmap {
            let stroke = Stroke {
                width: 1.,
                ..Stroke::default()
            };
            let mask = self.clip_mask.as_ref();
            pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), mask);
        }
    }
}
