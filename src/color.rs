/// 8-bit RGBA color. Alpha is only honored when filling shapes on a [`Frame`](crate::frame::Frame).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const LIGHT_GRAY: Self = Self::rgb(192, 192, 192);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// darken by `factor`, which is clamped to [0, 1]
    pub fn shade(self, factor: f32) -> Self {
        self.scale(factor.clamp(0., 1.))
    }

    /// multiply every channel by `factor`, truncating and clamping to [0, 255]
    pub fn scale(self, factor: f32) -> Self {
        let channel = |c: u8| (c as f32 * factor).clamp(0., 255.) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// pack as 0xAARRGGBB, the layout of an SDL ARGB8888 texture
    #[inline]
    pub fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}
