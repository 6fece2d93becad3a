/// RGBA color packed into a single `u32` as `0xRRGGBBAA`.
///
/// Runs carry one packed color each, so the value is kept `Copy` and cheap to
/// compare. Channels are 8-bit; float constructors clamp and round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    pub const BLACK: Self = Self(0x0000_00FF);
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Packs four 8-bit channels.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    /// Packs four channels given in `0.0..=1.0`. Out of range values are clamped.
    pub fn from_rgba_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        fn channel(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::from_rgba8(channel(r), channel(g), channel(b), channel(a))
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Returns the same color with its alpha channel replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self(self.0 & 0xFFFF_FF00 | a as u32)
    }

    /// Returns `true` when the alpha channel is fully opaque.
    pub const fn is_opaque(self) -> bool {
        self.a() == u8::MAX
    }

    /// Unpacks into `[r, g, b, a]` floats in `0.0..=1.0`.
    pub fn to_f32_array(self) -> [f32; 4] {
        [self.r(), self.g(), self.b(), self.a()].map(|c| c as f32 / 255.0)
    }
}

impl From<PackedColor> for [f32; 4] {
    fn from(color: PackedColor) -> Self {
        color.to_f32_array()
    }
}

impl From<[u8; 4]> for PackedColor {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::from_rgba8(r, g, b, a)
    }
}
