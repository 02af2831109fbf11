//! RGBA color type used for region fills, edges, markers and text.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque gray from a lightness fraction in `[0.0, 1.0]`
    /// (0.0 = black, 1.0 = white).
    #[must_use]
    pub fn gray(level: f64) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(v, v, v)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - t) + f64::from(y) * t) as u8;

        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::TRANSPARENT.a, 0);
    }

    #[test]
    fn test_gray_levels() {
        assert_eq!(Rgba::gray(0.0), Rgba::BLACK);
        assert_eq!(Rgba::gray(1.0), Rgba::WHITE);
        let mid = Rgba::gray(0.5);
        assert_eq!(mid.r, mid.g);
        assert_eq!(mid.g, mid.b);
        assert!(mid.r > 120 && mid.r < 135);
    }

    #[test]
    fn test_gray_clamps_out_of_range() {
        assert_eq!(Rgba::gray(-1.0), Rgba::BLACK);
        assert_eq!(Rgba::gray(2.0), Rgba::WHITE);
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid.r, 127);
        assert_eq!(mid.g, 127);
        assert_eq!(mid.b, 127);
    }

    #[test]
    fn test_lerp_boundaries_and_clamping() {
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 0.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 1.0), Rgba::WHITE);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, -0.5), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 1.5), Rgba::WHITE);
    }

    #[test]
    fn test_with_alpha() {
        let c = Rgba::rgb(10, 20, 30).with_alpha(128);
        assert_eq!(c.a, 128);
        assert_eq!(c.r, 10);
    }
}
