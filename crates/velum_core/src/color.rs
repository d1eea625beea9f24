//! Color types and packed conversions

/// RGBA color with f64 channels (nominally 0.0 to 1.0)
///
/// Channels are not range-checked. Packing clamps them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    /// Create from a packed `0xRRGGBBAA` value
    pub fn from_packed_rgba(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self::from_rgba8(r, g, b, a)
    }

    /// Convert to u8 array [r, g, b, a], clamping and rounding each channel
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// Pack as `0xRRGGBBAA`
    pub fn to_packed_rgba(&self) -> u32 {
        u32::from_be_bytes(self.to_rgba8())
    }

    /// Pack as `0xAARRGGBB`, the order most immediate-mode GUI backends take
    pub fn to_packed_argb(&self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        u32::from_be_bytes([a, r, g, b])
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { a: alpha, ..self }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn channel_to_u8(c: f64) -> u8 {
    if c.is_nan() {
        return 0;
    }
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_rgba() {
        let c = Color::from_packed_rgba(0xFF8000CC);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(c.b, 0.0);
        assert!((c.a - 204.0 / 255.0).abs() < 1e-12);
        assert_eq!(c.to_packed_rgba(), 0xFF8000CC);
    }

    #[test]
    fn test_packed_argb() {
        let c = Color::new(1.0, 0.0, 0.0, 0.5);
        assert_eq!(c.to_packed_argb(), 0x80FF0000);
    }

    #[test]
    fn test_packing_clamps_out_of_range() {
        let c = Color::new(2.0, -1.0, f64::NAN, 1.0);
        assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_with_alpha() {
        let c = Color::WHITE.with_alpha(0.25);
        assert_eq!(c.a, 0.25);
        assert_eq!(c.r, 1.0);
    }
}
