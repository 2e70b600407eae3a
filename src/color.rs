use anyhow::{bail, Result};
use palette::{FromColor, IntoColor, Lab, Lch, Srgb};

/// An sRGB colour with u8 components.
/// Provides hex round-tripping and conversions to the perceptual spaces used by extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB`, or `#RRGGBB` followed by two or five extra digits (ignored).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let Some(digits) = hex.strip_prefix('#') else {
            bail!("invalid hex color: missing leading '#' in {hex:?}");
        };
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid hex color: non-hex digit in {hex:?}");
        }
        match digits.len() {
            3 => {
                let expand = |i: usize| -> Result<u8> {
                    let v = u8::from_str_radix(&digits[i..i + 1], 16)?;
                    Ok(v * 17)
                };
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 | 11 => {
                let r = u8::from_str_radix(&digits[0..2], 16)?;
                let g = u8::from_str_radix(&digits[2..4], 16)?;
                let b = u8::from_str_radix(&digits[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            n => bail!("invalid hex color: unexpected {n} hex digits"),
        }
    }

    /// Serialize to uppercase hex `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Convert to CIELAB (for K-means clustering and deduplication).
    pub fn to_lab(self) -> Lab {
        let srgb_f32: Srgb<f32> = self.to_srgb_u8().into_format();
        srgb_f32.into_color()
    }

    /// Create from CIELAB.
    pub fn from_lab(lab: Lab) -> Self {
        let srgb_f32: Srgb<f32> = Srgb::from_color(lab);
        Self::from_srgb_f32_clamped(srgb_f32)
    }

    /// Convert to CIE LCh (for perceptual sorting).
    pub fn to_lch(self) -> Lch {
        let srgb_f32: Srgb<f32> = self.to_srgb_u8().into_format();
        srgb_f32.into_color()
    }

    /// Create from CIE LCh, clamping out-of-gamut results.
    pub fn from_lch(lch: Lch) -> Self {
        let srgb_f32: Srgb<f32> = Srgb::from_color(lch);
        Self::from_srgb_f32_clamped(srgb_f32)
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// WCAG 2.0 relative luminance.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
