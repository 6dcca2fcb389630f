/// Color types and hex parsing
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("invalid color `{0}`, expected #rgb or #rrggbb")]
    Invalid(String),
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`. Short form digits are expanded (`#36c` → `#3366cc`).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let [r, g, b] = parse_channels(hex)?;
        let expand = |(value, max): (u8, u8)| if max == 15 { value * 17 } else { value };
        Ok(Self::new(expand(r), expand(g), expand(b)))
    }

    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// CSS `rgb(r,g,b)` notation
    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// 8-bit RGB color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// CSS `rgba(r,g,b,a)` notation with alpha in `[0, 1]`
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(255)
    }
}

/// Color with channels normalized to `[0, 1]`, as used by the shading model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl UnitRgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` (each nibble divided by 15) or `#rrggbb` (each byte divided by 255).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let [r, g, b] = parse_channels(hex)?;
        let unit = |(value, max): (u8, u8)| value as f32 / max as f32;
        Ok(Self::new(unit(r), unit(g), unit(b)))
    }

    pub fn channels(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Rec. 601 luma
    pub fn luma(&self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

/// Returns `(value, max)` for each channel
fn parse_channels(hex: &str) -> Result<[(u8, u8); 3], ColorError> {
    let invalid = || ColorError::Invalid(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let parse = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match digits.len() {
        3 => Ok([
            (parse(&digits[0..1])?, 15),
            (parse(&digits[1..2])?, 15),
            (parse(&digits[2..3])?, 15),
        ]),
        6 => Ok([
            (parse(&digits[0..2])?, 255),
            (parse(&digits[2..4])?, 255),
            (parse(&digits[4..6])?, 255),
        ]),
        _ => Err(invalid()),
    }
}
