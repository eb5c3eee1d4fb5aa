use serde::{Deserialize, Serialize};

/// 8-bit sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl std::fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected #rrggbb color, got {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse_hex(s: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation, rounded to the nearest integer.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::Rgb;

    #[test]
    fn parses_and_formats_hex() {
        let c = Rgb::parse_hex("#06b6d4").expect("valid");
        assert_eq!(c, Rgb::new(0x06, 0xb6, 0xd4));
        assert_eq!(c.to_hex(), "#06b6d4");
        assert!(Rgb::parse_hex("06b6d4").is_err());
        assert!(Rgb::parse_hex("#06b6d").is_err());
        assert!(Rgb::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn lerp_hits_endpoints_and_rounds() {
        let a = Rgb::new(0, 100, 255);
        let b = Rgb::new(255, 0, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(128, 50, 128));
    }
}
