use crate::foundation::error::{ComposeError, ComposeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Square output canvas, measured in logical units (one unit == one exported pixel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub size: u32,
}

impl Canvas {
    pub fn new(size: u32) -> ComposeResult<Self> {
        if size == 0 {
            return Err(ComposeError::validation("canvas size must be > 0"));
        }
        if size > u32::from(u16::MAX) {
            return Err(ComposeError::validation("canvas size must fit in u16"));
        }
        Ok(Self { size })
    }

    pub fn size_f64(self) -> f64 {
        f64::from(self.size)
    }

    pub fn center(self) -> Point {
        let half = self.size_f64() / 2.0;
        Point::new(half, half)
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.size_f64(), self.size_f64())
    }
}

/// Straight-alpha RGBA8 color, written as `#RRGGBB` or `#RRGGBBAA` in JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn parse_hex(s: &str) -> ComposeResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> ComposeResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| ComposeError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !s.is_ascii() {
            return Err(ComposeError::validation("hex color must be ascii"));
        }
        match s.len() {
            3 => {
                let expand = |i: usize| hex_byte(&s[i..i + 1].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => Err(ComposeError::validation(
                "hex color must be #RGB, #RRGGBB or #RRGGBBAA",
            )),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_premul_array(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}
