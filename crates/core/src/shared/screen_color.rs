use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Colour the capture screen was flashing when a frame was taken.
///
/// Passed through to the analysis engine for its chroma check. Known
/// colours are recognised case-insensitively; anything else is carried
/// verbatim so the engine can decide what it means.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScreenColor {
    White,
    Red,
    Green,
    Blue,
    Other(String),
}

impl ScreenColor {
    pub fn as_str(&self) -> &str {
        match self {
            ScreenColor::White => "WHITE",
            ScreenColor::Red => "RED",
            ScreenColor::Green => "GREEN",
            ScreenColor::Blue => "BLUE",
            ScreenColor::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ScreenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenColor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "WHITE" => ScreenColor::White,
            "RED" => ScreenColor::Red,
            "GREEN" => ScreenColor::Green,
            "BLUE" => ScreenColor::Blue,
            _ => ScreenColor::Other(s.to_string()),
        })
    }
}

impl From<&str> for ScreenColor {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(color) => color,
            Err(never) => match never {},
        }
    }
}

impl Serialize for ScreenColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScreenColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ScreenColor::from(tag.as_str()))
    }
}
