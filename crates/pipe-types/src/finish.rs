use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight catalogue finishes. Each has a fixed hex value and price multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardFinish {
    Gray,
    White,
    Blue,
    Orange,
    Green,
    Red,
    Black,
    Yellow,
}

impl StandardFinish {
    /// All finishes in palette order.
    pub const ALL: [StandardFinish; 8] = [
        StandardFinish::Gray,
        StandardFinish::White,
        StandardFinish::Blue,
        StandardFinish::Orange,
        StandardFinish::Green,
        StandardFinish::Red,
        StandardFinish::Black,
        StandardFinish::Yellow,
    ];

    /// Canonical lowercase `#rrggbb` value.
    pub fn hex(&self) -> &'static str {
        match self {
            StandardFinish::Gray => "#71717a",
            StandardFinish::White => "#f4f4f5",
            StandardFinish::Blue => "#3b82f6",
            StandardFinish::Orange => "#f97316",
            StandardFinish::Green => "#22c55e",
            StandardFinish::Red => "#ef4444",
            StandardFinish::Black => "#18181b",
            StandardFinish::Yellow => "#eab308",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StandardFinish::Gray => "Gray",
            StandardFinish::White => "White",
            StandardFinish::Blue => "Blue",
            StandardFinish::Orange => "Orange",
            StandardFinish::Green => "Green",
            StandardFinish::Red => "Red",
            StandardFinish::Black => "Black",
            StandardFinish::Yellow => "Yellow",
        }
    }

    /// Exact, case-sensitive lookup. `#71717A` is not gray.
    pub fn from_hex(hex: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.hex() == hex)
    }
}

/// A finish color as entered by the user: a hex RGB string.
///
/// The string is kept verbatim. Whether it counts as a standard finish is
/// decided by exact comparison against the palette, so normalising it here
/// would change prices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinishColor(String);

impl FinishColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn standard_finish(&self) -> Option<StandardFinish> {
        StandardFinish::from_hex(&self.0)
    }

    pub fn is_custom(&self) -> bool {
        self.standard_finish().is_none()
    }

    /// Parse `#rgb` or `#rrggbb` (any case) into sRGB channels.
    pub fn to_rgb(&self) -> Option<[u8; 3]> {
        let digits = self.0.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some([channel(0)?, channel(2)?, channel(4)?])
            }
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some([channel(0)?, channel(1)?, channel(2)?])
            }
            _ => None,
        }
    }
}

impl Default for FinishColor {
    fn default() -> Self {
        StandardFinish::Gray.into()
    }
}

impl From<StandardFinish> for FinishColor {
    fn from(finish: StandardFinish) -> Self {
        Self(finish.hex().to_string())
    }
}

impl fmt::Display for FinishColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_round_trips_through_hex() {
        for finish in StandardFinish::ALL {
            assert_eq!(StandardFinish::from_hex(finish.hex()), Some(finish));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(StandardFinish::from_hex("#71717a"), Some(StandardFinish::Gray));
        assert_eq!(StandardFinish::from_hex("#71717A"), None);
        assert!(FinishColor::new("#71717A").is_custom());
    }

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(FinishColor::new("#3b82f6").to_rgb(), Some([0x3b, 0x82, 0xf6]));
        assert_eq!(FinishColor::new("#FFF").to_rgb(), Some([255, 255, 255]));
        assert_eq!(FinishColor::new("blue").to_rgb(), None);
        assert_eq!(FinishColor::new("#12345").to_rgb(), None);
    }
}
