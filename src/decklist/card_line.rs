//! Card line parsing
//!
//! Parses export lines like "3x Command and Conquer (blue)" or a bare
//! "Bravo, Showstopper" into a [`CardEntry`].

use nom::{
    bytes::complete::{tag_no_case, take_while1},
    character::complete::digit1,
    sequence::{pair, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Footer lines the export tool appends after the card list
pub(crate) const FOOTER_PREFIXES: [&str; 2] = ["Made with", "See the full"];

/// Pitch color of a card, written as a trailing "(red)" etc. in exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchColor {
    Red,
    Yellow,
    Blue,
}

impl PitchColor {
    /// Match a color token case-insensitively ("Red", "BLUE", ...)
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("red") {
            Some(PitchColor::Red)
        } else if token.eq_ignore_ascii_case("yellow") {
            Some(PitchColor::Yellow)
        } else if token.eq_ignore_ascii_case("blue") {
            Some(PitchColor::Blue)
        } else {
            None
        }
    }

    /// Pitch value printed on the card: red=1, yellow=2, blue=3
    pub fn pitch(self) -> u8 {
        match self {
            PitchColor::Red => 1,
            PitchColor::Yellow => 2,
            PitchColor::Blue => 3,
        }
    }

    pub fn from_pitch(pitch: u8) -> Option<Self> {
        match pitch {
            1 => Some(PitchColor::Red),
            2 => Some(PitchColor::Yellow),
            3 => Some(PitchColor::Blue),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PitchColor::Red => "red",
            PitchColor::Yellow => "yellow",
            PitchColor::Blue => "blue",
        }
    }
}

impl fmt::Display for PitchColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One card line of a decklist (name and count)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub quantity: u32,
    pub name: String,
    pub color: Option<PitchColor>,
}

impl fmt::Display for CardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.quantity, self.name)?;
        if let Some(color) = self.color {
            write!(f, " ({color})")?;
        }
        Ok(())
    }
}

/// "<digits>x<whitespace>", returning the digits
fn quantity_prefix(input: &str) -> IResult<&str, &str> {
    terminated(
        digit1,
        pair(tag_no_case("x"), take_while1(char::is_whitespace)),
    )(input)
}

/// Split a trailing " (red|yellow|blue)" off a card name.
///
/// The suffix only counts when whitespace separates it from a non-empty
/// name; any other trailing parenthetical stays part of the name.
fn split_color_suffix(text: &str) -> (&str, Option<PitchColor>) {
    let Some(inner) = text.strip_suffix(')') else {
        return (text.trim(), None);
    };
    let Some(open) = inner.rfind('(') else {
        return (text.trim(), None);
    };

    let head = &inner[..open];
    let color = PitchColor::from_token(&inner[open + 1..]);
    let separated = head.ends_with(char::is_whitespace);
    let name = head.trim();

    match color {
        Some(color) if separated && !name.is_empty() => (name, Some(color)),
        _ => (text.trim(), None),
    }
}

/// Parse a single card line.
///
/// Lines with an explicit quantity ("3x Name") take that count; bare names
/// count as one copy. Returns `None` for blank lines, footer lines, and
/// quantity lines whose count is zero or does not fit a `u32`.
pub fn parse_card_line(line: &str) -> Option<CardEntry> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok((rest, digits)) = quantity_prefix(trimmed) {
        let quantity = digits.parse::<u32>().ok().filter(|q| *q > 0)?;
        let (name, color) = split_color_suffix(rest);
        return Some(CardEntry {
            quantity,
            name: name.to_string(),
            color,
        });
    }

    // Footers are normally filtered by the export scanner already
    if FOOTER_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return None;
    }

    let (name, color) = split_color_suffix(trimmed);
    Some(CardEntry {
        quantity: 1,
        name: name.to_string(),
        color,
    })
}
