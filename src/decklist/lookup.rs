//! Card name normalization for card database lookups

use crate::decklist::card_line::{CardEntry, PitchColor};
use deunicode::deunicode;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static COLOR_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\((?:red|yellow|blue)\)\s*$").expect("color suffix pattern is valid")
});

/// Normalize a card name for case-insensitive lookup.
///
/// "Command and Conquer (Blue)" and "command and conquer" both normalize to
/// "command and conquer". Accented letters are folded to ASCII.
pub fn normalize_card_name(name: &str) -> String {
    let stripped = COLOR_SUFFIX_REGEX.replace(name, "");
    deunicode(stripped.trim()).to_lowercase()
}

/// Cache key for a (name, color) lookup, e.g. "pummel_red" or "dawnblade_any"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey(String);

impl CardKey {
    pub fn new(name: &str, color: Option<PitchColor>) -> Self {
        let color = color.map_or("any", PitchColor::as_str);
        CardKey(format!("{}_{}", normalize_card_name(name), color))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&CardEntry> for CardKey {
    fn from(entry: &CardEntry) -> Self {
        CardKey::new(&entry.name, entry.color)
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
