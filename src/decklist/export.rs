//! Fabrary text export parser
//!
//! An export looks like:
//!
//! ```text
//! Name: Test Deck
//! Hero: Bravo
//! Format: Blitz
//!
//! Arena Cards
//! 1x Boltyn's Hammer
//!
//! Deck Cards
//! 3x Command and Conquer (blue)
//!
//! See the full deck at: https://fabrary.net/decks/abc123
//! Made with Fabrary
//! ```

use crate::decklist::card_line::{parse_card_line, CardEntry, FOOTER_PREFIXES};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DECK_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://fabrary\.net/decks/\S+").expect("deck url pattern is valid")
});

const DECK_URL_MARKER: &str = "fabrary.net/decks/";

/// Which zone card lines currently belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Arena,
    Deck,
}

/// Structured result of parsing a decklist export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDeck {
    pub deck_name: Option<String>,
    pub hero: Option<String>,
    pub format: Option<String>,
    pub source_url: Option<String>,
    pub arena_cards: Vec<CardEntry>,
    pub deck_cards: Vec<CardEntry>,
}

impl ParsedDeck {
    /// True when nothing at all was recognized
    pub fn is_empty(&self) -> bool {
        self.deck_name.is_none()
            && self.hero.is_none()
            && self.format.is_none()
            && self.source_url.is_none()
            && self.arena_cards.is_empty()
            && self.deck_cards.is_empty()
    }

    /// Total copies in the arena zone
    pub fn total_arena_cards(&self) -> u32 {
        self.arena_cards.iter().map(|c| c.quantity).sum()
    }

    /// Total copies in the deck zone
    pub fn total_deck_cards(&self) -> u32 {
        self.deck_cards.iter().map(|c| c.quantity).sum()
    }

    /// All entries, arena first
    pub fn cards(&self) -> impl Iterator<Item = &CardEntry> {
        self.arena_cards.iter().chain(self.deck_cards.iter())
    }
}

/// Parse a full export. Never fails; unrecognized input gives an empty deck.
pub fn parse_decklist_export(raw: &str) -> ParsedDeck {
    let mut deck = ParsedDeck::default();
    let mut section: Option<Section> = None;

    for line in raw.lines() {
        let line = line.trim();

        if let Some(value) = line.strip_prefix("Name:") {
            deck.deck_name = Some(value.trim().to_string());
            continue;
        }
        if let Some(value) = line.strip_prefix("Hero:") {
            deck.hero = Some(value.trim().to_string());
            continue;
        }
        if let Some(value) = line.strip_prefix("Format:") {
            deck.format = Some(value.trim().to_string());
            continue;
        }

        // The marker line is consumed even if no full URL is on it
        if line.contains(DECK_URL_MARKER) {
            if let Some(url) = DECK_URL_REGEX.find(line) {
                deck.source_url = Some(url.as_str().to_string());
            }
            continue;
        }

        if FOOTER_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        if line.eq_ignore_ascii_case("arena cards") {
            section = Some(Section::Arena);
            continue;
        }
        if line.eq_ignore_ascii_case("deck cards") {
            section = Some(Section::Deck);
            continue;
        }

        if line.is_empty() {
            continue;
        }

        if let Some(card) = parse_card_line(line) {
            match section {
                Some(Section::Arena) => deck.arena_cards.push(card),
                Some(Section::Deck) => deck.deck_cards.push(card),
                // Card lines before any section header are dropped
                None => {}
            }
        }
    }

    deck
}

/// Parse an export that may be absent
pub fn parse_decklist_export_opt(raw: Option<&str>) -> ParsedDeck {
    raw.map(parse_decklist_export).unwrap_or_default()
}

/// Card lists grouped the way the decklist page renders them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCards {
    pub arena_cards: Vec<CardEntry>,
    pub deck_cards: Vec<CardEntry>,
}

/// Presentation shape of a parsed deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecklistView {
    pub deck_name: Option<String>,
    /// Exports carry no creator; always `None`
    pub creator: Option<String>,
    pub hero: Option<String>,
    pub format: Option<String>,
    pub fabrary_url: Option<String>,
    pub parsed_cards: ParsedCards,
}

impl From<ParsedDeck> for DecklistView {
    fn from(parsed: ParsedDeck) -> Self {
        DecklistView {
            deck_name: parsed.deck_name,
            creator: None,
            hero: parsed.hero,
            format: parsed.format,
            fabrary_url: parsed.source_url,
            parsed_cards: ParsedCards {
                arena_cards: parsed.arena_cards,
                deck_cards: parsed.deck_cards,
            },
        }
    }
}

/// Reshape a parsed deck for rendering
pub fn to_component_format(parsed: &ParsedDeck) -> DecklistView {
    DecklistView::from(parsed.clone())
}
