//! Decklist parsing
//!
//! Parsers for the Fabrary text export: card lines, deck metadata, and the
//! two zones (arena cards, deck cards).

pub mod card_line;
pub mod export;
pub mod lookup;

pub use card_line::{parse_card_line, CardEntry, PitchColor};
pub use export::{
    parse_decklist_export, parse_decklist_export_opt, to_component_format, DecklistView,
    ParsedCards, ParsedDeck,
};
pub use lookup::{normalize_card_name, CardKey};
