//! age-core - content and tournament logic for the AGE community site
//!
//! Decklist export parsing, premium-access evaluation, and tournament
//! closeout with season standings. The web application around it (routes,
//! CMS, payments, sessions) only consumes these functions.

pub mod access;
pub mod decklist;
pub mod error;
pub mod logger;
pub mod tournament;

pub use error::{AgeError, Result};
