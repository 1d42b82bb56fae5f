//! Tournament results and season standings
//!
//! Event results are entered per player, then folded into per-season
//! standings for the event's circuit when the event is closed out.

pub mod closeout;
pub mod results;
pub mod standings;

pub use closeout::{
    close_event, log_closeout, participants, reopen_event, Actor, CloseoutReport, Event,
    EventStatus, Participant, Role, Ticket,
};
pub use results::{normalize_prize, EventResult};
pub use standings::{SeasonStanding, StandingUpdate, StandingsTable};
