//! Event closeout
//!
//! Closing an event records its results into the season standings of the
//! event's circuit and marks the event completed. Admins and the tournament
//! staff assigned to the event may close it; only admins may reopen it.

use crate::logger::{Logger, VerbosityLevel};
use crate::tournament::results::EventResult;
use crate::tournament::standings::{StandingUpdate, StandingsTable};
use crate::{AgeError, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Account role, as stored on the user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    TournamentStaff,
    Editor,
    Writer,
    Member,
}

impl FromStr for Role {
    type Err = AgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "tournament_staff" => Ok(Role::TournamentStaff),
            "editor" => Ok(Role::Editor),
            "writer" => Ok(Role::Writer),
            "member" => Ok(Role::Member),
            _ => Err(AgeError::InvalidRole(s.to_string())),
        }
    }
}

/// The user performing a closeout action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub role: Role,
    /// Events this user is assigned to as staff
    #[serde(default)]
    pub assigned_events: Vec<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Actor {
            id: id.into(),
            role,
            assigned_events: Vec::new(),
        }
    }

    pub fn assigned_to(mut self, event_id: impl Into<String>) -> Self {
        self.assigned_events.push(event_id.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins, or staff assigned to this event
    pub fn can_manage(&self, event_id: &str) -> bool {
        match self.role {
            Role::Admin => true,
            Role::TournamentStaff => self.assigned_events.iter().any(|e| e == event_id),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Circuit the event counts toward; no standings without one
    #[serde(default)]
    pub circuit: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_by: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Event {
            id: id.into(),
            name: name.into(),
            circuit: None,
            status: EventStatus::Upcoming,
            closed_at: None,
            closed_by: None,
        }
    }

    pub fn with_circuit(mut self, circuit: impl Into<String>) -> Self {
        self.circuit = Some(circuit.into());
        self
    }

    fn active_circuit(&self) -> Option<&str> {
        self.circuit.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// A purchased event ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gem_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub refunded: bool,
}

/// A ticket holder eligible for results entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub ticket_id: String,
    pub player_name: String,
    pub gem_id: Option<String>,
    pub user_id: Option<String>,
}

/// Non-refunded ticket holders, in ticket order
pub fn participants(tickets: &[Ticket]) -> Vec<Participant> {
    tickets
        .iter()
        .filter(|t| !t.refunded)
        .map(|t| {
            let full_name = format!(
                "{} {}",
                t.first_name.as_deref().unwrap_or(""),
                t.last_name.as_deref().unwrap_or("")
            );
            let full_name = full_name.trim();
            Participant {
                ticket_id: t.id.clone(),
                player_name: if full_name.is_empty() {
                    "Unknown Player".to_string()
                } else {
                    full_name.to_string()
                },
                gem_id: t.gem_id.clone(),
                user_id: t.user_id.clone(),
            }
        })
        .collect()
}

/// Summary of a closeout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseoutReport {
    pub event_id: String,
    pub season: String,
    pub circuit: Option<String>,
    pub results_recorded: usize,
    pub standings_created: usize,
    pub standings_updated: usize,
    /// Players with points but no GEM id to key a standing on
    pub skipped_players: Vec<String>,
}

/// Close an event: fold its results into the season standings and mark it
/// completed. Nothing changes if any result is invalid.
pub fn close_event(
    event: &mut Event,
    results: &[EventResult],
    standings: &mut StandingsTable,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<CloseoutReport> {
    if !actor.can_manage(&event.id) {
        return Err(AgeError::Unauthorized(format!(
            "{} may not close event {}",
            actor.id, event.id
        )));
    }
    if event.status == EventStatus::Completed {
        return Err(AgeError::InvalidTransition(format!(
            "event {} is already completed",
            event.id
        )));
    }

    let results = results
        .iter()
        .cloned()
        .map(EventResult::normalized)
        .collect::<Result<Vec<_>>>()?;

    let season = now.year().to_string();
    let mut report = CloseoutReport {
        event_id: event.id.clone(),
        season: season.clone(),
        circuit: event.active_circuit().map(str::to_string),
        results_recorded: results.len(),
        standings_created: 0,
        standings_updated: 0,
        skipped_players: Vec::new(),
    };

    if let Some(circuit) = event.active_circuit() {
        // Staged on a copy so a failing result leaves the caller's table as it was
        let mut staged = standings.clone();
        for result in results.iter().filter(|r| r.age_points > 0) {
            let Some(gem_id) = result.gem_id.as_deref() else {
                report.skipped_players.push(result.player_name.clone());
                continue;
            };
            match staged.record(&season, circuit, gem_id, result, now)? {
                StandingUpdate::Created => report.standings_created += 1,
                StandingUpdate::Updated => report.standings_updated += 1,
            }
        }
        *standings = staged;
    }

    event.status = EventStatus::Completed;
    event.closed_at = Some(now);
    event.closed_by = Some(actor.id.clone());

    Ok(report)
}

/// Reopen a completed event. Standings already recorded are kept.
pub fn reopen_event(event: &mut Event, actor: &Actor) -> Result<()> {
    if !actor.is_admin() {
        return Err(AgeError::Unauthorized(
            "only admins can reopen events".to_string(),
        ));
    }
    if event.status != EventStatus::Completed {
        return Err(AgeError::InvalidTransition(format!(
            "event {} is not completed",
            event.id
        )));
    }

    event.status = EventStatus::Upcoming;
    event.closed_at = None;
    event.closed_by = None;
    Ok(())
}

/// Log the outcome of a closeout: one line per skipped player, then a summary
pub fn log_closeout(logger: &Logger, report: &CloseoutReport) {
    for player in &report.skipped_players {
        logger.categorized(
            VerbosityLevel::Normal,
            "closeout",
            &format!("{player} has points but no GEM id; standing not updated"),
        );
    }
    logger.minimal(&format!(
        "Event {} closed: {} results, {} standings created, {} updated",
        report.event_id, report.results_recorded, report.standings_created, report.standings_updated
    ));
}
