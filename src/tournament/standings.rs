//! Season standings, accumulated per (season, circuit, GEM id)

use crate::tournament::results::EventResult;
use crate::{AgeError, Result};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StandingKey {
    season: String,
    circuit: String,
    gem_id: String,
}

/// A player's running totals for one season of one circuit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStanding {
    pub season: String,
    pub circuit: String,
    pub gem_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub player_name: String,
    pub total_points: u32,
    pub events_played: u32,
    pub first_place_finishes: u32,
    pub top4_finishes: u32,
    pub top8_finishes: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SeasonStanding {
    fn key(&self) -> StandingKey {
        StandingKey {
            season: self.season.clone(),
            circuit: self.circuit.clone(),
            gem_id: self.gem_id.clone(),
        }
    }

    /// Add one event result to the totals. Leaves `self` untouched if any
    /// counter would overflow.
    fn record(&mut self, result: &EventResult, now: DateTime<Utc>) -> Result<()> {
        let overflow = || {
            AgeError::InvalidResult(format!(
                "{}: season totals overflow for GEM id {}",
                result.player_name, self.gem_id
            ))
        };
        let total_points = self
            .total_points
            .checked_add(result.age_points)
            .ok_or_else(overflow)?;
        let events_played = self.events_played.checked_add(1).ok_or_else(overflow)?;
        let first_place_finishes = self
            .first_place_finishes
            .checked_add(u32::from(result.is_first_place()))
            .ok_or_else(overflow)?;
        let top4_finishes = self
            .top4_finishes
            .checked_add(u32::from(result.is_top4()))
            .ok_or_else(overflow)?;
        let top8_finishes = self
            .top8_finishes
            .checked_add(u32::from(result.is_top8()))
            .ok_or_else(overflow)?;

        self.total_points = total_points;
        self.events_played = events_played;
        self.first_place_finishes = first_place_finishes;
        self.top4_finishes = top4_finishes;
        self.top8_finishes = top8_finishes;
        self.updated_at = Some(now);
        Ok(())
    }
}

/// Whether recording a result created a new standing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingUpdate {
    Created,
    Updated,
}

/// All standings, in insertion order, indexed by key.
///
/// Serializes as a plain list of [`SeasonStanding`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SeasonStanding>", into = "Vec<SeasonStanding>")]
pub struct StandingsTable {
    standings: Vec<SeasonStanding>,
    index: FxHashMap<StandingKey, usize>,
}

impl From<Vec<SeasonStanding>> for StandingsTable {
    fn from(standings: Vec<SeasonStanding>) -> Self {
        // A repeated key resolves to its last occurrence
        let index = standings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key(), i))
            .collect();
        StandingsTable { standings, index }
    }
}

impl From<StandingsTable> for Vec<SeasonStanding> {
    fn from(table: StandingsTable) -> Self {
        table.standings
    }
}

impl StandingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeasonStanding> {
        self.standings.iter()
    }

    pub fn get(&self, season: &str, circuit: &str, gem_id: &str) -> Option<&SeasonStanding> {
        let key = StandingKey {
            season: season.to_string(),
            circuit: circuit.to_string(),
            gem_id: gem_id.to_string(),
        };
        self.index.get(&key).map(|&i| &self.standings[i])
    }

    /// Add a result for the player identified by `gem_id`. On overflow the
    /// table is unchanged.
    pub fn record(
        &mut self,
        season: &str,
        circuit: &str,
        gem_id: &str,
        result: &EventResult,
        now: DateTime<Utc>,
    ) -> Result<StandingUpdate> {
        let key = StandingKey {
            season: season.to_string(),
            circuit: circuit.to_string(),
            gem_id: gem_id.to_string(),
        };

        if let Some(&i) = self.index.get(&key) {
            self.standings[i].record(result, now)?;
            return Ok(StandingUpdate::Updated);
        }

        let mut standing = SeasonStanding {
            season: key.season.clone(),
            circuit: key.circuit.clone(),
            gem_id: key.gem_id.clone(),
            user_id: result.user_id.clone(),
            player_name: result.player_name.clone(),
            total_points: 0,
            events_played: 0,
            first_place_finishes: 0,
            top4_finishes: 0,
            top8_finishes: 0,
            updated_at: None,
        };
        standing.record(result, now)?;

        self.index.insert(key, self.standings.len());
        self.standings.push(standing);
        Ok(StandingUpdate::Created)
    }

    /// Standings of one season and circuit, best first: points, then wins,
    /// then player name
    pub fn ranked(&self, season: &str, circuit: &str) -> Vec<&SeasonStanding> {
        let mut ranked: Vec<_> = self
            .standings
            .iter()
            .filter(|s| s.season == season && s.circuit == circuit)
            .collect();
        ranked.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then(b.first_place_finishes.cmp(&a.first_place_finishes))
                .then_with(|| a.player_name.cmp(&b.player_name))
        });
        ranked
    }
}

impl<'a> IntoIterator for &'a StandingsTable {
    type Item = &'a SeasonStanding;
    type IntoIter = std::slice::Iter<'a, SeasonStanding>;

    fn into_iter(self) -> Self::IntoIter {
        self.standings.iter()
    }
}
