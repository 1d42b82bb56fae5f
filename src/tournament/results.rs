//! Per-player event results

use crate::{AgeError, Result};
use serde::{Deserialize, Serialize};

/// One player's final result in an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    pub player_name: String,
    #[serde(default)]
    pub gem_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub placement: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub age_points: u32,
    /// Prize in dollars, two decimals ("125.00")
    #[serde(default)]
    pub prize_amount: Option<String>,
}

impl EventResult {
    pub fn new(player_name: impl Into<String>, placement: u32) -> Self {
        EventResult {
            player_name: player_name.into(),
            gem_id: None,
            user_id: None,
            placement,
            wins: 0,
            losses: 0,
            draws: 0,
            age_points: 0,
            prize_amount: None,
        }
    }

    pub fn with_gem_id(mut self, gem_id: impl Into<String>) -> Self {
        self.gem_id = Some(gem_id.into());
        self
    }

    pub fn with_points(mut self, age_points: u32) -> Self {
        self.age_points = age_points;
        self
    }

    pub fn with_record(mut self, wins: u32, losses: u32, draws: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.draws = draws;
        self
    }

    /// Check the result can be recorded
    pub fn validate(&self) -> Result<()> {
        if self.player_name.trim().is_empty() {
            return Err(AgeError::InvalidResult(
                "player name is required".to_string(),
            ));
        }
        if self.placement < 1 {
            return Err(AgeError::InvalidResult(format!(
                "{}: placement must be at least 1",
                self.player_name
            )));
        }
        if let Some(prize) = self.prize_amount.as_deref().filter(|p| !p.trim().is_empty()) {
            normalize_prize(prize)?;
        }
        Ok(())
    }

    /// Validate, then canonicalize optional fields: blank ids become `None`
    /// and the prize is rewritten with two decimals.
    pub fn normalized(mut self) -> Result<Self> {
        self.validate()?;
        self.player_name = self.player_name.trim().to_string();
        self.gem_id = non_blank(self.gem_id);
        self.user_id = non_blank(self.user_id);
        self.prize_amount = match non_blank(self.prize_amount) {
            Some(prize) => Some(normalize_prize(&prize)?),
            None => None,
        };
        Ok(self)
    }

    pub fn is_first_place(&self) -> bool {
        self.placement == 1
    }

    pub fn is_top4(&self) -> bool {
        self.placement <= 4
    }

    pub fn is_top8(&self) -> bool {
        self.placement <= 8
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Format a prize amount with two decimals ("50" -> "50.00")
pub fn normalize_prize(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AgeError::InvalidResult("empty prize amount".to_string()));
    }
    let amount: f64 = raw
        .parse()
        .map_err(|_| AgeError::InvalidResult(format!("invalid prize amount: {raw}")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(AgeError::InvalidResult(format!(
            "invalid prize amount: {raw}"
        )));
    }
    Ok(format!("{amount:.2}"))
}
