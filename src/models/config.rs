//! ScheduleConfig and ScoringWeights: the input to a generation call.

use crate::models::player::{Player, PlayerId};
use crate::models::schedule::ScheduleError;
use serde::{Deserialize, Serialize};

/// Default number of independent multi-start attempts.
pub const DEFAULT_ATTEMPTS: u32 = 100;

/// Linear weights for the five candidate sub-scores. All default to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub balance: f64,
    pub must_play: f64,
    pub partnership: f64,
    pub opposition: f64,
    pub court: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            balance: 1.0,
            must_play: 1.0,
            partnership: 1.0,
            opposition: 1.0,
            court: 1.0,
        }
    }
}

impl ScoringWeights {
    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let named = [
            ("balance", self.balance),
            ("must_play", self.must_play),
            ("partnership", self.partnership),
            ("opposition", self.opposition),
            ("court", self.court),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ScheduleError::InvalidWeight(name));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_attempts() -> u32 {
    DEFAULT_ATTEMPTS
}

/// Everything a generation call needs. Deserializes from a partial JSON body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub num_rounds: u32,
    pub num_players: u32,
    pub num_courts: u32,
    /// Names by position; shorter than `num_players` is fine, blanks get a default.
    #[serde(default)]
    pub player_names: Vec<String>,
    #[serde(default = "default_true")]
    pub avoid_consecutive_sitting_out: bool,
    #[serde(default = "default_true")]
    pub balance_match_counts: bool,
    #[serde(default)]
    pub scoring_weights: ScoringWeights,
    /// Same seed, same schedule. None draws a fresh seed.
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Run the hill-climbing pass on the best attempt.
    #[serde(default = "default_true")]
    pub refine: bool,
}

impl ScheduleConfig {
    pub fn new(num_rounds: u32, num_players: u32, num_courts: u32) -> Self {
        Self {
            num_rounds,
            num_players,
            num_courts,
            player_names: Vec::new(),
            avoid_consecutive_sitting_out: true,
            balance_match_counts: true,
            scoring_weights: ScoringWeights::default(),
            random_seed: None,
            attempts: DEFAULT_ATTEMPTS,
            refine: true,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_player_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.player_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.scoring_weights = weights;
        self
    }

    pub fn with_refinement(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    pub fn with_avoid_consecutive_sitting_out(mut self, avoid: bool) -> Self {
        self.avoid_consecutive_sitting_out = avoid;
        self
    }

    pub fn with_balance_match_counts(mut self, balance: bool) -> Self {
        self.balance_match_counts = balance;
        self
    }

    /// Reject configurations that cannot produce a meaningful schedule.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.num_players < 4 {
            return Err(ScheduleError::NotEnoughPlayers {
                players: self.num_players,
            });
        }
        if self.num_rounds == 0 {
            return Err(ScheduleError::InvalidRounds);
        }
        if self.num_courts == 0 {
            return Err(ScheduleError::InvalidCourts);
        }
        if self.attempts == 0 {
            return Err(ScheduleError::InvalidAttempts);
        }
        if self.player_names.len() > self.num_players as usize {
            return Err(ScheduleError::TooManyNames {
                names: self.player_names.len(),
                players: self.num_players,
            });
        }
        self.scoring_weights.validate()
    }

    /// Weights actually used by the candidate scorer (balance off when disabled).
    pub fn effective_weights(&self) -> ScoringWeights {
        let mut weights = self.scoring_weights;
        if !self.balance_match_counts {
            weights.balance = 0.0;
        }
        weights
    }

    /// Players 1..=num_players with configured or default names.
    pub fn players(&self) -> Vec<Player> {
        (1..=self.num_players)
            .map(|id: PlayerId| {
                let name = self
                    .player_names
                    .get((id - 1) as usize)
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| Player::default_name(id));
                Player::new(id, name)
            })
            .collect()
    }
}
