//! Competitive match scoring
//!
//! XP and coin formulas for one resolved match, Elo rating updates, and the
//! match lifecycle (`Created -> InProgress -> Resolved`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ProgressError, Result};
use super::models::Player;

/// XP for taking part at all
const PARTICIPATION_XP: u64 = 50;
const WIN_XP: u64 = 100;
const DRAW_XP: u64 = 30;
/// Per place counted from the bottom, for top-half finishers in multiplayer
const RANK_XP_STEP: u64 = 50;
const STREAK_XP_STEP: u64 = 10;

/// How a match ended for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

impl MatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
        }
    }

    /// Actual score for Elo: 1 / 0.5 / 0
    fn elo_score(&self) -> f64 {
        match self {
            Self::Win => 1.0,
            Self::Draw => 0.5,
            Self::Loss => 0.0,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchOutcome {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "win" => Ok(Self::Win),
            "loss" | "lose" => Ok(Self::Loss),
            "draw" => Ok(Self::Draw),
            other => Err(ProgressError::InvalidMatch(format!("unknown result '{other}'"))),
        }
    }
}

/// XP awarded for one completed match.
///
/// `current_streak` is the win streak going into the match.
pub fn calculate_match_xp(
    outcome: MatchOutcome,
    score: u32,
    rank: u32,
    total_players: u32,
    current_streak: u32,
) -> u64 {
    let mut xp = PARTICIPATION_XP;

    xp += match outcome {
        MatchOutcome::Win => WIN_XP,
        MatchOutcome::Draw => DRAW_XP,
        MatchOutcome::Loss => 0,
    };

    // 10% of score, rounded down
    xp += u64::from(score / 10);

    // Rank bonus only for real multiplayer; top half only
    if total_players > 2 && rank <= total_players.div_ceil(2) {
        let places = u64::from(total_players.saturating_sub(rank)) + 1;
        xp += RANK_XP_STEP * places;
    }

    if current_streak > 0 {
        xp += u64::from(current_streak) * STREAK_XP_STEP;
    }

    xp
}

/// Coins awarded for one completed match.
///
/// `accuracy` is the share of correct answers, 0-100.
pub fn calculate_match_coins(
    outcome: MatchOutcome,
    accuracy: u32,
    score: u32,
    rank: u32,
    total_players: u32,
    current_streak: u32,
) -> u64 {
    let mut coins: u64 = 10;

    coins += match outcome {
        MatchOutcome::Win => 50,
        MatchOutcome::Draw => 20,
        MatchOutcome::Loss => 0,
    };

    // Up to 50 coins for perfect accuracy
    coins += u64::from(accuracy / 2);
    coins += u64::from(score / 10);

    if total_players > 2 {
        coins += match rank {
            1 => 100,
            2 => 50,
            3 => 25,
            _ => 0,
        };
    }

    if current_streak > 0 && outcome == MatchOutcome::Win {
        coins += u64::from(current_streak) * 5;
    }

    if accuracy == 100 {
        coins += 50;
    }

    coins
}

/// Elo expected score of `rating` against `opponent`
fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// Signed rating change for one match
pub fn rating_change(rating: u32, opponent_rating: u32, outcome: MatchOutcome, k_factor: f64) -> i32 {
    let expected = expected_score(f64::from(rating), f64::from(opponent_rating));
    (k_factor * (outcome.elo_score() - expected)).round() as i32
}

/// One participant's result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub score: u32,
    /// 1-based placement
    pub rank: u32,
    pub total_players: u32,
    /// Correct answers in percent, 0-100
    #[serde(default)]
    pub accuracy: u32,
    /// Mean rating of the opponents; the player's own rating when unknown
    #[serde(default)]
    pub opponent_rating: Option<u32>,
}

impl MatchResult {
    pub fn validate(&self) -> Result<()> {
        if self.total_players < 2 {
            return Err(ProgressError::InvalidMatch(format!(
                "a match needs at least 2 players, got {}",
                self.total_players
            )));
        }
        if self.rank == 0 || self.rank > self.total_players {
            return Err(ProgressError::InvalidMatch(format!(
                "rank {} is outside 1..={}",
                self.rank, self.total_players
            )));
        }
        if self.accuracy > 100 {
            return Err(ProgressError::InvalidMatch(format!(
                "accuracy {} is outside 0-100",
                self.accuracy
            )));
        }
        Ok(())
    }
}

/// What one match did to a player record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSettlement {
    pub xp: u64,
    pub coins: u64,
    pub rating_change: i32,
}

impl Player {
    /// Apply a validated match result: XP and coins (using the streak going in),
    /// counters, win streak and rating.
    pub fn apply_match(&mut self, result: &MatchResult, k_factor: f64) -> MatchSettlement {
        let streak_before = self.win_streak;
        let xp = calculate_match_xp(
            result.outcome,
            result.score,
            result.rank,
            result.total_players,
            streak_before,
        );
        let coins = calculate_match_coins(
            result.outcome,
            result.accuracy,
            result.score,
            result.rank,
            result.total_players,
            streak_before,
        );
        let opponent = result.opponent_rating.unwrap_or(self.rating);
        let delta = rating_change(self.rating, opponent, result.outcome, k_factor);

        self.total_games = self.total_games.saturating_add(1);
        match result.outcome {
            MatchOutcome::Win => {
                self.wins = self.wins.saturating_add(1);
                self.win_streak = self.win_streak.saturating_add(1);
                self.best_win_streak = self.best_win_streak.max(self.win_streak);
            }
            MatchOutcome::Loss => {
                self.losses = self.losses.saturating_add(1);
                self.win_streak = 0;
            }
            MatchOutcome::Draw => {
                self.draws = self.draws.saturating_add(1);
                self.win_streak = 0;
            }
        }

        self.rating = self.rating.saturating_add_signed(delta);
        self.xp = self.xp.saturating_add(xp);
        self.coins = self.coins.saturating_add(coins);

        MatchSettlement {
            xp,
            coins,
            rating_change: delta,
        }
    }
}

/// Lifecycle state of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "outcome", rename_all = "camelCase")]
pub enum MatchState {
    Created,
    InProgress,
    Resolved(MatchOutcome),
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::InProgress => f.write_str("in progress"),
            Self::Resolved(outcome) => write!(f, "resolved ({outcome})"),
        }
    }
}

/// A single competitive match. Resolves exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    state: MatchState,
}

impl Match {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: MatchState::Created,
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, MatchState::Resolved(_))
    }

    pub fn start(&mut self) -> Result<()> {
        self.transition(MatchState::InProgress)
    }

    pub fn resolve(&mut self, outcome: MatchOutcome) -> Result<()> {
        self.transition(MatchState::Resolved(outcome))
    }

    fn transition(&mut self, to: MatchState) -> Result<()> {
        let allowed = matches!(
            (self.state, to),
            (MatchState::Created, MatchState::InProgress)
                | (MatchState::InProgress, MatchState::Resolved(_))
        );
        if !allowed {
            return Err(ProgressError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: MatchOutcome, rank: u32, total_players: u32) -> MatchResult {
        MatchResult {
            outcome,
            score: 0,
            rank,
            total_players,
            accuracy: 0,
            opponent_rating: None,
        }
    }

    #[test]
    fn test_multiplayer_win_with_streak() {
        // 50 + 100 + 8 + 50 * 4 + 2 * 10
        assert_eq!(calculate_match_xp(MatchOutcome::Win, 80, 1, 4, 2), 378);
    }

    #[test]
    fn test_one_on_one_draw() {
        // 50 + 30 + 5, no rank bonus for 1v1
        assert_eq!(calculate_match_xp(MatchOutcome::Draw, 50, 2, 2, 0), 85);
    }

    #[test]
    fn test_rank_bonus_top_half_only() {
        // 5 players: top half is ranks 1..=3
        assert_eq!(calculate_match_xp(MatchOutcome::Loss, 0, 3, 5, 0), 50 + 150);
        assert_eq!(calculate_match_xp(MatchOutcome::Loss, 0, 4, 5, 0), 50);
        // 1v1 winner gets no rank bonus
        assert_eq!(calculate_match_xp(MatchOutcome::Win, 0, 1, 2, 0), 150);
    }

    #[test]
    fn test_loss_with_streak_still_counts_streak() {
        assert_eq!(calculate_match_xp(MatchOutcome::Loss, 19, 2, 2, 3), 50 + 1 + 30);
    }

    #[test]
    fn test_coins() {
        // 10 + 50 + 50 + 8 + 100 + 10 + 50
        assert_eq!(calculate_match_coins(MatchOutcome::Win, 100, 80, 1, 4, 2), 278);
        // streak coins only on a win
        assert_eq!(calculate_match_coins(MatchOutcome::Loss, 40, 0, 2, 2, 5), 10 + 20);
    }

    #[test]
    fn test_rating_change_is_symmetric_for_equals() {
        assert_eq!(rating_change(1000, 1000, MatchOutcome::Win, 32.0), 16);
        assert_eq!(rating_change(1000, 1000, MatchOutcome::Loss, 32.0), -16);
        assert_eq!(rating_change(1000, 1000, MatchOutcome::Draw, 32.0), 0);
        assert!(rating_change(1000, 1400, MatchOutcome::Win, 32.0) > 16);
    }

    #[test]
    fn test_validate() {
        assert!(result(MatchOutcome::Win, 1, 2).validate().is_ok());
        assert!(result(MatchOutcome::Win, 1, 1).validate().is_err());
        assert!(result(MatchOutcome::Win, 0, 3).validate().is_err());
        assert!(result(MatchOutcome::Win, 4, 3).validate().is_err());
    }

    #[test]
    fn test_apply_match_uses_streak_going_in() {
        let mut player = Player::new("p1", 1000);
        player.win_streak = 2;
        let settlement = player.apply_match(
            &MatchResult {
                score: 80,
                ..result(MatchOutcome::Win, 1, 4)
            },
            32.0,
        );
        assert_eq!(settlement.xp, 378);
        assert_eq!(player.win_streak, 3);
        assert_eq!(player.best_win_streak, 3);
        assert_eq!(player.wins, 1);
        assert_eq!(player.total_games, 1);
        assert_eq!(player.rating, 1016);
        assert_eq!(player.xp, 378);
    }

    #[test]
    fn test_loss_and_draw_break_win_streak() {
        let mut player = Player::new("p1", 1000);
        player.win_streak = 4;
        player.apply_match(&result(MatchOutcome::Draw, 1, 2), 32.0);
        assert_eq!(player.win_streak, 0);
        assert_eq!(player.draws, 1);

        player.win_streak = 2;
        player.apply_match(&result(MatchOutcome::Loss, 2, 2), 32.0);
        assert_eq!(player.win_streak, 0);
        assert_eq!(player.losses, 1);
    }

    #[test]
    fn test_rating_never_negative() {
        let mut player = Player::new("p1", 5);
        player.apply_match(
            &MatchResult {
                opponent_rating: Some(0),
                ..result(MatchOutcome::Loss, 2, 2)
            },
            32.0,
        );
        assert_eq!(player.rating, 0);
    }

    #[test]
    fn test_match_lifecycle() {
        let mut game = Match::new();
        assert_eq!(game.state(), MatchState::Created);
        assert!(game.resolve(MatchOutcome::Win).is_err());

        game.start().unwrap();
        game.resolve(MatchOutcome::Win).unwrap();
        assert!(game.is_resolved());

        let again = game.resolve(MatchOutcome::Loss);
        assert!(matches!(again, Err(ProgressError::InvalidTransition { .. })));
        assert_eq!(game.state(), MatchState::Resolved(MatchOutcome::Win));
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!("Win".parse::<MatchOutcome>().unwrap(), MatchOutcome::Win);
        assert_eq!("draw".parse::<MatchOutcome>().unwrap(), MatchOutcome::Draw);
        assert!("forfeit".parse::<MatchOutcome>().is_err());
    }
}
