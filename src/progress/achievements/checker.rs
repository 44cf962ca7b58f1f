//! Achievement checking logic
//!
//! Walks the static catalog and reports entries whose condition now holds.

use std::collections::BTreeSet;

use super::definitions::{ACHIEVEMENTS, Achievement, AchievementId};
use crate::progress::models::ProgressSnapshot;

/// Return the IDs of achievements satisfied by `snapshot` that are not yet in `unlocked`.
///
/// Catalog order is preserved. The catalog is never modified, so calling this again
/// with the returned IDs merged into `unlocked` yields nothing new.
pub fn check_achievements(
    snapshot: &ProgressSnapshot,
    unlocked: &BTreeSet<String>,
) -> Vec<AchievementId> {
    newly_satisfied(ACHIEVEMENTS, snapshot, unlocked)
}

fn newly_satisfied(
    catalog: &[Achievement],
    snapshot: &ProgressSnapshot,
    unlocked: &BTreeSet<String>,
) -> Vec<AchievementId> {
    catalog
        .iter()
        .filter(|a| !unlocked.contains(a.id.as_str()))
        .filter(|a| a.condition(snapshot))
        .map(|a| a.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(found: &[AchievementId]) -> Vec<&'static str> {
        found.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_fresh_snapshot_unlocks_nothing() {
        let found = check_achievements(&ProgressSnapshot::default(), &BTreeSet::new());
        assert!(found.is_empty());
    }

    #[test]
    fn test_combat_tiers() {
        let snapshot = ProgressSnapshot {
            wins: 10,
            ..Default::default()
        };
        let found = check_achievements(&snapshot, &BTreeSet::new());
        assert_eq!(ids(&found), vec!["first_blood", "warrior"]);
    }

    #[test]
    fn test_already_unlocked_is_skipped() {
        let snapshot = ProgressSnapshot {
            wins: 1,
            win_streak: 3,
            ..Default::default()
        };
        let unlocked: BTreeSet<String> = ["first_blood".to_string()].into();
        let found = check_achievements(&snapshot, &unlocked);
        assert_eq!(ids(&found), vec!["on_fire"]);
    }

    #[test]
    fn test_repeat_evaluation_is_idempotent() {
        let snapshot = ProgressSnapshot {
            lessons_completed: 5,
            quizzes_taken: 2,
            perfect_scores: 1,
            day_streak: 7,
            rating: 1500,
            ..Default::default()
        };
        let mut unlocked = BTreeSet::new();
        let first = check_achievements(&snapshot, &unlocked);
        assert!(!first.is_empty());

        unlocked.extend(first.iter().map(|id| id.as_str().to_string()));
        let second = check_achievements(&snapshot, &unlocked);
        assert!(second.is_empty());
    }

    #[test]
    fn test_learning_and_rating_badges() {
        let snapshot = ProgressSnapshot {
            lessons_completed: 1,
            quizzes_taken: 1,
            rating: 1200,
            ..Default::default()
        };
        let found = check_achievements(&snapshot, &BTreeSet::new());
        assert_eq!(ids(&found), vec!["rising_star", "first_steps", "quiz_whiz"]);
    }
}
