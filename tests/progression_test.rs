//! Integration tests for the progression engine over a SQLite record store

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use studyquest::progress::achievements::{level_for_xp, xp_for_next_level};
use studyquest::progress::{
    AchievementId, CollectingSink, FixedClock, Match, MatchOutcome, MatchResult, MatchState,
    ProgressError, ProgressEvent, ProgressionEngine, RecordStore, SqliteStore,
    calculate_match_xp,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fresh engine on `date` over the database in `dir`, as a new CLI run would open it
fn engine_at(dir: &Path, date: NaiveDate) -> ProgressionEngine<SqliteStore> {
    let store = SqliteStore::open(&dir.join("progress.db")).expect("Failed to open store");
    ProgressionEngine::new(store).with_clock(FixedClock(date))
}

fn win(score: u32, rank: u32, total_players: u32) -> MatchResult {
    MatchResult {
        outcome: MatchOutcome::Win,
        score,
        rank,
        total_players,
        accuracy: 0,
        opponent_rating: None,
    }
}

fn play(
    engine: &ProgressionEngine<SqliteStore>,
    user: &str,
    result: &MatchResult,
) -> studyquest::progress::MatchReward {
    let mut game = Match::new();
    game.start().unwrap();
    let reward = engine.resolve_match(user, &mut game, result).unwrap();
    assert_eq!(game.state(), MatchState::Resolved(result.outcome));
    reward
}

#[test]
fn test_lesson_completion_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    engine.record_lesson_complete("ama", "fractions-1").unwrap();
    let once = engine.progress("ama");

    let events = engine.record_lesson_complete("ama", "fractions-1").unwrap();
    assert!(events.is_empty());

    let twice = engine.progress("ama");
    assert_eq!(twice.completed_lessons, once.completed_lessons);
    assert_eq!(twice.total_xp, once.total_xp);
    assert!(engine.is_lesson_completed("ama", "fractions-1"));
    assert!(!engine.is_lesson_completed("ama", "fractions-2"));
}

#[test]
fn test_level_curve_boundaries() {
    let mut previous = level_for_xp(0);
    for xp in (0..50_000).step_by(7) {
        let level = level_for_xp(xp);
        assert!(level >= previous, "level dropped at {xp} XP");
        previous = level;
    }

    for level in 1..200 {
        let next = xp_for_next_level(level);
        assert_eq!(level_for_xp(next - 1), level);
        assert_eq!(level_for_xp(next), level + 1);
    }
}

#[test]
fn test_streak_across_days_and_reopen() {
    let dir = TempDir::new().unwrap();

    // Crosses a month boundary
    engine_at(dir.path(), day(2024, 9, 29))
        .record_lesson_complete("ama", "a")
        .unwrap();
    let second = engine_at(dir.path(), day(2024, 9, 30));
    second.record_lesson_complete("ama", "b").unwrap();
    assert_eq!(second.summary("ama").current_streak, 2);

    let third = engine_at(dir.path(), day(2024, 10, 1));
    let events = third.record_lesson_complete("ama", "c").unwrap();
    assert!(events.contains(&ProgressEvent::StreakExtended { days: 3 }));
    assert!(events.contains(&ProgressEvent::StreakMilestone { days: 3 }));

    let summary = third.summary("ama");
    assert_eq!(summary.current_streak, 3);
    assert_eq!(summary.longest_streak, 3);
    // 3 lessons + first_steps + consistent_learner
    assert_eq!(summary.total_xp, 30 + 25 + 30);

    // Gap of one full day: reads show the streak as broken
    let later = engine_at(dir.path(), day(2024, 10, 3));
    assert_eq!(later.summary("ama").current_streak, 0);

    // and the next activity starts over
    later.record_quiz_score("ama", 80).unwrap();
    let summary = later.summary("ama");
    assert_eq!(summary.current_streak, 1);
    assert_eq!(summary.longest_streak, 3);
}

#[test]
fn test_achievements_unlock_once() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    engine.record_quiz_score("ama", 100).unwrap();
    let record = engine.progress("ama");
    assert!(record.unlocked_achievements.contains("quiz_whiz"));
    assert!(record.unlocked_achievements.contains("perfectionist"));
    let xp = record.total_xp;
    assert_eq!(xp, 25 + 50);

    assert!(engine.evaluate_achievements("ama").unwrap().is_empty());
    engine.record_quiz_score("ama", 100).unwrap();

    let record = engine.progress("ama");
    assert_eq!(record.total_xp, xp);
    assert_eq!(record.unlocked_achievements.len(), 2);
}

#[test]
fn test_summary_without_quizzes() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    let summary = engine.summary("nobody");
    assert_eq!(summary.quizzes_taken, 0);
    assert_eq!(summary.average_quiz_score, 0);
    assert_eq!(summary.level.level, 1);

    engine.record_lesson_complete("ama", "a").unwrap();
    assert_eq!(engine.summary("ama").average_quiz_score, 0);

    engine.record_quiz_score("ama", 70).unwrap();
    engine.record_quiz_score("ama", 75).unwrap();
    assert_eq!(engine.summary("ama").average_quiz_score, 73);
}

#[test]
fn test_labs_feed_streak_and_badges() {
    let dir = TempDir::new().unwrap();

    for (i, date) in (1..=7).map(|d| day(2024, 9, d)).enumerate() {
        let engine = engine_at(dir.path(), date);
        engine
            .record_lab_complete("ama", &format!("lab-{i}"), 60, 3000)
            .unwrap();
    }

    let engine = engine_at(dir.path(), day(2024, 9, 7));
    let record = engine.progress("ama");
    for id in ["first_experiment", "lab_enthusiast", "consistent_learner", "week_warrior"] {
        assert!(record.unlocked_achievements.contains(id), "missing {id}");
    }
    assert!(!record.unlocked_achievements.contains("lab_master"));
    assert_eq!(engine.summary("ama").current_streak, 7);
    // 7 labs at 60 + no speed bonus, then 25 + 75 + 30 + 75
    assert_eq!(record.total_xp, 7 * 60 + 25 + 75 + 30 + 75);
    assert!(engine.is_lab_completed("ama", "lab-0"));
    assert!(!engine.is_lab_completed("ama", "lab-7"));
}

#[test]
fn test_match_xp_scenarios() {
    assert_eq!(calculate_match_xp(MatchOutcome::Win, 80, 1, 4, 2), 378);
    assert_eq!(calculate_match_xp(MatchOutcome::Draw, 50, 2, 2, 0), 85);
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    assert!(matches!(
        engine.record_lesson_complete("ama", "   "),
        Err(ProgressError::InvalidLessonId)
    ));
    assert!(matches!(
        engine.record_quiz_score("ama", 101),
        Err(ProgressError::ScoreOutOfRange { score: 101 })
    ));
    assert_eq!(engine.store().get("progress:ama").unwrap(), None);
}

#[test]
fn test_match_feeds_player_record() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    let mut result = win(80, 1, 4);
    result.accuracy = 90;
    let reward = play(&engine, "ama", &result);

    // 50 + 100 + 8 + 200, no streak going in
    assert_eq!(reward.xp, 358);
    assert_eq!(reward.unlocked, vec![AchievementId::FirstBlood]);
    assert_eq!(reward.achievement_xp, 100);
    // 10 + 50 + 45 + 8 + 100
    assert_eq!(reward.coins, 213);
    assert_eq!(reward.rating_change, 16);

    let level_up = reward.level_up.expect("458 XP is level 3");
    assert_eq!((level_up.old_level, level_up.new_level), (1, 3));

    let player = engine.player("ama");
    assert_eq!(player, reward.player);
    assert_eq!(player.xp, 458);
    assert_eq!(player.rating, 1016);
    assert_eq!(player.win_streak, 1);
    assert_eq!(player.total_games, 1);

    // Streak going into the second match is 1
    let reward = play(&engine, "ama", &win(0, 2, 2));
    assert_eq!(reward.xp, 50 + 100 + 10);

    let reward = play(&engine, "ama", &win(0, 2, 2));
    assert_eq!(reward.unlocked, vec![AchievementId::OnFire]);

    let loss = MatchResult {
        outcome: MatchOutcome::Loss,
        ..win(0, 2, 2)
    };
    let reward = play(&engine, "ama", &loss);
    assert!(reward.rating_change < 0);
    assert_eq!(reward.player.win_streak, 0);
    assert_eq!(reward.player.best_win_streak, 3);
    assert_eq!(reward.player.losses, 1);

    // The learning record is separate
    assert_eq!(engine.summary("ama").total_xp, 0);
}

#[test]
fn test_match_resolves_exactly_once() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    let mut game = Match::new();
    game.start().unwrap();

    let invalid = win(10, 0, 2);
    assert!(matches!(
        engine.resolve_match("ama", &mut game, &invalid),
        Err(ProgressError::InvalidMatch(_))
    ));
    assert_eq!(game.state(), MatchState::InProgress);

    engine.resolve_match("ama", &mut game, &win(10, 1, 2)).unwrap();
    let after_first = engine.player("ama");

    assert!(matches!(
        engine.resolve_match("ama", &mut game, &win(10, 1, 2)),
        Err(ProgressError::InvalidTransition { .. })
    ));
    assert_eq!(engine.player("ama"), after_first);
    assert_eq!(after_first.total_games, 1);
}

#[test]
fn test_leaderboard_orders_by_rating() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    play(&engine, "ama", &win(10, 1, 2));
    play(
        &engine,
        "ben",
        &MatchResult {
            outcome: MatchOutcome::Loss,
            ..win(10, 2, 2)
        },
    );
    play(
        &engine,
        "cleo",
        &MatchResult {
            outcome: MatchOutcome::Draw,
            ..win(10, 1, 2)
        },
    );
    // Learners without a player record are not listed
    engine.record_lesson_complete("dana", "a").unwrap();

    let top: Vec<_> = engine
        .leaderboard(2)
        .unwrap()
        .into_iter()
        .map(|p| p.user_id)
        .collect();
    assert_eq!(top, vec!["ama", "cleo"]);
    assert_eq!(engine.leaderboard(10).unwrap().len(), 3);
}

#[test]
fn test_achievement_listing_merges_records() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    engine.record_lesson_complete("ama", "a").unwrap();
    play(&engine, "ama", &win(10, 1, 2));

    let statuses = engine.achievements("ama");
    assert_eq!(statuses.len(), studyquest::progress::ACHIEVEMENTS.len());

    let unlocked: Vec<_> = statuses
        .iter()
        .filter(|s| s.unlocked)
        .map(|s| s.id)
        .collect();
    assert_eq!(unlocked, vec!["first_blood", "first_steps"]);
}

#[test]
fn test_corrupted_record_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));
    engine.store().put("progress:ama", "{\"totalXP\": \"lots\"").unwrap();

    assert_eq!(engine.summary("ama").total_xp, 0);
    engine.record_lesson_complete("ama", "a").unwrap();

    let reopened = engine_at(dir.path(), day(2024, 9, 29));
    assert_eq!(reopened.summary("ama").lessons_completed, 1);
}

#[test]
fn test_reset_removes_only_one_record() {
    let dir = TempDir::new().unwrap();
    let engine = engine_at(dir.path(), day(2024, 9, 29));

    engine.record_lesson_complete("ama", "a").unwrap();
    play(&engine, "ama", &win(10, 1, 2));

    engine.reset_progress("ama").unwrap();
    assert_eq!(engine.summary("ama").lessons_completed, 0);
    assert_eq!(engine.player("ama").wins, 1);

    engine.reset_player("ama").unwrap();
    let player = engine.player("ama");
    assert_eq!(player.wins, 0);
    assert_eq!(player.rating, 1000);
}

#[test]
fn test_events_reach_sink_after_save() {
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(CollectingSink::new());
    let engine = engine_at(dir.path(), day(2024, 9, 29)).with_sink(sink.clone());

    engine.record_lesson_complete("ama", "a").unwrap();

    let delivered = sink.take();
    assert!(delivered.iter().all(|(user, _)| user == "ama"));
    let events: Vec<_> = delivered.into_iter().map(|(_, e)| e).collect();
    assert_eq!(
        events.first(),
        Some(&ProgressEvent::LessonCompleted {
            lesson_id: "a".to_string()
        })
    );
    assert!(events.iter().any(|e| matches!(
        e,
        ProgressEvent::AchievementUnlocked(a) if a.id == AchievementId::FirstSteps
    )));
    assert!(!events.iter().any(|e| matches!(e, ProgressEvent::LevelUp(_))));

    // Repeats notify nothing
    engine.record_lesson_complete("ama", "a").unwrap();
    assert!(sink.take().is_empty());
}
