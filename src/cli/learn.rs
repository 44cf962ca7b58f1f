//! Lesson, quiz, lab and summary commands

use anyhow::Result;

use studyquest::ProgressEvent;

use super::Context;

/// Mark a lesson as completed
pub fn lesson_command(ctx: &Context, lesson_id: &str) -> Result<()> {
    let events = ctx.engine.record_lesson_complete(&ctx.user, lesson_id)?;

    if events.is_empty() {
        println!("Lesson '{}' was already completed.", lesson_id.trim());
    } else {
        println!("Completed lesson '{}'.", lesson_id.trim());
        print_xp(&events);
    }
    Ok(())
}

/// Record a quiz score
pub fn quiz_command(ctx: &Context, score: u32) -> Result<()> {
    let events = ctx.engine.record_quiz_score(&ctx.user, score)?;
    println!("Recorded quiz score {}%.", score);
    print_xp(&events);
    Ok(())
}

/// Mark a virtual lab as completed
pub fn lab_command(ctx: &Context, lab_id: &str, score: u32, time_spent_secs: u64) -> Result<()> {
    let events = ctx
        .engine
        .record_lab_complete(&ctx.user, lab_id, score, time_spent_secs)?;

    if events.is_empty() {
        println!("Lab '{}' was already completed.", lab_id.trim());
    } else {
        println!("Completed lab '{}' with {}%.", lab_id.trim(), score);
        print_xp(&events);
    }
    Ok(())
}

/// Show the progress summary
pub fn summary_command(ctx: &Context) {
    let summary = ctx.engine.summary(&ctx.user);
    let level = &summary.level;

    println!("Progress for {}:\n", ctx.user);
    println!("  Level:        {} ({})", level.level, level.title);
    println!(
        "  XP:           {} ({} to level {}, {:.0}%)",
        summary.total_xp,
        level.xp_to_next_level(),
        level.level + 1,
        level.progress_percent
    );
    println!("  Lessons:      {}", summary.lessons_completed);
    println!("  Labs:         {}", summary.labs_completed);
    println!(
        "  Quizzes:      {} (average {}%)",
        summary.quizzes_taken, summary.average_quiz_score
    );
    println!(
        "  Day streak:   {} (longest {})",
        summary.current_streak, summary.longest_streak
    );
}

fn print_xp(events: &[ProgressEvent]) {
    let xp: u64 = events
        .iter()
        .map(|e| match e {
            ProgressEvent::XpAwarded { amount, .. } => *amount,
            _ => 0,
        })
        .sum();
    if xp > 0 {
        println!("  +{} XP", xp);
    }
}
