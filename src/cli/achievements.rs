//! Achievements command implementation

use super::Context;

/// List the catalog with unlock state
pub fn achievements_command(ctx: &Context) {
    let statuses = ctx.engine.achievements(&ctx.user);
    let unlocked = statuses.iter().filter(|a| a.unlocked).count();

    println!("Achievements ({}/{}):\n", unlocked, statuses.len());

    for status in &statuses {
        let mark = if status.unlocked { "x" } else { " " };
        println!(
            "  [{}] {} {} - {} (+{} XP, {})",
            mark,
            status.icon,
            status.title,
            status.description,
            status.xp_reward,
            status.category.label()
        );
    }
}
