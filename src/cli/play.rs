//! Match, player and leaderboard commands

use anyhow::Result;

use studyquest::{Match, MatchResult};

use super::Context;

/// Play out a match record and apply the result
pub fn match_command(ctx: &Context, result: &MatchResult) -> Result<()> {
    let mut game = Match::new();
    game.start()?;
    let reward = ctx.engine.resolve_match(&ctx.user, &mut game, result)?;

    println!("Match {} ({}):", game.id, game.state());
    println!("  +{} XP", reward.xp);
    if reward.achievement_xp > 0 {
        println!("  +{} XP from achievements", reward.achievement_xp);
    }
    println!("  +{} coins", reward.coins);
    println!(
        "  Rating: {} ({:+})",
        reward.player.rating, reward.rating_change
    );
    if let Some(level_up) = &reward.level_up {
        println!(
            "  Level up: {} -> {} ({})",
            level_up.old_level, level_up.new_level, level_up.new_title
        );
    }
    Ok(())
}

/// Show the player record
pub fn player_command(ctx: &Context) {
    let player = ctx.engine.player(&ctx.user);
    let level = player.level();

    println!("Player {}:\n", player.user_id);
    println!("  Rating:       {}", player.rating);
    println!("  Level:        {} ({}), {} XP", level.level, level.title, player.xp);
    println!(
        "  Games:        {} ({} W / {} L / {} D)",
        player.total_games, player.wins, player.losses, player.draws
    );
    println!(
        "  Win streak:   {} (best {})",
        player.win_streak, player.best_win_streak
    );
    println!("  Coins:        {}", player.coins);
    println!("  Achievements: {}", player.achievements.len());
}

/// Show the top players by rating
pub fn leaderboard_command(ctx: &Context, limit: usize) -> Result<()> {
    let players = ctx.engine.leaderboard(limit)?;

    if players.is_empty() {
        println!("No players yet.");
        return Ok(());
    }

    println!("Leaderboard ({}):\n", players.len());
    for (i, player) in players.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:>5}  {} W / {} games",
            i + 1,
            player.user_id,
            player.rating,
            player.wins,
            player.total_games
        );
    }
    Ok(())
}
