//! Reset command implementation

use anyhow::Result;

use super::Context;

/// Delete the learner record, or the player record with `--player`
pub fn reset_command(ctx: &Context, player: bool) -> Result<()> {
    if player {
        ctx.engine.reset_player(&ctx.user)?;
        println!("Player record for {} deleted.", ctx.user);
    } else {
        ctx.engine.reset_progress(&ctx.user)?;
        println!("Learning progress for {} deleted.", ctx.user);
    }
    Ok(())
}
