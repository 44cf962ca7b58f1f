//! Level command implementation

use studyquest::LevelInfo;

/// Show the level for an XP total
pub fn level_command(xp: u64) {
    let info = LevelInfo::for_xp(xp);
    println!("{} XP -> level {} ({})", xp, info.level, info.title);
    println!(
        "  Level range: {} - {} XP ({:.0}% through, {} to go)",
        info.xp_for_current_level,
        info.xp_for_next_level,
        info.progress_percent,
        info.xp_to_next_level()
    );
}
