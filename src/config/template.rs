//! Commented default configuration file

/// Default configuration content written by `studyquest init` and on first load
pub const DEFAULT_CONFIG: &str = r#"# StudyQuest Configuration
# ========================
#
# Every key is optional; removed keys fall back to the defaults shown here.

# ============================================================================
# STORE - Where progress and player records are kept
# ============================================================================

[store]
# SQLite database file (default: ~/.studyquest/progress.db)
# path = "/home/me/.studyquest/progress.db"

# ============================================================================
# PROFILE
# ============================================================================

[profile]
# User ID used when --user is not given
default_user = "local"

# ============================================================================
# RATING - Elo parameters for competitive matches
# ============================================================================

[rating]
# Rating of a newly created player
initial = 1000
# Maximum rating change per match
k_factor = 32.0

# ============================================================================
# NOTIFICATIONS - Achievement, level-up and streak announcements
# ============================================================================

[notifications]
enabled = true
# Daily streak lengths announced as milestones
streak_milestones = [3, 7, 14, 30]
"#;
