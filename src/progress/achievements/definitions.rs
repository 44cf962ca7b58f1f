//! Achievement definitions and metadata
//!
//! All achievements are defined here with their unlock conditions and rewards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::progress::models::ProgressSnapshot;

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementId {
    // Combat
    FirstBlood,
    Warrior,
    Gladiator,

    // Streak
    OnFire,
    Unstoppable,
    ConsistentLearner,
    WeekWarrior,

    // Academic
    RisingStar,
    Grandmaster,
    FirstSteps,
    Bookworm,
    Scholar,
    QuizWhiz,
    Perfectionist,
    FirstExperiment,
    LabEnthusiast,
    LabMaster,

    // Social
    FriendlyRival,
    ArenaRegular,
}

impl AchievementId {
    /// Get the string ID used in stored unlock sets
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstBlood => "first_blood",
            Self::Warrior => "warrior",
            Self::Gladiator => "gladiator",
            Self::OnFire => "on_fire",
            Self::Unstoppable => "unstoppable",
            Self::ConsistentLearner => "consistent_learner",
            Self::WeekWarrior => "week_warrior",
            Self::RisingStar => "rising_star",
            Self::Grandmaster => "grandmaster",
            Self::FirstSteps => "first_steps",
            Self::Bookworm => "bookworm",
            Self::Scholar => "scholar",
            Self::QuizWhiz => "quiz_whiz",
            Self::Perfectionist => "perfectionist",
            Self::FirstExperiment => "first_experiment",
            Self::LabEnthusiast => "lab_enthusiast",
            Self::LabMaster => "lab_master",
            Self::FriendlyRival => "friendly_rival",
            Self::ArenaRegular => "arena_regular",
        }
    }

    /// Parse a stored string ID
    pub fn parse(s: &str) -> Option<Self> {
        ACHIEVEMENTS.iter().map(|a| a.id).find(|id| id.as_str() == s)
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Achievement category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Combat,
    Academic,
    Social,
    Streak,
}

impl AchievementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Combat => "Combat",
            Self::Academic => "Academic",
            Self::Social => "Social",
            Self::Streak => "Streaks",
        }
    }
}

/// Unlock condition, a threshold over one snapshot metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Wins(u32),
    WinStreak(u32),
    Rating(u32),
    MatchesPlayed(u32),
    LessonsCompleted(u32),
    QuizzesTaken(u32),
    LabsCompleted(u32),
    /// 100% quizzes and labs combined
    PerfectScores(u32),
    DayStreak(u32),
}

impl Requirement {
    /// Check the condition against a snapshot
    pub fn is_met(&self, snapshot: &ProgressSnapshot) -> bool {
        let value = match self {
            Self::Wins(_) => snapshot.wins,
            Self::WinStreak(_) => snapshot.win_streak,
            Self::Rating(_) => snapshot.rating,
            Self::MatchesPlayed(_) => snapshot.matches_played,
            Self::LessonsCompleted(_) => snapshot.lessons_completed,
            Self::QuizzesTaken(_) => snapshot.quizzes_taken,
            Self::LabsCompleted(_) => snapshot.labs_completed,
            Self::PerfectScores(_) => snapshot.perfect_scores,
            Self::DayStreak(_) => snapshot.day_streak,
        };
        value >= self.threshold()
    }

    pub fn threshold(&self) -> u32 {
        match *self {
            Self::Wins(n)
            | Self::WinStreak(n)
            | Self::Rating(n)
            | Self::MatchesPlayed(n)
            | Self::LessonsCompleted(n)
            | Self::QuizzesTaken(n)
            | Self::LabsCompleted(n)
            | Self::PerfectScores(n)
            | Self::DayStreak(n) => n,
        }
    }
}

/// Achievement definition with all metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub xp_reward: u64,
    pub requirement: Requirement,
}

impl Achievement {
    /// Evaluate the unlock condition
    pub fn condition(&self, snapshot: &ProgressSnapshot) -> bool {
        self.requirement.is_met(snapshot)
    }

    /// Get achievement definition by ID
    pub fn get(id: AchievementId) -> Option<&'static Achievement> {
        ACHIEVEMENTS.iter().find(|a| a.id == id)
    }
}

/// All achievement definitions
pub static ACHIEVEMENTS: &[Achievement] = &[
    // === COMBAT ===
    Achievement {
        id: AchievementId::FirstBlood,
        title: "First Blood",
        description: "Win your first challenge",
        icon: "⚔️",
        category: AchievementCategory::Combat,
        xp_reward: 100,
        requirement: Requirement::Wins(1),
    },
    Achievement {
        id: AchievementId::Warrior,
        title: "Warrior",
        description: "Win 10 challenges",
        icon: "🛡️",
        category: AchievementCategory::Combat,
        xp_reward: 500,
        requirement: Requirement::Wins(10),
    },
    Achievement {
        id: AchievementId::Gladiator,
        title: "Gladiator",
        description: "Win 50 challenges",
        icon: "👑",
        category: AchievementCategory::Combat,
        xp_reward: 2000,
        requirement: Requirement::Wins(50),
    },
    // === STREAK ===
    Achievement {
        id: AchievementId::OnFire,
        title: "On Fire",
        description: "Reach a 3-game win streak",
        icon: "🔥",
        category: AchievementCategory::Streak,
        xp_reward: 300,
        requirement: Requirement::WinStreak(3),
    },
    Achievement {
        id: AchievementId::Unstoppable,
        title: "Unstoppable",
        description: "Reach a 10-game win streak",
        icon: "🚀",
        category: AchievementCategory::Streak,
        xp_reward: 1000,
        requirement: Requirement::WinStreak(10),
    },
    Achievement {
        id: AchievementId::ConsistentLearner,
        title: "Consistent Learner",
        description: "Study 3 days in a row",
        icon: "📆",
        category: AchievementCategory::Streak,
        xp_reward: 30,
        requirement: Requirement::DayStreak(3),
    },
    Achievement {
        id: AchievementId::WeekWarrior,
        title: "Week Warrior",
        description: "Maintain a 7-day streak",
        icon: "📅",
        category: AchievementCategory::Streak,
        xp_reward: 75,
        requirement: Requirement::DayStreak(7),
    },
    // === ACADEMIC ===
    Achievement {
        id: AchievementId::RisingStar,
        title: "Rising Star",
        description: "Reach 1200 rating",
        icon: "⭐",
        category: AchievementCategory::Academic,
        xp_reward: 200,
        requirement: Requirement::Rating(1200),
    },
    Achievement {
        id: AchievementId::Grandmaster,
        title: "Grandmaster",
        description: "Reach 1500 rating",
        icon: "🎓",
        category: AchievementCategory::Academic,
        xp_reward: 5000,
        requirement: Requirement::Rating(1500),
    },
    Achievement {
        id: AchievementId::FirstSteps,
        title: "First Steps",
        description: "Complete your first lesson",
        icon: "🌱",
        category: AchievementCategory::Academic,
        xp_reward: 25,
        requirement: Requirement::LessonsCompleted(1),
    },
    Achievement {
        id: AchievementId::Bookworm,
        title: "Bookworm",
        description: "Complete 5 lessons",
        icon: "📚",
        category: AchievementCategory::Academic,
        xp_reward: 50,
        requirement: Requirement::LessonsCompleted(5),
    },
    Achievement {
        id: AchievementId::Scholar,
        title: "Scholar",
        description: "Complete 25 lessons",
        icon: "🏛️",
        category: AchievementCategory::Academic,
        xp_reward: 150,
        requirement: Requirement::LessonsCompleted(25),
    },
    Achievement {
        id: AchievementId::QuizWhiz,
        title: "Quiz Whiz",
        description: "Complete your first quiz",
        icon: "🧠",
        category: AchievementCategory::Academic,
        xp_reward: 25,
        requirement: Requirement::QuizzesTaken(1),
    },
    Achievement {
        id: AchievementId::Perfectionist,
        title: "Perfectionist",
        description: "Score 100% on a quiz or lab",
        icon: "💯",
        category: AchievementCategory::Academic,
        xp_reward: 50,
        requirement: Requirement::PerfectScores(1),
    },
    Achievement {
        id: AchievementId::FirstExperiment,
        title: "First Experiment",
        description: "Complete your first virtual lab",
        icon: "🧪",
        category: AchievementCategory::Academic,
        xp_reward: 25,
        requirement: Requirement::LabsCompleted(1),
    },
    Achievement {
        id: AchievementId::LabEnthusiast,
        title: "Lab Enthusiast",
        description: "Complete 5 virtual labs",
        icon: "🔬",
        category: AchievementCategory::Academic,
        xp_reward: 75,
        requirement: Requirement::LabsCompleted(5),
    },
    Achievement {
        id: AchievementId::LabMaster,
        title: "Lab Master",
        description: "Complete 10 virtual labs",
        icon: "🏆",
        category: AchievementCategory::Academic,
        xp_reward: 150,
        requirement: Requirement::LabsCompleted(10),
    },
    // === SOCIAL ===
    Achievement {
        id: AchievementId::FriendlyRival,
        title: "Friendly Rival",
        description: "Play 5 challenges",
        icon: "🤝",
        category: AchievementCategory::Social,
        xp_reward: 50,
        requirement: Requirement::MatchesPlayed(5),
    },
    Achievement {
        id: AchievementId::ArenaRegular,
        title: "Arena Regular",
        description: "Play 25 challenges",
        icon: "🏟️",
        category: AchievementCategory::Social,
        xp_reward: 150,
        requirement: Requirement::MatchesPlayed(25),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::mem::discriminant;

    #[test]
    fn test_ids_are_unique_and_parse_back() {
        let mut seen = HashSet::new();
        for achievement in ACHIEVEMENTS {
            assert!(seen.insert(achievement.id.as_str()), "duplicate {}", achievement.id);
            assert_eq!(AchievementId::parse(achievement.id.as_str()), Some(achievement.id));
            assert!(achievement.xp_reward > 0);
        }
        assert_eq!(AchievementId::parse("no_such_badge"), None);
    }

    #[test]
    fn test_tiers_are_strictly_increasing() {
        for (i, lower) in ACHIEVEMENTS.iter().enumerate() {
            for higher in &ACHIEVEMENTS[i + 1..] {
                let same_tier_line = lower.category == higher.category
                    && discriminant(&lower.requirement) == discriminant(&higher.requirement);
                if same_tier_line {
                    assert!(
                        higher.requirement.threshold() > lower.requirement.threshold(),
                        "{} must require more than {}",
                        higher.id,
                        lower.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_requirement_thresholds() {
        let snapshot = ProgressSnapshot {
            wins: 10,
            rating: 1199,
            ..Default::default()
        };
        assert!(Requirement::Wins(10).is_met(&snapshot));
        assert!(!Requirement::Wins(11).is_met(&snapshot));
        assert!(!Requirement::Rating(1200).is_met(&snapshot));
    }

    #[test]
    fn test_lab_badges() {
        let snapshot = ProgressSnapshot {
            labs_completed: 5,
            perfect_scores: 1,
            ..Default::default()
        };
        let met: Vec<_> = ACHIEVEMENTS
            .iter()
            .filter(|a| a.condition(&snapshot))
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(met, vec!["perfectionist", "first_experiment", "lab_enthusiast"]);
    }
}
