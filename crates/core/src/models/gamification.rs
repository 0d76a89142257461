use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    /// `None` until the badge has been awarded.
    pub id: Option<Uuid>,
    pub user_id: String,
    pub badge_key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Appointment,
    Preventive,
    Streak,
    Challenge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: Uuid,
    pub kind: AchievementKind,
    pub points: u32,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub user_id: String,
    pub total_points: u32,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub next_level_points: u32,
    pub recent_achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPointsRequest {
    pub points: u32,
    pub description: String,
    pub kind: AchievementKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRequest {
    #[serde(default = "default_increment")]
    pub increment: bool,
}

fn default_increment() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardBadgeRequest {
    pub badge_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationResponse {
    pub progress: Progress,
    pub badges: Vec<Badge>,
}
