//! Points, levels, visit streaks and badges for patients.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::gamification::{Achievement, AchievementKind, Badge, Progress};

pub const POINTS_PER_LEVEL: u32 = 100;
pub const RECENT_ACHIEVEMENTS: usize = 10;
/// Largest single award accepted from clients.
pub const MAX_POINTS_PER_AWARD: u32 = 10_000;
/// Totals are stored in a signed 32-bit column.
pub const MAX_TOTAL_POINTS: u32 = i32::MAX as u32;

/// Static description of an earnable badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const FIRST_APPOINTMENT: &str = "first-appointment";
pub const PREVENTIVE_CARE: &str = "preventive-care";
pub const STREAK_7: &str = "streak-7";
pub const EARLY_BIRD: &str = "early-bird";
pub const HEALTH_CHAMPION: &str = "health-champion";

pub const DEFAULT_BADGES: [BadgeDefinition; 5] = [
    BadgeDefinition {
        key: FIRST_APPOINTMENT,
        name: "Primeiro Passo",
        description: "Primeira consulta agendada",
        icon: "🎯",
    },
    BadgeDefinition {
        key: PREVENTIVE_CARE,
        name: "Cuidado Preventivo",
        description: "3 limpezas realizadas",
        icon: "🦷",
    },
    BadgeDefinition {
        key: STREAK_7,
        name: "Compromissado",
        description: "7 consultas consecutivas",
        icon: "🔥",
    },
    BadgeDefinition {
        key: EARLY_BIRD,
        name: "Madrugador",
        description: "5 consultas antes das 9h",
        icon: "🌅",
    },
    BadgeDefinition {
        key: HEALTH_CHAMPION,
        name: "Campeão da Saúde",
        description: "Completou todos os desafios do mês",
        icon: "🏆",
    },
];

pub fn badge_definition(key: &str) -> Option<&'static BadgeDefinition> {
    DEFAULT_BADGES.iter().find(|b| b.key == key)
}

pub fn level_for(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

impl Progress {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_points: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            next_level_points: POINTS_PER_LEVEL,
            recent_achievements: Vec::new(),
        }
    }

    /// Credits points, recomputes the level and records the achievement
    /// at the head of the recent list.
    pub fn add_points(
        &mut self,
        points: u32,
        description: impl Into<String>,
        kind: AchievementKind,
        now: DateTime<Utc>,
    ) -> &Achievement {
        self.total_points = self.total_points.saturating_add(points).min(MAX_TOTAL_POINTS);
        self.level = level_for(self.total_points);
        self.next_level_points = self.level.saturating_mul(POINTS_PER_LEVEL);

        self.recent_achievements.insert(
            0,
            Achievement {
                id: Uuid::new_v4(),
                kind,
                points,
                description: description.into(),
                date: now,
            },
        );
        self.recent_achievements.truncate(RECENT_ACHIEVEMENTS);
        &self.recent_achievements[0]
    }

    /// Extends the streak on a kept appointment, resets it on a missed one.
    pub fn record_visit(&mut self, increment: bool) {
        self.current_streak = if increment { self.current_streak.saturating_add(1) } else { 0 };
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }
}

impl BadgeDefinition {
    pub fn locked(&self, user_id: &str) -> Badge {
        Badge {
            id: None,
            user_id: user_id.to_string(),
            badge_key: self.key.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            earned: false,
            earned_at: None,
        }
    }
}

/// Full badge list for display: awarded badges as stored, the rest locked.
pub fn badge_board(user_id: &str, awarded: &[Badge]) -> Vec<Badge> {
    DEFAULT_BADGES
        .iter()
        .map(|definition| {
            awarded
                .iter()
                .find(|b| b.badge_key == definition.key)
                .cloned()
                .unwrap_or_else(|| definition.locked(user_id))
        })
        .collect()
}

fn is_early(time: &str) -> bool {
    time.split(':')
        .next()
        .and_then(|h| h.parse::<u32>().ok())
        .is_some_and(|hour| hour < 9)
}

/// Badge keys the patient qualifies for, given their progress and appointment history.
pub fn badges_earned(progress: &Progress, history: &[Appointment]) -> Vec<&'static str> {
    let kept: Vec<&Appointment> = history
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .collect();

    let cleanings = kept
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .filter(|a| a.service.to_lowercase().contains("limpeza"))
        .count();
    let early = kept.iter().filter(|a| is_early(&a.time)).count();

    let mut earned = Vec::new();
    if !kept.is_empty() {
        earned.push(FIRST_APPOINTMENT);
    }
    if cleanings >= 3 {
        earned.push(PREVENTIVE_CARE);
    }
    if progress.longest_streak >= 7 {
        earned.push(STREAK_7);
    }
    if early >= 5 {
        earned.push(EARLY_BIRD);
    }
    if earned.len() == DEFAULT_BADGES.len() - 1 {
        earned.push(HEALTH_CHAMPION);
    }
    earned
}
