use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Reminder,
    Confirmation,
    Rescheduling,
    FollowUp,
    Marketing,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Reminder => "reminder",
            TemplateCategory::Confirmation => "confirmation",
            TemplateCategory::Rescheduling => "rescheduling",
            TemplateCategory::FollowUp => "follow_up",
            TemplateCategory::Marketing => "marketing",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reminder" => Ok(TemplateCategory::Reminder),
            "confirmation" => Ok(TemplateCategory::Confirmation),
            "rescheduling" => Ok(TemplateCategory::Rescheduling),
            "follow_up" => Ok(TemplateCategory::FollowUp),
            "marketing" => Ok(TemplateCategory::Marketing),
            other => Err(format!("unknown template category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: Uuid,
    pub name: String,
    pub category: TemplateCategory,
    pub subject: String,
    pub content: String,
    pub variables: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub category: TemplateCategory,
    pub subject: String,
    pub content: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub category: Option<TemplateCategory>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewTemplateRequest {
    pub appointment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewTemplateResponse {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTemplateRequest {
    pub appointment_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkReminderRequest {
    pub appointment_ids: Vec<Uuid>,
    /// Only `reminder` and `confirmation` have a built-in text.
    #[serde(default = "default_bulk_category")]
    pub category: TemplateCategory,
}

fn default_bulk_category() -> TemplateCategory {
    TemplateCategory::Reminder
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReport {
    pub sent: usize,
    pub failed: usize,
}
