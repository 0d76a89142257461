use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::theme::{Theme, ThemePreference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub auth_user_id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub theme: ThemePreference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub auth_user_id: String,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateThemeRequest {
    pub preference: ThemePreference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub preference: ThemePreference,
    pub current: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffLoginResponse {
    pub username: String,
    pub is_master: bool,
    pub clinic_name: Option<String>,
}
