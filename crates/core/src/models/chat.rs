use serde::{Deserialize, Serialize};

use super::appointment::Appointment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
    pub provider: String,
}

/// Chatbot output relayed back from the webhook workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAppointmentData {
    pub output: String,
    pub session_id: Option<String>,
    pub thread_id: Option<String>,
    pub timestamp: Option<String>,
    pub user_phone: Option<String>,
}

/// Fields recovered from free-form chatbot output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAppointment {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
    pub clinic: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub is_appointment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookProcessResponse {
    pub parsed: ParsedAppointment,
    pub created: Option<Appointment>,
}
