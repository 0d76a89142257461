//! Transactional email.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::IntegrationError;

pub const RESEND_API_URL: &str = "https://api.resend.com/emails";
pub const PASSWORD_RESET_SUBJECT: &str = "🦷 Redefinir Senha - Senhor Sorriso";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the email and returns the provider's response body.
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, IntegrationError>;
}

pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Option<String>,
    from: String,
    url: String,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

impl ResendMailer {
    pub fn new(client: reqwest::Client, api_key: Option<String>, from: String) -> Self {
        Self {
            client,
            api_key,
            from,
            url: RESEND_API_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, IntegrationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(IntegrationError::NotConfigured("RESEND_API_KEY"))?;

        tracing::info!("Sending email to {} recipient(s): {}", email.to.len(), email.subject);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&ResendRequest {
                from: &self.from,
                to: &email.to,
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await
            .map_err(IntegrationError::from_send)?;

        IntegrationError::check(response)
            .await?
            .json()
            .await
            .map_err(|e| IntegrationError::Decode(e.to_string()))
    }
}

/// Password reset email with the link valid for one hour.
pub fn password_reset_email(to: &str, reset_url: &str) -> OutgoingEmail {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Redefinir Senha</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="text-align: center; margin-bottom: 30px;">
    <h1 style="color: #0ea5e9; margin-bottom: 10px;">🦷 Senhor Sorriso</h1>
    <h2 style="color: #64748b; font-weight: normal;">Redefinição de Senha</h2>
  </div>
  <div style="background-color: #f8fafc; padding: 30px; border-radius: 10px; border-left: 4px solid #0ea5e9;">
    <p style="font-size: 16px;">Olá! 👋</p>
    <p style="font-size: 16px;">Recebemos uma solicitação para redefinir a senha da sua conta no <strong>Senhor Sorriso</strong>.</p>
    <div style="text-align: center; margin: 30px 0;">
      <a href="{url}" style="background-color: #0ea5e9; color: white; padding: 15px 30px; text-decoration: none; border-radius: 5px; font-weight: bold; display: inline-block;">🔑 Redefinir Minha Senha</a>
    </div>
    <p style="font-size: 14px; color: #64748b;"><strong>Ou copie e cole este link no seu navegador:</strong></p>
    <p style="background-color: #e2e8f0; padding: 10px; border-radius: 5px; font-family: monospace; font-size: 12px; word-break: break-all;">{url}</p>
    <p style="font-size: 14px; color: #64748b;">⏰ Este link é válido por <strong>1 hora</strong> após o envio deste email.</p>
  </div>
  <div style="margin-top: 30px; padding: 20px; background-color: #fef2f2; border-radius: 10px; border-left: 4px solid #ef4444;">
    <p style="font-size: 14px; color: #dc2626; margin: 0;"><strong>⚠️ Importante:</strong> Se você não solicitou esta redefinição de senha, pode ignorar este email com segurança. Sua conta permanecerá protegida.</p>
  </div>
  <div style="text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #e2e8f0;">
    <p style="font-size: 12px; color: #94a3b8; margin: 0;">Este email foi enviado pelo sistema <strong>Senhor Sorriso</strong><br>Sistema de agendamento odontológico inteligente</p>
  </div>
</body>
</html>"#,
        url = escape_attr(reset_url)
    );

    OutgoingEmail {
        to: vec![to.to_string()],
        subject: PASSWORD_RESET_SUBJECT.to_string(),
        html,
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
