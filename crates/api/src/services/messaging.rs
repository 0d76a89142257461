//! Outbound WhatsApp messages built from appointments.
//!
//! Every send here is a secondary effect: failures are logged and counted,
//! never propagated.

use std::time::Duration;

use sorriso_core::{
    models::{appointment::Appointment, template::SendReport},
    templates,
};
use sorriso_integrations::webhook::{MessageSender, WebhookMessage};

/// How many recipients a paced send can reach inside `timeout`, keeping a
/// fifth of it for the sends themselves. `None` when nothing bounds it.
pub fn max_recipients(interval: Duration, timeout: Duration) -> Option<usize> {
    if interval.is_zero() || timeout.is_zero() {
        return None;
    }
    let budget = timeout.as_millis() * 4 / 5;
    Some((budget / interval.as_millis()) as usize + 1)
}

/// Renders `content` for each appointment and sends it, pausing `interval`
/// between recipients.
pub async fn send_to_appointments(
    sender: &dyn MessageSender,
    appointments: &[Appointment],
    content: &str,
    interval: Duration,
    session_prefix: &str,
) -> SendReport {
    let mut report = SendReport::default();

    for (index, appointment) in appointments.iter().enumerate() {
        if index > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }

        let message = WebhookMessage::new(
            appointment.phone.clone(),
            templates::render(content, appointment),
            format!("{}_{}", session_prefix, appointment.id),
        )
        .with_name(appointment.name.clone());

        match sender.send(&message).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                tracing::warn!("Failed to message {} for {}: {}", appointment.phone, appointment.id, e);
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        "Bulk send finished: {} sent, {} failed",
        report.sent,
        report.failed
    );
    report
}

fn clinic_notice(appointment: &Appointment) -> String {
    format!(
        "📋 Novo agendamento\n\n👤 Paciente: {}\n📞 Telefone: {}\n⚕️ Serviço: {}\n📅 Data: {} às {}\n🏥 Clínica: {}",
        appointment.name,
        appointment.phone,
        appointment.service,
        appointment.date.format("%d/%m/%Y"),
        appointment.time,
        appointment.clinic,
    )
}

/// Confirms a new booking to the patient and, when configured, tells the clinic.
pub async fn notify_booking(
    sender: &dyn MessageSender,
    appointment: &Appointment,
    clinic_phone: Option<&str>,
) {
    let session = format!("booking_{}", appointment.id);

    let confirmation = WebhookMessage::new(
        appointment.phone.clone(),
        templates::render(templates::DEFAULT_CONFIRMATION, appointment),
        session.clone(),
    )
    .with_name(appointment.name.clone());

    if let Err(e) = sender.send(&confirmation).await {
        tracing::warn!("Booking confirmation for {} not delivered: {}", appointment.id, e);
    }

    if let Some(phone) = clinic_phone {
        let notice = WebhookMessage::new(phone, clinic_notice(appointment), format!("{}_clinic", session));
        if let Err(e) = sender.send(&notice).await {
            tracing::warn!("Clinic notice for {} not delivered: {}", appointment.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use mockall::mock;
    use pretty_assertions::assert_eq;
    use sorriso_core::models::appointment::AppointmentStatus;
    use sorriso_integrations::IntegrationError;
    use uuid::Uuid;

    mock! {
        Sender {}

        #[async_trait]
        impl MessageSender for Sender {
            async fn send(&self, message: &WebhookMessage) -> Result<(), IntegrationError>;
        }
    }

    fn appointment(name: &str, phone: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
            clinic: "Senhor Sorriso Formiga - Formiga, MG".to_string(),
            service: "Limpeza".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            time: "10:00".to_string(),
            status: AppointmentStatus::Confirmed,
            notes: None,
            source: "pwa".to_string(),
            webhook_session_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn paced_batches_fit_the_request_timeout() {
        let second = Duration::from_secs(1);
        assert_eq!(max_recipients(second, Duration::from_secs(30)), Some(25));
        assert_eq!(max_recipients(Duration::from_millis(250), Duration::from_secs(10)), Some(33));
        assert_eq!(max_recipients(Duration::ZERO, Duration::from_secs(30)), None);
        assert_eq!(max_recipients(second, Duration::ZERO), None);
    }

    #[tokio::test]
    async fn counts_failures_without_stopping() {
        let mut sender = MockSender::new();
        sender
            .expect_send()
            .withf(|m| m.phone == "+5535000000001")
            .returning(|_| Err(IntegrationError::Timeout));
        sender
            .expect_send()
            .withf(|m| m.phone == "+5535000000002")
            .returning(|_| Ok(()));

        let appointments = vec![
            appointment("Ana", "+5535000000001"),
            appointment("Bia", "+5535000000002"),
        ];

        let report = send_to_appointments(
            &sender,
            &appointments,
            "Olá {nome}",
            Duration::ZERO,
            "template",
        )
        .await;

        assert_eq!(report, SendReport { sent: 1, failed: 1 });
    }

    #[tokio::test]
    async fn messages_are_rendered_per_recipient() {
        let apt = appointment("Carla", "+5535000000003");
        let session = format!("template_{}", apt.id);

        let mut sender = MockSender::new();
        sender
            .expect_send()
            .withf(move |m| {
                m.message == "Olá Carla, até 03/06/2024"
                    && m.session_id == session
                    && m.name.as_deref() == Some("Carla")
            })
            .times(1)
            .returning(|_| Ok(()));

        send_to_appointments(&sender, &[apt], "Olá {nome}, até {data}", Duration::ZERO, "template").await;
    }

    #[tokio::test]
    async fn booking_notifies_clinic_when_configured() {
        let mut sender = MockSender::new();
        sender.expect_send().times(2).returning(|_| Ok(()));

        notify_booking(&sender, &appointment("Ana", "+5535000000001"), Some("+5535999999999")).await;
    }

    #[tokio::test]
    async fn booking_notification_failure_is_swallowed() {
        let mut sender = MockSender::new();
        sender
            .expect_send()
            .times(1)
            .returning(|_| Err(IntegrationError::NotConfigured("WEBHOOK_URL")));

        notify_booking(&sender, &appointment("Ana", "+5535000000001"), None).await;
    }
}
