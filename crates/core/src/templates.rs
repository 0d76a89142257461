//! Message templates with `{variable}` placeholders.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{appointment::Appointment, template::TemplateCategory};

/// Placeholders understood by [`render`].
pub const VARIABLES: [&str; 7] = [
    "nome", "data", "horario", "clinica", "servico", "telefone", "status",
];

pub const DEFAULT_REMINDER: &str = "Olá {nome}! Lembramos que sua consulta está agendada para {data} às {horario} na {clinica}. Por favor, chegue 15 minutos antes.";

pub const DEFAULT_CONFIRMATION: &str =
    "Olá {nome}! Sua consulta foi confirmada para {data} às {horario} na {clinica}. Aguardamos você!";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"));

/// Text used when bulk reminders are sent without a stored template.
pub fn default_template(category: TemplateCategory) -> &'static str {
    match category {
        TemplateCategory::Confirmation => DEFAULT_CONFIRMATION,
        _ => DEFAULT_REMINDER,
    }
}

/// Fills the known placeholders from `appointment`. Unknown ones are left untouched.
pub fn render(content: &str, appointment: &Appointment) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &regex::Captures| match &caps[1] {
            "nome" => appointment.name.clone(),
            "data" => appointment.date.format("%d/%m/%Y").to_string(),
            "horario" => appointment.time.clone(),
            "clinica" => appointment.clinic.clone(),
            "servico" => appointment.service.clone(),
            "telefone" => appointment.phone.clone(),
            "status" => appointment.status.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder names in order of first appearance.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = caps[1].to_string();
        if !found.contains(&name) {
            found.push(name);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::AppointmentStatus;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            name: "João".to_string(),
            phone: "+5537999854123".to_string(),
            email: None,
            clinic: "Senhor Sorriso Formiga - Formiga, MG".to_string(),
            service: "Limpeza Dental".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 9).unwrap(),
            time: "14:30".to_string(),
            status: AppointmentStatus::Confirmed,
            notes: None,
            source: "pwa".to_string(),
            webhook_session_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn renders_default_reminder() {
        assert_eq!(
            render(DEFAULT_REMINDER, &appointment()),
            "Olá João! Lembramos que sua consulta está agendada para 09/07/2024 às 14:30 na Senhor Sorriso Formiga - Formiga, MG. Por favor, chegue 15 minutos antes."
        );
    }

    #[test]
    fn renders_every_variable_and_keeps_unknown_ones() {
        let out = render("{servico}|{telefone}|{status}|{desconhecido}", &appointment());
        assert_eq!(out, "Limpeza Dental|+5537999854123|confirmed|{desconhecido}");
    }

    #[test]
    fn extracts_distinct_variables_in_order() {
        assert_eq!(
            extract_variables("{nome}, {data} {nome} {horario}"),
            vec!["nome", "data", "horario"]
        );
        assert!(extract_variables("sem variáveis").is_empty());
    }

    #[test]
    fn confirmation_category_has_its_own_default() {
        assert_eq!(default_template(TemplateCategory::Confirmation), DEFAULT_CONFIRMATION);
        assert_eq!(default_template(TemplateCategory::Marketing), DEFAULT_REMINDER);
    }
}
