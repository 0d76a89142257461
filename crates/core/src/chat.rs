//! Recognizes bookings confirmed by the WhatsApp chatbot.
//!
//! The bot answers in free text. When the answer contains one of the
//! confirmation phrases, the fields are pulled out with an ordered list of
//! patterns per field; the first pattern that matches wins.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::appointment::{AppointmentStatus, NewAppointment};
use crate::models::chat::ParsedAppointment;

const CONFIRMATION_PHRASES: [&str; 7] = [
    "agendamento confirmado",
    "consulta agendada",
    "horário marcado",
    "appointment confirmed",
    "scheduled for",
    "confirmado para",
    "agendado para",
];

pub const DEFAULT_SERVICE: &str = "Consulta";
pub const DEFAULT_CLINIC: &str = "Senhor Sorriso";
pub const DEFAULT_NAME: &str = "Cliente via WhatsApp";
pub const UNKNOWN_PHONE: &str = "Não informado";
pub const WEBHOOK_SOURCE: &str = "webhook";

const EXCERPT_CHARS: usize = 200;

// Column widths of the appointments table.
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_PHONE_CHARS: usize = 20;
pub const MAX_LABEL_CHARS: usize = 255;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

static NAME: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)nome[:\s]+([^,\n]+)",
        r"(?i)paciente[:\s]+([^,\n]+)",
        r"(?i)para[:\s]+([^,\n]+)",
        r"(?i)cliente[:\s]+([^,\n]+)",
    ])
});

static PHONE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)telefone[:\s]+([+\d\s()-]+)",
        r"(?i)contato[:\s]+([+\d\s()-]+)",
        r"(?i)fone[:\s]+([+\d\s()-]+)",
        r"(?i)cliente[:\s]+([+\d\s()-]+)",
    ])
});

// The bare keyword patterns have no capture group and yield the whole match.
static SERVICE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)serviço[:\s]+([^,\n]+)",
        r"(?i)consulta[:\s]+([^,\n]+)",
        r"(?i)procedimento[:\s]+([^,\n]+)",
        r"(?i)avaliação[^,\n]*",
        r"(?i)limpeza[^,\n]*",
        r"(?i)ortodontia[^,\n]*",
    ])
});

static CLINIC: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)clínica[:\s]+([^,\n]+)",
        r"(?i)unidade[:\s]+([^,\n]+)",
        r"(?i)local[:\s]+([^,\n]+)",
        r"(?i)campo belo",
        r"(?i)formiga",
        r"(?i)itararé",
        r"(?i)capão bonito",
        r"(?i)itapeva",
    ])
});

static DATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)data[:\s]+(\d{1,2}/\d{1,2}/\d{4})",
        r"(?i)dia[:\s]+(\d{1,2}/\d{1,2}/\d{4})",
        r"(\d{1,2}/\d{1,2}/\d{4})",
    ])
});

static TIME: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)horário[:\s]+(\d{1,2}:\d{2})",
        r"(?i)hora[:\s]+(\d{1,2}:\d{2})",
        r"(?i)às[:\s]+(\d{1,2}:\d{2})",
        r"(\d{1,2}:\d{2})",
    ])
});

// A captured name runs until the sentence moves on to when or where.
static NAME_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:no dia|dia|data|às|as|na unidade|na clínica|em|e)\s|[!?;]|[.:](?:\s|$)")
        .expect("valid regex")
});

static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"));

pub fn detect_appointment(output: &str) -> bool {
    let lowered = output.to_lowercase();
    CONFIRMATION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

fn extract(patterns: &[Regex], output: &str, whole_match_fallback: bool) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        let caps = pattern.captures(output)?;
        let text = match caps.get(1) {
            Some(group) => group.as_str(),
            None if whole_match_fallback => caps.get(0)?.as_str(),
            None => return None,
        };
        Some(text.trim().to_string())
    })
}

/// Extracts booking fields from chatbot output.
///
/// Returns a default (non-appointment) value when no confirmation phrase is
/// present. Missing service and clinic fall back to generic values and the
/// phone falls back to `user_phone`.
pub fn parse_appointment(output: &str, user_phone: Option<&str>) -> ParsedAppointment {
    if !detect_appointment(output) {
        return ParsedAppointment::default();
    }

    ParsedAppointment {
        name: extract(&NAME, output, false),
        phone: extract(&PHONE, output, false).or_else(|| user_phone.map(str::to_string)),
        email: None,
        service: Some(extract(&SERVICE, output, true).unwrap_or_else(|| DEFAULT_SERVICE.to_string())),
        clinic: Some(extract(&CLINIC, output, true).unwrap_or_else(|| DEFAULT_CLINIC.to_string())),
        date: extract(&DATE, output, false),
        time: extract(&TIME, output, false),
        is_appointment: true,
    }
}

/// ISO dates pass through, `D/M/YYYY` is converted, anything else becomes `today`.
pub fn normalize_date(value: &str, today: NaiveDate) -> NaiveDate {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date;
    }

    SLASH_DATE
        .captures(value)
        .and_then(|caps| {
            let day = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            let year = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .unwrap_or(today)
}

fn excerpt(output: &str) -> String {
    output.chars().take(EXCERPT_CHARS).collect()
}

fn clip(value: &str, max_chars: usize) -> String {
    value.trim().chars().take(max_chars).collect::<String>().trim_end().to_string()
}

fn clip_name(name: &str) -> String {
    let head = match NAME_END.find(name) {
        Some(end) if end.start() > 0 => &name[..end.start()],
        _ => name,
    };
    clip(head, MAX_NAME_CHARS)
}

impl ParsedAppointment {
    /// Builds the appointment to store, or `None` unless both date and time were found.
    ///
    /// Free-text captures are cut to what the appointments table can hold.
    pub fn into_new_appointment(
        self,
        session_id: Option<String>,
        user_phone: Option<&str>,
        output: &str,
        today: NaiveDate,
    ) -> Option<NewAppointment> {
        if !self.is_appointment {
            return None;
        }
        let date = self.date?;
        let time = self.time?;

        let phone = self
            .phone
            .or_else(|| user_phone.map(str::to_string))
            .map(|p| clip(&p, MAX_PHONE_CHARS))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| UNKNOWN_PHONE.to_string());
        let name = self
            .name
            .map(|n| clip_name(&n))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let notes = format!(
            "Agendamento criado via webhook. Telefone: {}. Resposta original: {}...",
            user_phone.unwrap_or("N/A"),
            excerpt(output)
        );

        Some(NewAppointment {
            name,
            phone,
            email: self.email,
            clinic: clip(self.clinic.as_deref().unwrap_or(DEFAULT_CLINIC), MAX_LABEL_CHARS),
            service: clip(self.service.as_deref().unwrap_or(DEFAULT_SERVICE), MAX_LABEL_CHARS),
            date: normalize_date(&date, today),
            time,
            status: AppointmentStatus::Confirmed,
            notes: Some(notes),
            source: WEBHOOK_SOURCE.to_string(),
            webhook_session_id: session_id.map(|s| clip(&s, MAX_LABEL_CHARS)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    const CONFIRMED: &str = "Agendamento confirmado! Nome: Ana Souza, Telefone: (37) 99985-4123, Serviço: Limpeza Dental, Clínica: Senhor Sorriso Formiga, Data: 15/03/2024, Horário: 14:30";

    #[rstest]
    #[case("Seu AGENDAMENTO CONFIRMADO para amanhã", true)]
    #[case("Appointment confirmed", true)]
    #[case("Horário marcado com sucesso", true)]
    #[case("Olá! Como posso ajudar?", false)]
    fn detects_confirmation_phrases(#[case] output: &str, #[case] expected: bool) {
        assert_eq!(detect_appointment(output), expected);
    }

    #[test]
    fn parses_labelled_fields() {
        let parsed = parse_appointment(CONFIRMED, None);
        assert_eq!(
            parsed,
            ParsedAppointment {
                name: Some("Ana Souza".to_string()),
                phone: Some("(37) 99985-4123".to_string()),
                email: None,
                service: Some("Limpeza Dental".to_string()),
                clinic: Some("Senhor Sorriso Formiga".to_string()),
                date: Some("15/03/2024".to_string()),
                time: Some("14:30".to_string()),
                is_appointment: true,
            }
        );
    }

    #[test]
    fn falls_back_to_defaults_and_city_names() {
        let parsed = parse_appointment(
            "Horário marcado em Itapeva no dia 02/04/2024 às 09:00",
            Some("+5515998620028"),
        );
        assert_eq!(parsed.clinic.as_deref(), Some("Itapeva"));
        assert_eq!(parsed.phone.as_deref(), Some("+5515998620028"));
        assert_eq!(parsed.date.as_deref(), Some("02/04/2024"));
        assert_eq!(parsed.time.as_deref(), Some("09:00"));
        assert_eq!(parsed.service.as_deref(), Some(DEFAULT_SERVICE));
    }

    #[test]
    fn non_confirmation_output_is_not_an_appointment() {
        let parsed = parse_appointment("Qual o seu nome?", Some("+5535998913803"));
        assert_eq!(parsed, ParsedAppointment::default());
    }

    #[rstest]
    #[case("2024-05-10", NaiveDate::from_ymd_opt(2024, 5, 10).unwrap())]
    #[case("5/6/2024", NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())]
    #[case("31/02/2024", today())]
    #[case("amanhã", today())]
    fn normalizes_dates(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(normalize_date(input, today()), expected);
    }

    #[test]
    fn builds_webhook_appointment() {
        let appointment = parse_appointment(CONFIRMED, None)
            .into_new_appointment(Some("sess-1".to_string()), None, CONFIRMED, today())
            .unwrap();

        assert_eq!(appointment.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(appointment.source, WEBHOOK_SOURCE);
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(appointment.webhook_session_id.as_deref(), Some("sess-1"));
        let notes = appointment.notes.unwrap();
        assert!(notes.starts_with("Agendamento criado via webhook. Telefone: N/A."));
        assert!(notes.ends_with("..."));
    }

    #[test]
    fn missing_time_creates_nothing() {
        let output = "Consulta agendada para Carlos, data 10/10/2024";
        assert!(parse_appointment(output, None)
            .into_new_appointment(None, None, output, today())
            .is_none());
    }

    #[test]
    fn name_stops_where_the_sentence_moves_on() {
        let output = "Consulta agendada para Ana Souza no dia 12/03/2024 às 10:00 na unidade Campo Belo e lembramos que é importante chegar com quinze minutos de antecedência";
        let appointment = parse_appointment(output, None)
            .into_new_appointment(None, None, output, today())
            .unwrap();

        assert_eq!(appointment.name, "Ana Souza");
        assert_eq!(appointment.date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        assert!(appointment.clinic.chars().count() <= MAX_LABEL_CHARS);
    }

    #[test]
    fn captures_are_cut_to_column_widths() {
        let long_name = "Ana ".repeat(60);
        let output = format!(
            "Agendamento confirmado! Nome: {}, Telefone: {}, Serviço: {}, Data: 15/03/2024, Horário: 14:30",
            long_name,
            "9".repeat(40),
            "Limpeza ".repeat(50),
        );
        let appointment = parse_appointment(&output, None)
            .into_new_appointment(Some("s".repeat(300)), None, &output, today())
            .unwrap();

        assert!(appointment.name.starts_with("Ana Ana"));
        assert!(appointment.name.chars().count() <= MAX_NAME_CHARS);
        assert_eq!(appointment.phone, "9".repeat(MAX_PHONE_CHARS));
        assert!(appointment.service.chars().count() <= MAX_LABEL_CHARS);
        assert_eq!(appointment.webhook_session_id.unwrap().len(), MAX_LABEL_CHARS);
    }

    #[test]
    fn unnamed_patient_gets_placeholder_name() {
        let output = "Horário marcado: 12/03/2024 às 10:00";
        let appointment = parse_appointment(output, None)
            .into_new_appointment(None, None, output, today())
            .unwrap();
        assert_eq!(appointment.name, DEFAULT_NAME);
        assert_eq!(appointment.time, "10:00");
        assert_eq!(appointment.phone, UNKNOWN_PHONE);
    }
}
