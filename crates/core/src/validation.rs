//! Input validation and phone-number helpers.
//!
//! Validators never fail fast: they collect every [`FieldError`] so that a
//! form can highlight all bad fields at once. Callers turn a non-empty list
//! into [`crate::errors::ClinicError::Validation`].

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::{
    errors::FieldError,
    models::{appointment::CreateAppointmentRequest, clinic::Clinic},
};

static DISPLAY_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{2}\)\s\d{4,5}-\d{4}$").expect("valid regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid regex"));
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("valid regex"));

pub const MAX_NOTES_LEN: usize = 500;
pub const MAX_COMMENT_LEN: usize = 1000;

pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Formats a Brazilian number for display.
///
/// Eleven digits become `(DD) DDDDD-DDDD`, ten digits `(DD) DDDD-DDDD`.
/// Anything else is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits = digits_only(phone);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => phone.to_string(),
    }
}

/// Accepts 10 or 11 national digits, optionally preceded by the `55` country code.
pub fn is_valid_phone_number(phone: &str) -> bool {
    let digits = digits_only(phone);
    match digits.len() {
        10 | 11 => true,
        12 | 13 => digits.starts_with("55"),
        _ => false,
    }
}

/// Normalizes a number to the `+55…` form the WhatsApp relay expects.
pub fn normalize_whatsapp_phone(phone: &str) -> String {
    let digits = digits_only(phone);
    if digits.starts_with("55") {
        format!("+{}", digits)
    } else {
        format!("+55{}", digits)
    }
}

pub fn is_display_phone(phone: &str) -> bool {
    DISPLAY_PHONE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Absolute `http`/`https` link that is safe to place in an `href`.
pub fn is_http_url(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    let rest = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"));
    rest.is_some_and(|rest| {
        !rest.is_empty() && !url.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
    })
}

/// Strips script blocks and angle brackets from free text.
pub fn sanitize_input(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    without_scripts
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn is_clock_time(value: &str) -> bool {
    CLOCK_TIME.is_match(value)
        && chrono::NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

fn check_len(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: Option<usize>,
) {
    let len = value.trim().chars().count();
    if len < min {
        errors.push(FieldError::new(
            field,
            format!("must have at least {} characters", min),
        ));
    }
    if let Some(max) = max {
        if len > max {
            errors.push(FieldError::new(
                field,
                format!("must have at most {} characters", max),
            ));
        }
    }
}

fn check_optional_email(errors: &mut Vec<FieldError>, email: Option<&str>) {
    if let Some(email) = email.filter(|e| !e.is_empty()) {
        if !is_valid_email(email) {
            errors.push(FieldError::new("email", "invalid email"));
        }
    }
}

pub fn validate_new_appointment(request: &CreateAppointmentRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_len(&mut errors, "name", &request.name, 2, Some(100));

    if !is_valid_phone_number(&request.phone) {
        errors.push(FieldError::new("phone", "must have 10 or 11 digits"));
    }

    check_optional_email(&mut errors, request.email.as_deref());

    if parse_iso_date(&request.date).is_none() {
        errors.push(FieldError::new("date", "must be a valid date in YYYY-MM-DD format"));
    }

    if !is_clock_time(&request.time) {
        errors.push(FieldError::new("time", "must be in HH:MM format"));
    }

    check_len(&mut errors, "service", &request.service, 2, None);
    check_len(&mut errors, "clinic", &request.clinic, 2, None);

    if let Some(notes) = &request.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            errors.push(FieldError::new(
                "notes",
                format!("must have at most {} characters", MAX_NOTES_LEN),
            ));
        }
    }

    errors
}

pub fn validate_profile(full_name: &str, phone: Option<&str>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_len(&mut errors, "full_name", full_name, 2, Some(100));

    if let Some(phone) = phone.filter(|p| !p.is_empty()) {
        if !is_valid_phone_number(phone) {
            errors.push(FieldError::new("phone", "must have 10 or 11 digits"));
        }
    }

    errors
}

pub fn validate_clinic(clinic: &Clinic) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_len(&mut errors, "name", &clinic.name, 2, Some(100));
    check_len(&mut errors, "address", &clinic.address, 5, None);
    check_len(&mut errors, "city", &clinic.city, 2, None);

    if clinic.state.chars().count() != 2 {
        errors.push(FieldError::new("state", "must have exactly 2 characters"));
    }

    if !is_display_phone(&clinic.phone) {
        errors.push(FieldError::new("phone", "must look like (11) 99999-9999"));
    }

    check_optional_email(&mut errors, Some(&clinic.email));

    if !(-90.0..=90.0).contains(&clinic.latitude) {
        errors.push(FieldError::new("latitude", "out of range"));
    }
    if !(-180.0..=180.0).contains(&clinic.longitude) {
        errors.push(FieldError::new("longitude", "out of range"));
    }

    errors
}

pub fn validate_review(rating: i16, comment: Option<&str>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !(1..=5).contains(&rating) {
        errors.push(FieldError::new("rating", "must be between 1 and 5"));
    }

    if let Some(comment) = comment {
        if comment.chars().count() > MAX_COMMENT_LEN {
            errors.push(FieldError::new(
                "comment",
                format!("must have at most {} characters", MAX_COMMENT_LEN),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn booking() -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            name: "Maria Souza".to_string(),
            phone: "35998913803".to_string(),
            email: None,
            clinic: "Senhor Sorriso Campo Belo".to_string(),
            service: "Limpeza Dental".to_string(),
            date: "2024-06-03".to_string(),
            time: "09:30".to_string(),
            notes: None,
            source: None,
            status: None,
            webhook_session_id: None,
        }
    }

    #[rstest]
    #[case("https://app.senhorsorriso.com.br/reset?token=abc", true)]
    #[case("HTTP://localhost:5173/reset", true)]
    #[case("javascript:alert(1)", false)]
    #[case("https://", false)]
    #[case("https://x.com/\"onmouseover=\"x", false)]
    #[case("ftp://files.example/reset", false)]
    fn only_plain_web_links_are_accepted(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_http_url(url), expected);
    }

    #[rstest]
    #[case("35998913803", "(35) 99891-3803")]
    #[case("(35) 99891-3803", "(35) 99891-3803")]
    #[case("3734430520", "(37) 3443-0520")]
    #[case("37 3443-0520", "(37) 3443-0520")]
    #[case("12345", "12345")]
    #[case("+55 35 99891-3803", "+55 35 99891-3803")]
    fn formats_ten_and_eleven_digit_numbers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_phone(input), expected);
    }

    #[rstest]
    #[case("35998913803", true)]
    #[case("3734430520", true)]
    #[case("+55 (35) 99891-3803", true)]
    #[case("998913803", false)]
    #[case("", false)]
    #[case("44 35 99891-3803", false)]
    fn phone_number_validity(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_phone_number(input), expected);
    }

    #[test]
    fn whatsapp_numbers_get_the_country_code_once() {
        assert_eq!(normalize_whatsapp_phone("(35) 99891-3803"), "+5535998913803");
        assert_eq!(normalize_whatsapp_phone("5535998913803"), "+5535998913803");
    }

    #[test]
    fn sanitize_removes_scripts_and_brackets() {
        assert_eq!(
            sanitize_input("  hello <script>alert('x')</script><b>world</b> "),
            "hello bworld/b"
        );
        assert_eq!(sanitize_input("<SCRIPT type=x>\nbad()\n</SCRIPT>ok"), "ok");
    }

    #[test]
    fn valid_booking_has_no_errors() {
        assert!(validate_new_appointment(&booking()).is_empty());
    }

    #[test]
    fn invalid_booking_reports_every_field() {
        let request = CreateAppointmentRequest {
            name: "M".to_string(),
            phone: "123".to_string(),
            email: Some("not-an-email".to_string()),
            date: "03/06/2024".to_string(),
            time: "9h".to_string(),
            notes: Some("x".repeat(501)),
            ..booking()
        };

        let fields: Vec<_> = validate_new_appointment(&request)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["name", "phone", "email", "date", "time", "notes"]);
    }

    #[test]
    fn impossible_dates_are_rejected() {
        let request = CreateAppointmentRequest {
            date: "2024-02-30".to_string(),
            ..booking()
        };
        assert_eq!(validate_new_appointment(&request)[0].field, "date");
    }

    #[test]
    fn empty_email_is_treated_as_absent() {
        let request = CreateAppointmentRequest {
            email: Some(String::new()),
            ..booking()
        };
        assert!(validate_new_appointment(&request).is_empty());
    }

    #[test]
    fn clinic_validation_uses_display_phone() {
        let mut clinic = crate::catalog::default_clinics().remove(0);
        assert!(validate_clinic(&clinic).is_empty());

        clinic.phone = "35998913803".to_string();
        clinic.state = "MGX".to_string();
        clinic.latitude = 120.0;
        let fields: Vec<_> = validate_clinic(&clinic).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["state", "phone", "latitude"]);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    fn review_rating_bounds(#[case] rating: i16, #[case] ok: bool) {
        assert_eq!(validate_review(rating, None).is_empty(), ok);
    }
}
