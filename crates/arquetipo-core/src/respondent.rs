//! Respondent profile and its field validators.
//!
//! The respondent record gates progression out of the personal-data
//! step; it never influences scoring. Validators are pure predicates
//! and failures surface as per-field messages, not errors.

use serde::{Deserialize, Serialize};

/// Identity and consent captured before the question flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub name: String,
    pub whatsapp: String,
    pub email: String,
    pub consent_given: bool,
}

/// A single failed field with its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: &'static str,
}

impl Respondent {
    /// All failing fields, empty when the record is valid.
    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if !valid_name(&self.name) {
            issues.push(FieldIssue {
                field: "name",
                message: "informe nome e sobrenome",
            });
        }
        if !valid_whatsapp(&self.whatsapp) {
            issues.push(FieldIssue {
                field: "whatsapp",
                message: "informe um número com DDD (10 a 11 dígitos)",
            });
        }
        if !valid_email(&self.email) {
            issues.push(FieldIssue {
                field: "email",
                message: "informe um e-mail válido",
            });
        }
        if !valid_consent(self.consent_given) {
            issues.push(FieldIssue {
                field: "consent_given",
                message: "é necessário aceitar os termos",
            });
        }
        issues
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// At least two whitespace-separated tokens after trimming.
pub fn valid_name(name: &str) -> bool {
    name.trim().split_whitespace().count() >= 2
}

/// 10 to 11 digits after stripping everything that is not a digit.
/// Covers Brazilian numbers with DDD, with or without the leading 9.
pub fn valid_whatsapp(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=11).contains(&digits)
}

/// Exactly one `@`, non-empty local part, and a domain containing a
/// dot with text on both sides.
pub fn valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.contains(char::is_whitespace) {
        return false;
    }
    if domain.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

/// Consent must be explicitly given.
pub fn valid_consent(consent: bool) -> bool {
    consent
}

/// Format a phone number the way the product displays it:
/// `(XX) XXXX-XXXX` for 10 digits, `(XX) XXXXX-XXXX` for 11.
/// Anything else is returned unchanged.
pub fn format_whatsapp(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_requires_two_tokens() {
        assert!(valid_name("Ana Souza"));
        assert!(valid_name("  João  da Silva  "));
        assert!(!valid_name("Ana"));
        assert!(!valid_name("   "));
        assert!(!valid_name(""));
    }

    #[test]
    fn whatsapp_counts_digits_only() {
        assert!(valid_whatsapp("11999999999"));
        assert!(valid_whatsapp("(11) 99999-9999"));
        assert!(valid_whatsapp("1133334444"));
        assert!(!valid_whatsapp("999999999"));
        assert!(!valid_whatsapp("119999999999"));
        assert!(!valid_whatsapp("abc"));
    }

    #[test]
    fn email_needs_single_at_and_dotted_domain() {
        assert!(valid_email("ana@example.com"));
        assert!(valid_email("a.b@sub.example.com.br"));
        assert!(!valid_email("ana@example"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("ana@@example.com"));
        assert!(!valid_email("ana@.com"));
        assert!(!valid_email("ana@com."));
        assert!(!valid_email("ana example@x.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn consent_must_be_true() {
        assert!(valid_consent(true));
        assert!(!valid_consent(false));
    }

    #[test]
    fn validate_reports_each_failing_field() {
        let respondent = Respondent {
            name: "Ana".to_string(),
            whatsapp: "123".to_string(),
            email: "nope".to_string(),
            consent_given: false,
        };
        let issues = respondent.validate();
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["name", "whatsapp", "email", "consent_given"]);
    }

    #[test]
    fn complete_respondent_is_valid() {
        let respondent = Respondent {
            name: "Ana Souza".to_string(),
            whatsapp: "(11) 98765-4321".to_string(),
            email: "ana@example.com".to_string(),
            consent_given: true,
        };
        assert!(respondent.is_valid());
    }

    #[test]
    fn formats_ten_and_eleven_digit_numbers() {
        assert_eq!(format_whatsapp("1133334444"), "(11) 3333-4444");
        assert_eq!(format_whatsapp("11987654321"), "(11) 98765-4321");
        assert_eq!(format_whatsapp("123"), "123");
    }
}
