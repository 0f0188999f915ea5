//! Primitive type and format checkers consulted by the validator

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

/// Decides whether a value conforms to a primitive type tag.
pub trait TypeChecker {
    fn matches_type(&self, value: &Value, type_tag: &str) -> bool;
}

/// Decides whether a string conforms to a semantic format tag.
pub trait FormatChecker {
    fn check_format(&self, value: &str, format: &str) -> bool;
}

/// Exact JSON type matching. No coercion: `"42"` is not a number and `1.5` is
/// not an integer. Integers satisfy `number`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTypeChecker;

impl TypeChecker for JsonTypeChecker {
    fn matches_type(&self, value: &Value, type_tag: &str) -> bool {
        match type_tag {
            "string" => value.is_string(),
            "number" => value.is_number(),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            "any" => true,
            _ => false,
        }
    }
}

/// Built-in formats:
///
/// | tag | check |
/// |-----|-------|
/// | `email` | local@domain with a dotted domain |
/// | `uri`, `url` | scheme followed by a non-blank remainder |
/// | `uuid` | hyphenated or simple UUID |
/// | `date` | `YYYY-MM-DD` calendar date |
/// | `date-time` | RFC 3339 timestamp |
/// | `ipv4`, `ipv6` | IP address literal |
/// | `hostname` | RFC 1123 host name |
///
/// Unknown tags pass unless `strict` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormats {
    pub strict: bool,
}

impl StandardFormats {
    pub const LENIENT: StandardFormats = StandardFormats { strict: false };
    pub const STRICT: StandardFormats = StandardFormats { strict: true };
}

impl FormatChecker for StandardFormats {
    fn check_format(&self, value: &str, format: &str) -> bool {
        match format {
            "email" => email_pattern().is_match(value),
            "uri" | "url" => uri_pattern().is_match(value),
            "uuid" => Uuid::parse_str(value).is_ok(),
            "date" => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            "date-time" => DateTime::parse_from_rfc3339(value).is_ok(),
            "ipv4" => value.parse::<Ipv4Addr>().is_ok(),
            "ipv6" => value.parse::<Ipv6Addr>().is_ok(),
            "hostname" => is_hostname(value),
            _ => !self.strict,
        }
    }
}

const EMAIL: &str = concat!(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
    r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
    r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
);
const URI: &str = r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$";
const HOST_LABEL: &str = r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL).expect("email pattern compiles"))
}

fn uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(URI).expect("uri pattern compiles"))
}

fn host_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(HOST_LABEL).expect("hostname pattern compiles"))
}

fn is_hostname(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 253
        && value.split('.').all(|label| host_label_pattern().is_match(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_tags() {
        let checker = JsonTypeChecker;
        assert!(checker.matches_type(&json!("x"), "string"));
        assert!(checker.matches_type(&json!(1), "number"));
        assert!(checker.matches_type(&json!(1.5), "number"));
        assert!(checker.matches_type(&json!(1), "integer"));
        assert!(!checker.matches_type(&json!(1.5), "integer"));
        assert!(!checker.matches_type(&json!("42"), "number"));
        assert!(checker.matches_type(&json!(false), "boolean"));
        assert!(checker.matches_type(&json!({}), "object"));
        assert!(checker.matches_type(&json!([]), "array"));
        assert!(checker.matches_type(&json!(null), "any"));
        assert!(!checker.matches_type(&json!(null), "string"));
        assert!(!checker.matches_type(&json!("x"), "color"));
    }

    #[test]
    fn test_email() {
        let formats = StandardFormats::LENIENT;
        assert!(formats.check_format("jeff@example.com", "email"));
        assert!(formats.check_format("first.last+tag@mail.example.org", "email"));
        assert!(!formats.check_format("not-an-email", "email"));
        assert!(!formats.check_format("a@b", "email"));
        assert!(!formats.check_format("a b@example.com", "email"));
    }

    #[test]
    fn test_temporal_and_identifiers() {
        let formats = StandardFormats::LENIENT;
        assert!(formats.check_format("2024-02-29", "date"));
        assert!(!formats.check_format("2023-02-29", "date"));
        assert!(formats.check_format("2024-05-01T10:00:00Z", "date-time"));
        assert!(!formats.check_format("2024-05-01 10:00", "date-time"));
        assert!(formats.check_format("67e55044-10b1-426f-9247-bb680e5fe0c8", "uuid"));
        assert!(!formats.check_format("67e55044", "uuid"));
    }

    #[test]
    fn test_network_formats() {
        let formats = StandardFormats::LENIENT;
        assert!(formats.check_format("https://example.com/a?b=c", "uri"));
        assert!(!formats.check_format("example dot com", "url"));
        assert!(formats.check_format("10.0.0.1", "ipv4"));
        assert!(!formats.check_format("10.0.0.256", "ipv4"));
        assert!(formats.check_format("::1", "ipv6"));
        assert!(formats.check_format("ldap.example.com", "hostname"));
        assert!(!formats.check_format("-bad.example.com", "hostname"));
    }

    #[test]
    fn test_unknown_format_policy() {
        assert!(StandardFormats::LENIENT.check_format("anything", "color"));
        assert!(!StandardFormats::STRICT.check_format("anything", "color"));
    }
}
