//! Property-based tests for logix using proptest

use logix::core::{Configuration, LogMode, LogRecord, PatternFormatter, StructuredRecord};
use logix::prelude::*;
use proptest::prelude::*;
use std::collections::HashMap;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

fn any_mode() -> impl Strategy<Value = LogMode> {
    prop_oneof![Just(LogMode::None), Just(LogMode::File), Just(LogMode::Network)]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level, in any letter case
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), upper in any::<bool>()) {
        let name = if upper {
            level.to_str().to_uppercase()
        } else {
            level.to_str().to_string()
        };
        let parsed: LogLevel = name.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// A threshold admits exactly the levels at or above it; `off` admits nothing
    #[test]
    fn test_threshold_admission(threshold in any_level(), level in any_level()) {
        let expected = threshold != LogLevel::Off && level != LogLevel::Off && level >= threshold;
        prop_assert_eq!(threshold.admits(level), expected);
    }

    /// Arbitrary strings never panic the parser
    #[test]
    fn test_level_parse_total(s in ".{0,16}") {
        let _ = s.parse::<LogLevel>();
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// Text without `%` renders verbatim
    #[test]
    fn test_literal_pattern(literal in "[a-zA-Z0-9 \\[\\]:|-]{0,40}") {
        let formatter = PatternFormatter::new(literal.clone());
        let record = LogRecord::new(LogLevel::Info, "prop", "ignored");
        prop_assert_eq!(formatter.format(&record), literal);
    }

    /// `%v` reproduces the message, with line breaks escaped
    #[test]
    fn test_payload_is_single_line(message in "\\PC{0,64}", newline in any::<bool>()) {
        let message = if newline { format!("{}\nforged", message) } else { message };
        let record = LogRecord::new(LogLevel::Warn, "prop", &message);
        let line = PatternFormatter::new("%v").format(&record);
        prop_assert!(!line.contains('\n'));
        prop_assert_eq!(line, record.message.clone());
    }

    /// The JSON encoding always has the same four keys and keeps the message
    #[test]
    fn test_structured_record_keys(message in "\\PC{0,64}", level in any_level()) {
        let record = LogRecord::new(level, "prop", &message);
        let json = StructuredRecord::from_record(&record).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        prop_assert_eq!(object.len(), 4);
        prop_assert_eq!(object["level"].as_str(), Some(level.to_str()));
        prop_assert_eq!(object["message"].as_str(), Some(record.message.as_str()));
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

proptest! {
    /// Known modes are kept in order; blanks and unknown names are dropped
    #[test]
    fn test_mode_list_parsing(modes in prop::collection::vec(any_mode(), 1..6), junk in "[x-z]{1,5}") {
        let mut raw: Vec<String> = modes.iter().map(|m| m.as_str().to_string()).collect();
        raw.insert(raw.len() / 2, junk);
        raw.push(String::new());
        let value = raw.join(",");

        let env: HashMap<&str, &str> = HashMap::from([("LOG_MODE", value.as_str())]);
        let resolved = Configuration::resolve_from(&env);

        prop_assert_eq!(&resolved.config.modes, &modes);
        prop_assert_eq!(resolved.warnings.len(), 1);
    }

    /// Numeric values that do not parse fall back to defaults with one warning each
    #[test]
    fn test_malformed_numbers_fall_back(size in "[a-z]{1,6}", count in "-[0-9]{1,3}") {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LOG_FILE_SIZE_MB", size.as_str()),
            ("LOG_NUMBER_OF_LOG_FILES", count.as_str()),
        ]);
        let resolved = Configuration::resolve_from(&env);

        prop_assert_eq!(resolved.config.file_size_mb, 5);
        prop_assert_eq!(resolved.config.number_of_log_files, 3);
        prop_assert_eq!(resolved.warnings.len(), 2);
    }

    /// Any valid port is accepted as given
    #[test]
    fn test_port_accepted(port in 1u16..=u16::MAX) {
        let value = port.to_string();
        let env: HashMap<&str, &str> = HashMap::from([("LOG_NETWORK_PORT", value.as_str())]);
        let resolved = Configuration::resolve_from(&env);
        prop_assert_eq!(resolved.config.network_port, port);
        prop_assert!(resolved.warnings.is_empty());
    }
}
