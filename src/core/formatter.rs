//! Record formatting
//!
//! Two encodings are supported:
//! - [`PatternFormatter`]: a text line driven by a spdlog-style pattern such as
//!   `%Y-%m-%d %H:%M:%S.%e [%n] [%l] %v`
//! - [`StructuredRecord`]: a fixed JSON object `{time, level, logger, message}`
//!   used by the UDP JSON encoding

use super::error::Result;
use super::log_record::LogRecord;
use serde::Serialize;
use std::borrow::Cow;

/// Pattern applied when `LOG_PATTERN` is not set
pub const DEFAULT_PATTERN: &str = "%Y-%m-%d %H:%M:%S.%e [%n] [%l] %v";

/// Millisecond-precision local time used by the structured encoding
pub const STRUCTURED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// A chrono strftime specifier rendered against the record timestamp
    Date(&'static str),
    Millis,
    Micros,
    Nanos,
    Logger,
    Level,
    ShortLevel,
    Payload,
    ThreadId,
    ProcessId,
    ColorStart,
    ColorEnd,
}

/// A rendered line plus the byte ranges a colorizing sink cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub text: String,
    /// Range between `%^` and `%$`
    pub color_range: Option<(usize, usize)>,
    /// Range of the first rendered `%l` or `%L`
    pub level_range: Option<(usize, usize)>,
}

/// Compiled text pattern
///
/// Supported flags:
///
/// | flag | output |
/// |------|--------|
/// | `%Y` `%y` `%m` `%d` | year, 2-digit year, month, day |
/// | `%H` `%I` `%M` `%S` `%p` | hour (24h / 12h), minute, second, AM/PM |
/// | `%b` `%B` `%a` `%A` | month / weekday names |
/// | `%D` `%T` `%z` | `MM/DD/YY`, `HH:MM:SS`, UTC offset |
/// | `%e` `%f` `%F` | milli-, micro-, nanoseconds |
/// | `%n` `%l` `%L` `%v` | logger, level, short level, message |
/// | `%t` `%P` | thread id, process id |
/// | `%^` `%$` | start / end of the colored range |
/// | `%%` | a literal `%` |
///
/// Unknown flags are emitted verbatim.
///
/// # Example
///
/// ```
/// use logix::core::{LogLevel, LogRecord, PatternFormatter};
///
/// let formatter = PatternFormatter::new("[%l] %n: %v");
/// let record = LogRecord::new(LogLevel::Warn, "app", "disk almost full");
/// assert_eq!(formatter.format(&record), "[warn] app: disk almost full");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFormatter {
    pattern: String,
    tokens: Vec<Token>,
}

impl PatternFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let tokens = Self::compile(&pattern);
        Self { pattern, tokens }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn compile(pattern: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let Some(flag) = chars.next() else {
                literal.push('%');
                break;
            };

            let token = match flag {
                'Y' => Token::Date("%Y"),
                'y' => Token::Date("%y"),
                'm' => Token::Date("%m"),
                'd' => Token::Date("%d"),
                'H' => Token::Date("%H"),
                'I' => Token::Date("%I"),
                'M' => Token::Date("%M"),
                'S' => Token::Date("%S"),
                'p' => Token::Date("%p"),
                'b' => Token::Date("%b"),
                'B' => Token::Date("%B"),
                'a' => Token::Date("%a"),
                'A' => Token::Date("%A"),
                'D' => Token::Date("%m/%d/%y"),
                'T' => Token::Date("%H:%M:%S"),
                'z' => Token::Date("%:z"),
                'e' => Token::Millis,
                'f' => Token::Micros,
                'F' => Token::Nanos,
                'n' => Token::Logger,
                'l' => Token::Level,
                'L' => Token::ShortLevel,
                'v' => Token::Payload,
                't' => Token::ThreadId,
                'P' => Token::ProcessId,
                '^' => Token::ColorStart,
                '$' => Token::ColorEnd,
                '%' => {
                    literal.push('%');
                    continue;
                }
                other => {
                    literal.push('%');
                    literal.push(other);
                    continue;
                }
            };

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        tokens
    }

    /// Render a record, dropping color markers
    pub fn format(&self, record: &LogRecord) -> String {
        self.format_line(record).text
    }

    /// Render a record and report where `%^`/`%$` fell in the output
    pub fn format_line(&self, record: &LogRecord) -> FormattedLine {
        let mut text = String::with_capacity(self.pattern.len() + record.message.len() + 32);
        let mut color_start = None;
        let mut color_end = None;
        let mut level_range = None;

        for token in &self.tokens {
            match token {
                Token::Literal(s) => text.push_str(s),
                Token::Date(spec) => text.push_str(&record.timestamp.format(spec).to_string()),
                Token::Millis => {
                    let ms = record.timestamp.timestamp_subsec_millis() % 1_000;
                    text.push_str(&format!("{:03}", ms));
                }
                Token::Micros => {
                    let us = record.timestamp.timestamp_subsec_micros() % 1_000_000;
                    text.push_str(&format!("{:06}", us));
                }
                Token::Nanos => {
                    let ns = record.timestamp.timestamp_subsec_nanos() % 1_000_000_000;
                    text.push_str(&format!("{:09}", ns));
                }
                Token::Logger => text.push_str(&record.logger),
                Token::Level | Token::ShortLevel => {
                    let start = text.len();
                    text.push_str(if *token == Token::Level {
                        record.level.to_str()
                    } else {
                        record.level.short_str()
                    });
                    level_range.get_or_insert((start, text.len()));
                }
                Token::Payload => match &record.fields {
                    Some(_) => text.push_str(&record.payload()),
                    None => text.push_str(&record.message),
                },
                Token::ThreadId => text.push_str(&record.thread_id),
                Token::ProcessId => text.push_str(&std::process::id().to_string()),
                Token::ColorStart => color_start = Some(text.len()),
                Token::ColorEnd => color_end = Some(text.len()),
            }
        }

        let color_range = match (color_start, color_end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            (Some(start), None) => Some((start, text.len())),
            _ => None,
        };

        FormattedLine {
            text,
            color_range,
            level_range,
        }
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

/// Fixed-shape JSON encoding of a record
///
/// Field order and names are part of the UDP wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredRecord<'a> {
    pub time: String,
    pub level: &'static str,
    pub logger: &'a str,
    pub message: Cow<'a, str>,
}

impl<'a> StructuredRecord<'a> {
    pub fn from_record(record: &'a LogRecord) -> Self {
        let message = match &record.fields {
            Some(_) => Cow::Owned(record.payload()),
            None => Cow::Borrowed(record.message.as_str()),
        };

        Self {
            time: record.timestamp.format(STRUCTURED_TIME_FORMAT).to_string(),
            level: record.level.to_str(),
            logger: &record.logger,
            message,
        }
    }

    /// Compact single-line JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogFields, LogLevel};
    use chrono::{Local, TimeZone};

    fn fixed_record(level: LogLevel, message: &str) -> LogRecord {
        let ts = Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid local datetime")
            + chrono::Duration::microseconds(123_456);
        LogRecord::new(level, "async_logger", message).with_timestamp(ts)
    }

    #[test]
    fn test_default_pattern() {
        let formatter = PatternFormatter::default();
        let line = formatter.format(&fixed_record(LogLevel::Info, "Application started"));
        assert_eq!(
            line,
            "2025-01-08 10:30:45.123 [async_logger] [info] Application started"
        );
    }

    #[test]
    fn test_sub_second_flags() {
        let formatter = PatternFormatter::new("%e|%f|%F");
        let line = formatter.format(&fixed_record(LogLevel::Info, "x"));
        assert_eq!(line, "123|123456|123456000");
    }

    #[test]
    fn test_literal_and_unknown_flags() {
        let formatter = PatternFormatter::new("100%% %q %L%");
        let line = formatter.format(&fixed_record(LogLevel::Error, "x"));
        assert_eq!(line, "100% %q E%");
    }

    #[test]
    fn test_composite_date_flags() {
        let formatter = PatternFormatter::new("%D %T");
        let line = formatter.format(&fixed_record(LogLevel::Info, "x"));
        assert_eq!(line, "01/08/25 10:30:45");
    }

    #[test]
    fn test_color_range() {
        let formatter = PatternFormatter::new("[%^%l%$] %v");
        let line = formatter.format_line(&fixed_record(LogLevel::Warn, "hot"));
        assert_eq!(line.text, "[warn] hot");
        assert_eq!(line.color_range, Some((1, 5)));

        let unterminated = PatternFormatter::new("%^%l");
        let line = unterminated.format_line(&fixed_record(LogLevel::Info, "x"));
        assert_eq!(line.color_range, Some((0, 4)));

        let none = PatternFormatter::new("[%l]");
        let line = none.format_line(&fixed_record(LogLevel::Info, "x"));
        assert_eq!(line.color_range, None);
        assert_eq!(line.level_range, Some((1, 5)));
    }

    #[test]
    fn test_payload_includes_fields() {
        let formatter = PatternFormatter::new("%v");
        let record = fixed_record(LogLevel::Info, "login")
            .with_fields(LogFields::new().with_field("user", "bob"));
        assert_eq!(formatter.format(&record), "login | user=bob");
    }

    #[test]
    fn test_structured_record_shape() {
        let record = fixed_record(LogLevel::Warn, "test");
        let json = StructuredRecord::from_record(&record).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"time":"2025-01-08 10:30:45.123","level":"warn","logger":"async_logger","message":"test"}"#
        );

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_object().map(|o| o.len()), Some(4));
    }
}
