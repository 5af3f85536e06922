//! Console sink implementation

use crate::core::{FormattedLine, LogLevel, LogRecord, PatternFormatter, Result, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

/// Writes pattern-formatted lines to standard output.
///
/// Coloring is cosmetic: the `%^…%$` range of the pattern is colored by level,
/// or the rendered level name when the pattern has no color range.
pub struct ConsoleSink {
    formatter: PatternFormatter,
    use_colors: bool,
    out: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn new(formatter: PatternFormatter) -> Self {
        Self {
            formatter,
            use_colors: cfg!(feature = "console"),
            out: Box::new(io::stdout()),
        }
    }

    /// Write to any stream instead of stdout (colors off)
    pub fn with_writer(formatter: PatternFormatter, out: impl Write + Send + 'static) -> Self {
        Self {
            formatter,
            use_colors: false,
            out: Box::new(out),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors && cfg!(feature = "console");
        self
    }

    fn render(&self, level: LogLevel, line: FormattedLine) -> String {
        if !self.use_colors {
            return line.text;
        }
        match line.color_range.or(line.level_range) {
            Some((start, end)) if start < end => {
                let text = &line.text;
                format!(
                    "{}{}{}",
                    &text[..start],
                    Self::paint(level, &text[start..end]),
                    &text[end..]
                )
            }
            _ => line.text,
        }
    }

    #[cfg(feature = "console")]
    fn paint(level: LogLevel, s: &str) -> String {
        let colored = s.color(level.color_code());
        match level {
            LogLevel::Critical => colored.bold().to_string(),
            _ => colored.to_string(),
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint(_level: LogLevel, s: &str) -> String {
        s.to_string()
    }
}

impl Sink for ConsoleSink {
    fn deliver(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.formatter.format_line(record);
        let output = self.render(record.level, line);
        writeln!(self.out, "{}", output)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    #[test]
    fn test_writes_one_line_per_record() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::with_writer(PatternFormatter::new("[%l] %v"), buf.clone());

        sink.deliver(&LogRecord::new(LogLevel::Info, "app", "first")).unwrap();
        sink.deliver(&LogRecord::new(LogLevel::Error, "app", "second")).unwrap();
        sink.flush().unwrap();

        assert_eq!(buf.contents(), "[info] first\n[error] second\n");
    }

    #[test]
    fn test_plain_render_without_colors() {
        let sink = ConsoleSink::with_writer(PatternFormatter::new("%^%l%$ %v"), io::sink());
        let record = LogRecord::new(LogLevel::Warn, "app", "x");
        let line = PatternFormatter::new("%^%l%$ %v").format_line(&record);
        assert_eq!(sink.render(LogLevel::Warn, line), "warn x");
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_colored_render_keeps_text() {
        colored::control::set_override(true);
        let sink = ConsoleSink::with_writer(PatternFormatter::new("[%l] %v"), io::sink())
            .with_colors(true);
        let record = LogRecord::new(LogLevel::Error, "app", "boom");
        let line = PatternFormatter::new("[%l] %v").format_line(&record);
        let rendered = sink.render(LogLevel::Error, line);

        assert!(rendered.starts_with('['));
        assert!(rendered.contains("error"));
        assert!(rendered.ends_with("] boom"));
        assert!(rendered.contains('\u{1b}'));
    }
}
