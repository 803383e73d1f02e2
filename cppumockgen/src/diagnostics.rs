//! Front-end diagnostics and colored console output.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// How serious a front-end diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Note,
    /// Reported; generation continues.
    Warning,
    /// Generation stops.
    Error,
    /// Generation stops.
    Fatal,
}

impl Severity {
    /// Whether generation must stop.
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }
}

/// One message reported by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Formatted text, usually `file:line:col: message`.
    pub message: String,
}

/// Console colors used for status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Errors.
    Red,
    /// Warnings.
    Yellow,
    /// Success.
    Green,
    /// File names.
    Cyan,
}

impl Color {
    fn ansi(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Yellow => "\x1b[33m",
            Color::Green => "\x1b[32m",
            Color::Cyan => "\x1b[36m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Writes ANSI color escapes when enabled, nothing otherwise.
///
/// Constructed once by the binary and passed to whatever prints status.
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    enabled: bool,
}

impl Colorizer {
    /// A colorizer that emits escapes only when `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether escapes are emitted.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Switches `out` to `color`.
    pub fn set_color(&self, out: &mut impl Write, color: Color) -> io::Result<()> {
        if self.enabled {
            out.write_all(color.ansi().as_bytes())?;
        }
        Ok(())
    }

    /// Restores the default color of `out`.
    pub fn reset(&self, out: &mut impl Write) -> io::Result<()> {
        if self.enabled {
            out.write_all(RESET.as_bytes())?;
        }
        Ok(())
    }

    /// Writes `label` in `color` followed by `text` and a newline.
    pub fn report(
        &self,
        out: &mut impl Write,
        color: Color,
        label: &str,
        text: &str,
    ) -> io::Result<()> {
        self.set_color(out, color)?;
        write!(out, "{label}")?;
        self.reset(out)?;
        writeln!(out, " {text}")
    }

    /// Writes every diagnostic with a `PARSE ERROR:` or `PARSE WARNING:` label.
    pub fn report_diagnostics(
        &self,
        out: &mut impl Write,
        diagnostics: &[Diagnostic],
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Note => continue,
                Severity::Warning => {
                    self.report(out, Color::Yellow, "PARSE WARNING:", &diagnostic.message)?
                }
                Severity::Error | Severity::Fatal => {
                    self.report(out, Color::Red, "PARSE ERROR:", &diagnostic.message)?
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_output_has_no_escapes() {
        let mut out = Vec::new();
        Colorizer::new(false)
            .report(&mut out, Color::Green, "SUCCESS:", "Mock generated into 'a.cpp'")
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "SUCCESS: Mock generated into 'a.cpp'\n"
        );
    }

    #[test]
    fn colored_output_wraps_label() {
        let mut out = Vec::new();
        Colorizer::new(true)
            .report(&mut out, Color::Red, "ERROR:", "boom")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[31mERROR:\x1b[0m boom\n");
    }

    #[test]
    fn diagnostics_are_labelled_by_severity() {
        let diagnostics = [
            Diagnostic {
                severity: Severity::Warning,
                message: "a.h:1:1: unused".into(),
            },
            Diagnostic {
                severity: Severity::Note,
                message: "a.h:1:1: note".into(),
            },
            Diagnostic {
                severity: Severity::Fatal,
                message: "a.h:2:1: broken".into(),
            },
        ];
        let mut out = Vec::new();
        Colorizer::new(false)
            .report_diagnostics(&mut out, &diagnostics)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "PARSE WARNING: a.h:1:1: unused\nPARSE ERROR: a.h:2:1: broken\n"
        );
        assert!(Severity::Fatal.is_error());
        assert!(!Severity::Warning.is_error());
    }
}
