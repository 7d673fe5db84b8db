//! Diagnostics shown in place of (or next to) a report
//!
//! A diagnostic is assembled with chained calls and then filed into the
//! `Record` of the token list it concerns. Grammar failures are embedded as
//! pest errors, whose rule names are replaced by readable descriptions.
//!
//! ```rust
//! Error::new("Percentages do not add up")
//!     .nonfatal()
//!     .with_text("Shares cover 90% of the total")
//!     .with_hint("make the percentages after '--' sum to 100")
//!     .register(errs);
//! ```
//!
//! renders as
//!
//! ```txt
//! --> Warning: Percentages do not add up
//!  |  Shares cover 90% of the total
//!  |      ? hint: make the percentages after '--' sum to 100
//! ```

use std::fmt;

use crate::{
    load::parse::Rule,
    util::color::{paint, Color},
};

/// At most this many diagnostics of a `Record` are printed
const SHOWN_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    /// the report cannot be produced
    Error,
    /// the report is produced anyway
    Warning,
}

/// One diagnostic, made of a one-line label and any number of detail lines
#[must_use]
#[derive(Debug)]
pub struct Error {
    severity: Severity,
    label: String,
    details: Vec<Detail>,
}

#[derive(Debug)]
enum Detail {
    /// failed grammar match, printed with the offending token
    Grammar(pest::error::Error<Rule>),
    Note(String),
    Hint(String),
}

/// Diagnostics collected while handling one token list
#[must_use]
#[derive(Debug, Default)]
pub struct Record {
    errors: usize,
    entries: Vec<Error>,
}

impl Severity {
    fn color(self) -> Color {
        match self {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        }
    }
}

impl Error {
    /// A fatal diagnostic labelled `msg`
    pub fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            severity: Severity::Error,
            label: msg.to_string(),
            details: Vec::new(),
        }
    }

    /// Downgrade to a warning
    pub fn nonfatal(self) -> Self {
        Self {
            severity: Severity::Warning,
            ..self
        }
    }

    /// Attach the failure reported by the token grammar
    pub fn with_error(mut self, err: pest::error::Error<Rule>) -> Self {
        self.details.push(Detail::Grammar(err.renamed_rules(rule_rename)));
        self
    }

    pub fn with_text<S>(mut self, msg: S) -> Self
    where
        S: ToString,
    {
        self.details.push(Detail::Note(msg.to_string()));
        self
    }

    /// Attach a suggestion on how to fix the input
    pub fn with_hint<S>(mut self, msg: S) -> Self
    where
        S: ToString,
    {
        self.details.push(Detail::Hint(msg.to_string()));
        self
    }

    pub fn register(self, record: &mut Record) {
        record.push(self);
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one diagnostic prevents the report
    pub fn is_fatal(&self) -> bool {
        self.errors > 0
    }

    pub fn count_errors(&self) -> usize {
        self.errors
    }

    pub fn count_warnings(&self) -> usize {
        self.entries.len() - self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.entries.iter()
    }

    fn push(&mut self, err: Error) {
        if err.severity == Severity::Error {
            self.errors += 1;
        }
        self.entries.push(err);
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.severity.color();
        let bar = paint("|", color);
        let title = format!("--> {}:", self.severity.title());
        writeln!(f, "{} {}", paint(title, color), paint(&self.label, Color::White))?;
        for detail in &self.details {
            match detail {
                Detail::Grammar(err) => {
                    for row in err.to_string().lines() {
                        writeln!(f, " {}  {}", bar, paint(row, Color::Blue))?;
                    }
                }
                Detail::Note(msg) => writeln!(f, " {}  {}", bar, paint(msg, Color::White))?,
                Detail::Hint(msg) => writeln!(f, " {}      {} {}", bar, paint("? hint:", Color::Blue), msg)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    /// Errors hide warnings: only the most severe kind present is listed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let (severity, count, noun) = if self.is_fatal() {
            (Severity::Error, self.count_errors(), "error")
        } else {
            (Severity::Warning, self.count_warnings(), "warning")
        };
        let color = severity.color();
        let shown = self.entries.iter().filter(|e| e.severity == severity);
        for err in shown.take(SHOWN_LIMIT) {
            writeln!(f, "{}", err)?;
        }
        if count > SHOWN_LIMIT {
            writeln!(f, "{}", paint(format!(" And {} more.", count - SHOWN_LIMIT), color))?;
        }
        let summary = match severity {
            Severity::Error => "Fatal:",
            Severity::Warning => "Nonfatal:",
        };
        let plural = if count == 1 { "" } else { "s" };
        writeln!(f, "{} {}", paint(summary, color), paint(format!("{} {}{} emitted", count, noun, plural), Color::White))
    }
}

/// Readable description of what each grammar rule expects
fn rule_rename(rule: &Rule) -> String {
    let text = match rule {
        Rule::EOI => "the end of the token",
        Rule::integer => "a sequence of digits (0..9)",
        Rule::fraction => "decimal digits after the '.'",
        Rule::decimal => "a number ('XXX.XX')",
        Rule::money_amount => "a monetary value ('XXX.XX')",
        Rule::percentage => "a percentage ('XX' or 'XX.X')",
        Rule::month => "a two-digit month (01..12)",
        Rule::year => "a four-digit year",
        Rule::month_year => "a date 'MM/YYYY'",
    };
    text.to_string()
}
