//! Error types for the set calculator
//!
//! Every failure a command can hit is a `CalcError`. Batch file failures are
//! wrapped in `CalcError::Line` and rendered with ariadne so the offending
//! token is pointed at.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use std::fmt;
use std::io;
use std::ops::Range;
use std::path::PathBuf;

/// Calculator errors
#[derive(Debug)]
pub enum CalcError {
    /// Malformed or missing token
    Parse(String),
    IndexOutOfRange {
        index: i64,
        len: usize,
    },
    CapacityExceeded {
        capacity: usize,
    },
    ArityMismatch {
        expected: usize,
        got: usize,
    },
    /// A combinator would expand past the node limit
    TooLarge {
        limit: usize,
    },
    /// Capacity outside the allowed range
    InvalidRange(i64),
    /// Batch file missing, unreadable or without a single command line
    InvalidPath(PathBuf),
    /// A failure while replaying one line of a batch file
    Line {
        number: usize,
        line: String,
        span: Option<Range<usize>>,
        source: Box<CalcError>,
    },
    ReplayTooDeep(PathBuf),
    /// A product pair does not fit the pairing encoding
    Overflow {
        left: i64,
        right: i64,
    },
    Io(io::Error),
}

pub type CalcResult<T> = Result<T, CalcError>;

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Parse(msg) => write!(f, "bad input: {}", msg),
            CalcError::IndexOutOfRange { index, .. } => {
                write!(f, "Operation #{} doesn't exist", index)
            }
            CalcError::CapacityExceeded { capacity } => write!(
                f,
                "not enough space for new operation (capacity {})",
                capacity
            ),
            CalcError::ArityMismatch { expected, got } => {
                write!(f, "arity mismatch: expected {}, got {}", expected, got)
            }
            CalcError::TooLarge { limit } => {
                write!(f, "operation too large: more than {} nodes", limit)
            }
            CalcError::InvalidRange(value) => {
                write!(f, "must be number between 3-100, got {}", value)
            }
            CalcError::InvalidPath(path) => write!(
                f,
                "invalid path: {} doesn't exist or has no commands, try again!",
                path.display()
            ),
            CalcError::Line {
                number,
                line,
                source,
                ..
            } => write!(f, "error at line {} ({}): {}", number, line, source),
            CalcError::ReplayTooDeep(path) => {
                write!(f, "too many nested reads while opening {}", path.display())
            }
            CalcError::Overflow { left, right } => {
                write!(f, "product of {} and {} is out of range", left, right)
            }
            CalcError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalcError::Line { source, .. } => Some(source.as_ref()),
            CalcError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CalcError {
    fn from(err: io::Error) -> Self {
        CalcError::Io(err)
    }
}

/// Format a batch line failure as an annotated report.
///
/// Falls back to the plain `Display` text for anything that is not a
/// `CalcError::Line`.
pub fn format_line_error(error: &CalcError) -> String {
    let CalcError::Line {
        number,
        line,
        span,
        source,
    } = error
    else {
        return error.to_string();
    };

    // ariadne counts chars, the tokenizer counts bytes
    let char_span = match span {
        Some(span) if span.end <= line.len() => to_char_range(line, span.clone()),
        _ => 0..line.chars().count(),
    };

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, (), char_span.start)
        .with_config(Config::default().with_color(false))
        .with_message(format!("Error at line {}", number))
        .with_label(
            Label::new(char_span)
                .with_message(source.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .write(Source::from(line.as_str()), &mut output);

    match written {
        Ok(()) => String::from_utf8(output)
            .unwrap_or_else(|_| format!("Error at line {}: {}", number, source)),
        Err(_) => format!("Error at line {}: {}", number, source),
    }
}

fn to_char_range(text: &str, bytes: Range<usize>) -> Range<usize> {
    let start = text[..bytes.start].chars().count();
    let end = start + text[bytes.start..bytes.end].chars().count();
    start..end
}
