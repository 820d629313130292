//! Batch replay: run a file of commands through the interactive dispatcher
//!
//! Each non-blank line is pushed as the active input source, exactly one
//! command is dispatched, and the line source is popped again before the
//! outcome is looked at. Failures are handled per line:
//!
//! - a full table is reported and the next line runs;
//! - an unknown command or any other failure is reported against the line
//!   and the user is asked (on the console) whether to keep going.

use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

use crate::command::Action;
use crate::error::{format_line_error, CalcError, CalcResult};
use crate::input::{InputSource, TextSource};
use crate::repl::ReplState;

/// Nesting limit for `read` commands inside batch files.
pub const MAX_REPLAY_DEPTH: usize = 8;

/// What a replay did.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    /// Lines dispatched, failed ones included
    pub processed: usize,
    /// One `CalcError::Line` per reported failure
    pub errors: Vec<CalcError>,
    /// The user chose to stop before the end of the file
    pub aborted: bool,
}

impl<W: Write> ReplState<W> {
    /// Replay the commands in `path` one line at a time.
    ///
    /// Fails with `InvalidPath` if the file cannot be read or holds no
    /// non-blank line. Everything that goes wrong on a single line is
    /// recovered here and recorded in the summary.
    pub fn replay_from_file(&mut self, path: &Path) -> CalcResult<ReplaySummary> {
        if self.redirects.len() >= MAX_REPLAY_DEPTH {
            return Err(CalcError::ReplayTooDeep(path.to_path_buf()));
        }

        let text =
            fs::read_to_string(path).map_err(|_| CalcError::InvalidPath(path.to_path_buf()))?;
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| (i + 1, line))
            .collect();
        if lines.is_empty() {
            return Err(CalcError::InvalidPath(path.to_path_buf()));
        }

        let mut summary = ReplaySummary::default();
        for (pos, &(number, line)) in lines.iter().enumerate() {
            writeln!(self.output, "{}", line)?;
            let (outcome, span) = self.with_line_source(line, |state| state.step());
            summary.processed += 1;

            let failure = match outcome {
                Ok(Some(Action::Invalid)) => {
                    let command = line.split_whitespace().next().unwrap_or_default();
                    Some(CalcError::Parse(format!("unknown command '{}'", command)))
                }
                Ok(_) => None,
                Err(err @ CalcError::CapacityExceeded { .. }) => {
                    writeln!(self.output, "{}", err)?;
                    None
                }
                Err(CalcError::Io(err)) => return Err(CalcError::Io(err)),
                Err(err) => Some(err),
            };

            if let Some(cause) = failure {
                let err = CalcError::Line {
                    number,
                    line: line.to_string(),
                    span,
                    source: Box::new(cause),
                };
                writeln!(self.output, "{}", format_line_error(&err))?;
                summary.errors.push(err);
                if !self.ask_continue()? {
                    summary.aborted = true;
                    break;
                }
            }

            if !self.running {
                break;
            }
            if pos + 1 < lines.len() {
                self.print_menu()?;
            }
        }
        Ok(summary)
    }

    /// Run `f` with `line` as the active input source.
    ///
    /// The line source is popped on every path out of `f`; its last token
    /// span is handed back for error reports.
    fn with_line_source<T>(
        &mut self,
        line: &str,
        f: impl FnOnce(&mut Self) -> T,
    ) -> (T, Option<Range<usize>>) {
        let depth = self.redirects.len();
        self.redirects.push(Box::new(TextSource::from_text(line)));
        let result = f(self);
        let span = self.redirects.get(depth).and_then(|source| source.last_span());
        self.redirects.truncate(depth);
        (result, span)
    }

    /// Ask on the console whether to keep reading; running out of console
    /// input counts as "no".
    fn ask_continue(&mut self) -> CalcResult<bool> {
        let answer = self.ask_yes_no(
            true,
            "\nwould you like to continue reading the file?\npress Y/N",
        )?;
        Ok(answer.unwrap_or(false))
    }
}
