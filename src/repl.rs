//! REPL state and command dispatcher for the set calculator
//!
//! `ReplState` owns the operation table, the output sink and a stack of input
//! sources. The console sits at the bottom of the stack; batch replay pushes
//! one source per file line above it (see `replay.rs`). Every command reads
//! its arguments from the top of the stack, so the same dispatcher serves the
//! console and batch files.

use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use crate::command::{Action, ActionMap};
use crate::error::{CalcError, CalcResult};
use crate::input::InputSource;
use crate::naming::NameGenerator;
use crate::operation::{Combinator, Operation};
use crate::set::Set;
use crate::table::{check_capacity, OperationTable, ResizeOutcome, MAX_CAPACITY, MIN_CAPACITY};

const SEPARATOR: &str = "-------------------------------------------------";

pub struct ReplState<W: Write> {
    pub table: OperationTable,
    actions: ActionMap,
    console: Box<dyn InputSource>,
    /// Sources pushed above the console by batch replay
    pub(crate) redirects: Vec<Box<dyn InputSource>>,
    pub(crate) output: W,
    pub(crate) running: bool,
}

impl<W: Write> ReplState<W> {
    /// Create a state with the built-in operations and the given capacity.
    pub fn new(console: Box<dyn InputSource>, output: W, capacity: usize) -> CalcResult<Self> {
        Ok(Self {
            table: OperationTable::new(capacity)?,
            actions: ActionMap::new(),
            console,
            redirects: Vec::new(),
            output,
            running: true,
        })
    }

    /// Create a state, asking the console for the initial capacity.
    pub fn with_prompted_capacity(console: Box<dyn InputSource>, output: W) -> CalcResult<Self> {
        let mut state = Self::new(console, output, MIN_CAPACITY)?;
        let capacity = state.prompt_capacity()?;
        state.table.resize(capacity as i64, false)?;
        Ok(state)
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The active input source: the innermost redirect, or the console.
    pub(crate) fn source(&mut self) -> &mut dyn InputSource {
        match self.redirects.last_mut() {
            Some(source) => source.as_mut(),
            None => self.console.as_mut(),
        }
    }

    pub(crate) fn console(&mut self) -> &mut dyn InputSource {
        self.console.as_mut()
    }

    // ========================================================================
    // Table operations
    // ========================================================================

    /// Build a combinator over entries `left` and `right` and append it.
    pub fn create_combinator(&mut self, kind: Combinator, left: i64, right: i64) -> CalcResult<usize> {
        if self.table.is_full() {
            return Err(CalcError::CapacityExceeded {
                capacity: self.table.capacity(),
            });
        }
        let left = self.table.get(self.table.resolve(left)?)?.clone();
        let right = self.table.get(self.table.resolve(right)?)?.clone();
        let op = Operation::combine(kind, left, right)?;
        self.table.append(Rc::new(op))
    }

    pub fn evaluate(&self, index: i64, inputs: &[Set]) -> CalcResult<Set> {
        self.table.get(self.table.resolve(index)?)?.evaluate(inputs)
    }

    pub fn delete_entry(&mut self, index: i64) -> CalcResult<Rc<Operation>> {
        let index = self.table.resolve(index)?;
        self.table.remove(index)
    }

    pub fn resize_table(&mut self, new_capacity: i64, confirm_truncate: bool) -> CalcResult<ResizeOutcome> {
        self.table.resize(new_capacity, confirm_truncate)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Read one command from the active source and perform it.
    ///
    /// Returns the action that ran, or `None` when the source is exhausted.
    pub fn step(&mut self) -> CalcResult<Option<Action>> {
        let Some(token) = self.source().next_token() else {
            return Ok(None);
        };
        let action = self.actions.lookup(&token);

        if action.creates_entry() && self.table.is_full() {
            return Err(CalcError::CapacityExceeded {
                capacity: self.table.capacity(),
            });
        }

        match action {
            Action::Invalid => {
                writeln!(self.output, "Command not found")?;
                self.source().skip_line();
            }
            Action::Eval => self.eval_command()?,
            Action::Create(kind) => {
                let left = self.read_index()?;
                let right = self.read_index()?;
                self.create_combinator(kind, left, right)?;
            }
            Action::Resize => self.resize_command()?,
            Action::Read => self.read_command()?,
            Action::Del => {
                let index = self.read_index()?;
                self.delete_entry(index)?;
            }
            Action::Help => {
                let help = self.actions.help_text();
                writeln!(self.output, "{}", help)?;
            }
            Action::Exit => {
                writeln!(self.output, "Goodbye!")?;
                self.running = false;
            }
        }
        Ok(Some(action))
    }

    /// The interactive loop: menu, command, report, until `exit` or end of input.
    pub fn run(&mut self) -> CalcResult<()> {
        while self.running {
            self.print_menu()?;
            match self.step() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    writeln!(self.output, "\nGoodbye!")?;
                    self.running = false;
                }
                Err(CalcError::Io(err)) => return Err(CalcError::Io(err)),
                Err(err) => {
                    writeln!(self.output, "{}", err)?;
                    self.source().skip_line();
                }
            }
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn print_menu(&mut self) -> CalcResult<()> {
        writeln!(self.output, "{}", SEPARATOR)?;
        writeln!(self.output, "num of available operations: {}", self.table.capacity())?;
        self.print_operations()?;
        writeln!(
            self.output,
            "Enter command ('help' for the list of available commands):"
        )?;
        self.output.flush()?;
        Ok(())
    }

    pub fn print_operations(&mut self) -> CalcResult<()> {
        writeln!(self.output, "List of available set operations:")?;
        let mut names = NameGenerator::new();
        for (index, op) in self.table.list() {
            names.reset();
            let rendered = op.render_structure(&mut names);
            writeln!(self.output, "{}.\t{}", index, rendered)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Ask for a capacity until one in range is given.
    pub fn prompt_capacity(&mut self) -> CalcResult<usize> {
        loop {
            writeln!(
                self.output,
                "please enter the number of operation ({}-{}):",
                MIN_CAPACITY, MAX_CAPACITY
            )?;
            self.output.flush()?;
            let token = self
                .source()
                .next_token()
                .ok_or_else(|| CalcError::Parse("expected a capacity, found end of input".into()))?;
            match token.parse::<i64>().map_err(|_| CalcError::Parse(token)).and_then(check_capacity) {
                Ok(capacity) => return Ok(capacity),
                Err(_) => {
                    writeln!(self.output, "must be number between {}-{}", MIN_CAPACITY, MAX_CAPACITY)?;
                    self.source().skip_line();
                }
            }
        }
    }

    fn read_index(&mut self) -> CalcResult<i64> {
        let token = self
            .source()
            .next_token()
            .ok_or_else(|| CalcError::Parse("expected an operation number, found end of input".into()))?;
        token
            .parse()
            .map_err(|_| CalcError::Parse(format!("expected an operation number, found '{}'", token)))
    }

    fn eval_command(&mut self) -> CalcResult<()> {
        let index = self.read_index()?;
        let op = self.table.get(self.table.resolve(index)?)?.clone();

        let mut inputs = Vec::with_capacity(op.arity());
        for _ in 0..op.arity() {
            inputs.push(Set::read(self.source())?);
        }

        let rendered = op.render_with_values(&inputs)?;
        let result = op.evaluate(&inputs)?;
        writeln!(self.output, "{} = {}", rendered, result)?;
        Ok(())
    }

    fn resize_command(&mut self) -> CalcResult<()> {
        let token = self
            .source()
            .next_token()
            .ok_or_else(|| CalcError::Parse("expected a capacity, found end of input".into()))?;
        let requested: i64 = token
            .parse()
            .map_err(|_| CalcError::Parse(format!("expected a capacity, found '{}'", token)))?;
        let capacity = check_capacity(requested)?;

        let confirm = if self.table.needs_truncation(capacity) {
            let question = "Some operations will need to be deleted\n\
                            Press Y if you want to continue the process or N if you want to cancel it";
            match self.ask_yes_no(false, question)? {
                Some(answer) => answer,
                None => {
                    return Err(CalcError::Parse("expected Y or N, found end of input".into()))
                }
            }
        } else {
            false
        };

        match self.resize_table(requested, confirm)? {
            ResizeOutcome::Truncated { dropped } => {
                writeln!(self.output, "Deleted {} operation(s)", dropped)?;
            }
            ResizeOutcome::Declined => writeln!(self.output, "Resize cancelled")?,
            ResizeOutcome::Resized => {}
        }
        Ok(())
    }

    fn read_command(&mut self) -> CalcResult<()> {
        if self.source().line_exhausted() {
            writeln!(self.output, "please enter the path to the file:")?;
            self.output.flush()?;
        }
        let path = self
            .source()
            .read_line()
            .ok_or_else(|| CalcError::Parse("expected a file path, found end of input".into()))?;

        let summary = self.replay_from_file(Path::new(&path))?;
        writeln!(
            self.output,
            "Read {} line(s) from {}{}",
            summary.processed,
            path,
            if summary.aborted { " (stopped early)" } else { "" }
        )?;
        Ok(())
    }

    /// Ask a Y/N question until a valid answer arrives.
    ///
    /// The answer is the whole rest of the line, so `y del 0` is a bad answer
    /// and not a `y` followed by a command. Reads from the console when
    /// `from_console` is set, otherwise from the active source. `None` means
    /// the source ran dry.
    pub(crate) fn ask_yes_no(&mut self, from_console: bool, question: &str) -> CalcResult<Option<bool>> {
        loop {
            writeln!(self.output, "{}", question)?;
            self.output.flush()?;
            let source = if from_console {
                self.console()
            } else {
                self.source()
            };
            let Some(answer) = source.read_line() else {
                return Ok(None);
            };
            match answer.as_str() {
                "Y" | "y" => return Ok(Some(true)),
                "N" | "n" => return Ok(Some(false)),
                _ => writeln!(self.output, "Bad Input: {} not valid option", answer)?,
            }
        }
    }
}
