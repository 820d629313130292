//! setcalc - interactive calculator for composable set operations
//!
//! Usage: setcalc [-c <capacity>] [batch_files...]
//!
//! Commands (type `help` at the prompt for details):
//!   eval, uni, inter, diff, prod, comp, resize, read, del, help, exit

use std::fs;
use std::io;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use setcalc::input::{InputSource, LineFeed, LineSource};
use setcalc::table::check_capacity;
use setcalc::{CalcError, ReplState};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "setcalc> ";

/// Command line options
struct Options {
    capacity: Option<usize>,
    batch_files: Vec<PathBuf>,
}

/// Parse command line arguments.
///
/// Usage: setcalc [-c <capacity>] [batch_files...]
///
/// Options:
///   -c, --capacity <n>  Initial table capacity (3-100); asked for when absent
///   -h, --help          Show help and exit
///   -v, --version       Show version and exit
fn parse_args(args: &[String]) -> Options {
    let mut capacity = None;
    let mut batch_files = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-c" | "--capacity" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: -c requires a number");
                    std::process::exit(1);
                };
                let parsed = value
                    .parse::<i64>()
                    .map_err(|_| CalcError::Parse(format!("capacity must be a number, got '{}'", value)))
                    .and_then(check_capacity);
                match parsed {
                    Ok(n) => capacity = Some(n),
                    Err(err) => {
                        eprintln!("Error: {}", err);
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "-h" | "--help" => {
                println!("setcalc v{} - Set Operation Calculator", VERSION);
                println!();
                println!("Usage: setcalc [OPTIONS] [batch_files...]");
                println!();
                println!("Options:");
                println!("  -c, --capacity <n>  Initial number of operation slots (3-100)");
                println!("  -h, --help          Show this help message");
                println!("  -v, --version       Show version");
                println!();
                println!("Examples:");
                println!("  setcalc                  Start, asking for the capacity");
                println!("  setcalc -c 10            Start with room for 10 operations");
                println!("  setcalc -c 10 ops.txt    Replay ops.txt, then go interactive");
                std::process::exit(0);
            }
            "-v" | "--version" => {
                println!("setcalc v{}", VERSION);
                std::process::exit(0);
            }
            _ if arg.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", arg);
                eprintln!("Try 'setcalc --help' for usage information");
                std::process::exit(1);
            }
            _ => {
                batch_files.push(PathBuf::from(arg));
                i += 1;
            }
        }
    }

    Options {
        capacity,
        batch_files,
    }
}

/// Console lines from rustyline, with history saved when dropped.
struct EditorFeed {
    editor: Editor<(), DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl EditorFeed {
    fn new() -> rustyline::Result<Self> {
        let config = Config::builder().auto_add_history(true).build();
        let mut editor: Editor<(), DefaultHistory> = Editor::with_config(config)?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }

        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl LineFeed for EditorFeed {
    fn next_line(&mut self) -> Option<String> {
        match self.editor.readline(PROMPT) {
            Ok(line) => Some(line),
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C - drop the line, keep reading
                println!("^C");
                Some(String::new())
            }
            Err(ReadlineError::Eof) => None,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                None
            }
        }
    }
}

impl Drop for EditorFeed {
    fn drop(&mut self) {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args);

    println!("setcalc v{} - Set Operation Calculator", VERSION);
    println!("Type 'help' for the list of commands, 'exit' to quit\n");

    let feed = match EditorFeed::new() {
        Ok(feed) => feed,
        Err(err) => {
            eprintln!("Failed to create editor: {}", err);
            std::process::exit(1);
        }
    };
    let console: Box<dyn InputSource> = Box::new(LineSource::new(feed));

    let state = match options.capacity {
        Some(capacity) => ReplState::new(console, io::stdout(), capacity),
        None => ReplState::with_prompted_capacity(console, io::stdout()),
    };
    let mut state = match state {
        Ok(state) => state,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    for path in &options.batch_files {
        handle_batch(&mut state, path);
        if !state.is_running() {
            return;
        }
    }

    if let Err(err) = state.run() {
        eprintln!("Error: {}", err);
    }
}

/// Replay a batch file named on the command line
fn handle_batch(state: &mut ReplState<io::Stdout>, path: &PathBuf) {
    println!("Loading {}...", path.display());
    match state.replay_from_file(path) {
        Ok(summary) => {
            let mut parts = vec![format!("{} lines", summary.processed)];
            if !summary.errors.is_empty() {
                parts.push(format!("{} failed", summary.errors.len()));
            }
            if summary.aborted {
                parts.push("stopped early".to_string());
            }
            println!("Loaded {} ({})", path.display(), parts.join(", "));
        }
        Err(err) => {
            eprintln!("Error: {}", err);
        }
    }
}

/// `$HOME/.config/setcalc/history`, or `%APPDATA%\setcalc\history` on Windows
fn history_path() -> Option<PathBuf> {
    let base = if cfg!(windows) {
        PathBuf::from(std::env::var_os("APPDATA")?)
    } else {
        PathBuf::from(std::env::var_os("HOME")?).join(".config")
    };
    Some(base.join("setcalc").join("history"))
}
