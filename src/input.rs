//! Input sources the dispatcher reads commands and arguments from
//!
//! A command may read its arguments token by token across several lines (an
//! `eval` typed on the console can continue on the next line), or be confined
//! to a single line (a batch file line). Both go through the same tokenizer,
//! `LineSource`, which pulls lines from a `LineFeed` only when it runs out.

use std::collections::VecDeque;
use std::io::BufRead;
use std::ops::Range;

/// Where the dispatcher reads from.
pub trait InputSource {
    /// Next whitespace-delimited token, crossing line boundaries as needed.
    fn next_token(&mut self) -> Option<String>;

    /// The rest of the current line, trimmed. If nothing is left on it,
    /// the next non-blank line.
    fn read_line(&mut self) -> Option<String>;

    /// Drop whatever is left of the current line.
    fn skip_line(&mut self);

    /// Byte range of the last token within the current line
    fn last_span(&self) -> Option<Range<usize>> {
        None
    }

    /// Whether nothing but whitespace is left on the current line
    fn line_exhausted(&self) -> bool {
        true
    }
}

/// A supplier of successive lines, without their terminators.
pub trait LineFeed {
    fn next_line(&mut self) -> Option<String>;
}

impl LineFeed for VecDeque<String> {
    fn next_line(&mut self) -> Option<String> {
        self.pop_front()
    }
}

/// Line feed over any buffered reader (stdin, files).
pub struct ReaderFeed<R> {
    reader: R,
}

impl<R: BufRead> ReaderFeed<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineFeed for ReaderFeed<R> {
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed_len);
                Some(line)
            }
        }
    }
}

/// Tokenizer over a line feed.
pub struct LineSource<F> {
    feed: F,
    line: Option<String>,
    pos: usize,
    last_span: Option<Range<usize>>,
}

/// In-memory source, used for batch file lines and scripted sessions.
pub type TextSource = LineSource<VecDeque<String>>;

impl TextSource {
    pub fn from_text(text: &str) -> Self {
        LineSource::new(text.lines().map(str::to_string).collect())
    }
}

impl<F: LineFeed> LineSource<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            line: None,
            pos: 0,
            last_span: None,
        }
    }

    /// Remaining text of the current line
    fn rest(&self) -> &str {
        self.line.as_deref().map_or("", |line| &line[self.pos..])
    }

    fn advance_line(&mut self) -> bool {
        match self.feed.next_line() {
            Some(line) => {
                self.line = Some(line);
                self.pos = 0;
                self.last_span = None;
                true
            }
            None => {
                self.line = None;
                self.pos = 0;
                false
            }
        }
    }
}

impl<F: LineFeed> InputSource for LineSource<F> {
    fn next_token(&mut self) -> Option<String> {
        loop {
            let rest = self.rest();
            let skipped = rest.len() - rest.trim_start().len();
            let rest = &rest[skipped..];
            if !rest.is_empty() {
                let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
                let token = rest[..len].to_string();
                let start = self.pos + skipped;
                self.pos = start + len;
                self.last_span = Some(start..self.pos);
                return Some(token);
            }
            if !self.advance_line() {
                return None;
            }
        }
    }

    fn read_line(&mut self) -> Option<String> {
        loop {
            let rest = self.rest().trim();
            if !rest.is_empty() {
                let text = rest.to_string();
                let line_len = self.line.as_ref().map_or(0, String::len);
                let start = line_len - self.rest().trim_start().len();
                self.last_span = Some(start..start + text.len());
                self.pos = line_len;
                return Some(text);
            }
            if !self.advance_line() {
                return None;
            }
        }
    }

    fn skip_line(&mut self) {
        if let Some(line) = &self.line {
            self.pos = line.len();
        }
    }

    fn last_span(&self) -> Option<Range<usize>> {
        self.last_span.clone()
    }

    fn line_exhausted(&self) -> bool {
        self.rest().trim().is_empty()
    }
}
