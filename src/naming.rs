//! Placeholder names for structural printing
//!
//! Operations listed in the table are shown with their leaves named
//! `A, B, …, Z, AA, AB, …` in evaluation order. Names carry no meaning beyond
//! display, so every listed entry restarts at `A`.

/// Infinite, deterministic sequence of spreadsheet-style column names.
#[derive(Debug, Default, Clone)]
pub struct NameGenerator {
    next: usize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over from `A`
    pub fn reset(&mut self) {
        self.next = 0;
    }

    fn name_for(mut index: usize) -> String {
        let mut letters = Vec::new();
        loop {
            letters.push(b'A' + (index % 26) as u8);
            if index < 26 {
                break;
            }
            index = index / 26 - 1;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }
}

impl Iterator for NameGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = Self::name_for(self.next);
        self.next += 1;
        Some(name)
    }
}
