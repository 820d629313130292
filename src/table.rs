//! The operation table: capacity-bounded, index-addressed storage.
//!
//! Slots hold `Rc` handles. An entry's children are reached through the
//! operation itself, never through the table, so deleting or truncating a
//! slot only drops the table's own reference.

use std::rc::Rc;

use crate::error::{CalcError, CalcResult};
use crate::operation::{Combinator, Operation};

pub const MIN_CAPACITY: usize = 3;
pub const MAX_CAPACITY: usize = 100;

/// What a resize did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Capacity changed, no entry lost
    Resized,
    /// Capacity shrank below the entry count and the tail was dropped
    Truncated { dropped: usize },
    /// Truncation was needed but not confirmed; nothing changed
    Declined,
}

#[derive(Debug)]
pub struct OperationTable {
    entries: Vec<Rc<Operation>>,
    capacity: usize,
}

impl OperationTable {
    /// Table holding the three built-ins: union, intersection and difference
    /// of two identities.
    ///
    /// Capacities past `i64::MAX` are reported as `InvalidRange(i64::MAX)`.
    pub fn new(capacity: usize) -> CalcResult<Self> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            let shown = i64::try_from(capacity).unwrap_or(i64::MAX);
            return Err(CalcError::InvalidRange(shown));
        }
        let entries = [
            Combinator::Union,
            Combinator::Intersection,
            Combinator::Difference,
        ]
        .into_iter()
        .map(|kind| Operation::over_identities(kind).map(Rc::new))
        .collect::<CalcResult<Vec<_>>>()?;
        Ok(Self { entries, capacity })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Append an entry, returning its index.
    pub fn append(&mut self, op: Rc<Operation>) -> CalcResult<usize> {
        if self.is_full() {
            return Err(CalcError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.entries.push(op);
        Ok(self.entries.len() - 1)
    }

    /// Check a user-typed index against the current bounds.
    pub fn resolve(&self, index: i64) -> CalcResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.entries.len())
            .ok_or(CalcError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn get(&self, index: usize) -> CalcResult<&Rc<Operation>> {
        self.entries.get(index).ok_or(CalcError::IndexOutOfRange {
            index: index as i64,
            len: self.entries.len(),
        })
    }

    /// Remove an entry; later entries move down by one.
    pub fn remove(&mut self, index: usize) -> CalcResult<Rc<Operation>> {
        if index >= self.entries.len() {
            return Err(CalcError::IndexOutOfRange {
                index: index as i64,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Whether resizing to `new_capacity` would drop entries.
    pub fn needs_truncation(&self, new_capacity: usize) -> bool {
        new_capacity < self.entries.len()
    }

    pub fn resize(&mut self, new_capacity: i64, confirm_truncate: bool) -> CalcResult<ResizeOutcome> {
        let new_capacity = check_capacity(new_capacity)?;
        if !self.needs_truncation(new_capacity) {
            self.capacity = new_capacity;
            return Ok(ResizeOutcome::Resized);
        }
        if !confirm_truncate {
            return Ok(ResizeOutcome::Declined);
        }
        let dropped = self.entries.len() - new_capacity;
        self.entries.truncate(new_capacity);
        self.capacity = new_capacity;
        Ok(ResizeOutcome::Truncated { dropped })
    }

    /// Snapshot for display.
    pub fn list(&self) -> impl Iterator<Item = (usize, &Rc<Operation>)> + '_ {
        self.entries.iter().enumerate()
    }
}

/// Accept a capacity only within `MIN_CAPACITY..=MAX_CAPACITY`.
pub fn check_capacity(value: i64) -> CalcResult<usize> {
    usize::try_from(value)
        .ok()
        .filter(|c| (MIN_CAPACITY..=MAX_CAPACITY).contains(c))
        .ok_or(CalcError::InvalidRange(value))
}
