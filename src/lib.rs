//! setcalc: an interactive calculator for composable set operations
//!
//! Operations are built from identity, union, intersection, difference,
//! product and composition, kept in a capacity-bounded table, and evaluated
//! against integer sets typed in at evaluation time. Commands come from the
//! console or are replayed from batch files.

pub mod command;
pub mod error;
pub mod input;
pub mod naming;
pub mod operation;
pub mod repl;
pub mod replay;
pub mod set;
pub mod table;

pub use error::{CalcError, CalcResult};
pub use operation::{Combinator, Operation};
pub use repl::ReplState;
pub use set::Set;
pub use table::OperationTable;
