//! Command vocabulary: literal tokens, their actions and help text.

use indexmap::IndexMap;

use crate::operation::Combinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Invalid,
    Eval,
    Create(Combinator),
    Resize,
    Read,
    Del,
    Help,
    Exit,
}

impl Action {
    /// Actions that add an entry to the table and are refused when it is full.
    pub fn creates_entry(self) -> bool {
        matches!(self, Action::Create(_))
    }
}

#[derive(Debug, Clone)]
pub struct ActionDetails {
    pub description: &'static str,
    pub action: Action,
}

/// Command token → action, in help order.
#[derive(Debug, Clone)]
pub struct ActionMap {
    actions: IndexMap<&'static str, ActionDetails>,
}

impl Default for ActionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionMap {
    pub fn new() -> Self {
        let entries = [
            (
                "eval",
                "(uate) num ... - compute the result of function #num on the following \
                 set(s); each set is prefixed with the count of numbers to read",
                Action::Eval,
            ),
            (
                "uni",
                "(on) num1 num2 - Creates an operation that is the union of operation \
                 #num1 and operation #num2",
                Action::Create(Combinator::Union),
            ),
            (
                "inter",
                "(section) num1 num2 - Creates an operation that is the intersection of \
                 operation #num1 and operation #num2",
                Action::Create(Combinator::Intersection),
            ),
            (
                "diff",
                "(erence) num1 num2 - Creates an operation that is the difference of \
                 operation #num1 and operation #num2",
                Action::Create(Combinator::Difference),
            ),
            (
                "prod",
                "(uct) num1 num2 - Creates an operation that returns the product of the \
                 items from the results of operation #num1 and operation #num2",
                Action::Create(Combinator::Product),
            ),
            (
                "comp",
                "(osite) num1 num2 - creates an operation that is the composition of \
                 operation #num1 (taking one set) and operation #num2",
                Action::Create(Combinator::Composition),
            ),
            (
                "resize",
                " num - resize num of available operations (3-100)",
                Action::Resize,
            ),
            ("read", " path - Read operations from file", Action::Read),
            (
                "del",
                "(ete) num - delete operation #num from the operation list",
                Action::Del,
            ),
            ("help", " - print this command list", Action::Help),
            ("exit", " - exit the program", Action::Exit),
        ];

        let actions = entries
            .into_iter()
            .map(|(command, description, action)| {
                (
                    command,
                    ActionDetails {
                        description,
                        action,
                    },
                )
            })
            .collect();
        Self { actions }
    }

    /// Unknown tokens map to `Action::Invalid`.
    pub fn lookup(&self, token: &str) -> Action {
        self.actions
            .get(token)
            .map_or(Action::Invalid, |details| details.action)
    }

    /// `* <command><description>` per command
    pub fn help_text(&self) -> String {
        let mut out = String::from("The available commands are:\n");
        for (command, details) in &self.actions {
            out.push_str(&format!("* {}{}\n", command, details.description));
        }
        out
    }

    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }
}
