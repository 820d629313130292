//! The operation model: set-valued functions built from combinators.
//!
//! An operation is a tree whose leaves are identity nodes. Evaluating it
//! consumes one input set per leaf, handed out left to right in prefix order.
//! Children are shared (`Rc`) so an operation can be a table entry and a
//! child of other entries at the same time.

use std::fmt;
use std::rc::Rc;

use crate::error::{CalcError, CalcResult};
use crate::naming::NameGenerator;
use crate::set::Set;

/// The binary combinators a user can build from two existing operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Union,
    Intersection,
    Difference,
    Product,
    Composition,
}

impl Combinator {
    fn symbol(self) -> &'static str {
        match self {
            Combinator::Union => "∪",
            Combinator::Intersection => "∩",
            Combinator::Difference => "\\",
            Combinator::Product => "×",
            Combinator::Composition => "∘",
        }
    }
}

/// Largest operation that can be built, counted in nodes of the fully
/// expanded tree (shared children count once per use).
pub const MAX_NODES: usize = 1024;

#[derive(Debug)]
enum Node {
    Identity,
    Union(Rc<Operation>, Rc<Operation>),
    Intersection(Rc<Operation>, Rc<Operation>),
    Difference(Rc<Operation>, Rc<Operation>),
    Product(Rc<Operation>, Rc<Operation>),
    /// `outer ∘ inner`: the outer operation always has arity 1
    Composition {
        outer: Rc<Operation>,
        inner: Rc<Operation>,
    },
}

/// An immutable operation tree. Arity and expanded size are fixed when the
/// node is built.
#[derive(Debug)]
pub struct Operation {
    node: Node,
    arity: usize,
    nodes: usize,
}

impl Operation {
    pub fn identity() -> Operation {
        Operation {
            node: Node::Identity,
            arity: 1,
            nodes: 1,
        }
    }

    /// Identity leaves under a fresh combinator, as the table's built-ins are made.
    pub fn over_identities(kind: Combinator) -> CalcResult<Operation> {
        Operation::combine(kind, Rc::new(Operation::identity()), Rc::new(Operation::identity()))
    }

    /// Build a binary combinator from two existing operations.
    ///
    /// A composition's outer operand must take exactly one set. The result
    /// may not expand to more than `MAX_NODES` nodes.
    pub fn combine(
        kind: Combinator,
        left: Rc<Operation>,
        right: Rc<Operation>,
    ) -> CalcResult<Operation> {
        let nodes = left
            .nodes
            .checked_add(right.nodes)
            .and_then(|n| n.checked_add(1))
            .filter(|&n| n <= MAX_NODES)
            .ok_or(CalcError::TooLarge { limit: MAX_NODES })?;

        let arity = match kind {
            Combinator::Composition if left.arity != 1 => {
                return Err(CalcError::ArityMismatch {
                    expected: 1,
                    got: left.arity,
                });
            }
            Combinator::Composition => right.arity,
            // Bounded by `nodes`, cannot overflow
            _ => left.arity + right.arity,
        };
        let node = match kind {
            Combinator::Union => Node::Union(left, right),
            Combinator::Intersection => Node::Intersection(left, right),
            Combinator::Difference => Node::Difference(left, right),
            Combinator::Product => Node::Product(left, right),
            Combinator::Composition => Node::Composition {
                outer: left,
                inner: right,
            },
        };
        Ok(Operation { node, arity, nodes })
    }

    pub fn kind(&self) -> Option<Combinator> {
        match self.node {
            Node::Identity => None,
            Node::Union(..) => Some(Combinator::Union),
            Node::Intersection(..) => Some(Combinator::Intersection),
            Node::Difference(..) => Some(Combinator::Difference),
            Node::Product(..) => Some(Combinator::Product),
            Node::Composition { .. } => Some(Combinator::Composition),
        }
    }

    /// Number of input sets this operation consumes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Nodes in the expanded tree, i.e. how much work one evaluation or
    /// rendering walks.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn evaluate(&self, inputs: &[Set]) -> CalcResult<Set> {
        self.check_arity(inputs.len())?;
        self.eval_slice(inputs)
    }

    fn check_arity(&self, got: usize) -> CalcResult<()> {
        if self.arity == got {
            Ok(())
        } else {
            Err(CalcError::ArityMismatch {
                expected: self.arity,
                got,
            })
        }
    }

    // Callers guarantee `inputs.len() == self.arity()`.
    fn eval_slice(&self, inputs: &[Set]) -> CalcResult<Set> {
        match &self.node {
            Node::Identity => Ok(inputs[0].clone()),
            Node::Union(l, r) => {
                let (a, b) = eval_children(l, r, inputs)?;
                Ok(a.union(&b))
            }
            Node::Intersection(l, r) => {
                let (a, b) = eval_children(l, r, inputs)?;
                Ok(a.intersection(&b))
            }
            Node::Difference(l, r) => {
                let (a, b) = eval_children(l, r, inputs)?;
                Ok(a.difference(&b))
            }
            Node::Product(l, r) => {
                let (a, b) = eval_children(l, r, inputs)?;
                a.product(&b)
            }
            Node::Composition { outer, inner } => {
                let mid = inner.eval_slice(inputs)?;
                outer.eval_slice(std::slice::from_ref(&mid))
            }
        }
    }

    /// Render with placeholder names drawn from `names`.
    pub fn render_structure(&self, names: &mut NameGenerator) -> String {
        self.render(&mut || names.next().unwrap_or_default())
    }

    /// Render with the given sets in place of the leaves.
    pub fn render_with_values(&self, sets: &[Set]) -> CalcResult<String> {
        self.check_arity(sets.len())?;
        let mut values = sets.iter();
        Ok(self.render(&mut || values.next().map(Set::to_string).unwrap_or_default()))
    }

    fn render(&self, leaf: &mut dyn FnMut() -> String) -> String {
        match &self.node {
            Node::Identity => leaf(),
            Node::Union(l, r)
            | Node::Intersection(l, r)
            | Node::Difference(l, r)
            | Node::Product(l, r) => {
                let symbol = self.kind().map_or("?", Combinator::symbol);
                let left = l.render(leaf);
                let right = r.render(leaf);
                format!("({} {} {})", left, symbol, right)
            }
            Node::Composition { outer, inner } => {
                // The outer operation has a single leaf; it stands for the inner result.
                let inner_text = inner.render(leaf);
                outer.render(&mut || inner_text.clone())
            }
        }
    }
}

fn eval_children(left: &Operation, right: &Operation, inputs: &[Set]) -> CalcResult<(Set, Set)> {
    let (first, rest) = inputs.split_at(left.arity);
    Ok((left.eval_slice(first)?, right.eval_slice(rest)?))
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_structure(&mut NameGenerator::new()))
    }
}
