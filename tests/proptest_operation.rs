//! Property tests for operation evaluation


use std::collections::HashSet;
use std::rc::Rc;

use proptest::prelude::*;
use setcalc::set::{pair, unpair};
use setcalc::{CalcError, Combinator, Operation, Set};

fn builtin(kind: Combinator) -> Operation {
    Operation::over_identities(kind).expect("built-in combinator")
}

proptest! {
    /// Union of two identities is set union, in either order
    #[test]
    fn union_is_commutative(a in generators::arb_set(), b in generators::arb_set()) {
        let union = builtin(Combinator::Union);
        let ab = union.evaluate(&[a.clone(), b.clone()]).unwrap();
        let ba = union.evaluate(&[b.clone(), a.clone()]).unwrap();

        let expected: Set = a.iter().chain(b.iter()).collect();
        prop_assert_eq!(&ab, &expected);
        prop_assert_eq!(ab, ba);
    }

    /// Intersection keeps exactly the shared elements
    #[test]
    fn intersection_keeps_shared(a in generators::arb_set(), b in generators::arb_set()) {
        let result = builtin(Combinator::Intersection).evaluate(&[a.clone(), b.clone()]).unwrap();
        for x in result.iter() {
            prop_assert!(a.contains(x) && b.contains(x));
        }
        for x in a.iter().filter(|x| b.contains(*x)) {
            prop_assert!(result.contains(x));
        }
    }

    /// Difference is A \ B and depends on operand order
    #[test]
    fn difference_is_ordered(a in generators::arb_set(), b in generators::arb_set()) {
        let diff = builtin(Combinator::Difference);
        let ab = diff.evaluate(&[a.clone(), b.clone()]).unwrap();
        let ba = diff.evaluate(&[b.clone(), a.clone()]).unwrap();

        let expected: Set = a.iter().filter(|x| !b.contains(*x)).collect();
        prop_assert_eq!(&ab, &expected);
        if a != b {
            prop_assert_ne!(ab, ba);
        }
    }

    /// Product has |A|·|B| elements and each decodes to a unique pair
    #[test]
    fn product_pairs_are_unique(a in generators::arb_set(), b in generators::arb_set()) {
        let product = builtin(Combinator::Product).evaluate(&[a.clone(), b.clone()]).unwrap();
        prop_assert_eq!(product.len(), a.len() * b.len());

        let mut seen = HashSet::new();
        for z in product.iter() {
            let (x, y) = unpair(z).expect("product elements are non-negative");
            prop_assert!(a.contains(x));
            prop_assert!(b.contains(y));
            prop_assert!(seen.insert((x, y)));
        }
    }

    /// The pairing is injective and inverted by `unpair`
    #[test]
    fn pairing_inverts(x in -1_000_000i64..1_000_000, y in -1_000_000i64..1_000_000) {
        let z = pair(x, y).expect("small values fit");
        prop_assert!(z >= 0);
        prop_assert_eq!(unpair(z), Some((x, y)));
    }

    /// Composition feeds the inner result to the outer operation
    #[test]
    fn composition_applies_inner_then_outer(
        f in generators::arb_unary_operation(),
        (g, inputs) in generators::arb_operation_with_inputs()
    ) {
        let comp = Operation::combine(Combinator::Composition, f.clone(), g.clone()).unwrap();
        prop_assert_eq!(comp.arity(), g.arity());

        let direct = comp.evaluate(&inputs).unwrap();
        let staged = f.evaluate(&[g.evaluate(&inputs).unwrap()]).unwrap();
        prop_assert_eq!(direct, staged);
    }

    /// Inputs are handed to leaves left to right
    #[test]
    fn inputs_split_by_child_arity(
        (left, left_inputs) in generators::arb_operation_with_inputs(),
        (right, right_inputs) in generators::arb_operation_with_inputs()
    ) {
        let union = Operation::combine(Combinator::Union, left.clone(), right.clone()).unwrap();
        let inputs: Vec<Set> = left_inputs.iter().chain(&right_inputs).cloned().collect();

        let expected = left
            .evaluate(&left_inputs)
            .unwrap()
            .union(&right.evaluate(&right_inputs).unwrap());
        prop_assert_eq!(union.evaluate(&inputs).unwrap(), expected);
    }

    /// Any wrong input count is an arity mismatch
    #[test]
    fn wrong_input_count_is_rejected(
        op in generators::arb_operation(),
        extra in 1usize..3,
        set in generators::arb_set()
    ) {
        let inputs = vec![set; op.arity() + extra];
        let is_arity_mismatch = matches!(
            op.evaluate(&inputs),
            Err(CalcError::ArityMismatch { .. })
        );
        prop_assert!(is_arity_mismatch);
        prop_assert!(op.render_with_values(&inputs).is_err());
    }

    /// Structural rendering names every leaf once
    #[test]
    fn structure_names_each_leaf(op in generators::arb_operation()) {
        let rendered = op.to_string();
        let names = rendered
            .split(|c: char| !c.is_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .count();
        prop_assert_eq!(names, op.arity());
    }
}

#[test]
fn nested_product_partitions_inputs() {
    let union = Rc::new(builtin(Combinator::Union));
    let id = Rc::new(Operation::identity());
    let prod = Operation::combine(Combinator::Product, union, id).unwrap();
    assert_eq!(prod.arity(), 3);

    let inputs: Vec<Set> = [[1], [2], [0]]
        .into_iter()
        .map(|values| values.into_iter().collect())
        .collect();
    let result = prod.evaluate(&inputs).unwrap();
    let expected: Set = [pair(1, 0).unwrap(), pair(2, 0).unwrap()].into_iter().collect();
    assert_eq!(result, expected);
}
