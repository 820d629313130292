//! Finite integer sets, the values operations are evaluated on.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::error::{CalcError, CalcResult};
use crate::input::InputSource;

/// A finite set of integers, kept sorted and free of duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Set {
    elements: BTreeSet<i64>,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a count-prefixed set (`n x1 … xn`) from `source`.
    pub fn read(source: &mut dyn InputSource) -> CalcResult<Set> {
        let count = source
            .next_token()
            .ok_or_else(|| CalcError::Parse("expected set size, found end of input".into()))?;
        let count: usize = count
            .parse()
            .map_err(|_| CalcError::Parse(format!("expected set size, found '{}'", count)))?;

        let mut elements = BTreeSet::new();
        for _ in 0..count {
            let token = source.next_token().ok_or_else(|| {
                CalcError::Parse("expected set element, found end of input".into())
            })?;
            let value = token
                .parse()
                .map_err(|_| CalcError::Parse(format!("expected integer, found '{}'", token)))?;
            elements.insert(value);
        }
        Ok(Set { elements })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, value: i64) -> bool {
        self.elements.contains(&value)
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.elements.iter().copied()
    }

    pub fn union(&self, other: &Set) -> Set {
        self.elements.union(&other.elements).copied().collect()
    }

    pub fn intersection(&self, other: &Set) -> Set {
        self.elements.intersection(&other.elements).copied().collect()
    }

    pub fn difference(&self, other: &Set) -> Set {
        self.elements.difference(&other.elements).copied().collect()
    }

    /// Every pair `(a, b)` with `a` in `self` and `b` in `other`, encoded with [`pair`].
    pub fn product(&self, other: &Set) -> CalcResult<Set> {
        self.iter()
            .cartesian_product(other.iter().collect::<Vec<_>>())
            .map(|(a, b)| pair(a, b).ok_or(CalcError::Overflow { left: a, right: b }))
            .collect()
    }
}

impl FromIterator<i64> for Set {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Set {
            elements: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.elements.iter().join(", "))
    }
}

// ============================================================================
// Pairing
// ============================================================================

/// Zig-zag: 0, -1, 1, -2, 2, … ↦ 0, 1, 2, 3, 4, …
fn zigzag(n: i64) -> u128 {
    if n >= 0 {
        (n as u128) << 1
    } else {
        (((-(n as i128)) as u128) << 1) - 1
    }
}

fn unzigzag(n: u128) -> Option<i64> {
    let half = (n >> 1) as i128;
    let value = if n & 1 == 0 { half } else { -half - 1 };
    i64::try_from(value).ok()
}

/// Encode an integer pair as a single non-negative integer.
///
/// Both components are zig-zag mapped to naturals and combined with the Cantor
/// pairing `(x + y)(x + y + 1)/2 + y`. Returns `None` when the result does not
/// fit in an `i64`.
pub fn pair(a: i64, b: i64) -> Option<i64> {
    let x = zigzag(a);
    let y = zigzag(b);
    let sum = x.checked_add(y)?;
    let triangle = sum.checked_mul(sum.checked_add(1)?)? / 2;
    i64::try_from(triangle.checked_add(y)?).ok()
}

/// Inverse of [`pair`]. Returns `None` for negative input.
pub fn unpair(z: i64) -> Option<(i64, i64)> {
    if z < 0 {
        return None;
    }
    let z = z as u128;
    // Largest w with w(w+1)/2 <= z
    let mut w = ((((8 * z + 1) as f64).sqrt() - 1.0) / 2.0) as u128;
    while w * (w + 1) / 2 > z {
        w -= 1;
    }
    while (w + 1) * (w + 2) / 2 <= z {
        w += 1;
    }
    let y = z - w * (w + 1) / 2;
    let x = w - y;
    Some((unzigzag(x)?, unzigzag(y)?))
}
