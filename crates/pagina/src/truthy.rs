//! Truthiness: the single rule mapping any probe result to pass/fail.
//!
//! Waits and presence checks share one evaluator so their semantics never
//! drift apart. Values are first snapshotted into the closed [`Evaluated`]
//! variant set, then judged by an exhaustive match; adding a new content
//! kind means adding a variant, checked at compile time.

use crate::element::{Element, ElementList, Resolved};
use crate::truthy::Evaluated::{Absent, Bool, Number, Opaque, Seq, Text};

/// Snapshot of a value for truthiness evaluation and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    /// A numeric value; falsy iff exactly zero
    Number(f64),
    /// A textual value; falsy iff empty
    Text(String),
    /// A boolean, taken as-is
    Bool(bool),
    /// An ordered collection; falsy if empty, otherwise the conjunction of
    /// its items
    Seq(Vec<Evaluated>),
    /// An element handle; falsy iff its on-page position is unknown
    Element {
        /// Whether the element's position could be determined
        located: bool,
    },
    /// An empty-content sentinel, or no value at all; always falsy
    Absent,
    /// Anything else; always truthy
    Opaque,
}

impl Evaluated {
    /// Judge the snapshot. Total and idempotent.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Number(n) => *n != 0.0,
            Text(s) => !s.is_empty(),
            Bool(b) => *b,
            Seq(items) => !items.is_empty() && items.iter().all(Self::is_truthy),
            Self::Element { located } => *located,
            Absent => false,
            Opaque => true,
        }
    }

    /// Human-readable rendering for wait-timeout diagnostics
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Number(n) => n.to_string(),
            Text(s) => format!("\"{s}\""),
            Bool(b) => b.to_string(),
            Seq(items) if items.is_empty() => "empty list".to_string(),
            Seq(items) => {
                let inner: Vec<String> = items.iter().map(Self::describe).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Element { located: true } => "element".to_string(),
            Self::Element { located: false } => "element (no location)".to_string(),
            Absent => "absent".to_string(),
            Opaque => "value".to_string(),
        }
    }
}

/// Conversion into the truthiness domain.
///
/// Implemented for everything a probe or content declaration can produce;
/// the conversion must never fail.
pub trait Truthy {
    /// Snapshot this value for evaluation
    fn evaluate(&self) -> Evaluated;
}

macro_rules! impl_truthy_for_number {
    ($($ty:ty),*) => {
        $(
            #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
            impl Truthy for $ty {
                fn evaluate(&self) -> Evaluated {
                    Number(*self as f64)
                }
            }
        )*
    };
}

impl_truthy_for_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Truthy for bool {
    fn evaluate(&self) -> Evaluated {
        Bool(*self)
    }
}

impl Truthy for str {
    fn evaluate(&self) -> Evaluated {
        Text(self.to_string())
    }
}

impl Truthy for String {
    fn evaluate(&self) -> Evaluated {
        Text(self.clone())
    }
}

impl Truthy for () {
    fn evaluate(&self) -> Evaluated {
        Opaque
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn evaluate(&self) -> Evaluated {
        (**self).evaluate()
    }
}

impl<T: Truthy> Truthy for [T] {
    fn evaluate(&self) -> Evaluated {
        Seq(self.iter().map(Truthy::evaluate).collect())
    }
}

impl<T: Truthy> Truthy for Vec<T> {
    fn evaluate(&self) -> Evaluated {
        Seq(self.iter().map(Truthy::evaluate).collect())
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn evaluate(&self) -> Evaluated {
        self.as_ref().map_or(Absent, Truthy::evaluate)
    }
}

impl Truthy for Element {
    fn evaluate(&self) -> Evaluated {
        if self.is_present() {
            Evaluated::Element {
                located: self.location().is_some(),
            }
        } else {
            Absent
        }
    }
}

impl Truthy for ElementList {
    fn evaluate(&self) -> Evaluated {
        if self.is_empty() {
            Absent
        } else {
            Seq(self.iter().map(Truthy::evaluate).collect())
        }
    }
}

impl Truthy for Resolved {
    fn evaluate(&self) -> Evaluated {
        match self {
            Self::Single(element) => element.evaluate(),
            Self::List(list) => list.evaluate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod rule_tests {
        use super::*;

        #[test]
        fn test_numbers_falsy_iff_zero() {
            assert!(!0.evaluate().is_truthy());
            assert!(!0.0.evaluate().is_truthy());
            assert!(1.evaluate().is_truthy());
            assert!((-3).evaluate().is_truthy());
            assert!(0.5.evaluate().is_truthy());
        }

        #[test]
        fn test_text_falsy_iff_empty() {
            assert!(!"".evaluate().is_truthy());
            assert!(!String::new().evaluate().is_truthy());
            assert!("x".evaluate().is_truthy());
        }

        #[test]
        fn test_bool_is_itself() {
            assert!(true.evaluate().is_truthy());
            assert!(!false.evaluate().is_truthy());
        }

        #[test]
        fn test_empty_collection_is_falsy() {
            let empty: Vec<i32> = Vec::new();
            assert!(!empty.evaluate().is_truthy());
        }

        #[test]
        fn test_collection_is_conjunction_not_disjunction() {
            assert!(vec![1, 2, 3].evaluate().is_truthy());
            // all items falsy
            assert!(!vec![0, 0].evaluate().is_truthy());
            // a single falsy item poisons the whole collection
            assert!(!vec![1, 0, 3].evaluate().is_truthy());
        }

        #[test]
        fn test_nested_collections_recurse() {
            assert!(vec![vec![1], vec![2]].evaluate().is_truthy());
            assert!(!vec![vec![1], Vec::new()].evaluate().is_truthy());
        }

        #[test]
        fn test_absence_is_falsy() {
            let none: Option<i32> = None;
            assert!(!none.evaluate().is_truthy());
            assert!(Some(1).evaluate().is_truthy());
            assert!(!Some(0).evaluate().is_truthy());
        }

        #[test]
        fn test_anything_else_is_truthy() {
            assert!(().evaluate().is_truthy());
        }
    }

    mod describe_tests {
        use super::*;

        #[test]
        fn test_empty_seq_describes_as_empty_list() {
            let empty: Vec<i32> = Vec::new();
            assert_eq!(empty.evaluate().describe(), "empty list");
        }

        #[test]
        fn test_number_and_text() {
            assert_eq!(5.evaluate().describe(), "5");
            assert_eq!("abc".evaluate().describe(), "\"abc\"");
        }

        #[test]
        fn test_seq_lists_items() {
            assert_eq!(vec![1, 2].evaluate().describe(), "[1, 2]");
        }

        #[test]
        fn test_absent() {
            let none: Option<i32> = None;
            assert_eq!(none.evaluate().describe(), "absent");
        }
    }

    proptest! {
        #[test]
        fn prop_evaluation_is_idempotent(n in any::<f64>()) {
            let first = n.evaluate().is_truthy();
            let second = n.evaluate().is_truthy();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_text_truthiness_matches_emptiness(s in ".*") {
            prop_assert_eq!(s.evaluate().is_truthy(), !s.is_empty());
        }

        #[test]
        fn prop_collection_conjunction(values in proptest::collection::vec(any::<i32>(), 0..16)) {
            let expected = !values.is_empty() && values.iter().all(|v| *v != 0);
            prop_assert_eq!(values.evaluate().is_truthy(), expected);
        }
    }
}
