//! Series comparators, one per operator.
//!
//! Each comparator answers whether any sample of a series satisfies the
//! comparison against the threshold. An empty series never matches and NaN
//! samples never satisfy any comparison.

use crate::expr::Operator;

/// Pure predicate over a series and a threshold.
pub(crate) type Comparator = fn(&[f64], f64) -> bool;

/// Select the comparator for `op`.
pub(crate) fn comparator_for(op: Operator) -> Comparator {
    match op {
        Operator::Equal => any_equal,
        Operator::NotEqual => any_not_equal,
        Operator::LessOrEqual => any_less_or_equal,
        Operator::GreaterOrEqual => any_greater_or_equal,
        Operator::Less => any_less,
        Operator::Greater => any_greater,
    }
}

fn any(values: &[f64], pred: impl Fn(f64) -> bool) -> bool {
    values.iter().copied().filter(|v| !v.is_nan()).any(pred)
}

fn any_equal(values: &[f64], threshold: f64) -> bool {
    any(values, |v| v == threshold)
}

fn any_not_equal(values: &[f64], threshold: f64) -> bool {
    any(values, |v| v != threshold)
}

fn any_less_or_equal(values: &[f64], threshold: f64) -> bool {
    any(values, |v| v <= threshold)
}

fn any_greater_or_equal(values: &[f64], threshold: f64) -> bool {
    any(values, |v| v >= threshold)
}

fn any_less(values: &[f64], threshold: f64) -> bool {
    any(values, |v| v < threshold)
}

fn any_greater(values: &[f64], threshold: f64) -> bool {
    any(values, |v| v > threshold)
}
