//! Threshold evaluation of a parsed condition against sample series.
//!
//! The right-hand side of the condition must be a numeric literal. Each
//! series whose samples satisfy the operator's comparator contributes its
//! resource label to the result set.

mod comparators;

use std::collections::BTreeSet;

use policy_core::{ResourceLabel, SampleSeries};

use crate::expr::{Condition, SymbolKind, ValueError};

use comparators::comparator_for;

// ── Threshold evaluator ─────────────────────────────────────────────

/// Evaluates conditions against batches of per-resource samples.
///
/// Stateless and side-effect free: identical inputs give identical results.
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    /// Numeric threshold of the condition's right-hand side.
    ///
    /// Fails if the right operand is not a number literal or does not
    /// parse as a finite `f64`.
    pub fn threshold(cond: &Condition) -> Result<f64, ValueError> {
        if cond.right.kind != SymbolKind::Number {
            return Err(ValueError::NonNumericThreshold {
                kind: cond.right.kind,
                text: cond.right.text.clone(),
            });
        }

        match cond.right.text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ValueError::InvalidNumber(cond.right.text.clone())),
        }
    }

    /// Return the labels of all series that satisfy the condition.
    pub fn evaluate(
        cond: &Condition,
        series: &[SampleSeries],
    ) -> Result<BTreeSet<ResourceLabel>, ValueError> {
        let threshold = Self::threshold(cond)?;
        let compare = comparator_for(cond.operator);

        Ok(series
            .iter()
            .filter(|s| compare(&s.values, threshold))
            .map(|s| s.label.clone())
            .collect())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
