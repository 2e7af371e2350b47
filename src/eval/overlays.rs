use std::collections::BTreeMap;

use crate::{
    config::model::{OverlayRule, OverlayTransition, RotationRule},
    eval::signals::VisibilitySignals,
};

/// Resolved presentation state of one overlay for the current tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OverlayState {
    /// Final visibility after suppression.
    pub shown: bool,
    /// The overlay's own trigger condition holds.
    pub eligible: bool,
    /// A later-stage signal is hiding an otherwise eligible overlay.
    pub suppressed: bool,
    /// Transition the consumer plays when `shown` flips.
    pub transition: OverlayTransition,
}

/// Apply the overlay precedence policy.
///
/// An overlay is shown iff it is eligible and none of its `suppressed_by` signals is active. The
/// check is explicit per overlay and does not depend on rule order.
pub fn resolve_overlays(
    rules: &[OverlayRule],
    signals: &VisibilitySignals,
) -> BTreeMap<String, OverlayState> {
    let mut out = BTreeMap::new();
    for rule in rules {
        let eligible = rule.when.as_deref().is_none_or(|s| signals.is_active(s));
        let later_active = rule.suppressed_by.iter().any(|s| signals.is_active(s));
        out.insert(
            rule.name.clone(),
            OverlayState {
                shown: eligible && !later_active,
                eligible,
                suppressed: eligible && later_active,
                transition: rule.transition,
            },
        );
    }
    out
}

/// Rotation angles in degrees keyed by element name.
///
/// Each rule's first element turns by `progress * max_degrees`, the second by the negation.
pub fn resolve_rotations(
    rules: &[RotationRule],
    signals: &VisibilitySignals,
) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    for rule in rules {
        let angle = signals.progress(&rule.signal).clamp(0.0, 1.0) * rule.max_degrees;
        let [forward, backward] = &rule.elements;
        out.insert(forward.clone(), angle);
        out.insert(backward.clone(), -angle);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/eval/overlays.rs"]
mod tests;
