use crate::{
    config::model::{Comparator, ThresholdRule},
    eval::geometry::MarkerGeometry,
    eval::signals::{SignalValue, VisibilitySignals},
    foundation::core::ScrollSample,
};

/// Step rule: `0 <= top <= fraction * viewport_height`.
///
/// Not latched: scrolling back past either bound turns it off again.
pub fn step_signal(marker_top: f64, viewport_height: f64, fraction: f64) -> bool {
    let threshold = fraction * viewport_height;
    (0.0..=threshold).contains(&marker_top)
}

/// Reached rule: `top <= fraction * viewport_height`, no lower bound.
pub fn reached_signal(marker_top: f64, viewport_height: f64, fraction: f64) -> bool {
    marker_top <= fraction * viewport_height
}

/// Progress of the range opened by `start_top` and closed by `end_top`.
///
/// `total_span = start_top - end_top`, `traveled = clamp(viewport_height - start_top, 0,
/// total_span)`, result `traveled / total_span`, or 0 for an empty or inverted span.
pub fn range_progress(start_top: f64, end_top: f64, viewport_height: f64) -> f64 {
    let total_span = start_top - end_top;
    if !total_span.is_finite() || total_span <= 0.0 {
        return 0.0;
    }
    let traveled = (viewport_height - start_top).clamp(0.0, total_span);
    let progress = traveled / total_span;
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Evaluate every rule against the current sample and live marker geometry.
///
/// Every signal a rule can write is present in the output. Rules whose markers are not measurable
/// keep their default (false / 0).
#[tracing::instrument(level = "trace", skip(rules, geometry))]
pub fn evaluate_rules<G: MarkerGeometry + ?Sized>(
    rules: &[ThresholdRule],
    sample: &ScrollSample,
    geometry: &G,
) -> VisibilitySignals {
    let mut out = VisibilitySignals::new();
    let vh = sample.viewport_height;

    for rule in rules {
        let top = geometry.viewport_top(&rule.marker, sample);
        match &rule.comparator {
            Comparator::Step { fraction } => {
                let on = top.is_some_and(|t| step_signal(t, vh, *fraction));
                out.set(&rule.signal, SignalValue::Flag(on));
            }
            Comparator::Reached { fraction } => {
                let on = top.is_some_and(|t| reached_signal(t, vh, *fraction));
                out.set(&rule.signal, SignalValue::Flag(on));
            }
            Comparator::Progress {
                end_marker,
                engaged_signal,
            } => {
                let end_top = geometry.viewport_top(end_marker, sample);
                let progress = match (top, end_top) {
                    (Some(start), Some(end)) => range_progress(start, end, vh),
                    _ => 0.0,
                };
                out.set(&rule.signal, SignalValue::Progress(progress));
                if let Some(engaged) = engaged_signal {
                    out.set(engaged, SignalValue::Flag(progress > 0.0));
                }
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/eval/thresholds.rs"]
mod tests;
