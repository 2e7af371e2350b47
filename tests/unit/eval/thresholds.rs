use super::*;
use crate::eval::geometry::DocumentLayout;

fn rule(signal: &str, marker: &str, comparator: Comparator) -> ThresholdRule {
    ThresholdRule {
        signal: signal.to_string(),
        marker: marker.to_string(),
        comparator,
    }
}

#[test]
fn step_includes_both_bounds() {
    assert!(step_signal(0.0, 800.0, 0.5));
    assert!(step_signal(400.0, 800.0, 0.5));
    assert!(!step_signal(400.1, 800.0, 0.5));
    assert!(!step_signal(-0.1, 800.0, 0.5));
    assert!(step_signal(600.0, 800.0, 0.75));
    assert!(!step_signal(f64::NAN, 800.0, 0.5));
}

#[test]
fn step_is_reversible() {
    let at = |t: f64| step_signal(t, 800.0, 0.5);
    let first = at(250.0);
    let _ = at(-300.0);
    let _ = at(900.0);
    assert_eq!(at(250.0), first);
    assert!(first);
}

#[test]
fn reached_has_no_lower_bound() {
    assert!(reached_signal(-5000.0, 800.0, 0.0));
    assert!(reached_signal(0.0, 800.0, 0.0));
    assert!(!reached_signal(1.0, 800.0, 0.0));
}

#[test]
fn progress_endpoints_and_clamping() {
    // Span of 1000px between start and end markers, viewport 800px.
    let vh = 800.0;
    assert_eq!(range_progress(800.0, -200.0, vh), 0.0);
    assert_eq!(range_progress(-200.0, -1200.0, vh), 1.0);
    assert_eq!(range_progress(300.0, -700.0, vh), 0.5);
    assert_eq!(range_progress(5000.0, 4000.0, vh), 0.0);
    assert_eq!(range_progress(-3000.0, -4000.0, vh), 1.0);
}

#[test]
fn degenerate_span_yields_zero() {
    assert_eq!(range_progress(100.0, 100.0, 800.0), 0.0);
    assert_eq!(range_progress(100.0, 300.0, 800.0), 0.0);
    assert_eq!(range_progress(f64::NAN, 0.0, 800.0), 0.0);
}

#[test]
fn badge_trigger_scenario() {
    let layout = DocumentLayout::new(6000.0).with_marker("badgeTrigger", 2000.0);
    let rules = vec![rule("badge", "badgeTrigger", Comparator::Step { fraction: 0.5 })];

    let s = evaluate_rules(&rules, &layout.sample(1700.0, 800.0), &layout);
    assert_eq!(s.get("badge"), Some(SignalValue::Flag(true)));

    let s = evaluate_rules(&rules, &layout.sample(2050.0, 800.0), &layout);
    assert_eq!(s.get("badge"), Some(SignalValue::Flag(false)));

    let s = evaluate_rules(&rules, &layout.sample(1700.0, 800.0), &layout);
    assert!(s.is_active("badge"));
}

#[test]
fn missing_marker_keeps_defaults() {
    let layout = DocumentLayout::new(6000.0).with_marker("start", 1000.0);
    let rules = vec![
        rule("flag", "absent", Comparator::Reached { fraction: 10.0 }),
        rule(
            "spin",
            "start",
            Comparator::Progress {
                end_marker: "absent".to_string(),
                engaged_signal: Some("spinning".to_string()),
            },
        ),
    ];
    let s = evaluate_rules(&rules, &layout.sample(900.0, 800.0), &layout);
    assert_eq!(s.get("flag"), Some(SignalValue::Flag(false)));
    assert_eq!(s.get("spin"), Some(SignalValue::Progress(0.0)));
    assert_eq!(s.get("spinning"), Some(SignalValue::Flag(false)));
    assert_eq!(s.len(), 3);
}

#[test]
fn progress_rule_derives_engaged_flag() {
    let layout = DocumentLayout::new(6000.0)
        .with_marker("start", 2000.0)
        .with_marker("end", 1000.0);
    let rules = vec![rule(
        "spin",
        "start",
        Comparator::Progress {
            end_marker: "end".to_string(),
            engaged_signal: Some("spinning".to_string()),
        },
    )];

    // start.top = 2000 - 1700 = 300 -> traveled 500 of 1000.
    let s = evaluate_rules(&rules, &layout.sample(1700.0, 800.0), &layout);
    assert_eq!(s.progress("spin"), 0.5);
    assert!(s.is_active("spinning"));

    let s = evaluate_rules(&rules, &layout.sample(0.0, 800.0), &layout);
    assert_eq!(s.progress("spin"), 0.0);
    assert!(!s.is_active("spinning"));
}
