use super::*;

#[test]
fn unknown_signals_read_as_inactive() {
    let s = VisibilitySignals::new();
    assert!(!s.is_active("nope"));
    assert_eq!(s.progress("nope"), 0.0);
    assert!(s.is_empty());
}

#[test]
fn serializes_as_plain_map() {
    let mut s = VisibilitySignals::new();
    s.set("badge", SignalValue::Flag(true));
    s.set("spin", SignalValue::Progress(0.25));
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json, serde_json::json!({ "badge": true, "spin": 0.25 }));

    let back: VisibilitySignals = serde_json::from_value(json).unwrap();
    assert_eq!(back, s);
}
