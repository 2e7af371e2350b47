use super::*;

fn at(offset: f64) -> ScrollSample {
    ScrollSample::new(offset, 800.0, 3200.0)
}

#[test]
fn latest_sample_wins_within_a_paint() {
    let mut t = ScrollThrottle::new();
    assert!(t.push(at(10.0)));
    assert!(!t.push(at(20.0)));
    assert!(!t.push(at(30.0)));
    assert_eq!(t.take_for_paint(), Some(at(30.0)));
    assert_eq!(t.coalesced(), 2);
}

#[test]
fn paint_clears_pending_flag() {
    let mut t = ScrollThrottle::new();
    assert_eq!(t.take_for_paint(), None);
    t.push(at(5.0));
    assert!(t.is_pending());
    t.take_for_paint();
    assert!(!t.is_pending());
    assert_eq!(t.take_for_paint(), None);
    assert!(t.push(at(6.0)));
}
