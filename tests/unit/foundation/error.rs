use std::error::Error as _;

use super::*;

#[test]
fn frame_errors_name_the_frame() {
    let err = ReelError::frame(42, "truncated jpeg");
    assert_eq!(err.to_string(), "frame 42: truncated jpeg");
    assert_eq!(err.frame_number(), Some(42));
    assert_eq!(ReelError::config("x").frame_number(), None);
}

#[test]
fn parse_errors_keep_the_json_cause() {
    let json_err = serde_json::from_str::<u32>("{").unwrap_err();
    let err = ReelError::parse("layout", json_err);
    assert_eq!(err.to_string(), "parse layout");
    assert!(err.source().is_some());
}

#[test]
fn anyhow_context_passes_through() {
    let err: ReelError = anyhow::anyhow!("disk gone")
        .context("read frame bytes from 'f.jpg'")
        .into();
    assert!(err.to_string().contains("f.jpg"));
    assert!(matches!(err, ReelError::Other(_)));
}
