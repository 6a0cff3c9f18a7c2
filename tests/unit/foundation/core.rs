use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(FrameRange::new(FrameIndex(4), FrameIndex(4)).unwrap().is_empty());
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps { num: 30, den: 0 }.validate().is_err());
}

#[test]
fn fps_ceil_covers_padded_duration() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(0.2 + 0.5), 21);
    assert_eq!(fps.secs_to_frames_floor(1.99), 59);
    assert_eq!(fps.secs_to_frames_floor(-1.0), 0);
}

#[test]
fn fps_frames_to_secs_divides_by_rate() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_to_secs(150), 5.0);
    assert_eq!(fps.frames_to_secs(0), 0.0);
}

#[test]
fn fps_deserializes_from_integer_or_ratio() {
    let whole: Fps = serde_json::from_str("24").unwrap();
    assert_eq!(whole, Fps { num: 24, den: 1 });
    let ratio: Fps = serde_json::from_str(r#"{"num":30000,"den":1001}"#).unwrap();
    assert_eq!(ratio, Fps { num: 30000, den: 1001 });
}
