use super::*;
use crate::segment::model::{Segment, normalize};

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn looping_wraps_elapsed_time() {
    let t = local_time(FrameIndex(150), fps30(), 0.0, 2.0, true);
    assert!((t - 1.0).abs() < 1e-9);
}

#[test]
fn non_looping_clamps_to_clip_end() {
    let t = local_time(FrameIndex(150), fps30(), 0.0, 2.0, false);
    assert_eq!(t, 2.0);
}

#[test]
fn loop_boundary_wraps_to_zero() {
    let t = local_time(FrameIndex(60), fps30(), 0.0, 2.0, true);
    assert!(t.abs() < 1e-9);
    assert!(t < 2.0);
}

#[test]
fn segment_start_offsets_elapsed_time() {
    // Segment starts at 1.0s => frame 30 is local time 0.
    assert_eq!(local_time(FrameIndex(30), fps30(), 1.0, 5.0, false), 0.0);
    let t = local_time(FrameIndex(45), fps30(), 1.0, 5.0, false);
    assert!((t - 0.5).abs() < 1e-9);
}

#[test]
fn zero_duration_clip_degenerates_to_zero() {
    assert_eq!(local_time(FrameIndex(90), fps30(), 0.0, 0.0, true), 0.0);
    assert_eq!(local_time(FrameIndex(90), fps30(), 0.0, 0.0, false), 0.0);
}

#[test]
fn raw_mapping_is_negative_before_segment_start() {
    let t = local_time(FrameIndex(15), fps30(), 1.0, 5.0, false);
    assert!((t + 0.5).abs() < 1e-9);
}

#[test]
fn looped_result_stays_in_clip_range_before_start() {
    let t = local_time(FrameIndex(29), fps30(), 1.0, 2.0, true);
    assert!((0.0..2.0).contains(&t));
}

#[test]
fn segment_time_is_suppressed_outside_segment() {
    let seg = normalize(&Segment {
        source: "avatar.glb".to_owned(),
        clip_name: Some("Idle".to_owned()),
        start: 1.0,
        end: 2.0,
        weight: None,
        looped: Some(true),
    });
    assert_eq!(segment_local_time(&seg, FrameIndex(29), fps30(), 0.4), None);
    assert_eq!(segment_local_time(&seg, FrameIndex(30), fps30(), 0.4), Some(0.0));
    let t = segment_local_time(&seg, FrameIndex(45), fps30(), 0.4).unwrap();
    assert!((t - 0.1).abs() < 1e-9);
    assert_eq!(segment_local_time(&seg, FrameIndex(60), fps30(), 0.4), None);
}
