use super::*;
use crate::segment::model::{Segment, normalize};

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

fn seg(clip: &str, start: f64, end: f64, weight: f64, looped: bool) -> NormalizedSegment {
    normalize(&Segment {
        source: "avatar.glb".to_owned(),
        clip_name: Some(clip.to_owned()),
        start,
        end,
        weight: Some(weight),
        looped: Some(looped),
    })
}

fn durations() -> BTreeMap<String, f64> {
    let mut d = BTreeMap::new();
    d.insert("avatar.glb".to_owned(), 3.0);
    d.insert("avatar.glb/Idle".to_owned(), 2.0);
    d.insert("avatar.glb/Talking".to_owned(), 1.0);
    d
}

#[test]
fn btreemap_lookup_keeps_named_clips_qualified() {
    let d = durations();
    let named = ClipSelector::Named("Idle".to_owned());
    assert_eq!(d.clip_duration("avatar.glb", &named), Some(2.0));
    let other = ClipSelector::Named("Waving".to_owned());
    assert_eq!(d.clip_duration("avatar.glb", &other), None);
    assert_eq!(d.clip_duration("avatar.glb", &ClipSelector::First), Some(3.0));
    assert_eq!(d.clip_duration("other.glb", &ClipSelector::First), None);
}

#[test]
fn inactive_segments_are_skipped() {
    let segs = vec![seg("Idle", 1.0, 2.0, 1.0, false)];
    let out = active_segments(
        &segs,
        FrameIndex(0),
        fps30(),
        &durations(),
        CompositionPolicy::Weighted,
    )
    .unwrap();
    assert!(out.is_empty());
}

#[test]
fn policies_pick_overlapping_segments() {
    let segs = vec![
        seg("Idle", 0.0, 4.0, 0.8, true),
        seg("Talking", 0.0, 4.0, 0.6, true),
    ];
    let d = durations();
    let frame = FrameIndex(45); // 1.5s

    let first = active_segments(&segs, frame, fps30(), &d, CompositionPolicy::FirstWins).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].index, 0);
    assert!((first[0].local_time - 1.5).abs() < 1e-9);
    assert_eq!(first[0].weight, 0.8);

    let last = active_segments(&segs, frame, fps30(), &d, CompositionPolicy::LastWins).unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].index, 1);
    assert!((last[0].local_time - 0.5).abs() < 1e-9);

    let mixed = active_segments(&segs, frame, fps30(), &d, CompositionPolicy::Weighted).unwrap();
    assert_eq!(mixed.len(), 2);
    let total: f64 = mixed.iter().map(|a| a.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!((mixed[0].weight - 0.8 / 1.4).abs() < 1e-9);
}

#[test]
fn weighted_keeps_weights_that_fit() {
    let segs = vec![
        seg("Idle", 0.0, 4.0, 0.3, false),
        seg("Talking", 0.0, 4.0, 0.5, false),
    ];
    let out = active_segments(
        &segs,
        FrameIndex(10),
        fps30(),
        &durations(),
        CompositionPolicy::Weighted,
    )
    .unwrap();
    assert_eq!(out[0].weight, 0.3);
    assert_eq!(out[1].weight, 0.5);
}

#[test]
fn missing_duration_names_the_segment() {
    let segs = vec![normalize(&Segment {
        source: "missing.glb".to_owned(),
        clip_name: None,
        start: 0.0,
        end: 1.0,
        weight: None,
        looped: None,
    })];
    let err = active_segments(
        &segs,
        FrameIndex(0),
        fps30(),
        &durations(),
        CompositionPolicy::Weighted,
    )
    .unwrap_err();
    assert!(err.to_string().contains("segment #0"));
}

#[test]
fn unknown_named_clip_does_not_borrow_source_duration() {
    let segs = vec![seg("Waving", 0.0, 4.0, 1.0, false)];
    let err = active_segments(
        &segs,
        FrameIndex(75),
        fps30(),
        &durations(),
        CompositionPolicy::Weighted,
    )
    .unwrap_err();
    assert!(matches!(err, LipsyncError::Evaluation(_)));
    assert!(err.to_string().contains("segment #0"));
    assert!(err.to_string().contains("Waving"));
}

#[test]
fn policy_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&CompositionPolicy::FirstWins).unwrap(),
        "\"first_wins\""
    );
    let p: CompositionPolicy = serde_json::from_str("\"weighted\"").unwrap();
    assert_eq!(p, CompositionPolicy::default());
}
