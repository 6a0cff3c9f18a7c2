use super::*;
use crate::cue::shape::{Shape, silence};

fn short_set() -> CueSet {
    CueSet::new(
        vec![Cue::new(0.0, Shape::A, 0.1), Cue::new(0.1, Shape::D, 0.1)],
        0.2,
    )
}

#[test]
fn frame_count_includes_tail_padding() {
    let tl = build_timeline(&short_set(), &TimelineConfig::default()).unwrap();
    assert_eq!(tl.len(), 21);
    assert_eq!(tl.range().len_frames(), 21);
    assert_eq!(tl.fps(), Fps::new(30, 1).unwrap());
}

#[test]
fn frames_are_indexed_in_order() {
    let tl = build_timeline(&short_set(), &TimelineConfig::default()).unwrap();
    for (i, rec) in tl.iter().enumerate() {
        assert_eq!(rec.frame, FrameIndex(i as u64));
    }
}

#[test]
fn trailing_frames_hold_last_shape() {
    let tl = build_timeline(&short_set(), &TimelineConfig::default()).unwrap();
    let last = tl.weights_at(FrameIndex(20)).unwrap();
    assert_eq!(*last, Shape::D.weights());
    assert!(tl.get(FrameIndex(21)).is_none());
}

#[test]
fn leading_silence_before_first_cue() {
    let set = CueSet::new(vec![Cue::new(0.5, Shape::C, 0.2)], 0.7);
    let tl = build_timeline(&set, &TimelineConfig::default()).unwrap();
    assert_eq!(*tl.weights_at(FrameIndex(0)).unwrap(), silence());
    assert_eq!(*tl.weights_at(FrameIndex(14)).unwrap(), silence());
    assert_eq!(*tl.weights_at(FrameIndex(15)).unwrap(), Shape::C.weights());
}

#[test]
fn empty_cue_set_is_rejected() {
    let set = CueSet::new(vec![], 1.0);
    let err = build_timeline(&set, &TimelineConfig::default()).unwrap_err();
    assert!(matches!(err, LipsyncError::EmptyAnalysisResult));
}

#[test]
fn oversized_duration_is_a_validation_error() {
    let set = CueSet::new(vec![Cue::new(0.0, Shape::A, 0.1)], 1e17);
    let err = build_timeline(&set, &TimelineConfig::default()).unwrap_err();
    assert!(matches!(err, LipsyncError::Validation(_)));
    assert!(err.to_string().contains("limit"));

    let parallel = TimelineConfig {
        parallel: true,
        ..TimelineConfig::default()
    };
    assert!(build_timeline(&set, &parallel).is_err());
}

#[test]
fn frame_limit_is_inclusive() {
    let fps = Fps::new(1000, 1).unwrap();
    let config = TimelineConfig {
        fps,
        tail_padding: 0.0,
        ..TimelineConfig::default()
    };
    let at_limit = CueSet::new(vec![Cue::new(0.0, Shape::A, 0.1)], 1000.0);
    assert_eq!(config.total_frames(at_limit.duration), MAX_TIMELINE_FRAMES);
    assert!(build_timeline(&at_limit, &config).is_ok());

    let past_limit = CueSet::new(vec![Cue::new(0.0, Shape::A, 0.1)], 1000.001);
    assert!(build_timeline(&past_limit, &config).is_err());
}

#[test]
fn parallel_matches_sequential() {
    let set = CueSet::new(
        vec![
            Cue::new(0.0, Shape::X, 0.2),
            Cue::new(0.2, Shape::B, 0.15),
            Cue::new(0.35, Shape::E, 0.3),
            Cue::new(0.65, Shape::F, 0.4),
        ],
        1.05,
    );
    let seq = build_timeline(&set, &TimelineConfig::default()).unwrap();
    let par = build_timeline(
        &set,
        &TimelineConfig {
            parallel: true,
            threads: Some(2),
            ..TimelineConfig::default()
        },
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn config_validation_rejects_bad_values() {
    let bad_fps = TimelineConfig {
        fps: Fps { num: 0, den: 1 },
        ..TimelineConfig::default()
    };
    assert!(bad_fps.validate().is_err());

    let bad_window = TimelineConfig {
        blend_window: -0.1,
        ..TimelineConfig::default()
    };
    assert!(bad_window.validate().is_err());

    let bad_threads = TimelineConfig {
        threads: Some(0),
        ..TimelineConfig::default()
    };
    assert!(bad_threads.validate().is_err());
}

#[test]
fn config_deserializes_with_defaults() {
    let cfg: TimelineConfig = serde_json::from_str(r#"{ "fps": 24 }"#).unwrap();
    assert_eq!(cfg.fps, Fps { num: 24, den: 1 });
    assert_eq!(cfg.blend_window, DEFAULT_BLEND_WINDOW);
    assert_eq!(cfg.tail_padding, DEFAULT_TAIL_PADDING);
    assert!(!cfg.parallel);
}
