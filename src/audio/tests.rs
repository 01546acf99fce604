use std::time::Duration;

use super::types::{LoadGeneration, PlaybackStatus, RepeatMode};

#[test]
fn repeat_mode_cycles_off_all_one() {
    assert_eq!(RepeatMode::Off.cycled(), RepeatMode::RepeatAll);
    assert_eq!(RepeatMode::RepeatAll.cycled(), RepeatMode::RepeatOne);
    assert_eq!(RepeatMode::RepeatOne.cycled(), RepeatMode::Off);
}

#[test]
fn repeat_mode_returns_to_start_after_three_cycles() {
    for start in [RepeatMode::Off, RepeatMode::RepeatAll, RepeatMode::RepeatOne] {
        assert_eq!(start.cycled().cycled().cycled(), start);
        assert_ne!(start.cycled(), start);
    }
}

#[test]
fn load_generation_is_strictly_increasing() {
    let g0 = LoadGeneration::default();
    let g1 = g0.next();
    let g2 = g1.next();
    assert!(g0 < g1 && g1 < g2);
    assert_eq!(g2.get(), 2);
}

#[test]
fn progress_is_zero_without_duration_and_clamped() {
    let mut s = PlaybackStatus {
        position: Duration::from_secs(5),
        ..PlaybackStatus::default()
    };
    assert_eq!(s.progress(), 0.0);

    s.duration = Duration::from_secs(10);
    assert!((s.progress() - 0.5).abs() < 1e-9);

    s.position = Duration::from_secs(12);
    assert_eq!(s.progress(), 1.0);
}
