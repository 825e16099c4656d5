//! Pure timing arithmetic for synchronized playback.
//!
//! Stateless functions over (target wall-clock time, target video time,
//! current seek position, now). The controller owns all sequencing; nothing
//! here touches the decoder.

use crate::core::config::SyncTuning;

/// Distance from the current seek position to the requested video time.
///
/// `None` means the caller requested no timecode correction (resume at
/// whatever position the decoder currently holds), which is distance zero.
pub fn seek_difference(current_seek_ms: i64, target_video_ms: Option<i64>) -> i64 {
    match target_video_ms {
        Some(target) => target - current_seek_ms,
        None => 0,
    }
}

/// How long to wait before issuing play so the decoder lands on the target
/// video time at the target wall-clock time.
///
/// Negative means the deadline has already passed and playback starts late.
pub fn play_delay(target_wall_ms: i64, now_ms: i64, seek_difference_ms: i64) -> i64 {
    let available = target_wall_ms - now_ms;
    available - seek_difference_ms
}

/// Whether a corrective seek must be issued before timed play.
///
/// True when normal playback cannot catch up within the remaining wall-clock
/// slack, or when the decoder already sits too far ahead of the target.
/// Both boundaries are exclusive.
pub fn needs_reseek(seek_difference_ms: i64, available_ms: i64, tuning: &SyncTuning) -> bool {
    seek_difference_ms > available_ms || seek_difference_ms < -tuning.max_delayed_sync_ms
}

/// Seek slightly ahead of the nominal target to pre-compensate for the
/// decoder's own seek latency.
pub fn corrective_seek_target(
    target_video_ms: i64,
    elapsed_since_play_ms: i64,
    tuning: &SyncTuning,
) -> i64 {
    target_video_ms + elapsed_since_play_ms + tuning.max_sync_diff_ms
}

/// Whether the current position is already close enough ahead of the target
/// that a corrective seek would be redundant.
pub fn within_seek_tolerance(diff_from_target_ms: i64, tuning: &SyncTuning) -> bool {
    diff_from_target_ms >= 0 && diff_from_target_ms < tuning.max_sync_diff_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_difference_is_exact() {
        assert_eq!(seek_difference(5000, Some(5000)), 0);
        assert_eq!(seek_difference(0, Some(9000)), 9000);
        assert_eq!(seek_difference(9300, Some(9000)), -300);
        assert_eq!(seek_difference(1234, Some(0)), -1234);
    }

    #[test]
    fn test_seek_difference_without_correction_is_zero() {
        assert_eq!(seek_difference(0, None), 0);
        assert_eq!(seek_difference(123_456, None), 0);
    }

    #[test]
    fn test_play_delay() {
        // now=1000, target=1500, no correction needed: wait the full slack.
        assert_eq!(play_delay(1500, 1000, 0), 500);
        // Position behind target eats into the slack.
        assert_eq!(play_delay(1500, 1000, 200), 300);
        // Position ahead of target extends the wait.
        assert_eq!(play_delay(1500, 1000, -300), 800);
        // Deadline already passed.
        assert_eq!(play_delay(900, 1000, 0), -100);
    }

    #[test]
    fn test_needs_reseek_when_slack_is_insufficient() {
        let tuning = SyncTuning::default();
        assert!(needs_reseek(9000, 100, &tuning));
        assert!(!needs_reseek(100, 9000, &tuning));
    }

    #[test]
    fn test_needs_reseek_when_decoder_is_far_ahead() {
        let tuning = SyncTuning::default();
        assert!(needs_reseek(-2001, 500, &tuning));
        assert!(!needs_reseek(-1999, 500, &tuning));
    }

    #[test]
    fn test_needs_reseek_boundaries_are_exclusive() {
        let tuning = SyncTuning::default();
        // seek_diff == available: playback can exactly catch up.
        assert!(!needs_reseek(100, 100, &tuning));
        // seek_diff == -max_delayed_sync: still tolerated.
        assert!(!needs_reseek(-tuning.max_delayed_sync_ms, 500, &tuning));
        assert!(needs_reseek(101, 100, &tuning));
        assert!(needs_reseek(-tuning.max_delayed_sync_ms - 1, 500, &tuning));
    }

    #[test]
    fn test_corrective_seek_target_adds_lead() {
        let tuning = SyncTuning::default();
        assert_eq!(corrective_seek_target(9000, 0, &tuning), 9300);
        assert_eq!(corrective_seek_target(9000, 150, &tuning), 9450);
    }

    #[test]
    fn test_within_seek_tolerance_is_half_open() {
        let tuning = SyncTuning::default();
        assert!(within_seek_tolerance(0, &tuning));
        assert!(within_seek_tolerance(tuning.max_sync_diff_ms - 1, &tuning));
        assert!(!within_seek_tolerance(tuning.max_sync_diff_ms, &tuning));
        assert!(!within_seek_tolerance(-1, &tuning));
    }
}
