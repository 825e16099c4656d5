/// Decoder playback status as observed through the adapter.
///
/// Exactly one value holds at any instant; transitions are driven only by
/// the decoder itself and become visible on the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No media loaded, or the decoder is still initializing.
    NotReady,
    /// Media is loading or a seek is in flight.
    Buffering,
    /// Media loaded and ready for playback.
    Ready,
    /// Currently playing.
    Playing,
    /// Currently paused.
    Paused,
    /// Playback reached the end of the stream.
    Ended,
    /// The decoder reported a failure.
    Error,
}

impl PlaybackStatus {
    /// Media is loaded: `Ready` or any state reachable from it.
    pub fn is_loaded(&self) -> bool {
        matches!(
            self,
            PlaybackStatus::Ready
                | PlaybackStatus::Playing
                | PlaybackStatus::Paused
                | PlaybackStatus::Ended
        )
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackStatus::Playing)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PlaybackStatus::Error)
    }

    /// Returns user-friendly display text for this status
    pub fn display_text(&self) -> &'static str {
        match self {
            PlaybackStatus::NotReady => "No media loaded",
            PlaybackStatus::Buffering => "Buffering...",
            PlaybackStatus::Ready => "Ready",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Ended => "Ended",
            PlaybackStatus::Error => "Decoder error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_states() {
        assert!(!PlaybackStatus::NotReady.is_loaded());
        assert!(!PlaybackStatus::Buffering.is_loaded());
        assert!(!PlaybackStatus::Error.is_loaded());
        assert!(PlaybackStatus::Ready.is_loaded());
        assert!(PlaybackStatus::Playing.is_loaded());
        assert!(PlaybackStatus::Paused.is_loaded());
        assert!(PlaybackStatus::Ended.is_loaded());
    }

    #[test]
    fn test_playing_and_error_predicates() {
        assert!(PlaybackStatus::Playing.is_playing());
        assert!(!PlaybackStatus::Paused.is_playing());
        assert!(PlaybackStatus::Error.is_error());
        assert!(!PlaybackStatus::Ready.is_error());
    }
}
