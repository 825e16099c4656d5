use super::status::PlaybackStatus;

/// Terminal notification from the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    /// Playback reached the natural end of the stream.
    EndOfStream,
    /// The decoder failed; the message comes straight from the decoder.
    Error(String),
}

/// Capability set the controller requires from a media decoder.
///
/// Commands are fire-and-forget: their effect is observed through `status()`
/// on later polls, never through a return value. Every method fires on the
/// owning execution context and must not block; asynchronous completion is
/// signalled by a status change or a polled event.
pub trait DecoderAdapter {
    /// Start or resume playback from the current position.
    fn play(&mut self);

    /// Pause playback, holding the current position.
    fn pause(&mut self);

    /// Stop playback and release transport state.
    fn stop(&mut self);

    fn status(&self) -> PlaybackStatus;

    /// Current presentation position within the media timeline, milliseconds.
    fn position_ms(&self) -> i64;

    /// Request a seek. The decoder reports `Buffering` while the seek is in
    /// flight and settles back to `Paused` once the position is reachable.
    fn set_position_ms(&mut self, position_ms: i64);

    fn duration_ms(&self) -> i64;

    /// Drains at most one pending end-of-stream or error notification.
    /// Called once per scheduler tick, before any transport decision.
    fn poll_event(&mut self) -> Option<DecoderEvent>;
}
