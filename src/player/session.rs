use std::fmt;

use super::error::PlayerError;

/// Invoked at most once per session: on timed completion, natural end of
/// stream, or decoder failure. A superseded session's callback is dropped
/// without being invoked.
pub type CompletionCallback = Box<dyn FnOnce(Result<(), PlayerError>)>;

/// Target (wall-clock, video-time) pair for one synchronization attempt.
///
/// Immutable once issued; a newer request replaces it, the two are never
/// merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncRequest {
    /// Shared wall-clock moment at which the action should visibly occur.
    pub target_wall_ms: i64,
    /// Position the media timeline should hold at that moment. `None` keeps
    /// whatever timecode the decoder currently sits at.
    pub target_video_ms: Option<i64>,
}

/// Which transport command the session commits once its deadline is near.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Resume playback at the deadline.
    Play,
    /// Pause at the deadline.
    Pause,
    /// Correct the position, then hold paused at the deadline.
    Seek,
}

/// Wait the session is currently suspended in. Completed or failed sessions
/// are dropped rather than parked, so only in-flight waits appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A corrective seek was issued; waiting for the decoder to settle back
    /// to `Paused`, or for the advisory timeout to lapse.
    AwaitingSeekSettle { timeout_at_ms: i64 },
    /// Position is acceptable; polling until the wall-clock deadline is
    /// within the commit threshold.
    AwaitingDeadline,
}

/// One in-flight synchronization attempt. Owned exclusively by the
/// controller; at most one exists per controller at any time.
pub struct SyncSession {
    /// Monotonically increasing id, for correlating log lines across ticks.
    pub generation: u64,
    pub kind: SessionKind,
    pub request: SyncRequest,
    pub phase: SessionPhase,
    pub on_complete: Option<CompletionCallback>,
}

impl SyncSession {
    pub fn new(
        generation: u64,
        kind: SessionKind,
        request: SyncRequest,
        on_complete: Option<CompletionCallback>,
    ) -> Self {
        Self {
            generation,
            kind,
            request,
            phase: SessionPhase::AwaitingDeadline,
            on_complete,
        }
    }

    /// Consume the session, reporting the outcome to its caller.
    pub fn finish(mut self, result: Result<(), PlayerError>) {
        if let Some(callback) = self.on_complete.take() {
            callback(result);
        }
    }
}

impl fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSession")
            .field("generation", &self.generation)
            .field("kind", &self.kind)
            .field("request", &self.request)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_finish_invokes_callback_once() {
        let calls = Rc::new(Cell::new(0));
        let calls_in_cb = Rc::clone(&calls);
        let session = SyncSession::new(
            1,
            SessionKind::Play,
            SyncRequest {
                target_wall_ms: 1000,
                target_video_ms: Some(0),
            },
            Some(Box::new(move |result| {
                assert!(result.is_ok());
                calls_in_cb.set(calls_in_cb.get() + 1);
            })),
        );

        session.finish(Ok(()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_dropping_session_does_not_invoke_callback() {
        let calls = Rc::new(Cell::new(0));
        let calls_in_cb = Rc::clone(&calls);
        let session = SyncSession::new(
            2,
            SessionKind::Pause,
            SyncRequest {
                target_wall_ms: 500,
                target_video_ms: None,
            },
            Some(Box::new(move |_| {
                calls_in_cb.set(calls_in_cb.get() + 1);
            })),
        );

        // Superseded sessions are dropped silently.
        drop(session);
        assert_eq!(calls.get(), 0);
    }
}
