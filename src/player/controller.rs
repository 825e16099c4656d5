// =============================================================================
// SYNCED PLAYBACK CONTROLLER - SINGLE POINT OF CONTROL FOR TIMED TRANSPORT
// =============================================================================
//
// Drives the decoder to a shared target presentation time at a shared target
// wall-clock moment. All waiting is expressed as phases resumed by `tick`,
// so the controller runs under any single-threaded scheduler.
//
// DESIGN PRINCIPLES:
// - Single active session: a new request replaces the pending one, the two
//   are never merged
// - Fire-and-forget transport: decoder effects are observed via status on
//   later ticks, never assumed
// - Nothing fatal: timing anomalies are logged and playback continues,
//   possibly out of sync
//
// =============================================================================

use log::{debug, error, info, warn};

use crate::core::config::SyncTuning;

use super::adapter::{DecoderAdapter, DecoderEvent};
use super::calculator;
use super::error::PlayerError;
use super::session::{CompletionCallback, SessionKind, SessionPhase, SyncRequest, SyncSession};
use super::status::PlaybackStatus;

pub struct SyncedPlaybackController<D: DecoderAdapter> {
    decoder: D,
    tuning: SyncTuning,
    session: Option<SyncSession>,
    generation: u64,
}

impl<D: DecoderAdapter> SyncedPlaybackController<D> {
    pub fn new(decoder: D, tuning: SyncTuning) -> Self {
        Self {
            decoder,
            tuning,
            session: None,
            generation: 0,
        }
    }

    // =============================================================================
    // PUBLIC INTERFACE - Timed transport operations
    // =============================================================================

    /// Start playback so the media timeline reads `target_video_ms` when the
    /// shared clock reads `target_wall_ms`. `None` keeps the current
    /// timecode and only times the start.
    ///
    /// The outcome is reported through `on_complete`: `Ok` once the play
    /// command fires (or the stream ends first), `Err` if the decoder is not
    /// ready or fails mid-flight.
    pub fn play_at(
        &mut self,
        now_ms: i64,
        target_wall_ms: i64,
        target_video_ms: Option<i64>,
        on_complete: Option<CompletionCallback>,
    ) {
        let status = self.decoder.status();
        if !status.is_loaded() {
            warn!(
                "timed play rejected: decoder not ready ({})",
                status.display_text()
            );
            if let Some(callback) = on_complete {
                callback(Err(PlayerError::NotReady));
            }
            return;
        }

        // Seeking while frames are being consumed is unreliable on most
        // decoders, so stop the transport before adjusting it.
        let mut paused_for_setup = false;
        if status.is_playing() {
            debug!("pausing playback before timed start");
            self.decoder.pause();
            paused_for_setup = true;
        }

        let request = SyncRequest {
            target_wall_ms,
            target_video_ms,
        };
        let mut session = self.begin_session(SessionKind::Play, request, on_complete);

        let current_seek = self.decoder.position_ms();
        let seek_diff = calculator::seek_difference(current_seek, target_video_ms);
        let available = target_wall_ms - now_ms;
        info!(
            "session #{}: play at wall {}ms, video {:?} (position {}ms, slack {}ms)",
            session.generation, target_wall_ms, target_video_ms, current_seek, available
        );

        if calculator::needs_reseek(seek_diff, available, &self.tuning) {
            if !paused_for_setup {
                self.decoder.pause();
            }
            match target_video_ms {
                Some(video_ms) => {
                    // Playback has not started yet, so there is no elapsed
                    // play time to fold into the corrective target.
                    let diff_from_target = current_seek - video_ms;
                    if calculator::within_seek_tolerance(diff_from_target, &self.tuning) {
                        debug!(
                            "session #{}: position {}ms already within tolerance of {}ms, skipping seek",
                            session.generation, current_seek, video_ms
                        );
                    } else {
                        let corrective =
                            calculator::corrective_seek_target(video_ms, 0, &self.tuning);
                        info!(
                            "session #{}: corrective seek to {}ms ({}ms short of target)",
                            session.generation, corrective, seek_diff
                        );
                        self.decoder.set_position_ms(corrective);
                        session.phase = SessionPhase::AwaitingSeekSettle {
                            timeout_at_ms: now_ms + self.tuning.max_sync_diff_ms,
                        };
                    }
                }
                None => {
                    // No timecode to correct, which means the deadline itself
                    // cannot be met anymore.
                    warn!(
                        "session #{}: target time already passed by {}ms, starting late",
                        session.generation,
                        -available
                    );
                }
            }
        }

        self.session = Some(session);
    }

    /// Pause playback when the shared clock reaches `target_wall_ms`.
    /// Proceeds even when not currently playing; pausing is idempotent at
    /// any offset.
    pub fn pause_at(
        &mut self,
        now_ms: i64,
        target_wall_ms: i64,
        on_complete: Option<CompletionCallback>,
    ) {
        let status = self.decoder.status();
        if !status.is_playing() {
            warn!(
                "timed pause requested while not playing ({})",
                status.display_text()
            );
        }
        if target_wall_ms < now_ms {
            warn!(
                "pause target {}ms already passed at {}ms, pausing on next tick",
                target_wall_ms, now_ms
            );
        }

        let request = SyncRequest {
            target_wall_ms,
            target_video_ms: None,
        };
        let session = self.begin_session(SessionKind::Pause, request, on_complete);
        info!(
            "session #{}: pause at wall {}ms (in {}ms)",
            session.generation,
            target_wall_ms,
            (target_wall_ms - now_ms).max(0)
        );
        self.session = Some(session);
    }

    /// Correct the media position to `target_video_ms` and hold paused there
    /// once the shared clock reaches `target_wall_ms`. Used to prepare a
    /// loaded stream without resuming playback.
    pub fn seek_to(
        &mut self,
        now_ms: i64,
        target_wall_ms: i64,
        target_video_ms: i64,
        on_complete: Option<CompletionCallback>,
    ) {
        let status = self.decoder.status();
        if !status.is_loaded() {
            warn!(
                "timed seek rejected: decoder not ready ({})",
                status.display_text()
            );
            if let Some(callback) = on_complete {
                callback(Err(PlayerError::NotReady));
            }
            return;
        }
        if status.is_playing() {
            self.decoder.pause();
        }

        let request = SyncRequest {
            target_wall_ms,
            target_video_ms: Some(target_video_ms),
        };
        let mut session = self.begin_session(SessionKind::Seek, request, on_complete);

        let current_seek = self.decoder.position_ms();
        let diff_from_target = current_seek - target_video_ms;
        info!(
            "session #{}: seek to video {}ms by wall {}ms (position {}ms)",
            session.generation, target_video_ms, target_wall_ms, current_seek
        );
        if calculator::within_seek_tolerance(diff_from_target, &self.tuning) {
            debug!(
                "session #{}: position already within tolerance, skipping seek",
                session.generation
            );
        } else {
            let corrective = calculator::corrective_seek_target(target_video_ms, 0, &self.tuning);
            self.decoder.set_position_ms(corrective);
            session.phase = SessionPhase::AwaitingSeekSettle {
                timeout_at_ms: now_ms + self.tuning.max_sync_diff_ms,
            };
        }
        self.session = Some(session);
    }

    /// Discard any pending session and stop the decoder. The discarded
    /// session's callback is not invoked.
    pub fn stop(&mut self) {
        if let Some(old) = self.session.take() {
            debug!("session #{} discarded by stop", old.generation);
        }
        self.decoder.stop();
    }

    /// Advance the active session. Called once per scheduler tick; never
    /// blocks, no-op while idle.
    pub fn tick(&mut self, now_ms: i64) {
        self.drain_decoder_events();

        let Some(mut session) = self.session.take() else {
            return;
        };

        match session.phase {
            SessionPhase::AwaitingSeekSettle { timeout_at_ms } => {
                if self.decoder.status() == PlaybackStatus::Paused {
                    debug!(
                        "session #{}: seek settled at {}ms",
                        session.generation,
                        self.decoder.position_ms()
                    );
                    self.enter_deadline_wait(&mut session, now_ms);
                    self.session = Some(session);
                } else if now_ms >= timeout_at_ms {
                    // Advisory only: the seek may still be in flight, but
                    // waiting longer would sacrifice the deadline entirely.
                    warn!(
                        "session #{}: seek settle timed out after {}ms, proceeding with best-effort timing",
                        session.generation, self.tuning.max_sync_diff_ms
                    );
                    self.enter_deadline_wait(&mut session, now_ms);
                    self.session = Some(session);
                } else {
                    self.session = Some(session);
                }
            }
            SessionPhase::AwaitingDeadline => {
                let delay = self.remaining_delay(&session, now_ms);
                if delay < self.tuning.synced_delay_threshold_ms {
                    self.commit(&session, delay);
                    session.finish(Ok(()));
                } else {
                    self.session = Some(session);
                }
            }
        }
    }

    // =============================================================================
    // STATE QUERIES - Read-only access
    // =============================================================================

    pub fn status(&self) -> PlaybackStatus {
        self.decoder.status()
    }

    pub fn position_ms(&self) -> i64 {
        self.decoder.position_ms()
    }

    pub fn duration_ms(&self) -> i64 {
        self.decoder.duration_ms()
    }

    pub fn has_active_session(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the most recently started session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tuning(&self) -> &SyncTuning {
        &self.tuning
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Mutable access to the decoder. While a session is pending the
    /// controller assumes exclusive ownership of the transport state;
    /// seeking or toggling playback behind its back leaves the session
    /// working from stale data.
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    // =============================================================================
    // INTERNAL - Session lifecycle
    // =============================================================================

    fn begin_session(
        &mut self,
        kind: SessionKind,
        request: SyncRequest,
        on_complete: Option<CompletionCallback>,
    ) -> SyncSession {
        if let Some(old) = self.session.take() {
            // Last writer wins; the superseded attempt never reports back.
            debug!("session #{} superseded before completion", old.generation);
        }
        self.generation += 1;
        SyncSession::new(self.generation, kind, request, on_complete)
    }

    fn drain_decoder_events(&mut self) {
        while let Some(event) = self.decoder.poll_event() {
            match event {
                DecoderEvent::Error(message) => {
                    error!("decoder error: {}", message);
                    if let Some(session) = self.session.take() {
                        debug!("session #{}: aborted by decoder error", session.generation);
                        session.finish(Err(PlayerError::Decoder(message)));
                    }
                }
                DecoderEvent::EndOfStream => {
                    info!("end of stream reached");
                    // Counts as the session's single completion.
                    if let Some(session) = self.session.take() {
                        session.finish(Ok(()));
                    }
                }
            }
        }
    }

    fn enter_deadline_wait(&mut self, session: &mut SyncSession, now_ms: i64) {
        let delay = self.remaining_delay(session, now_ms);
        if delay < 0 {
            warn!(
                "session #{}: target time already passed by {}ms, committing late",
                session.generation, -delay
            );
        }
        session.phase = SessionPhase::AwaitingDeadline;
    }

    fn remaining_delay(&self, session: &SyncSession, now_ms: i64) -> i64 {
        // Only a playing timeline consumes media time; pause/seek sessions
        // hold still, so their deadline is pure wall-clock distance.
        let seek_diff = match session.kind {
            SessionKind::Play => calculator::seek_difference(
                self.decoder.position_ms(),
                session.request.target_video_ms,
            ),
            SessionKind::Pause | SessionKind::Seek => 0,
        };
        calculator::play_delay(session.request.target_wall_ms, now_ms, seek_diff)
    }

    fn commit(&mut self, session: &SyncSession, delay_ms: i64) {
        match session.kind {
            SessionKind::Play => {
                info!(
                    "session #{}: starting playback at {}ms (slack {}ms)",
                    session.generation,
                    self.decoder.position_ms(),
                    delay_ms
                );
                self.decoder.play();
            }
            SessionKind::Pause => {
                info!(
                    "session #{}: pausing at {}ms (slack {}ms)",
                    session.generation,
                    self.decoder.position_ms(),
                    delay_ms
                );
                self.decoder.pause();
            }
            SessionKind::Seek => {
                info!(
                    "session #{}: holding paused at {}ms",
                    session.generation,
                    self.decoder.position_ms()
                );
                self.decoder.pause();
            }
        }
    }
}
