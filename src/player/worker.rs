//! Thread-safe playback worker that uses message passing.
//!
//! Owns the decoder, controller and clock on a dedicated thread whose
//! command-receive timeout doubles as the scheduler tick. This is how the
//! single-threaded controller is embedded into an application that cannot
//! tick it from its own loop.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::core::clock::{Clock, MonotonicClock};
use crate::core::config::SyncTuning;

use super::adapter::DecoderAdapter;
use super::controller::SyncedPlaybackController;
use super::error::PlayerError;
use super::session::CompletionCallback;
use super::status::PlaybackStatus;

/// Commands sent to the playback worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    PlayAt {
        target_wall_ms: i64,
        target_video_ms: Option<i64>,
    },
    PauseAt {
        target_wall_ms: i64,
    },
    SeekTo {
        target_wall_ms: i64,
        target_video_ms: i64,
    },
    Stop,
    Shutdown,
}

/// Status updates from the playback worker thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    StatusChanged(PlaybackStatus),
    PositionUpdate(i64),
    /// A sync attempt finished, one event per completed session. Superseded
    /// sessions produce no event.
    SyncCompleted { result: Result<(), PlayerError> },
}

/// Handle to the worker thread. `Send + Sync`; commands go in through a
/// channel, events come back through another.
pub struct PlaybackWorker {
    command_sender: mpsc::Sender<WorkerCommand>,
    event_receiver: Mutex<mpsc::Receiver<WorkerEvent>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl PlaybackWorker {
    pub fn spawn<D>(decoder: D, tuning: SyncTuning) -> Self
    where
        D: DecoderAdapter + Send + 'static,
    {
        Self::spawn_with_clock(decoder, tuning, MonotonicClock::new())
    }

    pub fn spawn_with_clock<D, C>(decoder: D, tuning: SyncTuning, clock: C) -> Self
    where
        D: DecoderAdapter + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (command_sender, command_receiver) = mpsc::channel();
        let (event_sender, event_receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            let tick_interval = Duration::from_millis(tuning.tick_interval_ms.max(1));
            let mut controller = SyncedPlaybackController::new(decoder, tuning);
            let mut last_status = controller.status();
            let mut last_position = controller.position_ms();
            let _ = event_sender.send(WorkerEvent::StatusChanged(last_status));

            loop {
                match command_receiver.recv_timeout(tick_interval) {
                    Ok(WorkerCommand::Shutdown) => {
                        log::info!("playback worker: received shutdown command, terminating");
                        break;
                    }
                    Ok(command) => {
                        log::debug!("playback worker received command: {:?}", command);
                        let now_ms = clock.now_ms();
                        match command {
                            WorkerCommand::PlayAt {
                                target_wall_ms,
                                target_video_ms,
                            } => {
                                controller.play_at(
                                    now_ms,
                                    target_wall_ms,
                                    target_video_ms,
                                    Some(completion_sender(&event_sender)),
                                );
                            }
                            WorkerCommand::PauseAt { target_wall_ms } => {
                                controller.pause_at(
                                    now_ms,
                                    target_wall_ms,
                                    Some(completion_sender(&event_sender)),
                                );
                            }
                            WorkerCommand::SeekTo {
                                target_wall_ms,
                                target_video_ms,
                            } => {
                                controller.seek_to(
                                    now_ms,
                                    target_wall_ms,
                                    target_video_ms,
                                    Some(completion_sender(&event_sender)),
                                );
                            }
                            WorkerCommand::Stop => controller.stop(),
                            WorkerCommand::Shutdown => unreachable!("handled above"),
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        log::info!("playback worker: command channel closed, terminating");
                        break;
                    }
                }

                controller.tick(clock.now_ms());

                let status = controller.status();
                if status != last_status {
                    last_status = status;
                    let _ = event_sender.send(WorkerEvent::StatusChanged(status));
                }
                let position = controller.position_ms();
                if position != last_position {
                    last_position = position;
                    let _ = event_sender.send(WorkerEvent::PositionUpdate(position));
                }
            }
        });

        Self {
            command_sender,
            event_receiver: Mutex::new(event_receiver),
            thread_handle: Some(handle),
        }
    }

    pub fn send_command(&self, command: WorkerCommand) {
        let _ = self.command_sender.send(command);
    }

    pub fn try_recv_event(&self) -> Option<WorkerEvent> {
        match self.event_receiver.lock() {
            Ok(receiver) => receiver.try_recv().ok(),
            Err(_) => None,
        }
    }
}

fn completion_sender(event_sender: &mpsc::Sender<WorkerEvent>) -> CompletionCallback {
    let sender = event_sender.clone();
    Box::new(move |result| {
        let _ = sender.send(WorkerEvent::SyncCompleted { result });
    })
}

impl Drop for PlaybackWorker {
    fn drop(&mut self) {
        log::debug!("PlaybackWorker::drop() - sending shutdown command");
        let _ = self.command_sender.send(WorkerCommand::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            for attempt in 1..=5 {
                if handle.is_finished() {
                    log::debug!("PlaybackWorker::drop() - thread finished, joining");
                    let _ = handle.join();
                    return;
                }
                log::debug!(
                    "PlaybackWorker::drop() - attempt {} - waiting for thread to finish",
                    attempt
                );
                thread::sleep(Duration::from_millis(100));
            }

            log::warn!("PlaybackWorker::drop() - thread did not finish, abandoning join");
            // The thread terminates with the process; losing the join beats
            // blocking the caller indefinitely.
        }
    }
}
