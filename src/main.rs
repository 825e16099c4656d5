use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{info, warn};

use sync_player::core::{Clock, MonotonicClock, SyncTuning};
use sync_player::player::{
    DecoderAdapter, DecoderEvent, PlaybackStatus, PlaybackWorker, WorkerCommand, WorkerEvent,
};

const SIMULATED_SEEK_LATENCY: Duration = Duration::from_millis(120);

/// Decoder stand-in that models seek latency and real-time position
/// advancement, so the timing behavior can be observed without real media.
struct SimulatedDecoder {
    status: PlaybackStatus,
    position_ms: i64,
    duration_ms: i64,
    playing_since: Option<Instant>,
    seek_done_at: Option<Instant>,
    events: VecDeque<DecoderEvent>,
}

impl SimulatedDecoder {
    fn new(duration_ms: i64) -> Self {
        Self {
            status: PlaybackStatus::Ready,
            position_ms: 0,
            duration_ms,
            playing_since: None,
            seek_done_at: None,
            events: VecDeque::new(),
        }
    }

    fn live_position(&self) -> i64 {
        match self.playing_since {
            Some(since) => {
                (self.position_ms + since.elapsed().as_millis() as i64).min(self.duration_ms)
            }
            None => self.position_ms,
        }
    }

    // State transitions that depend on the passage of time happen here, once
    // per poll, so status() and position_ms() stay cheap reads.
    fn reconcile(&mut self) {
        if let Some(done_at) = self.seek_done_at {
            if Instant::now() >= done_at {
                self.seek_done_at = None;
                self.status = PlaybackStatus::Paused;
            }
        }
        if self.status == PlaybackStatus::Playing && self.live_position() >= self.duration_ms {
            self.position_ms = self.duration_ms;
            self.playing_since = None;
            self.status = PlaybackStatus::Ended;
            self.events.push_back(DecoderEvent::EndOfStream);
        }
    }
}

impl DecoderAdapter for SimulatedDecoder {
    fn play(&mut self) {
        if self.status.is_loaded() {
            self.playing_since = Some(Instant::now());
            self.status = PlaybackStatus::Playing;
        }
    }

    fn pause(&mut self) {
        self.position_ms = self.live_position();
        self.playing_since = None;
        if self.status.is_loaded() {
            self.status = PlaybackStatus::Paused;
        }
    }

    fn stop(&mut self) {
        self.position_ms = 0;
        self.playing_since = None;
        self.seek_done_at = None;
        self.status = PlaybackStatus::Ready;
    }

    fn status(&self) -> PlaybackStatus {
        self.status
    }

    fn position_ms(&self) -> i64 {
        self.live_position()
    }

    fn set_position_ms(&mut self, position_ms: i64) {
        self.playing_since = None;
        self.position_ms = position_ms.clamp(0, self.duration_ms);
        self.status = PlaybackStatus::Buffering;
        self.seek_done_at = Some(Instant::now() + SIMULATED_SEEK_LATENCY);
    }

    fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    fn poll_event(&mut self) -> Option<DecoderEvent> {
        self.reconcile();
        self.events.pop_front()
    }
}

fn drain_events(worker: &PlaybackWorker, window: Duration) {
    let deadline = Instant::now() + window;
    while Instant::now() < deadline {
        match worker.try_recv_event() {
            Some(WorkerEvent::StatusChanged(status)) => {
                info!("status: {}", status.display_text());
            }
            Some(WorkerEvent::PositionUpdate(position_ms)) => {
                log::debug!("position: {}ms", position_ms);
            }
            Some(WorkerEvent::SyncCompleted { result }) => match result {
                Ok(()) => info!("sync attempt completed"),
                Err(e) => warn!("sync attempt failed: {}", e),
            },
            None => std::thread::sleep(Duration::from_millis(10)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let tuning = match SyncTuning::load() {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("Falling back to default tuning: {}", e);
            SyncTuning::default()
        }
    };
    tuning.validate()?;

    let clock = MonotonicClock::new();
    let worker = PlaybackWorker::spawn_with_clock(SimulatedDecoder::new(30_000), tuning, clock);

    // Start 5 seconds into the media, 400ms from now on the shared clock.
    let start_wall = clock.now_ms() + 400;
    info!("Scheduling synced start: video 5000ms at wall {}ms", start_wall);
    worker.send_command(WorkerCommand::PlayAt {
        target_wall_ms: start_wall,
        target_video_ms: Some(5000),
    });
    drain_events(&worker, Duration::from_millis(1200));

    let pause_wall = clock.now_ms() + 300;
    info!("Scheduling synced pause at wall {}ms", pause_wall);
    worker.send_command(WorkerCommand::PauseAt {
        target_wall_ms: pause_wall,
    });
    drain_events(&worker, Duration::from_millis(600));

    info!("Demo complete");
    Ok(())
}
