//! Synchronized media playback control.
//!
//! Drives a local media decoder so that its presentation timestamp matches a
//! shared target video time at a shared target wall-clock moment, within
//! tunable tolerances, despite seek latency and variable buffering delay.
//! Multiple independent players pointed at the same (wall time, video time)
//! pair end up rendering the same frame at the same instant.
//!
//! The decoder is injected behind [`player::DecoderAdapter`], the clock
//! behind [`crate::core::Clock`], and all waiting happens in a polled state
//! machine advanced by [`player::SyncedPlaybackController::tick`], so the
//! core runs under any single-threaded scheduler. [`player::PlaybackWorker`]
//! wraps the controller in a dedicated thread for applications without a
//! tick loop of their own.

pub mod core;
pub mod player;
