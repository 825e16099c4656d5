use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Timing tolerances for synchronized playback.
///
/// All values are deployment-tuned; the defaults are conservative figures
/// that work for decoders with seek latencies in the low hundreds of
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncTuning {
    /// Remaining slack below which the poll loop stops waiting and issues
    /// the final play/pause command.
    pub synced_delay_threshold_ms: i64,
    /// Forward slack tolerated without issuing a corrective seek. Doubles as
    /// the corrective-seek lead and the seek-settle timeout.
    pub max_sync_diff_ms: i64,
    /// How far ahead of the target the decoder may sit before a corrective
    /// seek backwards is forced.
    pub max_delayed_sync_ms: i64,
    /// Scheduler tick of the playback worker thread.
    pub tick_interval_ms: u64,
}

impl Default for SyncTuning {
    fn default() -> Self {
        Self {
            synced_delay_threshold_ms: 50,
            max_sync_diff_ms: 300,
            max_delayed_sync_ms: 2000,
            tick_interval_ms: 5,
        }
    }
}

impl SyncTuning {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to read tuning file at {}: {}",
                    config_path.display(),
                    e
                )
            })?;

            // If the file exists but no longer parses, rewrite it with defaults
            // rather than refusing to start.
            match serde_json::from_str::<Self>(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", config_path.display());
                    Ok(tuning)
                }
                Err(e) => {
                    log::warn!(
                        "Tuning file exists but has issues ({}), recreating with defaults",
                        e
                    );
                    let tuning = Self::default();
                    tuning
                        .save()
                        .map_err(|save_err| anyhow::anyhow!("Failed to save tuning: {}", save_err))?;
                    Ok(tuning)
                }
            }
        } else {
            log::info!("No tuning file found, creating defaults");
            let tuning = Self::default();
            tuning
                .save()
                .map_err(|e| anyhow::anyhow!("Failed to save default tuning: {}", e))?;
            log::info!("Created tuning file at {}", config_path.display());
            Ok(tuning)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sync-player")
            .join("config.json")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.synced_delay_threshold_ms <= 0 {
            anyhow::bail!(
                "synced_delay_threshold_ms must be positive, got {}",
                self.synced_delay_threshold_ms
            );
        }
        if self.max_sync_diff_ms <= 0 {
            anyhow::bail!(
                "max_sync_diff_ms must be positive, got {}",
                self.max_sync_diff_ms
            );
        }
        if self.max_delayed_sync_ms <= 0 {
            anyhow::bail!(
                "max_delayed_sync_ms must be positive, got {}",
                self.max_delayed_sync_ms
            );
        }
        if self.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be at least 1");
        }
        Ok(())
    }
}
