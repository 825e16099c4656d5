#[cfg(test)]
mod tests {

    use crate::core::SyncTuning;

    #[test]
    fn test_sync_tuning_default() {
        let tuning = SyncTuning::default();
        assert_eq!(tuning.synced_delay_threshold_ms, 50);
        assert_eq!(tuning.max_sync_diff_ms, 300);
        assert_eq!(tuning.max_delayed_sync_ms, 2000);
        assert_eq!(tuning.tick_interval_ms, 5);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_sync_tuning_serialization() {
        let mut tuning = SyncTuning::default();
        tuning.synced_delay_threshold_ms = 20;
        tuning.max_sync_diff_ms = 500;

        let serialized = serde_json::to_string(&tuning).expect("Failed to serialize tuning");
        let deserialized: SyncTuning =
            serde_json::from_str(&serialized).expect("Failed to deserialize tuning");

        assert_eq!(
            tuning.synced_delay_threshold_ms,
            deserialized.synced_delay_threshold_ms
        );
        assert_eq!(tuning.max_sync_diff_ms, deserialized.max_sync_diff_ms);
        assert_eq!(tuning.max_delayed_sync_ms, deserialized.max_delayed_sync_ms);
        assert_eq!(tuning.tick_interval_ms, deserialized.tick_interval_ms);
    }

    #[test]
    fn test_sync_tuning_validation_rejects_non_positive_values() {
        let mut tuning = SyncTuning::default();
        tuning.synced_delay_threshold_ms = 0;
        assert!(tuning.validate().is_err());

        let mut tuning = SyncTuning::default();
        tuning.max_sync_diff_ms = -1;
        assert!(tuning.validate().is_err());

        let mut tuning = SyncTuning::default();
        tuning.max_delayed_sync_ms = 0;
        assert!(tuning.validate().is_err());

        let mut tuning = SyncTuning::default();
        tuning.tick_interval_ms = 0;
        assert!(tuning.validate().is_err());
    }
}
