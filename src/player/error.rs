use thiserror::Error;

/// Failures surfaced to callers through the completion callback.
///
/// Everything else the controller encounters (settle timeouts, missed
/// deadlines) is recovered locally: logged, then playback continues with
/// adjusted timing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("decoder is not ready for playback")]
    NotReady,
    #[error("decoder error: {0}")]
    Decoder(String),
}
