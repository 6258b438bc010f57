use thiserror::Error;

/// Everything that can go wrong inside the engine
#[derive(Error, Debug)]
pub enum FlythroughError {
    /// The engine has been asked to stop, or the XR session is over
    #[error("The engine is shutting down")]
    ShuttingDown,
    /// The frame loop was started before setup finished
    #[error("The application must be set up before the frame loop can run")]
    NotSetUp,
    /// An audio file couldn't be decoded
    #[error("Unable to decode audio: {0}")]
    AudioDecodeError(String),
    /// There's nothing to play sound through
    #[error("No audio output device is available")]
    NoAudioDevice,
    /// A config file isn't valid JSON, or doesn't match the expected shape
    #[error("The configuration could not be parsed")]
    Config(#[from] serde_json::Error),
    /// Reading a file failed
    #[error(transparent)]
    IO(#[from] std::io::Error),
    /// Anything else
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
