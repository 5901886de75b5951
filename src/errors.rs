use std::any::Any;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub enum SpawnError {
    #[error("failed to spawn thread: {0}")]
    ThreadSpawn(String),

    #[error("task panicked: {0}")]
    Panic(String),

    #[error("task dropped its result channel")]
    ChannelClosed,

    #[error("worker pool needs at least one thread")]
    NoWorkers,

    #[error("worker pool produced {produced} of {expected} results")]
    Incomplete { expected: usize, produced: usize },

    #[error("reduction over an empty sequence")]
    EmptyInput,

    #[error("ticker is already running")]
    AlreadyRunning,

    #[error("ticker is not running")]
    NotRunning,
}

impl SpawnError {
    /// Renders a panic payload caught by `catch_unwind` or `JoinHandle::join`.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        SpawnError::Panic(msg)
    }
}

impl From<std::io::Error> for SpawnError {
    fn from(err: std::io::Error) -> Self {
        SpawnError::ThreadSpawn(err.to_string())
    }
}
