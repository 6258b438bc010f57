use std::{
    path::PathBuf,
    sync::{mpsc, Arc},
};

use log::{debug, info};

/// Ask a worker to load the file at `path` and hand it back tagged with `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// Handed back with the data so the application can tell assets apart
    pub name: String,
    /// Where to read the file from
    pub path: PathBuf,
}

impl AssetRequest {
    /// Create a request to load `path` under the name `name`
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// The raw contents of an asset that finished loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoadedMessage {
    /// The name given in the [`AssetRequest`]
    pub name: String,
    /// The file's contents
    pub data: Arc<Vec<u8>>,
}

/// Sent from a worker to the engine
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// An asset was read successfully
    AssetLoaded(AssetLoadedMessage),
    /// Something went wrong
    Error(WorkerError),
}

/// What went wrong in a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// A single asset couldn't be read. Other assets are unaffected.
    LoadFailed {
        /// The name given in the [`AssetRequest`]
        name: String,
        /// Why it failed
        reason: String,
    },
    /// The worker couldn't start, so nothing it was asked for will arrive
    TaskFailed(String),
}

/// A background thread running a single threaded `tokio` runtime. Results come back over
/// `receiver`, which the engine drains once per frame.
pub struct Workers {
    pub(crate) receiver: mpsc::Receiver<WorkerMessage>,
}

impl Default for Workers {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Workers {
    /// Start a worker that loads each of `requests`, then exits
    pub fn new(requests: Vec<AssetRequest>) -> Self {
        let (to_engine, from_worker) = mpsc::channel();
        if requests.is_empty() {
            return Self {
                receiver: from_worker,
            };
        }

        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = to_engine.send(WorkerMessage::Error(WorkerError::TaskFailed(
                        format!("{e:?}"),
                    )));
                    return;
                }
            };

            let local_set = tokio::task::LocalSet::new();
            for request in requests {
                let to_engine = to_engine.clone();
                local_set.spawn_local(async move {
                    let message = match tokio::fs::read(&request.path).await {
                        Ok(data) => {
                            debug!("Loaded {} ({} bytes)", request.name, data.len());
                            WorkerMessage::AssetLoaded(AssetLoadedMessage {
                                name: request.name,
                                data: Arc::new(data),
                            })
                        }
                        Err(e) => WorkerMessage::Error(WorkerError::LoadFailed {
                            name: request.name,
                            reason: format!("{}: {e}", request.path.display()),
                        }),
                    };
                    // The engine may have gone away; nobody is left to tell.
                    let _ = to_engine.send(message);
                });
            }

            info!("Asset worker starting..");
            runtime.block_on(local_set);
            info!("..all assets requested have been loaded");
        });

        Self {
            receiver: from_worker,
        }
    }
}
