use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::TryRecvError,
        Arc,
    },
    thread::sleep,
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use openxr::SessionState;

use crate::{
    contexts::{AudioContext, PhysicsContext, SimulatedRuntime, XrContext, XrEvent, XrRuntime},
    workers::{AssetLoadedMessage, AssetRequest, WorkerError, WorkerMessage, Workers},
    FlythroughError, FlythroughResult, DEFAULT_FRAME_RATE,
};

/// Builder for `Engine`.
pub struct EngineBuilder {
    runtime: Option<Box<dyn XrRuntime>>,
    frame_rate: f32,
    realtime: bool,
    handle_ctrl_c: bool,
    audio_output: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            runtime: None,
            frame_rate: DEFAULT_FRAME_RATE,
            realtime: false,
            handle_ctrl_c: false,
            audio_output: false,
        }
    }
}

impl EngineBuilder {
    /// Create an `EngineBuilder`
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the XR runtime that drives the session. Defaults to [`SimulatedRuntime::demo`]
    pub fn runtime(mut self, runtime: Box<dyn XrRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// How many frames per second the engine ticks at
    pub fn frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// If set, `update` sleeps so frames are paced in real time and reports the measured delta.
    /// Otherwise every frame is exactly `1 / frame_rate` seconds long and nothing sleeps.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Register a Ctrl-C handler that shuts the engine down. Only one engine per process may do this.
    pub fn handle_ctrl_c(mut self, handle_ctrl_c: bool) -> Self {
        self.handle_ctrl_c = handle_ctrl_c;
        self
    }

    /// Play audio through the default output device rather than running headless
    pub fn audio_output(mut self, audio_output: bool) -> Self {
        self.audio_output = audio_output;
        self
    }

    /// Build the `Engine`
    pub fn build(self) -> FlythroughResult<Engine> {
        let should_quit = Arc::new(AtomicBool::from(false));
        if self.handle_ctrl_c {
            let should_quit = should_quit.clone();
            ctrlc::set_handler(move || should_quit.store(true, Ordering::Release))
                .map_err(anyhow::Error::from)?;
        }

        let frame_rate = if self.frame_rate > 0. {
            self.frame_rate
        } else {
            warn!(
                "Invalid frame rate {}, using {DEFAULT_FRAME_RATE}",
                self.frame_rate
            );
            DEFAULT_FRAME_RATE
        };
        let runtime = self
            .runtime
            .unwrap_or_else(|| Box::new(SimulatedRuntime::demo(frame_rate)));
        let audio_context = if self.audio_output {
            AudioContext::new()
        } else {
            AudioContext::headless()
        };

        Ok(Engine {
            should_quit,
            world: Default::default(),
            xr_context: XrContext::new(runtime),
            physics_context: Default::default(),
            audio_context,
            workers: Vec::new(),
            frame_clock: FrameClock::new(frame_rate, self.realtime),
            frame_index: 0,
        })
    }
}

/// Something that happened since the last frame that the application may want to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `true` when the user entered immersive mode, `false` when they left it
    ImmersiveModeChanged(bool),
    /// An input source was connected. The identifier is its OpenXR path, eg. `/user/hand/left`
    ControllerConnected(String),
    /// An asset requested with [`Engine::load_assets`] finished loading
    AssetLoaded(AssetLoadedMessage),
    /// The companion window changed size
    Resized {
        /// In pixels
        width: u32,
        /// In pixels
        height: u32,
    },
}

impl From<XrEvent> for EngineEvent {
    fn from(event: XrEvent) -> Self {
        match event {
            XrEvent::ImmersiveModeChanged(entered) => EngineEvent::ImmersiveModeChanged(entered),
            XrEvent::ControllerConnected(id) => EngineEvent::ControllerConnected(id),
            XrEvent::Resized { width, height } => EngineEvent::Resized { width, height },
        }
    }
}

/// The result of calling `update()` on Engine.
#[derive(Debug, Clone)]
pub struct TickData {
    /// The previous XR state.
    pub previous_state: SessionState,
    /// The current XR state.
    pub current_state: SessionState,
    /// Seconds since the last frame
    pub delta_seconds: f32,
    /// Starts at zero and goes up by one each frame
    pub frame_index: u64,
    /// Everything that happened since the last frame. Events from the same source are in the
    /// order they happened.
    pub events: Vec<EngineEvent>,
}

/// The Flythrough Engine
/// A wrapper around the "external world" from the perspective of the application, eg. XR, physics, audio.
/// **IMPORTANT**: make sure you call `update` each tick
pub struct Engine {
    should_quit: Arc<AtomicBool>,
    /// World
    pub world: hecs::World,
    /// XR context
    pub xr_context: XrContext,
    /// Physics context
    pub physics_context: PhysicsContext,
    /// Audio context
    pub audio_context: AudioContext,
    workers: Vec<Workers>,
    frame_clock: FrameClock,
    frame_index: u64,
}

impl Engine {
    /// Create a new engine with the default settings
    pub fn new() -> FlythroughResult<Self> {
        EngineBuilder::new().build()
    }

    /// IMPORTANT: Call this function each tick to update the engine's running state with the XR runtime and any workers
    pub fn update(&mut self) -> FlythroughResult<TickData> {
        if self.should_quit.load(Ordering::Acquire) || self.xr_context.is_exiting() {
            info!("Engine is now exiting!");
            return Err(FlythroughError::ShuttingDown);
        }

        let previous_state = self.xr_context.session_state;
        let mut events = self
            .xr_context
            .poll_xr_events(self.frame_index)
            .into_iter()
            .map(EngineEvent::from)
            .collect::<Vec<_>>();
        let current_state = self.xr_context.session_state;

        self.check_for_worker_messages(&mut events);

        let delta_seconds = self.frame_clock.tick();
        let frame_index = self.frame_index;
        self.frame_index += 1;

        Ok(TickData {
            previous_state,
            current_state,
            delta_seconds,
            frame_index,
            events,
        })
    }

    /// Start loading some assets in the background. Each one that loads shows up as an
    /// [`EngineEvent::AssetLoaded`]; ones that fail are logged and never arrive.
    pub fn load_assets(&mut self, requests: Vec<AssetRequest>) {
        self.workers.push(Workers::new(requests));
    }

    /// Ask the engine to shut down. The next call to `update` returns [`FlythroughError::ShuttingDown`].
    pub fn stop(&self) {
        self.should_quit.store(true, Ordering::Release);
    }

    /// Collect everything the workers have sent. Workers that have finished are dropped.
    fn check_for_worker_messages(&mut self, events: &mut Vec<EngineEvent>) {
        self.workers.retain(|workers| loop {
            match workers.receiver.try_recv() {
                Ok(WorkerMessage::AssetLoaded(asset)) => events.push(EngineEvent::AssetLoaded(asset)),
                Ok(WorkerMessage::Error(WorkerError::LoadFailed { name, reason })) => {
                    warn!("Unable to load asset {name}: {reason}")
                }
                Ok(WorkerMessage::Error(WorkerError::TaskFailed(reason))) => {
                    warn!("Asset worker failed: {reason}")
                }
                Err(TryRecvError::Empty) => break true,
                Err(TryRecvError::Disconnected) => {
                    debug!("Asset worker finished");
                    break false;
                }
            }
        });
    }
}

struct FrameClock {
    frame_duration: Duration,
    realtime: bool,
    last_frame: Option<Instant>,
}

impl FrameClock {
    fn new(frame_rate: f32, realtime: bool) -> Self {
        Self {
            frame_duration: Duration::from_secs_f32(1. / frame_rate),
            realtime,
            last_frame: None,
        }
    }

    fn tick(&mut self) -> f32 {
        if !self.realtime {
            return self.frame_duration.as_secs_f32();
        }

        let Some(last_frame) = self.last_frame else {
            self.last_frame = Some(Instant::now());
            return self.frame_duration.as_secs_f32();
        };

        let elapsed = last_frame.elapsed();
        if elapsed < self.frame_duration {
            sleep(self.frame_duration - elapsed);
        }
        let now = Instant::now();
        self.last_frame = Some(now);
        (now - last_frame).as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contexts::RuntimeEvent;
    use approx::assert_relative_eq;

    fn engine_with_script(script: Vec<(u64, RuntimeEvent)>) -> Engine {
        EngineBuilder::new()
            .runtime(Box::new(SimulatedRuntime::new(script)))
            .build()
            .unwrap()
    }

    #[test]
    pub fn test_update_reports_session_changes() {
        let mut engine = engine_with_script(vec![
            (0, RuntimeEvent::SessionStateChanged(SessionState::READY)),
            (1, RuntimeEvent::SessionStateChanged(SessionState::FOCUSED)),
            (1, RuntimeEvent::InputSourceConnected("/user/hand/left".into())),
        ]);

        let tick = engine.update().unwrap();
        assert_eq!(tick.frame_index, 0);
        assert_eq!(tick.previous_state, SessionState::IDLE);
        assert_eq!(tick.current_state, SessionState::READY);
        assert!(tick.events.is_empty());
        assert_relative_eq!(tick.delta_seconds, 1. / DEFAULT_FRAME_RATE);

        let tick = engine.update().unwrap();
        assert_eq!(tick.frame_index, 1);
        assert_eq!(
            tick.events,
            vec![
                EngineEvent::ImmersiveModeChanged(true),
                EngineEvent::ControllerConnected("/user/hand/left".into())
            ]
        );
    }

    #[test]
    pub fn test_exiting_shuts_down_after_delivering_events() {
        let mut engine = engine_with_script(vec![
            (0, RuntimeEvent::SessionStateChanged(SessionState::FOCUSED)),
            (1, RuntimeEvent::SessionStateChanged(SessionState::EXITING)),
        ]);
        engine.update().unwrap();

        let tick = engine.update().unwrap();
        assert_eq!(tick.events, vec![EngineEvent::ImmersiveModeChanged(false)]);

        assert!(matches!(engine.update(), Err(FlythroughError::ShuttingDown)));
    }

    #[test]
    pub fn test_stop() {
        let mut engine = engine_with_script(vec![]);
        engine.update().unwrap();
        engine.stop();
        assert!(matches!(engine.update(), Err(FlythroughError::ShuttingDown)));
    }

    #[test]
    pub fn test_assets_arrive_as_events() {
        let dir = std::env::temp_dir().join(format!("flythrough_engine_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("music.mp3"), [1, 2, 3]).unwrap();

        let mut engine = engine_with_script(vec![]);
        engine.load_assets(vec![AssetRequest::new("music", dir.join("music.mp3"))]);

        let mut loaded = None;
        for _ in 0..500 {
            let tick = engine.update().unwrap();
            if let Some(EngineEvent::AssetLoaded(asset)) = tick.events.into_iter().next() {
                loaded = Some(asset);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        let loaded = loaded.expect("asset never arrived");
        assert_eq!(loaded.name, "music");
        assert_eq!(loaded.data.as_slice(), &[1, 2, 3]);

        // Once everything it was asked for has arrived, the worker goes away
        for _ in 0..500 {
            engine.update().unwrap();
            if engine.workers.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(engine.workers.is_empty());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    pub fn test_idle_workers_are_dropped() {
        let mut engine = engine_with_script(vec![]);
        engine.load_assets(vec![]);
        assert_eq!(engine.workers.len(), 1);
        let tick = engine.update().unwrap();
        assert!(tick.events.is_empty());
        assert!(engine.workers.is_empty());
    }
}
