use flythrough::{
    components::Camera,
    systems::{physics_system, update_global_transform_system},
    workers::{AssetLoadedMessage, AssetRequest},
    Engine, EngineBuilder, EngineEvent, FlythroughError, FlythroughResult, TickData,
};
use log::{debug, info, warn};

use crate::{
    config::{Config, MotionGating},
    resources::{AssetKind, SessionController},
    scene::{add_scene, Scene},
};

/// The whole demo: an engine, the stage, and the controller that runs the game on it.
///
/// Call [`App::setup`] before [`App::run_loop`], or just call [`App::start`] to do both.
pub struct App {
    config: Config,
    pub engine: Engine,
    controller: Option<SessionController>,
    scene: Option<Scene>,
}

impl App {
    /// Create an app with an engine configured from `config`. Ctrl-C stops it.
    pub fn new(config: Config) -> FlythroughResult<Self> {
        let engine = EngineBuilder::new()
            .frame_rate(config.frame_rate)
            .realtime(config.realtime)
            .audio_output(config.audio_output)
            .handle_ctrl_c(true)
            .build()?;
        Ok(Self::with_engine(config, engine))
    }

    /// Create an app that runs on an engine you've already built
    pub fn with_engine(config: Config, engine: Engine) -> Self {
        Self {
            config,
            engine,
            controller: None,
            scene: None,
        }
    }

    pub fn controller(&self) -> Option<&SessionController> {
        self.controller.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn is_set_up(&self) -> bool {
        self.controller.is_some()
    }

    /// Build the stage and the controller, and start loading audio in the background
    pub fn setup(&mut self) -> FlythroughResult<()> {
        if self.is_set_up() {
            debug!("Already set up");
            return Ok(());
        }

        if self.config.motion_gating == MotionGating::Always {
            warn!("Motion gating is set to always: the cube will move even while the game is paused");
        }

        let scene = add_scene(
            &self.config,
            &mut self.engine.world,
            &mut self.engine.physics_context,
        )?;
        self.controller = Some(SessionController::new(
            scene.moving_object,
            self.config.motion_gating,
        ));
        self.scene = Some(scene);

        let asset_root = &self.config.asset_root;
        self.engine.load_assets(vec![
            AssetRequest::new(
                AssetKind::Silence.name(),
                asset_root.join(&self.config.silence_path),
            ),
            AssetRequest::new(
                AssetKind::Music.name(),
                asset_root.join(&self.config.music_path),
            ),
        ]);
        info!("Setup complete");
        Ok(())
    }

    /// Run frames until the engine shuts down
    pub fn run_loop(&mut self) -> FlythroughResult<()> {
        if !self.is_set_up() {
            return Err(FlythroughError::NotSetUp);
        }

        while let Ok(tick) = self.engine.update() {
            self.tick(tick)?;
        }

        info!("Finished!");
        Ok(())
    }

    pub fn start(&mut self) -> FlythroughResult<()> {
        self.setup()?;
        self.run_loop()
    }

    /// Ask the app to finish. The loop ends at the start of the next frame.
    pub fn stop(&self) {
        self.engine.stop();
    }

    /// Handle everything that happened since the last frame, then move the world on by one frame
    pub fn tick(&mut self, tick: TickData) -> FlythroughResult<()> {
        if !self.is_set_up() {
            return Err(FlythroughError::NotSetUp);
        }

        for event in tick.events {
            self.dispatch(event);
        }

        let engine = &mut self.engine;
        if let Some(controller) = self.controller.as_mut() {
            controller.on_frame_tick(
                tick.delta_seconds,
                &mut engine.audio_context,
                &mut engine.world,
                &mut engine.physics_context,
            );
        }
        physics_system(
            &mut engine.world,
            &mut engine.physics_context,
            tick.delta_seconds,
        );
        update_global_transform_system(&mut engine.world);

        Ok(())
    }

    fn dispatch(&mut self, event: EngineEvent) {
        let engine = &mut self.engine;
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        match event {
            EngineEvent::ImmersiveModeChanged(entered) => controller.on_immersive_mode_changed(
                entered,
                &mut engine.audio_context,
                &engine.world,
                &mut engine.physics_context,
            ),
            EngineEvent::ControllerConnected(id) => {
                controller.on_controller_connected(&id);
            }
            EngineEvent::AssetLoaded(AssetLoadedMessage { name, data }) => {
                let Some(kind) = AssetKind::from_name(&name) else {
                    warn!("Ignoring unexpected asset {name}");
                    return;
                };
                match engine.audio_context.add_music_track(&data) {
                    Ok(track) => controller.on_asset_loaded(kind, track, &mut engine.audio_context),
                    Err(e) => warn!("Unable to decode {name}: {e}"),
                }
            }
            EngineEvent::Resized { width, height } => {
                let Some(scene) = self.scene.as_ref() else {
                    return;
                };
                if let Ok(mut camera) = engine.world.get::<&mut Camera>(scene.camera) {
                    camera.resize(width, height);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resources::SessionState, scene::CUBE_START};
    use approx::assert_relative_eq;
    use flythrough::{
        contexts::{MusicPlayer, RuntimeEvent, SimulatedRuntime, SoundState},
        glam::Vec3,
        xr::SessionState as XrState,
        DEFAULT_FRAME_RATE,
    };
    use std::sync::Arc;

    fn app(script: Vec<(u64, RuntimeEvent)>) -> App {
        let engine = EngineBuilder::new()
            .runtime(Box::new(SimulatedRuntime::new(script)))
            .build()
            .unwrap();
        let config = Config {
            asset_root: "/definitely/not/an/asset/root".into(),
            realtime: false,
            audio_output: false,
            ..Default::default()
        };
        App::with_engine(config, engine)
    }

    fn tick(events: Vec<EngineEvent>, delta_seconds: f32) -> TickData {
        TickData {
            previous_state: XrState::FOCUSED,
            current_state: XrState::FOCUSED,
            delta_seconds,
            frame_index: 0,
            events,
        }
    }

    /// One second of mono, 16 bit silence at 8kHz
    fn wav() -> Arc<Vec<u8>> {
        let data_len: u32 = 16000;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(bytes.len() + data_len as usize, 0);
        Arc::new(bytes)
    }

    fn asset(name: &str, data: Arc<Vec<u8>>) -> EngineEvent {
        EngineEvent::AssetLoaded(AssetLoadedMessage {
            name: name.into(),
            data,
        })
    }

    fn cube_translation(app: &App) -> Vec3 {
        let controller = app.controller().unwrap();
        controller
            .moving_object
            .translation(&app.engine.world)
            .unwrap()
    }

    #[test]
    pub fn test_run_loop_before_setup() {
        let mut app = app(vec![]);
        assert!(matches!(app.run_loop(), Err(FlythroughError::NotSetUp)));
        assert!(matches!(
            app.tick(tick(vec![], 0.1)),
            Err(FlythroughError::NotSetUp)
        ));
    }

    #[test]
    pub fn test_setup_twice() {
        let mut app = app(vec![]);
        app.setup().unwrap();
        let cube = app.scene().unwrap().cube;
        app.setup().unwrap();
        assert_eq!(app.scene().unwrap().cube, cube);
    }

    #[test]
    pub fn test_enter_then_music_loads() {
        let mut app = app(vec![]);
        app.setup().unwrap();

        app.tick(tick(vec![EngineEvent::ImmersiveModeChanged(true)], 0.5))
            .unwrap();
        let controller = app.controller().unwrap();
        assert_eq!(controller.state(), SessionState::Playing);
        assert!(controller.music().is_none());
        assert_eq!(app.engine.audio_context.music_track_status(), SoundState::Stopped);
        assert_relative_eq!(cube_translation(&app), CUBE_START + Vec3::Z);

        app.tick(tick(
            vec![asset("silence", wav()), asset("music", wav())],
            0.,
        ))
        .unwrap();
        let controller = app.controller().unwrap();
        assert!(controller.music_autoplay());
        assert!(controller.silence().is_some());
        assert_eq!(
            app.engine.audio_context.current_music_track,
            controller.music()
        );
        assert_eq!(app.engine.audio_context.music_track_status(), SoundState::Playing);

        app.tick(tick(vec![EngineEvent::ImmersiveModeChanged(false)], 0.5))
            .unwrap();
        assert_eq!(app.controller().unwrap().state(), SessionState::Paused);
        assert_eq!(app.engine.audio_context.music_track_status(), SoundState::Paused);
        assert_relative_eq!(cube_translation(&app), CUBE_START + Vec3::Z);

        // Putting the headset back on picks the same track up where it left off
        let music = app.controller().unwrap().music();
        app.tick(tick(vec![EngineEvent::ImmersiveModeChanged(true)], 0.))
            .unwrap();
        assert_eq!(app.controller().unwrap().state(), SessionState::Playing);
        assert_eq!(app.engine.audio_context.current_music_track, music);
        assert_eq!(app.engine.audio_context.music_track_status(), SoundState::Playing);
    }

    #[test]
    pub fn test_bad_assets_are_dropped() {
        let mut app = app(vec![]);
        app.setup().unwrap();
        app.tick(tick(
            vec![
                asset("music", Arc::new(b"definitely not an mp3".to_vec())),
                asset("mystery", wav()),
                EngineEvent::ImmersiveModeChanged(true),
            ],
            0.,
        ))
        .unwrap();

        let controller = app.controller().unwrap();
        assert!(controller.music().is_none());
        assert!(controller.silence().is_none());
        assert_eq!(controller.state(), SessionState::Playing);
    }

    #[test]
    pub fn test_resize_updates_camera() {
        let mut app = app(vec![]);
        app.setup().unwrap();
        app.tick(tick(
            vec![EngineEvent::Resized {
                width: 1600,
                height: 900,
            }],
            0.,
        ))
        .unwrap();

        let camera = app.scene().unwrap().camera;
        let camera = app.engine.world.get::<&Camera>(camera).unwrap();
        assert_relative_eq!(camera.aspect_ratio, 16. / 9.);
    }

    #[test]
    pub fn test_run_loop() {
        let state = RuntimeEvent::SessionStateChanged;
        let mut app = app(vec![
            (0, state(XrState::FOCUSED)),
            (1, RuntimeEvent::InputSourceConnected("/user/hand/left".into())),
            (5, state(XrState::VISIBLE)),
            (6, state(XrState::EXITING)),
        ]);
        app.start().unwrap();

        let controller = app.controller().unwrap();
        assert_eq!(controller.state(), SessionState::Paused);
        assert_eq!(
            controller.controllers.left.as_ref().unwrap().id,
            "/user/hand/left"
        );
        // The assets don't exist, so the game carried on in silence
        assert!(controller.music().is_none());

        // Frames 0 to 4 were played
        let travelled = 5. * 2. / DEFAULT_FRAME_RATE;
        assert_relative_eq!(
            cube_translation(&app),
            CUBE_START + Vec3::new(0., 0., travelled),
            epsilon = 1e-4
        );
    }

    #[test]
    pub fn test_stop() {
        let mut app = app(vec![(0, RuntimeEvent::SessionStateChanged(XrState::FOCUSED))]);
        app.setup().unwrap();
        app.stop();
        app.run_loop().unwrap();
        assert_eq!(app.controller().unwrap().state(), SessionState::NotStarted);
    }
}
