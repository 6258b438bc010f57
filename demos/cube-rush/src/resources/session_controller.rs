use flythrough::{
    contexts::{MusicPlayer, MusicTrack, PhysicsContext, SoundState},
    hecs::World,
};
use log::{debug, info};

use crate::{
    config::{MotionGating, Propulsion},
    resources::{Controllers, Handedness, MovingObject},
};

/// Where the player is in the game. There's no way back to `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    Playing,
    Paused,
}

/// The audio assets the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Music,
    Silence,
}

impl AssetKind {
    pub fn name(&self) -> &'static str {
        match self {
            AssetKind::Music => "music",
            AssetKind::Silence => "silence",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "music" => Some(AssetKind::Music),
            "silence" => Some(AssetKind::Silence),
            _ => None,
        }
    }
}

/// Starts and pauses the game as the player enters and leaves immersive mode, and keeps the music
/// and the moving object in step with it.
///
/// Events may arrive in any order: the music can finish loading before or after the player puts
/// the headset on. Nothing here can fail; anything that hasn't loaded yet is simply skipped.
#[derive(Debug, Clone)]
pub struct SessionController {
    state: SessionState,
    music: Option<MusicTrack>,
    music_autoplay: bool,
    silence: Option<MusicTrack>,
    pub moving_object: MovingObject,
    pub controllers: Controllers,
    motion_gating: MotionGating,
}

impl SessionController {
    pub fn new(moving_object: MovingObject, motion_gating: MotionGating) -> Self {
        Self {
            state: SessionState::NotStarted,
            music: None,
            music_autoplay: false,
            silence: None,
            moving_object,
            controllers: Default::default(),
            motion_gating,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn music(&self) -> Option<MusicTrack> {
        self.music
    }

    pub fn silence(&self) -> Option<MusicTrack> {
        self.silence
    }

    /// Will (or did) the music start by itself as soon as it was available?
    pub fn music_autoplay(&self) -> bool {
        self.music_autoplay
    }

    pub fn on_immersive_mode_changed(
        &mut self,
        entered: bool,
        audio: &mut impl MusicPlayer,
        world: &World,
        physics_context: &mut PhysicsContext,
    ) {
        if entered {
            if self.state == SessionState::Playing {
                debug!("Ignoring enter event; already playing");
                return;
            }
            info!("Entered immersive mode - starting game");
            self.state = SessionState::Playing;

            // If the music hasn't loaded yet it'll start itself in `on_asset_loaded`.
            let Some(music) = self.music else {
                return;
            };
            self.music_autoplay = true;
            if audio.current_music_track() == Some(music)
                && audio.music_track_status() == SoundState::Paused
            {
                audio.resume_music_track();
            } else {
                audio.play_music_track(music);
            }
            return;
        }

        // The runtime can report leaving more than once. Only pause a game that's running.
        if self.state != SessionState::Playing {
            debug!("Ignoring exit event while {:?}", self.state);
            return;
        }
        info!("Left immersive mode - pausing game");
        self.state = SessionState::Paused;
        audio.pause_music_track();
        self.moving_object.park(world, physics_context);
    }

    pub fn on_asset_loaded(
        &mut self,
        kind: AssetKind,
        track: MusicTrack,
        audio: &mut impl MusicPlayer,
    ) {
        match kind {
            AssetKind::Music => {
                self.music = Some(track);
                self.music_autoplay = self.state == SessionState::Playing;
                if self.music_autoplay {
                    info!("Music loaded, game already started - playing");
                    audio.play_music_track(track);
                } else {
                    debug!("Music loaded, waiting for the game to start");
                }
            }
            AssetKind::Silence => {
                self.silence = Some(track);
                audio.loop_track(track);
            }
        }
    }

    pub fn on_frame_tick(
        &mut self,
        delta_seconds: f32,
        audio: &mut impl MusicPlayer,
        world: &mut World,
        physics_context: &mut PhysicsContext,
    ) {
        let ungated = self.motion_gating == MotionGating::Always;
        if self.state != SessionState::Playing && !ungated {
            return;
        }

        let moving_object = &mut self.moving_object;
        match moving_object.propulsion {
            Propulsion::Kinematic => {
                if moving_object.is_parked() {
                    moving_object.resume(world, physics_context);
                }
                moving_object.advance(world, delta_seconds);
            }
            // Hold the body until the music is actually audible, so the two start together.
            Propulsion::Physics => {
                if moving_object.is_parked()
                    && (ungated || audio.music_track_status() == SoundState::Playing)
                {
                    info!("Music is playing - releasing {:?}", moving_object.entity);
                    moving_object.resume(world, physics_context);
                }
            }
        }
    }

    pub fn on_controller_connected(&mut self, id: &str) -> Handedness {
        let handedness = self.controllers.connect(id);
        info!("{handedness:?} controller connected: {id}");
        handedness
    }
}
