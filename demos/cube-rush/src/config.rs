use std::path::{Path, PathBuf};

use flythrough::{components::camera, FlythroughResult, DEFAULT_FRAME_RATE};
use serde::{Deserialize, Serialize};

/// How fast the cube flies at the player, in metres per second
pub const DEFAULT_SPEED: f32 = 2.;

/// How the cube is moved each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propulsion {
    /// Translate the cube's transform directly
    #[default]
    Kinematic,
    /// Give the cube a rigid body and let the physics simulation move it
    Physics,
}

/// When the cube is allowed to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionGating {
    /// Only while the game is playing
    #[default]
    WhilePlaying,
    /// Every frame, no matter what the session is doing. Earlier builds of the demo behaved
    /// like this; it's kept so that behaviour can still be reproduced.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: camera::DEFAULT_FOV_DEGREES,
            near: camera::DEFAULT_NEAR,
            far: camera::DEFAULT_FAR,
        }
    }
}

/// Everything about the demo that can be changed without recompiling.
/// Any field left out of a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that asset paths are relative to
    pub asset_root: PathBuf,
    /// A near-silent track that loops for as long as the app runs
    pub silence_path: PathBuf,
    /// The music that plays while the game is running
    pub music_path: PathBuf,
    pub speed: f32,
    pub propulsion: Propulsion,
    pub motion_gating: MotionGating,
    pub camera: CameraConfig,
    pub frame_rate: f32,
    /// Pace frames in real time. Turn this off to run a session as fast as possible.
    pub realtime: bool,
    /// Play sound through the default output device
    pub audio_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_root: "assets".into(),
            silence_path: "audio/silence.wav".into(),
            music_path: "audio/hyperspace.mp3".into(),
            speed: DEFAULT_SPEED,
            propulsion: Default::default(),
            motion_gating: Default::default(),
            camera: Default::default(),
            frame_rate: DEFAULT_FRAME_RATE,
            realtime: true,
            audio_output: true,
        }
    }
}

impl Config {
    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> FlythroughResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> FlythroughResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flythrough::FlythroughError;

    #[test]
    pub fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.speed, 2.);
        assert_eq!(config.camera.fov_degrees, 90.);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 100.);
        assert_eq!(config.propulsion, Propulsion::Kinematic);
        assert_eq!(config.motion_gating, MotionGating::WhilePlaying);
    }

    #[test]
    pub fn test_partial_config() {
        let config = Config::from_json(
            r#"{
                "propulsion": "physics",
                "motion_gating": "always",
                "camera": { "fov_degrees": 110.0 },
                "realtime": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.propulsion, Propulsion::Physics);
        assert_eq!(config.motion_gating, MotionGating::Always);
        assert_eq!(config.camera.fov_degrees, 110.);
        assert_eq!(config.camera.far, 100.);
        assert!(!config.realtime);
        assert_eq!(config.music_path, PathBuf::from("audio/hyperspace.mp3"));
    }

    #[test]
    pub fn test_bad_config() {
        assert!(matches!(
            Config::from_json(r#"{ "propulsion": "rocket" }"#),
            Err(FlythroughError::Config(_))
        ));
        assert!(matches!(
            Config::load("/definitely/not/a/config.json"),
            Err(FlythroughError::IO(_))
        ));
    }
}
