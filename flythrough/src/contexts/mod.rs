#![allow(missing_docs)]
pub mod audio_context;
pub mod physics_context;
pub mod xr_context;

pub use audio_context::{AudioContext, MusicPlayer, MusicTrack, SoundState};
pub use physics_context::PhysicsContext;
pub use xr_context::{RuntimeEvent, SimulatedRuntime, XrContext, XrEvent, XrRuntime};
