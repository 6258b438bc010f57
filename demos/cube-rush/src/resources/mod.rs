pub mod controllers;
pub mod moving_object;
pub mod session_controller;

pub use controllers::{Controllers, Handedness, InputSource};
pub use moving_object::MovingObject;
pub use session_controller::{AssetKind, SessionController, SessionState};
