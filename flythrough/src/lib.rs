#![warn(missing_docs)]

//! Flythrough is a small, headless engine layer for standalone VR experiences.
//!
//! It owns the "external world" an application talks to each frame: a [`hecs::World`] of
//! components, a physics simulation backed by [`rapier3d`], an audio mixer backed by `oddio`
//! and `cpal`, an XR context that turns OpenXR session state changes into simple events,
//! and a worker thread that loads assets in the background.
//!
//! # Getting started
//! Build an [`Engine`] with an [`EngineBuilder`], hand it an [`contexts::XrRuntime`] (the
//! [`contexts::SimulatedRuntime`] replays a scripted session) and call [`Engine::update`]
//! once per frame:
//!
//! ```no_run
//! use flythrough::{contexts::SimulatedRuntime, EngineBuilder};
//!
//! let mut engine = EngineBuilder::new()
//!     .runtime(Box::new(SimulatedRuntime::demo(72.)))
//!     .build()
//!     .unwrap();
//! while let Ok(tick) = engine.update() {
//!     for event in &tick.events {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub use glam;
pub use hecs;
pub use openxr as xr;
pub use rapier3d;

pub use engine::{Engine, EngineBuilder, EngineEvent, TickData};
pub use flythrough_error::FlythroughError;

/// Components are data that are used to update the simulation and interact with the external world
pub mod components;
/// Contexts are wrappers around some external state that the engine will interact with
pub mod contexts;
mod engine;
mod flythrough_error;
/// Systems are functions called each frame to update either the external state or the current simulation
pub mod systems;
/// Background workers, used to load assets without blocking the frame loop
pub mod workers;

/// Flythrough result type
pub type FlythroughResult<T> = std::result::Result<T, FlythroughError>;

/// The rate the engine ticks at when no other rate is given. This is the refresh rate of the Quest 2.
pub const DEFAULT_FRAME_RATE: f32 = 72.;
