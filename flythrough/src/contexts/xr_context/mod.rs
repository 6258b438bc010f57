use log::{debug, info};
use openxr::SessionState;

mod simulated_runtime;
pub use simulated_runtime::SimulatedRuntime;

/// Something that happened in the XR runtime since the last frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The OpenXR session moved to a new state
    SessionStateChanged(SessionState),
    /// An input source (eg. `/user/hand/left`) was connected
    InputSourceConnected(String),
    /// The companion window (the "flat" view) changed size
    Resized { width: u32, height: u32 },
}

/// The source of XR events. A real runtime would wrap an `xr::Instance` and its session;
/// [`SimulatedRuntime`] replays a script instead.
pub trait XrRuntime {
    /// Return the next event that has happened by `frame_index`, if any
    fn poll_event(&mut self, frame_index: u64) -> Option<RuntimeEvent>;
}

/// What the application needs to know about the XR session, boiled down from [`RuntimeEvent`]s
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XrEvent {
    /// `true` when the user entered immersive mode, `false` when they left it
    ImmersiveModeChanged(bool),
    /// An input source was connected
    ControllerConnected(String),
    /// The companion window changed size
    Resized { width: u32, height: u32 },
}

/// Tracks the state of the OpenXR session and turns runtime events into [`XrEvent`]s
pub struct XrContext {
    runtime: Box<dyn XrRuntime>,
    /// The state the session was last reported to be in
    pub session_state: SessionState,
    exiting: bool,
}

impl XrContext {
    /// The session starts out IDLE
    pub fn new(runtime: Box<dyn XrRuntime>) -> Self {
        Self {
            runtime,
            session_state: SessionState::IDLE,
            exiting: false,
        }
    }

    /// Drain every event the runtime has for this frame
    pub fn poll_xr_events(&mut self, frame_index: u64) -> Vec<XrEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.runtime.poll_event(frame_index) {
            match event {
                RuntimeEvent::SessionStateChanged(new_state) => {
                    let previous_state = self.session_state;
                    self.session_state = new_state;
                    info!("Session state is now {new_state:?}");

                    if let Some(entered) = immersive_mode_change(previous_state, new_state) {
                        events.push(XrEvent::ImmersiveModeChanged(entered));
                    }
                    if matches!(
                        new_state,
                        SessionState::EXITING | SessionState::LOSS_PENDING
                    ) {
                        self.exiting = true;
                    }
                }
                RuntimeEvent::InputSourceConnected(id) => {
                    debug!("Input source connected: {id}");
                    events.push(XrEvent::ControllerConnected(id));
                }
                RuntimeEvent::Resized { width, height } => {
                    events.push(XrEvent::Resized { width, height })
                }
            }
        }
        events
    }

    /// Has the session reached a state it can't come back from?
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }
}

/// The user is "immersed" only while the session is FOCUSED: the headset is on, our frames are
/// shown and we're receiving input. Anything else (the system menu, the headset coming off, the
/// session stopping) counts as leaving.
pub fn immersive_mode_change(previous: SessionState, current: SessionState) -> Option<bool> {
    match (previous == SessionState::FOCUSED, current == SessionState::FOCUSED) {
        (false, true) => Some(true),
        (true, false) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_changes(states: &[SessionState]) -> SimulatedRuntime {
        SimulatedRuntime::new(
            states
                .iter()
                .enumerate()
                .map(|(frame, state)| (frame as u64, RuntimeEvent::SessionStateChanged(*state)))
                .collect(),
        )
    }

    #[test]
    pub fn test_focus_changes_become_immersive_events() {
        let runtime = state_changes(&[
            SessionState::READY,
            SessionState::SYNCHRONIZED,
            SessionState::VISIBLE,
            SessionState::FOCUSED,
            SessionState::VISIBLE,
            SessionState::FOCUSED,
        ]);
        let mut xr_context = XrContext::new(Box::new(runtime));

        let events = (0..6)
            .flat_map(|frame| xr_context.poll_xr_events(frame))
            .collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![
                XrEvent::ImmersiveModeChanged(true),
                XrEvent::ImmersiveModeChanged(false),
                XrEvent::ImmersiveModeChanged(true),
            ]
        );
        assert_eq!(xr_context.session_state, SessionState::FOCUSED);
        assert!(!xr_context.is_exiting());
    }

    #[test]
    pub fn test_exiting() {
        let runtime = state_changes(&[
            SessionState::FOCUSED,
            SessionState::STOPPING,
            SessionState::EXITING,
        ]);
        let mut xr_context = XrContext::new(Box::new(runtime));

        // Everything arrives in one go if we're late to poll
        let events = xr_context.poll_xr_events(10);
        assert_eq!(
            events,
            vec![
                XrEvent::ImmersiveModeChanged(true),
                XrEvent::ImmersiveModeChanged(false)
            ]
        );
        assert!(xr_context.is_exiting());
    }

    #[test]
    pub fn test_input_sources() {
        let runtime = SimulatedRuntime::new(vec![
            (2, RuntimeEvent::InputSourceConnected("/user/hand/right".into())),
            (1, RuntimeEvent::InputSourceConnected("/user/hand/left".into())),
        ]);
        let mut xr_context = XrContext::new(Box::new(runtime));
        assert!(xr_context.poll_xr_events(0).is_empty());
        assert_eq!(
            xr_context.poll_xr_events(1),
            vec![XrEvent::ControllerConnected("/user/hand/left".into())]
        );
        assert_eq!(
            xr_context.poll_xr_events(2),
            vec![XrEvent::ControllerConnected("/user/hand/right".into())]
        );
    }
}
