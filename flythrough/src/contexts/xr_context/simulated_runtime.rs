use std::collections::VecDeque;

use openxr::SessionState;

use super::{RuntimeEvent, XrRuntime};

/// An [`XrRuntime`] that replays a script of events, each tagged with the frame it should be
/// delivered on. Handy for running on a desktop without a headset, and for tests.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRuntime {
    script: VecDeque<(u64, RuntimeEvent)>,
}

impl SimulatedRuntime {
    /// Events scheduled for the same frame are delivered in the order they're given
    pub fn new(mut script: Vec<(u64, RuntimeEvent)>) -> Self {
        script.sort_by_key(|(frame, _)| *frame);
        Self {
            script: script.into(),
        }
    }

    /// A short session: put the headset on, take it off for a couple of seconds, put it back on,
    /// then quit. Frame numbers are worked out from `frame_rate`.
    pub fn demo(frame_rate: f32) -> Self {
        let seconds = |s: f32| (s * frame_rate) as u64;
        let state = RuntimeEvent::SessionStateChanged;
        let end = seconds(20.);

        Self::new(vec![
            (0, RuntimeEvent::Resized { width: 1920, height: 1080 }),
            (0, state(SessionState::READY)),
            (1, state(SessionState::SYNCHRONIZED)),
            (2, state(SessionState::VISIBLE)),
            (seconds(1.), state(SessionState::FOCUSED)),
            (seconds(1.) + 1, RuntimeEvent::InputSourceConnected("/user/hand/left".into())),
            (seconds(1.) + 1, RuntimeEvent::InputSourceConnected("/user/hand/right".into())),
            (seconds(8.), state(SessionState::VISIBLE)),
            (seconds(10.), state(SessionState::FOCUSED)),
            (end, state(SessionState::VISIBLE)),
            (end + 1, state(SessionState::SYNCHRONIZED)),
            (end + 2, state(SessionState::STOPPING)),
            (end + 3, state(SessionState::IDLE)),
            (end + 4, state(SessionState::EXITING)),
        ])
    }

    /// Is there anything left to replay?
    pub fn is_finished(&self) -> bool {
        self.script.is_empty()
    }
}

impl XrRuntime for SimulatedRuntime {
    fn poll_event(&mut self, frame_index: u64) -> Option<RuntimeEvent> {
        match self.script.front() {
            Some((frame, _)) if *frame <= frame_index => self.script.pop_front().map(|(_, e)| e),
            _ => None,
        }
    }
}
