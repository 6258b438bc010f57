/// Which side of the player a controller is on
#[derive(Debug, PartialEq, Clone, Copy, Eq, PartialOrd, Ord)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Work out the side from an input source's identifier, eg. `/user/hand/left`.
    /// Anything that doesn't end in "left" is assumed to be on the right.
    pub fn from_id(id: &str) -> Self {
        if id.ends_with("left") {
            Handedness::Left
        } else {
            Handedness::Right
        }
    }
}

/// A connected input source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub id: String,
}

/// The controllers we've seen, one per hand. A second controller on the same side replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controllers {
    pub left: Option<InputSource>,
    pub right: Option<InputSource>,
}

impl Controllers {
    pub fn connect(&mut self, id: &str) -> Handedness {
        let handedness = Handedness::from_id(id);
        let slot = match handedness {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        };
        *slot = Some(InputSource { id: id.to_string() });
        handedness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_connect() {
        let mut controllers = Controllers::default();

        assert_eq!(controllers.connect("/user/hand/left"), Handedness::Left);
        assert_eq!(controllers.connect("/user/hand/right"), Handedness::Right);
        assert_eq!(controllers.left.as_ref().unwrap().id, "/user/hand/left");
        assert_eq!(controllers.right.as_ref().unwrap().id, "/user/hand/right");

        // Unrecognised identifiers land on the right, replacing what was there
        assert_eq!(controllers.connect("gamepad-0"), Handedness::Right);
        assert_eq!(controllers.right.as_ref().unwrap().id, "gamepad-0");
        assert_eq!(controllers.left.as_ref().unwrap().id, "/user/hand/left");
    }

    #[test]
    pub fn test_suffix_must_be_at_the_end() {
        assert_eq!(Handedness::from_id("left-controller"), Handedness::Right);
        assert_eq!(Handedness::from_id("controller-left"), Handedness::Left);
        assert_eq!(Handedness::from_id(""), Handedness::Right);
    }
}
