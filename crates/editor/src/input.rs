//! Pointer state between window events.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What the pointer is currently doing to the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    Idle,
    /// Primary pressed, waiting for the pick to say whether a handle was grabbed.
    Resolving,
    Orbiting,
    Panning,
    Dragging,
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    position: Vec2,
    primary: bool,
    secondary: bool,
    middle: bool,
    gesture: Gesture,
}

impl InputState {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn primary_held(&self) -> bool {
        self.primary
    }

    pub fn any_held(&self) -> bool {
        self.primary || self.secondary || self.middle
    }

    /// Record a new pointer position and return the movement since the last one.
    pub fn move_to(&mut self, position: Vec2) -> Vec2 {
        let delta = position - self.position;
        self.position = position;
        delta
    }

    /// Returns true when the press should trigger a pick.
    pub fn press(&mut self, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => {
                self.primary = true;
                if self.gesture != Gesture::Dragging {
                    self.gesture = Gesture::Resolving;
                    return true;
                }
                false
            }
            PointerButton::Secondary | PointerButton::Middle => {
                if button == PointerButton::Secondary {
                    self.secondary = true;
                } else {
                    self.middle = true;
                }
                if matches!(self.gesture, Gesture::Idle | Gesture::Orbiting) {
                    self.gesture = Gesture::Panning;
                }
                false
            }
        }
    }

    pub fn release(&mut self, button: PointerButton) {
        match button {
            PointerButton::Primary => self.primary = false,
            PointerButton::Secondary => self.secondary = false,
            PointerButton::Middle => self.middle = false,
        }
        self.gesture = match self.gesture {
            Gesture::Panning if self.secondary || self.middle => Gesture::Panning,
            Gesture::Resolving | Gesture::Orbiting | Gesture::Dragging if self.primary => self.gesture,
            _ if self.secondary || self.middle => Gesture::Panning,
            _ => Gesture::Idle,
        };
    }

    /// The pick for the current press came back (or was dropped).
    pub fn resolve(&mut self, dragging: bool) {
        if self.gesture != Gesture::Resolving {
            return;
        }
        self.gesture = if dragging {
            Gesture::Dragging
        } else if self.primary {
            Gesture::Orbiting
        } else {
            Gesture::Idle
        };
    }
}

/// Ties pick results to the primary press that asked for them.
///
/// Only the newest press may turn its pick into a gesture. A readback that
/// was already in flight when a later press landed still updates the
/// selection, but leaves the later press unresolved until its own pick
/// answers.
#[derive(Clone, Debug, Default)]
pub struct PressTracker {
    latest: u64,
    requested: Option<u64>,
    in_flight: Option<u64>,
}

impl PressTracker {
    /// A primary press asked for a pick.
    pub fn press(&mut self) -> u64 {
        self.latest += 1;
        self.requested = Some(self.latest);
        self.latest
    }

    /// A pick was requested outside of any press.
    pub fn untracked(&mut self) {
        self.requested = None;
    }

    /// The pending request went out with this frame.
    pub fn issued(&mut self) {
        self.in_flight = self.requested.take();
    }

    /// The pending request was dropped. True when it belonged to the newest press.
    pub fn dropped(&mut self) -> bool {
        self.requested.take() == Some(self.latest)
    }

    /// A pick result arrived. True when it answers the newest press.
    pub fn completed(&mut self) -> bool {
        self.in_flight.take() == Some(self.latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_resolves_only_its_own_press() {
        let mut presses = PressTracker::default();
        presses.press();
        presses.issued();
        // Second press lands before the first readback completes.
        presses.press();
        assert!(!presses.completed(), "first result must not resolve the second press");

        presses.issued();
        assert!(presses.completed());
    }

    #[test]
    fn dropped_request_resolves_the_newest_press() {
        let mut presses = PressTracker::default();
        presses.press();
        assert!(presses.dropped());
        assert!(!presses.dropped());
    }

    #[test]
    fn untracked_picks_never_resolve_a_press() {
        let mut presses = PressTracker::default();
        presses.press();
        presses.untracked();
        presses.issued();
        assert!(!presses.completed());
    }

    #[test]
    fn primary_press_resolves_to_orbit_or_drag() {
        let mut input = InputState::default();
        assert!(input.press(PointerButton::Primary));
        assert_eq!(input.gesture(), Gesture::Resolving);
        input.resolve(false);
        assert_eq!(input.gesture(), Gesture::Orbiting);

        input.release(PointerButton::Primary);
        assert_eq!(input.gesture(), Gesture::Idle);

        input.press(PointerButton::Primary);
        input.resolve(true);
        assert_eq!(input.gesture(), Gesture::Dragging);
    }

    #[test]
    fn quick_click_resolves_to_idle() {
        let mut input = InputState::default();
        input.press(PointerButton::Primary);
        input.release(PointerButton::Primary);
        assert_eq!(input.gesture(), Gesture::Idle);
        input.resolve(false);
        assert_eq!(input.gesture(), Gesture::Idle);
    }

    #[test]
    fn secondary_and_middle_pan() {
        let mut input = InputState::default();
        assert!(!input.press(PointerButton::Middle));
        assert_eq!(input.gesture(), Gesture::Panning);
        input.release(PointerButton::Middle);
        assert_eq!(input.gesture(), Gesture::Idle);
    }

    #[test]
    fn move_reports_delta() {
        let mut input = InputState::default();
        input.move_to(Vec2::new(10.0, 10.0));
        assert_eq!(input.move_to(Vec2::new(13.0, 6.0)), Vec2::new(3.0, -4.0));
    }
}
