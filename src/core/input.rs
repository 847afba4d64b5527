/// Per-tick input samples and rising-edge detection.
use serde::{Deserialize, Serialize};

/// Raw axis and button values read once per tick. Anything above zero
/// counts as pressed; a negative vertical axis is "down".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSample {
    pub horizontal: f32,
    pub vertical: f32,
    pub fire: f32,
    /// Only used to restart after the story ends.
    pub secondary: f32,
}

impl InputSample {
    pub fn fire_held(&self) -> bool {
        self.fire > 0.0
    }

    pub fn secondary_held(&self) -> bool {
        self.secondary > 0.0
    }

    pub fn up_held(&self) -> bool {
        self.vertical > 0.0
    }

    pub fn down_held(&self) -> bool {
        self.vertical < 0.0
    }

    pub fn with_fire(mut self) -> Self {
        self.fire = 1.0;
        self
    }

    pub fn with_secondary(mut self) -> Self {
        self.secondary = 1.0;
        self
    }

    pub fn with_up(mut self) -> Self {
        self.vertical = 1.0;
        self
    }

    pub fn with_down(mut self) -> Self {
        self.vertical = -1.0;
        self
    }
}

/// What went from released to held between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputEdges {
    pub fire: bool,
    pub secondary: bool,
    pub up: bool,
    pub down: bool,
}

impl InputEdges {
    pub fn between(previous: &InputSample, current: &InputSample) -> Self {
        Self {
            fire: current.fire_held() && !previous.fire_held(),
            secondary: current.secondary_held() && !previous.secondary_held(),
            up: current.up_held() && !previous.up_held(),
            down: current.down_held() && !previous.down_held(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge_once() {
        let released = InputSample::default();
        let pressed = InputSample::default().with_fire();

        assert!(InputEdges::between(&released, &pressed).fire);
        assert!(!InputEdges::between(&pressed, &pressed).fire);
        assert!(!InputEdges::between(&pressed, &released).fire);
    }

    #[test]
    fn vertical_axis_splits_into_up_and_down() {
        let released = InputSample::default();
        let up = InputEdges::between(&released, &released.with_up());
        assert!(up.up && !up.down);

        let down = InputEdges::between(&released, &released.with_down());
        assert!(down.down && !down.up);

        // Swinging straight from up to down is a fresh down press.
        let swing = InputEdges::between(&released.with_up(), &released.with_down());
        assert!(swing.down && !swing.up);
    }

    #[test]
    fn analog_values_count_when_positive() {
        let previous = InputSample::default();
        let current = InputSample {
            fire: 0.3,
            secondary: -0.5,
            ..InputSample::default()
        };
        let edges = InputEdges::between(&previous, &current);
        assert!(edges.fire);
        assert!(!edges.secondary);
    }
}
