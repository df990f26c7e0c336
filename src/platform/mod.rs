//! Platform abstraction layer
//!
//! Input devices are someone else's problem; the simulation only sees an
//! [`InputSource`] answering "is this action held" and "was it just pressed".
//! [`ScriptedInput`] drives headless runs and tests.

use crate::sim::TickInput;

/// Every action the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    PlaceBomb,
    DetonateBomb,
    Pause,
    Exit,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::PlaceBomb,
        Action::DetonateBomb,
        Action::Pause,
        Action::Exit,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-frame input queries
pub trait InputSource {
    /// Refresh device state; called once per tick before any query
    fn poll(&mut self);
    fn is_held(&self, action: Action) -> bool;
    /// Went down since the previous poll
    fn was_pressed(&self, action: Action) -> bool;
}

/// Derives key-down edges for sources that only report held state
#[derive(Debug, Clone, Default)]
pub struct EdgeTracker {
    held: [bool; Action::ALL.len()],
    pressed: [bool; Action::ALL.len()],
}

impl EdgeTracker {
    /// Record this frame's held state for every action
    pub fn update(&mut self, mut held: impl FnMut(Action) -> bool) {
        for action in Action::ALL {
            let i = action.index();
            let now = held(action);
            self.pressed[i] = now && !self.held[i];
            self.held[i] = now;
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }
}

impl TickInput {
    /// Snapshot an input source for one tick
    pub fn sample<S: InputSource + ?Sized>(source: &mut S) -> Self {
        source.poll();
        Self {
            up: source.is_held(Action::Up),
            down: source.is_held(Action::Down),
            left: source.is_held(Action::Left),
            right: source.is_held(Action::Right),
            place_bomb: source.was_pressed(Action::PlaceBomb),
            detonate: source.was_pressed(Action::DetonateBomb),
            pause: source.was_pressed(Action::Pause),
            exit: source.was_pressed(Action::Exit),
        }
    }
}

/// One step of a script: hold `actions` for `ticks` polls
#[derive(Debug, Clone)]
pub struct ScriptStep {
    pub ticks: u32,
    pub actions: Vec<Action>,
}

impl ScriptStep {
    pub fn new(ticks: u32, actions: &[Action]) -> Self {
        Self {
            ticks,
            actions: actions.to_vec(),
        }
    }
}

/// Replays a fixed sequence of held actions, then holds nothing
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    step: usize,
    ticks_in_step: u32,
    edges: EdgeTracker,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            step: 0,
            ticks_in_step: 0,
            edges: EdgeTracker::default(),
        }
    }

    /// Script has been fully replayed
    pub fn finished(&self) -> bool {
        self.step >= self.steps.len()
    }

    fn current(&self) -> &[Action] {
        match self.steps.get(self.step) {
            Some(step) => &step.actions,
            None => &[],
        }
    }

    fn advance(&mut self) {
        // Skip steps with no duration
        while let Some(step) = self.steps.get(self.step) {
            if self.ticks_in_step < step.ticks {
                break;
            }
            self.step += 1;
            self.ticks_in_step = 0;
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) {
        self.advance();
        let held = self.current().to_vec();
        self.edges.update(|action| held.contains(&action));
        if !self.finished() {
            self.ticks_in_step += 1;
        }
    }

    fn is_held(&self, action: Action) -> bool {
        self.edges.is_held(action)
    }

    fn was_pressed(&self, action: Action) -> bool {
        self.edges.was_pressed(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_tracker() {
        let mut edges = EdgeTracker::default();
        edges.update(|a| a == Action::PlaceBomb);
        assert!(edges.was_pressed(Action::PlaceBomb));
        assert!(edges.is_held(Action::PlaceBomb));

        // Still held: no new edge
        edges.update(|a| a == Action::PlaceBomb);
        assert!(!edges.was_pressed(Action::PlaceBomb));
        assert!(edges.is_held(Action::PlaceBomb));

        edges.update(|_| false);
        edges.update(|a| a == Action::PlaceBomb);
        assert!(edges.was_pressed(Action::PlaceBomb));
    }

    #[test]
    fn test_scripted_sample() {
        let mut input = ScriptedInput::new(vec![
            ScriptStep::new(2, &[Action::Right, Action::PlaceBomb]),
            ScriptStep::new(0, &[Action::Exit]),
            ScriptStep::new(1, &[Action::Up]),
        ]);

        let first = TickInput::sample(&mut input);
        assert!(first.right && first.place_bomb);
        let second = TickInput::sample(&mut input);
        assert!(second.right && !second.place_bomb);

        // Zero-length step never shows up
        let third = TickInput::sample(&mut input);
        assert!(third.up && !third.right && !third.exit);
        assert!(!input.finished());

        let fourth = TickInput::sample(&mut input);
        assert_eq!(fourth, TickInput::default());
        assert!(input.finished());
    }

    #[test]
    fn test_empty_script() {
        let mut input = ScriptedInput::new(Vec::new());
        assert!(input.finished());
        assert_eq!(TickInput::sample(&mut input), TickInput::default());
    }
}
