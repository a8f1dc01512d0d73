//! Pointer gesture interpretation for a single card.
//!
//! A [`GestureSession`] is opened when a pointer lands on a card and receives
//! every sample until the pointer lifts. While the pointer is down the
//! recognizer emits follow transforms; on release it emits exactly one of
//! [`GestureOutcome::Tap`], [`GestureOutcome::Commit`] or
//! [`GestureOutcome::Cancel`].

use serde::{Deserialize, Serialize};

use super::transform::CardTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    pub const fn axis(self) -> SwipeAxis {
        match self {
            Self::Left | Self::Right => SwipeAxis::Horizontal,
            Self::Up | Self::Down => SwipeAxis::Vertical,
        }
    }

    /// -1 for left/up, +1 for right/down.
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left | Self::Up => -1.0,
            Self::Right | Self::Down => 1.0,
        }
    }

    pub const fn from_sign(axis: SwipeAxis, negative: bool) -> Self {
        match (axis, negative) {
            (SwipeAxis::Horizontal, true) => Self::Left,
            (SwipeAxis::Horizontal, false) => Self::Right,
            (SwipeAxis::Vertical, true) => Self::Up,
            (SwipeAxis::Vertical, false) => Self::Down,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Thresholds and feel of drag handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Release displacement on the primary axis that commits a swipe.
    pub distance_threshold: f32,
    /// Release speed on the primary axis that commits a swipe.
    pub velocity_threshold: f32,
    /// Sessions whose travel never leaves this radius are taps.
    pub tap_slop: f32,
    /// How much of the secondary-axis movement the card follows.
    pub secondary_follow: f32,
    pub rotation_divisor: f32,
    pub lift_scale: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 100.0,
            velocity_threshold: 0.5,
            tap_slop: 10.0,
            secondary_follow: 0.2,
            rotation_divisor: 50.0,
            lift_scale: 1.05,
        }
    }
}

/// One pointer sample. Displacements are cumulative from where the pointer landed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub active: bool,
    pub dx: f32,
    pub dy: f32,
    #[serde(default)]
    pub velocity_x: f32,
    #[serde(default)]
    pub velocity_y: f32,
    #[serde(default)]
    pub direction_x: f32,
    #[serde(default)]
    pub direction_y: f32,
    /// Hint from the input layer. Only measured travel decides tap versus drag.
    #[serde(default)]
    pub is_tap: bool,
}

impl PointerSample {
    pub fn drag(dx: f32, dy: f32) -> Self {
        Self {
            active: true,
            dx,
            dy,
            direction_x: dx.signum(),
            direction_y: dy.signum(),
            ..Self::default()
        }
    }

    pub fn release(dx: f32, dy: f32, velocity_x: f32, velocity_y: f32) -> Self {
        Self {
            active: false,
            dx,
            dy,
            velocity_x,
            velocity_y,
            direction_x: dx.signum(),
            direction_y: dy.signum(),
            is_tap: false,
        }
    }

    pub fn tap() -> Self {
        Self {
            is_tap: true,
            ..Self::default()
        }
    }

    fn travel(&self) -> f32 {
        self.dx.hypot(self.dy)
    }

    fn primary(&self, axis: SwipeAxis) -> (f32, f32, f32) {
        match axis {
            SwipeAxis::Horizontal => (self.dx, self.velocity_x, self.direction_x),
            SwipeAxis::Vertical => (self.dy, self.velocity_y, self.direction_y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Pointer still down; move the card here.
    Follow(CardTransform),
    /// Session ended without leaving the tap slop.
    Tap,
    /// Session ended past a threshold; dismiss the card.
    Commit(SwipeDirection),
    /// Session ended short of both thresholds; return the card to rest.
    Cancel(CardTransform),
    /// Input was not for the card currently accepting gestures.
    Ignored,
}

impl GestureOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Tap | Self::Commit(_) | Self::Cancel(_))
    }
}

/// Per-pointer state for one card.
#[derive(Debug, Clone)]
pub struct GestureSession {
    index: usize,
    max_travel: f32,
    finished: bool,
}

impl GestureSession {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            max_travel: 0.0,
            finished: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// A session is dragging once the pointer has left the tap slop and not yet lifted.
    pub fn is_dragging(&self, config: &GestureConfig) -> bool {
        !self.finished && self.max_travel >= config.tap_slop
    }
}

/// Stateless interpreter applying a [`GestureConfig`] along one axis.
#[derive(Debug, Clone, Copy)]
pub struct GestureRecognizer {
    config: GestureConfig,
    axis: SwipeAxis,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig, axis: SwipeAxis) -> Self {
        Self { config, axis }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn axis(&self) -> SwipeAxis {
        self.axis
    }

    pub fn interpret(&self, session: &mut GestureSession, sample: &PointerSample) -> GestureOutcome {
        if session.finished {
            return GestureOutcome::Ignored;
        }

        session.max_travel = session.max_travel.max(sample.travel());

        if sample.active {
            if session.max_travel < self.config.tap_slop {
                return GestureOutcome::Follow(CardTransform::REST);
            }
            return GestureOutcome::Follow(self.follow_transform(sample));
        }

        session.finished = true;

        if session.max_travel < self.config.tap_slop {
            return GestureOutcome::Tap;
        }

        let (displacement, velocity, direction) = sample.primary(self.axis);
        if self.should_commit(displacement, velocity) {
            let negative = if displacement != 0.0 {
                displacement < 0.0
            } else if direction != 0.0 {
                direction < 0.0
            } else {
                velocity < 0.0
            };
            GestureOutcome::Commit(SwipeDirection::from_sign(self.axis, negative))
        } else {
            GestureOutcome::Cancel(CardTransform::REST)
        }
    }

    /// Either threshold alone is enough.
    pub fn should_commit(&self, displacement: f32, velocity: f32) -> bool {
        displacement.abs() > self.config.distance_threshold
            || velocity.abs() > self.config.velocity_threshold
    }

    fn follow_transform(&self, sample: &PointerSample) -> CardTransform {
        let damp = self.config.secondary_follow;
        let (x, y) = match self.axis {
            SwipeAxis::Horizontal => (sample.dx, sample.dy * damp),
            SwipeAxis::Vertical => (sample.dx * damp, sample.dy),
        };

        CardTransform {
            x,
            y,
            rotation: sample.dx / self.config.rotation_divisor,
            scale: self.config.lift_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(GestureConfig::default(), SwipeAxis::Horizontal)
    }

    #[test]
    fn follow_tracks_primary_axis_and_damps_secondary() {
        let recognizer = recognizer();
        let mut session = GestureSession::new(0);

        match recognizer.interpret(&mut session, &PointerSample::drag(60.0, 20.0)) {
            GestureOutcome::Follow(transform) => {
                assert_eq!(transform.x, 60.0);
                assert!((transform.y - 4.0).abs() < 1e-4);
                assert!((transform.rotation - 1.2).abs() < 1e-4);
                assert_eq!(transform.scale, 1.05);
            }
            other => panic!("expected follow, got {other:?}"),
        }
        assert!(session.is_dragging(recognizer.config()));
    }

    #[test]
    fn slow_long_drag_commits_by_distance() {
        let recognizer = recognizer();
        let mut session = GestureSession::new(1);
        recognizer.interpret(&mut session, &PointerSample::drag(-80.0, 0.0));

        let outcome = recognizer.interpret(&mut session, &PointerSample::release(-150.0, 0.0, 0.1, 0.0));
        assert_eq!(outcome, GestureOutcome::Commit(SwipeDirection::Left));
        assert!(session.is_finished());
    }

    #[test]
    fn short_fast_flick_commits_by_velocity() {
        let recognizer = recognizer();
        let mut session = GestureSession::new(0);
        recognizer.interpret(&mut session, &PointerSample::drag(30.0, 0.0));

        let outcome = recognizer.interpret(&mut session, &PointerSample::release(40.0, 0.0, 0.9, 0.0));
        assert_eq!(outcome, GestureOutcome::Commit(SwipeDirection::Right));
    }

    #[test]
    fn short_slow_drag_cancels_back_to_rest() {
        let recognizer = recognizer();
        let mut session = GestureSession::new(0);
        recognizer.interpret(&mut session, &PointerSample::drag(50.0, 0.0));

        let outcome = recognizer.interpret(&mut session, &PointerSample::release(50.0, 0.0, 0.2, 0.0));
        assert_eq!(outcome, GestureOutcome::Cancel(CardTransform::REST));
    }

    #[test]
    fn movement_inside_slop_is_a_tap() {
        let recognizer = recognizer();
        let mut session = GestureSession::new(0);
        recognizer.interpret(&mut session, &PointerSample::drag(3.0, 2.0));

        let outcome = recognizer.interpret(&mut session, &PointerSample::release(3.0, 2.0, 2.0, 0.0));
        assert_eq!(outcome, GestureOutcome::Tap);
    }

    #[test]
    fn long_drag_flagged_as_tap_still_commits() {
        let recognizer = recognizer();
        let mut session = GestureSession::new(0);
        recognizer.interpret(&mut session, &PointerSample::drag(-150.0, 0.0));

        let release = PointerSample {
            is_tap: true,
            ..PointerSample::release(-150.0, 0.0, 0.1, 0.0)
        };
        let outcome = recognizer.interpret(&mut session, &release);
        assert_eq!(outcome, GestureOutcome::Commit(SwipeDirection::Left));
    }

    #[test]
    fn vertical_axis_uses_vertical_displacement() {
        let recognizer = GestureRecognizer::new(GestureConfig::default(), SwipeAxis::Vertical);
        let mut session = GestureSession::new(0);
        recognizer.interpret(&mut session, &PointerSample::drag(0.0, -60.0));

        let outcome = recognizer.interpret(&mut session, &PointerSample::release(0.0, -120.0, 0.0, 0.1));
        assert_eq!(outcome, GestureOutcome::Commit(SwipeDirection::Up));
    }

    #[test]
    fn finished_sessions_ignore_late_samples() {
        let recognizer = recognizer();
        let mut session = GestureSession::new(0);
        recognizer.interpret(&mut session, &PointerSample::tap());

        let late = recognizer.interpret(&mut session, &PointerSample::drag(200.0, 0.0));
        assert_eq!(late, GestureOutcome::Ignored);
    }
}
