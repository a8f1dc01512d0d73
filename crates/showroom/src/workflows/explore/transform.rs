use serde::{Deserialize, Serialize};

/// Visual transform of one card. Units are logical pixels and degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardTransform {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale: f32,
}

impl CardTransform {
    pub const REST: Self = Self {
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
        scale: 1.0,
    };

    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }

    /// Offset applied to cards beneath the top card so the stack reads as a pile.
    pub(crate) fn stacked(self, level: usize) -> Self {
        let level = level as f32;
        Self {
            y: self.y + level * -8.0,
            scale: self.scale * (1.0 - level * 0.05),
            ..self
        }
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::REST
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Track the pointer with no perceptible lag.
    Follow,
    /// Spring back to rest after a cancelled drag.
    Settle,
    /// Fling off-screen after a committed swipe.
    Exit,
}

/// Timing hint handed to whatever renders the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionHint {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl TransitionHint {
    pub const FOLLOW: Self = Self {
        duration_ms: 0,
        easing: Easing::Follow,
    };
    pub const SETTLE: Self = Self {
        duration_ms: 250,
        easing: Easing::Settle,
    };
    pub const EXIT: Self = Self {
        duration_ms: 450,
        easing: Easing::Exit,
    };
}

/// Target transform plus how to get there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimatedTransform {
    pub target: CardTransform,
    pub hint: TransitionHint,
}

impl AnimatedTransform {
    pub const fn follow(target: CardTransform) -> Self {
        Self {
            target,
            hint: TransitionHint::FOLLOW,
        }
    }

    pub const fn settle() -> Self {
        Self {
            target: CardTransform::REST,
            hint: TransitionHint::SETTLE,
        }
    }

    pub const fn exit(target: CardTransform) -> Self {
        Self {
            target,
            hint: TransitionHint::EXIT,
        }
    }
}

impl Default for AnimatedTransform {
    fn default() -> Self {
        Self {
            target: CardTransform::REST,
            hint: TransitionHint::SETTLE,
        }
    }
}

/// Size of the surface the deck is drawn on, used to size exit flings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}
