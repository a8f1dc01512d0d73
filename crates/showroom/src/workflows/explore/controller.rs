use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::deck::{CandidateItem, CardDeck, DeckConfig};
use super::gesture::{
    GestureOutcome, GestureRecognizer, GestureSession, PointerSample, SwipeDirection,
};
use super::transform::AnimatedTransform;

/// Receives the side effects of deck interaction, one call per event.
pub trait SwipeHandler {
    fn on_swipe(&mut self, index: usize, item: &CandidateItem, direction: SwipeDirection);

    fn on_tap(&mut self, _index: usize, _item: &CandidateItem, _media_cursor: usize) {}
}

/// Side effect claimed by the deck and waiting for the next flush.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEffect {
    Swiped {
        index: usize,
        item: CandidateItem,
        direction: SwipeDirection,
    },
    Tapped {
        index: usize,
        item: CandidateItem,
        media_cursor: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SwipeRejected {
    #[error("no cards left to swipe")]
    Exhausted,
    #[error("card {index} is being dragged")]
    DragInProgress { index: usize },
}

/// Imperative front door to a [`CardDeck`]: pointer input, buttons and taps all
/// funnel into the same dismissal path.
#[derive(Debug)]
pub struct DeckController {
    deck: CardDeck,
    recognizer: GestureRecognizer,
    session: Option<GestureSession>,
    pending: VecDeque<DeckEffect>,
}

impl DeckController {
    pub fn new(config: DeckConfig) -> Self {
        Self {
            deck: CardDeck::new(&config),
            recognizer: GestureRecognizer::new(config.gesture, config.axis),
            session: None,
            pending: VecDeque::new(),
        }
    }

    pub fn with_items(config: DeckConfig, items: Vec<CandidateItem>) -> Self {
        let mut controller = Self::new(config);
        controller.reset(items);
        controller
    }

    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    /// Swap in a new candidate list. Effects already claimed still fire on the next flush.
    pub fn reset(&mut self, items: Vec<CandidateItem>) {
        debug!(count = items.len(), "resetting deck");
        self.session = None;
        self.deck.reset(items);
    }

    pub fn is_dragging(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| session.is_dragging(self.recognizer.config()))
            .unwrap_or(false)
    }

    /// Feed one pointer sample for the card at `index`.
    ///
    /// Top-card identity is checked on every sample, so a release that arrives
    /// after the stack moved on is ignored rather than dismissing the wrong card.
    pub fn pointer(&mut self, index: usize, sample: PointerSample) -> GestureOutcome {
        if self.deck.top_index() != Some(index) {
            if self.session.as_ref().map(GestureSession::index) == Some(index) {
                self.session = None;
            }
            return GestureOutcome::Ignored;
        }

        let resumes = matches!(
            &self.session,
            Some(session) if session.index() == index && !session.is_finished()
        );
        if !resumes {
            self.session = Some(GestureSession::new(index));
        }
        let Some(session) = self.session.as_mut() else {
            return GestureOutcome::Ignored;
        };

        let outcome = self.recognizer.interpret(session, &sample);
        if outcome.is_terminal() {
            self.session = None;
        }

        match outcome {
            GestureOutcome::Follow(target) => {
                self.deck
                    .set_transform(index, AnimatedTransform::follow(target));
            }
            GestureOutcome::Cancel(_) => {
                self.deck.set_transform(index, AnimatedTransform::settle());
            }
            GestureOutcome::Tap => {
                self.tap(index);
            }
            GestureOutcome::Commit(direction) => {
                self.dismiss(index, direction);
            }
            GestureOutcome::Ignored => {}
        }

        outcome
    }

    /// Button-driven swipe of whatever card is on top.
    pub fn swipe(&mut self, direction: SwipeDirection) -> Result<usize, SwipeRejected> {
        let index = self.deck.top_index().ok_or(SwipeRejected::Exhausted)?;

        if self.is_dragging() && self.session.as_ref().map(GestureSession::index) == Some(index) {
            warn!(index, "ignoring button swipe while card is being dragged");
            return Err(SwipeRejected::DragInProgress { index });
        }

        self.dismiss(index, direction);
        Ok(index)
    }

    /// The single dismissal path. The dismissed-set insert and the effect
    /// enqueue happen together; a card already claimed produces nothing.
    pub fn dismiss(&mut self, index: usize, direction: SwipeDirection) -> bool {
        let Some(dismissal) = self.deck.dismiss(index, direction) else {
            return false;
        };

        let Some(item) = self.deck.item(dismissal.index).cloned() else {
            return false;
        };

        info!(
            index,
            item_id = %item.id,
            direction = direction.label(),
            remaining = self.deck.remaining(),
            "card dismissed"
        );

        self.pending.push_back(DeckEffect::Swiped {
            index,
            item,
            direction,
        });
        true
    }

    /// Tap on a card: advance its image and queue the tap effect.
    pub fn tap(&mut self, index: usize) -> Option<usize> {
        if self.deck.is_dismissed(index) {
            return None;
        }

        let media_cursor = self.deck.cycle_media(index)?;
        let item = self.deck.item(index)?.clone();
        self.pending.push_back(DeckEffect::Tapped {
            index,
            item,
            media_cursor,
        });
        Some(media_cursor)
    }

    /// Step a card back one image. No effect is queued and dismissed cards are left alone.
    pub fn previous_media(&mut self, index: usize) -> Option<usize> {
        self.deck.previous_media(index)
    }

    pub fn pending_effects(&self) -> usize {
        self.pending.len()
    }

    /// Deliver queued effects in order. Call once the triggering event has finished.
    pub fn flush_effects<H: SwipeHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        let mut delivered = 0;
        while let Some(effect) = self.pending.pop_front() {
            match effect {
                DeckEffect::Swiped {
                    index,
                    item,
                    direction,
                } => handler.on_swipe(index, &item, direction),
                DeckEffect::Tapped {
                    index,
                    item,
                    media_cursor,
                } => handler.on_tap(index, &item, media_cursor),
            }
            delivered += 1;
        }
        delivered
    }
}
