use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::gesture::{GestureConfig, SwipeAxis, SwipeDirection};
use super::transform::{AnimatedTransform, CardTransform, Viewport};

/// Image shown for a card that arrived without any media.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/vehicle-placeholder.png";

/// Exit flings travel this multiple of the viewport extent.
const EXIT_DISTANCE_FACTOR: f32 = 1.5;
const EXIT_ROTATION: f32 = 15.0;

/// One card in the deck. The engine only relies on `id` and `images`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: String,
    pub images: Vec<String>,
    pub title: String,
    pub year: Option<u16>,
    pub mileage: Option<u32>,
    pub price: Option<u32>,
}

impl CandidateItem {
    /// Number of images to cycle through; never zero.
    pub fn media_count(&self) -> usize {
        self.images.len().max(1)
    }

    pub fn media_at(&self, cursor: usize) -> &str {
        if self.images.is_empty() {
            return PLACEHOLDER_IMAGE;
        }
        &self.images[cursor % self.images.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    pub axis: SwipeAxis,
    pub gesture: GestureConfig,
    pub viewport: Viewport,
    /// How many undismissed cards receive transforms for rendering.
    pub visible_cards: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            axis: SwipeAxis::Horizontal,
            gesture: GestureConfig::default(),
            viewport: Viewport::default(),
            visible_cards: 3,
        }
    }
}

/// Result of a successful dismissal. Produced at most once per card.
#[derive(Debug, Clone, PartialEq)]
pub struct Dismissal {
    pub index: usize,
    pub direction: SwipeDirection,
    pub exit: AnimatedTransform,
}

/// Render-ready view of a card near the top of the stack.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleCard<'a> {
    pub index: usize,
    pub item: &'a CandidateItem,
    /// 0 for the top card, growing downward.
    pub stack_level: usize,
    pub transform: AnimatedTransform,
    pub media: &'a str,
    pub media_cursor: usize,
    pub media_count: usize,
}

/// Ordered stack of candidates plus dismissal, media cursor and transform state.
#[derive(Debug, Clone)]
pub struct CardDeck {
    items: Vec<CandidateItem>,
    dismissed: BTreeSet<usize>,
    media_cursor: HashMap<usize, usize>,
    transforms: HashMap<usize, AnimatedTransform>,
    viewport: Viewport,
    visible_cards: usize,
}

impl CardDeck {
    pub fn new(config: &DeckConfig) -> Self {
        Self {
            items: Vec::new(),
            dismissed: BTreeSet::new(),
            media_cursor: HashMap::new(),
            transforms: HashMap::new(),
            viewport: config.viewport,
            visible_cards: config.visible_cards.max(1),
        }
    }

    pub fn with_items(config: &DeckConfig, items: Vec<CandidateItem>) -> Self {
        let mut deck = Self::new(config);
        deck.reset(items);
        deck
    }

    /// Replace every candidate and forget all per-card state.
    pub fn reset(&mut self, items: Vec<CandidateItem>) {
        self.items = items;
        self.dismissed.clear();
        self.media_cursor.clear();
        self.transforms.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CandidateItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&CandidateItem> {
        self.items.get(index)
    }

    /// Lowest index not yet dismissed.
    pub fn top_index(&self) -> Option<usize> {
        (0..self.items.len()).find(|index| !self.dismissed.contains(index))
    }

    pub fn top_item(&self) -> Option<&CandidateItem> {
        self.top_index().and_then(|index| self.items.get(index))
    }

    pub fn is_exhausted(&self) -> bool {
        self.dismissed.len() == self.items.len()
    }

    pub fn remaining(&self) -> usize {
        self.items.len() - self.dismissed.len()
    }

    pub fn is_dismissed(&self, index: usize) -> bool {
        self.dismissed.contains(&index)
    }

    pub fn dismissed(&self) -> &BTreeSet<usize> {
        &self.dismissed
    }

    /// Claim a card for removal. Returns `None` if the index is unknown or already gone.
    pub fn dismiss(&mut self, index: usize, direction: SwipeDirection) -> Option<Dismissal> {
        if index >= self.items.len() || !self.dismissed.insert(index) {
            return None;
        }

        let exit = AnimatedTransform::exit(self.exit_target(direction));
        self.transforms.insert(index, exit);

        Some(Dismissal {
            index,
            direction,
            exit,
        })
    }

    fn exit_target(&self, direction: SwipeDirection) -> CardTransform {
        let sign = direction.sign();
        let rotation = sign * EXIT_ROTATION;
        match direction.axis() {
            SwipeAxis::Horizontal => CardTransform {
                x: sign * self.viewport.width * EXIT_DISTANCE_FACTOR,
                rotation,
                ..CardTransform::REST
            },
            SwipeAxis::Vertical => CardTransform {
                y: sign * self.viewport.height * EXIT_DISTANCE_FACTOR,
                rotation,
                ..CardTransform::REST
            },
        }
    }

    pub fn media_cursor(&self, index: usize) -> usize {
        self.media_cursor.get(&index).copied().unwrap_or(0)
    }

    pub fn current_media(&self, index: usize) -> Option<&str> {
        self.items
            .get(index)
            .map(|item| item.media_at(self.media_cursor(index)))
    }

    /// Advance to the next image, wrapping around. Returns the new cursor.
    pub fn cycle_media(&mut self, index: usize) -> Option<usize> {
        self.step_media(index, 1)
    }

    /// Step back to the previous image, wrapping around.
    pub fn previous_media(&mut self, index: usize) -> Option<usize> {
        let count = self.items.get(index)?.media_count();
        self.step_media(index, count - 1)
    }

    /// Dismissed cards keep their last cursor; stepping them yields `None`.
    fn step_media(&mut self, index: usize, step: usize) -> Option<usize> {
        if self.dismissed.contains(&index) {
            return None;
        }
        let count = self.items.get(index)?.media_count();
        if count <= 1 {
            return Some(0);
        }

        let cursor = self.media_cursor.entry(index).or_insert(0);
        *cursor = (*cursor + step) % count;
        Some(*cursor)
    }

    pub fn transform(&self, index: usize) -> AnimatedTransform {
        self.transforms.get(&index).copied().unwrap_or_default()
    }

    pub(crate) fn set_transform(&mut self, index: usize, transform: AnimatedTransform) {
        if index < self.items.len() && !self.dismissed.contains(&index) {
            self.transforms.insert(index, transform);
        }
    }

    /// The top few undismissed cards, top first, with stacking applied.
    pub fn visible_cards(&self) -> Vec<VisibleCard<'_>> {
        (0..self.items.len())
            .filter(|index| !self.dismissed.contains(index))
            .take(self.visible_cards)
            .enumerate()
            .map(|(level, index)| {
                let live = self.transform(index);
                let item = &self.items[index];
                let cursor = self.media_cursor(index);
                VisibleCard {
                    index,
                    item,
                    stack_level: level,
                    transform: AnimatedTransform {
                        target: live.target.stacked(level),
                        hint: live.hint,
                    },
                    media: item.media_at(cursor),
                    media_cursor: cursor,
                    media_count: item.media_count(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, images: usize) -> CandidateItem {
        CandidateItem {
            id: id.to_string(),
            images: (0..images).map(|n| format!("https://cdn.example/{id}/{n}.jpg")).collect(),
            title: format!("Vehicle {id}"),
            year: Some(2021),
            mileage: Some(42_000),
            price: Some(289_000),
        }
    }

    fn deck(count: usize) -> CardDeck {
        let items = (0..count).map(|n| item(&format!("v{n}"), 3)).collect();
        CardDeck::with_items(&DeckConfig::default(), items)
    }

    #[test]
    fn second_dismiss_of_same_card_is_a_no_op() {
        let mut deck = deck(3);
        assert!(deck.dismiss(0, SwipeDirection::Right).is_some());
        assert!(deck.dismiss(0, SwipeDirection::Left).is_none());
        assert_eq!(deck.dismissed().len(), 1);
        assert_eq!(deck.top_index(), Some(1));
    }

    #[test]
    fn out_of_range_dismiss_is_ignored() {
        let mut deck = deck(2);
        assert!(deck.dismiss(7, SwipeDirection::Right).is_none());
        assert!(deck.dismissed().is_empty());
    }

    #[test]
    fn exit_fling_clears_the_viewport() {
        let config = DeckConfig::default();
        let mut deck = deck(2);
        let dismissal = deck.dismiss(0, SwipeDirection::Left).expect("dismissed");
        assert!(dismissal.exit.target.x <= -config.viewport.width);
        assert_eq!(dismissal.exit.target.rotation, -15.0);

        let vertical = deck.dismiss(1, SwipeDirection::Down).expect("dismissed");
        assert!(vertical.exit.target.y >= config.viewport.height);
    }

    #[test]
    fn empty_deck_is_exhausted_immediately() {
        let deck = CardDeck::new(&DeckConfig::default());
        assert!(deck.is_exhausted());
        assert_eq!(deck.top_index(), None);
    }

    #[test]
    fn media_cursor_wraps_and_steps_back() {
        let mut deck = deck(1);
        assert_eq!(deck.cycle_media(0), Some(1));
        assert_eq!(deck.cycle_media(0), Some(2));
        assert_eq!(deck.cycle_media(0), Some(0));
        assert_eq!(deck.previous_media(0), Some(2));
    }

    #[test]
    fn dismissed_card_keeps_its_cursor() {
        let mut deck = deck(2);
        assert_eq!(deck.cycle_media(0), Some(1));
        deck.dismiss(0, SwipeDirection::Left);

        assert_eq!(deck.cycle_media(0), None);
        assert_eq!(deck.previous_media(0), None);
        assert_eq!(deck.media_cursor(0), 1);
    }

    #[test]
    fn card_without_images_uses_placeholder() {
        let mut deck = CardDeck::with_items(&DeckConfig::default(), vec![item("bare", 0)]);
        assert_eq!(deck.current_media(0), Some(PLACEHOLDER_IMAGE));
        assert_eq!(deck.cycle_media(0), Some(0));
    }

    #[test]
    fn only_top_cards_are_visible() {
        let mut deck = deck(6);
        deck.dismiss(0, SwipeDirection::Right);
        let visible = deck.visible_cards();
        let indices: Vec<usize> = visible.iter().map(|card| card.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(visible[2].stack_level, 2);
        assert_eq!(visible[2].transform.target.y, -16.0);
    }

    #[test]
    fn reset_clears_cursors_and_dismissals() {
        let mut deck = deck(2);
        deck.cycle_media(1);
        deck.dismiss(0, SwipeDirection::Right);
        deck.reset(vec![item("fresh", 2)]);
        assert_eq!(deck.top_index(), Some(0));
        assert_eq!(deck.media_cursor(0), 0);
        assert!(deck.transform(0).target.is_rest());
    }
}
