//! Swipe-to-decide discovery deck for inventory browsing.

pub mod catalog;
pub mod controller;
pub mod deck;
pub mod gesture;
pub mod inventory;
pub mod transform;

pub use catalog::{candidates_for, categories, ExploreFeed, FavoritesLedger, Vehicle, ALL_CATEGORIES};
pub use controller::{DeckController, DeckEffect, SwipeHandler, SwipeRejected};
pub use deck::{CandidateItem, CardDeck, DeckConfig, Dismissal, VisibleCard, PLACEHOLDER_IMAGE};
pub use gesture::{
    GestureConfig, GestureOutcome, GestureRecognizer, GestureSession, PointerSample, SwipeAxis,
    SwipeDirection,
};
pub use inventory::{InventoryImportError, InventoryImporter};
pub use transform::{AnimatedTransform, CardTransform, Easing, TransitionHint, Viewport};
