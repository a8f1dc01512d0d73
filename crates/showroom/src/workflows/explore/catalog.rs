use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::controller::{DeckController, SwipeHandler};
use super::deck::{CandidateItem, DeckConfig};
use super::gesture::SwipeDirection;

/// Category that matches every vehicle.
pub const ALL_CATEGORIES: &str = "Todos";

const CATEGORY_PRIORITY: [&str; 4] = ["SUV", "Sedán", "Pick Up", "Hatchback"];

/// Inventory vehicle as delivered by the listing feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub year: Option<u16>,
    pub mileage: Option<u32>,
    pub price: Option<u32>,
    #[serde(default)]
    pub classifications: Vec<String>,
    #[serde(default)]
    pub feature_images: Vec<String>,
    #[serde(default)]
    pub exterior_gallery: Vec<String>,
    #[serde(default)]
    pub interior_gallery: Vec<String>,
}

impl Vehicle {
    /// Feature image first, then exterior, then interior shots. Blank entries are dropped.
    pub fn media(&self) -> Vec<String> {
        self.feature_images
            .iter()
            .chain(&self.exterior_gallery)
            .chain(&self.interior_gallery)
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn in_category(&self, category: &str) -> bool {
        category == ALL_CATEGORIES || self.classifications.iter().any(|c| c == category)
    }

    pub fn to_candidate(&self) -> CandidateItem {
        CandidateItem {
            id: self.id.clone(),
            images: self.media(),
            title: self.title.clone(),
            year: self.year,
            mileage: self.mileage,
            price: self.price,
        }
    }
}

/// Distinct classifications, well-known body styles first, then alphabetical,
/// with [`ALL_CATEGORIES`] always leading.
pub fn categories(vehicles: &[Vehicle]) -> Vec<String> {
    let distinct: BTreeSet<&str> = vehicles
        .iter()
        .flat_map(|vehicle| vehicle.classifications.iter())
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    let mut extracted: Vec<&str> = distinct.into_iter().collect();
    extracted.sort_by(|a, b| {
        let rank = |value: &str| CATEGORY_PRIORITY.iter().position(|p| *p == value);
        match (rank(*a), rank(*b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });

    std::iter::once(ALL_CATEGORIES)
        .chain(extracted)
        .map(str::to_string)
        .collect()
}

/// Vehicles in `category` that are not already saved, ready to load into a deck.
pub fn candidates_for(
    vehicles: &[Vehicle],
    category: &str,
    favorites: &BTreeSet<String>,
) -> Vec<CandidateItem> {
    vehicles
        .iter()
        .filter(|vehicle| !vehicle.id.trim().is_empty())
        .filter(|vehicle| !favorites.contains(&vehicle.id))
        .filter(|vehicle| vehicle.in_category(category))
        .map(Vehicle::to_candidate)
        .collect()
}

/// Default swipe handler: right and up save a favorite, left and down pass.
#[derive(Debug, Default, Clone)]
pub struct FavoritesLedger {
    favorites: BTreeSet<String>,
    passed: Vec<String>,
}

impl FavoritesLedger {
    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn saves(direction: SwipeDirection) -> bool {
        matches!(direction, SwipeDirection::Right | SwipeDirection::Up)
    }
}

impl SwipeHandler for FavoritesLedger {
    fn on_swipe(&mut self, _index: usize, item: &CandidateItem, direction: SwipeDirection) {
        if Self::saves(direction) {
            info!(item_id = %item.id, title = %item.title, "saved to favorites");
            self.favorites.insert(item.id.clone());
        } else {
            self.passed.push(item.id.clone());
        }
    }
}

/// Browsing session over an inventory: category selection, the deck and saved favorites.
#[derive(Debug)]
pub struct ExploreFeed {
    vehicles: Vec<Vehicle>,
    categories: Vec<String>,
    category_index: usize,
    controller: DeckController,
    ledger: FavoritesLedger,
}

impl ExploreFeed {
    pub fn new(vehicles: Vec<Vehicle>, config: DeckConfig) -> Self {
        let categories = categories(&vehicles);
        let mut feed = Self {
            vehicles,
            categories,
            category_index: 0,
            controller: DeckController::new(config),
            ledger: FavoritesLedger::default(),
        };
        feed.reload();
        feed
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn current_category(&self) -> &str {
        self.categories
            .get(self.category_index)
            .map(String::as_str)
            .unwrap_or(ALL_CATEGORIES)
    }

    /// Switch category and rebuild the deck. Unknown indices are ignored.
    pub fn select_category(&mut self, index: usize) -> bool {
        if index >= self.categories.len() {
            return false;
        }
        self.category_index = index;
        self.reload();
        true
    }

    pub fn select_category_named(&mut self, name: &str) -> bool {
        match self.categories.iter().position(|c| c.eq_ignore_ascii_case(name)) {
            Some(index) => self.select_category(index),
            None => false,
        }
    }

    /// Back to the first category with a fresh deck.
    pub fn restart(&mut self) {
        self.category_index = 0;
        self.reload();
    }

    pub fn controller(&self) -> &DeckController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DeckController {
        &mut self.controller
    }

    pub fn ledger(&self) -> &FavoritesLedger {
        &self.ledger
    }

    /// Deliver pending deck effects to the favorites ledger.
    pub fn flush(&mut self) -> usize {
        self.controller.flush_effects(&mut self.ledger)
    }

    fn reload(&mut self) {
        self.flush();
        let candidates = candidates_for(
            &self.vehicles,
            self.current_category(),
            self.ledger.favorites(),
        );
        info!(
            category = self.current_category(),
            candidates = candidates.len(),
            "loading explore deck"
        );
        self.controller.reset(candidates);
    }
}
