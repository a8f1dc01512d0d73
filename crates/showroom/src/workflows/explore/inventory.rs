use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use super::catalog::Vehicle;

const LIST_SEPARATOR: char = '|';

#[derive(Debug, thiserror::Error)]
pub enum InventoryImportError {
    #[error("failed to read inventory export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid inventory CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("inventory row {row} has no vehicle id")]
    MissingId { row: usize },
}

/// Loads vehicles from a listing-feed CSV export.
///
/// Expected headers: `id, slug, title, year, mileage, price, classification,
/// feature_image, exterior_gallery, interior_gallery`. List columns are
/// `|`-separated. Blank numeric cells become `None`.
pub struct InventoryImporter;

impl InventoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Vehicle>, InventoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Vehicle>, InventoryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut vehicles = Vec::new();

        for (position, record) in csv_reader.deserialize::<InventoryRow>().enumerate() {
            let row = record?;
            // header is line 1
            let line = position + 2;
            if row.id.is_empty() {
                return Err(InventoryImportError::MissingId { row: line });
            }
            if vehicles.iter().any(|existing: &Vehicle| existing.id == row.id) {
                warn!(vehicle_id = %row.id, row = line, "skipping duplicate inventory row");
                continue;
            }
            vehicles.push(row.into_vehicle());
        }

        debug!(count = vehicles.len(), "inventory imported");
        Ok(vehicles)
    }
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    id: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    year: Option<u16>,
    #[serde(default, deserialize_with = "blank_as_none")]
    mileage: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    price: Option<u32>,
    #[serde(default)]
    classification: String,
    #[serde(default)]
    feature_image: String,
    #[serde(default)]
    exterior_gallery: String,
    #[serde(default)]
    interior_gallery: String,
}

impl InventoryRow {
    fn into_vehicle(self) -> Vehicle {
        let slug = if self.slug.is_empty() {
            self.id.clone()
        } else {
            self.slug
        };

        Vehicle {
            id: self.id,
            slug,
            title: self.title,
            year: self.year,
            mileage: self.mileage,
            price: self.price,
            classifications: split_list(&self.classification),
            feature_images: split_list(&self.feature_image),
            exterior_gallery: split_list(&self.exterior_gallery),
            interior_gallery: split_list(&self.interior_gallery),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let digits: String = value.chars().filter(|c| !matches!(c, ',' | '$' | '_')).collect();
            digits.parse::<T>().map(Some).map_err(serde::de::Error::custom)
        }
    }
}
