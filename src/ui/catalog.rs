use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

pub type CardId = u32;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CardItem {
    pub id: CardId,
    pub label: String,
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog has no cards")]
    Empty,

    #[error("Card id {id} is outside 1..={max}")]
    IdOutOfRange { id: CardId, max: CardId },

    #[error("Card id {0} appears more than once")]
    DuplicateId(CardId),

    #[error("Card {0} has a blank label or detail")]
    BlankText(CardId),
}

/// Static list of concept/detail pairs a round is dealt from.
#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
    pub title: String,
    items: Vec<CardItem>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Ids must cover exactly `1..=N` so a full match set is `N` entries.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let max = self.items.len() as CardId;
        let mut seen = BTreeSet::new();
        for item in &self.items {
            if item.id == 0 || item.id > max {
                return Err(CatalogError::IdOutOfRange { id: item.id, max });
            }
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.label.trim().is_empty() || item.detail.trim().is_empty() {
                return Err(CatalogError::BlankText(item.id));
            }
        }
        Ok(())
    }

    pub fn items(&self) -> &[CardItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }
}
