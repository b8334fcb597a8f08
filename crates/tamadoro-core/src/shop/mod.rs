//! Shop catalog, purchase rules and the pet's resulting look.

mod appearance;
mod purchase;

pub use appearance::{AccessoryFit, PetAppearance, ORNAMENT_SLOTS};
pub use purchase::evaluate_purchase;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::ConfigError;

/// Catalog identifier of a shop item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Recolours the pet itself.
    Skin,
    /// Placed around (or on) the pet.
    Decoration,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::Skin => f.write_str("Skin"),
            ItemCategory::Decoration => f.write_str("Decoration"),
        }
    }
}

/// Where a decoration is drawn. Ignored for skins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecorationSlot {
    Background,
    Headwear,
    #[default]
    Ornament,
}

/// A cosmetic item for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: ItemId,
    pub name: String,
    /// Point cost.
    pub price: u32,
    pub category: ItemCategory,
    /// Display handle for the presentation layer.
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub slot: DecorationSlot,
    /// Whether the owner can resize and move it.
    #[serde(default)]
    pub adjustable: bool,
}

impl ShopItem {
    fn new(id: u32, name: &str, price: u32, category: ItemCategory, asset: &str) -> Self {
        Self {
            id: ItemId(id),
            name: name.to_string(),
            price,
            category,
            asset: asset.to_string(),
            slot: DecorationSlot::Ornament,
            adjustable: false,
        }
    }

    fn in_slot(mut self, slot: DecorationSlot) -> Self {
        self.slot = slot;
        self
    }

    fn adjustable(mut self) -> Self {
        self.adjustable = true;
        self
    }
}

/// Immutable list of items the shop offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    items: Vec<ShopItem>,
}

impl Catalog {
    /// Validate and build a catalog.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for duplicate ids or blank names.
    pub fn new(items: Vec<ShopItem>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for (i, item) in items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("shop[{i}].name"),
                    "item name must not be empty",
                ));
            }
            if !seen.insert(item.id) {
                return Err(ConfigError::invalid(
                    format!("shop[{i}].id"),
                    format!("duplicate item id {}", item.id),
                ));
            }
        }
        Ok(Self { items })
    }

    pub fn default_items() -> Vec<ShopItem> {
        use DecorationSlot::{Background, Headwear};
        use ItemCategory::{Decoration, Skin};

        vec![
            ShopItem::new(1, "Vassar Hat", 150, Decoration, "assets/shop/vassar-hat.png")
                .in_slot(Headwear)
                .adjustable(),
            ShopItem::new(2, "Campus Backdrop", 200, Decoration, "assets/shop/campus.png")
                .in_slot(Background),
            ShopItem::new(3, "Study Lamp", 75, Decoration, "assets/shop/lamp.png"),
            ShopItem::new(4, "Coffee Mug", 50, Decoration, "assets/shop/mug.png"),
            ShopItem::new(5, "Midnight Skin", 120, Skin, "skin-midnight"),
            ShopItem::new(6, "Sunset Skin", 120, Skin, "skin-sunset"),
            ShopItem::new(7, "Potted Plant", 60, Decoration, "assets/shop/plant.png"),
            ShopItem::new(8, "Book Stack", 90, Decoration, "assets/shop/books.png"),
            ShopItem::new(9, "Pennant", 40, Decoration, "assets/shop/pennant.png"),
            ShopItem::new(10, "Desk Clock", 80, Decoration, "assets/shop/clock.png"),
            ShopItem::new(11, "Star Sticker", 30, Decoration, "assets/shop/star.png"),
        ]
    }

    pub fn items(&self) -> &[ShopItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            items: Self::default_items(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = Catalog::new(Catalog::default_items()).unwrap();
        assert_eq!(catalog, Catalog::default());
        assert_eq!(catalog.get(ItemId(1)).unwrap().slot, DecorationSlot::Headwear);
        assert!(catalog.get(ItemId(1)).unwrap().adjustable);
        assert!(catalog.get(ItemId(404)).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut items = Catalog::default_items();
        items[1].id = items[0].id;
        let err = Catalog::new(items).unwrap_err();
        assert!(err.to_string().contains("duplicate item id 1"));
    }

    #[test]
    fn rejects_blank_names() {
        let mut items = Catalog::default_items();
        items[2].name = " ".to_string();
        assert!(Catalog::new(items).is_err());
    }

    #[test]
    fn item_deserializes_with_defaults() {
        let item: ShopItem = toml::from_str(
            r#"
            id = 42
            name = "Bow Tie"
            price = 25
            category = "decoration"
            "#,
        )
        .unwrap();
        assert_eq!(item.id, ItemId(42));
        assert_eq!(item.slot, DecorationSlot::Ornament);
        assert!(!item.adjustable);
        assert!(item.asset.is_empty());
    }
}
