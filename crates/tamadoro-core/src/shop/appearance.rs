use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::progression::EvolutionStage;

use super::{Catalog, DecorationSlot, ItemCategory, ItemId, ShopItem};

/// Number of fixed positions ornaments can occupy around the pet.
pub const ORNAMENT_SLOTS: usize = 6;

const SCALE_RANGE: (f64, f64) = (0.5, 2.5);
const OFFSET_RANGE: (i32, i32) = (-50, 50);

/// Size and position tweak for an adjustable accessory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessoryFit {
    pub scale: f64,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl AccessoryFit {
    /// Build a fit, clamping every component into its allowed range.
    pub fn clamped(scale: f64, offset_x: i32, offset_y: i32) -> Self {
        let scale = if scale.is_finite() {
            scale.clamp(SCALE_RANGE.0, SCALE_RANGE.1)
        } else {
            Self::default().scale
        };
        Self {
            scale,
            offset_x: offset_x.clamp(OFFSET_RANGE.0, OFFSET_RANGE.1),
            offset_y: offset_y.clamp(OFFSET_RANGE.0, OFFSET_RANGE.1),
        }
    }
}

impl Default for AccessoryFit {
    fn default() -> Self {
        Self {
            scale: 1.2,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

/// What the pet currently looks like.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetAppearance {
    pub stage: EvolutionStage,
    /// Most recently bought skin.
    pub skin: Option<ShopItem>,
    pub background: Option<ShopItem>,
    pub headwear: Option<(ShopItem, AccessoryFit)>,
    /// Remaining decorations in purchase order, capped at [`ORNAMENT_SLOTS`].
    pub ornaments: Vec<ShopItem>,
}

impl PetAppearance {
    pub fn derive(
        stage: EvolutionStage,
        catalog: &Catalog,
        purchased: &[ItemId],
        fits: &HashMap<ItemId, AccessoryFit>,
    ) -> Self {
        let owned: Vec<&ShopItem> = purchased.iter().filter_map(|id| catalog.get(*id)).collect();

        let skin = owned
            .iter()
            .rev()
            .find(|item| item.category == ItemCategory::Skin)
            .map(|item| (*item).clone());

        let decorations: Vec<&ShopItem> = owned
            .iter()
            .copied()
            .filter(|item| item.category == ItemCategory::Decoration)
            .collect();

        let background = decorations
            .iter()
            .find(|item| item.slot == DecorationSlot::Background)
            .copied();
        let headwear = decorations
            .iter()
            .find(|item| item.slot == DecorationSlot::Headwear)
            .copied();

        let ornaments = decorations
            .iter()
            .filter(|item| Some(item.id) != background.map(|b| b.id))
            .filter(|item| Some(item.id) != headwear.map(|h| h.id))
            .take(ORNAMENT_SLOTS)
            .map(|item| (*item).clone())
            .collect();

        Self {
            stage,
            skin,
            background: background.cloned(),
            headwear: headwear.map(|item| {
                let fit = fits.get(&item.id).copied().unwrap_or_default();
                (item.clone(), fit)
            }),
            ornaments,
        }
    }
}
