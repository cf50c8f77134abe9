//! Items and the player's slot-bounded inventory
//!
//! Items are pure data. Their effects (active weapons, speed bonuses) are applied
//! by [`Player::equip`](super::entity::Player::equip).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::mask::SpriteKey;
use crate::consts::{EQUIPMENT_SLOTS, RELIC_SLOTS, WEAPON_SLOTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    WizardConfetti,
    NinjaStars,
    SquirrelBurst,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [
        WeaponKind::WizardConfetti,
        WeaponKind::NinjaStars,
        WeaponKind::SquirrelBurst,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentKind {
    /// +20% move speed, stacks
    Quicks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelicKind {
    PaperCrown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(WeaponKind),
    Equipment(EquipmentKind),
    Relic(RelicKind),
}

/// Inventory section an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Equipment,
    Relic,
}

impl ItemKind {
    pub fn category(&self) -> ItemCategory {
        match self {
            ItemKind::Weapon(_) => ItemCategory::Weapon,
            ItemKind::Equipment(_) => ItemCategory::Equipment,
            ItemKind::Relic(_) => ItemCategory::Relic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Icon tint used when an item has no artwork
    pub fn color(&self) -> [f32; 4] {
        match self {
            Rarity::Common => [0.78, 0.78, 0.78, 1.0],
            Rarity::Uncommon => [0.0, 1.0, 0.0, 1.0],
            Rarity::Rare => [0.0, 0.39, 1.0, 1.0],
            Rarity::Epic => [0.63, 0.0, 1.0, 1.0],
            Rarity::Legendary => [1.0, 0.65, 0.0, 1.0],
        }
    }
}

/// Collectible item descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub kind: ItemKind,
}

impl Item {
    pub fn weapon(kind: WeaponKind) -> Self {
        let (name, description) = match kind {
            WeaponKind::WizardConfetti => {
                ("Wizard Confetti", "Magical confetti. Deadly AND festive!")
            }
            WeaponKind::NinjaStars => ("Ninja Stars", "Rapid throwing stars with decent range."),
            WeaponKind::SquirrelBurst => (
                "Squirrel Burst",
                "Powerful paws swipe at the enemy, orbiting around you for a short time",
            ),
        };
        Self {
            name: name.to_string(),
            description: description.to_string(),
            rarity: Rarity::Uncommon,
            kind: ItemKind::Weapon(kind),
        }
    }

    pub fn equipment(kind: EquipmentKind) -> Self {
        match kind {
            EquipmentKind::Quicks => Self {
                name: "Quicks".to_string(),
                description: "I am speeeeeed!!!! +20% move speed (stacks)".to_string(),
                rarity: Rarity::Common,
                kind: ItemKind::Equipment(kind),
            },
        }
    }

    pub fn relic(kind: RelicKind) -> Self {
        match kind {
            RelicKind::PaperCrown => Self {
                name: "Paper Crown".to_string(),
                description: "Folded from the first page of this dimension.".to_string(),
                rarity: Rarity::Rare,
                kind: ItemKind::Relic(kind),
            },
        }
    }

    #[inline]
    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Icon handle for inventory and ground rendering
    pub fn icon(&self) -> SpriteKey {
        match self.kind {
            ItemKind::Weapon(w) => SpriteKey::Weapon(Some(w)),
            _ => SpriteKey::Pickup(super::entity::PickupSprite::Item),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("no free {0:?} slot")]
    SlotsFull(ItemCategory),
}

/// Bounded slot arrays: weapons ≤5, equipment ≤5, relics ≤3
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    weapons: Vec<Item>,
    equipment: Vec<Item>,
    relics: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(category: ItemCategory) -> usize {
        match category {
            ItemCategory::Weapon => WEAPON_SLOTS,
            ItemCategory::Equipment => EQUIPMENT_SLOTS,
            ItemCategory::Relic => RELIC_SLOTS,
        }
    }

    fn slots(&self, category: ItemCategory) -> &Vec<Item> {
        match category {
            ItemCategory::Weapon => &self.weapons,
            ItemCategory::Equipment => &self.equipment,
            ItemCategory::Relic => &self.relics,
        }
    }

    fn slots_mut(&mut self, category: ItemCategory) -> &mut Vec<Item> {
        match category {
            ItemCategory::Weapon => &mut self.weapons,
            ItemCategory::Equipment => &mut self.equipment,
            ItemCategory::Relic => &mut self.relics,
        }
    }

    /// Store an item in its section. A full section rejects it unchanged.
    pub fn add_item(&mut self, item: Item) -> Result<(), InventoryError> {
        let category = item.category();
        if self.is_full(category) {
            return Err(InventoryError::SlotsFull(category));
        }
        self.slots_mut(category).push(item);
        Ok(())
    }

    pub fn remove_item(&mut self, category: ItemCategory, slot: usize) -> Option<Item> {
        let slots = self.slots_mut(category);
        (slot < slots.len()).then(|| slots.remove(slot))
    }

    pub fn item_at(&self, category: ItemCategory, slot: usize) -> Option<&Item> {
        self.slots(category).get(slot)
    }

    pub fn is_full(&self, category: ItemCategory) -> bool {
        self.slots(category).len() >= Self::capacity(category)
    }

    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.weapons
            .iter()
            .chain(self.equipment.iter())
            .chain(self.relics.iter())
    }

    pub fn weapons(&self) -> &[Item] {
        &self.weapons
    }

    pub fn equipment(&self) -> &[Item] {
        &self.equipment
    }

    pub fn relics(&self) -> &[Item] {
        &self.relics
    }

    pub fn holds_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|i| i.kind == ItemKind::Weapon(kind))
    }

    /// Equipped copies of Quicks
    pub fn quicks_count(&self) -> usize {
        self.equipment
            .iter()
            .filter(|i| i.kind == ItemKind::Equipment(EquipmentKind::Quicks))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_until_full() {
        let mut inv = Inventory::new();
        for _ in 0..RELIC_SLOTS {
            inv.add_item(Item::relic(RelicKind::PaperCrown)).unwrap();
        }
        assert!(inv.is_full(ItemCategory::Relic));
        assert_eq!(
            inv.add_item(Item::relic(RelicKind::PaperCrown)),
            Err(InventoryError::SlotsFull(ItemCategory::Relic))
        );
        assert_eq!(inv.relics().len(), RELIC_SLOTS);
        // Other sections are independent
        assert!(inv.add_item(Item::weapon(WeaponKind::NinjaStars)).is_ok());
    }

    #[test]
    fn test_remove_and_item_at() {
        let mut inv = Inventory::new();
        inv.add_item(Item::weapon(WeaponKind::NinjaStars)).unwrap();
        inv.add_item(Item::weapon(WeaponKind::WizardConfetti)).unwrap();

        assert_eq!(
            inv.item_at(ItemCategory::Weapon, 1).map(|i| i.name.as_str()),
            Some("Wizard Confetti")
        );
        assert!(inv.item_at(ItemCategory::Weapon, 2).is_none());
        assert!(inv.remove_item(ItemCategory::Weapon, 5).is_none());

        let removed = inv.remove_item(ItemCategory::Weapon, 0).unwrap();
        assert_eq!(removed.kind, ItemKind::Weapon(WeaponKind::NinjaStars));
        assert!(!inv.holds_weapon(WeaponKind::NinjaStars));
        assert_eq!(inv.all_items().count(), 1);
    }

    #[test]
    fn test_quicks_count() {
        let mut inv = Inventory::new();
        inv.add_item(Item::equipment(EquipmentKind::Quicks)).unwrap();
        inv.add_item(Item::equipment(EquipmentKind::Quicks)).unwrap();
        assert_eq!(inv.quicks_count(), 2);
    }
}
