//! Inventory and equipment system.
//!
//! Twenty general slots plus six equip slots. Every mutating operation is
//! all-or-nothing: on `Err` the inventory is exactly as it was.

use serde::{Deserialize, Serialize};

use crate::combat::weapons::{Rarity, Weapon};
use crate::constants::INVENTORY_CAPACITY;
use crate::error::InventoryError;

/// Equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Shield,
    Boots,
    Gloves,
    Helmet,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 6] = [
        EquipSlot::Weapon,
        EquipSlot::Armor,
        EquipSlot::Shield,
        EquipSlot::Boots,
        EquipSlot::Gloves,
        EquipSlot::Helmet,
    ];
}

/// Usable one-shot items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumable {
    HealingPotion { heal: i32 },
    Food { heal: i32 },
    /// Clears poison and burning
    Antidote,
    /// Identifies every carried item
    IdentifyScroll,
}

/// Wearable non-weapon gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub slot: EquipSlot,
    pub defense: i32,
    pub dodge: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Consumable(Consumable),
    Valuable { value: u32 },
    CraftingMaterial,
    Key { key_id: u32 },
    Weapon(Weapon),
    Gear(Gear),
}

/// An item stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub rarity: Rarity,
    pub quantity: u32,
    /// Unidentified items hide their name and effect
    pub identified: bool,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            kind,
            rarity,
            quantity: 1,
            identified: true,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn unidentified(mut self) -> Self {
        self.identified = false;
        self
    }

    pub fn healing_potion() -> Self {
        Self::new(
            "Health Potion",
            ItemKind::Consumable(Consumable::HealingPotion { heal: 25 }),
            Rarity::Common,
        )
    }

    pub fn major_healing_potion() -> Self {
        Self::new(
            "Major Health Potion",
            ItemKind::Consumable(Consumable::HealingPotion { heal: 50 }),
            Rarity::Uncommon,
        )
    }

    pub fn food(name: &str, heal: i32) -> Self {
        Self::new(name, ItemKind::Consumable(Consumable::Food { heal }), Rarity::Common)
    }

    pub fn antidote() -> Self {
        Self::new("Antidote", ItemKind::Consumable(Consumable::Antidote), Rarity::Common)
    }

    pub fn identify_scroll() -> Self {
        Self::new(
            "Scroll of Identification",
            ItemKind::Consumable(Consumable::IdentifyScroll),
            Rarity::Uncommon,
        )
    }

    pub fn gem(name: &str, value: u32, rarity: Rarity) -> Self {
        Self::new(name, ItemKind::Valuable { value }, rarity)
    }

    pub fn material(name: &str) -> Self {
        Self::new(name, ItemKind::CraftingMaterial, Rarity::Common)
    }

    pub fn key(key_id: u32) -> Self {
        Self::new("Rusty Key", ItemKind::Key { key_id }, Rarity::Common)
    }

    pub fn weapon(weapon: Weapon) -> Self {
        let rarity = weapon.rarity;
        Self::new(weapon.name.clone(), ItemKind::Weapon(weapon), rarity)
    }

    pub fn gear(name: &str, gear: Gear, rarity: Rarity) -> Self {
        Self::new(name, ItemKind::Gear(gear), rarity)
    }

    /// Largest quantity one slot may hold
    pub fn stack_cap(&self) -> u32 {
        match &self.kind {
            ItemKind::Consumable(Consumable::HealingPotion { .. } | Consumable::Antidote) => 10,
            ItemKind::Consumable(Consumable::Food { .. } | Consumable::IdentifyScroll) => 5,
            ItemKind::Valuable { .. } => 10,
            ItemKind::CraftingMaterial => 20,
            ItemKind::Key { .. } | ItemKind::Weapon(_) | ItemKind::Gear(_) => 1,
        }
    }

    pub fn is_stackable(&self) -> bool {
        self.stack_cap() > 1
    }

    pub fn can_stack_with(&self, other: &Item) -> bool {
        self.is_stackable()
            && self.name == other.name
            && self.kind == other.kind
            && self.identified == other.identified
    }

    /// Slot this item can be equipped into, if any
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match &self.kind {
            ItemKind::Weapon(_) => Some(EquipSlot::Weapon),
            ItemKind::Gear(gear) => Some(gear.slot),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        let name = if self.identified {
            self.name.as_str()
        } else {
            match &self.kind {
                ItemKind::Consumable(Consumable::IdentifyScroll) => "Unknown Scroll",
                ItemKind::Consumable(_) => "Unknown Potion",
                ItemKind::Weapon(_) => "Unidentified Weapon",
                ItemKind::Gear(_) => "Unidentified Gear",
                _ => "Mysterious Item",
            }
        };
        if self.quantity > 1 {
            format!("{name} ({})", self.quantity)
        } else {
            name.to_string()
        }
    }

    pub fn gold_value(&self) -> u32 {
        let each = match &self.kind {
            ItemKind::Consumable(Consumable::HealingPotion { heal }) => *heal as u32 / 2 + 3,
            ItemKind::Consumable(Consumable::Food { heal }) => (*heal as u32 / 3).max(1),
            ItemKind::Consumable(Consumable::Antidote) => 10,
            ItemKind::Consumable(Consumable::IdentifyScroll) => 25,
            ItemKind::Valuable { value } => *value,
            ItemKind::CraftingMaterial => 2,
            ItemKind::Key { .. } => 10,
            ItemKind::Weapon(w) => w.gold_value(),
            ItemKind::Gear(g) => (20 + (g.defense.max(0) + g.dodge.max(0)) as u32 * 10)
                * self.rarity.value_multiplier(),
        };
        each * self.quantity
    }
}

/// Currently equipped items, one per slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub shield: Option<Item>,
    pub boots: Option<Item>,
    pub gloves: Option<Item>,
    pub helmet: Option<Item>,
}

impl Equipment {
    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Item> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Shield => &mut self.shield,
            EquipSlot::Boots => &mut self.boots,
            EquipSlot::Gloves => &mut self.gloves,
            EquipSlot::Helmet => &mut self.helmet,
        }
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Shield => self.shield.as_ref(),
            EquipSlot::Boots => self.boots.as_ref(),
            EquipSlot::Gloves => self.gloves.as_ref(),
            EquipSlot::Helmet => self.helmet.as_ref(),
        }
    }

    /// Put `item` into `slot`, returning whatever was there.
    pub fn replace(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slot_mut(slot).replace(item)
    }

    pub fn take(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        match self.weapon.as_ref().map(|i| &i.kind) {
            Some(ItemKind::Weapon(w)) => Some(w),
            _ => None,
        }
    }

    pub fn weapon_mut(&mut self) -> Option<&mut Weapon> {
        match self.weapon.as_mut().map(|i| &mut i.kind) {
            Some(ItemKind::Weapon(w)) => Some(w),
            _ => None,
        }
    }

    fn gear(&self) -> impl Iterator<Item = &Gear> {
        [&self.armor, &self.shield, &self.boots, &self.gloves, &self.helmet]
            .into_iter()
            .flatten()
            .filter_map(|item| match &item.kind {
                ItemKind::Gear(gear) => Some(gear),
                _ => None,
            })
    }

    /// Total defense from all equipped gear
    pub fn total_defense(&self) -> i32 {
        self.gear().map(|g| g.defense).sum()
    }

    /// Total dodge from all equipped gear
    pub fn total_dodge(&self) -> i32 {
        self.gear().map(|g| g.dodge).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        EquipSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|item| (slot, item)))
    }
}

/// Player inventory: general slots plus equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<Item>>,
    pub equipment: Equipment,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            equipment: Equipment::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Gold worth of everything carried and equipped
    pub fn total_value(&self) -> u32 {
        self.items()
            .map(|(_, item)| item.gold_value())
            .chain(self.equipment.iter().map(|(_, item)| item.gold_value()))
            .sum()
    }

    /// Occupied slots with their indices
    pub fn items(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (i, item)))
    }

    /// Count non-empty slots
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn free_slots(&self) -> usize {
        self.capacity() - self.used_slots()
    }

    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    pub fn find(&self, pred: impl Fn(&Item) -> bool) -> Option<usize> {
        self.items().find(|(_, item)| pred(item)).map(|(i, _)| i)
    }

    /// Add an item, merging into existing stacks first. Fails without
    /// changing anything if the whole quantity cannot be stored.
    pub fn add(&mut self, item: Item) -> Result<(), InventoryError> {
        let cap = item.stack_cap();
        let mut remaining = item.quantity.max(1);

        let mut merges: Vec<(usize, u32)> = Vec::new();
        if item.is_stackable() {
            for (i, existing) in self.items() {
                if remaining == 0 {
                    break;
                }
                if existing.can_stack_with(&item) && existing.quantity < cap {
                    let moved = (cap - existing.quantity).min(remaining);
                    merges.push((i, moved));
                    remaining -= moved;
                }
            }
        }

        let new_stacks = remaining.div_ceil(cap) as usize;
        if new_stacks > self.free_slots() {
            return Err(InventoryError::Capacity {
                capacity: self.capacity(),
            });
        }

        for (i, moved) in merges {
            if let Some(existing) = self.slots[i].as_mut() {
                existing.quantity += moved;
            }
        }
        let mut free = self
            .slots
            .iter_mut()
            .filter(|slot| slot.is_none());
        while remaining > 0 {
            let chunk = remaining.min(cap);
            if let Some(slot) = free.next() {
                let mut stack = item.clone();
                stack.quantity = chunk;
                *slot = Some(stack);
            }
            remaining -= chunk;
        }
        Ok(())
    }

    /// Remove the whole stack at `index`
    pub fn remove(&mut self, index: usize) -> Result<Item, InventoryError> {
        self.slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(InventoryError::EmptySlot { index })
    }

    /// Split one unit off the stack at `index`
    pub fn take_one(&mut self, index: usize) -> Result<Item, InventoryError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::EmptySlot { index })?;
        let item = slot.as_mut().ok_or(InventoryError::EmptySlot { index })?;
        if item.quantity > 1 {
            item.quantity -= 1;
            let mut one = item.clone();
            one.quantity = 1;
            Ok(one)
        } else {
            slot.take().ok_or(InventoryError::EmptySlot { index })
        }
    }

    /// Equip the item at `index` into `slot`. Whatever was equipped moves
    /// into the freed inventory slot, so this never fails on capacity.
    pub fn equip(&mut self, index: usize, slot: EquipSlot) -> Result<(), InventoryError> {
        let item = self.get(index).ok_or(InventoryError::EmptySlot { index })?;
        match item.equip_slot() {
            None => {
                return Err(InventoryError::NotEquippable {
                    item: item.display_name(),
                })
            }
            Some(target) if target != slot => {
                return Err(InventoryError::SlotMismatch {
                    item: item.display_name(),
                    target: slot,
                })
            }
            Some(_) => {}
        }
        let mut item = self.remove(index)?;
        item.identified = true;
        let displaced = self.equipment.replace(slot, item);
        self.slots[index] = displaced;
        Ok(())
    }

    /// Move the equipped item back into the first free slot
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<(), InventoryError> {
        if self.equipment.get(slot).is_none() {
            return Err(InventoryError::NothingEquipped { slot });
        }
        let free = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(InventoryError::Capacity {
                capacity: self.capacity(),
            })?;
        self.slots[free] = self.equipment.take(slot);
        Ok(())
    }

    /// Returns how many stacks changed
    pub fn identify_all(&mut self) -> usize {
        let mut count = 0;
        for item in self.slots.iter_mut().flatten() {
            if !item.identified {
                item.identified = true;
                count += 1;
            }
        }
        count
    }
}
