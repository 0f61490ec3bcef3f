// SPDX-License-Identifier: GPL-3.0
// slot_bus.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use slotbus_utility::decode_slot_io;

use crate::{
    card::{
        Card,
        CardError,
        CardLocation,
        CardType,
        DiskController,
        MouseInterface,
        SerialController,
        card_factory::CardFactory,
        empty_card::EmptyCard,
    },
    config::BusConfig,
};

/// This module contains the view presenting every Disk II card as one unit.
pub mod disk2_card_manager;

pub use disk2_card_manager::Disk2CardManager;

/// Number of numbered slots on the backplane.
pub const NUM_SLOTS: usize = 8;

/// The slot conventionally holding the boot disk controller.
pub const SLOT6: usize = 6;

/// What each numbered slot holds on a fresh machine.
pub const DEFAULT_LAYOUT: [CardType; NUM_SLOTS] = [
    CardType::Empty,
    CardType::GenericPrinter,
    CardType::Ssc,
    CardType::Uthernet,
    CardType::Empty,
    CardType::Empty,
    CardType::Disk2,
    CardType::Empty,
];

/// What the aux slot holds on a fresh machine (//e and above).
pub const DEFAULT_AUX: CardType = CardType::Extended80Col;

/// This struct models the expansion backplane. It is the sole owner of every
/// card, including the aux slot card, and keeps slot indices of the (at most
/// one) mouse card and (at most one) serial card so that frontends can reach
/// them without scanning.
pub struct SlotBus {

    // Numbered slots and the aux slot. Never null, empty slots hold an EmptyCard.
    slots: [Box<dyn Card>; NUM_SLOTS],
    aux: Box<dyn Card>,

    // Constructs every card we insert.
    factory: Box<dyn CardFactory>,

    // Fast path indices. Only ever set or cleared inside insert/remove.
    mouse_slot: Option<usize>,
    ssc_slot: Option<usize>,
}

/// Implementation functions for the slot bus.
impl SlotBus {

    /// Creates a new slot bus with the default layout. A card the factory fails to
    /// build is logged and its slot left empty.
    pub fn new(factory: Box<dyn CardFactory>) -> Self {

        let mut slot_bus = SlotBus::unpopulated(factory);

        for (slot, card_type) in DEFAULT_LAYOUT.into_iter().enumerate() {
            if let Err(err) = slot_bus.insert(slot, card_type) {
                log::warn!("Default layout: slot {} left empty: {}", slot, err);
            }
        }

        if let Err(err) = slot_bus.insert_aux(DEFAULT_AUX) {
            log::warn!("Default layout: aux slot left empty: {}", err);
        }

        slot_bus
    }

    /// Creates a new slot bus laid out as the configuration says, failing on the
    /// first card that cannot be built.
    pub fn from_config(factory: Box<dyn CardFactory>, config: &BusConfig) -> Result<Self, CardError> {

        let mut slot_bus = SlotBus::unpopulated(factory);

        for (slot, card_type) in config.slots.into_iter().enumerate() {
            slot_bus.insert(slot, card_type)?;
        }
        slot_bus.insert_aux(config.aux)?;

        Ok(slot_bus)
    }

    /// Creates a slot bus with every slot empty.
    fn unpopulated(factory: Box<dyn CardFactory>) -> Self {
        SlotBus {
            slots: std::array::from_fn(|_| Box::new(EmptyCard::new()) as Box<dyn Card>),
            aux: Box::new(EmptyCard::new()),
            factory,
            mouse_slot: None,
            ssc_slot: None,
        }
    }

    /// Inserts a new card of the supplied type, destroying whatever the slot held
    /// first. On failure the slot is left empty and the error returned.
    pub fn insert(&mut self, slot: usize, card_type: CardType) -> Result<(), CardError> {

        assert_slot_in_range(slot);

        self.remove_internal(slot);

        if card_type == CardType::Empty {
            return Ok(());
        }

        let location = CardLocation::Slot(slot);
        if card_type.is_aux_only() {
            return Err(CardError::WrongLocation { card_type, location });
        }

        // Only support one mouse card and one SSC.
        let existing = match card_type {
            CardType::MouseInterface => self.mouse_slot,
            CardType::Ssc => self.ssc_slot,
            _ => None,
        };
        if let Some(existing_slot) = existing {
            log::warn!("Slot {}: refusing second {} card (already in slot {})", slot, card_type, existing_slot);
            return Err(CardError::CapabilityAlreadyInstalled { card_type, existing_slot });
        }

        let card = self.factory.create_card(card_type, location)?;
        assert_eq!(
            card.card_type(),
            card_type,
            "card factory built the wrong card for slot {}",
            slot
        );

        self.slots[slot] = card;
        match card_type {
            CardType::MouseInterface => self.mouse_slot = Some(slot),
            CardType::Ssc => self.ssc_slot = Some(slot),
            _ => (),
        }

        log::debug!("Slot {}: inserted {}", slot, card_type);

        Ok(())
    }

    /// Destroys the card in the slot, leaving it empty. Removing from an empty
    /// slot does nothing.
    pub fn remove(&mut self, slot: usize) {

        assert_slot_in_range(slot);
        self.remove_internal(slot);
    }

    fn remove_internal(&mut self, slot: usize) {

        let card_type = self.slots[slot].card_type();
        if card_type == CardType::Empty {
            return;
        }

        // Clear the fast path before the card goes.
        if self.mouse_slot == Some(slot) {
            self.mouse_slot = None;
        }
        if self.ssc_slot == Some(slot) {
            self.ssc_slot = None;
        }

        let mut card = std::mem::replace(&mut self.slots[slot], Box::new(EmptyCard::new()));
        card.destroy();

        log::debug!("Slot {}: removed {}", slot, card_type);
    }

    /// Inserts a new card into the aux slot, destroying whatever it held first.
    pub fn insert_aux(&mut self, card_type: CardType) -> Result<(), CardError> {

        self.remove_aux();

        if card_type == CardType::Empty {
            return Ok(());
        }

        if !card_type.is_aux_compatible() {
            return Err(CardError::WrongLocation { card_type, location: CardLocation::Aux });
        }

        let card = self.factory.create_card(card_type, CardLocation::Aux)?;
        assert_eq!(card.card_type(), card_type, "card factory built the wrong card for the aux slot");
        self.aux = card;

        log::debug!("Aux slot: inserted {}", card_type);

        Ok(())
    }

    /// Destroys the aux slot card, leaving it empty.
    pub fn remove_aux(&mut self) {

        let card_type = self.aux.card_type();
        if card_type == CardType::Empty {
            return;
        }

        let mut card = std::mem::replace(&mut self.aux, Box::new(EmptyCard::new()));
        card.destroy();

        log::debug!("Aux slot: removed {}", card_type);
    }

    /// Returns the type of the card in the slot.
    pub fn query_slot(&self, slot: usize) -> CardType {

        assert_slot_in_range(slot);
        self.slots[slot].card_type()
    }

    /// Returns the type of the card in the aux slot.
    pub fn query_aux(&self) -> CardType {
        self.aux.card_type()
    }

    /// Returns the card in the slot. The caller must already know the slot holds a
    /// card with a capability interface.
    pub fn get_card(&self, slot: usize) -> &dyn Card {

        assert_capability_card(self.query_slot(slot), slot);
        self.slots[slot].as_ref()
    }

    /// Mutable version of `get_card`, with the same precondition.
    pub fn get_card_mut(&mut self, slot: usize) -> &mut dyn Card {

        assert_capability_card(self.query_slot(slot), slot);
        self.slots[slot].as_mut()
    }

    /// Returns the disk controller in the slot. Asking for one from a slot that
    /// does not hold a disk controller is a programming error.
    pub fn disk_controller_mut(&mut self, slot: usize) -> &mut dyn DiskController {

        match self.get_card_mut(slot).as_disk_controller_mut() {
            Some(disk_controller) => disk_controller,
            None => panic!("slot {} does not hold a disk controller", slot),
        }
    }

    /// Returns a view applying machine-wide operations to every Disk II card.
    pub fn disk2_card_mgr(&mut self) -> Disk2CardManager<'_> {
        Disk2CardManager::new(&mut self.slots)
    }

    /// Returns the mouse card, if one is installed.
    pub fn mouse_card(&self) -> Option<&dyn MouseInterface> {

        let slot = self.mouse_slot?;
        self.slots[slot].as_mouse_interface()
    }

    /// Mutable version of `mouse_card`.
    pub fn mouse_card_mut(&mut self) -> Option<&mut dyn MouseInterface> {

        let slot = self.mouse_slot?;
        self.slots[slot].as_mouse_interface_mut()
    }

    pub fn is_mouse_card_installed(&self) -> bool {
        self.mouse_slot.is_some()
    }

    /// Returns the serial card, if one is installed.
    pub fn ssc(&self) -> Option<&dyn SerialController> {

        let slot = self.ssc_slot?;
        self.slots[slot].as_serial_controller()
    }

    /// Mutable version of `ssc`.
    pub fn ssc_mut(&mut self) -> Option<&mut dyn SerialController> {

        let slot = self.ssc_slot?;
        self.slots[slot].as_serial_controller_mut()
    }

    pub fn is_ssc_installed(&self) -> bool {
        self.ssc_slot.is_some()
    }

    /// Routes a read of the slot soft switch area ($C080-$C0FF) to the card owning
    /// the address. `None` is returned for any other address.
    pub fn io_read(&mut self, address: u16) -> Option<u8> {

        let (slot, offset) = decode_slot_io(address)?;
        Some(self.slots[slot].read_io(offset))
    }

    /// Routes a write of the slot soft switch area to the card owning the address,
    /// returning false if the address is outside that area.
    pub fn io_write(&mut self, address: u16, value: u8) -> bool {

        match decode_slot_io(address) {
            Some((slot, offset)) => {
                self.slots[slot].write_io(offset, value);
                true
            },
            None => false,
        }
    }
}

impl Drop for SlotBus {

    /// Destroys every card exactly once.
    fn drop(&mut self) {

        for slot in 0..NUM_SLOTS {
            self.remove_internal(slot);
        }
        self.remove_aux();
    }
}

fn assert_slot_in_range(slot: usize) {
    assert!(slot < NUM_SLOTS, "slot {} out of range (0-{})", slot, NUM_SLOTS - 1);
}

fn assert_capability_card(card_type: CardType, slot: usize) {
    assert!(
        card_type.has_capability(),
        "slot {} holds {}, which has no capability interface",
        slot,
        card_type
    );
}

#[cfg(test)]
mod tests;
