// SPDX-License-Identifier: GPL-3.0
// disk2_card_manager.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use crate::card::{Card, CardError, CardType, DiskController, Drive, NUM_DRIVES};

use super::{NUM_SLOTS, SLOT6};

/// This struct is a borrowed view over the slot bus presenting every installed
/// Disk II card as one logical unit. It holds no state of its own, so it is
/// simply made again from the bus whenever it is needed.
///
/// Operations come in three flavours: broadcasts (`reset`, `set_enhance_disk`,
/// `destroy`, `update_drive_state`) reach every card in ascending slot order,
/// `is_condition_for_full_speed` is true if any card says so, and
/// `get_enhance_disk` reads the first card only.
pub struct Disk2CardManager<'a> {
    slots: &'a mut [Box<dyn Card>; NUM_SLOTS],
}

impl<'a> Disk2CardManager<'a> {

    /// Creates a new view over the supplied slots.
    pub fn new(slots: &'a mut [Box<dyn Card>; NUM_SLOTS]) -> Self {
        Disk2CardManager {
            slots,
        }
    }

    /// Iterates over the Disk II cards in ascending slot order.
    fn disk_controllers(&self) -> impl Iterator<Item = &dyn DiskController> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, card)| card.card_type() == CardType::Disk2)
            .map(|(slot, card)| match card.as_disk_controller() {
                Some(disk_controller) => disk_controller,
                None => panic!("slot {} is tagged {} but is not a disk controller", slot, CardType::Disk2),
            })
    }

    /// Mutable version of `disk_controllers`.
    fn disk_controllers_mut(&mut self) -> impl Iterator<Item = &mut dyn DiskController> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, card)| card.card_type() == CardType::Disk2)
            .map(|(slot, card)| as_disk_controller_mut(slot, card.as_mut()))
    }

    /// Returns the number of Disk II cards installed.
    pub fn count(&self) -> usize {
        self.disk_controllers().count()
    }

    /// Returns true if any card is in a state where the emulator may run at full
    /// speed.
    pub fn is_condition_for_full_speed(&self) -> bool {
        self.disk_controllers().any(|disk_controller| disk_controller.is_condition_for_full_speed())
    }

    /// Advances every card's drive mechanics by the supplied number of cycles. This
    /// is called every time slice, so it must stay allocation free.
    pub fn update_drive_state(&mut self, cycles: u32) {

        for disk_controller in self.disk_controllers_mut() {
            disk_controller.update_drive_state(cycles);
        }
    }

    /// Resets every card.
    pub fn reset(&mut self, power_cycle: bool) {

        for disk_controller in self.disk_controllers_mut() {
            disk_controller.reset(power_cycle);
        }
    }

    /// Returns the enhanced disk setting of the first card, or false if there are
    /// no cards.
    ///
    /// All cards are assumed to share the same setting (they do if it is only ever
    /// changed through `set_enhance_disk`), but nothing checks that.
    pub fn get_enhance_disk(&self) -> bool {
        self.disk_controllers()
            .next()
            .is_some_and(|disk_controller| disk_controller.get_enhance_disk())
    }

    /// Sets the enhanced disk setting on every card.
    pub fn set_enhance_disk(&mut self, enhance_disk: bool) {

        for disk_controller in self.disk_controllers_mut() {
            disk_controller.set_enhance_disk(enhance_disk);
        }
    }

    /// Reloads the last disk images of the card in slot 6 (drive 1, then drive 2),
    /// returning each outcome. Cards in other slots are left alone. `None` means
    /// slot 6 does not hold a Disk II card.
    pub fn load_last_disk_images(&mut self) -> Option<[Result<(), CardError>; NUM_DRIVES]> {

        // Only the boot slot is considered. Disk II cards elsewhere keep their
        // drives empty until something loads them explicitly.
        let card = self.slots[SLOT6].as_mut();
        if card.card_type() != CardType::Disk2 {
            return None;
        }
        let disk_controller = as_disk_controller_mut(SLOT6, card);

        Some(Drive::ALL.map(|drive| disk_controller.load_last_disk_image(drive)))
    }

    /// Destroys (ejects the disks of) every card. The cards stay installed.
    pub fn destroy(&mut self) {

        for disk_controller in self.disk_controllers_mut() {
            disk_controller.destroy();
        }
    }
}

/// Takes the disk controller capability of a card tagged `Disk2`. A card with
/// that tag which lacks the capability is a programming error.
fn as_disk_controller_mut(slot: usize, card: &mut dyn Card) -> &mut dyn DiskController {
    match card.as_disk_controller_mut() {
        Some(disk_controller) => disk_controller,
        None => panic!("slot {} is tagged {} but is not a disk controller", slot, CardType::Disk2),
    }
}
