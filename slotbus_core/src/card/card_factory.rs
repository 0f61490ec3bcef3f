// SPDX-License-Identifier: GPL-3.0
// card_factory.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::PathBuf;

use crate::slot_bus::NUM_SLOTS;

use super::{
    Card,
    CardError,
    CardLocation,
    CardType,
    DiskController,
    Drive,
    NUM_DRIVES,
    disk2_interface_card::Disk2InterfaceCard,
    dummy_card::DummyCard,
    mouse_interface_card::MouseInterfaceCard,
    super_serial_card::SuperSerialCard,
};

/// This trait provides an implementation-opaque way for the slot bus to
/// construct cards. The bus never asks a factory for an `Empty` card, and it
/// has already checked that the type suits the location.
pub trait CardFactory {

    /// Implementations must construct a card of the supplied type for the
    /// supplied location, or explain why they could not.
    fn create_card(
        &mut self,
        card_type: CardType,
        location: CardLocation
    ) -> Result<Box<dyn Card>, CardError>;
}

/// This struct is the factory used by a real session. It builds the concrete
/// card models and seeds Disk II cards with the session's disk settings.
pub struct DefaultCardFactory {

    // Enhanced disk access setting given to new Disk II cards.
    enhance_disk: bool,

    // Last image paths given to new Disk II cards, per slot and drive.
    last_disk_images: [[Option<PathBuf>; NUM_DRIVES]; NUM_SLOTS],
}

impl DefaultCardFactory {

    /// Creates a new factory with enhanced disk access on and no image history.
    pub fn new() -> Self {
        DefaultCardFactory {
            enhance_disk: true,
            last_disk_images: Default::default(),
        }
    }

    /// Sets the enhanced disk access setting for Disk II cards made from now on.
    pub fn set_enhance_disk(&mut self, enhance_disk: bool) {
        self.enhance_disk = enhance_disk;
    }

    /// Records the last image for a drive of a Disk II card in the supplied slot.
    pub fn set_last_disk_image(&mut self, slot: usize, drive: Drive, path: PathBuf) {
        self.last_disk_images[slot][drive.index()] = Some(path);
    }

    fn create_disk2_card(&self, slot: usize) -> Disk2InterfaceCard {

        let mut card = Disk2InterfaceCard::new(slot);
        card.set_enhance_disk(self.enhance_disk);

        for drive in Drive::ALL {
            if let Some(path) = &self.last_disk_images[slot][drive.index()] {
                card.set_last_disk_image(drive, path.clone());
            }
        }

        card
    }
}

impl CardFactory for DefaultCardFactory {

    fn create_card(
        &mut self,
        card_type: CardType,
        location: CardLocation
    ) -> Result<Box<dyn Card>, CardError> {

        let card: Box<dyn Card> = match (card_type, location) {
            (CardType::Disk2, CardLocation::Slot(slot)) => Box::new(self.create_disk2_card(slot)),
            (CardType::MouseInterface, CardLocation::Slot(slot)) => Box::new(MouseInterfaceCard::new(slot)),
            (CardType::Ssc, CardLocation::Slot(_)) => Box::new(SuperSerialCard::new()),
            (CardType::Empty, _) | (CardType::Disk2 | CardType::MouseInterface | CardType::Ssc, CardLocation::Aux) => {
                return Err(CardError::WrongLocation { card_type, location });
            },
            (other, _) => Box::new(DummyCard::new(other)),
        };

        Ok(card)
    }
}
