// SPDX-License-Identifier: GPL-3.0
// config.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::PathBuf;

use crate::{
    card::{CardError, CardType, Drive, NUM_DRIVES},
    slot_bus::{DEFAULT_AUX, DEFAULT_LAYOUT, NUM_SLOTS},
};

/// This struct holds everything needed to lay out the backplane for a session:
/// which card sits in each slot, the aux slot card, the enhanced disk setting
/// and the last images for the slot 6 drives.
#[derive(Clone, Debug, PartialEq)]
pub struct BusConfig {
    pub slots: [CardType; NUM_SLOTS],
    pub aux: CardType,
    pub enhance_disk: bool,
    pub disk_images: [Option<PathBuf>; NUM_DRIVES],
}

impl BusConfig {

    /// Creates a new configuration matching the default machine.
    pub fn new() -> Self {
        BusConfig {
            slots: DEFAULT_LAYOUT,
            aux: DEFAULT_AUX,
            enhance_disk: true,
            disk_images: [None, None],
        }
    }

    /// Applies an override of the form `slotN=type` or `aux=type`, for example
    /// `slot4=mouse` or `aux=ramworks3`.
    pub fn apply_override(&mut self, setting: &str) -> Result<(), CardError> {

        let invalid = || CardError::InvalidSetting(setting.to_string());

        let (key, value) = setting.split_once('=').ok_or_else(invalid)?;
        let key = key.trim().to_ascii_lowercase();
        let card_type: CardType = value.parse()?;

        if key == "aux" {
            self.aux = card_type;
            return Ok(());
        }

        let slot: usize = key
            .strip_prefix("slot")
            .and_then(|number| number.parse().ok())
            .filter(|slot| *slot < NUM_SLOTS)
            .ok_or_else(invalid)?;
        self.slots[slot] = card_type;

        Ok(())
    }

    /// Sets the last image for one of the slot 6 drives.
    pub fn set_disk_image(&mut self, drive: Drive, path: PathBuf) {
        self.disk_images[drive.index()] = Some(path);
    }
}
