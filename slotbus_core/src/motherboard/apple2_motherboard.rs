// SPDX-License-Identifier: GPL-3.0
// apple2_motherboard.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::Path;

use super::Motherboard;
use crate::{
    card::{Card, CardError, Drive, card_factory::{CardFactory, DefaultCardFactory}},
    config::BusConfig,
    slot_bus::{SLOT6, SlotBus},
};

/// This struct models the Apple II main board as far as the peripherals are
/// concerned: it owns the slot bus for the session and keeps track of
/// emulated time and of whether the machine may currently run unthrottled.
pub struct Apple2Motherboard {

    // The backplane and everything in it.
    slot_bus: SlotBus,

    // Session settings.
    enhance_disk: bool,

    // Timing.
    total_cycles: u64,
    full_speed: bool,
}

/// Implementation functions for the motherboard itself.
impl Apple2Motherboard {

    /// Creates a new motherboard with the backplane laid out as configured.
    pub fn new(config: &BusConfig) -> Result<Self, CardError> {

        let mut factory = DefaultCardFactory::new();
        factory.set_enhance_disk(config.enhance_disk);

        for drive in Drive::ALL {
            if let Some(path) = &config.disk_images[drive.index()] {
                factory.set_last_disk_image(SLOT6, drive, path.clone());
            }
        }

        Apple2Motherboard::with_factory(Box::new(factory), config)
    }

    /// Creates a new motherboard whose cards come from the supplied factory.
    pub fn with_factory(factory: Box<dyn CardFactory>, config: &BusConfig) -> Result<Self, CardError> {

        Ok(Apple2Motherboard {
            slot_bus: SlotBus::from_config(factory, config)?,
            enhance_disk: config.enhance_disk,
            total_cycles: 0,
            full_speed: false,
        })
    }

    /// Loads an image into a drive of the disk controller in the supplied slot,
    /// handing back the card's verdict.
    pub fn insert_disk(&mut self, slot: usize, drive: Drive, path: &Path) -> Result<(), CardError> {
        self.slot_bus.disk_controller_mut(slot).load_image(drive, path)
    }
}

/// Implementation functions to be called from anything that understands what
/// a Motherboard object is.
impl Motherboard for Apple2Motherboard {

    fn power_on(&mut self) {

        log::info!("Powering on");

        self.total_cycles = 0;
        self.full_speed = false;

        let mut disk2_card_mgr = self.slot_bus.disk2_card_mgr();
        disk2_card_mgr.reset(true);
        disk2_card_mgr.set_enhance_disk(self.enhance_disk);

        // A drive with no history is normal, anything else is worth a warning.
        if let Some(results) = disk2_card_mgr.load_last_disk_images() {
            for (drive, result) in Drive::ALL.into_iter().zip(results) {
                match result {
                    Ok(()) | Err(CardError::NoLastImage { .. }) => (),
                    Err(err) => log::warn!("Slot {} {}: {}", SLOT6, drive, err),
                }
            }
        }
    }

    fn reset(&mut self, power_cycle: bool) {

        log::info!("{} reset", if power_cycle { "Cold" } else { "Warm" });

        self.slot_bus.disk2_card_mgr().reset(power_cycle);

        if let Some(mouse_card) = self.slot_bus.mouse_card_mut() {
            mouse_card.reset(power_cycle);
        }

        self.full_speed = false;
    }

    fn execute_cycles(&mut self, cycles: u32) {

        self.total_cycles += cycles as u64;

        let mut disk2_card_mgr = self.slot_bus.disk2_card_mgr();
        disk2_card_mgr.update_drive_state(cycles);
        self.full_speed = disk2_card_mgr.is_condition_for_full_speed();
    }

    fn shutdown(&mut self) {

        log::info!("Shutting down after {} cycles", self.total_cycles);

        if let Some(mouse_card) = self.slot_bus.mouse_card_mut() {
            mouse_card.reset(false);
        }

        self.slot_bus.disk2_card_mgr().destroy();
        self.full_speed = false;
    }

    fn is_full_speed(&self) -> bool {
        self.full_speed
    }

    fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    fn slot_bus(&self) -> &SlotBus {
        &self.slot_bus
    }

    fn slot_bus_mut(&mut self) -> &mut SlotBus {
        &mut self.slot_bus
    }
}
