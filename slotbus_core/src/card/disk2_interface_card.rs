// SPDX-License-Identifier: GPL-3.0
// disk2_interface_card.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::{Path, PathBuf};

use slotbus_utility::CountDown;

use super::{Card, CardError, CardType, DiskController, Drive, NUM_DRIVES};
use floppy_drive::FloppyDrive;

pub use disk_image::{DiskImage, ImageFormat};
pub use floppy_drive::DriveState;

/// This module contains the in-memory representation of a disk image.
mod disk_image;

/// This module contains the model of a single drive mechanism.
mod floppy_drive;

/// Cycles a drive keeps spinning after the motor is switched off.
pub const SPINNING_CYCLES: u32 = 20000 * 64;

/// Cycles the write light stays lit after the last write.
pub const WRITELIGHT_CYCLES: u32 = 20000 * 64;

/// Cycles a drive needs to come up to speed from rest.
pub const SPIN_UP_CYCLES: u32 = 300_000;

/// This struct models the Disk II interface card: two drives, the stepper
/// magnets, the motor and the read/write mode switches.
pub struct Disk2InterfaceCard {

    // The slot this card was constructed for.
    slot: usize,

    // The attached drives, and which one is selected.
    drives: [FloppyDrive; NUM_DRIVES],
    current_drive: usize,

    // Switch state.
    motor_on: bool,
    write_mode: bool,
    magnet_states: u8,

    // The data latch, as last read or written.
    latch: u8,

    // Accelerated disk access setting.
    enhance_disk: bool,
}

/// Implementation functions for the Disk II card itself.
impl Disk2InterfaceCard {

    /// Creates a new Disk II card with both drives empty and stopped.
    pub fn new(slot: usize) -> Self {
        Disk2InterfaceCard {

            slot,

            // Setup drives.
            drives: [FloppyDrive::new(), FloppyDrive::new()],
            current_drive: 0,

            // Setup switches.
            motor_on: false,
            write_mode: false,
            magnet_states: 0,

            latch: 0,

            enhance_disk: true,
        }
    }

    /// Records the path that `load_last_disk_image` should use for the drive.
    pub fn set_last_disk_image(&mut self, drive: Drive, path: PathBuf) {
        self.drives[drive.index()].last_image = Some(path);
    }

    /// Returns the mechanical state of the drive.
    pub fn drive_state(&self, drive: Drive) -> DriveState {

        let index = drive.index();
        self.drives[index].state(self.motor_on && index == self.current_drive)
    }

    /// Returns the whole track the drive's head is over.
    pub fn track(&self, drive: Drive) -> usize {
        self.drives[drive.index()].track()
    }

    /// Returns true if the drive's write light is lit.
    pub fn is_write_light_on(&self, drive: Drive) -> bool {
        self.drives[drive.index()].write_light > 0
    }

    /// Returns the path of the image in the drive, if one is inserted.
    pub fn image_path(&self, drive: Drive) -> Option<&Path> {
        self.drives[drive.index()].image.as_ref().map(DiskImage::path)
    }

    /// Returns true if the motor switch is on.
    pub fn is_motor_on(&self) -> bool {
        self.motor_on
    }

    /// Returns the currently selected drive.
    pub fn current_drive(&self) -> Drive {
        Drive::ALL[self.current_drive]
    }

    /// This function handles the motor on/off switches.
    fn control_motor(&mut self, on: bool) {

        if on && !self.motor_on {
            log::trace!("Slot {}: motor on", self.slot);
        }

        self.motor_on = on;

        // Keep the selected drive spinning for as long as the motor is on, and
        // start the spin-up period if it was at rest.
        if on {
            let drive = &mut self.drives[self.current_drive];
            if drive.spinning == 0 {
                drive.spin_up = SPIN_UP_CYCLES;
            }
            drive.spinning = SPINNING_CYCLES;
        }
    }

    /// This function handles the drive select switches. Deselecting a drive stops
    /// it immediately.
    fn select_drive(&mut self, index: usize) {

        if index == self.current_drive {
            return;
        }

        self.drives[self.current_drive].stop();
        self.current_drive = index;

        if self.motor_on {
            self.control_motor(true);
        }
    }

    /// This function handles the stepper magnet switches.
    fn control_stepper(&mut self, offset: u8) {

        let phase = (offset >> 1) & 3;
        let energised = offset & 1 != 0;

        if energised {
            self.magnet_states |= 1 << phase;
        } else {
            self.magnet_states &= !(1 << phase);
        }

        // The head only moves while the disk is turning.
        let drive = &mut self.drives[self.current_drive];
        if energised && (self.motor_on || drive.spinning > 0) {
            drive.step(phase);
        }
    }

    /// This function performs the action of a soft switch, which happens on both
    /// reads and writes.
    fn access_soft_switch(&mut self, offset: u8) {

        match offset & 0xF {

            // Stepper phases 0-3, off then on.
            0x0..=0x7 => self.control_stepper(offset),

            // Motor off/on.
            0x8 => self.control_motor(false),
            0x9 => self.control_motor(true),

            // Drive select.
            0xA => self.select_drive(0),
            0xB => self.select_drive(1),

            // Shift data into the latch.
            0xC => {
                let powered = self.motor_on;
                let drive = &mut self.drives[self.current_drive];
                if !self.write_mode && drive.state(powered) == DriveState::Active {
                    if let Some(value) = drive.read_next_byte() {
                        self.latch = value;
                    }
                }
            },

            // Read/write mode.
            0xE => self.write_mode = false,
            0xF => self.write_mode = true,

            _ => (),
        }
    }
}

/// Implementation functions to be called from anything that understands what
/// a Card object is.
impl Card for Disk2InterfaceCard {

    fn card_type(&self) -> CardType {
        CardType::Disk2
    }

    /// Returns all switches to their initial state. A power cycle also stops the
    /// drives dead rather than letting them wind down.
    fn reset(&mut self, power_cycle: bool) {

        self.current_drive = 0;
        self.motor_on = false;
        self.write_mode = false;
        self.magnet_states = 0;
        self.latch = 0;

        if power_cycle {
            for drive in self.drives.iter_mut() {
                drive.stop();
            }
        }
    }

    /// Ejects both disks. The last image paths are kept so they can be recalled.
    fn destroy(&mut self) {

        for (index, drive) in self.drives.iter_mut().enumerate() {
            if let Some(image) = drive.image.take() {
                log::debug!("Slot {}: ejected {} from drive {}", self.slot, image.path().display(), index + 1);
            }
        }
    }

    fn read_io(&mut self, offset: u8) -> u8 {

        self.access_soft_switch(offset);

        if offset & 0xF == 0xC {
            self.latch
        } else {
            0
        }
    }

    fn write_io(&mut self, offset: u8, value: u8) {

        if offset & 0xF == 0xD {
            self.latch = value;
        }

        self.access_soft_switch(offset);
    }

    fn as_disk_controller(&self) -> Option<&dyn DiskController> {
        Some(self)
    }

    fn as_disk_controller_mut(&mut self) -> Option<&mut dyn DiskController> {
        Some(self)
    }
}

/// Implementation functions to be called from the disk card manager.
impl DiskController for Disk2InterfaceCard {

    fn is_condition_for_full_speed(&self) -> bool {
        self.motor_on && self.enhance_disk
    }

    fn update_drive_state(&mut self, cycles: u32) {

        for (index, drive) in self.drives.iter_mut().enumerate() {

            let selected = index == self.current_drive;

            if selected && self.motor_on {
                drive.spin_up.count_down(cycles);
            }

            if !self.motor_on && drive.spinning.count_down(cycles) {
                log::trace!("Slot {}: drive {} stopped spinning", self.slot, index + 1);
            }

            if self.write_mode && selected && drive.spinning > 0 {
                drive.write_light = WRITELIGHT_CYCLES;
            } else {
                drive.write_light.count_down(cycles);
            }
        }
    }

    fn get_enhance_disk(&self) -> bool {
        self.enhance_disk
    }

    fn set_enhance_disk(&mut self, enhance_disk: bool) {
        self.enhance_disk = enhance_disk;
    }

    fn load_image(&mut self, drive: Drive, path: &Path) -> Result<(), CardError> {

        let image = DiskImage::open(path).inspect_err(|err| {
            log::warn!("Slot {}: could not load {}: {}", self.slot, drive, err);
        })?;

        log::info!("Slot {}: inserted {} into {}", self.slot, path.display(), drive);

        let floppy = &mut self.drives[drive.index()];
        floppy.image = Some(image);
        floppy.last_image = Some(path.to_path_buf());
        floppy.byte_position = 0;

        Ok(())
    }

    fn load_last_disk_image(&mut self, drive: Drive) -> Result<(), CardError> {

        let path = self.drives[drive.index()]
            .last_image
            .clone()
            .ok_or(CardError::NoLastImage { drive })?;

        self.load_image(drive, &path)
    }
}
