// SPDX-License-Identifier: GPL-3.0
// floppy_drive.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::PathBuf;

use super::disk_image::{DiskImage, NUM_TRACKS};

/// Highest half-track the head can reach.
pub const MAX_HALF_TRACK: i32 = (NUM_TRACKS as i32 - 1) * 2;

/// The mechanical state of a drive, derived from its timers and the card's
/// motor and drive-select switches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriveState {
    Idle,
    SpinningUp,
    Active,
    Settling,
}

/// This struct models one 5.25" drive hanging off a Disk II card.
pub struct FloppyDrive {

    // The inserted image, if any, and the path of the last image loaded.
    pub image: Option<DiskImage>,
    pub last_image: Option<PathBuf>,

    // Head position in half-tracks and the byte under the head.
    pub half_track: i32,
    pub byte_position: usize,

    // Countdown timers, in CPU cycles.
    pub spinning: u32,
    pub spin_up: u32,
    pub write_light: u32,
}

impl FloppyDrive {

    /// Creates a new, empty and stationary drive.
    pub fn new() -> Self {
        FloppyDrive {
            image: None,
            last_image: None,
            half_track: 0,
            byte_position: 0,
            spinning: 0,
            spin_up: 0,
            write_light: 0,
        }
    }

    /// Returns the whole track the head is over.
    pub fn track(&self) -> usize {
        (self.half_track / 2) as usize
    }

    /// Works out the drive state. `powered` is true only when the card motor is on
    /// and this drive is the selected one.
    pub fn state(&self, powered: bool) -> DriveState {

        if powered {
            if self.spin_up > 0 {
                DriveState::SpinningUp
            } else {
                DriveState::Active
            }
        } else if self.spinning > 0 {
            DriveState::Settling
        } else {
            DriveState::Idle
        }
    }

    /// Moves the head in response to a stepper magnet being energised.
    pub fn step(&mut self, phase: u8) {

        let head_phase = (self.half_track & 3) as u8;

        if phase == (head_phase + 1) & 3 {
            self.half_track = (self.half_track + 1).min(MAX_HALF_TRACK);
        } else if phase == (head_phase + 3) & 3 {
            self.half_track = (self.half_track - 1).max(0);
        }
    }

    /// Reads the byte under the head and moves on to the next one.
    pub fn read_next_byte(&mut self) -> Option<u8> {

        let track = self.track();
        let image = self.image.as_ref()?;
        let value = image.read_byte(track, self.byte_position);
        self.byte_position = (self.byte_position + 1) % image.track_size();

        Some(value)
    }

    /// Stops the drive dead.
    pub fn stop(&mut self) {
        self.spinning = 0;
        self.spin_up = 0;
        self.write_light = 0;
    }
}
