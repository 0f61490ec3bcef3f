// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// This crate contains useful utility functions that can be used throughout the codebase.

/// First address of the slot I/O soft switch area ($C080).
pub const SLOT_IO_BASE: u16 = 0xC080;

/// Last address of the slot I/O soft switch area ($C0FF).
pub const SLOT_IO_END: u16 = 0xC0FF;

/// Number of soft switch addresses given to each slot.
pub const SLOT_IO_SIZE: u16 = 0x10;

/// Exists to allow us to define custom trait operations on `u32`.
type CustomUint32 = u32;

/// This trait exists to allow cycle-based countdowns to be written the same way
/// everywhere, always clamping at zero rather than wrapping.
pub trait CountDown {

    /// This function should subtract the specified number of cycles, never going
    /// below zero. It should return true only if this call is the one that took the
    /// value from non-zero to zero.
    fn count_down(&mut self, cycles: u32) -> bool;
}

impl CountDown for CustomUint32 {

    /// Counts down by the specified amount, clamping at 0.
    #[inline(always)]
    fn count_down(&mut self, cycles: u32) -> bool {

        if *self == 0 {
            return false;
        }

        *self -= min(*self, cycles);
        *self == 0
    }
}

/// This function decodes an address in the slot soft switch area into a slot number
/// and register offset. `None` is returned for anything outside $C080-$C0FF.
pub fn decode_slot_io(address: u16) -> Option<(usize, u8)> {

    if !(SLOT_IO_BASE..=SLOT_IO_END).contains(&address) {
        return None;
    }

    let slot = ((address - SLOT_IO_BASE) / SLOT_IO_SIZE) as usize;
    let offset = (address & (SLOT_IO_SIZE - 1)) as u8;

    Some((slot, offset))
}

/// Re-exported stdlib `min` function, to keep all our utility functions together
/// here.
pub use std::cmp::min;
