// SPDX-License-Identifier: GPL-3.0
// card.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    cmp::Ordering,
    fmt,
    path::Path,
};

/// This module contains the closed set of card type tags.
pub mod card_type;

/// This module contains the error type shared by all cards and the slot bus.
pub mod card_error;

/// This module contains the factory seam used by the slot bus to construct cards.
pub mod card_factory;

/// This module contains the sentinel card used for unoccupied slots.
pub mod empty_card;

/// This module contains an identity-only card for types with no behavioural model.
pub mod dummy_card;

/// This module contains the Disk II interface card implementation.
pub mod disk2_interface_card;

/// This module contains the mouse interface card implementation.
pub mod mouse_interface_card;

/// This module contains the Super Serial Card implementation.
pub mod super_serial_card;

pub use card_error::CardError;
pub use card_type::CardType;

/// Number of drives attached to a single disk controller card.
pub const NUM_DRIVES: usize = 2;

/// Identifies where a card lives on the backplane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardLocation {
    Slot(usize),
    Aux,
}

impl fmt::Display for CardLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardLocation::Slot(slot) => write!(f, "slot {}", slot),
            CardLocation::Aux => write!(f, "aux slot"),
        }
    }
}

/// Identifies a drive on a disk controller card.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Drive {
    One,
    Two,
}

impl Drive {

    /// Both drives, in the order they are numbered on the card.
    pub const ALL: [Drive; NUM_DRIVES] = [Drive::One, Drive::Two];

    /// Returns the zero-based index of this drive.
    pub fn index(self) -> usize {
        match self {
            Drive::One => 0,
            Drive::Two => 1,
        }
    }
}

impl fmt::Display for Drive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drive {}", self.index() + 1)
    }
}

/// Identifies a mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Button0,
    Button1,
}

/// A snapshot of the mouse position together with its clamping window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MousePosition {
    pub x: i32,
    pub min_x: i32,
    pub max_x: i32,
    pub y: i32,
    pub min_y: i32,
    pub max_y: i32,
}

/// This trait provides an implementation-opaque way of calling card methods
/// from the slot bus. Every card, including the empty sentinel, implements it.
/// Capability-specific operations are only reachable through the `as_*`
/// queries, which return `None` for cards lacking that capability.
pub trait Card {

    /// Implementations must return the tag identifying what kind of card this is.
    fn card_type(&self) -> CardType;

    /// Implementations must return the card to its reset state. A power cycle
    /// should also discard any state that survives a warm reset.
    fn reset(&mut self, power_cycle: bool);

    /// Implementations must release any resources they hold (disk images, host
    /// connections). This may be called more than once and must be idempotent.
    fn destroy(&mut self);

    /// Implementations may use this to respond to a read of one of their 16 soft
    /// switch addresses.
    fn read_io(&mut self, _offset: u8) -> u8 {
        0
    }

    /// Implementations may use this to respond to a write of one of their 16 soft
    /// switch addresses.
    fn write_io(&mut self, _offset: u8, _value: u8) {}

    fn as_disk_controller(&self) -> Option<&dyn DiskController> {
        None
    }

    fn as_disk_controller_mut(&mut self) -> Option<&mut dyn DiskController> {
        None
    }

    fn as_mouse_interface(&self) -> Option<&dyn MouseInterface> {
        None
    }

    fn as_mouse_interface_mut(&mut self) -> Option<&mut dyn MouseInterface> {
        None
    }

    fn as_serial_controller(&self) -> Option<&dyn SerialController> {
        None
    }

    fn as_serial_controller_mut(&mut self) -> Option<&mut dyn SerialController> {
        None
    }
}

/// This trait provides the disk controller capability, which is what the
/// `Disk2CardManager` broadcasts to and aggregates from.
pub trait DiskController: Card {

    /// Implementations must report whether the emulator may run unthrottled
    /// without breaking their timing model.
    fn is_condition_for_full_speed(&self) -> bool;

    /// Implementations must advance their drive mechanics by the supplied number
    /// of elapsed CPU cycles.
    fn update_drive_state(&mut self, cycles: u32);

    /// Implementations must return whether enhanced (accelerated) disk access is on.
    fn get_enhance_disk(&self) -> bool;

    /// Implementations must enable or disable enhanced disk access.
    fn set_enhance_disk(&mut self, enhance_disk: bool);

    /// Implementations must load the image at the supplied path into the drive.
    fn load_image(&mut self, drive: Drive, path: &Path) -> Result<(), CardError>;

    /// Implementations must reload the last image recorded for the drive.
    fn load_last_disk_image(&mut self, drive: Drive) -> Result<(), CardError>;
}

/// This trait provides the mouse capability used by frontends through the
/// slot bus fast path.
pub trait MouseInterface: Card {

    /// Implementations must return true only when the card has been enabled by
    /// the running software.
    fn is_active_and_enabled(&self) -> bool;

    /// Implementations must move the mouse by the supplied delta, clamping into
    /// their window. The returned orderings report, per axis, whether the
    /// requested position fell below (`Less`) or above (`Greater`) the window.
    fn set_position_rel(&mut self, dx: i32, dy: i32) -> (Ordering, Ordering);

    /// Implementations must record the new state of the supplied button.
    fn set_button(&mut self, button: MouseButton, pressed: bool);

    /// Implementations must return the current position and clamping window.
    fn get_xy(&self) -> MousePosition;
}

/// This trait provides the serial capability used by frontends through the
/// slot bus fast path.
pub trait SerialController: Card {

    /// Implementations must queue a byte arriving from the host side.
    fn receive_from_host(&mut self, value: u8);

    /// Implementations must hand over (and forget) every byte transmitted by the
    /// emulated software since the last call.
    fn take_transmitted(&mut self) -> Vec<u8>;

    /// Implementations must return the currently programmed baud rate.
    fn baud_rate(&self) -> u32;
}
