// SPDX-License-Identifier: GPL-3.0
// motherboard.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::slot_bus::SlotBus;

/// This module contains the default motherboard implementation. There
/// may be others in future.
pub mod apple2_motherboard;

/// This trait provides an implementation-opaque way of driving a whole
/// emulator session: the lifecycle events and the passing of time. The
/// motherboard owns the slot bus, so there is exactly one per session.
pub trait Motherboard {

    /// Implementations must bring the machine up from cold.
    fn power_on(&mut self);

    /// Implementations must reset the machine, cold if `power_cycle` is set.
    fn reset(&mut self, power_cycle: bool);

    /// Implementations must advance every timed peripheral by the supplied number
    /// of CPU cycles.
    fn execute_cycles(&mut self, cycles: u32);

    /// Implementations must quiesce the machine ahead of the session ending.
    fn shutdown(&mut self);

    /// Implementations must report whether the last time slice left the machine
    /// able to run unthrottled.
    fn is_full_speed(&self) -> bool;

    /// Implementations must return the number of cycles executed since power on.
    fn total_cycles(&self) -> u64;

    /// Implementations must give access to the slot bus.
    fn slot_bus(&self) -> &SlotBus;

    /// Mutable version of `slot_bus`.
    fn slot_bus_mut(&mut self) -> &mut SlotBus;
}
