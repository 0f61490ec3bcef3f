// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// Crate-wide lines to disable specific lints:

// Cards and managers are built with explicit constructors that set up their
// power-on state, so there will be no derived Default implementations unless
// needed.
#![allow(clippy::new_without_default)]

/// This module contains the peripheral cards and the traits they expose.
pub mod card;

/// This module contains the backplane layout configuration.
pub mod config;

/// This module contains Apple II motherboard related functionality.
pub mod motherboard;

/// This module contains the slot bus and its Disk II manager.
pub mod slot_bus;
