// SPDX-License-Identifier: GPL-3.0
// mouse_interface_card.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::cmp::Ordering;

use super::{Card, CardType, MouseButton, MouseInterface, MousePosition};

/// Default upper clamp on both axes.
const DEFAULT_CLAMP_MAX: i32 = 1023;

/// Mode register bit enabling the mouse.
const MODE_ENABLE: u8 = 0x01;

/// Status bits reported for the buttons.
const STATUS_BUTTON0: u8 = 0x80;
const STATUS_BUTTON1: u8 = 0x40;

/// This struct models the mouse interface card: an absolute position clamped
/// into a window, two buttons, and a mode register the software uses to turn
/// the mouse on.
pub struct MouseInterfaceCard {

    // The slot this card was constructed for.
    slot: usize,

    // Position and clamping window.
    x: i32,
    y: i32,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,

    // Button states.
    buttons: [bool; 2],

    // Mode register, as last written.
    mode: u8,
}

impl MouseInterfaceCard {

    /// Creates a new mouse card, disabled and sat at the origin.
    pub fn new(slot: usize) -> Self {
        MouseInterfaceCard {
            slot,
            x: 0,
            y: 0,
            min_x: 0,
            max_x: DEFAULT_CLAMP_MAX,
            min_y: 0,
            max_y: DEFAULT_CLAMP_MAX,
            buttons: [false; 2],
            mode: 0,
        }
    }

    /// Sets the clamping window for the X axis, pulling the mouse inside it.
    pub fn set_clamp_x(&mut self, min: i32, max: i32) {
        self.min_x = min;
        self.max_x = max;
        self.x = self.x.clamp(min, max);
    }

    /// Sets the clamping window for the Y axis, pulling the mouse inside it.
    pub fn set_clamp_y(&mut self, min: i32, max: i32) {
        self.min_y = min;
        self.max_y = max;
        self.y = self.y.clamp(min, max);
    }

    fn status(&self) -> u8 {

        let mut status = 0;
        if self.buttons[0] {
            status |= STATUS_BUTTON0;
        }
        if self.buttons[1] {
            status |= STATUS_BUTTON1;
        }

        status
    }
}

/// Clamps a coordinate into a window, reporting which side it spilled out of.
fn clamp_axis(value: i32, min: i32, max: i32) -> (i32, Ordering) {

    if value < min {
        (min, Ordering::Less)
    } else if value > max {
        (max, Ordering::Greater)
    } else {
        (value, Ordering::Equal)
    }
}

impl Card for MouseInterfaceCard {

    fn card_type(&self) -> CardType {
        CardType::MouseInterface
    }

    fn reset(&mut self, _power_cycle: bool) {

        self.mode = 0;
        self.buttons = [false; 2];
        self.x = self.min_x;
        self.y = self.min_y;
    }

    fn destroy(&mut self) {}

    fn read_io(&mut self, offset: u8) -> u8 {

        // Position bytes, low then high, X then Y, followed by button status.
        match offset & 0xF {
            0x0 => (self.x & 0xFF) as u8,
            0x1 => ((self.x >> 8) & 0xFF) as u8,
            0x2 => (self.y & 0xFF) as u8,
            0x3 => ((self.y >> 8) & 0xFF) as u8,
            0x4 => self.status(),
            0x8 => self.mode,
            _ => 0,
        }
    }

    fn write_io(&mut self, offset: u8, value: u8) {

        if offset & 0xF == 0x8 {
            if (value ^ self.mode) & MODE_ENABLE != 0 {
                log::debug!("Slot {}: mouse {}", self.slot, if value & MODE_ENABLE != 0 { "enabled" } else { "disabled" });
            }
            self.mode = value;
        }
    }

    fn as_mouse_interface(&self) -> Option<&dyn MouseInterface> {
        Some(self)
    }

    fn as_mouse_interface_mut(&mut self) -> Option<&mut dyn MouseInterface> {
        Some(self)
    }
}

impl MouseInterface for MouseInterfaceCard {

    fn is_active_and_enabled(&self) -> bool {
        self.mode & MODE_ENABLE != 0
    }

    fn set_position_rel(&mut self, dx: i32, dy: i32) -> (Ordering, Ordering) {

        let (x, out_of_bounds_x) = clamp_axis(self.x.saturating_add(dx), self.min_x, self.max_x);
        let (y, out_of_bounds_y) = clamp_axis(self.y.saturating_add(dy), self.min_y, self.max_y);
        self.x = x;
        self.y = y;

        (out_of_bounds_x, out_of_bounds_y)
    }

    fn set_button(&mut self, button: MouseButton, pressed: bool) {

        let index = match button {
            MouseButton::Button0 => 0,
            MouseButton::Button1 => 1,
        };
        self.buttons[index] = pressed;
    }

    fn get_xy(&self) -> MousePosition {
        MousePosition {
            x: self.x,
            min_x: self.min_x,
            max_x: self.max_x,
            y: self.y,
            min_y: self.min_y,
            max_y: self.max_y,
        }
    }
}
