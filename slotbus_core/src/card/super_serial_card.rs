// SPDX-License-Identifier: GPL-3.0
// super_serial_card.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::collections::VecDeque;

use super::{Card, CardType, SerialController};

/// Status register bits.
const STATUS_RDRF: u8 = 0x08;
const STATUS_TDRE: u8 = 0x10;

/// Command register bit enabling the receiver/transmitter (DTR).
const COMMAND_DTR: u8 = 0x01;

/// Baud rates selected by the low nibble of the control register. Entry 0
/// selects the external clock, which the card runs at 115200.
const BAUD_RATES: [u32; 16] = [
    115200, 50, 75, 110, 135, 150, 300, 600,
    1200, 1800, 2400, 3600, 4800, 7200, 9600, 19200,
];

/// This struct models the Super Serial Card's 6551 ACIA: data, status, command
/// and control registers at offsets 8 to B, with a host-side receive queue and
/// a transmit buffer drained by the frontend.
pub struct SuperSerialCard {

    // Bytes waiting to be read by the emulated software.
    rx_queue: VecDeque<u8>,

    // Bytes written by the emulated software, waiting for the host.
    tx_buffer: Vec<u8>,

    // ACIA registers.
    command: u8,
    control: u8,
}

impl SuperSerialCard {

    /// Creates a new serial card with empty queues and default registers.
    pub fn new() -> Self {
        SuperSerialCard {
            rx_queue: VecDeque::new(),
            tx_buffer: vec![],
            command: 0,
            control: 0,
        }
    }

    fn status(&self) -> u8 {

        let mut status = STATUS_TDRE;
        if !self.rx_queue.is_empty() {
            status |= STATUS_RDRF;
        }

        status
    }
}

impl Card for SuperSerialCard {

    fn card_type(&self) -> CardType {
        CardType::Ssc
    }

    /// A reset programs the ACIA back to its defaults. Queued host data only goes
    /// on a power cycle.
    fn reset(&mut self, power_cycle: bool) {

        self.command = 0;
        if power_cycle {
            self.control = 0;
            self.rx_queue.clear();
            self.tx_buffer.clear();
        }
    }

    fn destroy(&mut self) {
        self.rx_queue.clear();
        self.tx_buffer.clear();
    }

    fn read_io(&mut self, offset: u8) -> u8 {

        match offset & 0xF {
            0x8 => self.rx_queue.pop_front().unwrap_or(0),
            0x9 => self.status(),
            0xA => self.command,
            0xB => self.control,
            _ => 0,
        }
    }

    fn write_io(&mut self, offset: u8, value: u8) {

        match offset & 0xF {

            // Transmit only goes anywhere with DTR asserted.
            0x8 => {
                if self.command & COMMAND_DTR != 0 {
                    self.tx_buffer.push(value);
                }
            },

            // Any write to the status register is a programmed reset.
            0x9 => self.reset(false),

            0xA => self.command = value,
            0xB => self.control = value,
            _ => (),
        }
    }

    fn as_serial_controller(&self) -> Option<&dyn SerialController> {
        Some(self)
    }

    fn as_serial_controller_mut(&mut self) -> Option<&mut dyn SerialController> {
        Some(self)
    }
}

impl SerialController for SuperSerialCard {

    fn receive_from_host(&mut self, value: u8) {
        self.rx_queue.push_back(value);
    }

    fn take_transmitted(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx_buffer)
    }

    fn baud_rate(&self) -> u32 {
        BAUD_RATES[(self.control & 0xF) as usize]
    }
}
