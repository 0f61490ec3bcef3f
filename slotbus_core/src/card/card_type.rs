// SPDX-License-Identifier: GPL-3.0
// card_type.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    fmt,
    str::FromStr,
};

use super::CardError;

/// This enum is the tag identifying what a slot currently holds. It is both the
/// occupancy marker and the gate for capability-specific access.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CardType {
    Empty,
    Disk2,
    Ssc,
    MouseInterface,
    GenericPrinter,
    Uthernet,
    GenericHdd,
    Mockingboard,
    Phasor,
    Z80,
    LanguageCard,
    Saturn128K,
    Apple80Col,
    Extended80Col,
    RamWorksIII,
}

impl CardType {

    /// Every tag, in declaration order.
    pub const ALL: [CardType; 15] = [
        CardType::Empty,
        CardType::Disk2,
        CardType::Ssc,
        CardType::MouseInterface,
        CardType::GenericPrinter,
        CardType::Uthernet,
        CardType::GenericHdd,
        CardType::Mockingboard,
        CardType::Phasor,
        CardType::Z80,
        CardType::LanguageCard,
        CardType::Saturn128K,
        CardType::Apple80Col,
        CardType::Extended80Col,
        CardType::RamWorksIII,
    ];

    /// Returns the configuration name of this tag.
    pub fn name(self) -> &'static str {
        match self {
            CardType::Empty => "empty",
            CardType::Disk2 => "disk2",
            CardType::Ssc => "ssc",
            CardType::MouseInterface => "mouse",
            CardType::GenericPrinter => "printer",
            CardType::Uthernet => "uthernet",
            CardType::GenericHdd => "hdd",
            CardType::Mockingboard => "mockingboard",
            CardType::Phasor => "phasor",
            CardType::Z80 => "z80",
            CardType::LanguageCard => "languagecard",
            CardType::Saturn128K => "saturn128k",
            CardType::Apple80Col => "80col",
            CardType::Extended80Col => "extended80col",
            CardType::RamWorksIII => "ramworks3",
        }
    }

    /// Returns true for the memory-expansion class, which belongs in the aux slot.
    pub fn is_aux_only(self) -> bool {
        matches!(self, CardType::Apple80Col | CardType::Extended80Col | CardType::RamWorksIII)
    }

    /// Returns true if this tag may occupy the aux slot.
    pub fn is_aux_compatible(self) -> bool {
        self == CardType::Empty || self.is_aux_only()
    }

    /// Returns true for the tags that expose a capability interface, and are
    /// therefore the only ones handed out by `SlotBus::get_card`.
    pub fn has_capability(self) -> bool {
        matches!(self, CardType::Disk2 | CardType::Ssc | CardType::MouseInterface)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardType {

    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {

        let wanted = s.trim().to_ascii_lowercase();
        CardType::ALL
            .into_iter()
            .find(|card_type| card_type.name() == wanted)
            .ok_or_else(|| CardError::UnknownCardType(s.to_string()))
    }
}
