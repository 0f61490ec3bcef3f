// SPDX-License-Identifier: GPL-3.0
// dummy_card.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::{Card, CardType};

/// This struct stands in for every card type without a behavioural model here
/// (printers, network adapters, sound cards, memory expansion and so on). It
/// carries identity only, so the slot reports the right tag.
pub struct DummyCard {

    // The tag this card reports.
    card_type: CardType,
}

impl DummyCard {

    /// Creates a new dummy card reporting the supplied tag.
    pub fn new(card_type: CardType) -> Self {
        DummyCard {
            card_type,
        }
    }
}

impl Card for DummyCard {

    fn card_type(&self) -> CardType {
        self.card_type
    }

    fn reset(&mut self, _power_cycle: bool) {}

    fn destroy(&mut self) {}
}
