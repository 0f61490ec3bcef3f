// SPDX-License-Identifier: GPL-3.0
// empty_card.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::{Card, CardType};

/// This struct is the sentinel occupying every slot with nothing installed, so
/// a slot always holds a card.
pub struct EmptyCard;

impl EmptyCard {

    /// Creates a new empty card.
    pub fn new() -> Self {
        EmptyCard
    }
}

impl Card for EmptyCard {

    fn card_type(&self) -> CardType {
        CardType::Empty
    }

    fn reset(&mut self, _power_cycle: bool) {}

    fn destroy(&mut self) {}
}
