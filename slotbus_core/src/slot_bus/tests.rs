// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    cell::RefCell,
    cmp::Ordering,
    path::Path,
    rc::Rc,
};

use crate::{
    card::{
        Card,
        CardError,
        CardLocation,
        CardType,
        DiskController,
        Drive,
        MouseButton,
        MouseInterface,
        MousePosition,
        SerialController,
        card_factory::{CardFactory, DefaultCardFactory},
    },
    config::BusConfig,
};

use super::{DEFAULT_AUX, DEFAULT_LAYOUT, NUM_SLOTS, SLOT6, SlotBus};

// Tests for the slot bus, its fast path and the Disk II card manager.

/// Shared record of everything the probe cards were asked to do.
type EventLog = Rc<RefCell<Vec<String>>>;

/// A card of any type that records its lifecycle in an event log. Disk II probes
/// report full speed eligibility and enhanced disk settings as configured.
struct ProbeCard {
    card_type: CardType,
    location: CardLocation,
    log: EventLog,
    full_speed: bool,
    enhance_disk: bool,
}

impl ProbeCard {
    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{} {} {}", event, self.location, self.card_type));
    }
}

impl Drop for ProbeCard {
    fn drop(&mut self) {
        self.record("drop");
    }
}

impl Card for ProbeCard {

    fn card_type(&self) -> CardType {
        self.card_type
    }

    fn reset(&mut self, power_cycle: bool) {
        self.record(if power_cycle { "cold-reset" } else { "warm-reset" });
    }

    fn destroy(&mut self) {
        self.record("destroy");
    }

    fn as_disk_controller(&self) -> Option<&dyn DiskController> {
        (self.card_type == CardType::Disk2).then_some(self as &dyn DiskController)
    }

    fn as_disk_controller_mut(&mut self) -> Option<&mut dyn DiskController> {
        if self.card_type == CardType::Disk2 { Some(self) } else { None }
    }

    fn as_mouse_interface(&self) -> Option<&dyn MouseInterface> {
        (self.card_type == CardType::MouseInterface).then_some(self as &dyn MouseInterface)
    }

    fn as_mouse_interface_mut(&mut self) -> Option<&mut dyn MouseInterface> {
        if self.card_type == CardType::MouseInterface { Some(self) } else { None }
    }

    fn as_serial_controller(&self) -> Option<&dyn SerialController> {
        (self.card_type == CardType::Ssc).then_some(self as &dyn SerialController)
    }

    fn as_serial_controller_mut(&mut self) -> Option<&mut dyn SerialController> {
        if self.card_type == CardType::Ssc { Some(self) } else { None }
    }
}

impl DiskController for ProbeCard {

    fn is_condition_for_full_speed(&self) -> bool {
        self.record("full-speed?");
        self.full_speed
    }

    fn update_drive_state(&mut self, cycles: u32) {
        self.record(&format!("update({})", cycles));
    }

    fn get_enhance_disk(&self) -> bool {
        self.enhance_disk
    }

    fn set_enhance_disk(&mut self, enhance_disk: bool) {
        self.enhance_disk = enhance_disk;
        self.record(&format!("enhance({})", enhance_disk));
    }

    fn load_image(&mut self, drive: Drive, _path: &Path) -> Result<(), CardError> {
        self.record(&format!("load {}", drive));
        Ok(())
    }

    fn load_last_disk_image(&mut self, drive: Drive) -> Result<(), CardError> {
        self.record(&format!("load-last {}", drive));
        match drive {
            Drive::One => Ok(()),
            Drive::Two => Err(CardError::NoLastImage { drive }),
        }
    }
}

impl MouseInterface for ProbeCard {

    fn is_active_and_enabled(&self) -> bool {
        true
    }

    fn set_position_rel(&mut self, _dx: i32, _dy: i32) -> (Ordering, Ordering) {
        (Ordering::Equal, Ordering::Equal)
    }

    fn set_button(&mut self, _button: MouseButton, _pressed: bool) {}

    fn get_xy(&self) -> MousePosition {
        MousePosition { x: 0, min_x: 0, max_x: 0, y: 0, min_y: 0, max_y: 0 }
    }
}

impl SerialController for ProbeCard {

    fn receive_from_host(&mut self, _value: u8) {}

    fn take_transmitted(&mut self) -> Vec<u8> {
        vec![]
    }

    fn baud_rate(&self) -> u32 {
        9600
    }
}

/// Builds probe cards, with per-slot full speed and enhanced disk settings, and
/// optionally refusing to build one card type.
struct ProbeFactory {
    log: EventLog,
    full_speed_slots: Vec<usize>,
    unenhanced_slots: Vec<usize>,
    refuse: Option<CardType>,
}

impl ProbeFactory {
    fn new(log: &EventLog) -> Self {
        ProbeFactory {
            log: log.clone(),
            full_speed_slots: vec![],
            unenhanced_slots: vec![],
            refuse: None,
        }
    }
}

impl CardFactory for ProbeFactory {

    fn create_card(
        &mut self,
        card_type: CardType,
        location: CardLocation
    ) -> Result<Box<dyn Card>, CardError> {

        if self.refuse == Some(card_type) {
            return Err(CardError::UnknownCardType(card_type.to_string()));
        }

        let slot = match location {
            CardLocation::Slot(slot) => Some(slot),
            CardLocation::Aux => None,
        };

        let card = ProbeCard {
            card_type,
            location,
            log: self.log.clone(),
            full_speed: slot.is_some_and(|slot| self.full_speed_slots.contains(&slot)),
            enhance_disk: !slot.is_some_and(|slot| self.unenhanced_slots.contains(&slot)),
        };
        card.record("create");

        Ok(Box::new(card))
    }
}

fn new_log() -> EventLog {
    Rc::new(RefCell::new(vec![]))
}

/// A bus with every slot empty, built from probe cards.
fn empty_probe_bus(factory: ProbeFactory) -> SlotBus {

    let mut config = BusConfig::new();
    config.slots = [CardType::Empty; NUM_SLOTS];
    config.aux = CardType::Empty;

    match SlotBus::from_config(Box::new(factory), &config) {
        Ok(slot_bus) => slot_bus,
        Err(err) => panic!("empty bus should always build: {}", err),
    }
}

/// Checks the fast path agrees with a full scan of the slots.
fn assert_fast_path_consistent(slot_bus: &SlotBus) {

    let mouse_slots: Vec<usize> = (0..NUM_SLOTS)
        .filter(|slot| slot_bus.query_slot(*slot) == CardType::MouseInterface)
        .collect();
    let ssc_slots: Vec<usize> = (0..NUM_SLOTS)
        .filter(|slot| slot_bus.query_slot(*slot) == CardType::Ssc)
        .collect();

    assert_eq!(slot_bus.is_mouse_card_installed(), !mouse_slots.is_empty());
    assert_eq!(slot_bus.mouse_card().is_some(), !mouse_slots.is_empty());
    assert_eq!(slot_bus.mouse_slot, mouse_slots.first().copied());
    assert_eq!(slot_bus.is_ssc_installed(), !ssc_slots.is_empty());
    assert_eq!(slot_bus.ssc().is_some(), !ssc_slots.is_empty());
    assert_eq!(slot_bus.ssc_slot, ssc_slots.first().copied());
}

#[test]
fn new_bus_should_have_default_layout() {

    let slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    for slot in 0..NUM_SLOTS {
        assert_eq!(slot_bus.query_slot(slot), DEFAULT_LAYOUT[slot]);
    }
    assert_eq!(slot_bus.query_aux(), DEFAULT_AUX);
    assert_eq!(slot_bus.query_slot(SLOT6), CardType::Disk2);
    assert_fast_path_consistent(&slot_bus);
    assert!(slot_bus.is_ssc_installed());
    assert!(!slot_bus.is_mouse_card_installed());
}

#[test]
fn insert_should_be_visible_through_query_for_every_slot_type() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    // Clear out the singletons so each type can go anywhere.
    slot_bus.remove(2);

    for card_type in CardType::ALL.into_iter().filter(|card_type| !card_type.is_aux_only()) {
        slot_bus.insert(4, card_type).unwrap();
        assert_eq!(slot_bus.query_slot(4), card_type);
        assert_fast_path_consistent(&slot_bus);
    }
}

#[test]
fn replacing_a_card_should_destroy_old_before_creating_new() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));

    slot_bus.insert(3, CardType::GenericPrinter).unwrap();
    log.borrow_mut().clear();

    slot_bus.insert(3, CardType::Uthernet).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "destroy slot 3 printer",
            "drop slot 3 printer",
            "create slot 3 uthernet",
        ]
    );
    assert_eq!(slot_bus.query_slot(3), CardType::Uthernet);
}

#[test]
fn removing_an_empty_slot_should_do_nothing() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));

    slot_bus.remove(5);
    slot_bus.remove(5);

    assert!(log.borrow().is_empty());
    assert_eq!(slot_bus.query_slot(5), CardType::Empty);
}

#[test]
fn inserting_empty_should_behave_as_remove() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));
    slot_bus.insert(1, CardType::Disk2).unwrap();
    log.borrow_mut().clear();

    slot_bus.insert(1, CardType::Empty).unwrap();

    assert_eq!(*log.borrow(), vec!["destroy slot 1 disk2", "drop slot 1 disk2"]);
    assert_eq!(slot_bus.query_slot(1), CardType::Empty);
}

#[test]
fn failed_construction_should_leave_slot_empty() {

    let log = new_log();
    let mut factory = ProbeFactory::new(&log);
    factory.refuse = Some(CardType::Mockingboard);
    let mut slot_bus = empty_probe_bus(factory);
    slot_bus.insert(4, CardType::Phasor).unwrap();

    let result = slot_bus.insert(4, CardType::Mockingboard);

    assert!(result.is_err());
    assert_eq!(slot_bus.query_slot(4), CardType::Empty);
    assert!(log.borrow().contains(&"destroy slot 4 phasor".to_string()));
}

#[test]
fn memory_expansion_card_should_be_refused_in_numbered_slot() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));

    let result = slot_bus.insert(3, CardType::Extended80Col);

    assert!(matches!(result, Err(CardError::WrongLocation { location: CardLocation::Slot(3), .. })));
    assert_eq!(slot_bus.query_slot(3), CardType::Empty);
}

#[test]
fn aux_slot_should_follow_the_same_lifecycle() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));

    slot_bus.insert_aux(CardType::Extended80Col).unwrap();
    slot_bus.insert_aux(CardType::RamWorksIII).unwrap();
    assert_eq!(slot_bus.query_aux(), CardType::RamWorksIII);

    slot_bus.remove_aux();
    slot_bus.remove_aux();
    assert_eq!(slot_bus.query_aux(), CardType::Empty);

    assert_eq!(
        *log.borrow(),
        vec![
            "create aux slot extended80col",
            "destroy aux slot extended80col",
            "drop aux slot extended80col",
            "create aux slot ramworks3",
            "destroy aux slot ramworks3",
            "drop aux slot ramworks3",
        ]
    );
}

#[test]
fn aux_slot_should_refuse_slot_cards() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    let result = slot_bus.insert_aux(CardType::Disk2);

    assert!(matches!(result, Err(CardError::WrongLocation { location: CardLocation::Aux, .. })));
    assert_eq!(slot_bus.query_aux(), CardType::Empty);
}

#[test]
fn dropping_the_bus_should_destroy_every_card_once() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));
    slot_bus.insert(0, CardType::LanguageCard).unwrap();
    slot_bus.insert(6, CardType::Disk2).unwrap();
    slot_bus.insert_aux(CardType::Extended80Col).unwrap();
    log.borrow_mut().clear();

    drop(slot_bus);

    let events = log.borrow();
    for card in ["slot 0 languagecard", "slot 6 disk2", "aux slot extended80col"] {
        assert_eq!(events.iter().filter(|event| **event == format!("destroy {}", card)).count(), 1);
        assert_eq!(events.iter().filter(|event| **event == format!("drop {}", card)).count(), 1);
    }
    assert_eq!(events.len(), 6);
}

#[test]
fn mouse_card_should_appear_and_vanish_with_its_slot() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));
    assert!(slot_bus.mouse_card().is_none());

    slot_bus.insert(4, CardType::MouseInterface).unwrap();
    assert!(slot_bus.is_mouse_card_installed());
    assert_fast_path_consistent(&slot_bus);

    // The handle reaches the very card in slot 4.
    slot_bus.io_write(0xC0C8, 0x01);
    assert!(slot_bus.mouse_card().unwrap().is_active_and_enabled());

    slot_bus.remove(4);
    assert!(slot_bus.mouse_card().is_none());
    assert_fast_path_consistent(&slot_bus);
}

#[test]
fn replacing_the_mouse_card_should_clear_the_fast_path() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));
    slot_bus.insert(4, CardType::MouseInterface).unwrap();

    slot_bus.insert(4, CardType::GenericHdd).unwrap();

    assert!(!slot_bus.is_mouse_card_installed());
    assert_fast_path_consistent(&slot_bus);
}

#[test]
fn reinserting_the_mouse_card_in_its_own_slot_should_succeed() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));
    slot_bus.insert(4, CardType::MouseInterface).unwrap();

    slot_bus.insert(4, CardType::MouseInterface).unwrap();

    assert_eq!(slot_bus.mouse_slot, Some(4));
    assert_fast_path_consistent(&slot_bus);
}

#[test]
fn second_mouse_card_should_be_refused() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));
    slot_bus.insert(4, CardType::MouseInterface).unwrap();
    slot_bus.insert(5, CardType::GenericPrinter).unwrap();

    let result = slot_bus.insert(5, CardType::MouseInterface);

    assert!(matches!(
        result,
        Err(CardError::CapabilityAlreadyInstalled { card_type: CardType::MouseInterface, existing_slot: 4 })
    ));
    assert_eq!(slot_bus.query_slot(5), CardType::Empty);
    assert_eq!(slot_bus.mouse_slot, Some(4));
    assert_fast_path_consistent(&slot_bus);
}

#[test]
fn second_serial_card_should_be_refused() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    let result = slot_bus.insert(7, CardType::Ssc);

    assert!(matches!(result, Err(CardError::CapabilityAlreadyInstalled { existing_slot: 2, .. })));
    assert_fast_path_consistent(&slot_bus);
}

#[test]
fn serial_card_should_be_reachable_through_fast_path() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    // Enable DTR on the slot 2 card and transmit a byte.
    slot_bus.io_write(0xC0AA, 0x0B);
    slot_bus.io_write(0xC0A8, b'A');

    assert_eq!(slot_bus.ssc_mut().unwrap().take_transmitted(), vec![b'A']);

    slot_bus.remove(2);
    assert!(slot_bus.ssc_mut().is_none());
}

#[test]
fn io_outside_slot_area_should_not_be_claimed() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    assert_eq!(slot_bus.io_read(0xC000), None);
    assert!(!slot_bus.io_write(0xC100, 0));
    assert_eq!(slot_bus.io_read(0xC080), Some(0));
}

#[test]
fn get_card_should_hand_out_capability_cards() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    assert_eq!(slot_bus.get_card(SLOT6).card_type(), CardType::Disk2);
    assert!(slot_bus.get_card_mut(2).as_serial_controller_mut().is_some());
    assert!(slot_bus.get_card(2).as_disk_controller().is_none());
}

#[test]
#[should_panic(expected = "no capability interface")]
fn get_card_on_empty_slot_should_panic() {

    let slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));
    slot_bus.get_card(0);
}

#[test]
#[should_panic(expected = "does not hold a disk controller")]
fn disk_controller_from_serial_slot_should_panic() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));
    slot_bus.disk_controller_mut(2);
}

#[test]
#[should_panic(expected = "out of range")]
fn slot_out_of_range_should_panic() {

    let slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));
    slot_bus.query_slot(NUM_SLOTS);
}

#[test]
fn full_speed_should_be_true_if_any_card_says_so() {

    let log = new_log();
    let mut factory = ProbeFactory::new(&log);
    factory.full_speed_slots = vec![5];
    let mut slot_bus = empty_probe_bus(factory);
    slot_bus.insert(4, CardType::Disk2).unwrap();
    slot_bus.insert(5, CardType::Disk2).unwrap();
    slot_bus.insert(6, CardType::Disk2).unwrap();
    log.borrow_mut().clear();

    assert!(slot_bus.disk2_card_mgr().is_condition_for_full_speed());

    // The scan stops at the first card saying yes.
    assert_eq!(*log.borrow(), vec!["full-speed? slot 4 disk2", "full-speed? slot 5 disk2"]);
}

#[test]
fn full_speed_should_be_false_if_no_card_says_so() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));
    slot_bus.insert(5, CardType::Disk2).unwrap();
    slot_bus.insert(6, CardType::Disk2).unwrap();

    assert!(!slot_bus.disk2_card_mgr().is_condition_for_full_speed());
}

#[test]
fn aggregates_over_no_disk_cards_should_be_false() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));
    slot_bus.insert(1, CardType::GenericPrinter).unwrap();
    log.borrow_mut().clear();

    let mut disk2_card_mgr = slot_bus.disk2_card_mgr();
    disk2_card_mgr.update_drive_state(1000);
    disk2_card_mgr.reset(true);
    disk2_card_mgr.destroy();

    assert_eq!(disk2_card_mgr.count(), 0);
    assert!(!disk2_card_mgr.is_condition_for_full_speed());
    assert!(!disk2_card_mgr.get_enhance_disk());
    assert!(disk2_card_mgr.load_last_disk_images().is_none());
    assert!(log.borrow().is_empty());
}

#[test]
fn broadcasts_should_reach_every_disk_card_in_slot_order() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));
    slot_bus.insert(6, CardType::Disk2).unwrap();
    slot_bus.insert(2, CardType::Disk2).unwrap();
    slot_bus.insert(4, CardType::GenericPrinter).unwrap();
    log.borrow_mut().clear();

    let mut disk2_card_mgr = slot_bus.disk2_card_mgr();
    disk2_card_mgr.update_drive_state(64);
    disk2_card_mgr.reset(false);
    disk2_card_mgr.destroy();

    assert_eq!(
        *log.borrow(),
        vec![
            "update(64) slot 2 disk2",
            "update(64) slot 6 disk2",
            "warm-reset slot 2 disk2",
            "warm-reset slot 6 disk2",
            "destroy slot 2 disk2",
            "destroy slot 6 disk2",
        ]
    );

    // Destroy is a broadcast lifecycle event, the cards stay put.
    assert_eq!(slot_bus.query_slot(2), CardType::Disk2);
    assert_eq!(slot_bus.query_slot(6), CardType::Disk2);
}

#[test]
fn set_enhance_disk_should_reach_both_cards() {

    let log = new_log();
    let mut factory = ProbeFactory::new(&log);
    factory.unenhanced_slots = vec![5, 6];
    let mut slot_bus = empty_probe_bus(factory);
    slot_bus.insert(5, CardType::Disk2).unwrap();
    slot_bus.insert(6, CardType::Disk2).unwrap();

    slot_bus.disk2_card_mgr().set_enhance_disk(true);

    assert!(slot_bus.disk2_card_mgr().get_enhance_disk());
    assert!(slot_bus.get_card(5).as_disk_controller().unwrap().get_enhance_disk());
    assert!(slot_bus.get_card(6).as_disk_controller().unwrap().get_enhance_disk());
}

#[test]
fn get_enhance_disk_should_report_only_the_first_card() {

    let log = new_log();
    let mut factory = ProbeFactory::new(&log);
    factory.unenhanced_slots = vec![6];
    let mut slot_bus = empty_probe_bus(factory);
    slot_bus.insert(5, CardType::Disk2).unwrap();
    slot_bus.insert(6, CardType::Disk2).unwrap();

    // Cards disagree, so the answer is whatever slot 5 says.
    assert!(slot_bus.disk2_card_mgr().get_enhance_disk());

    slot_bus.disk_controller_mut(5).set_enhance_disk(false);
    slot_bus.disk_controller_mut(6).set_enhance_disk(true);
    assert!(!slot_bus.disk2_card_mgr().get_enhance_disk());
}

#[test]
fn load_last_disk_images_should_only_touch_slot_6() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));
    slot_bus.insert(5, CardType::Disk2).unwrap();
    slot_bus.insert(6, CardType::Disk2).unwrap();
    log.borrow_mut().clear();

    let results = slot_bus.disk2_card_mgr().load_last_disk_images().unwrap();

    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(CardError::NoLastImage { drive: Drive::Two })));
    assert_eq!(*log.borrow(), vec!["load-last drive 1 slot 6 disk2", "load-last drive 2 slot 6 disk2"]);
}

#[test]
fn load_last_disk_images_should_skip_when_slot_6_has_no_disk_card() {

    let log = new_log();
    let mut slot_bus = empty_probe_bus(ProbeFactory::new(&log));
    slot_bus.insert(5, CardType::Disk2).unwrap();
    log.borrow_mut().clear();

    assert!(slot_bus.disk2_card_mgr().load_last_disk_images().is_none());
    assert!(log.borrow().is_empty());
}

#[test]
fn removing_slot_6_should_end_full_speed() {

    let mut slot_bus = SlotBus::new(Box::new(DefaultCardFactory::new()));

    // Switch the slot 6 motor on, which with enhanced disk access allows full speed.
    slot_bus.io_read(0xC0E9);
    assert!(slot_bus.disk2_card_mgr().is_condition_for_full_speed());

    slot_bus.remove(SLOT6);

    assert_eq!(slot_bus.query_slot(SLOT6), CardType::Empty);
    assert!(!slot_bus.disk2_card_mgr().is_condition_for_full_speed());
}
