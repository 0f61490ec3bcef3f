// SPDX-License-Identifier: GPL-3.0
// main.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::PathBuf;

// This file is the core of the basic client - it exists merely as a CLI-based
// program to lay out the backplane, load disk images and run the peripherals
// headless for a number of cycles. There is no CPU attached, so the boot ROM's
// first access to the slot 6 drive is stood in for by touching the motor on
// soft switch.

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use slotbus_core::{
    card::{CardType, Drive},
    config::BusConfig,
    motherboard::{Motherboard, apple2_motherboard::Apple2Motherboard},
    slot_bus::SLOT6,
};
use slotbus_utility::{SLOT_IO_BASE, SLOT_IO_SIZE, min};

// Soft switch offset that turns the selected drive's motor on.
const MOTOR_ON: u16 = 0x9;

#[derive(Parser)]
#[command(
    version,
    about = "A basic headless runner for the slot bus",
    long_about = None
)]
struct SlotBusArgs {
    #[arg(
        long = "slot",
        help = "A slot override such as 4=mouse, may be repeated",
        id = "N=card"
    )]
    slots: Vec<String>,

    #[arg(
        long = "aux",
        help = "The card for the auxiliary slot",
        id = "aux card"
    )]
    aux: Option<CardType>,

    #[arg(
        long = "disk1",
        help = "An optional disk image for slot 6 drive 1",
        id = "drive 1 image"
    )]
    disk1: Option<PathBuf>,

    #[arg(
        long = "disk2",
        help = "An optional disk image for slot 6 drive 2",
        id = "drive 2 image"
    )]
    disk2: Option<PathBuf>,

    #[arg(
        long = "enhance-disk",
        help = "Run unthrottled while a disk motor is on",
        default_value_t = true,
        action = ArgAction::Set
    )]
    enhance_disk: bool,

    #[arg(
        long = "cycles",
        help = "The number of CPU cycles to run for",
        default_value_t = 1_023_000
    )]
    cycles: u64,

    #[arg(
        long = "slice",
        help = "The number of CPU cycles per time slice",
        default_value_t = 17_030
    )]
    slice: u32,

    #[arg(
        long = "log-level",
        help = "One of off, error, warn, info, debug or trace",
        default_value = "info"
    )]
    log_level: String,
}

/// This function turns the parsed arguments into a bus configuration.
fn build_config(args: &SlotBusArgs) -> Result<BusConfig> {

    let mut config = BusConfig::new();
    config.enhance_disk = args.enhance_disk;

    for slot in &args.slots {
        config
            .apply_override(&format!("slot{}", slot))
            .with_context(|| format!("Bad slot override '{}'", slot))?;
    }

    if let Some(aux) = args.aux {
        config.aux = aux;
    }

    for (drive, image) in Drive::ALL.into_iter().zip([&args.disk1, &args.disk2]) {
        if let Some(path) = image {
            config.set_disk_image(drive, path.clone());
        }
    }

    Ok(config)
}

/// This function runs the motherboard for the requested number of cycles,
/// reporting whenever the machine enters or leaves full speed.
fn run(motherboard: &mut Apple2Motherboard, cycles: u64, slice: u32) {

    let mut remaining = cycles;
    let mut full_speed = motherboard.is_full_speed();

    while remaining > 0 {
        let step = min(remaining, slice as u64) as u32;
        motherboard.execute_cycles(step);
        remaining -= step as u64;

        if motherboard.is_full_speed() != full_speed {
            full_speed = motherboard.is_full_speed();
            log::info!(
                "{} full speed at cycle {}",
                if full_speed { "Entered" } else { "Left" },
                motherboard.total_cycles()
            );
        }
    }
}

fn main() -> Result<()> {
    let args = SlotBusArgs::parse();

    let level: LevelFilter = args
        .log_level
        .parse()
        .map_err(|_| anyhow!("Unknown log level '{}'", args.log_level))?;
    colog::default_builder().filter_level(level).init();

    if args.slice == 0 {
        return Err(anyhow!("Time slice must be at least one cycle"));
    }

    let config = build_config(&args)?;
    let mut motherboard = Apple2Motherboard::new(&config).context("Failed to lay out the slot bus")?;

    for slot in 0..config.slots.len() {
        log::info!("Slot {}: {}", slot, motherboard.slot_bus().query_slot(slot));
    }
    log::info!("Aux slot: {}", motherboard.slot_bus().query_aux());

    motherboard.power_on();

    if config.disk_images[Drive::One.index()].is_some() && config.slots[SLOT6] == CardType::Disk2 {
        let motor_on = SLOT_IO_BASE + SLOT6 as u16 * SLOT_IO_SIZE + MOTOR_ON;
        motherboard.slot_bus_mut().io_read(motor_on);
    }

    run(&mut motherboard, args.cycles, args.slice);

    motherboard.shutdown();

    Ok(())
}
