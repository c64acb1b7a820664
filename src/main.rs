//! swi-hle - run a single firmware decompression call on a file
//!
//! Main entry point for the command-line front end.

use anyhow::{bail, Context};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use swi_bios::{arith, swi, CpuState, RegisterFile, SwiDispatcher, TracingSink};
use swi_core::{logging, Config, HleError};
use swi_memory::{constants::*, MemoryManager};

/// Call names accepted on the command line
const CALLS: &[(&str, u8)] = &[
    ("lz77", swi::LZ77_UNCOMP_WRAM),
    ("lz77-vram", swi::LZ77_UNCOMP_VRAM),
    ("huffman", swi::HUFF_UNCOMP),
    ("rle", swi::RL_UNCOMP_WRAM),
    ("rle-vram", swi::RL_UNCOMP_VRAM),
    ("unfilter8", swi::DIFF_8BIT_UNFILTER_WRAM),
    ("unfilter8-vram", swi::DIFF_8BIT_UNFILTER_VRAM),
    ("unfilter16", swi::DIFF_16BIT_UNFILTER),
];

fn usage(program: &str) {
    eprintln!("Usage: {} <call> <input> [options]", program);
    eprintln!();
    eprintln!("Calls:");
    for (name, number) in CALLS {
        eprintln!("  {:<16} SWI 0x{:02X}", name, number);
    }
    eprintln!("  <hex>            any call number, e.g. 0x11");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o <output>      Write the decompressed bytes to a file");
    eprintln!("  --bios <image>   Load a 16 KiB firmware image");
    eprintln!("  --full-bios      Send the call to the firmware instead of HLE");
}

fn parse_call(name: &str) -> swi_core::Result<u8> {
    if let Some(&(_, number)) = CALLS.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        return Ok(number);
    }
    let hex = name.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(hex, 16).map_err(|_| HleError::UnknownCall(name.to_string()))
}

/// Map the compressed input into cartridge ROM and the firmware image, if
/// any, into the firmware region
fn load_memory(input: &[u8], bios: Option<&Path>) -> swi_core::Result<MemoryManager> {
    let mut memory = MemoryManager::new();
    memory.load_rom(input)?;
    if let Some(path) = bios {
        let image = fs::read(path)?;
        memory.load_bios(&image)?;
        tracing::info!("Firmware image: {}", firmware_identity(&memory));
    }
    Ok(memory)
}

fn option_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1))
}

fn firmware_identity(memory: &MemoryManager) -> &'static str {
    match arith::checksum(memory, BASE_BIOS, SIZE_BIOS) {
        GBA_BIOS_CHECKSUM => "GBA",
        GBA_DS_BIOS_CHECKSUM => "DS-mode GBA",
        _ => "unknown",
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage(args.first().map(String::as_str).unwrap_or("swi-hle"));
        std::process::exit(1);
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("Ignoring configuration: {}", err);
        Config::default()
    });
    if let Some(path) = option_value(&args, "--bios") {
        config.hle.bios_path = Some(PathBuf::from(path));
    }
    if args.iter().any(|a| a == "--full-bios") {
        config.hle.full_bios = true;
    }

    logging::init_logging(&config.debug);

    let number = parse_call(&args[1])?;
    let input = fs::read(&args[2]).with_context(|| format!("reading {}", args[2]))?;

    let mut memory = load_memory(&input, config.hle.bios_path.as_deref())
        .context("setting up the memory map")?;

    let mut dispatcher = SwiDispatcher::with_config(&config.hle);
    let name = dispatcher
        .get_function_info(number)
        .map(|info| info.name)
        .unwrap_or("unknown");
    tracing::info!("Running SWI 0x{:02X} ({}) on {} bytes", number, name, input.len());

    let mut cpu = CpuState::new(RegisterFile::with_args([BASE_CART0, BASE_WORKING_RAM, 0, 0]));
    dispatcher.dispatch(number, &mut cpu, &mut memory, &mut TracingSink);

    if cpu.swi_raised > 0 {
        bail!("SWI 0x{:02X} needs the real firmware and cannot run standalone", number);
    }

    let produced = cpu.regs.gprs[1].wrapping_sub(BASE_WORKING_RAM).min(SIZE_WORKING_RAM);
    let output = memory.read_bytes(BASE_WORKING_RAM, produced);

    match option_value(&args, "-o") {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("writing {}", path))?;
            println!("Wrote {} bytes to {}", output.len(), path);
        }
        None => println!("Decompressed {} bytes", output.len()),
    }

    Ok(())
}
