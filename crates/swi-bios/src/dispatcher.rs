//! Firmware call dispatcher
//!
//! Maps software interrupt numbers to HLE handlers. Handlers read their
//! arguments from r0-r3 and leave results in the same registers; anything
//! without a handler is logged as a stub and leaves the registers untouched.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use swi_core::config::HleConfig;
use swi_core::error::DecompressError;
use swi_memory::constants::{BASE_BIOS, BASE_WORKING_RAM, SIZE_BIOS};
use swi_memory::MemoryPort;

use crate::affine::{bg_affine_set, obj_affine_set};
use crate::arith;
use crate::decompress::{un_filter, un_huffman, un_lz77, un_rl, Cursors, Width};
use crate::diagnostics::{DiagLevel, DiagnosticSink};
use crate::registers::CpuCore;

/// Software interrupt numbers
pub mod swi {
    pub const SOFT_RESET: u8 = 0x00;
    pub const REGISTER_RAM_RESET: u8 = 0x01;
    pub const HALT: u8 = 0x02;
    pub const STOP: u8 = 0x03;
    pub const INTR_WAIT: u8 = 0x04;
    pub const VBLANK_INTR_WAIT: u8 = 0x05;
    pub const DIV: u8 = 0x06;
    pub const DIV_ARM: u8 = 0x07;
    pub const SQRT: u8 = 0x08;
    pub const ARC_TAN: u8 = 0x09;
    pub const ARC_TAN2: u8 = 0x0A;
    pub const CPU_SET: u8 = 0x0B;
    pub const CPU_FAST_SET: u8 = 0x0C;
    pub const BIOS_CHECKSUM: u8 = 0x0D;
    pub const BG_AFFINE_SET: u8 = 0x0E;
    pub const OBJ_AFFINE_SET: u8 = 0x0F;
    pub const BIT_UNPACK: u8 = 0x10;
    pub const LZ77_UNCOMP_WRAM: u8 = 0x11;
    pub const LZ77_UNCOMP_VRAM: u8 = 0x12;
    pub const HUFF_UNCOMP: u8 = 0x13;
    pub const RL_UNCOMP_WRAM: u8 = 0x14;
    pub const RL_UNCOMP_VRAM: u8 = 0x15;
    pub const DIFF_8BIT_UNFILTER_WRAM: u8 = 0x16;
    pub const DIFF_8BIT_UNFILTER_VRAM: u8 = 0x17;
    pub const DIFF_16BIT_UNFILTER: u8 = 0x18;
    pub const MIDI_KEY_2_FREQ: u8 = 0x1F;
}

/// One firmware call in flight: the call number plus exclusive access to
/// the CPU, memory and diagnostic sink for its duration.
pub struct SwiCall<'a> {
    pub number: u8,
    pub cpu: &'a mut dyn CpuCore,
    pub memory: &'a mut dyn MemoryPort,
    pub log: &'a mut dyn DiagnosticSink,
}

impl SwiCall<'_> {
    /// Read argument register `index`
    pub fn arg(&self, index: usize) -> u32 {
        self.cpu.registers().gprs[index]
    }

    /// Write result register `index`
    pub fn set_result(&mut self, index: usize, value: u32) {
        self.cpu.registers_mut().gprs[index] = value;
    }

    fn diag(&mut self, level: DiagLevel, message: fmt::Arguments<'_>) {
        self.log.log(level, message);
    }
}

/// HLE handler
pub type SwiFn = fn(&mut SwiCall<'_>);

/// HLE function info
#[derive(Clone)]
pub struct SwiFunctionInfo {
    /// Firmware call name (for debugging)
    pub name: &'static str,
    /// Handler function
    pub handler: SwiFn,
}

/// Firmware call dispatcher
pub struct SwiDispatcher {
    /// Map of call number -> function info
    table: HashMap<u8, SwiFunctionInfo>,
    /// Send every call to the real firmware instead
    full_bios: bool,
    /// Call statistics
    call_counts: HashMap<u8, u64>,
}

impl SwiDispatcher {
    /// Create a dispatcher with every HLE call registered
    pub fn new() -> Self {
        let mut dispatcher = Self {
            table: HashMap::new(),
            full_bios: false,
            call_counts: HashMap::new(),
        };
        register_all_swi_functions(&mut dispatcher);
        dispatcher
    }

    /// Create a dispatcher configured from the HLE settings
    pub fn with_config(config: &HleConfig) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.set_full_bios(config.full_bios);
        dispatcher
    }

    /// Route every call to the real firmware trap
    pub fn set_full_bios(&mut self, full_bios: bool) {
        self.full_bios = full_bios;
    }

    pub fn full_bios(&self) -> bool {
        self.full_bios
    }

    /// Register a handler for a call number, replacing any previous one
    pub fn register(&mut self, number: u8, name: &'static str, handler: SwiFn) {
        debug!("Registering SWI 0x{:02x} -> {}", number, name);
        self.table.insert(number, SwiFunctionInfo { name, handler });
    }

    /// Get function info for a call number
    pub fn get_function_info(&self, number: u8) -> Option<&SwiFunctionInfo> {
        self.table.get(&number)
    }

    /// Look up a call number by firmware call name
    pub fn find_by_name(&self, name: &str) -> Option<u8> {
        self.table
            .iter()
            .find(|(_, info)| info.name.eq_ignore_ascii_case(name))
            .map(|(&number, _)| number)
    }

    /// Get the number of times a call number was handled
    pub fn call_count(&self, number: u8) -> u64 {
        *self.call_counts.get(&number).unwrap_or(&0)
    }

    /// Get number of registered calls
    pub fn function_count(&self) -> usize {
        self.table.len()
    }

    /// Dispatch a THUMB-mode `swi` with its 8-bit comment field
    pub fn dispatch(
        &mut self,
        number: u8,
        cpu: &mut dyn CpuCore,
        memory: &mut dyn MemoryPort,
        log: &mut dyn DiagnosticSink,
    ) {
        let gprs = cpu.registers().gprs;
        log.log(
            DiagLevel::Swi,
            format_args!(
                "SWI: {:02X} r0: {:08X} r1: {:08X} r2: {:08X} r3: {:08X}",
                number, gprs[0], gprs[1], gprs[2], gprs[3]
            ),
        );

        if self.full_bios {
            cpu.raise_swi();
            return;
        }

        let Some(info) = self.table.get(&number) else {
            log.log(DiagLevel::Stub, format_args!("Stub software interrupt: {:02X}", number));
            return;
        };
        let handler = info.handler;
        *self.call_counts.entry(number).or_insert(0) += 1;

        let mut call = SwiCall {
            number,
            cpu,
            memory,
            log,
        };
        handler(&mut call);
    }

    /// Dispatch an ARM-mode `swi` with its 24-bit comment field
    pub fn dispatch_arm(
        &mut self,
        comment: u32,
        cpu: &mut dyn CpuCore,
        memory: &mut dyn MemoryPort,
        log: &mut dyn DiagnosticSink,
    ) {
        self.dispatch((comment >> 16) as u8, cpu, memory, log);
    }
}

impl Default for SwiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Register every HLE firmware call
pub fn register_all_swi_functions(dispatcher: &mut SwiDispatcher) {
    dispatcher.register(swi::REGISTER_RAM_RESET, "RegisterRamReset", hle_register_ram_reset);
    dispatcher.register(swi::HALT, "Halt", hle_halt);
    dispatcher.register(swi::INTR_WAIT, "IntrWait", hle_raise_trap);
    dispatcher.register(swi::VBLANK_INTR_WAIT, "VBlankIntrWait", hle_raise_trap);
    dispatcher.register(swi::DIV, "Div", hle_div);
    dispatcher.register(swi::DIV_ARM, "DivArm", hle_div_arm);
    dispatcher.register(swi::SQRT, "Sqrt", hle_sqrt);
    dispatcher.register(swi::ARC_TAN2, "ArcTan2", hle_arc_tan2);
    dispatcher.register(swi::CPU_SET, "CpuSet", hle_raise_trap);
    dispatcher.register(swi::CPU_FAST_SET, "CpuFastSet", hle_raise_trap);
    dispatcher.register(swi::BIOS_CHECKSUM, "BiosChecksum", hle_bios_checksum);
    dispatcher.register(swi::BG_AFFINE_SET, "BgAffineSet", hle_bg_affine_set);
    dispatcher.register(swi::OBJ_AFFINE_SET, "ObjAffineSet", hle_obj_affine_set);
    dispatcher.register(swi::LZ77_UNCOMP_WRAM, "LZ77UnCompWram", hle_lz77_wram);
    dispatcher.register(swi::LZ77_UNCOMP_VRAM, "LZ77UnCompVram", hle_lz77_vram);
    dispatcher.register(swi::HUFF_UNCOMP, "HuffUnComp", hle_huffman);
    dispatcher.register(swi::RL_UNCOMP_WRAM, "RLUnCompWram", hle_rl_wram);
    dispatcher.register(swi::RL_UNCOMP_VRAM, "RLUnCompVram", hle_rl_vram);
    dispatcher.register(swi::DIFF_8BIT_UNFILTER_WRAM, "Diff8bitUnFilterWram", hle_unfilter_8);
    dispatcher.register(swi::DIFF_8BIT_UNFILTER_VRAM, "Diff8bitUnFilterVram", hle_unfilter_8_to_16);
    dispatcher.register(swi::DIFF_16BIT_UNFILTER, "Diff16bitUnFilter", hle_unfilter_16);
    dispatcher.register(swi::MIDI_KEY_2_FREQ, "MidiKey2Freq", hle_midi_key_2_freq);
}

// ============================================================================
// System calls
// ============================================================================

fn hle_register_ram_reset(call: &mut SwiCall<'_>) {
    call.diag(DiagLevel::Stub, format_args!("RegisterRamReset unimplemented"));
}

fn hle_halt(call: &mut SwiCall<'_>) {
    call.cpu.halt();
}

/// Calls that need the interrupt controller or a cycle-faithful copy loop
/// run in real firmware code.
fn hle_raise_trap(call: &mut SwiCall<'_>) {
    debug!("SWI 0x{:02x} deferred to firmware", call.number);
    call.cpu.raise_swi();
}

// ============================================================================
// Arithmetic
// ============================================================================

fn divide(call: &mut SwiCall<'_>, num: i32, denom: i32) {
    if denom == 0 {
        call.diag(DiagLevel::GameError, format_args!("Attempting to divide {} by zero!", num));
    }
    let result = arith::div(num, denom);
    call.set_result(0, result.quotient as u32);
    call.set_result(1, result.remainder as u32);
    call.set_result(3, result.abs_quotient);
}

fn hle_div(call: &mut SwiCall<'_>) {
    let (num, denom) = (call.arg(0) as i32, call.arg(1) as i32);
    divide(call, num, denom);
}

fn hle_div_arm(call: &mut SwiCall<'_>) {
    let (num, denom) = (call.arg(1) as i32, call.arg(0) as i32);
    divide(call, num, denom);
}

fn hle_sqrt(call: &mut SwiCall<'_>) {
    let root = arith::sqrt(call.arg(0));
    call.set_result(0, root);
}

fn hle_arc_tan2(call: &mut SwiCall<'_>) {
    let angle = arith::arc_tan2(call.arg(0) as i32, call.arg(1) as i32);
    call.set_result(0, angle as u32);
}

fn hle_midi_key_2_freq(call: &mut SwiCall<'_>) {
    let base_freq = call.memory.load32(call.arg(0).wrapping_add(4));
    let freq = arith::midi_key_to_freq(base_freq, call.arg(1) as i32, call.arg(2) as i32);
    call.set_result(0, freq);
}

/// The checksum result lands in r0 and then BgAffineSet runs with it as the
/// source pointer, the way the firmware call table falls through.
fn hle_bios_checksum(call: &mut SwiCall<'_>) {
    let sum = arith::checksum(&*call.memory, BASE_BIOS, SIZE_BIOS);
    call.set_result(0, sum);
    hle_bg_affine_set(call);
}

// ============================================================================
// Affine setup
// ============================================================================

fn hle_bg_affine_set(call: &mut SwiCall<'_>) {
    let (source, dest, count) = (call.arg(0), call.arg(1), call.arg(2));
    bg_affine_set(call.memory, source, dest, count);
}

fn hle_obj_affine_set(call: &mut SwiCall<'_>) {
    let (source, dest, count, stride) = (call.arg(0), call.arg(1), call.arg(2), call.arg(3));
    obj_affine_set(call.memory, source, dest, count, stride);
}

// ============================================================================
// Decompression
// ============================================================================

/// Validate r0/r1 for a decompression call.
///
/// A source below work RAM is only diagnosed; a destination outside the
/// writable RAM regions stops the call.
fn decompress_args(call: &mut SwiCall<'_>, codec: &str) -> Option<(u32, u32)> {
    let (source, dest) = (call.arg(0), call.arg(1));
    if source < BASE_WORKING_RAM {
        call.diag(DiagLevel::GameError, format_args!("Bad {} source", codec));
    }
    if !call.memory.region_of(dest).is_decompress_target() {
        call.diag(DiagLevel::GameError, format_args!("Bad {} destination", codec));
        return None;
    }
    Some((source, dest))
}

fn store_cursors(call: &mut SwiCall<'_>, cursors: Cursors) {
    call.set_result(0, cursors.source);
    call.set_result(1, cursors.dest);
}

fn lz77(call: &mut SwiCall<'_>, width: Width) {
    let Some((source, dest)) = decompress_args(call, "LZ77") else {
        return;
    };
    let cursors = un_lz77(call.memory, source, dest, width);
    store_cursors(call, cursors);
    call.set_result(3, 0);
}

fn hle_lz77_wram(call: &mut SwiCall<'_>) {
    lz77(call, Width::Byte);
}

fn hle_lz77_vram(call: &mut SwiCall<'_>) {
    lz77(call, Width::Halfword);
}

fn hle_huffman(call: &mut SwiCall<'_>) {
    let Some((source, dest)) = decompress_args(call, "Huffman") else {
        return;
    };
    match un_huffman(call.memory, source, dest) {
        Ok(cursors) => store_cursors(call, cursors),
        Err(err @ DecompressError::UnalignedHuffman { .. }) => {
            call.diag(DiagLevel::Stub, format_args!("{}", err))
        }
        Err(err) => call.diag(DiagLevel::GameError, format_args!("{}", err)),
    }
}

fn rl(call: &mut SwiCall<'_>, width: Width) {
    let Some((source, dest)) = decompress_args(call, "RL") else {
        return;
    };
    let cursors = un_rl(call.memory, source, dest, width);
    store_cursors(call, cursors);
}

fn hle_rl_wram(call: &mut SwiCall<'_>) {
    rl(call, Width::Byte);
}

fn hle_rl_vram(call: &mut SwiCall<'_>) {
    rl(call, Width::Halfword);
}

fn unfilter(call: &mut SwiCall<'_>, in_width: Width, out_width: Width) {
    let Some((source, dest)) = decompress_args(call, "UnFilter") else {
        return;
    };
    let cursors = un_filter(call.memory, source, dest, in_width, out_width);
    store_cursors(call, cursors);
}

fn hle_unfilter_8(call: &mut SwiCall<'_>) {
    unfilter(call, Width::Byte, Width::Byte);
}

fn hle_unfilter_8_to_16(call: &mut SwiCall<'_>) {
    unfilter(call, Width::Byte, Width::Halfword);
}

fn hle_unfilter_16(call: &mut SwiCall<'_>) {
    unfilter(call, Width::Halfword, Width::Halfword);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::registers::{CpuState, RegisterFile};
    use swi_memory::MemoryManager;

    fn run(dispatcher: &mut SwiDispatcher, number: u8, args: [u32; 4], mem: &mut MemoryManager) -> (CpuState, RecordingSink) {
        let mut cpu = CpuState::new(RegisterFile::with_args(args));
        let mut log = RecordingSink::new();
        dispatcher.dispatch(number, &mut cpu, mem, &mut log);
        (cpu, log)
    }

    #[test]
    fn test_dispatcher_creation() {
        let dispatcher = SwiDispatcher::new();
        assert_eq!(dispatcher.function_count(), 22);
        assert!(!dispatcher.full_bios());
        assert_eq!(dispatcher.get_function_info(swi::HUFF_UNCOMP).unwrap().name, "HuffUnComp");
        assert!(dispatcher.get_function_info(swi::SOFT_RESET).is_none());
    }

    #[test]
    fn test_find_by_name() {
        let dispatcher = SwiDispatcher::new();
        assert_eq!(dispatcher.find_by_name("lz77uncompvram"), Some(swi::LZ77_UNCOMP_VRAM));
        assert_eq!(dispatcher.find_by_name("Diff16bitUnFilter"), Some(swi::DIFF_16BIT_UNFILTER));
        assert_eq!(dispatcher.find_by_name("SoundBias"), None);
    }

    #[test]
    fn test_unknown_call_is_stub() {
        let mut dispatcher = SwiDispatcher::new();
        let mut mem = MemoryManager::new();
        let (cpu, log) = run(&mut dispatcher, 0x19, [1, 2, 3, 4], &mut mem);

        assert_eq!(cpu.regs, RegisterFile::with_args([1, 2, 3, 4]));
        assert_eq!(log.messages(DiagLevel::Stub), vec!["Stub software interrupt: 19"]);
        assert!(log.contains(DiagLevel::Swi, "SWI: 19 r0: 00000001"));
        assert_eq!(dispatcher.call_count(0x19), 0);
    }

    #[test]
    fn test_call_counts() {
        let mut dispatcher = SwiDispatcher::new();
        let mut mem = MemoryManager::new();
        run(&mut dispatcher, swi::SQRT, [16, 0, 0, 0], &mut mem);
        run(&mut dispatcher, swi::SQRT, [81, 0, 0, 0], &mut mem);
        assert_eq!(dispatcher.call_count(swi::SQRT), 2);
        assert_eq!(dispatcher.call_count(swi::DIV), 0);
    }

    #[test]
    fn test_custom_registration_replaces_handler() {
        fn always_seven(call: &mut SwiCall<'_>) {
            call.set_result(0, 7);
        }

        let mut dispatcher = SwiDispatcher::new();
        dispatcher.register(swi::SQRT, "Sqrt", always_seven);
        let mut mem = MemoryManager::new();
        let (cpu, _) = run(&mut dispatcher, swi::SQRT, [100, 0, 0, 0], &mut mem);
        assert_eq!(cpu.regs.gprs[0], 7);
    }
}
