//! CPU-side collaborators of the firmware call layer

/// General purpose register file.
///
/// Calls take their arguments from r0-r3 and return results in the same slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterFile {
    pub gprs: [u32; 16],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a register file with r0-r3 preloaded
    pub fn with_args(args: [u32; 4]) -> Self {
        let mut regs = Self::new();
        regs.gprs[..4].copy_from_slice(&args);
        regs
    }
}

/// The instruction core a call executes on behalf of.
///
/// Besides the register file it exposes the two effects the HLE layer cannot
/// perform itself: entering the real firmware's exception vector and halting
/// until the next interrupt.
pub trait CpuCore {
    fn registers(&self) -> &RegisterFile;

    fn registers_mut(&mut self) -> &mut RegisterFile;

    /// Take the software interrupt exception into real firmware code
    fn raise_swi(&mut self);

    /// Stop executing until an interrupt arrives
    fn halt(&mut self);
}

/// Minimal `CpuCore` for hosts without an instruction core attached.
///
/// Trap and halt requests are latched so the host can act on them after the
/// call returns.
#[derive(Debug, Clone, Default)]
pub struct CpuState {
    pub regs: RegisterFile,
    /// Number of times the real exception vector was requested
    pub swi_raised: u32,
    pub halted: bool,
}

impl CpuState {
    pub fn new(regs: RegisterFile) -> Self {
        Self {
            regs,
            ..Self::default()
        }
    }
}

impl CpuCore for CpuState {
    fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    fn raise_swi(&mut self) {
        self.swi_raised += 1;
    }

    fn halt(&mut self) {
        self.halted = true;
    }
}
