//! HLE (High Level Emulation) of the console firmware's service calls
//!
//! Instead of running the firmware's machine code, each software interrupt
//! is implemented directly against the CPU register file and memory port.

pub mod affine;
pub mod arith;
pub mod decompress;
pub mod diagnostics;
pub mod dispatcher;
pub mod registers;

pub use diagnostics::{DiagLevel, DiagnosticSink, RecordingSink, TracingSink};
pub use dispatcher::{swi, SwiCall, SwiDispatcher, SwiFn, SwiFunctionInfo};
pub use registers::{CpuCore, CpuState, RegisterFile};
