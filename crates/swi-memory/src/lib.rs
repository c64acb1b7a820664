//! Memory access for the swi-hle firmware call layer
//!
//! This crate provides the typed memory port consumed by the firmware call
//! implementations, the region classification used to validate call
//! arguments, and a `MemoryManager` that backs the console's address map.

pub mod constants;
pub mod manager;
pub mod port;
pub mod region;

pub use constants::*;
pub use manager::MemoryManager;
pub use port::MemoryPort;
pub use region::Region;
