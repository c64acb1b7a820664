//! Error types for the swi-hle firmware call layer

use thiserror::Error;

/// Main error type for host-side operations
#[derive(Error, Debug)]
pub enum HleError {
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown firmware call: {0}")]
    UnknownCall(String),
}

/// Memory-related errors
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Firmware image must be 0x{expected:x} bytes, got 0x{actual:x}")]
    BadFirmwareSize { expected: usize, actual: usize },

    #[error("Cartridge image too large: 0x{0:x} bytes")]
    RomTooLarge(usize),
}

/// Decoder failures that abort a decompression call
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    #[error("Unimplemented unaligned Huffman: {bits}-bit symbols")]
    UnalignedHuffman { bits: u32 },

    #[error("Huffman tree walk left the table at offset 0x{offset:x}")]
    HuffmanTreeOverrun { offset: u32 },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type alias for host-side operations
pub type Result<T> = std::result::Result<T, HleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::BadFirmwareSize {
            expected: 0x4000,
            actual: 0x10,
        };
        assert_eq!(
            format!("{}", err),
            "Firmware image must be 0x4000 bytes, got 0x10"
        );

        let err = DecompressError::UnalignedHuffman { bits: 3 };
        assert_eq!(format!("{}", err), "Unimplemented unaligned Huffman: 3-bit symbols");

        let err = DecompressError::HuffmanTreeOverrun { offset: 0x1F };
        assert_eq!(format!("{}", err), "Huffman tree walk left the table at offset 0x1f");
    }

    #[test]
    fn test_error_conversion() {
        let mem_err = MemoryError::RomTooLarge(0x300_0000);
        let err: HleError = mem_err.into();
        assert!(matches!(err, HleError::Memory(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HleError = io_err.into();
        assert!(matches!(err, HleError::Io(_)));

        let err = HleError::UnknownCall("lz78".to_string());
        assert_eq!(format!("{}", err), "Unknown firmware call: lz78");
    }
}
