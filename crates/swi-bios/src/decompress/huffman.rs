//! Huffman decompression (HuffUnComp)
//!
//! Stream layout after the header:
//!
//! ```text
//! +4  tree size byte n, the table spans (n + 1) * 2 bytes including itself
//! +5  root node
//! ... tree nodes and leaf symbols
//! ... 32-bit bitstream words, consumed most significant bit first
//! ```

use super::{decompressed_length, Cursors};
use swi_core::error::DecompressError;
use swi_memory::MemoryPort;

/// Distance to a node's child pair, in halfword steps
pub fn node_offset(node: u8) -> u32 {
    (node & 0x3F) as u32
}

/// The right child (bit set) is a leaf symbol
pub fn is_right_terminal(node: u8) -> bool {
    node & 0x40 != 0
}

/// The left child (bit clear) is a leaf symbol
pub fn is_left_terminal(node: u8) -> bool {
    node & 0x80 != 0
}

/// Address of a node's left child; the right child follows it
pub fn child_address(node_addr: u32, node: u8) -> u32 {
    (node_addr & !1)
        .wrapping_add(node_offset(node) * 2)
        .wrapping_add(2)
}

/// Check that an internal node lies inside the tree table
fn enter_node(addr: u32, tree_base: u32, tree_size: u32) -> Result<u32, DecompressError> {
    let offset = addr.wrapping_sub(tree_base);
    if offset >= tree_size {
        return Err(DecompressError::HuffmanTreeOverrun { offset });
    }
    Ok(addr)
}

/// Decode a Huffman stream from `source` to `dest`.
///
/// The low nibble of the header is the symbol size in bits, which must
/// divide 32. Symbols are packed into words least significant bits first and
/// stored a word at a time. On an unsupported symbol size nothing is written.
///
/// Child links only ever point forward, so a tree without terminal flags
/// would walk off through memory without producing a symbol. The walk is
/// stopped with an error once an internal node lies outside the tree table;
/// words already stored stay in place.
pub fn un_huffman(memory: &mut dyn MemoryPort, source: u32, dest: u32) -> Result<Cursors, DecompressError> {
    let mut source = source & !3;
    let header = memory.load32(source);
    let mut remaining = decompressed_length(header);
    let bits = header & 0xF;
    if bits == 0 || 32 % bits != 0 {
        return Err(DecompressError::UnalignedHuffman { bits });
    }

    let padding = 4u32.wrapping_sub(remaining) & 3;
    remaining &= !3;
    let symbol_mask = (1u32 << bits) - 1;

    let tree_size = ((memory.load_u8(source.wrapping_add(4)) as u32) << 1) + 1;
    let tree_base = source.wrapping_add(5);
    source = tree_base.wrapping_add(tree_size);

    let mut dest = dest;
    let mut node_addr = tree_base;
    let mut node = memory.load_u8(node_addr);
    let mut block = 0u32;
    let mut bits_seen = 0;

    while remaining > 0 {
        let mut bitstream = memory.load32(source);
        source = source.wrapping_add(4);

        for _ in 0..32 {
            if remaining == 0 {
                break;
            }
            let go_right = bitstream & 0x8000_0000 != 0;
            bitstream <<= 1;

            let next = child_address(node_addr, node);
            let symbol = if go_right {
                if !is_right_terminal(node) {
                    node_addr = enter_node(next.wrapping_add(1), tree_base, tree_size)?;
                    node = memory.load_u8(node_addr);
                    continue;
                }
                memory.load_u8(next.wrapping_add(1))
            } else {
                if !is_left_terminal(node) {
                    node_addr = enter_node(next, tree_base, tree_size)?;
                    node = memory.load_u8(node_addr);
                    continue;
                }
                memory.load_u8(next)
            };

            block |= (symbol as u32 & symbol_mask) << bits_seen;
            bits_seen += bits;
            node_addr = tree_base;
            node = memory.load_u8(node_addr);

            if bits_seen == 32 {
                bits_seen = 0;
                memory.store32(dest, block);
                dest = dest.wrapping_add(4);
                remaining -= 4;
                block = 0;
            }
        }
    }

    if padding != 0 {
        memory.store32(dest, block);
    }

    Ok(Cursors { source, dest })
}
