//! Static Huffman compression with the code tree stored in the file header.
//!
//! A compressed file is a 32-bit magic number ([`HUFF_TREE`]), the code tree
//! written pre-order, then the code of every input byte followed by the code
//! of the end-of-stream symbol [`PSEUDO_EOF`], padded to a whole byte.
//!
//! ```
//! let packed = treehuff::compress_bytes(b"AAAB")?;
//! assert_eq!(treehuff::decompress_bytes(&packed)?, b"AAAB");
//! # Ok::<(), treehuff::HuffError>(())
//! ```

pub mod bits;
pub mod code;
pub mod codec;
pub mod error;
pub mod freq;
pub mod header;
pub mod tree;

pub use bits::{BitReader, BitWriter};
pub use code::{CodeReport, CodeTable};
pub use codec::{compress, compress_bytes, decompress, decompress_bytes, Decoder, Encoder};
pub use error::HuffError;
pub use freq::FrequencyTable;
pub use tree::{CodeTree, Node};

/// A byte value, or [`PSEUDO_EOF`].
pub type Symbol = u16;

pub const BITS_PER_WORD: u32 = 8;
pub const BITS_PER_INT: u32 = 32;

/// Width of a symbol in the tree header; enough for `0..=256`.
pub const SYMBOL_BITS: u32 = BITS_PER_WORD + 1;

/// Every byte value plus the end-of-stream symbol.
pub const ALPHABET_SIZE: usize = (1 << BITS_PER_WORD) + 1;

/// Marks the end of the payload. Never a byte of real input.
pub const PSEUDO_EOF: Symbol = 1 << BITS_PER_WORD;

/// Magic of the older format that stored a counts table instead of a tree.
/// Recognized only to report it.
pub const HUFF_NUMBER: u32 = 0xface_8200;
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;
