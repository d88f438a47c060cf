use bitvec::prelude::{BitSlice, Msb0};
use log::{debug, info};
use std::io::{self, Cursor, Read, Seek, Write};

use crate::bits::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::error::{HuffError, Result};
use crate::freq::FrequencyTable;
use crate::header::{read_header, write_header};
use crate::tree::CodeTree;
use crate::{Symbol, BITS_PER_INT, BITS_PER_WORD, HUFF_TREE, PSEUDO_EOF};

#[derive(Debug, Clone)]
pub struct Encoder {
    table: CodeTable,
}

impl Encoder {
    pub fn new(table: CodeTable) -> Self {
        Self { table }
    }

    /// Writes the code of every byte left in `input`, then the end-of-stream
    /// code.
    pub fn encode<R: Read, W: Write>(
        &self,
        input: &mut BitReader<R>,
        out: &mut BitWriter<W>,
    ) -> Result<()> {
        let start = out.bits_written();
        while let Some(byte) = input.read_bits(BITS_PER_WORD)? {
            out.write_code(self.code(byte as Symbol)?)?;
        }
        out.write_code(self.code(PSEUDO_EOF)?)?;
        debug!("wrote {} payload bits", out.bits_written() - start);
        Ok(())
    }

    fn code(&self, symbol: Symbol) -> Result<&BitSlice<u8, Msb0>> {
        self.table.get(symbol).ok_or_else(|| {
            // only possible when the input changed between the two passes
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("byte {symbol} was not counted in the first pass"),
            )
            .into()
        })
    }
}

#[derive(Debug, Clone)]
pub struct Decoder {
    tree: CodeTree,
}

impl Decoder {
    pub fn new(tree: CodeTree) -> Self {
        Self { tree }
    }

    /// Walks the tree one bit at a time, emitting a byte at each leaf, until
    /// the end-of-stream leaf. Returns the number of bytes emitted.
    pub fn decode<R: Read, W: Write>(
        &self,
        input: &mut BitReader<R>,
        out: &mut BitWriter<W>,
    ) -> Result<u64> {
        let root = self.tree.root();
        let mut current = root;
        let mut emitted = 0u64;

        loop {
            let bit = input.read_bit()?.ok_or(HuffError::MalformedStream)?;
            // only a tree made with `CodeTree::from_root` can have a leaf root;
            // `read_header` rejects one
            let next = current
                .child(bit)
                .ok_or(HuffError::MalformedHeader("root is a leaf"))?;

            match next.symbol() {
                Some(PSEUDO_EOF) => break,
                Some(byte) => {
                    out.write_bits(BITS_PER_WORD, u32::from(byte))?;
                    emitted += 1;
                    current = root;
                }
                None => current = next,
            }
        }

        debug!("decoded {emitted} bytes");
        Ok(emitted)
    }
}

/// Compresses all of `input` into `output`: magic, tree header, payload.
///
/// `input` is read twice, so it must be positioned at its start and support
/// rewinding. `output` is closed (padded and flushed) on success.
pub fn compress<R: Read + Seek, W: Write>(
    input: &mut BitReader<R>,
    output: &mut BitWriter<W>,
) -> Result<()> {
    let freq = FrequencyTable::count(input)?;
    let tree = CodeTree::build(&freq);
    let table = CodeTable::from_tree(&tree);
    debug!("longest code is {} bits", table.max_len());

    output.write_bits(BITS_PER_INT, HUFF_TREE)?;
    write_header(&tree, output)?;

    input.reset()?;
    Encoder::new(table).encode(input, output)?;

    let written = output.close()?;
    info!("compress: read {} bits, wrote {} bits", input.bits_read(), written);
    Ok(())
}

/// Reverses [`compress`]. `input` must be positioned at the magic number.
///
/// On error, bytes decoded before the failure may already be in `output`.
pub fn decompress<R: Read, W: Write>(
    input: &mut BitReader<R>,
    output: &mut BitWriter<W>,
) -> Result<()> {
    match input.read_bits(BITS_PER_INT)? {
        Some(HUFF_TREE) => {}
        found => return Err(HuffError::BadMagic { found }),
    }

    let tree = read_header(input)?;
    Decoder::new(tree).decode(input, output)?;

    let written = output.close()?;
    info!("decompress: read {} bits, wrote {} bits", input.bits_read(), written);
    Ok(())
}

pub fn compress_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut output = BitWriter::new(Vec::new());
    compress(&mut BitReader::new(Cursor::new(bytes)), &mut output)?;
    Ok(output.into_inner()?)
}

pub fn decompress_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut output = BitWriter::new(Vec::new());
    decompress(&mut BitReader::new(bytes), &mut output)?;
    Ok(output.into_inner()?)
}
