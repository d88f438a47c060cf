use log::{debug, trace};
use std::io::Read;

use crate::bits::BitReader;
use crate::error::Result;
use crate::{Symbol, ALPHABET_SIZE, BITS_PER_WORD, PSEUDO_EOF};

/// Occurrence counts for every symbol, sentinel included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Consumes `input` to the end, counting each byte.
    pub fn count<R: Read>(input: &mut BitReader<R>) -> Result<Self> {
        let mut counts = [0u64; ALPHABET_SIZE];
        while let Some(byte) = input.read_bits(BITS_PER_WORD)? {
            counts[byte as usize] += 1;
        }
        Ok(Self::with_sentinel(counts))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &b in bytes {
            counts[b as usize] += 1;
        }
        Self::with_sentinel(counts)
    }

    fn with_sentinel(mut counts: [u64; ALPHABET_SIZE]) -> Self {
        counts[PSEUDO_EOF as usize] = 1;
        let table = Self { counts };
        debug!(
            "counted {} bytes, {} distinct values",
            table.total_bytes(),
            table.live().count() - 1
        );
        trace!("frequencies: {:?}", table.live().collect::<Vec<_>>());
        table
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts[symbol as usize]
    }

    /// Symbols with a nonzero count, in ascending symbol order.
    pub fn live(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as Symbol, c))
    }

    /// Number of input bytes counted; the sentinel is not one of them.
    pub fn total_bytes(&self) -> u64 {
        self.counts[..PSEUDO_EOF as usize].iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_each_byte() {
        let mut r = BitReader::new(Cursor::new(b"AAAB".to_vec()));
        let table = FrequencyTable::count(&mut r).unwrap();

        assert_eq!(table.get(65), 3);
        assert_eq!(table.get(66), 1);
        assert_eq!(table.get(PSEUDO_EOF), 1);
        assert_eq!(table.live().collect::<Vec<_>>(), vec![(65, 3), (66, 1), (256, 1)]);
        assert_eq!(table.total_bytes(), 4);
        assert_eq!(table, FrequencyTable::from_bytes(b"AAAB"));
    }

    #[test]
    fn empty_input_has_only_sentinel() {
        let mut r = BitReader::new(Cursor::new(Vec::new()));
        let table = FrequencyTable::count(&mut r).unwrap();

        assert_eq!(table.live().collect::<Vec<_>>(), vec![(PSEUDO_EOF, 1)]);
        assert_eq!(table.total_bytes(), 0);
    }

    #[test]
    fn every_byte_value_counted() {
        let bytes: Vec<u8> = (0..=255).chain(0..=255).collect();
        let table = FrequencyTable::from_bytes(&bytes);

        assert_eq!(table.live().count(), ALPHABET_SIZE);
        assert!((0..256).all(|s| table.get(s) == 2));
    }
}
