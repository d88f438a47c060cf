use thiserror::Error;

use crate::HUFF_NUMBER;

#[derive(Error, Debug)]
pub enum HuffError {
    /// First 32 bits were not the tree-header tag, or the file is shorter than that.
    #[error("bad magic number: {}", describe_magic(.found))]
    BadMagic { found: Option<u32> },

    #[error("malformed header: {0}")]
    MalformedHeader(&'static str),

    #[error("malformed stream: input ended before the end-of-stream marker")]
    MalformedStream,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_magic(found: &Option<u32>) -> String {
    match found {
        None => "file too short to hold one".to_string(),
        Some(HUFF_NUMBER) => format!("{HUFF_NUMBER:#010x} is the legacy counts-table format"),
        Some(v) => format!("{v:#010x}"),
    }
}

pub type Result<T, E = HuffError> = std::result::Result<T, E>;
