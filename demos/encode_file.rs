use std::env;
use std::fs::{self, File};
use treehuff::{compress, decompress, BitReader, BitWriter};

fn main() -> anyhow::Result<()> {
    let fp = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Please provide path to input file as first argument."))?;

    // encode scope - save to file
    {
        let mut input = BitReader::new(File::open(&fp)?);
        let mut output = BitWriter::new(File::create("encoded.hf")?);
        compress(&mut input, &mut output)?;
    }

    // decode scope - read from file
    {
        let mut input = BitReader::new(File::open("encoded.hf")?);
        let mut output = BitWriter::new(File::create("decoded.bin")?);
        decompress(&mut input, &mut output)?;
    }

    let original = fs::read(&fp)?;
    let encoded = fs::metadata("encoded.hf")?.len();
    println!(
        "{} bytes -> {} bytes, round trip {}",
        original.len(),
        encoded,
        if fs::read("decoded.bin")? == original { "ok" } else { "MISMATCH" }
    );
    Ok(())
}
