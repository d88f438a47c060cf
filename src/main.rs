use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use treehuff::{BitReader, BitWriter, CodeReport, CodeTree, FrequencyTable};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more; repeat for more detail. RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compresses a file
    Compress {
        input: PathBuf,
        output: PathBuf,
    },

    /// Restores a file written by `compress`
    Decompress {
        input: PathBuf,
        output: PathBuf,
    },

    /// Prints the code a file would be compressed with, as JSON
    Inspect { input: PathBuf },
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("cannot open {}", path.display()))
}

fn create(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("cannot create {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Compress { input, output } => {
            let mut reader = BitReader::new(open(&input)?);
            let mut writer = BitWriter::new(create(&output)?);
            treehuff::compress(&mut reader, &mut writer)
                .with_context(|| format!("compressing {}", input.display()))?;
        }
        Command::Decompress { input, output } => {
            let mut reader = BitReader::new(open(&input)?);
            let mut writer = BitWriter::new(create(&output)?);
            treehuff::decompress(&mut reader, &mut writer)
                .with_context(|| format!("decompressing {}", input.display()))?;
        }
        Command::Inspect { input } => {
            let freq = FrequencyTable::count(&mut BitReader::new(open(&input)?))
                .with_context(|| format!("reading {}", input.display()))?;
            let report = CodeReport::new(&freq, &CodeTree::build(&freq));

            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
