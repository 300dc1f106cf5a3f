use std::fs::File;
use std::io::BufReader;

use clap::Parser;
use eyre::{Context, Result};
use log::info;

use offsetdump::cli::{Cli, Command, CommonArgs, DataType};
use offsetdump::config::Config;
use offsetdump::offsets::{self, OffsetFormat};
use offsetdump::pipeline::Pipeline;
use offsetdump::sink::OutputSink;
use offsetdump::spec::{ExtractionSpec, Mode, OffsetBase};

fn setup_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let (format, base, common): (OffsetFormat, OffsetBase, CommonArgs) = match cli.command {
        Command::Yara { common } => (OffsetFormat::HexPrefixed, OffsetBase::Hex, common),
        Command::Strings {
            offset_type,
            common,
        } => (OffsetFormat::LeadingNumeric(offset_type), offset_type, common),
    };

    let offsets = match &common.offsetfile {
        Some(path) => {
            let file = File::open(path)
                .context(format!("Failed to open offset file: {}", path.display()))?;
            offsets::parse_offsets(BufReader::new(file), format)?
        }
        None => offsets::parse_offsets(std::io::stdin().lock(), format)?,
    };
    info!("parsed {} unique offsets", offsets.len());

    let spec = ExtractionSpec {
        mode: match common.datatype {
            DataType::Lines => Mode::Line(common.linesep.unwrap_or(config.linesep)),
            DataType::Blocks => Mode::Block,
        },
        size: common.blocksize.unwrap_or(config.blocksize),
        before: common.before,
        after: common.after,
        dedup: common.nodupes,
        base,
        strict: common.strict,
    };
    let mut pipeline = Pipeline::new(spec)?;

    // The output directory precondition is checked before any extraction
    let mut sink = match &common.outdir {
        Some(dir) => OutputSink::directory(dir.clone(), base)?,
        None => OutputSink::stdout(),
    };

    let mut infile = File::open(&common.infile).context(format!(
        "Failed to open input file: {}",
        common.infile.display()
    ))?;

    let summary = pipeline.run(&mut infile, &offsets, &mut sink);
    sink.flush()?;

    if summary.failed > 0 {
        eprintln!("warning: {} offsets could not be processed", summary.failed);
    }

    Ok(())
}
