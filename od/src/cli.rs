//! CLI argument parsing for offsetdump

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::spec::{LineSep, OffsetBase};

#[derive(Parser, Debug)]
#[command(name = "od")]
#[command(author, version, about = "Get lines or blocks by yara or strings offset", long_about = None)]
#[command(
    after_help = "Note: This tool cannot extract content from multiple files in one run. \
                  All offsets must originate from the same input file."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be given multiple times)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Use offsets from yara output
    Yara {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Use offsets from strings output
    Strings {
        /// Offset format in the strings report
        #[arg(short = 't', long = "type", value_enum, default_value_t = OffsetBase::Dec)]
        offset_type: OffsetBase,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Source of matcher output (defaults to stdin)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub offsetfile: Option<PathBuf>,

    /// File or image to extract lines or blocks from
    #[arg(short, long, value_name = "FILE")]
    pub infile: PathBuf,

    /// Write one file per offset to DIR instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// Results are given for the smallest offset only, all duplicates are omitted
    #[arg(short = 'u', long)]
    pub nodupes: bool,

    /// Print NUM units before the matching block/line
    #[arg(short = 'B', long, value_name = "NUM", default_value_t = 0)]
    pub before: u64,

    /// Print NUM units after the matching block/line
    #[arg(short = 'A', long, value_name = "NUM", default_value_t = 0)]
    pub after: u64,

    /// Block size for block mode, buffer size for line mode
    #[arg(short = 's', long, value_name = "BS")]
    pub blocksize: Option<u64>,

    /// Line endings for a text file to dump lines from
    #[arg(short = 'd', long, value_enum)]
    pub linesep: Option<LineSep>,

    /// Treat end-of-file as a line terminator when the final delimiter is missing
    #[arg(long)]
    pub strict: bool,

    /// State if input is parsed as lines or blocks
    #[arg(value_enum, value_name = "datatype")]
    pub datatype: DataType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataType {
    Lines,
    Blocks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yara_defaults() {
        let cli = Cli::try_parse_from(["od", "yara", "--infile", "image.dd", "lines"]).unwrap();
        let Command::Yara { common } = cli.command else {
            panic!("expected yara subcommand");
        };
        assert_eq!(common.datatype, DataType::Lines);
        assert!(common.offsetfile.is_none());
        assert!(common.outdir.is_none());
        assert_eq!(common.before, 0);
        assert_eq!(common.after, 0);
        assert!(!common.nodupes);
    }

    #[test]
    fn test_strings_type_flag() {
        let cli = Cli::try_parse_from([
            "od", "strings", "--type", "hex", "-i", "image.dd", "-s", "32", "-u", "blocks",
        ])
        .unwrap();
        let Command::Strings { offset_type, common } = cli.command else {
            panic!("expected strings subcommand");
        };
        assert_eq!(offset_type, OffsetBase::Hex);
        assert_eq!(common.datatype, DataType::Blocks);
        assert_eq!(common.blocksize, Some(32));
        assert!(common.nodupes);
    }

    #[test]
    fn test_datatype_is_required() {
        assert!(Cli::try_parse_from(["od", "yara", "--infile", "image.dd"]).is_err());
    }
}
