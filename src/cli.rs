use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use crate::error::ConvertError;

/// Positional arguments of `mock_dwg_to_svg`. The tool has no flags: the
/// first two arguments are paths whatever they look like, `--` included, and
/// anything after them is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct MockArgs {
    pub input: String,
    pub output: PathBuf,
}

impl MockArgs {
    /// Takes a full argv, program name first.
    pub fn from_argv<I, T>(argv: I) -> Result<Self, ConvertError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut positionals = argv.into_iter().skip(1).map(Into::<OsString>::into);
        match (positionals.next(), positionals.next()) {
            (Some(input), Some(output)) => Ok(MockArgs {
                input: input.to_string_lossy().into_owned(),
                output: PathBuf::from(output),
            }),
            _ => Err(ConvertError::Usage),
        }
    }
}

/// Convert a DWG drawing to SVG with the configured external converter,
/// falling back to a placeholder drawing
#[derive(Parser, Debug)]
#[command(name = "dwg_to_svg", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the DWG drawing (SVG and image files pass through)
    pub input: PathBuf,

    /// Path of the output file; a `.png` extension writes a raster image
    pub output: PathBuf,

    /// Path to config file (defaults to ./dwgconvert.yml)
    #[arg(long = "config")]
    pub config_path: Option<String>,

    /// Always write the placeholder drawing, even if a converter is configured
    #[arg(long = "mock")]
    pub mock: bool,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,
}
