use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("usage: mock_dwg_to_svg.py <input.dwg> <output.svg>")]
    Usage,

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("DWG_TO_SVG_CMD is empty after placeholder replacement.")]
    CommandEmpty,

    #[error("failed to start `{program}`: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("converter exited with {status}: {stderr}")]
    CommandFailed { status: ExitStatus, stderr: String },

    #[error("converter did not produce {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("DWG converted but SVG output is empty")]
    InvalidSvg,

    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),

    #[error("failed to rasterize SVG: {0}")]
    Raster(String),
}
