use crate::command::CommandTemplate;
use crate::config::Config;
use crate::error::ConvertError;
use crate::raster::{self, RasterLimits};
use crate::{mock, svg};
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, PartialEq)]
pub enum Converter {
    External {
        template: CommandTemplate,
        normalize_colors: bool,
    },
    Mock,
}

/// How the input is handled, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Dwg,
    Svg,
    Image,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        match ext.as_str() {
            ".dwg" => Ok(InputKind::Dwg),
            ".svg" => Ok(InputKind::Svg),
            ".png" | ".jpg" | ".jpeg" | ".webp" => Ok(InputKind::Image),
            _ => Err(ConvertError::UnsupportedExtension(ext)),
        }
    }
}

/// What ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Written {
    Svg(PathBuf),
    Png(PathBuf),
    Copied(PathBuf),
}

impl Written {
    pub fn path(&self) -> &Path {
        match self {
            Written::Svg(path) | Written::Png(path) | Written::Copied(path) => path,
        }
    }
}

impl Converter {
    /// Picks the external command when one is configured, otherwise falls
    /// back to the mock renderer.
    pub fn resolve(config: &Config, command: Option<String>, force_mock: bool) -> Result<Self> {
        if force_mock {
            return Ok(Converter::Mock);
        }
        match command {
            Some(cmd) => {
                let template = CommandTemplate::parse(&cmd)
                    .with_context(|| format!("Invalid converter command: {}", cmd))?;
                Ok(Converter::External {
                    template,
                    normalize_colors: config.normalize_colors,
                })
            }
            None => {
                log::warn!("no converter configured, writing mock SVG");
                Ok(Converter::Mock)
            }
        }
    }

    pub async fn convert(&self, input: &Path, output: &Path) -> Result<Written> {
        self.convert_with(input, output, &RasterLimits::default()).await
    }

    /// Images pass through untouched, SVG input skips conversion and DWG goes
    /// through the converter. An output ending in `.png` is always rasterized.
    pub async fn convert_with(&self, input: &Path, output: &Path, limits: &RasterLimits) -> Result<Written> {
        let written = match InputKind::from_path(input)? {
            InputKind::Image => {
                fs::copy(input, output).await.map_err(|source| ConvertError::Write {
                    path: output.to_path_buf(),
                    source,
                })?;
                Written::Copied(output.to_path_buf())
            }
            InputKind::Svg => {
                let svg = read_to_string(input).await?;
                emit(svg, output, limits).await?
            }
            InputKind::Dwg => {
                let svg = match self {
                    Converter::Mock => mock::render_svg(&mock::safe_name(&input.to_string_lossy())),
                    Converter::External {
                        template,
                        normalize_colors,
                    } => convert_external(template, *normalize_colors, input).await?,
                };
                emit(svg, output, limits).await?
            }
        };
        log::info!("wrote {}", written.path().display());
        Ok(written)
    }
}

async fn read_to_string(path: &Path) -> Result<String, ConvertError> {
    fs::read_to_string(path).await.map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_output(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), ConvertError> {
    fs::write(path, contents).await.map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

async fn emit(svg: String, output: &Path, limits: &RasterLimits) -> Result<Written> {
    let wants_png = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if wants_png {
        let png = raster::svg_to_png(&svg, limits.max_raster_dim)?;
        write_output(output, png).await?;
        return Ok(Written::Png(output.to_path_buf()));
    }

    if svg.len() > limits.max_inline_svg_bytes {
        let png_path = output.with_extension("png");
        match raster::svg_to_png(&svg, limits.max_raster_dim) {
            Ok(png) => {
                write_output(&png_path, png).await?;
                return Ok(Written::Png(png_path));
            }
            Err(e) => log::warn!("SVG rasterization failed, keeping SVG: {}", e),
        }
    }

    write_output(output, svg).await?;
    Ok(Written::Svg(output.to_path_buf()))
}

/// Runs the external command in a scratch directory and returns the cleaned
/// SVG it produced.
async fn convert_external(template: &CommandTemplate, normalize_colors: bool, input: &Path) -> Result<String> {
    match fs::metadata(input).await {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConvertError::InputNotFound(input.to_path_buf()).into());
        }
        Err(source) => {
            return Err(ConvertError::Read {
                path: input.to_path_buf(),
                source,
            }
            .into());
        }
    }

    let workdir = tempfile::Builder::new()
        .prefix("tmcs-dwg-")
        .tempdir()
        .context("Failed to create converter work directory")?;
    let scratch_output = workdir.path().join("output.svg");
    template.run(input, &scratch_output, workdir.path()).await?;

    if fs::metadata(&scratch_output).await.is_err() {
        return Err(ConvertError::MissingOutput(scratch_output).into());
    }
    let raw = read_to_string(&scratch_output).await?;

    svg::ensure_svg(&raw)?;
    let mut cleaned = svg::escape_stray_ampersands(&raw);
    if normalize_colors {
        cleaned = svg::normalize_for_visibility(&cleaned);
    }
    match svg::parse_view_box(&cleaned) {
        Some(vb) => log::debug!("converted drawing is {}x{}", vb.width, vb.height),
        None => log::warn!("converted SVG has no usable viewBox"),
    }
    Ok(cleaned)
}
