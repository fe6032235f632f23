use crate::error::ConvertError;
use crate::svg::{self, ViewBox};
use regex::Regex;
use resvg::tiny_skia::Pixmap;
use std::sync::OnceLock;

pub const DEFAULT_MAX_RASTER_DIM: u32 = 8192;
pub const DEFAULT_MAX_INLINE_SVG_BYTES: usize = 6_000_000;

/// Used when the SVG carries no usable viewBox.
pub const FALLBACK_SIZE: RasterSize = RasterSize {
    width: 2048,
    height: 1152,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLimits {
    /// SVGs larger than this are written as PNG instead
    pub max_inline_svg_bytes: usize,
    /// Longest side of a rasterized drawing, in pixels
    pub max_raster_dim: u32,
}

impl Default for RasterLimits {
    fn default() -> Self {
        RasterLimits {
            max_inline_svg_bytes: DEFAULT_MAX_INLINE_SVG_BYTES,
            max_raster_dim: DEFAULT_MAX_RASTER_DIM,
        }
    }
}

/// Scales the viewBox down so its longest side fits `max_dim`. Drawings are
/// never scaled up and each side is at least one pixel.
pub fn compute_raster_size(view_box: ViewBox, max_dim: u32) -> RasterSize {
    let scale = (f64::from(max_dim) / view_box.width.max(view_box.height)).min(1.0);
    RasterSize {
        width: ((view_box.width * scale).round() as u32).max(1),
        height: ((view_box.height * scale).round() as u32).max(1),
    }
}

/// Pins the root `width`/`height` to the raster size so percentage sizes
/// render predictably, and escapes stray ampersands.
pub fn prepare_for_raster(svg: &str, size: RasterSize) -> String {
    static WIDTH: OnceLock<Regex> = OnceLock::new();
    static HEIGHT: OnceLock<Regex> = OnceLock::new();
    let width = WIDTH.get_or_init(|| Regex::new(r#"(?i)(\s)width="[^"]*""#).expect("valid width regex"));
    let height = HEIGHT.get_or_init(|| Regex::new(r#"(?i)(\s)height="[^"]*""#).expect("valid height regex"));

    let sized = width.replace(svg, format!(r#"${{1}}width="{}""#, size.width));
    let sized = height.replace(&sized, format!(r#"${{1}}height="{}""#, size.height));
    svg::escape_stray_ampersands(&sized)
}

pub fn svg_to_png(svg: &str, max_dim: u32) -> Result<Vec<u8>, ConvertError> {
    let size = svg::parse_view_box(svg)
        .map(|vb| compute_raster_size(vb, max_dim))
        .unwrap_or(FALLBACK_SIZE);
    let prepared = prepare_for_raster(svg, size);

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&prepared, &opt)
        .map_err(|e| ConvertError::Raster(format!("Failed to parse SVG: {}", e)))?;

    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| ConvertError::Raster(format!("Failed to create {}x{} pixmap", size.width, size.height)))?;

    let tree_size = tree.size();
    let transform = usvg::Transform::from_scale(
        size.width as f32 / tree_size.width(),
        size.height as f32 / tree_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    log::debug!("rasterized SVG to {}x{}", size.width, size.height);
    pixmap
        .encode_png()
        .map_err(|e| ConvertError::Raster(format!("Failed to encode PNG: {}", e)))
}
