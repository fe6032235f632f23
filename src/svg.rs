use crate::error::ConvertError;
use regex::{Captures, Regex};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

pub fn ensure_svg(svg: &str) -> Result<(), ConvertError> {
    if svg.contains("<svg") {
        Ok(())
    } else {
        Err(ConvertError::InvalidSvg)
    }
}

/// CAD text payloads sometimes carry bare `&`, which breaks XML parsers.
pub fn escape_stray_ampersands(svg: &str) -> String {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    let re = ENTITY.get_or_init(|| {
        Regex::new(r"&((?:amp|lt|gt|quot|apos|#\d+|#x[0-9A-Fa-f]+);)?").expect("valid entity regex")
    });

    re.replace_all(svg, |caps: &Captures| match caps.get(1) {
        Some(entity) => format!("&{}", entity.as_str()),
        None => "&amp;".to_string(),
    })
    .into_owned()
}

/// Converts pure white strokes and fills to dark slate so drawings stay
/// visible on a light canvas.
pub fn normalize_for_visibility(svg: &str) -> String {
    svg.replace("rgb(255,255,255)", "rgb(30,41,59)")
        .replace("#ffffff", "#1e293b")
        .replace("#FFF", "#1e293b")
}

pub fn parse_view_box(svg: &str) -> Option<ViewBox> {
    static VIEW_BOX: OnceLock<Regex> = OnceLock::new();
    let re = VIEW_BOX.get_or_init(|| Regex::new(r#"(?i)viewBox="([^"]+)""#).expect("valid viewBox regex"));

    let raw = re.captures(svg)?.get(1)?.as_str();
    let values: Vec<f64> = raw
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .ok()?;
    if values.len() != 4 || !values.iter().all(|v| v.is_finite()) {
        return None;
    }

    let width = values[2].abs();
    let height = values[3].abs();
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(ViewBox { width, height })
}
