use crate::error::ConvertError;
use std::path::Path;

/// Returns the final path segment, splitting on both `/` and `\` so Windows
/// style paths resolve the same way on every platform.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Escapes the five reserved XML characters for use in text content.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn safe_name(input_path: &str) -> String {
    escape_xml(basename(input_path))
}

/// Renders the placeholder drawing. `safe_name` must already be escaped.
pub fn render_svg(safe_name: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="2000" height="1200" viewBox="0 0 2000 1200">
  <rect x="0" y="0" width="2000" height="1200" fill="#ffffff"/>
  <rect x="20" y="20" width="1960" height="1160" fill="none" stroke="#334155" stroke-width="4"/>
  <g fill="#334155" font-family="Arial, sans-serif">
    <text x="60" y="90" font-size="48" font-weight="700">TMCS Mock DWG Conversion</text>
    <text x="60" y="150" font-size="28">Input file: {safe_name}</text>
    <text x="60" y="210" font-size="24">Real CAD geometry is not rendered in mock mode.</text>
    <text x="60" y="250" font-size="24">Configure DWG_TO_SVG_CMD with a real converter for production.</text>
  </g>
</svg>
"##
    )
}

/// Writes the mock drawing for `input_path` to `output_path`. The input file
/// is never opened.
pub fn convert(input_path: &str, output_path: &Path) -> Result<(), ConvertError> {
    let name = safe_name(input_path);
    log::debug!("rendering mock SVG for {:?} into {}", name, output_path.display());

    std::fs::write(output_path, render_svg(&name)).map_err(|source| ConvertError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}
