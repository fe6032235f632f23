use anyhow::Result;
use std::fs;
use tempfile::tempdir;
use std::path::Path;
use tmcs_dwg::raster::RasterLimits;
use tmcs_dwg::{render_svg, CommandTemplate, Config, ConvertError, Converter, InputKind, Written};

const PNG_SIGNATURE: &[u8] = &[137, 80, 78, 71, 13, 10, 26, 10];

#[test]
fn test_resolve_prefers_command_unless_forced_mock() -> Result<()> {
    let config = Config {
        command: None,
        normalize_colors: true,
        ..Config::default()
    };

    let converter = Converter::resolve(&config, Some("dwg2svg {input} {output}".to_string()), false)?;
    assert_eq!(
        converter,
        Converter::External {
            template: CommandTemplate::parse("dwg2svg {input} {output}")?,
            normalize_colors: true,
        }
    );

    let forced = Converter::resolve(&config, Some("dwg2svg {input} {output}".to_string()), true)?;
    assert_eq!(forced, Converter::Mock);

    assert_eq!(Converter::resolve(&config, None, false)?, Converter::Mock);
    Ok(())
}

#[test]
fn test_resolve_rejects_quote_only_command() {
    let config = Config::default();
    assert!(Converter::resolve(&config, Some("''".to_string()), false).is_err());
}

#[tokio::test]
async fn test_mock_converter_writes_template() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("out.svg");

    Converter::Mock
        .convert(&temp_dir.path().join("missing.dwg"), &output)
        .await?;

    assert_eq!(fs::read_to_string(&output)?, render_svg("missing.dwg"));
    Ok(())
}

#[tokio::test]
async fn test_external_converter_requires_input() -> Result<()> {
    let temp_dir = tempdir()?;
    let converter = Converter::External {
        template: CommandTemplate::parse("cp {input} {output}")?,
        normalize_colors: false,
    };

    let err = converter
        .convert(&temp_dir.path().join("missing.dwg"), &temp_dir.path().join("out.svg"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::InputNotFound(_))
    ));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_external_converter_cleans_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("site.dwg");
    let output = temp_dir.path().join("site.svg");
    fs::write(
        &input,
        r##"<svg viewBox="0 0 10 10"><path stroke="#ffffff"/><text>A&B</text></svg>"##,
    )?;

    let converter = Converter::External {
        template: CommandTemplate::parse("cp {input} {output}")?,
        normalize_colors: true,
    };
    converter.convert(&input, &output).await?;

    assert_eq!(
        fs::read_to_string(&output)?,
        r##"<svg viewBox="0 0 10 10"><path stroke="#1e293b"/><text>A&amp;B</text></svg>"##
    );
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_external_converter_rejects_non_svg_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("site.dwg");
    fs::write(&input, "AC1018 binary drawing")?;

    let converter = Converter::External {
        template: CommandTemplate::parse("cp {input} {output}")?,
        normalize_colors: false,
    };
    let err = converter
        .convert(&input, &temp_dir.path().join("site.svg"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::InvalidSvg)
    ));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_external_converter_without_output_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("site.dwg");
    fs::write(&input, "AC1018")?;

    let converter = Converter::External {
        template: CommandTemplate::parse("true")?,
        normalize_colors: false,
    };
    let err = converter
        .convert(&input, &temp_dir.path().join("site.svg"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::MissingOutput(_))
    ));
    Ok(())
}

#[test]
fn test_input_kind_from_extension() {
    assert_eq!(InputKind::from_path(Path::new("site.dwg")).ok(), Some(InputKind::Dwg));
    assert_eq!(InputKind::from_path(Path::new("SITE.DWG")).ok(), Some(InputKind::Dwg));
    assert_eq!(InputKind::from_path(Path::new("plan.svg")).ok(), Some(InputKind::Svg));
    assert_eq!(InputKind::from_path(Path::new("photo.JPEG")).ok(), Some(InputKind::Image));
    assert_eq!(InputKind::from_path(Path::new("photo.webp")).ok(), Some(InputKind::Image));

    let err = InputKind::from_path(Path::new("site.dxf")).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported extension: .dxf");
    assert!(matches!(
        InputKind::from_path(Path::new("README")),
        Err(ConvertError::UnsupportedExtension(ext)) if ext.is_empty()
    ));
}

#[tokio::test]
async fn test_unsupported_extension_writes_nothing() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("site.dxf");
    let output = temp_dir.path().join("site.svg");
    fs::write(&input, "0\nSECTION")?;

    let err = Converter::Mock.convert(&input, &output).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::UnsupportedExtension(_))
    ));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_svg_input_passes_through() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("plan.svg");
    let output = temp_dir.path().join("out.svg");
    let original = r##"<svg viewBox="0 0 10 10"><path stroke="#ffffff"/></svg>"##;
    fs::write(&input, original)?;

    let written = Converter::Mock.convert(&input, &output).await?;

    assert_eq!(written, Written::Svg(output.clone()));
    assert_eq!(fs::read_to_string(&output)?, original);
    Ok(())
}

#[tokio::test]
async fn test_image_input_is_copied() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("scan.jpg");
    let output = temp_dir.path().join("out.jpg");
    fs::write(&input, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])?;

    let written = Converter::Mock.convert(&input, &output).await?;

    assert_eq!(written, Written::Copied(output.clone()));
    assert_eq!(fs::read(&output)?, fs::read(&input)?);
    Ok(())
}

#[tokio::test]
async fn test_png_output_is_rasterized() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("drawing.png");

    let written = Converter::Mock
        .convert(&temp_dir.path().join("drawing.dwg"), &output)
        .await?;

    assert_eq!(written, Written::Png(output.clone()));
    assert!(fs::read(&output)?.starts_with(PNG_SIGNATURE));
    Ok(())
}

#[tokio::test]
async fn test_oversized_svg_is_written_as_png() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("drawing.svg");
    let limits = RasterLimits {
        max_inline_svg_bytes: 100,
        max_raster_dim: 500,
    };

    let written = Converter::Mock
        .convert_with(&temp_dir.path().join("drawing.dwg"), &output, &limits)
        .await?;

    let png_path = temp_dir.path().join("drawing.png");
    assert_eq!(written, Written::Png(png_path.clone()));
    assert!(fs::read(&png_path)?.starts_with(PNG_SIGNATURE));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_oversized_svg_falls_back_when_rasterization_fails() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("broken.svg");
    let output = temp_dir.path().join("out.svg");
    fs::write(&input, "<svg this is not xml")?;
    let limits = RasterLimits {
        max_inline_svg_bytes: 4,
        max_raster_dim: 500,
    };

    let written = Converter::Mock.convert_with(&input, &output, &limits).await?;

    assert_eq!(written, Written::Svg(output.clone()));
    assert_eq!(fs::read_to_string(&output)?, "<svg this is not xml");
    assert!(!temp_dir.path().join("out.png").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_input_is_not_reported_missing() -> Result<()> {
    let temp_dir = tempdir()?;
    let not_a_dir = temp_dir.path().join("plain.txt");
    fs::write(&not_a_dir, "x")?;
    let converter = Converter::External {
        template: CommandTemplate::parse("cp {input} {output}")?,
        normalize_colors: false,
    };

    let err = converter
        .convert(&not_a_dir.join("site.dwg"), &temp_dir.path().join("out.svg"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::Read { .. })
    ));
    Ok(())
}
