use anyhow::Result;
use std::ffi::OsString;
use std::process::ExitCode;
use crate::cli::{Cli, MockArgs};
use crate::config::Config;
use crate::converter::{Converter, Written};
use crate::mock;

/// Runs the mock converter for a full argv (program name first) and maps the
/// outcome to the process exit code.
pub fn run_mock<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = match MockArgs::from_argv(args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    match mock::convert(&args.input, &args.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

pub async fn handle_cli_args(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config_path.as_deref())?;
    let converter = Converter::resolve(&config, config.command_from_env(), cli.mock)?;

    if cli.verbose {
        println!("Converter: {:?}", converter);
    }

    let written = converter
        .convert_with(&cli.input, &cli.output, &config.raster_limits())
        .await?;

    if cli.verbose {
        match &written {
            Written::Svg(path) => println!("Wrote SVG {}", path.display()),
            Written::Png(path) => println!("Wrote PNG {}", path.display()),
            Written::Copied(path) => println!("Copied input to {}", path.display()),
        }
    }
    Ok(())
}
