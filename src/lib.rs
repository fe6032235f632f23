// Re-export modules and types
pub mod cli;
pub mod cli_handler;
pub mod command;
pub mod config;
pub mod converter;
pub mod error;
pub mod mock;
pub mod raster;
pub mod svg;

// Re-export commonly used types
pub use cli::{Cli, MockArgs};
pub use cli_handler::{handle_cli_args, run_mock};
pub use command::CommandTemplate;
pub use config::Config;
pub use converter::{Converter, InputKind, Written};
pub use error::ConvertError;
pub use mock::{render_svg, safe_name};
