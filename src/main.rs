use std::process::ExitCode;
use tmcs_dwg::run_mock;

fn main() -> ExitCode {
    env_logger::init();
    run_mock(std::env::args_os())
}
