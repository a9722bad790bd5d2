use std::io::{self, IsTerminal};
use std::process::ExitCode;

use log::info;
use taxstat::{parse_args, run, ParseOutcome};

fn main() -> ExitCode {
    // logger level colours only on a terminal
    colored::control::set_override(io::stderr().is_terminal());

    let options = match parse_args(std::env::args_os()) {
        ParseOutcome::Run(options) => options,
        ParseOutcome::Help(text) | ParseOutcome::Version(text) => {
            eprintln!("{}", text.trim_end());
            return ExitCode::SUCCESS;
        }
        ParseOutcome::Failure(message) => {
            eprintln!("{}", message.trim_end());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = simple_logger::init_with_level(options.level) {
        eprintln!("warning: cannot initialise logging: {}", e);
    }
    info!("Starting taxstat for {} taxa", options.taxa.len());

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
