use std::process::ExitCode;

use clap::Parser;
use gofront::{
    config::{Args, Config},
    driver, logger,
};

fn main() -> ExitCode {
    let config = Config::from(Args::parse());
    logger::init(config.log_level);

    match driver::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
