mod catalog;
mod cli;
mod config;
mod dispatch;
mod error;
mod gate;
mod hint;
mod logging;
mod mission;
mod model;
mod parser;
mod remote;
mod session;
mod storage;
mod vcs;

use std::process;

use config::Config;

fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    logging::init(config.log_filter.as_deref());

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
