//! Provides the main entry point to the program.
use human_panic::setup_panic;
use log::error;
use mesm::cli::run_cli;
use mesm::log::is_logger_initialised;

fn main() {
    setup_panic!();

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
