//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;

#[tokio::main]
#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr before exiting"
)]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = waypoint_cli::run().await {
        eprintln!("waypoint: {err}");
        std::process::exit(1);
    }
}
