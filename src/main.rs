use clap::Parser;
use trendsuite::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
