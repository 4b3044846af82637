use clap::Parser;
use sunbeam::app::{run_cli, Cli};

fn main() {
    let cli = Cli::parse();
    match run_cli(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
