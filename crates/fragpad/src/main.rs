mod cli;
mod document;
mod export;
mod paths;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Init(args)) => run::init(args),
        Some(Command::Check(args)) => run::check(args),
        Some(Command::Where) => run::print_paths(),
        None => run::run(cli.run),
    }
}
