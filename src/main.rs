use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;

use rlox::Lox;

/// Tree-walking interpreter for the Lox language.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a Lox script; starts an interactive prompt when omitted.
    scripts: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Cli = Cli::parse();

    match args.scripts.as_slice() {
        [] => {
            Lox::new().run_prompt()?;
        }

        [script] => {
            let mut lox = Lox::new();

            lox.run_file(script)?;

            if lox.had_error() {
                process::exit(65);
            }

            if lox.had_runtime_error() {
                process::exit(70);
            }
        }

        _ => {
            println!("Usage: rlox [script]");
            process::exit(64);
        }
    }

    Ok(())
}
