#[cfg(not(feature = "cli"))]
compile_error!("The `pheap` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;

use pheap::cli;
use pheap::cli::app::{Cli, ColorMode, Commands};
use pheap::HeapError;

fn main() {
    let cli = Cli::parse();

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, HeapError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| HeapError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Demo { json } => cli::demo::execute(&cli::demo::Options { json }, &mut writer),

        Commands::Script { file, json, capacity, dynamic_start } => cli::script::execute(
            &cli::script::Options { file, json, capacity, dynamic_start },
            &mut writer,
        ),

        Commands::Fuzz { iterations, seed, json, capacity, dynamic_start } => cli::fuzz::execute(
            &cli::fuzz::Options { iterations, seed, json, capacity, dynamic_start },
            &mut writer,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
