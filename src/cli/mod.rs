//! CLI subcommand implementations for the `pheap` binary.
//!
//! The `pheap` binary provides three subcommands for exercising a [`crate::heap::Heap`]. CLI
//! argument parsing uses clap derive macros, with the top-level [`app::Cli`] struct and
//! [`app::Commands`] enum defined in [`app`] and shared between `main.rs` and `build.rs` (for man
//! page generation) via `include!()`.
//!
//! Each subcommand module follows the same pattern: an `Options` struct holding the parsed
//! arguments and a `pub fn execute(opts, writer) -> Result<(), HeapError>` entry point. The
//! `writer: &mut dyn Write` parameter allows output to be captured in tests or redirected to a
//! file via the global `--output` flag.
//!
//! # Subcommands
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `pheap demo` | [`demo`] | Run the canonical allocator/collector scenarios |
//! | `pheap script` | [`script`] | Drive a heap through a line-oriented script file |
//! | `pheap fuzz` | [`fuzz`] | Randomized alloc/free/gc churn with invariant checking |
//!
//! # Common patterns
//!
//! - **`--json`** — `script` and `fuzz` support structured JSON output via `serde_json`.
//! - **`--color`** (global) — Control colored terminal output (`auto`, `always`, `never`).
//! - **`--output` / `-o`** (global) — Redirect output to a file instead of stdout.
//!
//! A progress bar (via [`indicatif`]) is displayed for `fuzz` runs past a few thousand
//! iterations. The `wprintln!` and `wprint!` macros wrap `writeln!`/`write!` to convert
//! `io::Error` into `HeapError`.

pub mod app;
pub mod demo;
pub mod fuzz;
pub mod script;

/// Write a line to the given writer, converting io::Error to HeapError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::HeapError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::HeapError::Io(e.to_string()))
    };
}

/// Write (without newline) to the given writer, converting io::Error to HeapError.
macro_rules! wprint {
    ($w:expr, $($arg:tt)*) => {
        write!($w, $($arg)*).map_err(|e| $crate::HeapError::Io(e.to_string()))
    };
}

pub(crate) use wprint;
pub(crate) use wprintln;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a styled progress bar for a long-running fuzz run.
pub(crate) fn create_progress_bar(count: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(count);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{eta}})",
                unit
            ))
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

/// Build a [`crate::heap::HeapConfig`] from optional CLI overrides, starting from the default.
pub(crate) fn configured_heap(
    capacity: Option<u16>,
    dynamic_start: Option<u16>,
) -> Result<crate::heap::Heap, crate::HeapError> {
    use crate::heap::{Heap, HeapConfig};

    let default = HeapConfig::default();
    let config = HeapConfig {
        capacity: capacity.map(u32::from).unwrap_or(default.capacity),
        dynamic_start: dynamic_start.unwrap_or(default.dynamic_start),
        ..default
    };
    Heap::with_config(config)
}
