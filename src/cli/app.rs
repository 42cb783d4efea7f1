use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pheap")]
#[command(about = "Bounded byte-addressable managed heap with a tracing mark-sweep collector")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the canonical allocator/collector scenarios and report pass/fail
    Demo {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Drive a heap through a line-oriented script file
    Script {
        /// Path to the script file
        #[arg(short, long)]
        file: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Override the heap's total capacity
        #[arg(long)]
        capacity: Option<u16>,

        /// Override where the dynamic (payload) region begins
        #[arg(long = "dynamic-start")]
        dynamic_start: Option<u16>,
    },

    /// Randomized alloc/free/gc churn with invariant checking
    Fuzz {
        /// Number of operations to perform
        #[arg(short, long, default_value = "1000")]
        iterations: u32,

        /// Seed for the random number generator (default: a fixed, reproducible seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Override the heap's total capacity
        #[arg(long)]
        capacity: Option<u16>,

        /// Override where the dynamic (payload) region begins
        #[arg(long = "dynamic-start")]
        dynamic_start: Option<u16>,
    },
}
