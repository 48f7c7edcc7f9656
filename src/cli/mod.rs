pub mod completions;
pub mod densities;
pub mod generate;
pub mod init;

use clap::{Parser, Subcommand};

/// drawables - Android density drawable generator
#[derive(Parser, Debug)]
#[command(name = "drawables")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate density variants of source images
    Generate(generate::GenerateArgs),

    /// Initialize a drawables project (generates drawables.yaml)
    Init(init::InitArgs),

    /// List the density buckets and their multipliers
    Densities(densities::DensitiesArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
