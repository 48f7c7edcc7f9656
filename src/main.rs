use clap::Parser;
use drawables::cli::{Cli, Commands};
use drawables::output::Printer;
use miette::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => {
            drawables::cli::generate::run(args, &printer).await?;
        }
        Commands::Init(args) => drawables::cli::init::run(args, &printer)?,
        Commands::Densities(args) => drawables::cli::densities::run(args, &printer)?,
        Commands::Completions(args) => drawables::cli::completions::run(args)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let directives = log_directives(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// A non-empty `RUST_LOG` wins; otherwise `--verbose` picks the level.
fn log_directives(verbose: bool, env: Option<String>) -> String {
    match env {
        Some(env) if !env.trim().is_empty() => env,
        _ if verbose => "drawables=debug".to_string(),
        _ => "warn".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directives_default() {
        assert_eq!(log_directives(false, None), "warn");
        assert_eq!(log_directives(true, None), "drawables=debug");
    }

    #[test]
    fn test_log_directives_env_wins() {
        assert_eq!(log_directives(false, Some("drawables=trace".into())), "drawables=trace");
        assert_eq!(log_directives(true, Some("error".into())), "error");
        assert_eq!(log_directives(true, Some(String::new())), "drawables=debug");
    }

    #[test]
    fn test_reads_rust_log() {
        assert_eq!(EnvFilter::DEFAULT_ENV, "RUST_LOG");
    }
}
