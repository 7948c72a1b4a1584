use anyhow::Result;
use boneseg::{segment_bones, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    segment_bones(&cli.input, &cli.output, &cli.config())?;

    Ok(())
}
