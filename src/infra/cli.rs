use clap::Parser;

/// Farm-to-consumer marketplace backend.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Do not warm the external catalog cache when the server starts.
    #[arg(long)]
    pub skip_catalog_prefetch: bool,
}
