//! Bulk Background Removal CLI Tool
//!
//! Command-line front-end for the bgremove-bulk batch worker.

use bgremove_bulk::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}
