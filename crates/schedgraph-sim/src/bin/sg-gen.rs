#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Result;
use schedgraph_sim::{DEFAULT_SEED, write_suite};

fn main() -> Result<()> {
    let dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("data"), PathBuf::from);
    let written = write_suite(&dir, DEFAULT_SEED)?;

    for path in &written {
        println!("generated: {}", path.display());
    }
    println!("{} datasets written to {}", written.len(), dir.display());

    Ok(())
}
