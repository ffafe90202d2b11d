pub mod memory;
pub mod output;
pub mod store;

pub use memory::{MemoryStore, Snapshot};
pub use output::{create_writer, JsonWriter, OutputFormat, OutputWriter, TerminalWriter};
pub use store::DataStore;

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}
