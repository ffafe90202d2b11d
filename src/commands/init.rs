use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Surveymap Configuration

[overview]
# Tree levels reported by `surveymap dept-levels` (roots are level 0)
department_levels = [0, 1, 2, 3]

[generations]
# Generation id for birth years outside every generation range
unknown_id = -1

[ranges]
# Boundaries used by `surveymap by-range` when --ranges is omitted
age = [18, 30, 40, 50, 60, 100]
birth_year = [1946, 1965, 1981, 1997, 2013]
service_months = [0, 12, 36, 60, 120, 600]

[output]
default_format = "json"
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

/// Write the default configuration into `dir`, returning its path.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if io::file_exists(&config_path) && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}
