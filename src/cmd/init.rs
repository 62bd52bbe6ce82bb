use crate::data::AppSettings;
use anyhow::{Result, bail};
use std::path::Path;

pub fn run(force: bool) -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    run_in_dir(&dir, force)?;
    println!("Wrote {}", dir.join("config.yaml").display());
    Ok(())
}

/// Writes a default config.yaml into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path, force: bool) -> Result<()> {
    if dir.join("config.yaml").exists() && !force {
        bail!(
            "config.yaml already exists in {} (use --force to overwrite)",
            dir.display()
        );
    }
    AppSettings::default().save_to(dir)
}
