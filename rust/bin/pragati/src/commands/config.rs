//! `pragati config show|set`.

use std::path::Path;

use anyhow::Result;

use crate::config::ClientConfig;

pub fn show(config: &ClientConfig, path: &Path) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    println!("# session db: {}", config.session_path().display());
    Ok(())
}

pub fn set(key: &str, value: &str, path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(path)?;
    config.set(key, value)?;
    config.save(path)?;
    println!("Set {}.", key);
    Ok(())
}
