use hoopoe_domain::{CliOverrides, Config};

/// Loads and validates the configuration. Any error here is fatal.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}
