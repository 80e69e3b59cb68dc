use web::Config;

pub const CONFIG_PATH: &str = "config.toml";

/// Reads `config.toml`; `DATABASE_URL` takes precedence over `database.uri`.
pub fn process_config() -> anyhow::Result<Config> {
    let config = std::fs::read_to_string(CONFIG_PATH)?;
    let mut config: Config = toml::from_str(&config)?;

    if let Ok(uri) = std::env::var("DATABASE_URL") {
        config.database.uri = uri;
    }

    Ok(config)
}
