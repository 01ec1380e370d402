mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{LogSettings, ServerSettings, Settings};

/// Default configuration file stem, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Prefix for environment overrides, e.g. `MINIPUB_SERVER_PORT=9000`.
pub const ENV_PREFIX: &str = "MINIPUB";

/// Loads the configuration from `config/default` and the environment.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Loads the configuration from the file stem `path` (any format the `config`
/// crate recognizes, optional) and `MINIPUB_*` environment variables, then
/// merges the result over the defaults.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("_"));

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::merge(partial))
}
