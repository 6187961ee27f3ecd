use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::EngineConfig;

/// Loads the engine configuration.
///
/// When `path` is given, that file must exist and parse. Otherwise a
/// `tradelog.toml` in the working directory is used if present, and every
/// missing key falls back to its documented default; running without any
/// config file at all is a supported setup.
///
/// Environment variables prefixed with `TRADELOG_` override file values
/// (e.g. `TRADELOG_STARTING_BALANCE=50000`).
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let file_source = match path {
        Some(path) => config::File::from(path),
        None => config::File::with_name("tradelog").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(config::Environment::with_prefix("TRADELOG"))
        .build()?;

    // Deserialize into our strongly-typed config; absent keys take the
    // serde defaults on `EngineConfig`.
    let config = builder.try_deserialize::<EngineConfig>()?;
    config.validate()?;

    tracing::debug!(?config, "engine configuration loaded");
    Ok(config)
}
