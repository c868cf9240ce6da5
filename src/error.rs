/// Errors raised while loading or validating configuration tables.
///
/// The per-frame step never fails; only the load path does.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but is not valid TOML for [`crate::GameConfig`].
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The tables parsed but violate an invariant the simulation relies on.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
