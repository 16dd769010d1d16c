use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: .{extension}")]
    UnsupportedFormat { extension: String },
    #[error("invalid value for {key}: '{value}'")]
    InvalidOverride { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
