use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Declaration file not found. Looked for:\n\
        - LXNET_CONFIG_PATH\n\
        - ./lxnet.yaml, ./lxnet.yml\n\
        - <config dir>/lxnet/lxnet.yaml"
    )]
    DeclarationNotFound,

    #[error("Declaration file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid declaration in {}: {message}", path.display())]
    InvalidDeclaration { path: PathBuf, message: String },

    #[error("YAML error in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
