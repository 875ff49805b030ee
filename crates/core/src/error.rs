use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid config value for {key}: {message}")]
    Config { key: String, message: String },
}
