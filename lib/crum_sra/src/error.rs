use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SraError {
    #[error("failed to read key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("key file is missing line `{0}`")]
    MissingLine(&'static str),
    #[error("invalid decimal integer for `{field}`: {value}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("modulus does not equal p * q")]
    ModulusMismatch,
    #[error("invalid modulus: {0}")]
    InvalidModulus(&'static str),
    #[error("no modular inverse exists for the chosen exponent")]
    NoModularInverse,
    #[error("failed to select a key pair after {0} attempts")]
    KeyGenerationExhausted(usize),
}
