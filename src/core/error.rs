use thiserror::Error;

#[derive(Error, Debug)]
pub enum RediceError {
    #[error("Unknown catalog row: {sheet} `{id}`")]
    UnknownRow { sheet: &'static str, id: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl RediceError {
    pub fn unknown_row(sheet: &'static str, id: impl Into<String>) -> Self {
        RediceError::UnknownRow {
            sheet,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RediceError>;
