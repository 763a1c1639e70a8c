pub type LapseResult<T> = Result<T, LapseError>;

#[derive(thiserror::Error, Debug)]
pub enum LapseError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("save error: {0}")]
    Save(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LapseError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn save(msg: impl Into<String>) -> Self {
        Self::Save(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for conditions that end a run without producing any artifact.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput(_))
    }
}

impl From<std::io::Error> for LapseError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(err))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
