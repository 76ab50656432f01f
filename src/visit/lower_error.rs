use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum LowerError {
    /// The backend has no representation for this AST variant. Raised by
    /// default for every visitor method a backend does not override.
    Unsupported { variant: &'static str },
    Backend(String),
}

impl LowerError {
    pub fn unsupported<T>(variant: &'static str) -> Result<T, LowerError> {
        Err(LowerError::Unsupported { variant })
    }

    pub fn err<T>(self) -> Result<T, LowerError> {
        Err(self)
    }
}

impl Display for LowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LowerError::Unsupported { variant } => {
                write!(f, "LowerError: backend does not support the {} variant", variant)
            }
            LowerError::Backend(message) => write!(f, "LowerError: {}", message),
        }
    }
}
