use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityErrorCode {
    Storage,
    Internal,
}

impl IdentityErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityErrorCode::Storage => "identity/storage",
            IdentityErrorCode::Internal => "identity/internal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct IdentityError {
    pub code: IdentityErrorCode,
    message: String,
}

impl IdentityError {
    pub fn new(code: IdentityErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for IdentityError {}

pub type IdentityResult<T> = Result<T, IdentityError>;

pub fn storage_error(message: impl Into<String>) -> IdentityError {
    IdentityError::new(IdentityErrorCode::Storage, message)
}

pub fn internal_error(message: impl Into<String>) -> IdentityError {
    IdentityError::new(IdentityErrorCode::Internal, message)
}
