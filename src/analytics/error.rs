use std::fmt::{Display, Formatter};

use crate::identity::error::IdentityError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsErrorCode {
    InvalidArgument,
    Internal,
    Network,
    IdentityUnavailable,
}

impl AnalyticsErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsErrorCode::InvalidArgument => "analytics/invalid-argument",
            AnalyticsErrorCode::Internal => "analytics/internal",
            AnalyticsErrorCode::Network => "analytics/network",
            AnalyticsErrorCode::IdentityUnavailable => "analytics/identity-unavailable",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnalyticsError {
    pub code: AnalyticsErrorCode,
    message: String,
}

impl AnalyticsError {
    pub fn new(code: AnalyticsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for AnalyticsError {}

impl From<IdentityError> for AnalyticsError {
    fn from(err: IdentityError) -> Self {
        identity_unavailable(format!("device identity could not be resolved: {err}"))
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

pub fn invalid_argument(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::InvalidArgument, message)
}

pub fn internal_error(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Internal, message)
}

pub fn network_error(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Network, message)
}

pub fn identity_unavailable(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::IdentityUnavailable, message)
}
