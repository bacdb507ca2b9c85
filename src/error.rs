use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("not found")]
    NotFound,

    #[error("not authenticated")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("invalid workflow document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse failure classes used when deciding how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The hosted service failed or was unreachable. Previous state is kept.
    Remote,
    /// Rejected before any network call. The draft is kept.
    Validation,
    /// Sign-in or privilege problem.
    Auth,
    /// Local environment (files, configuration).
    Local,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Http(_) | Self::Remote { .. } | Self::NotFound => ErrorClass::Remote,
            Self::Validation(_) | Self::InvalidDocument(_) => ErrorClass::Validation,
            Self::Unauthorized | Self::Forbidden => ErrorClass::Auth,
            Self::Io(_) | Self::Config(_) => ErrorClass::Local,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(Error::NotFound.class(), ErrorClass::Remote);
        assert_eq!(
            Error::Remote {
                status: 500,
                message: "boom".into()
            }
            .class(),
            ErrorClass::Remote
        );
        assert_eq!(Error::validation("x").class(), ErrorClass::Validation);
        assert_eq!(Error::Forbidden.class(), ErrorClass::Auth);
        assert_eq!(Error::Config("x".into()).class(), ErrorClass::Local);

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(parse).class(), ErrorClass::Validation);
    }
}
