use crate::annotation::Annotation;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Raised by `verify` when the formatter produced text. `message` keeps
    /// the leading newline so the rendered annotation starts on its own line.
    #[error("Decoding error:{message}")]
    Decoding { message: String },

    #[error("{reason}")]
    Message { reason: String },

    #[error("{0}")]
    Rejected(Box<Annotation>),

    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn custom(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(error))
    }
}

impl From<Annotation> for Error {
    fn from(annotation: Annotation) -> Self {
        Self::Rejected(Box::new(annotation))
    }
}

/// Either a rendered message or a ready-made [`Error`].
///
/// Formatters passed to `verify_with` and the report given to
/// [`crate::result::expect`] both produce one of these.
#[derive(Debug)]
pub enum Report {
    Text(String),
    Error(Error),
}

impl Report {
    /// Turns a `verify` report into the error it raises.
    pub(crate) fn into_decoding_error(self) -> Error {
        match self {
            Self::Text(text) => Error::Decoding {
                message: format!("\n{text}"),
            },
            Self::Error(error) => error,
        }
    }

    /// Turns an `expect` report into the error it raises.
    pub(crate) fn into_error(self) -> Error {
        match self {
            Self::Text(reason) => Error::Message { reason },
            Self::Error(error) => error,
        }
    }
}

impl From<String> for Report {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Report {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Error> for Report {
    fn from(error: Error) -> Self {
        Self::Error(error)
    }
}
