//! Error types and result definitions for change-capture operations.
//!
//! Provides a structured error system with classification and captured diagnostic
//! metadata for the capture pipeline.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for capture operations using [`FlowError`] as the error type.
pub type FlowResult<T> = Result<T, FlowError>;

/// Main error type for capture operations.
///
/// [`FlowError`] carries a classified kind, a static description, optional
/// dynamic detail, an optional source error, and the callsite at which it was
/// created.
#[derive(Debug, Clone)]
pub struct FlowError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

/// Specific categories of errors that can occur during change capture.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Feed errors
    FeedRequestFailed,
    FeedResponseInvalid,

    // Configuration errors
    ConfigError,

    // Checkpoint errors
    OffsetStoreError,

    // State & workflow errors
    InvalidState,
    FetchWorkerPanic,
}

impl FlowError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Attaches an originating [`error::Error`] to this error and returns the modified instance.
    ///
    /// The stored source is preserved across clones and exposed via [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Creates a [`FlowError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        FlowError {
            kind,
            description,
            detail,
            source,
            location: Location::caller(),
        }
    }
}

impl PartialEq for FlowError {
    fn eq(&self, other: &FlowError) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )?;

        if let Some(detail) = self.detail.as_deref() {
            write!(f, "\n  Detail: {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for FlowError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates a [`FlowError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for FlowError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> FlowError {
        FlowError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`FlowError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for FlowError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> FlowError {
        FlowError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`reqwest::Error`] to [`FlowError`].
///
/// Body decoding failures map to [`ErrorKind::FeedResponseInvalid`]; everything else
/// (connect, timeout, status) maps to [`ErrorKind::FeedRequestFailed`].
impl From<reqwest::Error> for FlowError {
    #[track_caller]
    fn from(err: reqwest::Error) -> FlowError {
        let (kind, description) = if err.is_decode() {
            (ErrorKind::FeedResponseInvalid, "feed response is invalid")
        } else {
            (ErrorKind::FeedRequestFailed, "feed request failed")
        };

        let detail = err.to_string();
        let source = Arc::new(err);
        FlowError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow_error;

    #[test]
    fn display_includes_kind_description_location_and_detail() {
        let error = flow_error!(
            ErrorKind::OffsetStoreError,
            "offset store read failed",
            "connection refused"
        );

        let rendered = error.to_string();

        assert!(rendered.contains("OffsetStoreError"));
        assert!(rendered.contains("offset store read failed"));
        assert!(rendered.contains(file!()));
        assert!(rendered.contains("Detail: connection refused"));
        assert_eq!(error.detail(), Some("connection refused"));
    }

    #[test]
    fn attached_source_is_exposed_through_the_error_trait() {
        use std::error::Error;

        let io_error = std::io::Error::other("disk unplugged");
        let error = flow_error!(
            ErrorKind::ConfigError,
            "invalid pipeline configuration",
            source: io_error
        );

        let source = error.source().unwrap();
        assert_eq!(source.to_string(), "disk unplugged");
    }

    #[test]
    fn errors_compare_equal_by_kind() {
        let a = flow_error!(ErrorKind::InvalidState, "pipeline was already started");
        let b = flow_error!(ErrorKind::InvalidState, "different description");
        let c = flow_error!(ErrorKind::FetchWorkerPanic, "fetch worker task panicked");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
