use thiserror::Error;

/// Failures raised by the lookup pipeline and its upstream clients.
///
/// A redirect is not an error; see [`crate::redirect::Resolution`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Page {page_id} is in unsupported namespace {namespace}")]
    UnsupportedNamespace { page_id: u64, namespace: i64 },

    #[error("Upstream error ({code}): {message}")]
    Upstream { code: String, message: String },

    #[error("Malformed upstream response: {0}")]
    UpstreamMalformed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn upstream(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Upstream {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Timeout(err.to_string());
        }
        match err.status() {
            Some(status) => Error::upstream(format!("http-{}", status.as_u16()), err.to_string()),
            None if err.is_decode() => Error::UpstreamMalformed(err.to_string()),
            None => Error::upstream("transport", err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::UpstreamMalformed(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display_includes_code() {
        let err = Error::upstream("badparams", "Unrecognized value");
        assert_eq!(err.to_string(), "Upstream error (badparams): Unrecognized value");
    }

    #[test]
    fn classifiers() {
        assert!(Error::NotFound("x".into()).is_not_found());
        assert!(Error::Timeout("x".into()).is_timeout());
        assert!(!Error::upstream("a", "b").is_timeout());
    }

    #[test]
    fn json_errors_are_malformed() {
        let err: Error = serde_json::from_str::<serde_json::Value>("<h1>")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::UpstreamMalformed(_)));
    }
}
