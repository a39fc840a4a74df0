use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// Extracts `<Code>` from an S3 XML error document
    static ref S3_ERROR_CODE_REGEX: Regex = Regex::new(r"<Code>\s*([^<]+?)\s*</Code>").unwrap();

    /// Extracts `<Message>` from an S3 XML error document
    static ref S3_ERROR_MESSAGE_REGEX: Regex =
        Regex::new(r"(?s)<Message>\s*(.*?)\s*</Message>").unwrap();

    /// The predefined XML entities
    static ref XML_ENTITY_REGEX: Regex = Regex::new(r"&(amp|lt|gt|quot|apos);").unwrap();
}

/// Decode the five predefined XML entities in element text
fn unescape_xml(text: &str) -> String {
    XML_ENTITY_REGEX
        .replace_all(text, |caps: &regex::Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}

/// Failure reported by an object store call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend answered and rejected the call
    #[error("{}", describe_service_error(.status, .code, .message))]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    /// The call never produced a backend answer (connection, TLS, signing, malformed response)
    #[error("{0}")]
    Transport(String),
}

fn describe_service_error(status: &u16, code: &str, message: &str) -> String {
    match (code.is_empty(), message.is_empty()) {
        (false, false) => format!("{} (HTTP {}): {}", code, status, message),
        (false, true) => format!("{} (HTTP {})", code, status),
        (true, false) => format!("HTTP {}: {}", status, message),
        (true, true) => format!("HTTP {}", status),
    }
}

impl StorageError {
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build a service error from a non-2xx status and its (possibly empty) XML body
    pub fn from_http_response(status: u16, body: &str) -> Self {
        let code = S3_ERROR_CODE_REGEX
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| unescape_xml(m.as_str()))
            .unwrap_or_default();
        let message = S3_ERROR_MESSAGE_REGEX
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| unescape_xml(m.as_str()))
            .unwrap_or_default();

        Self::Service {
            status,
            code,
            message,
        }
    }

    /// Whether the backend reported that the object does not exist.
    ///
    /// A missing bucket is not treated as a missing object.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Service { status, code, .. } => match code.as_str() {
                "NoSuchKey" | "NotFound" => true,
                "" => *status == 404,
                _ => false,
            },
            Self::Transport(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_error_document() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchKey</Code>
  <Message>The specified key does not exist.</Message>
  <Key>a/b.png</Key>
  <RequestId>4442587FB7D0A2F9</RequestId>
</Error>"#;

        let err = StorageError::from_http_response(404, body);
        assert_eq!(
            err,
            StorageError::service(404, "NoSuchKey", "The specified key does not exist.")
        );
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "NoSuchKey (HTTP 404): The specified key does not exist."
        );
    }

    #[test]
    fn test_xml_entities_are_decoded() {
        let body = "<Error><Code>InvalidArgument</Code>\
<Message>Header &quot;x-amz-meta&quot; &amp; value &lt;bad&gt; isn&apos;t valid</Message></Error>";

        let err = StorageError::from_http_response(400, body);
        assert_eq!(
            err,
            StorageError::service(
                400,
                "InvalidArgument",
                "Header \"x-amz-meta\" & value <bad> isn't valid"
            )
        );
        // Decoded once only
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_empty_body_keeps_status() {
        let err = StorageError::from_http_response(404, "");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404");

        let err = StorageError::from_http_response(503, "");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_missing_bucket_is_not_object_not_found() {
        let err = StorageError::service(404, "NoSuchBucket", "The specified bucket does not exist");
        assert!(!err.is_not_found());

        let err = StorageError::service(403, "AccessDenied", "Access Denied");
        assert!(!err.is_not_found());
        assert!(!StorageError::Transport("connection refused".to_string()).is_not_found());
    }
}
