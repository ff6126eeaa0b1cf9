use crate::error::AnalysisError;
use std::fmt;
use std::future::Future;

/// A text-generation service that turns a prompt into a report
pub trait CompletionBackend {
    /// Send one prompt and return the first generated text segment
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}

/// API key for the completion service. Blank values are treated as absent.
#[derive(Clone)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.trim().to_string()))
        }
    }

    /// Read the key from an environment variable
    pub fn from_env(var: &str) -> Option<Self> {
        match std::env::var(var) {
            Ok(value) => Self::new(value),
            Err(_) => {
                ::log::debug!("{} is not set", var);
                None
            }
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credential_is_absent() {
        assert!(ApiCredential::new("").is_none());
        assert!(ApiCredential::new("   \n").is_none());
    }

    #[test]
    fn test_credential_is_trimmed_and_redacted() {
        let credential = ApiCredential::new(" sk-test \n").unwrap();
        assert_eq!(credential.expose(), "sk-test");
        assert_eq!(format!("{:?}", credential), "ApiCredential(***)");
    }

    #[test]
    fn test_unset_variable() {
        assert!(ApiCredential::from_env("LINK_AUDIT_TEST_UNSET_VARIABLE").is_none());
    }
}
