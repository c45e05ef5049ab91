use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Something that turns a prompt into a model reply.
///
/// Implementations return the failure instead of hiding it; callers decide
/// what to show the user.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn get_provider_name(&self) -> &str;

    fn get_model_id(&self) -> &str;
}

/// Parameters identifying the remote model. Fixed once a provider is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub model_id: String,
    pub region: String,
    pub profile: Option<String>,
    pub content_type: String,
    pub accept: String,
}

impl EndpointConfig {
    pub fn new(model_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            region: region.into(),
            profile: None,
            content_type: "text/plain".to_string(),
            accept: "text/plain".to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_id.trim().is_empty() {
            return Err(Error::configuration("model identifier is empty"));
        }
        if self.region.trim().is_empty() {
            return Err(Error::configuration("region is empty"));
        }
        if self.content_type.trim().is_empty() || self.accept.trim().is_empty() {
            return Err(Error::configuration("content type negotiation is not configured"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults() {
        let endpoint = EndpointConfig::new("anthropic.claude-v3.sonnet", "us-east-1");
        assert_eq!(endpoint.content_type, "text/plain");
        assert_eq!(endpoint.accept, "text/plain");
        assert!(endpoint.profile.is_none());
        assert!(endpoint.validate().is_ok());
    }

    #[test]
    fn test_endpoint_validation() {
        let endpoint = EndpointConfig::new("", "us-east-1");
        assert!(matches!(endpoint.validate(), Err(Error::Configuration(_))));

        let endpoint = EndpointConfig::new("anthropic.claude-v3.sonnet", " ");
        assert!(matches!(endpoint.validate(), Err(Error::Configuration(_))));

        let mut endpoint = EndpointConfig::new("anthropic.claude-v3.sonnet", "us-east-1");
        endpoint.accept.clear();
        assert!(matches!(endpoint.validate(), Err(Error::Configuration(_))));
    }
}
