//! AWS Bedrock Runtime provider.
//!
//! Sends the prompt as the raw `InvokeModel` body and reads the whole response
//! body back as UTF-8 text.

use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::provider::{EndpointConfig, InferenceProvider};

pub struct BedrockProvider {
    client: BedrockClient,
    endpoint: EndpointConfig,
}

impl BedrockProvider {
    /// Validates the endpoint, loads the AWS configuration for its region and
    /// resolves credentials once so a broken setup fails here, not on the
    /// first message.
    pub async fn new(endpoint: EndpointConfig) -> Result<Self> {
        endpoint.validate()?;

        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(endpoint.region.clone()));

        if let Some(ref profile) = endpoint.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        let aws_config = aws_config_loader.load().await;

        let credentials = aws_config
            .credentials_provider()
            .ok_or_else(|| Error::configuration("No AWS credentials provider is configured"))?;
        credentials.provide_credentials().await.map_err(|e| {
            Error::configuration(format!(
                "Failed to resolve AWS credentials: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        info!(
            model = %endpoint.model_id,
            region = %endpoint.region,
            "Bedrock client initialized"
        );

        Ok(Self {
            client: BedrockClient::new(&aws_config),
            endpoint,
        })
    }
}

fn decode_body(body: &[u8]) -> Result<String> {
    std::str::from_utf8(body)
        .map(str::to_string)
        .map_err(|e| Error::inference(format!("Response body is not valid UTF-8: {}", e)))
}

#[async_trait]
impl InferenceProvider for BedrockProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();

        debug!(
            model = %self.endpoint.model_id,
            prompt_bytes = prompt.len(),
            "Calling Bedrock InvokeModel"
        );

        let output = self
            .client
            .invoke_model()
            .model_id(&self.endpoint.model_id)
            .content_type(&self.endpoint.content_type)
            .accept(&self.endpoint.accept)
            .body(Blob::new(prompt.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| {
                Error::inference(format!("InvokeModel failed: {}", DisplayErrorContext(&e)))
            })?;

        let text = decode_body(output.body().as_ref())?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            response_bytes = text.len(),
            "Received Bedrock response"
        );

        Ok(text)
    }

    fn get_provider_name(&self) -> &str {
        "bedrock"
    }

    fn get_model_id(&self) -> &str {
        &self.endpoint.model_id
    }
}
