pub mod bedrock;
pub mod provider;

pub use bedrock::BedrockProvider;
pub use provider::{EndpointConfig, InferenceProvider};
