//! Wiring the production agent from configuration.

use crate::config::AgentConfig;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::parser::LlmCommandParser;
use graph::{ClientSecretCredential, GraphClient, TokenCache, GRAPH_SCOPE};
use llm::remote::OpenAiClient;
use llm::RemoteLlmConfig;
use std::sync::Arc;
use tracing::info;
use utils::{ClientConfig, HttpClient};

/// The agent as deployed: Graph for directory calls, Azure OpenAI for parsing.
pub type EntraAgent = Orchestrator<GraphClient, LlmCommandParser<OpenAiClient>>;

fn user_agent() -> String {
    format!("entra-agent/{}", env!("CARGO_PKG_VERSION"))
}

/// Build the Graph client, credential and token cache.
pub fn build_graph_client(config: &AgentConfig) -> Result<GraphClient> {
    let http = HttpClient::new(ClientConfig::new().with_user_agent(user_agent()))?;
    let credential = ClientSecretCredential::new(
        http.clone(),
        config.tenant_id.clone(),
        config.client_id.clone(),
        config.client_secret.clone(),
    )
    .with_authority_host(config.authority_host.clone());

    Ok(GraphClient::new(http, TokenCache::new(Arc::new(credential), GRAPH_SCOPE))
        .with_base_url(config.graph_base_url.clone()))
}

/// Build the Azure OpenAI backed command parser.
pub fn build_parser(config: &AgentConfig) -> Result<LlmCommandParser<OpenAiClient>> {
    let llm_config = RemoteLlmConfig::azure(
        config.openai_api_key.clone(),
        config.openai_endpoint.clone(),
        config.openai_deployment.clone(),
        config.openai_api_version.clone(),
    );
    Ok(LlmCommandParser::new(OpenAiClient::new(llm_config)?))
}

/// Build the complete agent.
pub fn build_agent(config: &AgentConfig) -> Result<EntraAgent> {
    let agent = Orchestrator::new(build_graph_client(config)?, build_parser(config)?);
    info!(
        tenant_id = %config.tenant_id,
        deployment = %config.openai_deployment,
        graph = %config.graph_base_url,
        "Entra agent initialized"
    );
    Ok(agent)
}
