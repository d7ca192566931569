//! HTTP client for the mind service.
//!
//! [`HttpMind`] implements [`MindService`] over `reqwest`. Every call is a
//! single request with no retry. A non-success status becomes
//! [`MindError::Status`]; a body that is not the expected JSON becomes
//! [`MindError::Decode`].

use nature_types::{CommunityId, Percept};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::MindConfig;
use crate::endpoints;
use crate::error::MindError;
use crate::protocol::{
    Acknowledgement, ActionQuery, AgentRegistration, CommunityCreated, DecisionReply,
    PerceptBatch, PerceptBatchReply,
};
use crate::MindService;

/// Mind service client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMind {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMind {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MindError::Config`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(config: &MindConfig) -> Result<Self, MindError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MindError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

impl MindService for HttpMind {
    async fn create_community(&self) -> Result<CommunityId, MindError> {
        let response = self
            .client
            .post(self.url(endpoints::COMMUNITY))
            .send()
            .await
            .map_err(|e| transport(endpoints::COMMUNITY, &e))?;

        let created: CommunityCreated = read_json(endpoints::COMMUNITY, response).await?;
        debug!(community = %created.id, "Community registered with mind service");
        Ok(created.id)
    }

    async fn create_agent(
        &self,
        registration: &AgentRegistration,
    ) -> Result<Acknowledgement, MindError> {
        let response = self
            .client
            .post(self.url(endpoints::AGENT))
            .json(registration)
            .send()
            .await
            .map_err(|e| transport(endpoints::AGENT, &e))?;

        read_json(endpoints::AGENT, response).await
    }

    async fn request_action(&self, query: &ActionQuery) -> Result<DecisionReply, MindError> {
        let response = self
            .client
            .get(self.url(endpoints::ACTION))
            .query(query)
            .send()
            .await
            .map_err(|e| transport(endpoints::ACTION, &e))?;

        read_json(endpoints::ACTION, response).await
    }

    async fn submit_percepts(&self, percepts: &[Percept]) -> Result<PerceptBatchReply, MindError> {
        let response = self
            .client
            .post(self.url(endpoints::PERCEPT_GROUP))
            .json(&PerceptBatch { percepts })
            .send()
            .await
            .map_err(|e| transport(endpoints::PERCEPT_GROUP, &e))?;

        read_json(endpoints::PERCEPT_GROUP, response).await
    }
}

fn transport(endpoint: &'static str, error: &reqwest::Error) -> MindError {
    MindError::Transport {
        endpoint,
        message: error.to_string(),
    }
}

/// Check the status, then decode the body as JSON.
async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T, MindError> {
    let status = response.status();
    if !status.is_success() {
        return Err(MindError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| transport(endpoint, &e))?;

    serde_json::from_slice(&body).map_err(|source| MindError::Decode { endpoint, source })
}
