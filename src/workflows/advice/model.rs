use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use super::{
    AdviceError, AdviceProvider, AdviceRequest, CriteriaSuggestionRequest, CriterionSuggestion,
    FinancialWeightSuggestion, FinancialWeightsRequest,
};

/// Advice from a language model behind an HTTP endpoint.
///
/// Each call POSTs `{ "flow", "prompt", "input" }` and expects `{ "output" }`
/// back: Markdown for advice flows, a JSON array for suggestion flows.
/// Calls block on the runtime captured at construction, so they must run off
/// the async worker threads (for example inside `spawn_blocking`).
#[derive(Debug, Clone)]
pub struct ModelAdvisor {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    runtime: Handle,
}

#[derive(Serialize)]
struct ModelCall<'a, I> {
    flow: &'a str,
    prompt: String,
    input: &'a I,
}

#[derive(Deserialize)]
struct ModelReply<O> {
    output: O,
}

impl ModelAdvisor {
    /// Must be called from within a tokio runtime.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AdviceError> {
        let runtime = Handle::try_current().map_err(|err| {
            AdviceError::Unavailable(format!("model advisor needs a tokio runtime: {err}"))
        })?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            runtime,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call<I, O>(&self, flow: &str, prompt: String, input: &I) -> Result<O, AdviceError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let mut request = self.client.post(&self.endpoint).json(&ModelCall {
            flow,
            prompt,
            input,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        self.runtime.block_on(async move {
            let response = request.send().await?.error_for_status()?;
            let reply: ModelReply<O> = response.json().await?;
            Ok::<O, AdviceError>(reply.output)
        })
    }
}

impl AdviceProvider for ModelAdvisor {
    fn advise(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        self.call(request.flow(), request.prompt(), request)
    }

    fn suggest_criteria(
        &self,
        request: &CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, AdviceError> {
        self.call(CriteriaSuggestionRequest::FLOW, request.prompt(), request)
    }

    fn suggest_financial_weights(
        &self,
        request: &FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, AdviceError> {
        self.call(FinancialWeightsRequest::FLOW, request.prompt(), request)
    }
}
