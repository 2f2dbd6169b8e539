//! Scripted backend for use case tests.
//!
//! Replies are queued per agent and stage, keyed by the agent id the system
//! prompt announces (`You are Agent {id} ...`) and by which phase prompt it
//! is. An empty queue yields a well-formed default: a solution, a critique,
//! or a ballot ranking every other agent in ascending order.

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmBackend};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// One scripted backend reply
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    Fail(GatewayError),
    /// Never resolves
    Hang,
    /// Resolves to the inner reply after a sleep
    Delay(Duration, Box<Reply>),
}

impl Reply {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub(crate) fn delayed(delay: Duration, reply: Reply) -> Self {
        Reply::Delay(delay, Box::new(reply))
    }
}

/// Which phase prompt a request carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Stage {
    Generate,
    Discuss,
    Vote,
}

impl Stage {
    fn of(request: &CompletionRequest) -> Self {
        if request.system.contains("Rank all solutions") {
            Stage::Vote
        } else if request.system.contains("Review all solutions") {
            Stage::Discuss
        } else {
            Stage::Generate
        }
    }
}

pub(crate) struct ScriptedBackend {
    queues: Mutex<HashMap<(u32, Stage), VecDeque<Reply>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    latency: Duration,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    /// Sleep this long before every reply
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a reply for the agent's next call at `stage`
    pub(crate) fn push(&self, agent: u32, stage: Stage, reply: Reply) {
        self.queues
            .lock()
            .unwrap()
            .entry((agent, stage))
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Calls made by one agent at one stage
    pub(crate) fn calls_for(&self, agent: u32, stage: Stage) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| agent_of(r) == Some(agent) && Stage::of(r) == stage)
            .count()
    }

    /// Requests sent at one stage, in call order
    pub(crate) fn requests_at(&self, stage: Stage) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| Stage::of(r) == stage)
            .cloned()
            .collect()
    }

    fn default_reply(agent: u32, request: &CompletionRequest) -> Reply {
        let total = council_of(request).unwrap_or(3);
        let stage = Stage::of(request);
        if stage == Stage::Vote {
            let others: Vec<String> = (1..=total)
                .filter(|&id| id != agent)
                .map(|id| id.to_string())
                .collect();
            Reply::text(format!(
                "{{\"rankings\": [{}], \"reasoning\": \"ascending\"}}",
                others.join(", ")
            ))
        } else if stage == Stage::Discuss {
            Reply::text(format!("critique from agent {agent}"))
        } else {
            Reply::text(format!("solution from agent {agent}"))
        }
    }
}

/// Agent id announced by the system prompt
pub(crate) fn agent_of(request: &CompletionRequest) -> Option<u32> {
    let rest = request.system.strip_prefix("You are Agent ")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn council_of(request: &CompletionRequest) -> Option<u32> {
    let (_, rest) = request.system.split_once("in a council of ")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        let agent = agent_of(request).unwrap_or(0);
        let mut reply = self
            .queues
            .lock()
            .unwrap()
            .get_mut(&(agent, Stage::of(request)))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Self::default_reply(agent, request));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        loop {
            match reply {
                Reply::Text(text) => return Ok(text),
                Reply::Fail(error) => return Err(error),
                Reply::Hang => return std::future::pending().await,
                Reply::Delay(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}
