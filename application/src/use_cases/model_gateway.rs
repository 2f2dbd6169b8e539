//! Model gateway
//!
//! Wraps an [`LlmBackend`] with the retry policy for throttled calls and
//! with cancellation. Participants share one gateway through an `Arc`.

use crate::config::{GatewayParams, RetryPolicy};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmBackend};
use council_domain::Message;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Sends one system prompt plus conversation and returns the reply text
pub struct ModelGateway {
    backend: Arc<dyn LlmBackend>,
    params: GatewayParams,
    retry: RetryPolicy,
}

impl ModelGateway {
    pub fn new(backend: Arc<dyn LlmBackend>, params: GatewayParams) -> Self {
        Self {
            backend,
            params,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Send a request, retrying throttled attempts with exponential backoff
    ///
    /// Every other failure is returned immediately. Both the in-flight call
    /// and each backoff wait are raced against `cancel`.
    pub async fn send(
        &self,
        system_prompt: &str,
        conversation: &[Message],
        cancel: &CancellationToken,
    ) -> Result<String, GatewayError> {
        let request = CompletionRequest {
            model: self.params.model.clone(),
            max_tokens: self.params.max_tokens,
            system: system_prompt.to_string(),
            messages: conversation.to_vec(),
        };

        let mut retry = 0;
        loop {
            debug!(
                "Sending request to {} (attempt {}/{})",
                request.model,
                retry + 1,
                self.retry.max_attempts()
            );

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
                result = self.backend.complete(&request) => result,
            };

            let error = match result {
                Ok(text) => return Ok(text),
                Err(e) if e.is_rate_limited() => e,
                Err(e) => return Err(e),
            };

            if retry >= self.retry.max_retries {
                return Err(GatewayError::RetriesExhausted {
                    attempts: retry + 1,
                    source: Box::new(error),
                });
            }

            let delay = self.retry.delay_for(retry);
            warn!("{}; retrying in {:?}", error, delay);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            retry += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::ApiFailure;
    use crate::use_cases::testing::{Reply, ScriptedBackend, Stage};
    use std::time::Duration;
    use tokio::time::Instant;

    fn throttled() -> Reply {
        Reply::Fail(GatewayError::from_api(ApiFailure::new(
            429,
            "rate_limit_error",
            "slow down",
        )))
    }

    fn gateway(backend: &Arc<ScriptedBackend>) -> ModelGateway {
        ModelGateway::new(backend.clone(), GatewayParams::default())
    }

    const SYSTEM: &str = "You are Agent 1 in a council of 3 agents.";

    #[tokio::test]
    async fn test_send_builds_request() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(1, Stage::Generate, Reply::text("hello"));
        let gateway = ModelGateway::new(
            backend.clone(),
            GatewayParams::default().with_max_tokens(512),
        );

        let text = gateway
            .send(SYSTEM, &[Message::user("task")], &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(text, "hello");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system, SYSTEM);
        assert_eq!(requests[0].max_tokens, 512);
        assert_eq!(requests[0].messages, vec![Message::user("task")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_calls_back_off_exponentially() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(1, Stage::Generate, throttled());
        backend.push(1, Stage::Generate, throttled());
        backend.push(1, Stage::Generate, Reply::text("finally"));

        let start = Instant::now();
        let text = gateway(&backend)
            .send(SYSTEM, &[Message::user("task")], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text, "finally");
        assert_eq!(backend.call_count(), 3);
        // 1 s + 2 s of virtual time
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_wraps_last_cause() {
        let backend = Arc::new(ScriptedBackend::new());
        for _ in 0..4 {
            backend.push(1, Stage::Generate, throttled());
        }

        let start = Instant::now();
        let err = gateway(&backend)
            .send(SYSTEM, &[Message::user("task")], &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            GatewayError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 4);
                assert!(source.is_rate_limited());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.call_count(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(
            1,
            Stage::Generate,
            Reply::Fail(GatewayError::Transport("connection reset".into())),
        );

        let err = gateway(&backend)
            .send(SYSTEM, &[Message::user("task")], &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Transport("connection reset".into()));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(1, Stage::Generate, throttled());
        let gateway = gateway(&backend);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let err = gateway
            .send(SYSTEM, &[Message::user("task")], &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_call_in_flight() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(
            1,
            Stage::Generate,
            Reply::delayed(Duration::from_secs(30), Reply::text("too late")),
        );
        let gateway = gateway(&backend);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let err = gateway
            .send(SYSTEM, &[Message::user("task")], &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_hung_call() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(1, Stage::Generate, Reply::Hang);
        let gateway = gateway(&backend);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            canceller.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(60),
            gateway.send(SYSTEM, &[Message::user("task")], &cancel),
        )
        .await
        .expect("hung call must end on cancellation");
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_before_call() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(1, Stage::Generate, Reply::Hang);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = gateway(&backend)
            .send(SYSTEM, &[Message::user("task")], &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
