//! Per-request parameters for the model gateway.

use council_domain::Model;

/// Parameters stamped on every completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayParams {
    /// Model shared by every participant.
    pub model: Model,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
}

impl GatewayParams {
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;

    pub fn new(model: Model) -> Self {
        Self {
            model,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for GatewayParams {
    fn default() -> Self {
        Self::new(Model::default())
    }
}
