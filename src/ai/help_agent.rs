use tracing::{info, warn};

use super::client::ChatModel;
use super::prompt::{EMPTY_REPLY, FALLBACK_REPLY, SYSTEM_PROMPT};
use crate::core::retry::{Completion, RetryCaller, RetryError};
use crate::errors::ServiceError;

/// Chat help agent: one model behind the bounded retry caller.
pub struct HelpAgent<M> {
    model: M,
    retry: RetryCaller,
}

impl<M: ChatModel> HelpAgent<M> {
    #[must_use]
    pub fn new(model: M, retry: RetryCaller) -> Self {
        Self { model, retry }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Answers `message`. Error statuses on every attempt produce the fallback
    /// apology rather than an error.
    ///
    /// # Errors
    ///
    /// Returns the last failure when the final attempt could not reach the
    /// model at all, or [`ServiceError::Cancelled`] if the sequence was cancelled.
    pub async fn reply(&self, message: &str) -> Result<String, ServiceError> {
        let outcome = self
            .retry
            .call(|| self.model.generate(SYSTEM_PROMPT, message))
            .await;

        match outcome {
            Ok(Completion::Delivered(reply)) => {
                Ok(reply.text.unwrap_or_else(|| EMPTY_REPLY.to_string()))
            }
            Ok(Completion::Degraded { attempts }) => {
                warn!(attempts, "Model unavailable, answering with fallback");
                Ok(FALLBACK_REPLY.to_string())
            }
            Err(RetryError::Exhausted {
                attempts,
                last_error,
            }) => {
                info!(attempts, "Giving up on model call");
                Err(last_error)
            }
            Err(RetryError::Fatal { error, .. }) => Err(error),
            Err(RetryError::Cancelled { attempts }) => Err(ServiceError::Cancelled(attempts)),
        }
    }
}
