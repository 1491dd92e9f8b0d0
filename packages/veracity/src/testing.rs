//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the verification
//! library without making real model or network calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::error::{Result, VeracityError};
use crate::traits::model::{LanguageModel, OutputBudget};

pub use crate::traits::searcher::MockWebSearcher;

/// One scripted model reply.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockModelCall {
    pub prompt: String,
    pub budget: OutputBudget,
}

/// A mock language model for testing.
///
/// Replies are served from a queue in order; once the queue is empty the
/// default reply (if any) is repeated, otherwise the call fails.
#[derive(Default)]
pub struct MockModel {
    replies: Mutex<VecDeque<MockReply>>,
    default_reply: Option<MockReply>,
    calls: Mutex<Vec<MockModelCall>>,
    disabled: bool,
}

impl MockModel {
    /// Create a mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// A model reporting itself as unconfigured.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Queue a text reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queue a failing reply.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Fail(message.into()));
        self
    }

    /// Reply with this text whenever the queue is empty.
    pub fn with_default_response(mut self, text: impl Into<String>) -> Self {
        self.default_reply = Some(MockReply::Text(text.into()));
        self
    }

    /// Fail every call once the queue is empty.
    pub fn failing(mut self) -> Self {
        self.default_reply = Some(MockReply::Fail("mock model failure".into()));
        self
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<MockModelCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    /// Output budgets requested so far, in order.
    pub fn budgets(&self) -> Vec<OutputBudget> {
        self.calls().into_iter().map(|c| c.budget).collect()
    }

    fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    async fn generate(&self, prompt: &str, budget: OutputBudget) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockModelCall {
                prompt: prompt.to_string(),
                budget,
            });

        let next = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .or_else(|| self.default_reply.clone());

        match next {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(VeracityError::model(std::io::Error::other(message))),
            None => Err(VeracityError::model(std::io::Error::other(
                "mock model has no scripted reply",
            ))),
        }
    }
}
