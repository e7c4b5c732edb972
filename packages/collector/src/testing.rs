//! Testing utilities including mock implementations.
//!
//! These are useful for testing hosts that use the collector library
//! without making real AI calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::error::{ExtractionError, Result};
use crate::traits::ai::AI;
use crate::types::config::GenerationOptions;

/// A scripted response for [`MockAI`].
#[derive(Debug)]
pub enum MockResponse {
    /// Return this text
    Text(String),
    /// Fail with this error
    Error(ExtractionError),
}

/// Record of a call made to the mock AI.
#[derive(Debug, Clone)]
pub struct MockAICall {
    pub prompt: String,
    pub options: GenerationOptions,
}

/// A mock AI implementation for testing.
///
/// Responses are consumed in order, one per call. Once the script runs out,
/// every further call fails with `MalformedResponse`, so an unexpected
/// extra call shows up as a test failure instead of a hang.
#[derive(Default, Clone)]
pub struct MockAI {
    /// Scripted responses, front first
    responses: Arc<RwLock<VecDeque<MockResponse>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAICall>>>,
}

impl MockAI {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text response.
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.with_response(MockResponse::Text(text.into()))
    }

    /// Queue an error.
    pub fn fail(self, error: ExtractionError) -> Self {
        self.with_response(MockResponse::Error(error))
    }

    /// Queue a response.
    pub fn with_response(self, response: MockResponse) -> Self {
        self.responses.write().unwrap().push_back(response);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl AI for MockAI {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String> {
        self.calls.write().unwrap().push(MockAICall {
            prompt: prompt.to_string(),
            options,
        });

        let next = self.responses.write().unwrap().pop_front();
        match next {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Error(error)) => Err(error),
            None => Err(ExtractionError::MalformedResponse {
                reason: "mock script exhausted".to_string(),
            }),
        }
    }
}
