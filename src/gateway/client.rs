// src/gateway/client.rs

//! Pluggable transformation gateway abstraction.
//!
//! The scheduler talks to an [`ImageGateway`] instead of a concrete HTTP
//! client. This makes it easy to swap in a scripted fake in tests while
//! keeping the production client in [`http`](super::http).

use std::future::Future;
use std::pin::Pin;

use crate::errors::GatewayError;
use crate::types::ImageData;

/// One derived transformation call: the source image, the natural-language
/// instruction, and an optional mask attached by masked edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub source: ImageData,
    pub instruction: String,
    pub mask: Option<ImageData>,
}

impl TransformRequest {
    pub fn new(source: ImageData, instruction: impl Into<String>) -> Self {
        Self {
            source,
            instruction: instruction.into(),
            mask: None,
        }
    }

    pub fn with_mask(mut self, mask: ImageData) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// Trait abstracting the external image-transformation service.
///
/// Implementations are free to:
/// - perform a real network call (production)
/// - return scripted results without any IO (tests)
pub trait ImageGateway: Send + Sync {
    /// Transform the request's source image according to its instruction.
    ///
    /// Any error is treated by the scheduler as a node-local failure; the
    /// error's message becomes the node's recorded diagnostic.
    fn transform(
        &self,
        request: TransformRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ImageData, GatewayError>> + Send + '_>>;
}
