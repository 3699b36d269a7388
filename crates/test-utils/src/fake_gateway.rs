use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use pixeldag::errors::GatewayError;
use pixeldag::gateway::{ImageGateway, TransformRequest};
use pixeldag::types::ImageData;

/// A scripted gateway that never performs IO.
///
/// - records every request it receives
/// - answers with a configured response when the instruction matches a rule
/// - otherwise derives a deterministic output from the request itself
pub struct FakeGateway {
    rules: Vec<Rule>,
    calls: Mutex<Vec<TransformRequest>>,
}

struct Rule {
    instruction_contains: String,
    response: Result<ImageData, GatewayError>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer any request whose instruction contains `needle` with `image`.
    /// Earlier rules win.
    pub fn respond_with(mut self, needle: &str, image: ImageData) -> Self {
        self.rules.push(Rule {
            instruction_contains: needle.to_string(),
            response: Ok(image),
        });
        self
    }

    /// Fail any request whose instruction contains `needle` with `error`.
    pub fn fail_with(mut self, needle: &str, error: GatewayError) -> Self {
        self.rules.push(Rule {
            instruction_contains: needle.to_string(),
            response: Err(error),
        });
        self
    }

    /// Every request received so far, in call order.
    pub fn calls(&self) -> Vec<TransformRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The default output for an unmatched request: a deterministic function
    /// of the instruction and the source bytes.
    pub fn derived_output(request: &TransformRequest) -> ImageData {
        let mut bytes = b"transformed:".to_vec();
        bytes.extend_from_slice(request.instruction.as_bytes());
        bytes.push(b':');
        bytes.extend_from_slice(&request.source.bytes);
        ImageData::new(bytes, "image/png")
    }
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageGateway for FakeGateway {
    fn transform(
        &self,
        request: TransformRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ImageData, GatewayError>> + Send + '_>> {
        let result = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());

            self.rules
                .iter()
                .find(|r| request.instruction.contains(&r.instruction_contains))
                .map(|r| r.response.clone())
                .unwrap_or_else(|| Ok(Self::derived_output(&request)))
        };

        Box::pin(async move { result })
    }
}
