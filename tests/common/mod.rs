// tests/common/mod.rs

#![allow(dead_code)]

pub use pixeldag_test_utils::builders;
pub use pixeldag_test_utils::fake_gateway;
pub use pixeldag_test_utils::{init_tracing, test_image, test_source};
