// tests/run_linear_pipeline.rs

mod common;
use crate::common::builders::WorkflowBuilder;
use crate::common::fake_gateway::FakeGateway;
use crate::common::{init_tracing, test_image, test_source};

use pixeldag::errors::RunError;
use pixeldag::graph::NodeStatus;
use pixeldag::run::RunController;

#[tokio::test]
async fn source_edit_output_chain_succeeds() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("sharpen", "sharpen")
        .output("final")
        .connect("photo", "sharpen")
        .connect("sharpen", "final")
        .build();

    let source = test_source("original");
    let edited = test_image("sharpened");
    let gateway = FakeGateway::new().respond_with("sharpen", edited.clone());

    let mut controller = RunController::new();
    let report = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    assert_eq!(report.status_of("photo"), Some(NodeStatus::Succeeded));
    assert_eq!(report.output_of("photo"), Some(&source.image));

    assert_eq!(report.status_of("sharpen"), Some(NodeStatus::Succeeded));
    assert_eq!(report.output_of("sharpen"), Some(&edited));

    // The output node forwards the edited image untouched.
    assert_eq!(report.status_of("final"), Some(NodeStatus::Succeeded));
    assert_eq!(report.output_of("final"), Some(&edited));

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].instruction, "sharpen");
    assert_eq!(calls[0].source.bytes, source.image.bytes);
    assert!(calls[0].mask.is_none());
}

#[tokio::test]
async fn crop_and_resize_chain_calls_gateway_per_node() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .crop("trim", 10.0, 20.0, 50.0, 40.0)
        .resize("shrink", Some(800), None, true)
        .output("final")
        .connect("photo", "trim")
        .connect("trim", "shrink")
        .connect("shrink", "final")
        .build();

    let source = test_source("original");
    let gateway = FakeGateway::new();

    let mut controller = RunController::new();
    let report = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.succeeded_count(), 4);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].instruction,
        "Crop the image to a rectangle starting at 10% from the left and 20% from the top, \
         with a width of 50% and a height of 40%."
    );
    assert_eq!(
        calls[1].instruction,
        "Resize the image to 800 pixels wide. Maintain the original aspect ratio."
    );

    // The resize node consumed the crop node's output.
    assert_eq!(calls[1].source.bytes, report.output_of("trim").unwrap().bytes);
}

#[tokio::test]
async fn run_refuses_without_source_image() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .output("final")
        .connect("photo", "final")
        .build();

    let gateway = FakeGateway::new();
    let mut controller = RunController::new();
    let err = controller
        .run(&workflow, None, &gateway)
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::MissingSourceImage));
    assert_eq!(gateway.call_count(), 0);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn run_refuses_without_source_node() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .edit("sharpen", "sharpen")
        .output("final")
        .connect("sharpen", "final")
        .build_unchecked();

    let source = test_source("original");
    let gateway = FakeGateway::new();
    let mut controller = RunController::new();
    let err = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::NoSourceNode));
}

#[tokio::test]
async fn siblings_run_in_connection_order() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("first", "first edit")
        .edit("second", "second edit")
        .output("out-1")
        .output("out-2")
        .connect("photo", "first")
        .connect("photo", "second")
        .connect("first", "out-1")
        .connect("second", "out-2")
        .build();

    let source = test_source("original");
    let gateway = FakeGateway::new();

    let mut controller = RunController::new();
    let report = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    assert_eq!(report.failed_count(), 0);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].instruction, "first edit");
    assert_eq!(calls[1].instruction, "second edit");
}
