// tests/run_mask_edit.rs

mod common;
use crate::common::builders::WorkflowBuilder;
use crate::common::fake_gateway::FakeGateway;
use crate::common::{init_tracing, test_image, test_source};

use pixeldag::graph::NodeStatus;
use pixeldag::run::RunController;

#[tokio::test]
async fn mask_rewrites_the_edit_instruction_and_rides_along() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("recolor", "paint the sky red")
        .connect("photo", "recolor")
        .build();

    let mask = test_image("mask");
    let source = test_source("original").with_mask(mask.clone());
    let gateway = FakeGateway::new();

    let mut controller = RunController::new();
    let report = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    assert_eq!(report.status_of("recolor"), Some(NodeStatus::Succeeded));

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].instruction,
        "Using the provided mask (second image), apply the following edit only to the \
         unmasked (white) areas of the first image: paint the sky red"
    );
    assert_eq!(calls[0].mask.as_ref(), Some(&mask));
}

#[tokio::test]
async fn without_a_mask_the_prompt_is_sent_verbatim() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("recolor", "paint the sky red")
        .connect("photo", "recolor")
        .build();

    let source = test_source("original");
    let gateway = FakeGateway::new();

    let mut controller = RunController::new();
    controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].instruction, "paint the sky red");
    assert!(calls[0].mask.is_none());
}

#[tokio::test]
async fn mask_does_not_affect_crop_nodes() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .crop("trim", 0.0, 0.0, 50.0, 50.0)
        .connect("photo", "trim")
        .build();

    let source = test_source("original").with_mask(test_image("mask"));
    let gateway = FakeGateway::new();

    let mut controller = RunController::new();
    controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].mask.is_none());
    assert!(calls[0].instruction.starts_with("Crop the image"));
}
