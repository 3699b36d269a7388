// tests/run_compare.rs

mod common;
use crate::common::builders::WorkflowBuilder;
use crate::common::fake_gateway::FakeGateway;
use crate::common::{init_tracing, test_image, test_source};

use pixeldag::graph::{InputSlot, NodeStatus};
use pixeldag::run::RunController;

#[tokio::test]
async fn compare_captures_both_inputs_and_forwards_b() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("pop", "make it pop")
        .compare("side-by-side")
        .output("final")
        .connect("photo", "pop")
        .connect_slot("photo", "side-by-side", InputSlot::A)
        .connect_slot("pop", "side-by-side", InputSlot::B)
        .connect("side-by-side", "final")
        .build();

    let source = test_source("original");
    let edited = test_image("popped");
    let gateway = FakeGateway::new().respond_with("make it pop", edited.clone());

    let mut controller = RunController::new();
    let report = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    assert_eq!(report.status_of("side-by-side"), Some(NodeStatus::Succeeded));

    let pair = report.compare_of("side-by-side").unwrap();
    assert_eq!(pair.a, source.image);
    assert_eq!(pair.b, edited);

    // Downstream consumers see the B image, regardless of A.
    assert_eq!(report.output_of("side-by-side"), Some(&edited));
    assert_eq!(report.output_of("final"), Some(&edited));
}

#[tokio::test]
async fn compare_with_missing_b_slot_fails_locally() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .compare("side-by-side")
        .output("final")
        .connect_slot("photo", "side-by-side", InputSlot::A)
        .connect("side-by-side", "final")
        .build();

    let source = test_source("original");
    let gateway = FakeGateway::new();

    let mut controller = RunController::new();
    let report = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    assert_eq!(report.status_of("side-by-side"), Some(NodeStatus::Failed));
    assert!(report
        .error_of("side-by-side")
        .unwrap()
        .contains("'A' and 'B'"));
    assert!(report.compare_of("side-by-side").is_none());

    assert_eq!(report.status_of("final"), Some(NodeStatus::Pending));
}

#[tokio::test]
async fn compare_starves_when_one_parent_fails() {
    init_tracing();

    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("broken", "")
        .compare("side-by-side")
        .connect_slot("photo", "side-by-side", InputSlot::A)
        .connect_slot("broken", "side-by-side", InputSlot::B)
        .connect("photo", "broken")
        .build();

    let source = test_source("original");
    let gateway = FakeGateway::new();

    let mut controller = RunController::new();
    let report = controller
        .run(&workflow, Some(&source), &gateway)
        .await
        .unwrap();

    assert_eq!(report.status_of("broken"), Some(NodeStatus::Failed));

    // Only one of its two inputs ever resolved, so the compare node never
    // became ready and was never attempted.
    assert_eq!(report.status_of("side-by-side"), Some(NodeStatus::Pending));
    assert!(report.error_of("side-by-side").is_none());
}
