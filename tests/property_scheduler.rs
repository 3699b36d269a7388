// tests/property_scheduler.rs

//! Property test: along any linear chain, a failure splits the chain into
//! "everything before succeeded, the failing node failed, everything after
//! starved".

use proptest::prelude::*;

use pixeldag::errors::GatewayError;
use pixeldag::graph::{NodeStatus, Workflow};
use pixeldag::run::RunController;
use pixeldag_test_utils::builders::WorkflowBuilder;
use pixeldag_test_utils::fake_gateway::FakeGateway;
use pixeldag_test_utils::test_source;

/// Source followed by `len` edit nodes in a straight line.
fn chain_workflow(len: usize) -> Workflow {
    let mut builder = WorkflowBuilder::new().source("photo");
    for i in 0..len {
        let id = format!("edit-{i}");
        let prev = if i == 0 {
            "photo".to_string()
        } else {
            format!("edit-{}", i - 1)
        };
        builder = builder
            .edit(&id, &format!("chain step {i}"))
            .connect(&prev, &id);
    }
    builder.build()
}

proptest! {
    #[test]
    fn chain_failure_splits_the_chain(
        len in 1..8usize,
        fail_at in proptest::option::of(0..8usize),
    ) {
        let fail_at = fail_at.filter(|k| *k < len);

        let workflow = chain_workflow(len);
        let gateway = match fail_at {
            Some(k) => FakeGateway::new().fail_with(
                &format!("chain step {k}"),
                GatewayError::NoImageReturned,
            ),
            None => FakeGateway::new(),
        };
        let source = test_source("original");

        let report = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(async {
                let mut controller = RunController::new();
                controller
                    .run(&workflow, Some(&source), &gateway)
                    .await
                    .unwrap()
            });

        prop_assert_eq!(report.status_of("photo"), Some(NodeStatus::Succeeded));

        for i in 0..len {
            let id = format!("edit-{i}");
            match fail_at {
                Some(k) if i < k => {
                    prop_assert_eq!(report.status_of(&id), Some(NodeStatus::Succeeded));
                    prop_assert!(report.output_of(&id).is_some());
                }
                Some(k) if i == k => {
                    prop_assert_eq!(report.status_of(&id), Some(NodeStatus::Failed));
                    prop_assert!(report.error_of(&id).is_some());
                }
                Some(_) => {
                    // Starved: never attempted, no output, no error.
                    prop_assert_eq!(report.status_of(&id), Some(NodeStatus::Pending));
                    prop_assert!(report.output_of(&id).is_none());
                    prop_assert!(report.error_of(&id).is_none());
                }
                None => {
                    prop_assert_eq!(report.status_of(&id), Some(NodeStatus::Succeeded));
                }
            }
        }

        // Every node up to and including the failure talks to the gateway
        // exactly once; nothing after it is ever attempted.
        let expected_calls = match fail_at {
            Some(k) => k + 1,
            None => len,
        };
        prop_assert_eq!(gateway.call_count(), expected_calls);
    }
}
