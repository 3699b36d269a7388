// tests/workflow_validation.rs

mod common;
use crate::common::builders::WorkflowBuilder;

use pixeldag::config::validate_workflow;
use pixeldag::errors::WorkflowError;
use pixeldag::graph::InputSlot;

#[test]
fn valid_workflow_passes() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("pop", "make it pop")
        .compare("ab")
        .output("final")
        .connect("photo", "pop")
        .connect_slot("photo", "ab", InputSlot::A)
        .connect_slot("pop", "ab", InputSlot::B)
        .connect("ab", "final")
        .build_unchecked();

    assert!(validate_workflow(&workflow).is_ok());
}

#[test]
fn empty_workflow_is_rejected() {
    let workflow = WorkflowBuilder::new().build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::NoNodes)
    ));
}

#[test]
fn workflow_without_source_is_rejected() {
    let workflow = WorkflowBuilder::new()
        .edit("pop", "make it pop")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::NoSourceNode)
    ));
}

#[test]
fn two_sources_are_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo-1")
        .source("photo-2")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::MultipleSourceNodes(_, _))
    ));
}

#[test]
fn unknown_endpoint_is_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .output("final")
        .connect("photo", "ghost")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::UnknownNode { node, .. }) if node == "ghost"
    ));
}

#[test]
fn self_loop_is_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("pop", "make it pop")
        .connect("pop", "pop")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::SelfLoop(_, node)) if node == "pop"
    ));
}

#[test]
fn two_connections_into_one_slot_are_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("pop", "make it pop")
        .output("final")
        .connect("photo", "final")
        .connect("pop", "final")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::DuplicateSlot { node, .. }) if node == "final"
    ));
}

#[test]
fn compare_requires_named_slots() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .compare("ab")
        .connect("photo", "ab")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::CompareSlotRequired(node)) if node == "ab"
    ));
}

#[test]
fn named_slots_on_ordinary_nodes_are_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("pop", "make it pop")
        .connect_slot("photo", "pop", InputSlot::B)
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::UnexpectedSlot { node, .. }) if node == "pop"
    ));
}

#[test]
fn connections_into_the_source_are_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("pop", "make it pop")
        .connect("pop", "photo")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::SourceHasParents(node)) if node == "photo"
    ));
}

#[test]
fn connections_out_of_an_output_are_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .output("final")
        .edit("pop", "make it pop")
        .connect("photo", "final")
        .connect("final", "pop")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::OutputHasSuccessors(node)) if node == "final"
    ));
}

#[test]
fn cycles_are_rejected() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("a", "first")
        .edit("b", "second")
        .edit("c", "third")
        .connect("photo", "a")
        .connect("a", "b")
        .connect("b", "c")
        .connect("c", "a")
        .build_unchecked();
    assert!(matches!(
        validate_workflow(&workflow),
        Err(WorkflowError::CycleDetected(_))
    ));
}

#[test]
fn disconnected_nodes_are_legal() {
    let workflow = WorkflowBuilder::new()
        .source("photo")
        .edit("pop", "make it pop")
        .crop("island", 0.0, 0.0, 50.0, 50.0)
        .connect("photo", "pop")
        .build_unchecked();
    assert!(validate_workflow(&workflow).is_ok());
}
