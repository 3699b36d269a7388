// src/resolve/mod.rs

//! Per-kind node resolution.
//!
//! Given a node's parameters and its resolved parent outputs, [`resolve`]
//! decides whether the node passes its input through, needs a gateway
//! transformation (and with which instruction), captures a comparison pair,
//! or has nothing to do.

pub mod resolver;

pub use resolver::{
    color_instruction, crop_instruction, edit_instruction, resize_instruction, resolve,
    Resolution, SlotInputs,
};
