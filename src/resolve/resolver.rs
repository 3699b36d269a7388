// src/resolve/resolver.rs

use std::collections::HashMap;

use crate::errors::{DependencyError, NodeFailure, ValidationError};
use crate::gateway::TransformRequest;
use crate::graph::model::{ColorDeltas, CropRect, InputSlot, Node, NodeParams, ResizeTarget};
use crate::types::ImageData;

/// Resolved parent outputs for one node, keyed by input slot.
#[derive(Debug, Default)]
pub struct SlotInputs<'a> {
    slots: HashMap<InputSlot, &'a ImageData>,
    connected: usize,
}

impl<'a> SlotInputs<'a> {
    /// `connected` is the node's number of incoming connections, which may
    /// exceed the number of resolved inputs if a parent produced nothing.
    pub fn new(connected: usize) -> Self {
        Self {
            slots: HashMap::new(),
            connected,
        }
    }

    pub fn insert(&mut self, slot: InputSlot, image: &'a ImageData) {
        self.slots.insert(slot, image);
    }

    pub fn get(&self, slot: InputSlot) -> Option<&'a ImageData> {
        self.slots.get(&slot).copied()
    }

    pub fn has_connections(&self) -> bool {
        self.connected > 0
    }
}

/// What the scheduler should do with a node, as decided by the resolver.
///
/// The resolver itself never talks to the gateway; it only produces the
/// request descriptor so that resolution stays synchronous and testable.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Output equals the given input; no gateway call.
    PassThrough(&'a ImageData),
    /// Call the gateway with this request; its result is the node's output.
    Transform(TransformRequest),
    /// Record both images for display and forward `b` downstream.
    Compare {
        a: &'a ImageData,
        b: &'a ImageData,
    },
    /// Nothing to do: the node has no incoming connections and no intrinsic
    /// output. Not an error.
    Skip,
}

/// Decide what a node does, given its parameters, its resolved parent
/// outputs and the run's mask (if any).
pub fn resolve<'a>(
    node: &Node,
    inputs: &SlotInputs<'a>,
    mask: Option<&ImageData>,
) -> Result<Resolution<'a>, NodeFailure> {
    match &node.params {
        // The scheduler records the source image directly and never asks the
        // resolver about it.
        NodeParams::Source => Ok(Resolution::Skip),

        NodeParams::Edit { prompt } => {
            if prompt.trim().is_empty() {
                return Err(ValidationError::EmptyPrompt.into());
            }
            let Some(input) = require_primary(inputs)? else {
                return Ok(Resolution::Skip);
            };
            let request = match mask {
                Some(mask) => TransformRequest::new(input.clone(), edit_instruction(prompt, true))
                    .with_mask(mask.clone()),
                None => TransformRequest::new(input.clone(), edit_instruction(prompt, false)),
            };
            Ok(Resolution::Transform(request))
        }

        NodeParams::Crop(rect) => {
            if rect.width <= 0.0 || rect.height <= 0.0 {
                return Err(ValidationError::NonPositiveCrop {
                    width: rect.width,
                    height: rect.height,
                }
                .into());
            }
            let Some(input) = require_primary(inputs)? else {
                return Ok(Resolution::Skip);
            };
            Ok(Resolution::Transform(TransformRequest::new(
                input.clone(),
                crop_instruction(rect),
            )))
        }

        NodeParams::Resize(target) => {
            if target.width.is_none() && target.height.is_none() {
                return Err(ValidationError::MissingResizeTarget.into());
            }
            let Some(input) = require_primary(inputs)? else {
                return Ok(Resolution::Skip);
            };
            Ok(Resolution::Transform(TransformRequest::new(
                input.clone(),
                resize_instruction(target),
            )))
        }

        NodeParams::ColorAdjust(deltas) => {
            let Some(input) = require_primary(inputs)? else {
                return Ok(Resolution::Skip);
            };
            match color_instruction(deltas) {
                Some(instruction) => Ok(Resolution::Transform(TransformRequest::new(
                    input.clone(),
                    instruction,
                ))),
                // All deltas zero: the image passes through untouched.
                None => Ok(Resolution::PassThrough(input)),
            }
        }

        NodeParams::Compare => {
            let (Some(a), Some(b)) = (inputs.get(InputSlot::A), inputs.get(InputSlot::B)) else {
                return Err(ValidationError::MissingCompareInput.into());
            };
            Ok(Resolution::Compare { a, b })
        }

        NodeParams::Output => {
            let Some(input) = require_primary(inputs)? else {
                return Ok(Resolution::Skip);
            };
            Ok(Resolution::PassThrough(input))
        }
    }
}

/// The unnamed-slot input, distinguishing "no connections at all" (`Ok(None)`,
/// a quiet skip) from "connected but the input never arrived" (an error).
fn require_primary<'a>(inputs: &SlotInputs<'a>) -> Result<Option<&'a ImageData>, NodeFailure> {
    match inputs.get(InputSlot::Primary) {
        Some(input) => Ok(Some(input)),
        None if inputs.has_connections() => Err(DependencyError::MissingInput.into()),
        None => Ok(None),
    }
}

/// Instruction for an edit node, optionally rewritten to constrain the edit
/// to the unmasked regions of the image.
pub fn edit_instruction(prompt: &str, masked: bool) -> String {
    if masked {
        format!(
            "Using the provided mask (second image), apply the following edit only to the \
             unmasked (white) areas of the first image: {prompt}"
        )
    } else {
        prompt.to_string()
    }
}

/// Instruction encoding a crop rectangle in percentage terms.
pub fn crop_instruction(rect: &CropRect) -> String {
    format!(
        "Crop the image to a rectangle starting at {}% from the left and {}% from the top, \
         with a width of {}% and a height of {}%.",
        fmt_pct(rect.x),
        fmt_pct(rect.y),
        fmt_pct(rect.width),
        fmt_pct(rect.height)
    )
}

/// Instruction encoding target pixel dimensions and the aspect-ratio rule.
pub fn resize_instruction(target: &ResizeTarget) -> String {
    let mut parts = Vec::new();
    if let Some(w) = target.width {
        parts.push(format!("{w} pixels wide"));
    }
    if let Some(h) = target.height {
        parts.push(format!("{h} pixels high"));
    }

    let mut instruction = format!("Resize the image to {}.", parts.join(" and "));
    if target.preserve_aspect_ratio {
        instruction.push_str(" Maintain the original aspect ratio.");
    } else {
        instruction.push_str(" Do not maintain the original aspect ratio.");
    }
    instruction
}

/// Instruction listing the non-zero colour adjustments, or `None` when all
/// deltas are zero and the node is a pass-through.
pub fn color_instruction(deltas: &ColorDeltas) -> Option<String> {
    let mut adjustments = Vec::new();
    for (name, value) in [
        ("brightness", deltas.brightness),
        ("contrast", deltas.contrast),
        ("saturation", deltas.saturation),
    ] {
        if value != 0 {
            let direction = if value > 0 { "increase" } else { "decrease" };
            adjustments.push(format!("{direction} {name} by {}%", value.abs()));
        }
    }

    if adjustments.is_empty() {
        None
    } else {
        Some(format!(
            "Adjust the image colors: {}.",
            adjustments.join(", ")
        ))
    }
}

/// Percentages print without a trailing `.0` when they are whole numbers.
fn fmt_pct(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
