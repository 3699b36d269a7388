// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::WorkflowError;
use crate::graph::model::{
    ColorDeltas, Connection, CropRect, InputSlot, Node, NodeParams, ResizeTarget, Workflow,
};

/// Top-level workflow description as read from a TOML file.
///
/// ```toml
/// [gateway]
/// model = "gemini-2.5-flash-image-preview"
///
/// [node.photo]
/// kind = "source"
/// image = "photo.png"
///
/// [node.pop]
/// kind = "edit"
/// prompt = "Make this picture pop with vibrant colors."
///
/// [node.final]
/// kind = "output"
///
/// [[connection]]
/// source = "photo"
/// target = "pop"
///
/// [[connection]]
/// source = "pop"
/// target = "final"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowFile {
    /// Gateway settings from `[gateway]`.
    #[serde(default)]
    pub gateway: GatewaySection,

    /// All nodes from `[node.<id>]`. Keys are the node ids.
    #[serde(default)]
    pub node: BTreeMap<String, NodeConfig>,

    /// All connections from `[[connection]]`, in file order.
    #[serde(default)]
    pub connection: Vec<ConnectionConfig>,
}

/// `[gateway]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySection {
    /// Model identifier sent to the transformation endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the transformation endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[node.<id>]` section: the node kind plus its kind-specific fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeConfig {
    Source {
        /// Path to the image loaded into the source node before a run.
        #[serde(default)]
        image: Option<PathBuf>,
        /// Optional mask constraining edit nodes to the unmasked regions.
        #[serde(default)]
        mask: Option<PathBuf>,
    },
    Edit {
        prompt: String,
    },
    Crop {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        #[serde(default = "default_crop_extent")]
        width: f64,
        #[serde(default = "default_crop_extent")]
        height: f64,
    },
    Resize {
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
        #[serde(default = "default_true")]
        preserve_aspect_ratio: bool,
    },
    ColorAdjust {
        #[serde(default)]
        brightness: i32,
        #[serde(default)]
        contrast: i32,
        #[serde(default)]
        saturation: i32,
    },
    Compare {},
    Output {},
}

fn default_crop_extent() -> f64 {
    100.0
}

fn default_true() -> bool {
    true
}

/// `[[connection]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Optional stable id; connections without one are numbered in file order.
    #[serde(default)]
    pub id: Option<String>,

    pub source: String,
    pub target: String,

    /// Slot label on the target: `"A"`, `"B"` or `"default"`.
    #[serde(default)]
    pub slot: Option<String>,
}

/// Paths declared on the source node, to be loaded before a run.
#[derive(Debug, Clone, Copy)]
pub struct SourceFiles<'a> {
    pub image: Option<&'a Path>,
    pub mask: Option<&'a Path>,
}

impl WorkflowFile {
    /// Build the in-memory [`Workflow`] this file describes.
    ///
    /// Purely structural: no files are read here. Slot labels are parsed and
    /// reported against the connection that carries them.
    pub fn to_workflow(&self) -> Result<Workflow, WorkflowError> {
        let nodes = self
            .node
            .iter()
            .map(|(id, cfg)| Node::new(id.clone(), cfg.to_params()))
            .collect();

        let mut connections = Vec::with_capacity(self.connection.len());
        for (index, conn) in self.connection.iter().enumerate() {
            let id = conn
                .id
                .clone()
                .unwrap_or_else(|| format!("conn-{}", index + 1));

            let slot = match conn.slot.as_deref() {
                Some(label) => {
                    InputSlot::from_str(label).map_err(|_| WorkflowError::InvalidSlotLabel {
                        connection: id.clone(),
                        slot: label.to_string(),
                    })?
                }
                None => InputSlot::Primary,
            };

            connections.push(
                Connection::new(id, conn.source.clone(), conn.target.clone()).with_slot(slot),
            );
        }

        Ok(Workflow::new(nodes, connections))
    }

    /// Image/mask paths of the first source node, if any.
    pub fn source_files(&self) -> Option<SourceFiles<'_>> {
        self.node.values().find_map(|cfg| match cfg {
            NodeConfig::Source { image, mask } => Some(SourceFiles {
                image: image.as_deref(),
                mask: mask.as_deref(),
            }),
            _ => None,
        })
    }
}

impl NodeConfig {
    fn to_params(&self) -> NodeParams {
        match *self {
            NodeConfig::Source { .. } => NodeParams::Source,
            NodeConfig::Edit { ref prompt } => NodeParams::Edit {
                prompt: prompt.clone(),
            },
            NodeConfig::Crop {
                x,
                y,
                width,
                height,
            } => NodeParams::Crop(CropRect {
                x,
                y,
                width,
                height,
            }),
            NodeConfig::Resize {
                width,
                height,
                preserve_aspect_ratio,
            } => NodeParams::Resize(ResizeTarget {
                width,
                height,
                preserve_aspect_ratio,
            }),
            NodeConfig::ColorAdjust {
                brightness,
                contrast,
                saturation,
            } => NodeParams::ColorAdjust(ColorDeltas {
                brightness,
                contrast,
                saturation,
            }),
            NodeConfig::Compare {} => NodeParams::Compare,
            NodeConfig::Output {} => NodeParams::Output,
        }
    }
}
