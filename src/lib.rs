// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod graph;
pub mod logging;
pub mod resolve;
pub mod run;
pub mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::{GatewaySection, WorkflowFile};
use crate::gateway::HttpGateway;
use crate::graph::{InputSlot, NodeKind, NodeParams, NodeStatus, RunReport, Workflow};
use crate::run::{RunController, RunEvent};
use crate::types::{mime_for_path, ImageData, SourceImage};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - workflow loading and validation
/// - source image / mask loading
/// - the HTTP gateway
/// - the run controller, with a progress printer on the event channel
/// - summary printing and output writing
pub async fn run(args: CliArgs) -> Result<()> {
    let workflow_path = PathBuf::from(&args.workflow);
    let (file, workflow) = load_and_validate(&workflow_path)
        .with_context(|| format!("loading workflow from {workflow_path:?}"))?;

    if args.dry_run {
        print_dry_run(&file, &workflow);
        return Ok(());
    }

    let source = load_source_image(&file, &workflow_path)?;
    let gateway = build_gateway(&file.gateway)?;

    // Progress printer, decoupled from the scheduler via the event channel.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RunEvent>();
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                RunEvent::NodeStarted { node } => info!(node = %node, "processing node"),
                RunEvent::NodeSucceeded { node } => info!(node = %node, "node finished"),
                RunEvent::NodeFailed { node, message } => {
                    warn!(node = %node, error = %message, "node failed");
                }
                RunEvent::NodeSkipped { node } => {
                    debug!(node = %node, "node had nothing to do");
                }
            }
        }
    });

    let mut controller = RunController::new();
    let report = controller
        .run_with_events(&workflow, source.as_ref(), &gateway, Some(event_tx))
        .await?;

    // The sender was moved into the run; the printer drains and exits.
    printer.await?;

    print_summary(&workflow, &report);
    write_outputs(&workflow, &report, Path::new(&args.out))?;

    Ok(())
}

/// Read the source image (and optional mask) declared on the source node.
///
/// Paths are resolved relative to the workflow file's directory. Returns
/// `None` when the source node declares no image; the run controller then
/// refuses to start with its usual validation error.
fn load_source_image(file: &WorkflowFile, workflow_path: &Path) -> Result<Option<SourceImage>> {
    let Some(files) = file.source_files() else {
        return Ok(None);
    };
    let Some(image_path) = files.image else {
        return Ok(None);
    };

    let root = workflow_root_dir(workflow_path);
    let image_path = root.join(image_path);
    let bytes = fs::read(&image_path)
        .with_context(|| format!("reading source image {image_path:?}"))?;

    let mut source = SourceImage::new(ImageData::new(bytes, mime_for_path(&image_path)));
    if let Some(name) = image_path.file_name().and_then(|n| n.to_str()) {
        source = source.with_file_name(name);
    }

    if let Some(mask_path) = files.mask {
        let mask_path = root.join(mask_path);
        let bytes = fs::read(&mask_path)
            .with_context(|| format!("reading mask image {mask_path:?}"))?;
        source = source.with_mask(ImageData::new(bytes, mime_for_path(&mask_path)));
    }

    Ok(Some(source))
}

/// Directory the workflow file lives in, for resolving relative image paths.
///
/// - If the workflow path has a non-empty parent (e.g. "flows/Pixeldag.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Pixeldag.toml" (parent = ""),
///   we fall back to the current working directory "."
fn workflow_root_dir(workflow_path: &Path) -> PathBuf {
    match workflow_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Construct the production gateway from `[gateway]` settings.
fn build_gateway(cfg: &GatewaySection) -> Result<HttpGateway> {
    let api_key = std::env::var(&cfg.api_key_env).map_err(|_| {
        anyhow!(
            "environment variable {} not set (required for the transformation gateway)",
            cfg.api_key_env
        )
    })?;

    Ok(HttpGateway::new(
        &cfg.endpoint,
        &cfg.model,
        api_key,
        Duration::from_secs(cfg.timeout_secs),
    )?)
}

/// Per-node result lines after a run.
fn print_summary(workflow: &Workflow, report: &RunReport) {
    println!("run summary:");
    for node in &workflow.nodes {
        let Some(record) = report.record(&node.id) else {
            continue;
        };
        let status = match record.status {
            NodeStatus::Pending => "pending",
            NodeStatus::Running => "running",
            NodeStatus::Succeeded => "succeeded",
            NodeStatus::Failed => "failed",
        };
        match &record.error {
            Some(err) => println!("  - {} [{}]: {status} ({err})", node.id, node.kind()),
            None => println!("  - {} [{}]: {status}", node.id, node.kind()),
        }
    }
}

/// Write each output node's image into `out_dir` as `<node id>.<ext>`.
fn write_outputs(workflow: &Workflow, report: &RunReport, out_dir: &Path) -> Result<()> {
    let outputs: Vec<_> = workflow
        .nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::Output)
        .filter_map(|n| report.output_of(&n.id).map(|img| (n, img)))
        .collect();

    if outputs.is_empty() {
        return Ok(());
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {out_dir:?}"))?;

    for (node, image) in outputs {
        let path = out_dir.join(format!("{}.{}", node.id, image.extension()));
        fs::write(&path, &image.bytes)
            .with_context(|| format!("writing output image {path:?}"))?;
        info!(node = %node.id, path = %path.display(), "wrote output image");
    }

    Ok(())
}

/// Simple dry-run output: print nodes, parameters and connections.
fn print_dry_run(file: &WorkflowFile, workflow: &Workflow) {
    println!("pixeldag dry-run");
    println!("  gateway.model = {}", file.gateway.model);
    println!("  gateway.endpoint = {}", file.gateway.endpoint);
    println!();

    println!("nodes ({}):", workflow.nodes.len());
    for node in &workflow.nodes {
        println!("  - {} [{}]", node.id, node.kind());
        match &node.params {
            NodeParams::Source => {
                if let Some(files) = file.source_files() {
                    if let Some(path) = files.image {
                        println!("      image: {}", path.display());
                    }
                    if let Some(path) = files.mask {
                        println!("      mask: {}", path.display());
                    }
                }
            }
            NodeParams::Edit { prompt } => println!("      prompt: {prompt}"),
            NodeParams::Crop(rect) => println!(
                "      rect: x={}% y={}% width={}% height={}%",
                rect.x, rect.y, rect.width, rect.height
            ),
            NodeParams::Resize(target) => {
                if let Some(w) = target.width {
                    println!("      width: {w}px");
                }
                if let Some(h) = target.height {
                    println!("      height: {h}px");
                }
                println!("      preserve_aspect_ratio: {}", target.preserve_aspect_ratio);
            }
            NodeParams::ColorAdjust(deltas) => println!(
                "      brightness: {} contrast: {} saturation: {}",
                deltas.brightness, deltas.contrast, deltas.saturation
            ),
            NodeParams::Compare | NodeParams::Output => {}
        }
    }

    println!();
    println!("connections ({}):", workflow.connections.len());
    for conn in &workflow.connections {
        match conn.slot {
            InputSlot::Primary => println!("  - {} -> {}", conn.source, conn.target),
            slot => println!("  - {} -> {} (slot {slot})", conn.source, conn.target),
        }
    }

    debug!("dry-run complete (no execution)");
}
