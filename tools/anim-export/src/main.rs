//! anim-export - animation export tool
//!
//! Converts a scene snapshot (JSON) or glTF/GLB file into the versioned
//! animation JSON document (`.anim.json`) read by AnbMaker.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use anim_export::object::object_fps;
use anim_export::{
    export_document, load_gltf_scene, write_document, ExportConfig, ExportOptions, ExportSummary,
    SceneGraph,
};
use anim_shared::{ANIM_JSON_EXT, CONFIG_FILE_NAME};

#[derive(Parser)]
#[command(name = "anim-export")]
#[command(about = "Animation export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every object of a scene to an animation document
    Export {
        /// Input scene snapshot (.json) or glTF/GLB file
        input: PathBuf,

        /// Output .anim.json file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to anim-export.toml (default: ./anim-export.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Spaces per indent level
        #[arg(long)]
        indent: Option<usize>,

        /// Frame rate for objects not linked into any scene
        #[arg(long)]
        fallback_fps: Option<f32>,

        /// Include keyframe type, easing and amplitude
        #[arg(long)]
        keyframe_details: bool,

        /// Frame rate used to convert glTF seconds to frames
        #[arg(long)]
        gltf_fps: Option<f32>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the objects, armatures and actions of a scene without exporting
    Inspect {
        /// Input scene snapshot (.json) or glTF/GLB file
        input: PathBuf,

        /// Frame rate used to convert glTF seconds to frames
        #[arg(long)]
        gltf_fps: Option<f32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Export { verbose: true, .. } => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            compact,
            indent,
            fallback_fps,
            keyframe_details,
            gltf_fps,
            verbose: _,
        } => {
            let mut options = load_options(config.as_deref())?;
            if compact {
                options.pretty = false;
            }
            if let Some(indent) = indent {
                options.indent = indent;
            }
            if fallback_fps.is_some() {
                options.fallback_fps = fallback_fps;
            }
            if keyframe_details {
                options.keyframe_details = true;
            }
            if let Some(fps) = gltf_fps {
                options.gltf_fps = fps;
            }
            options.validate()?;

            let output = output.unwrap_or_else(|| input.with_extension(ANIM_JSON_EXT));
            tracing::info!("Exporting {:?} -> {:?}", input, output);

            let graph = load_scene(&input, options.gltf_fps)?;
            let document = export_document(&graph, &options).map_err(|err| {
                let subject = err.subject().to_string();
                anyhow::Error::new(err)
                    .context(format!("Failed to export '{}' from {:?}", subject, input))
            })?;
            write_document(&document, &output, &options)?;

            let summary = ExportSummary::of(&document);
            tracing::info!(
                "Exporter finished: {} objects, {} bones, {} keyframes",
                summary.objects,
                summary.bones,
                summary.keyframes
            );
        }

        Commands::Inspect { input, gltf_fps } => {
            let mut options = load_options(None)?;
            if let Some(fps) = gltf_fps {
                options.gltf_fps = fps;
            }
            options.validate()?;

            let graph = load_scene(&input, options.gltf_fps)?;
            inspect(&input, &graph, &options);
        }
    }

    Ok(())
}

/// Options from an explicit config, `./anim-export.toml`, or defaults
fn load_options(config: Option<&Path>) -> Result<ExportOptions> {
    if let Some(path) = config {
        return Ok(ExportConfig::load(path)?.to_options());
    }

    let local = Path::new(CONFIG_FILE_NAME);
    if local.exists() {
        tracing::debug!("Using {}", local.display());
        return Ok(ExportConfig::load(local)?.to_options());
    }

    Ok(ExportOptions::default())
}

/// Detect the scene source by extension
fn load_scene(input: &Path, gltf_fps: f32) -> Result<SceneGraph> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => SceneGraph::load_json(input),
        "gltf" | "glb" => load_gltf_scene(input, gltf_fps),
        _ => anyhow::bail!(
            "Unsupported scene format: {:?} (use .json, .gltf, or .glb)",
            input
        ),
    }
}

fn inspect(input: &Path, graph: &SceneGraph, options: &ExportOptions) {
    tracing::info!("Scenes in {:?}:", input);
    for scene in &graph.scenes {
        tracing::info!(
            "  '{}': {} fps, {} objects",
            scene.name,
            scene.fps,
            scene.objects.len()
        );
    }

    tracing::info!("Objects:");
    for object in &graph.objects {
        let fps = match (
            object_fps(graph, object, options),
            graph.scenes_with(object.id).next(),
        ) {
            (Ok(fps), Some(scene)) => format!("{} fps from '{}'", fps, scene.name),
            (Ok(fps), None) => format!("{} fps fallback", fps),
            (Err(_), _) => "no owning scene".to_string(),
        };
        let armature = object.data.and_then(|id| graph.armature(id));
        let action = object
            .animation
            .as_ref()
            .and_then(|a| a.action)
            .and_then(|id| graph.action(id));

        match (armature, action) {
            (Some(armature), Some(action)) => tracing::info!(
                "  [{}] '{}' {} ({}): {} bones, action '{}' [{}, {}]: {} groups, {} channels",
                object.id,
                object.name,
                object.kind,
                fps,
                armature.bones.len(),
                action.name,
                action.frame_range[0],
                action.frame_range[1],
                action.groups.len(),
                action.groups.iter().map(|g| g.channels.len()).sum::<usize>()
            ),
            (Some(armature), None) => tracing::info!(
                "  [{}] '{}' {} ({}): {} bones",
                object.id,
                object.name,
                object.kind,
                fps,
                armature.bones.len()
            ),
            _ => tracing::info!(
                "  [{}] '{}' {} ({})",
                object.id,
                object.name,
                object.kind,
                fps
            ),
        }
    }
}
