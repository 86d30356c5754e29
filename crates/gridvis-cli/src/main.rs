//! gridvis CLI - preview a grid visual outside its host.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

use clap::{Parser, Subcommand};
use futures::executor::block_on;
use gridvis::core::{
    normalize, DataView, HierarchyLevels, Intent, MatrixNode, RawInput, Scaling, StyleFlag,
    Theme, VisualUpdateOptions,
};
use gridvis::widgets::Widget;
use gridvis::yaml::{Manifest, ManifestError, BUILTIN_MANIFEST};
use gridvis::{
    HostError, HostServices, PersistRequest, SelectFuture, SelectionId, VisualController,
    VisualError,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridvis")]
#[command(about = "Preview host for the gridvis table visual", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a data view to HTML
    Render {
        /// Data view or update options (JSON)
        data: PathBuf,

        /// Visual manifest (YAML); defaults to the built-in one
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Scaling mode (none, thousands, millions, billions, trillions, auto)
        #[arg(long)]
        scaling: Option<Scaling>,

        /// Color theme (light, dark)
        #[arg(long)]
        theme: Option<Theme>,

        /// Active text style (bold, italic, underline)
        #[arg(long)]
        style: Option<StyleFlag>,

        /// Select a row by index before rendering
        #[arg(long)]
        select: Option<usize>,

        /// Wrap the output in a standalone HTML document with styles
        #[arg(long)]
        standalone: bool,
    },

    /// Print the formatting model exposed to the settings pane
    Model {
        /// Data view or update options (JSON)
        data: PathBuf,

        /// Visual manifest (YAML); defaults to the built-in one
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Print the normalized grid model
    Normalize {
        /// Data view or update options (JSON)
        data: PathBuf,
    },

    /// Validate a manifest, or print the built-in one
    Manifest {
        /// Manifest to validate
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid data view: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid manifest: {0}")]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Visual(#[from] VisualError),
}

/// Host stand-in: identities come from node tokens, selections always
/// resolve and persistence is logged.
#[derive(Debug, Default)]
struct PreviewHost;

impl HostServices for PreviewHost {
    fn create_selection_id(
        &self,
        node: &MatrixNode,
        _levels: &HierarchyLevels,
    ) -> Result<SelectionId, HostError> {
        Ok(node
            .identity
            .clone()
            .map_or_else(|| SelectionId::new(format!("row:{}", node.label())), SelectionId::new))
    }

    fn select(&self, id: SelectionId) -> SelectFuture {
        tracing::info!(target: "gridvis::cli", id = %id, "select");
        Box::pin(async { Ok(()) })
    }

    fn persist_properties(&self, request: PersistRequest) {
        for object in &request.merge {
            tracing::info!(
                target: "gridvis::cli",
                object = %object.object_name,
                properties = %serde_json::Value::Object(object.properties.clone()),
                "persist"
            );
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("GRIDVIS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Render {
            data,
            manifest,
            scaling,
            theme,
            style,
            select,
            standalone,
        } => render_command(
            &data,
            manifest.as_deref(),
            &Overrides {
                scaling,
                theme,
                style,
                select,
            },
            standalone,
        ),
        Commands::Model { data, manifest } => model_command(&data, manifest.as_deref()),
        Commands::Normalize { data } => normalize_command(&data),
        Commands::Manifest { path } => manifest_command(path.as_deref()),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// User choices applied on top of the loaded settings.
#[derive(Debug, Default)]
struct Overrides {
    scaling: Option<Scaling>,
    theme: Option<Theme>,
    style: Option<StyleFlag>,
    select: Option<usize>,
}

fn render_command(
    data: &Path,
    manifest: Option<&Path>,
    overrides: &Overrides,
    standalone: bool,
) -> Result<String, CliError> {
    let options = load_options(data)?;
    let mut visual = load_visual(manifest)?;
    visual.update(&options)?;
    apply_overrides(&mut visual, overrides)?;

    let Some(view) = visual.view() else {
        return Ok(String::new());
    };
    let html = view.to_html();
    if standalone {
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>",
            view.to_css(),
            html
        ))
    } else {
        Ok(html)
    }
}

fn model_command(data: &Path, manifest: Option<&Path>) -> Result<String, CliError> {
    let options = load_options(data)?;
    let mut visual = load_visual(manifest)?;
    visual.update(&options)?;
    Ok(serde_json::to_string_pretty(&visual.get_formatting_model()?)?)
}

fn normalize_command(data: &Path) -> Result<String, CliError> {
    let options = load_options(data)?;
    let model = normalize(RawInput::detect(options.data_view()));
    Ok(serde_json::to_string_pretty(&model)?)
}

fn manifest_command(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => {
            let manifest = Manifest::from_yaml(&read(path)?)?;
            Ok(format!(
                "{}: ok ({} cards)",
                manifest.visual,
                manifest.cards.len()
            ))
        }
        None => Ok(BUILTIN_MANIFEST.trim_end().to_string()),
    }
}

fn apply_overrides(
    visual: &mut VisualController<PreviewHost>,
    overrides: &Overrides,
) -> Result<(), CliError> {
    let mut intents = Vec::new();
    if let Some(scaling) = overrides.scaling {
        intents.push(Intent::scaling(scaling));
    }
    if let Some(theme) = overrides.theme {
        intents.push(Intent::theme(theme));
    }
    if let Some(flag) = overrides.style {
        if visual.settings().active_style() != Some(flag) {
            intents.push(Intent::toggle(flag));
        }
    }
    if let Some(row) = overrides.select {
        let rows = visual.model().row_count();
        if row >= rows {
            return Err(VisualError::RowOutOfRange { index: row, rows }.into());
        }
        intents.push(Intent::SelectRow(row));
    }

    for intent in intents {
        for task in visual.dispatch(intent.into())? {
            let message = block_on(task);
            visual.dispatch(message)?;
        }
    }
    Ok(())
}

fn load_visual(manifest: Option<&Path>) -> Result<VisualController<PreviewHost>, CliError> {
    let host = Arc::new(PreviewHost);
    match manifest {
        Some(path) => {
            let manifest = Manifest::from_yaml(&read(path)?)?;
            Ok(VisualController::with_manifest(host, manifest))
        }
        None => Ok(VisualController::new(host)),
    }
}

fn load_options(path: &Path) -> Result<VisualUpdateOptions, CliError> {
    parse_options(&read(path)?)
}

/// Accepts either full update options (`{"dataViews": [...]}`) or a single
/// data view.
fn parse_options(text: &str) -> Result<VisualUpdateOptions, CliError> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("dataViews").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        let view: DataView = serde_json::from_value(value)?;
        Ok(VisualUpdateOptions::single(view))
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
