use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roi_geometry::ShapeMetrics;
use roi_panel::{
    channel_sink, ChannelSink, HeadlessHost, Notification, PanelConfig, PanelInput, PopupState,
    Regions, RegionsCollection, Shape, ShapeAnnotationController, ShapeId, ShapeRecord,
    SystemClock, ViewerContext,
};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

#[derive(Debug, Parser)]
#[command(name = "roi-cli")]
#[command(about = "Inspect and edit ROI annotation files")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the annotation panel contents for a shape.
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        shape: String,
        /// Print machine-readable output.
        #[arg(long)]
        json: bool,
    },
    /// Move a shape and print its updated record.
    Translate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        shape: String,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        dx: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        dy: f64,
        /// Write the updated region file here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay classification edits and print the emitted notifications.
    Classify {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        shape: String,
        /// Edited text, repeat for successive edits.
        #[arg(long = "text", required = true)]
        texts: Vec<String>,
    },
    /// Confirm a shape as reviewer and print the emitted notification.
    Confirm {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        shape: String,
        /// Write the updated region file here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    shape_id: String,
    state: &'static str,
    anchor: Option<[f64; 2]>,
    classification: String,
    selected_option: Option<usize>,
    editable: bool,
    confirm_available: bool,
    owner: String,
    coordinates: String,
    metrics: ShapeMetrics,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Inspect { file, shape, json } => run_inspect(&file, &ShapeId::new(shape), json),
        Commands::Translate { file, shape, dx, dy, output } => {
            run_translate(&file, &ShapeId::new(shape), dx, dy, output.as_deref())
        }
        Commands::Classify { file, shape, texts } => {
            run_classify(&file, &ShapeId::new(shape), &texts)
        }
        Commands::Confirm { file, shape, output } => {
            run_confirm(&file, &ShapeId::new(shape), output.as_deref())
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_inspect(file: &Path, shape_id: &ShapeId, json: bool) -> Result<()> {
    let regions = load_regions(file)?;
    let shape = find_shape(&regions, shape_id)?;

    let (sink, _receiver) = channel_sink();
    let mut controller = open_controller(sink)?;
    controller.show_popup_for_shape(&regions, shape);

    let panel = controller.panel();
    let output = InspectOutput {
        shape_id: shape.id.to_string(),
        state: match controller.state() {
            PopupState::Unbound => "unbound",
            PopupState::BoundHidden => "hidden",
            PopupState::BoundVisible => "visible",
        },
        anchor: panel.position(),
        classification: panel.classification().to_string(),
        selected_option: panel.selected_option(),
        editable: controller.is_editable(),
        confirm_available: panel.is_confirm_visible(),
        owner: panel.owner_text().to_string(),
        coordinates: panel.coords_text().to_string(),
        metrics: regions.length_and_area(&shape.geometry),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("shape: {}", output.shape_id);
    match output.anchor {
        Some([x, y]) => println!("state: {} at ({x:.1}, {y:.1})", output.state),
        None => println!("state: {}", output.state),
    }
    match (output.classification.is_empty(), output.selected_option) {
        (true, _) => println!("classification: (none)"),
        (false, Some(index)) => println!("classification: {} (option {index})", output.classification),
        (false, None) => println!("classification: {}", output.classification),
    }
    println!("editable: {}", output.editable);
    println!("confirm: {}", output.confirm_available);
    println!("{}", output.owner);
    if !output.coordinates.is_empty() {
        println!("{}", output.coordinates);
    }
    if !panel.metrics_text().is_empty() {
        println!("{}", panel.metrics_text());
    }

    Ok(())
}

fn run_translate(
    file: &Path,
    shape_id: &ShapeId,
    dx: f64,
    dy: f64,
    output: Option<&Path>,
) -> Result<()> {
    if !dx.is_finite() || !dy.is_finite() {
        anyhow::bail!("--dx and --dy must be finite numbers");
    }

    let mut regions = load_regions(file)?;
    let shape = regions
        .get_mut(shape_id)
        .with_context(|| format!("shape not found: {shape_id}"))?;
    shape.geometry.translate(dx, dy);
    let record = ShapeRecord::from(&*shape);

    println!("{}", serde_json::to_string_pretty(&record)?);

    if let Some(output) = output {
        save_regions(&regions, output)?;
    }

    Ok(())
}

fn run_classify(file: &Path, shape_id: &ShapeId, texts: &[String]) -> Result<()> {
    let mut regions = load_regions(file)?;
    let shape = find_shape(&regions, shape_id)?.clone();

    let (sink, receiver) = channel_sink();
    let mut controller = open_controller(sink)?;
    controller.show_popup_for_shape(&regions, &shape);

    if !controller.is_editable() {
        anyhow::bail!("shape {shape_id} is not editable");
    }

    for text in texts {
        controller.handle_input(&mut regions, PanelInput::ClassificationEdited(text.clone()));
    }

    while let Some(wait) = controller.next_timer_in() {
        std::thread::sleep(wait);
        controller.poll_timers();
    }

    print_notifications(&receiver)
}

fn run_confirm(file: &Path, shape_id: &ShapeId, output: Option<&Path>) -> Result<()> {
    let mut regions = load_regions(file)?;
    let shape = find_shape(&regions, shape_id)?.clone();

    let (sink, receiver) = channel_sink();
    let mut controller = open_controller(sink)?;

    if !controller.panel().is_confirm_visible() {
        anyhow::bail!("confirm requires an admin user in review step 2");
    }

    controller.show_popup_for_shape(&regions, &shape);
    controller.handle_input(&mut regions, PanelInput::ConfirmClicked);
    controller.destroy();

    print_notifications(&receiver)?;

    if let Some(output) = output {
        save_regions(&regions, output)?;
    }

    Ok(())
}

fn open_controller(sink: ChannelSink) -> Result<ShapeAnnotationController> {
    let context = ViewerContext::from_env().context("invalid viewer configuration")?;
    let config = PanelConfig::from_env().context("invalid panel configuration")?;

    Ok(ShapeAnnotationController::new(
        Box::new(HeadlessHost::new()),
        Box::new(sink),
        Box::new(SystemClock::new()),
        context,
        config,
    ))
}

fn print_notifications(receiver: &Receiver<Notification>) -> Result<()> {
    for notification in receiver.try_iter() {
        println!("{}", serde_json::to_string(&notification)?);
    }
    Ok(())
}

fn find_shape<'a>(regions: &'a Regions, shape_id: &ShapeId) -> Result<&'a Shape> {
    regions
        .get(shape_id)
        .with_context(|| format!("shape not found: {shape_id}"))
}

fn load_regions(path: &Path) -> Result<Regions> {
    ensure_file_exists(path)?;

    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let regions = Regions::from_json(&json).context("failed to parse region file")?;

    log::info!("loaded {} shapes from {}", regions.len(), path.display());
    Ok(regions)
}

fn save_regions(regions: &Regions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&regions.to_file())?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
