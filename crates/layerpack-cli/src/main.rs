use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use layerpack_core::{svg, PackRequest, PackResult, Packer};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "layerpack")]
#[command(about = "Layer-based 3D bin packer - fill a container with boxes", long_about = None)]
struct Cli {
    /// Print search progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack boxes into a container
    Pack {
        /// Input request file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SVG visualization from result
    Generate {
        /// Input result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Pack { input, output } => {
            pack_command(input, output)?;
        }
        Commands::Generate { input, output } => {
            generate_command(input, output)?;
        }
    }

    Ok(())
}

fn load_request(path: &Path) -> Result<PackRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let request = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    debug!("Loaded request from {}", path.display());
    Ok(request)
}

fn pack_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let request = load_request(&input)?;
    let box_count: u64 = request.items.iter().map(|i| i.quantity as u64).sum();

    println!(
        "  {} boxes in {} item types",
        box_count.to_string().bright_white().bold(),
        request.items.len().to_string().bright_white().bold()
    );
    println!(
        "  Container {}: {} x {} x {}",
        request.container.id.bright_white(),
        request.container.width,
        request.container.height,
        request.container.length
    );
    println!();

    println!("{}", "🚀 Packing...".bright_blue());

    let packer = Packer::new(request)?;
    let result = packer.pack()?;

    println!();
    if result.summary.cancelled {
        println!(
            "{}",
            "⏱  Search stopped early, showing best layout found".bright_yellow()
        );
    } else {
        println!("{}", "✅ Packing complete!".bright_green().bold());
    }
    println!();

    print_summary(&result);

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        let json = serde_json::to_string_pretty(&result)?;
        println!("{}", json);
    }

    Ok(())
}

fn print_summary(result: &PackResult) {
    let summary = &result.summary;

    println!("{}", "📊 Results:".bright_yellow().bold());
    println!(
        "  Packed boxes: {}",
        summary.packed_boxes.to_string().bright_white().bold()
    );
    println!(
        "  Leftover boxes: {}",
        summary.leftover_boxes.to_string().bright_white()
    );
    println!(
        "  Container utilization: {}",
        format!("{:.2}%", summary.volume_utilization).bright_green()
    );
    println!(
        "  Box volume packed: {}",
        format!("{:.2}%", summary.packed_volume_percentage).bright_white()
    );
    if let (Some(orientation), Some(thickness)) = (summary.orientation, summary.layer_thickness) {
        println!(
            "  Best orientation: {:?}, first layer thickness {}",
            orientation, thickness
        );
    }
    println!(
        "  {} trials in {} ms",
        summary.iterations, summary.computation_time_ms
    );

    if !result.leftover.is_empty() {
        println!();
        println!("  Left over:");
        for leftover in &result.leftover {
            println!(
                "    • {} ({} x {} x {})",
                leftover.item_id.bright_cyan(),
                leftover.width,
                leftover.height,
                leftover.length
            );
        }
    }

    println!();
}

fn generate_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading result...".bright_blue());

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let result: PackResult = serde_json::from_str(&content)?;

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = svg::render_svg(&result)?;
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}
