//! DMI CLI utility
//!
//! A command-line tool for decomposing DMI sprite sheets into individually
//! editable cell rasters and reassembling them into fresh containers.
//!
//! # Commands
//!
//! - **run**: extract every DMI file under a directory, then rebuild
//! - **extract**: decompose DMI files into snapshots and per-cell rasters
//! - **rebuild**: reassemble extracted (and possibly edited) cells
//! - **info**: display information about a DMI file
//!
//! # Output Layout
//!
//! ```text
//! <out>/raw/<rel>/<name>/dmi_info.json          structural snapshot
//! <out>/raw/<rel>/<name>/<state>/<frame>/<dir>.png   one raster per cell
//! <out>/final/<rel>/<name>.dmi                  finished container
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Full pipeline, sequential
//! dmikit run icons/ out/
//!
//! # Extract with variant expansion, in parallel
//! dmikit extract icons/ out/ -p --variants red,blue,green
//!
//! # Edit files under out/raw/..., then reassemble at a doubled cell size
//! dmikit rebuild out/ --cell-size 64x64
//!
//! # Inspect a single file
//! dmikit info icons/creature.dmi --detailed
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dmikit_rs::pipeline::{self, Options};
use dmikit_rs::prelude::*;
use dmikit_types::file::dmi::descriptor;

#[derive(Parser)]
#[command(name = "dmikit")]
#[command(author = "dmikit-rs project")]
#[command(version = "1.0")]
#[command(about = "DMI sprite sheet utility - extract, edit, and rebuild DMI files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Extract every DMI file under a directory, then rebuild immediately
	Run {
		/// Input directory searched recursively for .dmi files
		#[arg(value_name = "INPUT_DIR")]
		input: PathBuf,

		/// Output directory receiving raw/, processed/ and final/
		#[arg(value_name = "OUTPUT_DIR")]
		output: PathBuf,

		/// Process independent files on a worker pool
		#[arg(short, long)]
		parallel: bool,

		/// Comma-separated variant labels applied during parsing
		#[arg(long, value_name = "LABELS")]
		variants: Option<String>,

		/// Separator between a state name and a variant label
		#[arg(long, default_value = "-", value_name = "SEP")]
		variant_separator: String,
	},

	/// Decompose DMI files into snapshots and per-cell rasters
	Extract {
		/// Input directory searched recursively for .dmi files
		#[arg(value_name = "INPUT_DIR")]
		input: PathBuf,

		/// Output directory receiving raw/
		#[arg(value_name = "OUTPUT_DIR")]
		output: PathBuf,

		/// Process independent files on a worker pool
		#[arg(short, long)]
		parallel: bool,

		/// Comma-separated variant labels applied during parsing
		#[arg(long, value_name = "LABELS")]
		variants: Option<String>,

		/// Separator between a state name and a variant label
		#[arg(long, default_value = "-", value_name = "SEP")]
		variant_separator: String,

		/// Load cell rasters from per-direction files under this directory
		/// instead of cropping each file's sheet
		#[arg(long, value_name = "DIR")]
		pieces: Option<PathBuf>,
	},

	/// Reassemble extracted (and possibly edited) cells into DMI files
	Rebuild {
		/// Output directory of a previous extract (the one containing raw/)
		#[arg(value_name = "OUTPUT_DIR")]
		output: PathBuf,

		/// Process independent files on a worker pool
		#[arg(short, long)]
		parallel: bool,

		/// Cell size override, e.g. 64x64 (defaults to each snapshot's size)
		#[arg(long, value_name = "WxH")]
		cell_size: Option<String>,
	},

	/// Display information about a DMI file
	Info {
		/// Input DMI file path
		#[arg(value_name = "INPUT_DMI")]
		input: PathBuf,

		/// Show per-state details
		#[arg(short, long)]
		detailed: bool,
	},
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Commands::Run {
			input,
			output,
			parallel,
			variants,
			variant_separator,
		} => {
			let options = Options {
				parallel,
				variants: variant_config(variants, variant_separator),
				..Options::default()
			};
			let (extracted, finished) = pipeline::run(&input, &output, &options);
			println!(
				"extracted {} file(s), rebuilt {} -> {}",
				extracted,
				finished,
				output.join(pipeline::FINAL_DIR).display()
			);
			Ok(())
		}

		Commands::Extract {
			input,
			output,
			parallel,
			variants,
			variant_separator,
			pieces,
		} => {
			let options = Options {
				parallel,
				variants: variant_config(variants, variant_separator),
				pieces_root: pieces,
				..Options::default()
			};
			let snapshots = pipeline::extract_all(&input, &output, &options);
			println!(
				"extracted {} file(s) -> {}",
				snapshots.len(),
				output.join(pipeline::RAW_DIR).display()
			);
			Ok(())
		}

		Commands::Rebuild {
			output,
			parallel,
			cell_size,
		} => {
			let cell_override = match cell_size {
				Some(spec) => Some(parse_cell_size(&spec)?),
				None => None,
			};
			let options = Options {
				parallel,
				cell_override,
				..Options::default()
			};
			let snapshots = pipeline::discover_snapshots(&output);
			let finished = pipeline::rebuild_all(&output, &snapshots, &options);
			println!(
				"rebuilt {} of {} file(s) -> {}",
				finished.len(),
				snapshots.len(),
				output.join(pipeline::FINAL_DIR).display()
			);
			Ok(())
		}

		Commands::Info {
			input,
			detailed,
		} => handle_info(input, detailed),
	}
}

fn handle_info(input: PathBuf, detailed: bool) -> Result<(), Box<dyn std::error::Error>> {
	let text = container::read_descriptor(&input)?;
	let parsed = descriptor::parse(&text, &VariantConfig::none())?;

	let cell = CellSize::new(
		parsed.cell_width.unwrap_or(CellSize::DEFAULT.width),
		parsed.cell_height.unwrap_or(CellSize::DEFAULT.height),
	);
	let total_cells: u32 = parsed.states.iter().map(State::cell_count).sum();

	println!("DMI File Information");
	println!("   File: {}", input.display());
	println!("   Version: {}", parsed.version);
	println!("   Cell size: {}", cell);
	println!("   States: {}", parsed.states.len());
	println!("   Cells: {}", total_cells);

	if detailed && !parsed.states.is_empty() {
		println!();
		println!("   {:<24} {:>4} {:>6} {:>6} {:>8}  delays", "name", "dirs", "frames", "rewind", "movement");
		println!("   {}", "-".repeat(72));
		for state in &parsed.states {
			println!(
				"   {:<24} {:>4} {:>6} {:>6} {:>8}  {}",
				state.name(),
				state.dirs(),
				state.frame_count(),
				state.rewind(),
				state.movement(),
				if state.has_delay() {
					state
						.delays()
						.iter()
						.map(ToString::to_string)
						.collect::<Vec<_>>()
						.join(",")
				} else {
					"-".to_string()
				}
			);
		}
	}

	Ok(())
}

fn variant_config(labels: Option<String>, separator: String) -> VariantConfig {
	match labels {
		Some(list) => VariantConfig::new(
			list.split(',')
				.map(str::trim)
				.filter(|label| !label.is_empty())
				.map(String::from)
				.collect(),
			separator,
		),
		None => VariantConfig::none(),
	}
}

fn parse_cell_size(spec: &str) -> Result<CellSize, String> {
	let (width, height) =
		spec.split_once('x').ok_or_else(|| format!("expected WxH, got {spec:?}"))?;
	let width = width.trim().parse().map_err(|_| format!("bad cell width in {spec:?}"))?;
	let height = height.trim().parse().map_err(|_| format!("bad cell height in {spec:?}"))?;
	Ok(CellSize::new(width, height))
}
