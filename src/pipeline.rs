//! Batch pipeline over directories of DMI files.
//!
//! Extraction decomposes every container under an input directory into a
//! structural snapshot plus one raster file per cell, mirroring the input
//! tree under `<out>/raw/`. An external edit step may then replace
//! individual cell files. Rebuilding walks the snapshots, rehydrates the
//! cells, packs a fresh sheet into `<out>/processed/`, and embeds the
//! regenerated descriptor into a finished container under `<out>/final/`.
//!
//! Files are independent: each runs its pipeline sequentially, failures are
//! logged and skipped without affecting siblings, and the optional worker
//! pool only ever parallelizes across files, never within one.

use std::fs;
use std::path::{Path, PathBuf};

use dmikit_types::prelude::*;
use log::{error, info};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Subdirectory of the output root holding snapshots and extracted cells.
pub const RAW_DIR: &str = "raw";

/// Subdirectory holding rebuilt sheets awaiting metadata embedding.
pub const PROCESSED_DIR: &str = "processed";

/// Subdirectory holding finished containers.
pub const FINAL_DIR: &str = "final";

/// Batch processing options.
#[derive(Debug, Clone, Default)]
pub struct Options {
	/// Process independent files on a worker pool
	pub parallel: bool,
	/// Variant expansion applied while parsing descriptors
	pub variants: VariantConfig,
	/// Load cell rasters from per-direction files instead of cropping sheets
	pub pieces_root: Option<PathBuf>,
	/// Cell size override applied when rebuilding
	pub cell_override: Option<CellSize>,
}

/// All `.dmi` files under `input_root`, recursively.
pub fn discover(input_root: &Path) -> Vec<PathBuf> {
	WalkDir::new(input_root)
		.into_iter()
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_file())
		.filter(|entry| {
			entry
				.path()
				.extension()
				.and_then(|ext| ext.to_str())
				.is_some_and(|ext| ext.eq_ignore_ascii_case("dmi"))
		})
		.map(walkdir::DirEntry::into_path)
		.collect()
}

/// All structural snapshots under `out_root`'s raw directory.
pub fn discover_snapshots(out_root: &Path) -> Vec<PathBuf> {
	WalkDir::new(out_root.join(RAW_DIR))
		.into_iter()
		.filter_map(Result::ok)
		.filter(|entry| {
			entry.file_type().is_file()
				&& entry.file_name().to_str() == Some(snapshot::SNAPSHOT_FILE)
		})
		.map(walkdir::DirEntry::into_path)
		.collect()
}

/// Extracts every discovered file, returning the snapshot paths.
///
/// A file that fails is logged and skipped; the rest continue. With
/// `options.parallel` the files are spread over a worker pool and the
/// results gathered through rayon's collect.
pub fn extract_all(input_root: &Path, out_root: &Path, options: &Options) -> Vec<PathBuf> {
	let files = discover(input_root);
	info!("found {} dmi file(s) under {}", files.len(), input_root.display());

	let job = |file: &PathBuf| match extract_one(input_root, out_root, file, options) {
		Ok(snapshot_path) => Some(snapshot_path),
		Err(err) => {
			error!("skipping {}: {}", file.display(), err);
			None
		}
	};
	if options.parallel {
		files.par_iter().filter_map(job).collect()
	} else {
		files.iter().filter_map(job).collect()
	}
}

/// Decomposes one container into a snapshot plus per-cell rasters.
///
/// The extraction directory mirrors the file's position under `input_root`:
/// `<out>/raw/<relative dir>/<name>/`.
pub fn extract_one(
	input_root: &Path,
	out_root: &Path,
	file: &Path,
	options: &Options,
) -> Result<PathBuf, DmiError> {
	let dmi = match &options.pieces_root {
		Some(root) => {
			DmiFile::open_with_pieces(file, root.join(stem_of(file)), &options.variants)?
		}
		None => DmiFile::open(file, &options.variants)?,
	};

	let rel = file.strip_prefix(input_root).unwrap_or(file);
	let parent = rel.parent().unwrap_or(Path::new(""));
	let dir = out_root.join(RAW_DIR).join(parent).join(dmi.name());

	let snapshot_path = snapshot::store(&dir, &dmi)?;
	snapshot::export_cells(&dir, &dmi)?;
	info!("extracted {} -> {}", file.display(), dir.display());
	Ok(snapshot_path)
}

/// Rebuilds a container from every given snapshot, returning the finished paths.
pub fn rebuild_all(out_root: &Path, snapshots: &[PathBuf], options: &Options) -> Vec<PathBuf> {
	let job = |snapshot_path: &PathBuf| match rebuild_one(out_root, snapshot_path, options) {
		Ok(final_path) => Some(final_path),
		Err(err) => {
			error!("skipping {}: {}", snapshot_path.display(), err);
			None
		}
	};
	if options.parallel {
		snapshots.par_iter().filter_map(job).collect()
	} else {
		snapshots.iter().filter_map(job).collect()
	}
}

/// Reassembles one extracted file into a finished container.
///
/// Rehydrates the cells next to the snapshot, packs a fresh sheet, writes it
/// under `processed/`, and embeds the regenerated descriptor into the final
/// container; the processed sheet is deleted by the embed step.
pub fn rebuild_one(
	out_root: &Path,
	snapshot_path: &Path,
	options: &Options,
) -> Result<PathBuf, DmiError> {
	let dir = snapshot_path.parent().unwrap_or(Path::new(""));
	let mut dmi = snapshot::load(snapshot_path)?;
	if let Some(cell) = options.cell_override {
		dmi.set_cell_size(cell);
	}
	snapshot::rehydrate(dir, &mut dmi);

	let rel = dir.strip_prefix(out_root.join(RAW_DIR)).unwrap_or(dir).to_path_buf();

	let sheet = dmi.pack_sheet()?;
	let processed = out_root.join(PROCESSED_DIR).join(&rel).with_extension("png");
	if let Some(parent) = processed.parent() {
		fs::create_dir_all(parent)?;
	}
	sheet.save(&processed)?;

	let final_path = out_root.join(FINAL_DIR).join(&rel).with_extension("dmi");
	container::embed_descriptor(&processed, &dmi.descriptor_text(), &final_path)?;
	info!("rebuilt {}", final_path.display());
	Ok(final_path)
}

/// Full pipeline: extract everything, then rebuild it.
///
/// Returns how many files were extracted and how many rebuilt.
pub fn run(input_root: &Path, out_root: &Path, options: &Options) -> (usize, usize) {
	let snapshots = extract_all(input_root, out_root, options);
	let finished = rebuild_all(out_root, &snapshots, options);
	(snapshots.len(), finished.len())
}

fn stem_of(path: &Path) -> String {
	path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}
