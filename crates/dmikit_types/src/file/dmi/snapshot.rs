//! Structural snapshot persistence and the per-cell addressing contract.
//!
//! A snapshot captures the state/frame/cell graph without any raster
//! content: restoring one yields a graph whose raster slots are all unset.
//! Raster content travels separately, one file per cell, addressed by
//!
//! ```text
//! <base>/<state index>/<frame index>/<direction value>.png
//! ```
//!
//! The same triple addresses a cell in memory and on disk, so external tools
//! can edit individual cells between extraction and rebuild. Rehydration
//! reads each address back; a missing file is logged and leaves the slot
//! unset rather than aborting, and the packer substitutes a fully
//! transparent cell at that exact position.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use super::File;
use super::sheet::CellSize;
use super::state::{Direction, State};
use crate::file::error::{DmiError, FormatError};

/// File name of the structural snapshot within an extraction directory.
pub const SNAPSHOT_FILE: &str = "dmi_info.json";

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
	name: String,
	version: String,
	cell_width: u32,
	cell_height: u32,
	states: Vec<StateRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateRecord {
	name: String,
	dirs: u32,
	frames: u32,
	delays: Vec<f32>,
	rewind: u32,
	movement: u32,
}

/// Path of the raster file addressing one (state, frame, direction) cell.
pub fn cell_path(
	base: &Path,
	state_index: usize,
	frame_index: u32,
	direction: Direction,
) -> PathBuf {
	base.join(state_index.to_string())
		.join(frame_index.to_string())
		.join(format!("{}.png", direction.value()))
}

/// Persists the structural part of `image` into `dir`.
///
/// Creates `dir` if missing (idempotent under concurrent attempts) and
/// returns the snapshot file's path. Raster content is not written here; see
/// [`export_cells`].
pub fn store(dir: &Path, image: &File) -> Result<PathBuf, DmiError> {
	fs::create_dir_all(dir)?;
	let record = SnapshotRecord {
		name: image.name().to_string(),
		version: image.version().to_string(),
		cell_width: image.cell_size().width,
		cell_height: image.cell_size().height,
		states: image
			.states()
			.iter()
			.map(|state| StateRecord {
				name: state.name().to_string(),
				dirs: state.dirs(),
				frames: state.frame_count(),
				delays: state.delays().to_vec(),
				rewind: state.rewind(),
				movement: state.movement(),
			})
			.collect(),
	};
	let json = serde_json::to_string_pretty(&record)?;
	let path = dir.join(SNAPSHOT_FILE);
	fs::write(&path, json)?;
	Ok(path)
}

/// Restores a structural snapshot into a graph with unset raster slots.
///
/// A snapshot that does not parse is corrupt and fatal for this file.
pub fn load(path: &Path) -> Result<File, DmiError> {
	let json = fs::read_to_string(path)?;
	let record: SnapshotRecord = serde_json::from_str(&json)?;

	let mut states = Vec::with_capacity(record.states.len());
	for entry in record.states {
		// A hand-edited snapshot can hold any number here; reject what the
		// graph cannot represent before building skeletons from it.
		if !matches!(entry.dirs, 1 | 4 | 8) {
			return Err(FormatError::UnsupportedDirs(entry.dirs).into());
		}
		let mut state = State::new(
			entry.name,
			entry.dirs,
			entry.frames,
			entry.delays,
			entry.rewind,
			entry.movement,
		);
		state.build_skeleton();
		states.push(state);
	}
	Ok(File::from_parts(
		record.name,
		record.version,
		CellSize::new(record.cell_width, record.cell_height),
		states,
	))
}

/// Writes every filled raster slot of `image` to its cell address under `base`.
pub fn export_cells(base: &Path, image: &File) -> Result<(), DmiError> {
	for (state_index, state) in image.states().iter().enumerate() {
		for (frame_index, frame) in state.frames().iter().enumerate() {
			for cell in frame.cells() {
				let path = cell_path(base, state_index, frame_index as u32, cell.direction());
				if let Some(parent) = path.parent() {
					fs::create_dir_all(parent)?;
				}
				if let Some(raster) = cell.raster() {
					raster.save(&path)?;
				}
			}
		}
	}
	Ok(())
}

/// Reloads raster content for every cell of `image` from `base`.
///
/// Slots whose file is missing or unreadable are logged and left unset; the
/// rest of the graph is unaffected.
pub fn rehydrate(base: &Path, image: &mut File) {
	for (state_index, state) in image.states_mut().iter_mut().enumerate() {
		for (frame_index, frame) in state.frames_mut().iter_mut().enumerate() {
			for cell in frame.cells_mut() {
				let path = cell_path(base, state_index, frame_index as u32, cell.direction());
				match image::open(&path) {
					Ok(raster) => cell.set_raster(raster.to_rgba8()),
					Err(err) => {
						warn!("cell raster {} not loaded: {}", path.display(), err);
					}
				}
			}
		}
	}
}
