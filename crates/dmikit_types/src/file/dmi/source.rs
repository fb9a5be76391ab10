//! Pluggable raster sources for image assembly.
//!
//! Assembly walks the state list and asks a [`RasterSource`] for one cell
//! raster per (state, frame, direction). The default source crops a loaded
//! sheet with the shared row-major cursor; the alternate source reads one
//! raster file per direction from disk, addressed by the same
//! `<state>/<frame>/<direction>.png` contract the snapshot store uses.

use std::path::PathBuf;

use image::RgbaImage;

use super::sheet::{self, CellSize, SheetCursor};
use super::snapshot;
use super::state::Direction;
use crate::file::error::DmiError;

/// Yields one cell raster per (state, frame, direction) triple.
///
/// Assembly calls this in canonical traversal order: states in list order,
/// frames in animation order, directions in canonical order.
pub trait RasterSource {
	/// Produces the raster for the given slot.
	fn cell(
		&mut self,
		state_index: usize,
		frame_index: u32,
		direction: Direction,
	) -> Result<RgbaImage, DmiError>;
}

/// Default source: crops cells out of a sheet raster.
///
/// All states drain the same cursor, so a descriptor expanded into several
/// variants consumes `variants x frames x dirs` contiguous cells. The sheet's
/// authoring tool must have provided that many; the only detectable mismatch
/// is running out of sheet rows.
#[derive(Debug)]
pub struct SheetSource<'a> {
	sheet: &'a RgbaImage,
	cell: CellSize,
	cursor: SheetCursor,
}

impl<'a> SheetSource<'a> {
	/// Creates a source reading from the top-left of `sheet`.
	pub fn new(sheet: &'a RgbaImage, cell: CellSize) -> Self {
		Self {
			sheet,
			cell,
			cursor: SheetCursor::default(),
		}
	}

	/// Current read position.
	pub fn cursor(&self) -> SheetCursor {
		self.cursor
	}
}

impl RasterSource for SheetSource<'_> {
	fn cell(
		&mut self,
		_state_index: usize,
		_frame_index: u32,
		_direction: Direction,
	) -> Result<RgbaImage, DmiError> {
		let (crop, cursor) = sheet::crop_next(self.sheet, self.cell, self.cursor)?;
		self.cursor = cursor;
		Ok(crop)
	}
}

/// Alternate source: loads each cell from an individual raster file.
///
/// Files live under `root` following the snapshot store's addressing
/// contract. A missing or unreadable file is an error here, unlike
/// rehydration: assembly from pieces has no sheet to fall back on.
#[derive(Debug, Clone)]
pub struct PiecesSource {
	root: PathBuf,
}

impl PiecesSource {
	/// Creates a source rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
		}
	}
}

impl RasterSource for PiecesSource {
	fn cell(
		&mut self,
		state_index: usize,
		frame_index: u32,
		direction: Direction,
	) -> Result<RgbaImage, DmiError> {
		let path = snapshot::cell_path(&self.root, state_index, frame_index, direction);
		Ok(image::open(path)?.to_rgba8())
	}
}
