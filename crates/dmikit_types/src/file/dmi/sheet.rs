//! Sheet geometry: the slicing cursor, cell cropping, and the packing layout.
//!
//! Reading and writing deliberately use different layouts. The slicer walks
//! the source sheet row-major from the top-left, one cursor shared by every
//! state in the file. The packer lays cells out left-to-right at up to
//! [`MAX_COLUMNS`] per row, but writes placement row `r` to destination cell
//! row `rows - 1 - r`: the first placed row occupies the bottom of the sheet
//! and later rows move upward. Cells themselves are never flipped, so a
//! single-row sheet comes out in plain left-to-right order.

use image::{GenericImage, RgbaImage, imageops};

use super::state::State;
use crate::file::error::{DmiError, FormatError};

/// Maximum number of cell columns in a packed sheet.
pub const MAX_COLUMNS: u32 = 10;

/// Cell dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
	/// Cell width in pixels
	pub width: u32,
	/// Cell height in pixels
	pub height: u32,
}

impl CellSize {
	/// Default 32x32 cell.
	pub const DEFAULT: Self = Self {
		width: 32,
		height: 32,
	};

	/// Creates a cell size.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
		}
	}
}

impl std::fmt::Display for CellSize {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}

/// Read position over a sheet, advanced one cell at a time.
///
/// The cursor is a plain value threaded through the slicing routine rather
/// than hidden state, so a slice can be tested in isolation and independent
/// files never share position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetCursor {
	/// Left pixel column of the next cell
	pub x: u32,
	/// Top pixel row of the next cell
	pub y: u32,
}

impl SheetCursor {
	/// Wraps to the start of the next cell row when the next cell would
	/// cross the sheet's right edge.
	fn wrapped(self, cell: CellSize, sheet_width: u32) -> Self {
		if self.x + cell.width > sheet_width {
			Self {
				x: 0,
				y: self.y + cell.height,
			}
		} else {
			self
		}
	}

	/// Moves one cell to the right.
	fn advanced(self, cell: CellSize) -> Self {
		Self {
			x: self.x + cell.width,
			y: self.y,
		}
	}
}

/// Crops the cell under the cursor and returns it with the advanced cursor.
///
/// Wrapping happens before the read, so the cursor never crops a partial
/// cell. Running past the bottom of the sheet is a [`FormatError`]: the sheet
/// did not provide as many cells as the descriptor consumes.
pub fn crop_next(
	sheet: &RgbaImage,
	cell: CellSize,
	cursor: SheetCursor,
) -> Result<(RgbaImage, SheetCursor), FormatError> {
	let cursor = cursor.wrapped(cell, sheet.width());
	if cursor.y + cell.height > sheet.height() {
		return Err(FormatError::SheetExhausted {
			row: cursor.y,
			height: sheet.height(),
		});
	}
	let crop = imageops::crop_imm(sheet, cursor.x, cursor.y, cell.width, cell.height).to_image();
	Ok((crop, cursor.advanced(cell)))
}

/// Grid dimensions `(columns, rows)` for a packed sheet of `cell_count` cells.
pub fn grid_for(cell_count: u32) -> (u32, u32) {
	let columns = cell_count.min(MAX_COLUMNS).max(1);
	(columns, cell_count.div_ceil(columns).max(1))
}

/// Packs every cell of `states` into a fresh sheet.
///
/// Traverses states, frames, and cells in list order. Slots with an unset
/// raster are left fully transparent at their exact position so the layout
/// never shifts. Rasters are copied bulk with alpha unmodified; a raster that
/// does not fit its cell is an error.
pub fn pack(states: &[State], cell: CellSize) -> Result<RgbaImage, DmiError> {
	let cell_count: u32 = states.iter().map(State::cell_count).sum();
	let (columns, rows) = grid_for(cell_count);

	// `RgbaImage::new` zero-fills: the background starts fully transparent.
	let mut sheet = RgbaImage::new(columns * cell.width, rows * cell.height);

	let mut index = 0u32;
	for state in states {
		for frame in state.frames() {
			for slot in frame.cells() {
				let column = index % columns;
				let row = index / columns;
				let dest_x = column * cell.width;
				let dest_y = (rows - 1 - row) * cell.height;
				if let Some(raster) = slot.raster() {
					sheet.copy_from(raster, dest_x, dest_y)?;
				}
				index += 1;
			}
		}
	}

	Ok(sheet)
}
