//! `.DMI` sprite sheet support for `dmikit-rs`.
//!
//! A DMI file is a PNG container whose metadata carries a textual animation
//! descriptor and whose pixel data packs animation cells in fixed-size tiles.
//! This module decomposes such a file into an in-memory graph that can be
//! externalized cell by cell, and reassembles an edited graph back into a
//! container.
//!
//! # File Structure
//!
//! - **Pixel data:** a sheet of `width x height` pixels, a whole number of
//!   `cell_width x cell_height` cells, read row-major from the top-left.
//! - **Metadata:** a `Description` text chunk holding the descriptor block
//!   parsed by [`descriptor`].
//!
//! Cells appear on the sheet in state order; within a state, frame by frame;
//! within a frame, one cell per direction in the canonical order south,
//! north, east, west, southeast, southwest, northeast, northwest.
//!
//! # Usage Examples
//!
//! ## Decomposing a file
//!
//! ```no_run
//! use dmikit_types::file::dmi::{File, VariantConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dmi = File::open("creature.dmi", &VariantConfig::none())?;
//!
//! println!("{}: {} states", dmi.name(), dmi.states().len());
//! for state in dmi.states() {
//!     println!("  {}", state);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Reassembling a sheet
//!
//! ```no_run
//! use dmikit_types::file::dmi::{File, VariantConfig, container};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dmi = File::open("creature.dmi", &VariantConfig::none())?;
//!
//! let sheet = dmi.pack_sheet()?;
//! sheet.save("creature.png")?;
//! container::embed_descriptor("creature.png", &dmi.descriptor_text(), "rebuilt.dmi")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use image::RgbaImage;

use crate::file::error::{DmiError, FormatError};

pub mod container;
pub mod descriptor;
pub mod sheet;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod variants;

#[cfg(test)]
mod tests;

pub use self::descriptor::Descriptor;
pub use self::sheet::{CellSize, MAX_COLUMNS, SheetCursor};
pub use self::source::{PiecesSource, RasterSource, SheetSource};
pub use self::state::{Cell, Direction, Frame, State};
pub use self::variants::VariantConfig;

/// A DMI image: named, cell-sized, owning its states in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
	name: String,
	version: String,
	cell: CellSize,
	states: Vec<State>,
}

impl File {
	/// Creates an empty image with the default cell size.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			version: "4.0".to_string(),
			cell: CellSize::DEFAULT,
			states: Vec::new(),
		}
	}

	pub(crate) fn from_parts(
		name: String,
		version: String,
		cell: CellSize,
		states: Vec<State>,
	) -> Self {
		Self {
			name,
			version,
			cell,
			states,
		}
	}

	/// Opens a DMI container and slices its sheet into per-cell rasters.
	///
	/// Reads the descriptor out of the container's metadata, expands it
	/// through `variants`, and crops one cell per (state, frame, direction)
	/// with a single cursor shared across all states.
	///
	/// # Errors
	///
	/// Returns an error if the container has no descriptor chunk, the
	/// descriptor is malformed, the sheet is not a whole number of cells, or
	/// the descriptor consumes more cells than the sheet provides.
	pub fn open(path: impl AsRef<Path>, variants: &VariantConfig) -> Result<Self, DmiError> {
		let path = path.as_ref();
		let text = container::read_descriptor(path)?;
		let parsed = descriptor::parse(&text, variants)?;
		let cell = cell_size_of(&parsed);

		let sheet = image::ImageReader::open(path)?.with_guessed_format()?.decode()?.to_rgba8();
		if sheet.width() % cell.width != 0 || sheet.height() % cell.height != 0 {
			return Err(FormatError::MisalignedSheet {
				width: sheet.width(),
				height: sheet.height(),
				cell_width: cell.width,
				cell_height: cell.height,
			}
			.into());
		}

		let mut source = SheetSource::new(&sheet, cell);
		Self::assemble(name_of(path), parsed, cell, &mut source)
	}

	/// Opens a DMI container but loads cell rasters from individual files.
	///
	/// The descriptor still comes from the container's metadata; rasters are
	/// read from `pieces_root` following the snapshot store's addressing
	/// contract instead of being cropped out of the sheet.
	pub fn open_with_pieces(
		path: impl AsRef<Path>,
		pieces_root: impl AsRef<Path>,
		variants: &VariantConfig,
	) -> Result<Self, DmiError> {
		let path = path.as_ref();
		let text = container::read_descriptor(path)?;
		let parsed = descriptor::parse(&text, variants)?;
		let cell = cell_size_of(&parsed);

		let mut source = PiecesSource::new(pieces_root.as_ref());
		Self::assemble(name_of(path), parsed, cell, &mut source)
	}

	/// Builds the full graph for a parsed descriptor, pulling one raster per
	/// slot from `raster_source` in canonical traversal order.
	pub fn assemble(
		name: impl Into<String>,
		parsed: Descriptor,
		cell: CellSize,
		raster_source: &mut dyn RasterSource,
	) -> Result<Self, DmiError> {
		let Descriptor {
			version,
			mut states,
			..
		} = parsed;

		for (state_index, state) in states.iter_mut().enumerate() {
			let frame_count = state.frame_count();
			let dirs = state.dirs();
			for frame_index in 0..frame_count {
				let mut frame = Frame::new(state.delay(frame_index as usize));
				for &direction in Direction::first(dirs) {
					let raster = raster_source.cell(state_index, frame_index, direction)?;
					frame.push(Cell::with_raster(direction, raster));
				}
				state.push_frame(frame);
			}
		}

		Ok(Self {
			name: name.into(),
			version,
			cell,
			states,
		})
	}

	/// Image name, taken from the file stem on open.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Descriptor version string.
	pub fn version(&self) -> &str {
		&self.version
	}

	/// Cell dimensions shared by every state.
	pub fn cell_size(&self) -> CellSize {
		self.cell
	}

	/// Overrides the cell dimensions used for packing.
	pub fn set_cell_size(&mut self, cell: CellSize) {
		self.cell = cell;
	}

	/// States in sheet order.
	pub fn states(&self) -> &[State] {
		&self.states
	}

	/// Mutable states.
	pub fn states_mut(&mut self) -> &mut [State] {
		&mut self.states
	}

	/// Appends a state.
	pub fn push_state(&mut self, state: State) {
		self.states.push(state);
	}

	/// Total number of cells across all states.
	pub fn cell_count(&self) -> u32 {
		self.states.iter().map(State::cell_count).sum()
	}

	/// Regenerates the descriptor text for the current state list.
	pub fn descriptor_text(&self) -> String {
		descriptor::serialize(self)
	}

	/// Packs every cell into a fresh sheet raster.
	pub fn pack_sheet(&self) -> Result<RgbaImage, DmiError> {
		sheet::pack(&self.states, self.cell)
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"DMI {}: {} states, {} cells of {}",
			self.name,
			self.states.len(),
			self.cell_count(),
			self.cell
		)
	}
}

fn cell_size_of(parsed: &Descriptor) -> CellSize {
	CellSize::new(
		parsed.cell_width.unwrap_or(CellSize::DEFAULT.width),
		parsed.cell_height.unwrap_or(CellSize::DEFAULT.height),
	)
}

fn name_of(path: &Path) -> String {
	path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}
