//! Error types for DMI parsing, slicing, and assembly.

use thiserror::Error;

/// Violations of the descriptor grammar or of the sheet layout contract.
///
/// A `FormatError` is fatal for the file it occurred in, but never for
/// sibling files in a batch.
#[derive(Debug, Error)]
pub enum FormatError {
	/// The descriptor text does not open with `# BEGIN DMI`
	#[error("missing '# BEGIN DMI' sentinel")]
	MissingSentinel,

	/// A required descriptor entry is absent or mislabeled
	#[error("missing '{0}' descriptor entry")]
	MissingField(&'static str),

	/// A numeric descriptor value failed to parse
	#[error("invalid {field} value {value:?}")]
	InvalidNumber {
		/// Descriptor key the value belongs to
		field: &'static str,
		/// Offending text
		value: String,
	},

	/// Direction count outside the supported set
	#[error("unsupported direction count {0} (expected 1, 4 or 8)")]
	UnsupportedDirs(u32),

	/// A state declared zero animation frames
	#[error("state {0:?} declares zero frames")]
	EmptyState(String),

	/// The slicing cursor ran past the bottom of the sheet
	#[error("sheet exhausted: cell row at y={row} exceeds sheet height {height}")]
	SheetExhausted {
		/// Top pixel row of the cell the cursor wanted to read
		row: u32,
		/// Sheet height in pixels
		height: u32,
	},

	/// Sheet dimensions are not a whole number of cells
	#[error("sheet {width}x{height} is not divisible by cell {cell_width}x{cell_height}")]
	MisalignedSheet {
		/// Sheet width in pixels
		width: u32,
		/// Sheet height in pixels
		height: u32,
		/// Cell width in pixels
		cell_width: u32,
		/// Cell height in pixels
		cell_height: u32,
	},

	/// Container pixel data carries fewer than three channels
	#[error("container pixel data has {0} channel(s), need at least 3")]
	TooFewChannels(usize),

	/// No descriptor text chunk was found in the container
	#[error("container carries no descriptor text chunk")]
	MissingDescriptor,

	/// The container is not a PNG stream
	#[error("container does not start with a PNG signature")]
	BadSignature,
}

/// Unified error type for every DMI operation.
#[derive(Debug, Error)]
pub enum DmiError {
	/// Malformed descriptor or sheet layout
	#[error(transparent)]
	Format(#[from] FormatError),

	/// Structural snapshot unreadable
	#[error("snapshot corrupt: {0}")]
	SnapshotCorrupt(#[from] serde_json::Error),

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// Raster decode/encode error
	#[error(transparent)]
	Image(#[from] image::ImageError),

	/// PNG container read error
	#[error(transparent)]
	PngDecode(#[from] png::DecodingError),

	/// PNG container write error
	#[error(transparent)]
	PngEncode(#[from] png::EncodingError),
}
