//! File type support for `dmikit-rs`.

mod error;

pub mod dmi;

// Re-export unified error types
pub use error::{DmiError, FormatError};

// Re-export main file types
pub use dmi::{
	Cell, CellSize, Descriptor, Direction, File as DmiFile, Frame, PiecesSource, RasterSource,
	SheetCursor, SheetSource, State, VariantConfig,
};
