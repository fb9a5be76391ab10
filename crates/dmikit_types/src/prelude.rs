//! Prelude module for `dmikit_types`.
//!
//! This module provides a convenient way to import commonly used types,
//! traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use dmikit_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dmi = DmiFile::open("creature.dmi", &VariantConfig::none())?;
//! let sheet = dmi.pack_sheet()?;
//! # Ok(())
//! # }
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Graph types
	Cell,
	CellSize,

	// Descriptor types
	Descriptor,
	Direction,

	// Errors
	DmiError,

	// DMI types
	DmiFile,
	FormatError,
	Frame,

	// Raster sources
	PiecesSource,
	RasterSource,
	SheetCursor,
	SheetSource,

	State,
	VariantConfig,
};

// Snapshot and container boundaries
#[doc(inline)]
pub use crate::file::dmi::{container, snapshot};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
