//! `dmikit-rs` decomposes DMI sprite sheets into individually editable
//! per-cell rasters and reassembles edited sets into fresh containers.
//!
//! The heavy lifting lives in [`dmikit_types`]; this crate adds the batch
//! pipeline that walks directories of `.dmi` files and the `dmikit` binary
//! driving it.

pub mod pipeline;

// Re-export the core types crate for convenience
pub use dmikit_types;

/// `use dmikit_rs::prelude::*;` to import commonly used items.
pub mod prelude {
	#[doc(inline)]
	pub use dmikit_types::prelude::*;
}
