//! This crate provides core data types and file format support for the
//! `dmikit-rs` project.
//!
//! # File Formats
//!
//! - **DMI**: PNG containers whose metadata carries a textual animation
//!   descriptor and whose pixel data packs fixed-size animation cells
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use dmikit_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dmi = DmiFile::open("creature.dmi", &VariantConfig::none())?;
//! println!("{} states", dmi.states().len());
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use dmikit_types::file::dmi::{File, VariantConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dmi = File::open("creature.dmi", &VariantConfig::none())?;
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use dmikit_types::prelude::*;` to import commonly used items.
pub mod prelude;
