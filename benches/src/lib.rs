//! Benchmark helper utilities for dmikit-rs
//!
//! This module provides generators for synthetic sheets and descriptors so
//! the slicing and packing benchmarks run without any real game assets.

use dmikit_types::prelude::*;
use image::{Rgba, RgbaImage};

/// Generates a sheet of `columns x rows` cells with a per-cell shade.
pub fn generate_sheet(columns: u32, rows: u32, cell: CellSize) -> RgbaImage {
	RgbaImage::from_fn(columns * cell.width, rows * cell.height, |x, y| {
		let index = (y / cell.height) * columns + (x / cell.width);
		Rgba([index as u8, (index >> 8) as u8, 0, 255])
	})
}

/// Generates descriptor text declaring `states` states of `dirs x frames`
/// cells each.
pub fn generate_descriptor(states: u32, dirs: u32, frames: u32, cell: CellSize) -> String {
	let mut text = String::from("# BEGIN DMI\nversion = 4.0\n");
	text.push_str(&format!("\twidth = {}\n\theight = {}\n", cell.width, cell.height));
	for index in 0..states {
		text.push_str(&format!(
			"state = \"state{index}\"\n\tdirs = {dirs}\n\tframes = {frames}\n"
		));
	}
	text.push_str("# END DMI\n");
	text
}

/// Builds a fully populated image covering `states x dirs x frames` cells.
pub fn generate_image(states: u32, dirs: u32, frames: u32, cell: CellSize) -> DmiFile {
	let mut image = DmiFile::new("bench");
	image.set_cell_size(cell);
	let mut shade = 0u8;
	for index in 0..states {
		let mut state = State::new(format!("state{index}"), dirs, frames, Vec::new(), 0, 0);
		for _ in 0..frames {
			let mut frame = Frame::new(0.0);
			for &direction in Direction::first(dirs) {
				let raster =
					RgbaImage::from_pixel(cell.width, cell.height, Rgba([shade, 0, 0, 255]));
				frame.push(Cell::with_raster(direction, raster));
				shade = shade.wrapping_add(1);
			}
			state.push_frame(frame);
		}
		image.push_state(state);
	}
	image
}

/// Common cell counts for the benchmark grid.
pub mod sizes {
	/// A single 4-direction state with a short animation
	pub const SMALL: (u32, u32, u32) = (1, 4, 4);
	/// A sheet the size of a typical creature file
	pub const MEDIUM: (u32, u32, u32) = (8, 4, 4);
	/// A large multi-state file
	pub const LARGE: (u32, u32, u32) = (32, 8, 8);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_sheet_dimensions() {
		let cell = CellSize::new(32, 32);
		let sheet = generate_sheet(4, 2, cell);
		assert_eq!((sheet.width(), sheet.height()), (128, 64));
	}

	#[test]
	fn test_generate_descriptor_parses() {
		let cell = CellSize::new(32, 32);
		let text = generate_descriptor(3, 4, 2, cell);
		let parsed =
			dmikit_types::file::dmi::descriptor::parse(&text, &VariantConfig::none()).unwrap();
		assert_eq!(parsed.states.len(), 3);
		assert_eq!(parsed.cell_width, Some(32));
	}
}
