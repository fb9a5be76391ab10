//! Cross-module tests: slicing, packing, variants, and container round-trips.

use image::{Rgba, RgbaImage};
use tempfile::tempdir;

use super::*;
use crate::file::error::{DmiError, FormatError};

/// Sheet whose cell at index `i` (row-major) is solid `[i, 0, 0, 255]`.
fn banded_sheet(columns: u32, rows: u32, cell: CellSize) -> RgbaImage {
	RgbaImage::from_fn(columns * cell.width, rows * cell.height, |x, y| {
		let index = (y / cell.height) * columns + (x / cell.width);
		Rgba([index as u8, 0, 0, 255])
	})
}

#[test]
fn test_slice_order_matches_canonical_traversal() {
	// One state, dirs = 4, frames = 2: eight cells in two sheet rows of four.
	let cell = CellSize::new(32, 32);
	let sheet = banded_sheet(4, 2, cell);
	let text = "# BEGIN DMI\nversion = 4.0\nstate = \"walk\"\n\tdirs = 4\n\tframes = 2\n# END DMI\n";
	let parsed = descriptor::parse(text, &VariantConfig::none()).unwrap();

	let mut raster_source = SheetSource::new(&sheet, cell);
	let dmi = File::assemble("walk_test", parsed, cell, &mut raster_source).unwrap();

	let state = &dmi.states()[0];
	assert_eq!(state.frames().len(), 2);
	let mut expected = 0u8;
	for frame in state.frames() {
		let dirs: Vec<Direction> = frame.cells().iter().map(Cell::direction).collect();
		assert_eq!(dirs, vec![
			Direction::South,
			Direction::North,
			Direction::East,
			Direction::West
		]);
		for slot in frame.cells() {
			assert_eq!(slot.raster().unwrap().get_pixel(0, 0), &Rgba([expected, 0, 0, 255]));
			expected += 1;
		}
	}

	// Repacking eight cells yields a single 256x32 row, order preserved and
	// vertically unflipped since there is only one row.
	let packed = dmi.pack_sheet().unwrap();
	assert_eq!((packed.width(), packed.height()), (256, 32));
	for index in 0..8u32 {
		assert_eq!(packed.get_pixel(index * 32, 0), &Rgba([index as u8, 0, 0, 255]));
	}
}

#[test]
fn test_variant_expansion_consumes_one_shared_cursor() {
	// A single descriptor expanded into two variants drains
	// variants x frames x dirs = 2 x 2 x 1 cells from the same cursor.
	let cell = CellSize::new(4, 4);
	let sheet = banded_sheet(4, 1, cell);
	let text = "# BEGIN DMI\nversion = 4.0\n\twidth = 4\n\theight = 4\n\
		state = \"glow\"\n\tdirs = 1\n\tframes = 2\n# END DMI\n";
	let variants = VariantConfig::new(vec!["a".into(), "b".into()], "-");
	let parsed = descriptor::parse(text, &variants).unwrap();
	assert_eq!(parsed.states.len(), 2);

	let mut raster_source = SheetSource::new(&sheet, cell);
	let dmi = File::assemble("glow_test", parsed, cell, &mut raster_source).unwrap();

	assert_eq!(dmi.cell_count(), 4);
	let shades: Vec<u8> = dmi
		.states()
		.iter()
		.flat_map(|s| s.frames())
		.flat_map(|f| f.cells())
		.map(|c| c.raster().unwrap().get_pixel(0, 0).0[0])
		.collect();
	// The second variant continues where the first stopped.
	assert_eq!(shades, vec![0, 1, 2, 3]);
	assert_eq!(dmi.states()[0].name(), "glow-a");
	assert_eq!(dmi.states()[1].name(), "glow-b");
}

#[test]
fn test_descriptor_consuming_more_cells_than_the_sheet_has() {
	let cell = CellSize::new(4, 4);
	let sheet = banded_sheet(2, 1, cell);
	let text = "# BEGIN DMI\nversion = 4.0\n\twidth = 4\n\theight = 4\n\
		state = \"long\"\n\tdirs = 1\n\tframes = 4\n# END DMI\n";
	let parsed = descriptor::parse(text, &VariantConfig::none()).unwrap();

	let mut raster_source = SheetSource::new(&sheet, cell);
	let err = File::assemble("overrun", parsed, cell, &mut raster_source).unwrap_err();
	assert!(matches!(
		err,
		DmiError::Format(FormatError::SheetExhausted { .. })
	));
}

#[test]
fn test_container_roundtrip_preserves_structure_and_pixels() {
	let dir = tempdir().unwrap();
	let cell = CellSize::new(8, 8);

	let mut image = File::new("blob");
	image.set_cell_size(cell);
	let mut state = State::new("bounce", 4, 1, vec![0.3], 1, 0);
	let mut frame = Frame::new(state.delay(0));
	for (i, &direction) in Direction::first(4).iter().enumerate() {
		let raster = RgbaImage::from_pixel(8, 8, Rgba([10 + i as u8, 20, 30, 255]));
		frame.push(Cell::with_raster(direction, raster));
	}
	state.push_frame(frame);
	image.push_state(state);

	let sheet = image.pack_sheet().unwrap();
	let intermediate = dir.path().join("blob.png");
	sheet.save(&intermediate).unwrap();
	let dest = dir.path().join("blob.dmi");
	container::embed_descriptor(&intermediate, &image.descriptor_text(), &dest).unwrap();

	let reopened = File::open(&dest, &VariantConfig::none()).unwrap();
	assert_eq!(reopened.name(), "blob");
	assert_eq!(reopened.version(), image.version());
	assert_eq!(reopened.cell_size(), cell);
	assert_eq!(reopened.states().len(), 1);

	let state = &reopened.states()[0];
	assert_eq!(state.name(), "bounce");
	assert_eq!(state.dirs(), 4);
	assert_eq!(state.frame_count(), 1);
	assert_eq!(state.delays(), &[0.3]);
	assert_eq!(state.rewind(), 1);

	// Four cells pack into a single row, so the read order equals the write
	// order and every raster survives the trip untouched.
	let original = &image.states()[0];
	for (slot, original_slot) in state.frames()[0].cells().iter().zip(original.frames()[0].cells())
	{
		assert_eq!(slot.raster(), original_slot.raster());
	}
}

#[test]
fn test_misaligned_sheet_is_rejected() {
	let dir = tempdir().unwrap();
	// A 10x10 sheet cannot hold whole 8x8 cells.
	let sheet = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
	let intermediate = dir.path().join("odd.png");
	sheet.save(&intermediate).unwrap();
	let dest = dir.path().join("odd.dmi");
	let text = "# BEGIN DMI\nversion = 4.0\n\twidth = 8\n\theight = 8\n\
		state = \"x\"\n\tdirs = 1\n\tframes = 1\n# END DMI\n";
	container::embed_descriptor(&intermediate, text, &dest).unwrap();

	let err = File::open(&dest, &VariantConfig::none()).unwrap_err();
	assert!(matches!(
		err,
		DmiError::Format(FormatError::MisalignedSheet { .. })
	));
}

#[test]
fn test_open_with_pieces_reads_individual_rasters() {
	let dir = tempdir().unwrap();

	// Container whose sheet pixel content is deliberately not what the
	// pieces hold.
	let sheet = RgbaImage::from_pixel(8, 8, Rgba([1, 1, 1, 255]));
	let intermediate = dir.path().join("piecey.png");
	sheet.save(&intermediate).unwrap();
	let dest = dir.path().join("piecey.dmi");
	let text = "# BEGIN DMI\nversion = 4.0\n\twidth = 8\n\theight = 8\n\
		state = \"solo\"\n\tdirs = 1\n\tframes = 1\n# END DMI\n";
	container::embed_descriptor(&intermediate, text, &dest).unwrap();

	let pieces_root = dir.path().join("pieces");
	let green = RgbaImage::from_pixel(8, 8, Rgba([0, 200, 0, 255]));
	let piece = snapshot::cell_path(&pieces_root, 0, 0, Direction::South);
	std::fs::create_dir_all(piece.parent().unwrap()).unwrap();
	green.save(&piece).unwrap();

	let dmi = File::open_with_pieces(&dest, &pieces_root, &VariantConfig::none()).unwrap();
	let slot = &dmi.states()[0].frames()[0].cells()[0];
	assert_eq!(slot.raster(), Some(&green));
}
