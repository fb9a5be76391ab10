//! In-memory animation graph: states own frames, frames own per-direction cells.

use image::RgbaImage;

/// One of the eight canonical facings.
///
/// A state with `dirs = k` uses the first `k` entries of [`Direction::CANONICAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Facing the viewer (value 2)
	South,
	/// Facing away (value 1)
	North,
	/// Facing right (value 4)
	East,
	/// Facing left (value 8)
	West,
	/// Diagonal south-east (value 6)
	Southeast,
	/// Diagonal south-west (value 10)
	Southwest,
	/// Diagonal north-east (value 5)
	Northeast,
	/// Diagonal north-west (value 9)
	Northwest,
}

impl Direction {
	/// Canonical order in which cells appear on a sheet.
	pub const CANONICAL: [Self; 8] = [
		Self::South,
		Self::North,
		Self::East,
		Self::West,
		Self::Southeast,
		Self::Southwest,
		Self::Northeast,
		Self::Northwest,
	];

	/// Numeric facing value, also used as the per-cell file name.
	///
	/// Diagonals are the bitwise OR of their components
	/// (north = 1, south = 2, east = 4, west = 8).
	pub fn value(self) -> u8 {
		match self {
			Self::North => 1,
			Self::South => 2,
			Self::East => 4,
			Self::West => 8,
			Self::Northeast => 5,
			Self::Southeast => 6,
			Self::Northwest => 9,
			Self::Southwest => 10,
		}
	}

	/// Inverse of [`Direction::value`].
	pub fn from_value(value: u8) -> Option<Self> {
		Self::CANONICAL.into_iter().find(|d| d.value() == value)
	}

	/// The first `count` canonical directions.
	///
	/// `count` must be at most 8; the parser only produces 1, 4 or 8.
	pub fn first(count: u32) -> &'static [Self] {
		&Self::CANONICAL[..count as usize]
	}
}

impl std::fmt::Display for Direction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::South => "south",
			Self::North => "north",
			Self::East => "east",
			Self::West => "west",
			Self::Southeast => "southeast",
			Self::Southwest => "southwest",
			Self::Northeast => "northeast",
			Self::Northwest => "northwest",
		};
		f.write_str(name)
	}
}

/// A named animation unit covering `dirs x frame_count` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
	name: String,
	dirs: u32,
	frame_count: u32,
	delays: Vec<f32>,
	rewind: u32,
	movement: u32,
	frames: Vec<Frame>,
}

impl State {
	/// Creates a state with no frame data yet.
	pub fn new(
		name: impl Into<String>,
		dirs: u32,
		frame_count: u32,
		delays: Vec<f32>,
		rewind: u32,
		movement: u32,
	) -> Self {
		Self {
			name: name.into(),
			dirs,
			frame_count,
			delays,
			rewind,
			movement,
			frames: Vec::new(),
		}
	}

	/// State name, unique within an image after variant expansion.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of directions per frame (1, 4 or 8).
	pub fn dirs(&self) -> u32 {
		self.dirs
	}

	/// Number of animation frames (at least 1).
	pub fn frame_count(&self) -> u32 {
		self.frame_count
	}

	/// Declared per-frame delays; empty when the state has none.
	pub fn delays(&self) -> &[f32] {
		&self.delays
	}

	/// Whether the state declares a delay list.
	pub fn has_delay(&self) -> bool {
		!self.delays.is_empty()
	}

	/// Rewind flag (0 when unset).
	pub fn rewind(&self) -> u32 {
		self.rewind
	}

	/// Movement flag (0 when unset).
	pub fn movement(&self) -> u32 {
		self.movement
	}

	/// Delay for frame `index`.
	///
	/// Indexes past the end of the delay list fall back to the first entry;
	/// a state without delays yields 0.
	pub fn delay(&self, index: usize) -> f32 {
		match self.delays.get(index) {
			Some(delay) => *delay,
			None => self.delays.first().copied().unwrap_or(0.0),
		}
	}

	/// Number of sheet cells this state occupies.
	pub fn cell_count(&self) -> u32 {
		self.frame_count * self.dirs
	}

	/// Frame data in animation order.
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Mutable frame data.
	pub fn frames_mut(&mut self) -> &mut [Frame] {
		&mut self.frames
	}

	/// Appends a frame.
	pub fn push_frame(&mut self, frame: Frame) {
		self.frames.push(frame);
	}

	/// Builds empty frames for every (frame, direction) slot.
	///
	/// Used when restoring a structural snapshot: the graph shape is known
	/// but every raster slot starts out unset.
	pub fn build_skeleton(&mut self) {
		self.frames.clear();
		for frame_index in 0..self.frame_count {
			let mut frame = Frame::new(self.delay(frame_index as usize));
			for &direction in Direction::first(self.dirs) {
				frame.push(Cell::new(direction));
			}
			self.frames.push(frame);
		}
	}
}

impl std::fmt::Display for State {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({} dirs, {} frames)", self.name, self.dirs, self.frame_count)
	}
}

/// One animation frame: a cell per direction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
	delay: f32,
	cells: Vec<Cell>,
}

impl Frame {
	/// Creates an empty frame with the given delay.
	pub fn new(delay: f32) -> Self {
		Self {
			delay,
			cells: Vec::new(),
		}
	}

	/// Frame delay derived from the owning state's delay list.
	pub fn delay(&self) -> f32 {
		self.delay
	}

	/// Cells in canonical direction order.
	pub fn cells(&self) -> &[Cell] {
		&self.cells
	}

	/// Mutable cells.
	pub fn cells_mut(&mut self) -> &mut [Cell] {
		&mut self.cells
	}

	/// Appends a cell.
	pub fn push(&mut self, cell: Cell) {
		self.cells.push(cell);
	}
}

/// A single direction's raster slot within a frame.
///
/// The raster is `None` after a snapshot restore until rehydration fills it;
/// the packer substitutes a fully transparent cell for slots left unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
	direction: Direction,
	raster: Option<RgbaImage>,
}

impl Cell {
	/// Creates a cell with an unset raster slot.
	pub fn new(direction: Direction) -> Self {
		Self {
			direction,
			raster: None,
		}
	}

	/// Creates a cell holding a raster.
	pub fn with_raster(direction: Direction, raster: RgbaImage) -> Self {
		Self {
			direction,
			raster: Some(raster),
		}
	}

	/// Facing of this cell.
	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// Raster content, if set.
	pub fn raster(&self) -> Option<&RgbaImage> {
		self.raster.as_ref()
	}

	/// Replaces the raster content.
	pub fn set_raster(&mut self, raster: RgbaImage) {
		self.raster = Some(raster);
	}

	/// Whether the raster slot is filled.
	pub fn is_filled(&self) -> bool {
		self.raster.is_some()
	}
}
