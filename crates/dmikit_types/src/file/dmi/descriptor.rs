//! Parsing and serialization of the textual DMI descriptor.
//!
//! The descriptor is a line-oriented block embedded in the container's
//! metadata:
//!
//! ```text
//! # BEGIN DMI
//! version = 4.0
//! 	width = 32
//! 	height = 32
//! state = "walk"
//! 	dirs = 4
//! 	frames = 2
//! 	delay = 0.2,0.2
//! 	rewind = 1
//! 	movement = 1
//! # END DMI
//! ```
//!
//! Each `key = value` line takes its value from the substring after the first
//! `=`, with surrounding quotes stripped. Within a state block the optional
//! entries must appear in the fixed order `delay`, `rewind`, `movement`; an
//! out-of-order optional entry is skipped, never reassigned. Serialization is
//! the exact inverse, so an unchanged structure round-trips byte for byte.

use std::iter::Peekable;
use std::str::FromStr;

use super::File;
use super::state::State;
use super::variants::VariantConfig;
use crate::file::error::FormatError;

/// Opening sentinel of a descriptor block.
pub const BEGIN_SENTINEL: &str = "# BEGIN DMI";

/// Closing sentinel of a descriptor block.
pub const END_SENTINEL: &str = "# END DMI";

/// Structural result of parsing a descriptor, before any rasters are read.
///
/// States carry their declared shape but no frame data; variant expansion has
/// already been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
	/// Version value exactly as it appeared in the text
	pub version: String,
	/// Cell width override, if the descriptor declared one
	pub cell_width: Option<u32>,
	/// Cell height override, if the descriptor declared one
	pub cell_height: Option<u32>,
	/// Expanded states in declaration order
	pub states: Vec<State>,
}

/// Parses descriptor text into its structural state list.
///
/// Each state descriptor is expanded into `variants.count()` states sharing
/// the same shape. Fails with a [`FormatError`] when the opening sentinel is
/// absent or any numeric field does not parse.
pub fn parse(text: &str, variants: &VariantConfig) -> Result<Descriptor, FormatError> {
	let mut lines = text.lines().map(str::trim_end).peekable();

	if lines.next() != Some(BEGIN_SENTINEL) {
		return Err(FormatError::MissingSentinel);
	}

	let version_line = lines.next().ok_or(FormatError::MissingField("version"))?;
	let (key, value) = split_entry(version_line);
	if key != "version" {
		return Err(FormatError::MissingField("version"));
	}
	// The value must be numeric even though the raw text is preserved.
	parse_number::<f32>("version", value)?;
	let version = value.to_string();

	let mut cell_width = None;
	if let Some(&line) = lines.peek() {
		let (key, value) = split_entry(line);
		if key == "width" {
			cell_width = Some(parse_number("width", value)?);
			lines.next();
		}
	}
	let mut cell_height = None;
	if let Some(&line) = lines.peek() {
		let (key, value) = split_entry(line);
		if key == "height" {
			cell_height = Some(parse_number("height", value)?);
			lines.next();
		}
	}

	let mut states = Vec::new();
	while let Some(line) = lines.next() {
		if line == END_SENTINEL {
			break;
		}
		let (key, name) = split_entry(line);
		if key == "state" {
			read_state(name, &mut lines, variants, &mut states)?;
		}
	}

	Ok(Descriptor {
		version,
		cell_width,
		cell_height,
		states,
	})
}

/// Serializes an image's structural state list back into descriptor text.
///
/// Every state (post-expansion) is written as an independent block in list
/// order, closing with the end sentinel.
pub fn serialize(image: &File) -> String {
	let mut out = String::new();
	out.push_str(BEGIN_SENTINEL);
	out.push('\n');
	out.push_str(&format!("version = {}\n", image.version()));
	out.push_str(&format!("\twidth = {}\n", image.cell_size().width));
	out.push_str(&format!("\theight = {}\n", image.cell_size().height));
	for state in image.states() {
		out.push_str(&format!("state = \"{}\"\n", state.name()));
		out.push_str(&format!("\tdirs = {}\n", state.dirs()));
		out.push_str(&format!("\tframes = {}\n", state.frame_count()));
		if state.has_delay() {
			out.push_str(&format!("\tdelay = {}\n", join_delays(state.delays())));
		}
		if state.rewind() > 0 {
			out.push_str(&format!("\trewind = {}\n", state.rewind()));
		}
		if state.movement() > 0 {
			out.push_str(&format!("\tmovement = {}\n", state.movement()));
		}
	}
	out.push_str(END_SENTINEL);
	out.push('\n');
	out
}

/// Comma-joins a delay list with no spaces, locale-independent.
fn join_delays(delays: &[f32]) -> String {
	delays.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

fn read_state<'a, I>(
	name: &str,
	lines: &mut Peekable<I>,
	variants: &VariantConfig,
	states: &mut Vec<State>,
) -> Result<(), FormatError>
where
	I: Iterator<Item = &'a str>,
{
	let dirs: u32 = parse_number("dirs", required_entry(lines, "dirs")?)?;
	if !matches!(dirs, 1 | 4 | 8) {
		return Err(FormatError::UnsupportedDirs(dirs));
	}

	let frame_count: u32 = parse_number("frames", required_entry(lines, "frames")?)?;
	if frame_count == 0 {
		return Err(FormatError::EmptyState(name.to_string()));
	}

	// Optional entries, fixed order: delay, rewind, movement.
	let mut delays = Vec::new();
	if peek_key(lines) == Some("delay") {
		let (_, value) = split_entry(lines.next().unwrap_or_default());
		for part in value.split(',') {
			delays.push(parse_number::<f32>("delay", part.trim())?);
		}
	}
	let mut rewind = 0;
	if peek_key(lines) == Some("rewind") {
		let (_, value) = split_entry(lines.next().unwrap_or_default());
		rewind = parse_number("rewind", value)?;
	}
	let mut movement = 0;
	if peek_key(lines) == Some("movement") {
		let (_, value) = split_entry(lines.next().unwrap_or_default());
		movement = parse_number("movement", value)?;
	}

	for full_name in variants.expand(name) {
		states.push(State::new(full_name, dirs, frame_count, delays.clone(), rewind, movement));
	}
	Ok(())
}

/// Splits a `key = value` line; the value is everything after the first `=`,
/// trimmed, with surrounding quotes stripped.
fn split_entry(line: &str) -> (&str, &str) {
	match line.split_once('=') {
		Some((key, value)) => (key.trim(), strip_quotes(value.trim())),
		None => (line.trim(), ""),
	}
}

fn strip_quotes(value: &str) -> &str {
	if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
		&value[1..value.len() - 1]
	} else {
		value
	}
}

fn peek_key<'a, I>(lines: &mut Peekable<I>) -> Option<&'a str>
where
	I: Iterator<Item = &'a str>,
{
	lines.peek().map(|&line| split_entry(line).0)
}

fn required_entry<'a, I>(lines: &mut Peekable<I>, field: &'static str) -> Result<&'a str, FormatError>
where
	I: Iterator<Item = &'a str>,
{
	let line = lines.next().ok_or(FormatError::MissingField(field))?;
	let (key, value) = split_entry(line);
	if key != field {
		return Err(FormatError::MissingField(field));
	}
	Ok(value)
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, FormatError> {
	value.parse().map_err(|_| FormatError::InvalidNumber {
		field,
		value: value.to_string(),
	})
}
