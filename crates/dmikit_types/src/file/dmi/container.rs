//! PNG container boundary: descriptor extraction and embedding.
//!
//! A DMI container is an ordinary PNG whose metadata carries the descriptor
//! text in a text chunk keyed [`DESCRIPTOR_KEY`]. This module only defines
//! what crosses that boundary: reading the descriptor text out of a
//! container, and writing a finished sheet plus regenerated descriptor into
//! one. Pixel encoding itself is the codec's job.
//!
//! Embedding re-encodes the pixel data losslessly, stores the descriptor as
//! a single `tEXt` entry, and carries every other ancillary chunk of the
//! source over byte for byte (original CRC included). The source is treated
//! as a disposable intermediate and deleted once the embed succeeds.

use std::fs;
use std::io::BufReader;
use std::path::Path;

use crate::file::error::{DmiError, FormatError};

/// Metadata key under which the descriptor text is stored.
pub const DESCRIPTOR_KEY: &str = "Description";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Byte length of a chunk's framing: 4-byte length, 4-byte type, 4-byte CRC.
const CHUNK_OVERHEAD: usize = 12;

/// Reads the descriptor text out of a container's metadata.
///
/// Searches `tEXt`, `zTXt`, and `iTXt` entries for [`DESCRIPTOR_KEY`], in
/// that order. Text chunks may trail the image data, so the whole stream is
/// drained before looking.
pub fn read_descriptor(path: impl AsRef<Path>) -> Result<String, DmiError> {
	let file = fs::File::open(path)?;
	let decoder = png::Decoder::new(BufReader::new(file));
	let mut reader = decoder.read_info()?;
	let mut buf = vec![0; reader.output_buffer_size()];
	reader.next_frame(&mut buf)?;
	reader.finish()?;

	let info = reader.info();
	for chunk in &info.uncompressed_latin1_text {
		if chunk.keyword == DESCRIPTOR_KEY {
			return Ok(chunk.text.clone());
		}
	}
	for chunk in &info.compressed_latin1_text {
		if chunk.keyword == DESCRIPTOR_KEY {
			return Ok(chunk.get_text()?);
		}
	}
	for chunk in &info.utf8_text {
		if chunk.keyword == DESCRIPTOR_KEY {
			return Ok(chunk.get_text()?);
		}
	}
	Err(FormatError::MissingDescriptor.into())
}

/// Embeds descriptor text into a pixel container, writing the result to `dest`.
///
/// Reads the source container at `pixels_png`, re-encodes its pixel data
/// losslessly with the descriptor stored as one `tEXt` entry, splices every
/// other ancillary chunk of the source in verbatim, and deletes the source;
/// it is a disposable intermediate, not a retained output. Fails with a
/// [`FormatError`] when the source pixel data has fewer than 3 channels.
pub fn embed_descriptor(
	pixels_png: impl AsRef<Path>,
	descriptor: &str,
	dest: impl AsRef<Path>,
) -> Result<(), DmiError> {
	let pixels_png = pixels_png.as_ref();
	let dest = dest.as_ref();

	let raw = fs::read(pixels_png)?;

	// Decode in the container's native format so the re-encode is lossless.
	let mut decoder = png::Decoder::new(raw.as_slice());
	decoder.set_transformations(png::Transformations::IDENTITY);
	let mut reader = decoder.read_info()?;
	let mut pixels = vec![0; reader.output_buffer_size()];
	let info = reader.next_frame(&mut pixels)?;
	pixels.truncate(info.buffer_size());

	let channels = info.color_type.samples();
	if channels < 3 {
		return Err(FormatError::TooFewChannels(channels).into());
	}

	let mut encoded = Vec::new();
	{
		let mut encoder = png::Encoder::new(&mut encoded, info.width, info.height);
		encoder.set_color(info.color_type);
		encoder.set_depth(info.bit_depth);
		encoder.add_text_chunk(DESCRIPTOR_KEY.to_string(), descriptor.to_string())?;
		let mut writer = encoder.write_header()?;
		writer.write_image_data(&pixels)?;
		writer.finish()?;
	}

	// Carry the source's other ancillary chunks over byte for byte. IEND is
	// always the encoder's final 12 bytes; foreign chunks go right before it.
	let carried = ancillary_chunks(&raw)?;
	if !carried.is_empty() {
		let tail = encoded.split_off(encoded.len() - CHUNK_OVERHEAD);
		for chunk in carried {
			encoded.extend_from_slice(chunk);
		}
		encoded.extend_from_slice(&tail);
	}

	if let Some(parent) = dest.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(dest, &encoded)?;
	fs::remove_file(pixels_png)?;
	Ok(())
}

/// Raw byte ranges of the source's ancillary chunks worth carrying over:
/// everything except critical chunks and text entries already keyed
/// [`DESCRIPTOR_KEY`] (those are being replaced).
fn ancillary_chunks(raw: &[u8]) -> Result<Vec<&[u8]>, DmiError> {
	if raw.len() < PNG_SIGNATURE.len() || raw[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
		return Err(FormatError::BadSignature.into());
	}

	let mut chunks = Vec::new();
	let mut offset = PNG_SIGNATURE.len();
	while offset + CHUNK_OVERHEAD <= raw.len() {
		let length = u32::from_be_bytes([
			raw[offset],
			raw[offset + 1],
			raw[offset + 2],
			raw[offset + 3],
		]) as usize;
		let end = offset + CHUNK_OVERHEAD + length;
		if end > raw.len() {
			// Truncated trailing chunk; nothing more to carry.
			break;
		}

		let kind = &raw[offset + 4..offset + 8];
		let data = &raw[offset + 8..offset + 8 + length];
		// Bit 5 of the first type byte marks a chunk as ancillary.
		let ancillary = kind[0].is_ascii_lowercase();
		if ancillary && !(is_text_chunk(kind) && chunk_keyword(data) == DESCRIPTOR_KEY.as_bytes()) {
			chunks.push(&raw[offset..end]);
		}

		if kind == b"IEND" {
			break;
		}
		offset = end;
	}
	Ok(chunks)
}

fn is_text_chunk(kind: &[u8]) -> bool {
	kind == b"tEXt" || kind == b"zTXt" || kind == b"iTXt"
}

/// Keyword of a text chunk: the data bytes up to the first NUL.
fn chunk_keyword(data: &[u8]) -> &[u8] {
	let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
	&data[..end]
}
