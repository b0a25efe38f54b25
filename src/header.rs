//! MPEG audio frame header codec
//!
//! The header is the first four bytes of every frame, read big-endian:
//!
//! ```text
//! AAAAAAAA AAABBCCD EEEEFFGH IIJJKLMM
//! ```
//!
//! A = sync, B = version, C = layer, D = protection (0 means CRC follows),
//! E = bitrate index, F = sampling rate index, G = padding, H = private,
//! I = channel mode, J = mode extension, K = copyright, L = original,
//! M = emphasis.

use crate::constants::*;
use crate::error::ErrorKind;

/// A validated frame header.
///
/// Only the raw value is stored; every field and derived quantity is
/// extracted on access. `==` compares all bits, use [`Header::same_stream`]
/// to compare the fields that must stay constant within one stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header(u32);

/// Cheap validity check usable while scanning.
pub fn is_valid(raw: u32) -> bool {
	if raw & SYNC_MASK != SYNC_MASK {
		return false;
	}

	let version = field(raw, 19, 0b11);
	let layer = field(raw, 17, 0b11);
	let bitrate = field(raw, 12, 0b1111);
	let sampling = field(raw, 10, 0b11);
	let emphasis = field(raw, 0, 0b11);
	if version == 0b01
		|| layer == 0b00
		|| bitrate == BITRATE_BAD as u32
		|| sampling == 0b11
		|| emphasis == 0b10
	{
		return false;
	}

	// MPEG 1 Layer II forbids some bitrates depending on the channel mode
	if version == 0b11 && layer == 0b10 {
		let mono = field(raw, 6, 0b11) == 0b11;
		return LAYER2_MODE_CONSISTENCY[bitrate as usize][mono as usize];
	}

	true
}

fn field(raw: u32, shift: u32, mask: u32) -> u32 {
	(raw >> shift) & mask
}

/// Reads the big-endian header word at `offset`, if four bytes are available.
pub fn read_raw(data: &[u8], offset: usize) -> Option<u32> {
	let end = offset.checked_add(HEADER_SIZE)?;
	let bytes = data.get(offset..end)?;
	Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

impl Header {
	pub fn decode(raw: u32) -> Option<Header> {
		if is_valid(raw) {
			Some(Header(raw))
		} else {
			None
		}
	}

	/// Decodes the header at `offset` in `data`.
	pub fn peek(data: &[u8], offset: usize) -> Option<Header> {
		read_raw(data, offset).and_then(Header::decode)
	}

	pub fn raw(&self) -> u32 {
		self.0
	}

	pub fn version(&self) -> Version {
		match field(self.0, 19, 0b11) {
			0b00 => Version::Mpeg25,
			0b10 => Version::Mpeg2,
			_ => Version::Mpeg1,
		}
	}

	pub fn layer(&self) -> Layer {
		match field(self.0, 17, 0b11) {
			0b01 => Layer::Layer3,
			0b10 => Layer::Layer2,
			_ => Layer::Layer1,
		}
	}

	pub fn is_protected(&self) -> bool {
		field(self.0, 16, 1) == 0
	}

	pub fn bitrate_index(&self) -> u8 {
		field(self.0, 12, 0b1111) as u8
	}

	pub fn is_free_bitrate(&self) -> bool {
		self.bitrate_index() == BITRATE_FREE
	}

	pub fn sampling_rate_index(&self) -> u8 {
		field(self.0, 10, 0b11) as u8
	}

	pub fn is_padded(&self) -> bool {
		field(self.0, 9, 1) != 0
	}

	pub fn is_private(&self) -> bool {
		field(self.0, 8, 1) != 0
	}

	pub fn channel_mode(&self) -> ChannelMode {
		match field(self.0, 6, 0b11) {
			0 => ChannelMode::Stereo,
			1 => ChannelMode::JointStereo,
			2 => ChannelMode::DualChannel,
			_ => ChannelMode::Mono,
		}
	}

	pub fn mode_extension(&self) -> u8 {
		field(self.0, 4, 0b11) as u8
	}

	pub fn is_copyrighted(&self) -> bool {
		field(self.0, 3, 1) != 0
	}

	pub fn is_original(&self) -> bool {
		field(self.0, 2, 1) != 0
	}

	pub fn emphasis(&self) -> Emphasis {
		match field(self.0, 0, 0b11) {
			1 => Emphasis::Ms50_15,
			3 => Emphasis::CcittJ17,
			_ => Emphasis::None,
		}
	}

	/// True when both headers agree on version, layer, sampling rate,
	/// channel mode and emphasis.
	pub fn same_stream(&self, other: &Header) -> bool {
		(self.0 ^ other.0) & COMPARISON_MASK == 0
	}

	/// Bitrate in bits per second.
	pub fn bitrate(&self) -> Result<u32, ErrorKind> {
		if self.is_free_bitrate() {
			return Err(ErrorKind::Unsupported { operation: "bitrate" });
		}
		Ok(self.table_bitrate(self.bitrate_index()))
	}

	fn table_bitrate(&self, index: u8) -> u32 {
		1000 * BIT_RATES[self.version().class()][self.layer() as usize][index as usize]
	}

	pub fn sampling_rate(&self) -> u32 {
		SAMPLING_RATES[self.version() as usize][self.sampling_rate_index() as usize]
	}

	pub fn samples_per_frame(&self) -> u32 {
		SAMPLES_PER_FRAME[self.version().class()][self.layer() as usize]
	}

	pub fn slot_size(&self) -> u32 {
		self.layer().slot_size()
	}

	/// Samples per frame / 8, expressed in slots.
	pub(crate) fn slot_factor(&self) -> u32 {
		self.samples_per_frame() / 8 / self.slot_size()
	}

	/// Frame size in bytes, header included.
	pub fn frame_size(&self) -> Result<u32, ErrorKind> {
		if self.is_free_bitrate() {
			return Err(ErrorKind::Unsupported { operation: "frame size" });
		}
		Ok(self.size_for_bitrate(self.bitrate()?, self.is_padded()))
	}

	fn size_for_bitrate(&self, bitrate: u32, padded: bool) -> u32 {
		let slots =
			u64::from(self.slot_factor()) * u64::from(bitrate) / u64::from(self.sampling_rate());
		(slots as u32 + padded as u32) * self.slot_size()
	}

	/// Upper bound on the size of any frame sharing this header's version,
	/// layer and sampling rate. Used to bound the free bitrate probe.
	pub fn max_frame_size(&self) -> u32 {
		self.size_for_bitrate(self.table_bitrate(BITRATE_MAX), true)
	}

	/// Frame duration in seconds.
	pub fn frame_duration(&self) -> f32 {
		self.samples_per_frame() as f32 / self.sampling_rate() as f32
	}

	/// Size of the Layer III side information block, 0 for Layers I and II.
	pub fn side_info_size(&self) -> u32 {
		match self.layer() {
			Layer::Layer3 => {
				SIDE_INFORMATION_SIZES[self.version().class()][self.channel_mode() as usize]
			}
			_ => 0,
		}
	}

	/// Offset of the frame payload relative to the frame start.
	pub fn data_offset(&self) -> u32 {
		HEADER_SIZE as u32 + self.side_info_size()
	}
}
