//! Locating the first genuine frame of a stream.
//!
//! A lone `0xFFE` pattern proves nothing: tag data, album art and audio
//! payload are full of them. A candidate is only accepted once several
//! consecutive, stream-compatible headers are found exactly where the
//! previous frame's size says they should be.

use log::{debug, trace};

use crate::constants::HEADER_SIZE;
use crate::error::*;
use crate::header::{self, Header};

pub const DEFAULT_CONFIRM_FRAMES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
	Scanning { from: usize },
	Confirming { candidate: usize },
	Resyncing { failed: usize },
	Found(usize),
	Exhausted,
}

#[derive(Clone, Debug)]
pub struct Synchronizer {
	confirm_frames: usize,
}

impl Default for Synchronizer {
	fn default() -> Self {
		Synchronizer {
			confirm_frames: DEFAULT_CONFIRM_FRAMES,
		}
	}
}

impl Synchronizer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of consecutive headers required to accept a candidate, at least 1.
	pub fn with_confirm_frames(confirm_frames: usize) -> Self {
		Synchronizer {
			confirm_frames: confirm_frames.max(1),
		}
	}

	pub fn confirm_frames(&self) -> usize {
		self.confirm_frames
	}

	/// Offset of the first confirmed frame sequence, or `data.len()` if
	/// there is none.
	pub fn locate(&self, data: &[u8]) -> usize {
		let mut state = State::Scanning { from: 0 };
		loop {
			state = match state {
				State::Scanning { from } => match scan(data, from) {
					Some(candidate) => State::Confirming { candidate },
					None => State::Exhausted,
				},
				State::Confirming { candidate } => {
					if self.confirm(data, candidate) {
						State::Found(candidate)
					} else {
						State::Resyncing { failed: candidate }
					}
				}
				State::Resyncing { failed } => {
					trace!("Rejected sync candidate at {}", failed);
					State::Scanning { from: failed + 1 }
				}
				State::Found(offset) => {
					debug!("Stream synchronized at offset {}", offset);
					return offset;
				}
				State::Exhausted => {
					debug!("No frame sequence in {} bytes", data.len());
					return data.len();
				}
			}
		}
	}

	/// Like [`Synchronizer::locate`], but a buffer without a frame sequence
	/// is an error.
	pub fn find_first_frame(&self, data: &[u8]) -> Result<usize, MpegError> {
		match self.locate(data) {
			offset if offset < data.len() => Ok(offset),
			offset => Err(MpegError::new(ErrorKind::SyncNotFound, offset)),
		}
	}

	/// Checks that `confirm_frames` consecutive headers starting at
	/// `candidate` are valid, belong to the same stream, and are chained by
	/// their frame sizes.
	fn confirm(&self, data: &[u8], candidate: usize) -> bool {
		let first = match Header::peek(data, candidate) {
			Some(header) => header,
			None => return false,
		};

		let mut offset = candidate;
		for n in 0..self.confirm_frames {
			let header = match Header::peek(data, offset) {
				Some(header) if header.same_stream(&first) => header,
				_ => return false,
			};
			if n + 1 == self.confirm_frames {
				break;
			}
			match frame_size_at(data, offset, &header) {
				Ok(size) => offset += size,
				Err(_) => return false,
			}
		}
		true
	}
}

/// First offset at or after `from` holding a valid header.
fn scan(data: &[u8], from: usize) -> Option<usize> {
	if data.len() < HEADER_SIZE {
		return None;
	}
	(from..=data.len() - HEADER_SIZE).find(|&offset| {
		header::read_raw(data, offset).map_or(false, header::is_valid)
	})
}

/// Size of the frame at `offset`, probing for it when `header` uses the
/// free bitrate.
pub fn frame_size_at(data: &[u8], offset: usize, header: &Header) -> Result<usize, MpegError> {
	match header.frame_size() {
		Ok(size) => Ok(size as usize),
		Err(_) => probe_free_frame_size(data, offset),
	}
}

/// Infers the size of the free bitrate frame at `offset`.
///
/// Every size up to the largest frame the header's version and layer allow
/// is tried; the first one followed by a compatible header and whose implied
/// bitrate is a whole number of bits per second wins.
pub fn probe_free_frame_size(data: &[u8], offset: usize) -> Result<usize, MpegError> {
	let failed = || MpegError::new(ErrorKind::FreeBitrateProbeFailed, offset);
	let header = Header::peek(data, offset).ok_or_else(failed)?;

	let slot = header.slot_size() as usize;
	let padding = header.is_padded() as u64;
	let sampling_rate = u64::from(header.sampling_rate());
	let factor = u64::from(header.slot_factor());

	for size in HEADER_SIZE..=header.max_frame_size() as usize {
		if size % slot != 0 {
			continue;
		}
		let slots = (size / slot) as u64;
		if slots <= padding || (slots - padding) * sampling_rate % factor != 0 {
			continue;
		}
		match Header::peek(data, offset + size) {
			Some(next) if next.same_stream(&header) => {
				trace!("Free bitrate frame at {} is {} bytes", offset, size);
				return Ok(size);
			}
			_ => (),
		}
	}

	Err(failed())
}

/// True when `data` starts with a valid, fixed bitrate header whose frame
/// does not fit in `data`.
pub fn is_incomplete_frame(data: &[u8]) -> bool {
	match Header::peek(data, 0) {
		Some(header) => match header.frame_size() {
			Ok(size) => size as usize > data.len(),
			Err(_) => false,
		},
		None => false,
	}
}
