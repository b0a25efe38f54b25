//! Xing / Info VBR header
//!
//! Encoders store this block in the payload of the first frame, right after
//! the side information. Layout, all integers big-endian:
//!
//! ```text
//! "Xing" | "Info"   4 bytes
//! flags             4 bytes
//! frame count       4 bytes  (flags & 0x1)
//! byte count        4 bytes  (flags & 0x2)
//! seek TOC        100 bytes  (flags & 0x4)
//! quality           4 bytes  (flags & 0x8)
//! ```

use log::debug;

use crate::context::Context;
use crate::error::*;
use crate::header::Header;

pub const FLAG_FRAMES: u32 = 0x1;
pub const FLAG_BYTES: u32 = 0x2;
pub const FLAG_TOC: u32 = 0x4;
pub const FLAG_QUALITY: u32 = 0x8;

const TOC_SIZE: usize = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct XingHeader {
	header: Header,
	offset: usize,
	vbr: bool,
	flags: u32,
	frame_count: u32,
	byte_count: u32,
	toc_offset: usize,
	quality: u32,
	modified: bool,
}

impl XingHeader {
	/// Looks for a Xing/Info block in the frame starting at `frame_start`.
	///
	/// Returns `Ok(None)` when the frame has no valid header or carries no
	/// tag. A tag whose declared fields run past the end of `data` fails
	/// with `TruncatedMetadata`.
	pub fn parse(data: &[u8], frame_start: usize) -> Result<Option<XingHeader>, MpegError> {
		let header = match Header::peek(data, frame_start) {
			Some(header) => header,
			None => return Ok(None),
		};

		let mut context = Context::new(data, frame_start + header.data_offset() as usize);
		let vbr = match context.read_exact(4) {
			Some(b"Xing") => true,
			Some(b"Info") => false,
			_ => return Ok(None),
		};

		let truncated = |context: &Context| context.error(ErrorKind::TruncatedMetadata);
		let flags = context.read_u32().ok_or_else(|| truncated(&context))?;

		let mut xing = XingHeader {
			header,
			offset: frame_start,
			vbr,
			flags,
			frame_count: 0,
			byte_count: 0,
			toc_offset: 0,
			quality: 0,
			modified: false,
		};

		if flags & FLAG_FRAMES != 0 {
			xing.frame_count = context.read_u32().ok_or_else(|| truncated(&context))?;
		}
		if flags & FLAG_BYTES != 0 {
			xing.byte_count = context.read_u32().ok_or_else(|| truncated(&context))?;
		}
		if flags & FLAG_TOC != 0 {
			xing.toc_offset = context.position();
			context.skip(TOC_SIZE).ok_or_else(|| truncated(&context))?;
		}
		if flags & FLAG_QUALITY != 0 {
			xing.quality = context.read_u32().ok_or_else(|| truncated(&context))?;
		}

		debug!(
			"{} header at {}: flags={:#x}, frames={}, bytes={}",
			if vbr { "Xing" } else { "Info" },
			frame_start,
			flags,
			xing.frame_count,
			xing.byte_count
		);
		Ok(Some(xing))
	}

	/// Header of the frame carrying the tag.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Absolute offset of the frame carrying the tag.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// `true` for a "Xing" tag, `false` for "Info".
	pub fn is_vbr(&self) -> bool {
		self.vbr
	}

	pub fn flags(&self) -> u32 {
		self.flags
	}

	pub fn has_frame_count(&self) -> bool {
		self.flags & FLAG_FRAMES != 0
	}

	pub fn has_byte_count(&self) -> bool {
		self.flags & FLAG_BYTES != 0
	}

	pub fn has_toc(&self) -> bool {
		self.flags & FLAG_TOC != 0
	}

	pub fn has_quality(&self) -> bool {
		self.flags & FLAG_QUALITY != 0
	}

	pub fn frame_count(&self) -> u32 {
		self.frame_count
	}

	pub fn byte_count(&self) -> u32 {
		self.byte_count
	}

	/// Absolute offset of the 100-byte seek table, 0 when absent.
	pub fn toc_offset(&self) -> usize {
		self.toc_offset
	}

	/// 0 (best) to 100 (worst).
	pub fn quality(&self) -> u32 {
		self.quality
	}

	pub fn is_modified(&self) -> bool {
		self.modified
	}

	pub fn set_frame_count(&mut self, frame_count: u32) {
		if self.frame_count != frame_count {
			self.frame_count = frame_count;
			self.modified = true;
		}
	}

	pub fn set_byte_count(&mut self, byte_count: u32) {
		if self.byte_count != byte_count {
			self.byte_count = byte_count;
			self.modified = true;
		}
	}
}
