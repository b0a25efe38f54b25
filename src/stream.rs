//! Frame indexing and stream editing.

use std::fmt;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::constants::{ChannelMode, Emphasis, Layer, Version};
use crate::error::*;
use crate::header::{self, Header};
use crate::sync::{self, Synchronizer};
use crate::xing::XingHeader;

/// One indexed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
	/// Absolute offset of the frame header in the buffer.
	pub offset: usize,
	pub size: usize,
	/// Time in seconds at which the frame starts.
	pub time: f64,
	/// Offset of the payload relative to `offset` (header + side info).
	pub data_offset: usize,
}

/// Non-fatal anomalies found while indexing.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
	/// The frame at `offset` needs `size` bytes but only `available` remain.
	UnexpectedEnd { offset: usize, size: usize, available: usize },
	/// No size could be inferred for the free bitrate frame at `offset`.
	UnsizedFreeFrame { offset: usize },
	/// Xing frame header disagrees with the stream's version, layer,
	/// sampling rate, channel mode or emphasis.
	XingStreamMismatch,
	XingVbrMismatch { tagged: bool, measured: bool },
	XingFrameCountMismatch { tagged: u32, indexed: usize },
	XingByteCountMismatch { tagged: u32, indexed: usize },
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Warning::UnexpectedEnd { offset, size, available } => write!(
				f,
				"Unexpected end of stream: frame at {} needs {} bytes, {} available",
				offset, size, available
			),
			Warning::UnsizedFreeFrame { offset } => {
				write!(f, "Could not size free bitrate frame at {}", offset)
			}
			Warning::XingStreamMismatch => write!(f, "Xing header disagrees with stream format"),
			Warning::XingVbrMismatch { tagged, measured } => write!(
				f,
				"Xing header says VBR={}, stream is VBR={}",
				tagged, measured
			),
			Warning::XingFrameCountMismatch { tagged, indexed } => write!(
				f,
				"Xing header counts {} frames, stream has {}",
				tagged, indexed
			),
			Warning::XingByteCountMismatch { tagged, indexed } => write!(
				f,
				"Xing header counts {} bytes, stream has {}",
				tagged, indexed
			),
		}
	}
}

/// Frame table and aggregate statistics of one walk over a buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Index {
	frames: Vec<FrameInfo>,
	reference: Header,
	bitrate: u32,
	length: f64,
	vbr: bool,
	warnings: Vec<Warning>,
}

impl Index {
	fn empty(reference: Header) -> Self {
		Index {
			frames: Vec::new(),
			reference,
			bitrate: 0,
			length: 0.0,
			vbr: false,
			warnings: Vec::new(),
		}
	}

	pub fn frames(&self) -> &[FrameInfo] {
		&self.frames
	}

	/// Header the stream's format is reported from: the first frame with a
	/// fixed bitrate.
	pub fn reference(&self) -> &Header {
		&self.reference
	}

	/// Average bitrate in kbps over frames with a fixed bitrate.
	pub fn bitrate(&self) -> u32 {
		self.bitrate
	}

	/// Length in seconds.
	pub fn length(&self) -> f64 {
		self.length
	}

	pub fn is_vbr(&self) -> bool {
		self.vbr
	}

	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}

	/// Offset just past the last indexed frame.
	pub fn end_offset(&self) -> Option<usize> {
		self.frames.last().map(|frame| frame.offset + frame.size)
	}

	fn warn(&mut self, warning: Warning) {
		warn!("{}", warning);
		self.warnings.push(warning);
	}

	fn cross_check(&mut self, xing: &XingHeader, start: usize) {
		if !xing.header().same_stream(&self.reference) {
			self.warn(Warning::XingStreamMismatch);
		}
		if xing.is_vbr() != self.vbr {
			self.warn(Warning::XingVbrMismatch {
				tagged: xing.is_vbr(),
				measured: self.vbr,
			});
		}
		if xing.has_frame_count() && xing.frame_count() as usize != self.frames.len() {
			self.warn(Warning::XingFrameCountMismatch {
				tagged: xing.frame_count(),
				indexed: self.frames.len(),
			});
		}
		let indexed_bytes = self.end_offset().unwrap_or(start).saturating_sub(xing.offset());
		if xing.has_byte_count() && xing.byte_count() as usize != indexed_bytes {
			self.warn(Warning::XingByteCountMismatch {
				tagged: xing.byte_count(),
				indexed: indexed_bytes,
			});
		}
	}
}

/// Walks `data` frame by frame from `start`.
///
/// The walk ends at the first invalid header or at the first header that
/// does not belong to the same stream; a frame running past the end of the
/// buffer or a free bitrate frame that cannot be sized also ends it, with a
/// warning. When `xing` is given, its counts and format are checked against
/// the result and disagreements are recorded as warnings.
pub fn build_index(
	data: &[u8],
	start: usize,
	xing: Option<&XingHeader>,
) -> Result<Index, MpegError> {
	walk(data, start, xing, &[])
}

/// `known_sizes[n]`, when present, is used as the size of the n-th frame if
/// it has a free bitrate, instead of probing for it. Edits use this to keep
/// the sizes of surviving frames whose following header was removed.
fn walk(
	data: &[u8],
	start: usize,
	xing: Option<&XingHeader>,
	known_sizes: &[usize],
) -> Result<Index, MpegError> {
	let first = Header::peek(data, start).ok_or_else(|| {
		let header = header::read_raw(data, start).unwrap_or(0);
		MpegError::new(ErrorKind::InvalidHeader { header }, start)
	})?;

	let mut index = Index::empty(first);
	let mut offset = start;
	let mut time = 0f64;
	let mut bitrate_sum = 0u64;
	let mut sized_frames = 0u64;
	let mut reference_bitrate = None;

	while let Some(header) = Header::peek(data, offset) {
		if !header.same_stream(&index.reference) {
			debug!("Format change at {}, stream ends", offset);
			break;
		}

		let size = if header.is_free_bitrate() {
			let known = known_sizes
				.get(index.frames.len())
				.filter(|&&size| offset + size <= data.len());
			let size = match known {
				Some(&size) => Ok(size),
				None => sync::probe_free_frame_size(data, offset),
			};
			match size {
				Ok(size) => size,
				Err(e) if index.frames.is_empty() => return Err(e),
				Err(_) => {
					index.warn(Warning::UnsizedFreeFrame { offset });
					break;
				}
			}
		} else if sync::is_incomplete_frame(&data[offset..]) {
			let size = header
				.frame_size()
				.map_err(|kind| MpegError::new(kind, offset))? as usize;
			if index.frames.is_empty() {
				return Err(MpegError::new(ErrorKind::UnexpectedEof, offset));
			}
			index.warn(Warning::UnexpectedEnd {
				offset,
				size,
				available: data.len() - offset,
			});
			break;
		} else {
			header.frame_size().map_err(|kind| MpegError::new(kind, offset))? as usize
		};

		trace!("Frame {} at {}: {} bytes", index.frames.len(), offset, size);
		index.frames.push(FrameInfo {
			offset,
			size,
			time,
			data_offset: header.data_offset() as usize,
		});
		time += f64::from(header.frame_duration());

		if let Ok(bitrate) = header.bitrate() {
			if index.reference.is_free_bitrate() {
				index.reference = header;
			}
			match reference_bitrate {
				None => reference_bitrate = Some(bitrate),
				Some(reference) if reference != bitrate => index.vbr = true,
				_ => (),
			}
			bitrate_sum += u64::from(bitrate / 1000);
			sized_frames += 1;
		}

		offset += size;
	}

	if sized_frames == 0 {
		return Err(MpegError::new(ErrorKind::NoDeterminableBitrate, start));
	}
	index.bitrate = (bitrate_sum / sized_frames) as u32;
	index.length = time;

	if let Some(xing) = xing {
		index.cross_check(xing, start);
	}

	debug!(
		"Indexed {} frames from {}: {} kbps{}, {:.3}s, {} warnings",
		index.frames.len(),
		start,
		index.bitrate,
		if index.vbr { " (VBR)" } else { "" },
		index.length,
		index.warnings.len()
	);
	Ok(index)
}

/// An indexed MPEG audio stream owning its buffer.
#[derive(Clone, Debug)]
pub struct Stream {
	data: Vec<u8>,
	offset: usize,
	first_frame: usize,
	xing: Option<XingHeader>,
	index: Index,
}

impl Stream {
	/// Synchronizes on the first frame sequence in `data` and indexes it.
	pub fn from_bytes(data: Vec<u8>) -> Result<Stream, MpegError> {
		Self::from_bytes_with(data, &Synchronizer::default())
	}

	pub fn from_bytes_with(
		data: Vec<u8>,
		synchronizer: &Synchronizer,
	) -> Result<Stream, MpegError> {
		let offset = synchronizer.find_first_frame(&data)?;
		Self::new(data, offset)
	}

	/// Indexes the stream whose first frame starts at `offset`. A Xing/Info
	/// frame there is kept as metadata and left out of the frame table.
	pub fn new(data: Vec<u8>, offset: usize) -> Result<Stream, MpegError> {
		let xing = XingHeader::parse(&data, offset)?;
		let first_frame = match &xing {
			Some(xing) => offset + sync::frame_size_at(&data, offset, xing.header())?,
			None => offset,
		};
		if first_frame >= data.len() {
			return Err(MpegError::new(ErrorKind::UnexpectedEof, data.len()));
		}
		let index = build_index(&data, first_frame, xing.as_ref())?;
		Ok(Stream {
			data,
			offset,
			first_frame,
			xing,
			index,
		})
	}

	pub fn data(&self) -> &[u8] {
		&self.data
	}

	pub fn into_inner(self) -> Vec<u8> {
		self.data
	}

	pub fn index(&self) -> &Index {
		&self.index
	}

	/// Offset of the first frame of the stream, Xing frame included.
	pub fn stream_offset(&self) -> usize {
		self.offset
	}

	/// Offset of the first audio frame.
	pub fn first_frame_offset(&self) -> usize {
		self.first_frame
	}

	pub fn xing(&self) -> Option<&XingHeader> {
		self.xing.as_ref()
	}

	pub fn xing_mut(&mut self) -> Option<&mut XingHeader> {
		self.xing.as_mut()
	}

	pub fn frames(&self) -> &[FrameInfo] {
		self.index.frames()
	}

	pub fn frame(&self, n: usize) -> Option<&FrameInfo> {
		self.index.frames.get(n)
	}

	pub fn frame_count(&self) -> usize {
		self.index.frames.len()
	}

	/// Index of the frame playing at `seconds`, `None` past the end.
	pub fn frame_at(&self, seconds: f64) -> Option<usize> {
		if seconds < 0.0 || seconds >= self.index.length {
			return None;
		}
		let after = self.index.frames.partition_point(|frame| frame.time <= seconds);
		after.checked_sub(1)
	}

	pub fn version(&self) -> Version {
		self.index.reference.version()
	}

	pub fn layer(&self) -> Layer {
		self.index.reference.layer()
	}

	pub fn sampling_rate(&self) -> u32 {
		self.index.reference.sampling_rate()
	}

	pub fn channel_mode(&self) -> ChannelMode {
		self.index.reference.channel_mode()
	}

	pub fn emphasis(&self) -> Emphasis {
		self.index.reference.emphasis()
	}

	/// Average bitrate in kbps.
	pub fn bitrate(&self) -> u32 {
		self.index.bitrate
	}

	/// Length in seconds.
	pub fn length(&self) -> f64 {
		self.index.length
	}

	pub fn duration(&self) -> Duration {
		Duration::from_secs_f64(self.index.length)
	}

	pub fn is_vbr(&self) -> bool {
		self.index.vbr
	}

	pub fn has_warnings(&self) -> bool {
		!self.index.warnings.is_empty()
	}

	pub fn warnings(&self) -> &[Warning] {
		self.index.warnings()
	}

	/// Removes the last `count` frames, or all of them if there are fewer.
	pub fn truncate(&mut self, count: usize) -> Result<(), MpegError> {
		self.check_mutable()?;
		let frames = self.frame_count();
		let keep = frames - count.min(frames);
		let end = match self.index.frames.get(keep) {
			Some(frame) => frame.offset,
			None => self.data.len(),
		};
		debug!("Truncating {} of {} frames at {}", frames - keep, frames, end);
		let data = self.data[..end].to_vec();
		let sizes = self.index.frames[..keep].iter().map(|frame| frame.size).collect();
		self.reindex(data, sizes)
	}

	/// Removes frames `[start, start + count)`; `count` is clamped to the
	/// frames available from `start`.
	pub fn cut(&mut self, start: usize, count: usize) -> Result<(), MpegError> {
		self.check_mutable()?;
		let frames = self.frame_count();
		if start >= frames {
			return Err(MpegError::new(
				ErrorKind::FrameIndexOutOfRange { index: start, count: frames },
				self.data.len(),
			));
		}
		let count = count.min(frames - start);
		let begin = self.index.frames[start].offset;
		let end = match count {
			0 => begin,
			_ => {
				let last = &self.index.frames[start + count - 1];
				last.offset + last.size
			}
		};
		debug!("Cutting frames {}..{} (bytes {}..{})", start, start + count, begin, end);

		let mut data = Vec::with_capacity(self.data.len() - (end - begin));
		data.extend_from_slice(&self.data[..begin]);
		data.extend_from_slice(&self.data[end..]);
		let frames = &self.index.frames;
		let sizes = frames[..start]
			.iter()
			.chain(&frames[start + count..])
			.map(|frame| frame.size)
			.collect();
		self.reindex(data, sizes)
	}

	fn check_mutable(&self) -> Result<(), MpegError> {
		match &self.xing {
			Some(xing) => Err(MpegError::new(ErrorKind::UnsupportedMutation, xing.offset())),
			None => Ok(()),
		}
	}

	/// Re-indexes an edited buffer. `sizes` are the sizes of the frames
	/// expected to survive the edit, in order.
	fn reindex(&mut self, data: Vec<u8>, sizes: Vec<usize>) -> Result<(), MpegError> {
		let index = if sizes.is_empty() {
			Index::empty(self.index.reference)
		} else {
			walk(&data, self.first_frame, None, &sizes)?
		};
		self.data = data;
		self.index = index;
		Ok(())
	}
}
