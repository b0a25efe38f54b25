use core::fmt;
use failure::Fail;

#[derive(Debug)]
pub struct MpegError {
	pub kind: ErrorKind,
	pub offset: usize,
}

impl MpegError {
	pub fn new(kind: ErrorKind, offset: usize) -> Self {
		MpegError { kind, offset }
	}
}

impl fmt::Display for MpegError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} at offset {} (0x{1:X})", self.kind, self.offset)
	}
}

impl Fail for MpegError {
	// Delegate `cause` to ErrorKind
	fn cause(&self) -> Option<&dyn Fail> {
		self.kind.cause()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum ErrorKind {
	#[fail(display = "Invalid MPEG audio header 0x{:08X}", header)]
	InvalidHeader { header: u32 },
	#[fail(display = "No MPEG audio frame sequence found")]
	SyncNotFound,
	#[fail(display = "Could not infer the size of a free bitrate frame")]
	FreeBitrateProbeFailed,
	#[fail(display = "Xing header extends past the end of the buffer")]
	TruncatedMetadata,
	#[fail(display = "Every frame of the stream uses the free bitrate")]
	NoDeterminableBitrate,
	#[fail(display = "Frame index {} out of range (stream has {} frames)", index, count)]
	FrameIndexOutOfRange { index: usize, count: usize },
	#[fail(display = "Cannot edit a stream carrying a Xing header")]
	UnsupportedMutation,
	#[fail(display = "Cannot compute {} of a free bitrate frame", operation)]
	Unsupported { operation: &'static str },
	#[fail(display = "Unexpected end of stream")]
	UnexpectedEof,
}
