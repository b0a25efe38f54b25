use crate::error::*;

/// Forward-only cursor over a byte buffer. Positions are absolute offsets
/// into the buffer so errors built here point at the failing byte.
pub struct Context<'d> {
	data: &'d [u8],
	position: usize,
}

impl<'d> Context<'d> {
	pub fn new(data: &'d [u8], position: usize) -> Self {
		Context { data, position }
	}

	pub fn read_exact(&mut self, num_bytes: usize) -> Option<&'d [u8]> {
		let end = self.position.checked_add(num_bytes)?;
		let bytes = self.data.get(self.position..end)?;
		self.position = end;
		Some(bytes)
	}

	pub fn read_u32(&mut self) -> Option<u32> {
		self.read_exact(4)
			.map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
	}

	pub fn skip(&mut self, num_bytes: usize) -> Option<()> {
		self.read_exact(num_bytes).map(|_| ())
	}

	pub fn position(&self) -> usize {
		self.position
	}

	pub fn error(&self, e: ErrorKind) -> MpegError {
		MpegError::new(e, self.position)
	}
}
