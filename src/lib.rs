//! Frame-level access to MPEG audio (Layer I, II and III; MPEG 1, 2 and 2.5)
//! elementary streams held in memory.
//!
//! The crate decodes frame headers, finds where the real frame sequence of
//! a buffer starts (past tags or other junk), reads the Xing/Info header if
//! the first frame carries one, and builds a frame table that can be edited
//! by cutting or truncating frames.
//!
//! # Examples
//!
//! ```no_run
//! use mpeg_audio_frames::Stream;
//!
//! let data = std::fs::read("track.mp3").unwrap();
//! let mut stream = Stream::from_bytes(data).unwrap();
//! println!(
//!     "MPEG {} Layer {}, {} kbps{}, {:.2}s in {} frames",
//!     stream.version(),
//!     stream.layer(),
//!     stream.bitrate(),
//!     if stream.is_vbr() { " (VBR)" } else { "" },
//!     stream.length(),
//!     stream.frame_count()
//! );
//! for warning in stream.warnings() {
//!     println!("warning: {}", warning);
//! }
//!
//! // Drop the first second or so
//! stream.cut(0, 38).unwrap();
//! ```

extern crate failure;

mod constants;
mod context;
mod error;
pub mod header;
pub mod stream;
pub mod sync;
pub mod xing;

pub use crate::constants::{ChannelMode, Emphasis, Layer, Version, COMPARISON_MASK, HEADER_SIZE};
pub use crate::error::{ErrorKind, MpegError};
pub use crate::header::Header;
pub use crate::stream::{build_index, FrameInfo, Index, Stream, Warning};
pub use crate::sync::Synchronizer;
pub use crate::xing::XingHeader;
