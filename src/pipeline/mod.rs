//! Streaming response processing.
//!
//! ```text
//! Raw Bytes → lines → classify_line → decode_frame → Reassembler → StreamingChunk
//!                          │                │              │
//!                     Blank/Ignored/   Fragment /     cumulative buffer,
//!                     Done/Data        RawFallback    finished chunk
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decode`] | SSE line classification and frame decoding |
//! | [`accumulate`] | Reassembly state machine with blocking and async adapters |

pub mod accumulate;
pub mod decode;


pub use accumulate::{chunk_stream, ChunkIter, ReassemblyState, Reassembler};
pub use decode::{classify_line, decode_frame, FrameDecode, SseLine};
