//! Client interface: the entry points a host completion framework calls.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod blocking;
pub mod builder;
pub mod core;
pub mod types;

pub use blocking::{BlockingChatOutput, BlockingChunkIter, BlockingGradioClient};
pub use builder::GradioClientBuilder;
pub use core::{ChatOutput, GradioClient};
pub use types::{make_cancellable, CancelHandle};
