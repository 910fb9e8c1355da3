//! Remote protocol layer: where the endpoint lives and what its payload looks like.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Base address, timeout, and per-space defaults |
//! | [`request`] | Parameter bag and the 11-slot positional payload |

pub mod config;
pub mod request;

pub use config::{AdapterConfig, ChatPreset};
pub use request::{ChatParams, PredictArgs, PredictPayload};
