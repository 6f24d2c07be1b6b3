//! Errors raised by the bridge itself.
//!
//! Host hooks return [`anyhow::Result`]; their errors pass through the bridge
//! untouched. The types here cover what the bridge detects on its own, so
//! callers can `downcast_ref` them out of an [`anyhow::Error`].

use thiserror::Error;

use crate::bridge::BridgeState;
use crate::config::SurfaceConfig;

/// A configuration that can never be satisfied, or that this device cannot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported GL ES major version {0}")]
    ApiVersion(u8),
    #[error("color channel size {0} exceeds 16 bits")]
    ChannelBits(u8),
    #[error("surface has no color channels")]
    NoColor,
    #[error("no pixel format on this device satisfies {0:?}")]
    Unavailable(SurfaceConfig),
}

/// A lifecycle event arrived in a state that cannot accept it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("surface has been released")]
    Released,
    #[error("frame requested before the surface was ready (state {0:?})")]
    SurfaceNotReady(BridgeState),
}
