//! Per-application windowing mode resolution for desktop ("PC mode") shells.
//!
//! The crate decides which windowing mode an application starts in and persists user
//! choices, privileged overlay pins and last-known window bounds per user.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod services;
mod utils;

pub use config::Config;
pub use error::{Result, WinModeError};
pub use logging::init_tracing;
pub use model::{UserId, WindowBounds, WindowingMode};
pub use services::readiness::{AlwaysReady, UserUnlockTracker};
pub use services::{
    PolicyConstants, SessionReadiness, UserStorage, WindowBoundsStore, WindowModeResolver,
    WindowModeWriter, WindowingServices,
};
pub use utils::PropertyFile;
