//! OverlayBackend: where privileged windowing mode pins live.
//!
//! The local backend keeps pins in the user's `package-windowing-mode-overlay` namespace.
//! The remote backend asks the privileged window manager service over D-Bus. Both expose
//! the same contract, so the resolver and writers never branch on the backend kind.

mod local;
mod remote;
mod service;
mod r#trait;

pub use self::local::LocalOverlay;
pub use self::remote::{RemoteOverlay, WindowManagerProxyBlocking};
pub use self::service::{serve_overlay, OverlayService, OVERLAY_INTERFACE};
pub use self::r#trait::{create_overlay_backend, OverlayBackend};
