//! Muster HTTP module: the authenticated request pipeline against the
//! fleet management API.
//!
//! The client attaches the stored access token to outgoing requests,
//! intercepts 401 responses, transparently refreshes the access token
//! once per request and replays the original request, falling back to
//! logout when the refresh itself fails.

pub mod client;
pub mod session;
pub mod types;

pub use client::error::ClientError;
pub use client::{ApiClient, ApiClientBuilder};
pub use session::{Session, SessionState};
