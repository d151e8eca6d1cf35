//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. Request ID (add unique ID to each request)
//! 3. Security headers (CSP, frame options, ...)
//! 4. Session layer (tower-sessions, in-memory store)
//! 5. Route policy (unified request-time authorization)

pub mod auth;
pub mod policy;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth};
pub use policy::route_policy_middleware;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
