//! Session-stored state.
//!
//! The per-client session is the storefront's "local storage": one key per
//! persisted value. The key names are an interop contract - existing
//! sessions keep working across deployments only as long as they are stable.

/// The cached current-user record.
///
/// A read cache of the backend's authoritative record, refreshed on login
/// and on explicit current-user fetches. Stale copies may exist until the
/// next fetch.
pub type CurrentUser = crate::backend::types::BackendUser;

/// Session keys for persisted client state.
pub mod session_keys {
    /// Key for the bearer token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the cached current-user JSON.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session-start timestamp (epoch milliseconds).
    pub const SESSION_START: &str = "session_start";

    /// Key for the serialized cart array.
    pub const CART: &str = "cart";

    /// Key for the serialized wishlist array.
    pub const WISHLIST: &str = "wishlist";
}
