//! Unified route authorization policy.
//!
//! One table, one pure evaluation function. The request-time middleware
//! enforces it at the earliest interception point; the render-time
//! extractors in [`crate::middleware::auth`] re-check the same session state
//! inside handlers, so both enforcement layers agree on the rules by
//! construction.

use circuitfab_core::UserRole;

/// Path the guard sends unauthenticated navigations to.
pub const LOGIN_PATH: &str = "/login";

/// Path authenticated navigations to login/registration are sent to.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Query parameter carrying the originally requested path.
pub const REDIRECT_PARAM: &str = "redirect";

/// Paths that never require authentication.
pub const PUBLIC_ROUTES: &[&str] = &["/", LOGIN_PATH, "/register"];

/// Path prefixes that require a token.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/products", "/fabrication", "/assembly"];

/// Path prefix that additionally requires the admin role.
pub const ADMIN_PREFIX: &str = "/admin";

/// Outcome of evaluating the policy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Let the request through.
    Allow,
    /// Send to the login page with the original path as a redirect hint.
    RedirectToLogin,
    /// Send to the dashboard (already authenticated, or under-privileged).
    RedirectToDashboard,
}

/// Evaluate the policy.
///
/// Pure function of the path, token presence, and (for admin paths) the
/// cached role. Anything not matched by a rule is allowed: the protected
/// lists are explicit, everything else - cart, wishlist, health - is open to
/// anonymous traffic.
#[must_use]
pub fn evaluate(path: &str, authenticated: bool, role: Option<UserRole>) -> RouteDecision {
    if path.starts_with(ADMIN_PREFIX) {
        if !authenticated {
            return RouteDecision::RedirectToLogin;
        }
        if role.is_some_and(UserRole::is_admin) {
            return RouteDecision::Allow;
        }
        return RouteDecision::RedirectToDashboard;
    }

    if authenticated && (path == LOGIN_PATH || path == "/register") {
        return RouteDecision::RedirectToDashboard;
    }

    if !authenticated
        && PROTECTED_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
    {
        return RouteDecision::RedirectToLogin;
    }

    RouteDecision::Allow
}

/// Build the login redirect target carrying the original path.
#[must_use]
pub fn login_redirect_target(original_path: &str) -> String {
    format!(
        "{LOGIN_PATH}?{REDIRECT_PARAM}={}",
        urlencoding::encode(original_path)
    )
}

/// Validate a post-login redirect hint.
///
/// Only site-local paths are honored; anything else falls back to the
/// dashboard so the hint cannot be used as an open redirect.
#[must_use]
pub fn safe_redirect(hint: Option<&str>) -> String {
    match hint {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => DASHBOARD_PATH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_on_public_routes() {
        for path in PUBLIC_ROUTES {
            assert_eq!(evaluate(path, false, None), RouteDecision::Allow);
        }
        // Cart and wishlist are intentionally open to anonymous traffic.
        assert_eq!(evaluate("/cart", false, None), RouteDecision::Allow);
        assert_eq!(evaluate("/wishlist", false, None), RouteDecision::Allow);
    }

    #[test]
    fn test_anonymous_on_protected_prefixes_redirects_to_login() {
        for path in ["/dashboard", "/products/p-100", "/fabrication", "/assembly"] {
            assert_eq!(evaluate(path, false, None), RouteDecision::RedirectToLogin);
        }
    }

    #[test]
    fn test_authenticated_on_login_pages_redirects_to_dashboard() {
        assert_eq!(
            evaluate("/login", true, None),
            RouteDecision::RedirectToDashboard
        );
        assert_eq!(
            evaluate("/register", true, None),
            RouteDecision::RedirectToDashboard
        );
        // But anonymous visitors may see them.
        assert_eq!(evaluate("/login", false, None), RouteDecision::Allow);
    }

    #[test]
    fn test_admin_prefix_requires_token_and_role() {
        assert_eq!(
            evaluate("/admin/customers", false, None),
            RouteDecision::RedirectToLogin
        );
        assert_eq!(
            evaluate("/admin/customers", true, Some(UserRole::Customer)),
            RouteDecision::RedirectToDashboard
        );
        assert_eq!(
            evaluate("/admin/customers", true, None),
            RouteDecision::RedirectToDashboard
        );
        assert_eq!(
            evaluate("/admin/customers", true, Some(UserRole::Admin)),
            RouteDecision::Allow
        );
    }

    #[test]
    fn test_login_redirect_target_encodes_path() {
        assert_eq!(
            login_redirect_target("/dashboard"),
            "/login?redirect=%2Fdashboard"
        );
        assert_eq!(
            login_redirect_target("/products/p-100"),
            "/login?redirect=%2Fproducts%2Fp-100"
        );
    }

    #[test]
    fn test_safe_redirect_rejects_external_targets() {
        assert_eq!(safe_redirect(Some("/products")), "/products");
        assert_eq!(safe_redirect(Some("https://evil.example")), DASHBOARD_PATH);
        assert_eq!(safe_redirect(Some("//evil.example")), DASHBOARD_PATH);
        assert_eq!(safe_redirect(None), DASHBOARD_PATH);
        assert_eq!(safe_redirect(Some("")), DASHBOARD_PATH);
    }
}
