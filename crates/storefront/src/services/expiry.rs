//! Session-expiry arithmetic.
//!
//! The session-start timestamp is recorded client-side at login and compared
//! against a fixed 24-hour ceiling, independent of whatever expiry the
//! backend enforces on the token itself. Pure functions only: callers supply
//! `now` so the logic is fully testable.

/// Maximum session age before forced logout (24 hours).
pub const MAX_SESSION_AGE_MS: i64 = 24 * 60 * 60 * 1000;

/// Width of the pre-expiry warning window (30 minutes).
pub const WARNING_WINDOW_MS: i64 = 30 * 60 * 1000;

/// Health of an authenticated session relative to the 24-hour ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionHealth {
    /// More than the warning window remains.
    Active,
    /// Inside the warning window; carries whole minutes remaining.
    ExpiringSoon {
        /// Whole minutes until forced logout.
        minutes_left: i64,
    },
    /// Past the ceiling; the session must be torn down.
    Expired,
}

/// Evaluate session health from the recorded start and the current instant,
/// both in epoch milliseconds.
#[must_use]
pub fn session_health(session_start_ms: i64, now_ms: i64) -> SessionHealth {
    let remaining = MAX_SESSION_AGE_MS - (now_ms - session_start_ms);

    if remaining <= 0 {
        SessionHealth::Expired
    } else if remaining <= WARNING_WINDOW_MS {
        SessionHealth::ExpiringSoon {
            minutes_left: remaining / 60_000,
        }
    } else {
        SessionHealth::Active
    }
}

/// Whether the session age exceeds the 24-hour ceiling.
#[must_use]
pub fn is_session_expired(session_start_ms: i64, now_ms: i64) -> bool {
    now_ms - session_start_ms > MAX_SESSION_AGE_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 60 * 60 * 1000;
    const MINUTE_MS: i64 = 60 * 1000;

    #[test]
    fn test_fresh_session_is_active() {
        let start = 1_700_000_000_000;
        assert_eq!(session_health(start, start), SessionHealth::Active);
        assert!(!is_session_expired(start, start));
    }

    #[test]
    fn test_session_older_than_ceiling_is_expired() {
        let start = 1_700_000_000_000;
        let now = start + 24 * HOUR_MS + MINUTE_MS;
        assert_eq!(session_health(start, now), SessionHealth::Expired);
        assert!(is_session_expired(start, now));
    }

    #[test]
    fn test_exactly_at_ceiling() {
        let start = 1_700_000_000_000;
        let now = start + 24 * HOUR_MS;
        // Age equal to the ceiling: remaining is zero, so the monitor tears
        // the session down even though strict "older than" is still false.
        assert_eq!(session_health(start, now), SessionHealth::Expired);
        assert!(!is_session_expired(start, now));
    }

    #[test]
    fn test_warning_window() {
        let start = 1_700_000_000_000;

        let now = start + 23 * HOUR_MS + 45 * MINUTE_MS;
        assert_eq!(
            session_health(start, now),
            SessionHealth::ExpiringSoon { minutes_left: 15 }
        );

        // One millisecond outside the window is still active.
        let now = start + 23 * HOUR_MS + 30 * MINUTE_MS - 1;
        assert_eq!(session_health(start, now), SessionHealth::Active);

        // Exactly at the window boundary warns.
        let now = start + 23 * HOUR_MS + 30 * MINUTE_MS;
        assert_eq!(
            session_health(start, now),
            SessionHealth::ExpiringSoon { minutes_left: 30 }
        );
    }

    #[test]
    fn test_minutes_left_floors() {
        let start = 1_700_000_000_000;
        let now = start + 24 * HOUR_MS - (14 * MINUTE_MS + 59_000);
        assert_eq!(
            session_health(start, now),
            SessionHealth::ExpiringSoon { minutes_left: 14 }
        );
    }
}
