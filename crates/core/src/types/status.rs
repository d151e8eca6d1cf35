//! Role and fabrication-funnel status enums.

use serde::{Deserialize, Serialize};

/// User role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Back-office access: customer lists and fabrication-status actions.
    Admin,
    /// Regular storefront customer.
    Customer,
}

impl UserRole {
    /// Whether this role grants access to the admin back-office.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Error returned when an integer is not a valid fabrication status.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid fabrication status: {0} (expected 0, 1, or 2)")]
pub struct FabricationStatusError(pub u8);

/// A customer's position in the fabrication sales funnel.
///
/// The backend stores this as a bare integer and the UI assumes monotonic
/// progression (new → visited → cart), but nothing in this layer enforces
/// the ordering: the value is mutated only by manual admin action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FabricationStatus {
    /// Freshly registered, no fabrication activity yet.
    #[default]
    New,
    /// Visited the fabrication service or checked pricing.
    Visited,
    /// Has fabrication work in the cart.
    InCart,
}

impl FabricationStatus {
    /// All statuses in funnel order.
    pub const ALL: [Self; 3] = [Self::New, Self::Visited, Self::InCart];

    /// Integer wire value (0, 1, or 2).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Visited => 1,
            Self::InCart => 2,
        }
    }

    /// Human-readable funnel stage label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Visited => "Visited",
            Self::InCart => "In Cart",
        }
    }

    /// The next stage in the funnel, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::Visited),
            Self::Visited => Some(Self::InCart),
            Self::InCart => None,
        }
    }
}

impl From<FabricationStatus> for u8 {
    fn from(status: FabricationStatus) -> Self {
        status.as_u8()
    }
}

impl TryFrom<u8> for FabricationStatus {
    type Error = FabricationStatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::Visited),
            2 => Ok(Self::InCart),
            other => Err(FabricationStatusError(other)),
        }
    }
}

impl std::fmt::Display for FabricationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl std::str::FromStr for FabricationStatus {
    type Err = FabricationStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.parse().map_err(|_| FabricationStatusError(u8::MAX))?;
        Self::try_from(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: UserRole = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, UserRole::Customer);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_status_integer_wire_format() {
        let json = serde_json::to_string(&FabricationStatus::Visited).unwrap();
        assert_eq!(json, "1");

        let status: FabricationStatus = serde_json::from_str("2").unwrap();
        assert_eq!(status, FabricationStatus::InCart);
    }

    #[test]
    fn test_status_rejects_out_of_range() {
        assert!(serde_json::from_str::<FabricationStatus>("3").is_err());
        assert!(FabricationStatus::try_from(7).is_err());
    }

    #[test]
    fn test_status_funnel_progression() {
        assert_eq!(
            FabricationStatus::New.next(),
            Some(FabricationStatus::Visited)
        );
        assert_eq!(
            FabricationStatus::Visited.next(),
            Some(FabricationStatus::InCart)
        );
        assert_eq!(FabricationStatus::InCart.next(), None);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "0".parse::<FabricationStatus>().unwrap(),
            FabricationStatus::New
        );
        assert!("9".parse::<FabricationStatus>().is_err());
        assert!("x".parse::<FabricationStatus>().is_err());
    }
}
