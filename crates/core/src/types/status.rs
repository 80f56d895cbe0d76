//! Status enums for catalog and account entities.

use serde::{Deserialize, Serialize};

/// Stock threshold below which a product is flagged as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Stock availability bucket used for badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "remaining")]
pub enum StockStatus {
    OutOfStock,
    /// Fewer than [`LOW_STOCK_THRESHOLD`] units left.
    LowStock(u32),
    InStock,
}

impl StockStatus {
    /// Classify a stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock < LOW_STOCK_THRESHOLD {
            Self::LowStock(stock)
        } else {
            Self::InStock
        }
    }

    /// Badge text shown next to a product.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::OutOfStock => "Sold out".to_string(),
            Self::LowStock(remaining) => format!("Last {remaining} units"),
            Self::InStock => "In stock".to_string(),
        }
    }
}

/// Account role carried by the signed-in user.
///
/// Used only to decide which controls the UI shows; nothing in the
/// storefront enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    RoleAdmin,
    #[default]
    RoleUser,
}

impl UserRole {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RoleAdmin => "Administrador",
            Self::RoleUser => "Usuario",
        }
    }

    /// Whether admin-only controls (slider management) should be shown.
    #[must_use]
    pub const fn shows_admin_controls(&self) -> bool {
        matches!(self, Self::RoleAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoleAdmin => write!(f, "ROLE_ADMIN"),
            Self::RoleUser => write!(f, "ROLE_USER"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_ADMIN" => Ok(Self::RoleAdmin),
            "ROLE_USER" => Ok(Self::RoleUser),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_buckets() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock(1));
        assert_eq!(StockStatus::from_stock(9), StockStatus::LowStock(9));
        assert_eq!(StockStatus::from_stock(10), StockStatus::InStock);
    }

    #[test]
    fn test_stock_status_labels() {
        assert_eq!(StockStatus::OutOfStock.label(), "Sold out");
        assert_eq!(StockStatus::LowStock(3).label(), "Last 3 units");
        assert_eq!(StockStatus::InStock.label(), "In stock");
    }

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::RoleAdmin, UserRole::RoleUser] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("ROLE_ROOT".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_role_labels() {
        assert_eq!(UserRole::RoleAdmin.label(), "Administrador");
        assert_eq!(UserRole::RoleUser.label(), "Usuario");
        assert!(UserRole::RoleAdmin.shows_admin_controls());
        assert!(!UserRole::RoleUser.shows_admin_controls());
    }
}
