//! Account Model (customers, shopkeepers, admins)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

/// Account role, encoded into the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Role {
    Customer,
    Shopkeeper,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Shopkeeper => "shopkeeper",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "shopkeeper" => Ok(Self::Shopkeeper),
            "admin" => Ok(Self::Admin),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

/// Account moderation status
///
/// Shopkeepers start `pending` until an admin approves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AccountStatus {
    Active,
    Pending,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "blocked" => Ok(Self::Blocked),
            other => Err(ParseEnumError::new("account status", other)),
        }
    }
}

/// Account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Account {
    pub id: String,
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Shop display name (shopkeepers only)
    pub shop_name: Option<String>,
    pub address: Option<String>,
    pub status: AccountStatus,
    pub created_at: i64,
}

/// Registration payload (customers and shopkeepers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password: String,
    pub shop_name: Option<String>,
    pub address: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user: Account,
}

/// Registration result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub role: Role,
    pub status: AccountStatus,
}

/// Admin moderation payload; status is parsed server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatusUpdate {
    pub status: String,
}
