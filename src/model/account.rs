//! Bank account model and status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Product type of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    Business,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "business" => Ok(Self::Business),
            other => Err(ValidationError::UnknownVariant {
                kind: "account type",
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Pending,
    Suspended,
    Closed,
}

impl AccountStatus {
    /// Check if this status allows transitioning to another status.
    pub fn can_transition_to(&self, target: AccountStatus) -> bool {
        use AccountStatus::*;

        matches!(
            (self, target),
            (Pending, Active) | (Pending, Closed) |
            (Active, Suspended) | (Active, Closed) |
            (Suspended, Active) | (Suspended, Closed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Suspended => "suspended",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "suspended" => Ok(Self::Suspended),
            "closed" => Ok(Self::Closed),
            other => Err(ValidationError::UnknownVariant {
                kind: "account status",
                value: other.to_string(),
            }),
        }
    }
}

/// A bank account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub account_number: String,
    pub account_type: AccountType,
    pub customer_id: String,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl BankAccount {
    /// A freshly opened account: pending, zero balance.
    pub fn open(
        account_number: impl Into<String>,
        account_type: AccountType,
        customer_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_number: account_number.into(),
            account_type,
            customer_id: customer_id.into(),
            balance: Decimal::ZERO,
            status: AccountStatus::Pending,
            created_at: now,
            last_modified: now,
        }
    }
}
