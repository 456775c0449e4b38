//! `create_bank_account` and `activate_account`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::accounts::AccountService;
use crate::error::AccountError;
use crate::model::AccountType;
use crate::tools::tool::{Tool, ToolDomain, ToolError, ToolOutput, require_str};

impl From<AccountError> for ToolError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound(n) => ToolError::NotFound(format!("account {n}")),
            AccountError::InvalidTransition { .. } => ToolError::Rejected(e.to_string()),
            other => ToolError::ExecutionFailed(other.to_string()),
        }
    }
}

/// Opens a pending account for a verified customer.
pub struct CreateAccountTool {
    accounts: Arc<AccountService>,
}

impl CreateAccountTool {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl Tool for CreateAccountTool {
    fn name(&self) -> &str {
        "create_bank_account"
    }

    fn description(&self) -> &str {
        "Create a new bank account for a verified customer. The account starts \
         in pending status with a zero balance."
    }

    fn domain(&self) -> ToolDomain {
        ToolDomain::Accounts
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "customer_id": {
                    "type": "string",
                    "description": "ID of the customer"
                },
                "account_type": {
                    "type": "string",
                    "enum": ["checking", "savings", "business"],
                    "description": "Type of account (default: checking)"
                }
            },
            "required": ["customer_id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let customer_id = require_str(&params, "customer_id")?;
        let account_type = match params.get("account_type").and_then(|v| v.as_str()) {
            Some(s) => s
                .parse::<AccountType>()
                .map_err(|e| ToolError::InvalidParameters(e.to_string()))?,
            None => AccountType::Checking,
        };

        let account = self.accounts.create_account(customer_id, account_type).await?;
        let result = serde_json::to_value(&account)
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        Ok(ToolOutput::success(result, start.elapsed()))
    }
}

/// Activates a pending account.
pub struct ActivateAccountTool {
    accounts: Arc<AccountService>,
}

impl ActivateAccountTool {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl Tool for ActivateAccountTool {
    fn name(&self) -> &str {
        "activate_account"
    }

    fn description(&self) -> &str {
        "Activate a pending bank account"
    }

    fn domain(&self) -> ToolDomain {
        ToolDomain::Accounts
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "account_number": {
                    "type": "string",
                    "description": "Account number to activate"
                }
            },
            "required": ["account_number"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let number = require_str(&params, "account_number")?;
        let account = self.accounts.activate_account(number).await?;
        let result = serde_json::to_value(&account)
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        Ok(ToolOutput::success(result, start.elapsed()))
    }
}
