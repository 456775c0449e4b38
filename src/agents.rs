//! Agent roster — the named roles of the onboarding workflow and the tools
//! each one owns.

use serde::Serialize;

use crate::tools::{ToolDomain, ToolRegistry};

/// Static description of one agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentProfile {
    /// Key used in status payloads.
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Domain of the tools this agent owns. The coordinator owns none.
    pub domain: Option<ToolDomain>,
}

pub const COORDINATOR: AgentProfile = AgentProfile {
    key: "coordinator",
    name: "Bank Onboarding Coordinator",
    description: "Coordinates the new customer onboarding workflow",
    domain: None,
};

pub const DOCUMENT_SCANNER: AgentProfile = AgentProfile {
    key: "document_scanner",
    name: "Document Scanner",
    description: "Scans and extracts data from identity and KYC documents",
    domain: Some(ToolDomain::Scanning),
};

pub const VALIDATOR: AgentProfile = AgentProfile {
    key: "validator",
    name: "Data Validator",
    description: "Validates extracted documents and compiled customer data",
    domain: Some(ToolDomain::Validation),
};

pub const ACCOUNT_CREATOR: AgentProfile = AgentProfile {
    key: "account_creator",
    name: "Account Creator",
    description: "Creates and activates bank accounts for verified customers",
    domain: Some(ToolDomain::Accounts),
};

/// Every agent, coordinator first.
pub const ROSTER: [AgentProfile; 4] = [COORDINATOR, DOCUMENT_SCANNER, VALIDATOR, ACCOUNT_CREATOR];

/// Runtime view of an agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tools: Vec<String>,
}

/// Describe every agent with the tools currently registered for it.
pub async fn describe_agents(tools: &ToolRegistry) -> Vec<AgentInfo> {
    let mut out = Vec::with_capacity(ROSTER.len());
    for profile in ROSTER {
        let tools = match profile.domain {
            Some(domain) => tools.names_for_domain(domain).await,
            None => Vec::new(),
        };
        out.push(AgentInfo {
            key: profile.key,
            name: profile.name,
            description: profile.description,
            tools,
        });
    }
    out
}

/// Status map keyed by agent key. Agents live in-process, so each one is
/// active whenever the service is answering.
pub fn agent_statuses() -> serde_json::Map<String, serde_json::Value> {
    ROSTER
        .iter()
        .map(|p| (p.key.to_string(), serde_json::Value::from("active")))
        .collect()
}
