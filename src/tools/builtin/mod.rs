//! Built-in tools for scanning, validation, and account management.

pub mod accounts;
pub mod scanning;
pub mod validation;

use std::sync::Arc;

use crate::pipeline::Coordinator;
use crate::tools::ToolRegistry;

/// Register every pipeline tool backed by the coordinator's agents.
pub fn register_pipeline_tools(registry: &ToolRegistry, coordinator: &Coordinator) {
    registry.register_sync(Arc::new(scanning::ProcessDocumentTool::new(Arc::clone(
        coordinator.scanner(),
    ))));
    registry.register_sync(Arc::new(validation::ValidateDocumentTool::new(Arc::clone(
        coordinator.validator(),
    ))));
    registry.register_sync(Arc::new(validation::ValidateCustomerTool::new(Arc::clone(
        coordinator.validator(),
    ))));
    registry.register_sync(Arc::new(accounts::CreateAccountTool::new(Arc::clone(
        coordinator.accounts(),
    ))));
    registry.register_sync(Arc::new(accounts::ActivateAccountTool::new(Arc::clone(
        coordinator.accounts(),
    ))));
}
