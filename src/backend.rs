// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Backend
//!
//! Hand-off point between a compiled [`Plan`] and whatever applies it.
//!
//! ```text
//! Compiler (pure)              Backend
//! ────────────────            ──────────
//!
//! ResourceGraph               Operations
//!      │                          │
//!      ▼                          ▼
//! ┌─────────────┐           ┌──────────────┐
//! │   emit()    │ Operation*│  apply()     │
//! │ (pure func) │ ───────>  │  (async I/O) │
//! └─────────────┘           └──────────────┘
//! ```
//!
//! The compiler never talks to a cloud API. A backend receives operations in
//! plan order and is free to batch them; the bundled implementations only
//! log, collect or discard.
//!
//! # Example
//!
//! ```rust,ignore
//! let plan = builder.emit()?;
//! let mut backend = LoggingBackend::new();
//! let applied = submit(&plan, &mut backend).await?;
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::plan::{OpType, Operation, Plan};

/// Consumer of plan operations
#[async_trait]
pub trait ProvisioningBackend: Send + Sync {
    /// Apply a batch of operations, in order
    ///
    /// If any operation fails the whole batch fails.
    async fn apply(&mut self, operations: Vec<Operation>) -> Result<(), BackendError>;

    /// Apply a single operation
    async fn apply_one(&mut self, operation: Operation) -> Result<(), BackendError> {
        self.apply(vec![operation]).await
    }
}

/// Errors a backend can report
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Backend refused an operation
    #[error("Rejected operation on {resource_id}: {reason}")]
    Rejected { resource_id: String, reason: String },

    /// Operation kind is not supported by this backend
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Applying failed
    #[error("Apply failed: {0}")]
    ApplyFailed(String),
}

/// Send every creation operation of a plan to a backend
///
/// Returns the number of operations applied.
pub async fn submit<B>(plan: &Plan, backend: &mut B) -> Result<usize, BackendError>
where
    B: ProvisioningBackend + ?Sized,
{
    let operations: Vec<Operation> = plan.operations().collect();
    let count = operations.len();
    backend.apply(operations).await?;
    info!("Submitted {} operations", count);
    Ok(count)
}

/// Logs each operation and remembers it
#[derive(Debug, Clone, Default)]
pub struct LoggingBackend {
    pub logged: Vec<Operation>,
}

impl LoggingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.logged
    }

    pub fn clear(&mut self) {
        self.logged.clear();
    }
}

#[async_trait]
impl ProvisioningBackend for LoggingBackend {
    async fn apply(&mut self, operations: Vec<Operation>) -> Result<(), BackendError> {
        for op in operations {
            info!(
                op = ?op.op_type,
                backend_type = %op.backend_type,
                resource_id = %op.resource_id,
                logical_id = %op.logical_id,
                "Plan operation"
            );
            self.logged.push(op);
        }
        Ok(())
    }
}

/// Discards every operation
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvisioningBackend for NullBackend {
    async fn apply(&mut self, _operations: Vec<Operation>) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Collects operations for later application
///
/// Rejects updates unless built with [`CollectingBackend::accepting_updates`],
/// standing in for backends that can only create and delete.
#[derive(Debug, Clone)]
pub struct CollectingBackend {
    pub collected: Vec<Operation>,
    accept_updates: bool,
}

impl CollectingBackend {
    pub fn new() -> Self {
        Self {
            collected: Vec::new(),
            accept_updates: false,
        }
    }

    pub fn accepting_updates() -> Self {
        Self {
            collected: Vec::new(),
            accept_updates: true,
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.collected
    }

    /// Take all collected operations, leaving the collector empty
    pub fn take_operations(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.collected)
    }
}

impl Default for CollectingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvisioningBackend for CollectingBackend {
    async fn apply(&mut self, mut operations: Vec<Operation>) -> Result<(), BackendError> {
        if !self.accept_updates {
            if let Some(op) = operations.iter().find(|op| op.op_type == OpType::Update) {
                return Err(BackendError::Unsupported(format!(
                    "update of {}",
                    op.resource_id
                )));
            }
        }
        self.collected.append(&mut operations);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TopologyBuilder;
    use crate::config::{CompilerSettings, NetworkConfig};
    use crate::domain::ResourceType;

    fn plan() -> Plan {
        let mut builder = TopologyBuilder::new(CompilerSettings::default());
        builder
            .define_network(&NetworkConfig::new("core", "10.42.11.0/24"))
            .unwrap();
        builder.emit().unwrap()
    }

    #[tokio::test]
    async fn test_logging_backend_keeps_plan_order() {
        let plan = plan();
        let mut backend = LoggingBackend::new();

        let applied = submit(&plan, &mut backend).await.unwrap();

        assert_eq!(applied, plan.len());
        assert_eq!(backend.operations(), plan.operations().collect::<Vec<_>>().as_slice());
        assert_eq!(backend.operations()[0].resource_type, ResourceType::Network);
    }

    #[tokio::test]
    async fn test_null_backend() {
        let plan = plan();
        assert_eq!(submit(&plan, &mut NullBackend::new()).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_collecting_backend_take() {
        let plan = plan();
        let mut backend = CollectingBackend::new();

        backend.apply(plan.teardown().collect()).await.unwrap();
        assert_eq!(backend.operations().len(), 25);

        let taken = backend.take_operations();
        assert_eq!(taken.last().unwrap().resource_type, ResourceType::Network);
        assert!(backend.operations().is_empty());
    }

    #[tokio::test]
    async fn test_collecting_backend_rejects_updates() {
        let plan = plan();
        let update = plan.operations().next().unwrap().with_op_type(OpType::Update);

        let mut strict = CollectingBackend::new();
        assert!(matches!(
            strict.apply_one(update.clone()).await,
            Err(BackendError::Unsupported(_))
        ));
        assert!(strict.operations().is_empty());

        let mut lenient = CollectingBackend::accepting_updates();
        lenient.apply_one(update).await.unwrap();
        assert_eq!(lenient.operations().len(), 1);
    }

    #[test]
    fn test_submit_from_sync_context() {
        let plan = plan();
        let mut backend: Box<dyn ProvisioningBackend> = Box::new(CollectingBackend::new());
        let applied = tokio_test::block_on(submit(&plan, backend.as_mut())).unwrap();
        assert_eq!(applied, plan.len());
    }
}
