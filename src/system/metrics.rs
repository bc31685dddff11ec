//! Metrics collection for the todo service
//!
//! Each `Metrics` owns its own Prometheus registry so that several service
//! instances (tests, embedded use) never collide on registration.

use crate::core::error::{Error, Result};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::fmt;
use std::time::Duration;

/// Service operations tracked by the metrics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Create a todo
    Create,
    /// Read one todo by id
    Get,
    /// Read every todo
    List,
    /// Read todos matching a query
    Find,
    /// Update a todo by id
    Update,
    /// Delete a todo by id
    Delete,
    /// Delete every todo matching a query
    DeleteAll,
}

impl Operation {
    /// Label value used in exported metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Find => "find",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::DeleteAll => "delete_all",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation counters and latency histograms
pub struct Metrics {
    registry: Registry,
    /// Operations by name and outcome (ok, client_error, server_error)
    operations: IntCounterVec,
    /// Operation latency in seconds
    operation_duration: HistogramVec,
}

impl Metrics {
    /// Create new metrics instance with a private registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let operations = IntCounterVec::new(
            Opts::new("todo_operations_total", "Total number of todo operations"),
            &["operation", "outcome"],
        )?;
        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "todo_operation_duration_seconds",
                "Todo operation latency in seconds",
            ),
            &["operation"],
        )?;

        registry.register(Box::new(operations.clone()))?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self {
            registry,
            operations,
            operation_duration,
        })
    }

    /// Record one finished operation
    pub fn record<T>(&self, operation: Operation, result: &Result<T>, elapsed: Duration) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) if e.is_client_error() => "client_error",
            Err(_) => "server_error",
        };
        self.operations
            .with_label_values(&[operation.as_str(), outcome])
            .inc();
        self.operation_duration
            .with_label_values(&[operation.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Number of recorded operations with the given outcome
    pub fn count(&self, operation: Operation, outcome: &str) -> u64 {
        self.operations
            .with_label_values(&[operation.as_str(), outcome])
            .get()
    }

    /// Render every metric in the Prometheus text format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::internal(format!("metrics are not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_do_not_collide() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();
        first.record::<()>(Operation::Create, &Ok(()), Duration::from_millis(1));
        assert_eq!(first.count(Operation::Create, "ok"), 1);
        assert_eq!(second.count(Operation::Create, "ok"), 0);
    }

    #[test]
    fn test_outcomes_follow_error_class() {
        let metrics = Metrics::new().unwrap();
        metrics.record::<()>(Operation::Get, &Err(Error::not_found(1)), Duration::ZERO);
        metrics.record::<()>(Operation::Get, &Err(Error::internal("x")), Duration::ZERO);
        assert_eq!(metrics.count(Operation::Get, "client_error"), 1);
        assert_eq!(metrics.count(Operation::Get, "server_error"), 1);
    }

    #[test]
    fn test_encode_contains_recorded_series() {
        let metrics = Metrics::new().unwrap();
        metrics.record::<()>(Operation::DeleteAll, &Ok(()), Duration::from_millis(2));
        let text = metrics.encode().unwrap();
        assert!(text.contains("todo_operations_total"));
        assert!(text.contains("operation=\"delete_all\""));
        assert!(text.contains("todo_operation_duration_seconds"));
    }
}
