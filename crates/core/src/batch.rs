//! Bounded operation batch
//!
//! A batch is either open (fewer operations than its capacity) or full.
//! Adding to a full batch fails; nothing is truncated or evicted. `clear`
//! reopens it. Insertion order is kept, but results must be correlated by
//! `ref`, never by position.

use std::fmt;
use std::sync::Arc;

use corezoid_domain::constants::DEFAULT_MAX_BATCH_SIZE;
use corezoid_domain::{ConvId, CorezoidError, Operation, Result, TaskData};
use tracing::debug;

use crate::codec;
use crate::reference::{ReferenceGenerator, TimestampReferenceGenerator};

/// Ordered, size-bounded collection of pending operations.
///
/// Designed for a single owner; wrap it in a lock to share it.
pub struct OperationBatch {
    operations: Vec<Operation>,
    max_batch_size: usize,
    references: Arc<dyn ReferenceGenerator>,
}

impl OperationBatch {
    /// Empty batch holding at most `max_batch_size` operations.
    pub fn new(max_batch_size: usize) -> Self {
        Self::with_reference_generator(max_batch_size, Arc::new(TimestampReferenceGenerator::default()))
    }

    /// Empty batch drawing generated references from `references`.
    pub fn with_reference_generator(
        max_batch_size: usize,
        references: Arc<dyn ReferenceGenerator>,
    ) -> Self {
        Self { operations: Vec::with_capacity(max_batch_size.min(DEFAULT_MAX_BATCH_SIZE)), max_batch_size, references }
    }

    /// Append an operation.
    ///
    /// # Errors
    /// Returns `CorezoidError::CapacityExceeded` when the batch is full.
    pub fn add(&mut self, operation: Operation) -> Result<()> {
        if self.is_full() {
            return Err(CorezoidError::CapacityExceeded { max_batch_size: self.max_batch_size });
        }
        self.operations.push(operation);
        debug!(size = self.operations.len(), max = self.max_batch_size, "added operation to batch");
        Ok(())
    }

    /// Append a create operation and return the reference it carries,
    /// generating one when `reference` is `None`.
    ///
    /// # Errors
    /// Returns `CorezoidError::CapacityExceeded` when the batch is full.
    pub fn add_create(
        &mut self,
        conv_id: impl Into<ConvId>,
        data: TaskData,
        reference: Option<String>,
    ) -> Result<String> {
        let reference = reference.unwrap_or_else(|| self.references.next_reference());
        self.add(codec::build_create(conv_id, reference.clone(), data))?;
        Ok(reference)
    }

    /// # Errors
    /// Returns `CorezoidError::CapacityExceeded` when the batch is full.
    pub fn add_modify_by_ref(
        &mut self,
        conv_id: impl Into<ConvId>,
        reference: impl Into<String>,
        data: TaskData,
    ) -> Result<()> {
        self.add(codec::build_modify_by_ref(conv_id, reference, data))
    }

    /// # Errors
    /// Returns `CorezoidError::CapacityExceeded` when the batch is full.
    pub fn add_modify_by_id(
        &mut self,
        conv_id: impl Into<ConvId>,
        obj_id: impl Into<String>,
        data: TaskData,
    ) -> Result<()> {
        self.add(codec::build_modify_by_id(conv_id, obj_id, data))
    }

    /// # Errors
    /// Returns `CorezoidError::CapacityExceeded` when the batch is full.
    pub fn add_get_by_ref(&mut self, conv_id: impl Into<ConvId>, reference: impl Into<String>) -> Result<()> {
        self.add(codec::build_get_by_ref(conv_id, reference))
    }

    /// # Errors
    /// Returns `CorezoidError::CapacityExceeded` when the batch is full.
    pub fn add_get_by_id(&mut self, conv_id: impl Into<ConvId>, obj_id: impl Into<String>) -> Result<()> {
        self.add(codec::build_get_by_id(conv_id, obj_id))
    }

    /// Drop every operation; capacity is unchanged.
    pub fn clear(&mut self) {
        self.operations.clear();
        debug!("batch cleared");
    }

    /// True when no operation has been added.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// True once `size() == capacity()`; further adds fail.
    pub fn is_full(&self) -> bool {
        self.operations.len() >= self.max_batch_size
    }

    /// Number of queued operations.
    pub fn size(&self) -> usize {
        self.operations.len()
    }

    /// Maximum number of operations this batch accepts.
    pub fn capacity(&self) -> usize {
        self.max_batch_size
    }

    /// Operations that can still be added.
    pub fn remaining(&self) -> usize {
        self.max_batch_size.saturating_sub(self.operations.len())
    }

    /// Operations in insertion order.
    pub fn snapshot(&self) -> &[Operation] {
        &self.operations
    }
}

impl Default for OperationBatch {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BATCH_SIZE)
    }
}

impl fmt::Debug for OperationBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationBatch")
            .field("operations", &self.operations)
            .field("max_batch_size", &self.max_batch_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;
    use serde_json::{json, Value};

    use super::*;

    fn payload(value: Value) -> TaskData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn accepts_exactly_capacity_operations() {
        let mut batch = OperationBatch::new(3);
        for i in 0..3 {
            assert!(!batch.is_full());
            batch.add_get_by_ref("1", format!("r{i}")).unwrap();
        }
        assert!(batch.is_full());

        let err = batch.add_get_by_ref("1", "r3").unwrap_err();
        assert_eq!(err, CorezoidError::CapacityExceeded { max_batch_size: 3 });
        assert_eq!(batch.size(), 3);
    }

    #[test]
    fn clear_reopens_a_full_batch() {
        let mut batch = OperationBatch::new(1);
        batch.add_get_by_id("1", "o").unwrap();
        assert!(batch.add_get_by_id("1", "o2").is_err());

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.capacity(), 1);
        batch.add_get_by_id("1", "o2").unwrap();
        assert_eq!(batch.snapshot()[0].object_id(), Some("o2"));
    }

    #[test]
    fn add_create_returns_explicit_reference() {
        let mut batch = OperationBatch::default();
        let reference = batch.add_create("42", payload(json!({"x": 1})), Some("r1".into())).unwrap();
        assert_eq!(reference, "r1");
        assert_eq!(batch.snapshot()[0].reference(), Some("r1"));
        assert_eq!(batch.capacity(), 100);
    }

    #[test]
    fn add_create_generates_reference_when_absent() {
        let mut batch = OperationBatch::default();
        let reference = batch.add_create(42_u64, payload(json!({})), None).unwrap();

        let pattern = Regex::new(r"^task-\d+-[0-9a-f]{8}$").unwrap();
        assert!(pattern.is_match(&reference), "unexpected reference {reference}");
        assert_eq!(batch.snapshot()[0].reference(), Some(reference.as_str()));
    }

    #[test]
    fn injected_generator_makes_references_deterministic() {
        let generator: Arc<dyn ReferenceGenerator> = Arc::new(|| "fixed".to_string());
        let mut batch = OperationBatch::with_reference_generator(5, generator);
        assert_eq!(batch.add_create("1", payload(json!({})), None).unwrap(), "fixed");
    }

    #[test]
    fn preserves_insertion_order_across_kinds() {
        let mut batch = OperationBatch::new(10);
        batch.add_create("1", payload(json!({"a": 1})), Some("c".into())).unwrap();
        batch.add_modify_by_ref("1", "m", payload(json!({"b": 2}))).unwrap();
        batch.add_modify_by_id("1", "mid", payload(json!({"c": 3}))).unwrap();
        batch.add_get_by_ref("1", "g").unwrap();
        batch.add_get_by_id("1", "gid").unwrap();

        let kinds: Vec<Value> = batch
            .snapshot()
            .iter()
            .map(|op| serde_json::to_value(op).unwrap())
            .map(|v| json!([v["type"], v.get("ref").or_else(|| v.get("obj_id")).cloned()]))
            .collect();
        assert_eq!(
            kinds,
            vec![
                json!(["create", "c"]),
                json!(["modify", "m"]),
                json!(["modify", "mid"]),
                json!(["get", "g"]),
                json!(["get", "gid"]),
            ]
        );
        assert_eq!(batch.remaining(), 5);
    }

    #[test]
    fn zero_capacity_batch_is_always_full() {
        let mut batch = OperationBatch::new(0);
        assert!(batch.is_empty());
        assert!(batch.is_full());
        assert!(batch.add_get_by_ref("1", "r").is_err());
    }
}
