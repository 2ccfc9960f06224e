//! Dirty-flag recomputation of stored computed fields.
//!
//! Writes report the columns they touched with [`RecomputeQueue::mark_modified`];
//! the queue maps them to the computed fields that depend on them and keeps
//! the affected record ids until [`RecomputeQueue::flush`] runs the registered
//! [`Recompute`] implementations inside the caller's transaction.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Records whose columns can feed a computed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Model {
    SaleOrder,
    SaleOrderOption,
}

/// Stored computed fields maintained by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ComputedField {
    OrderWebsiteDescription,
    OptionWebsiteDescription,
}

impl ComputedField {
    pub fn model(self) -> Model {
        match self {
            ComputedField::OrderWebsiteDescription => Model::SaleOrder,
            ComputedField::OptionWebsiteDescription => Model::SaleOrderOption,
        }
    }
}

/// `computed` must be refreshed when `field` of `model` changes.
#[derive(Debug, Clone, Copy)]
pub struct Dependency {
    pub model: Model,
    pub field: &'static str,
    pub computed: ComputedField,
}

pub const DEPENDENCIES: &[Dependency] = &[
    Dependency {
        model: Model::SaleOrder,
        field: "customer_id",
        computed: ComputedField::OrderWebsiteDescription,
    },
    Dependency {
        model: Model::SaleOrder,
        field: "template_id",
        computed: ComputedField::OrderWebsiteDescription,
    },
    Dependency {
        model: Model::SaleOrderOption,
        field: "product_id",
        computed: ComputedField::OptionWebsiteDescription,
    },
    Dependency {
        model: Model::SaleOrderOption,
        field: "uom_id",
        computed: ComputedField::OptionWebsiteDescription,
    },
];

/// Computed fields depending on `field` of `model`.
pub fn dependents(model: Model, field: &str) -> impl Iterator<Item = ComputedField> + '_ {
    DEPENDENCIES
        .iter()
        .filter(move |dep| dep.model == model && dep.field == field)
        .map(|dep| dep.computed)
}

/// Recomputes one computed field for a set of records.
#[async_trait]
pub trait Recompute: Send + Sync {
    fn field(&self) -> ComputedField;

    async fn recompute(&self, txn: &DatabaseTransaction, ids: &[Uuid]) -> Result<(), ServiceError>;
}

/// Pending recomputations of a single operation.
#[derive(Debug, Default)]
pub struct RecomputeQueue {
    pending: BTreeMap<ComputedField, BTreeSet<Uuid>>,
    protected: HashSet<(ComputedField, Uuid)>,
}

impl RecomputeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues every computed field of `id` that depends on one of `fields`.
    pub fn mark_modified(&mut self, model: Model, id: Uuid, fields: &[&str]) {
        for field in fields {
            for computed in dependents(model, field) {
                if self.protected.contains(&(computed, id)) {
                    continue;
                }
                self.pending.entry(computed).or_default().insert(id);
            }
        }
    }

    /// Excludes `id` from recomputing `computed` for the rest of the
    /// operation: the same write assigned the field explicitly.
    pub fn protect(&mut self, computed: ComputedField, id: Uuid) {
        self.protected.insert((computed, id));
        if let Some(ids) = self.pending.get_mut(&computed) {
            ids.remove(&id);
            if ids.is_empty() {
                self.pending.remove(&computed);
            }
        }
    }

    pub fn is_protected(&self, computed: ComputedField, id: Uuid) -> bool {
        self.protected.contains(&(computed, id))
    }

    /// Drains the ids waiting on `computed`.
    pub fn take(&mut self, computed: ComputedField) -> Vec<Uuid> {
        self.pending
            .remove(&computed)
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_fields(&self) -> Vec<ComputedField> {
        self.pending.keys().copied().collect()
    }

    /// Runs `computes` until nothing is pending. Fails when a pending field
    /// has no registered implementation.
    pub async fn flush(
        &mut self,
        txn: &DatabaseTransaction,
        computes: &[&dyn Recompute],
    ) -> Result<(), ServiceError> {
        while !self.is_empty() {
            let mut progressed = false;
            for compute in computes {
                let ids = self.take(compute.field());
                if ids.is_empty() {
                    continue;
                }
                progressed = true;
                debug!(field = %compute.field(), count = ids.len(), "Recomputing stored field");
                compute.recompute(txn, &ids).await?;
            }

            if !progressed {
                return Err(ServiceError::InternalError(format!(
                    "No recompute registered for {:?}",
                    self.pending_fields()
                )));
            }
        }
        Ok(())
    }
}
