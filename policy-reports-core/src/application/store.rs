//! Report collections owned by the engine
//!
//! Two collections exist, one per report level. Each is partitioned by report
//! type; a partition is replaced wholesale when an ingestion cycle for its
//! type completes, so readers only ever see a whole cycle's worth of records.
//!
//! Cycles are numbered when they start. A cycle that completes after a newer
//! one for the same type has been published is discarded.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use super::errors::CommitError;
use crate::domain::reports::{ReportLevel, ReportRecord, ReportType};

/// Records of one ingestion cycle, keyed by identity, in arrival order
#[derive(Debug, Default)]
pub struct StagedPartition {
    records: Vec<ReportRecord>,
    positions: HashMap<String, usize>,
}

impl StagedPartition {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a slice, replacing records whose identity was already seen.
    ///
    /// Records without an identity cannot be keyed; the rest of the slice is
    /// still committed and the rejection is reported.
    pub fn commit(&mut self, slice: &[ReportRecord]) -> Result<(), CommitError> {
        let mut rejected = 0;

        for record in slice {
            let identity = record.identity();
            if identity.is_empty() {
                rejected += 1;
                continue;
            }
            match self.positions.get(identity) {
                Some(&position) => self.records[position] = record.clone(),
                None => {
                    self.positions
                        .insert(identity.to_string(), self.records.len());
                    self.records.push(record.clone());
                }
            }
        }

        if rejected > 0 {
            return Err(CommitError::MissingIdentity { rejected });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ReportRecord> {
        self.records
    }
}

/// All records of one report level
#[derive(Debug, Default)]
pub struct ReportCollection {
    partitions: BTreeMap<ReportType, Vec<ReportRecord>>,
    generations: BTreeMap<ReportType, u64>,
}

impl ReportCollection {
    pub fn iter(&self) -> impl Iterator<Item = &ReportRecord> {
        self.partitions.values().flatten()
    }

    pub fn partition(&self, report_type: ReportType) -> &[ReportRecord] {
        self.partitions
            .get(&report_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The resource-scoped and cluster-scoped collections
#[derive(Debug, Default)]
pub struct ReportStore {
    resource: RwLock<ReportCollection>,
    cluster: RwLock<ReportCollection>,
    next_generation: AtomicU64,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, level: ReportLevel) -> &RwLock<ReportCollection> {
        match level {
            ReportLevel::Namespaced => &self.resource,
            ReportLevel::Cluster => &self.cluster,
        }
    }

    /// Number a new ingestion cycle. Later cycles get higher generations.
    pub fn begin_cycle(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish the records of a completed ingestion cycle.
    ///
    /// Returns `false`, leaving the partition untouched, when a cycle started
    /// after `generation` has already been published for `report_type`.
    pub fn replace(
        &self,
        report_type: ReportType,
        generation: u64,
        records: Vec<ReportRecord>,
    ) -> bool {
        let mut collection = self
            .collection(report_type.level())
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(published) = collection.generations.get(&report_type) {
            if *published > generation {
                debug!(
                    report_type = %report_type,
                    generation,
                    published = *published,
                    "Discarding superseded ingestion cycle"
                );
                return false;
            }
        }

        collection.generations.insert(report_type, generation);
        collection.partitions.insert(report_type, records);
        true
    }

    /// Copy of the current records of one report type
    pub fn records_of(&self, report_type: ReportType) -> Vec<ReportRecord> {
        self.collection(report_type.level())
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .partition(report_type)
            .to_vec()
    }

    /// Copy of every current record of one level
    pub fn records(&self, level: ReportLevel) -> Vec<ReportRecord> {
        self.collection(level)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self, level: ReportLevel) -> usize {
        self.collection(level)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Run `f` over a consistent view of both collections
    pub fn read_both<R>(&self, f: impl FnOnce(&ReportCollection, &ReportCollection) -> R) -> R {
        let resource = self.resource.read().unwrap_or_else(PoisonError::into_inner);
        let cluster = self.cluster.read().unwrap_or_else(PoisonError::into_inner);
        f(&resource, &cluster)
    }
}
