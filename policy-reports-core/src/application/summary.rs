//! Per-resource outcome summary
//!
//! The index is a pure fold over the two report collections. Rebuilding it
//! from the same input always yields the same map; `BTreeMap` keeps iteration
//! order stable as well.

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::domain::reports::{ReportRecord, ResourceId, ResultCounts};

/// Derived outcome counts keyed by resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryIndex {
    entries: BTreeMap<ResourceId, ResultCounts>,
}

impl SummaryIndex {
    pub fn get(&self, resource_id: &str) -> Option<&ResultCounts> {
        self.entries.get(&ResourceId::from(resource_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ResourceId, ResultCounts> {
        self.entries.iter()
    }

    /// Sum of all entries
    pub fn totals(&self) -> ResultCounts {
        self.entries
            .values()
            .fold(ResultCounts::default(), |mut acc, counts| {
                acc.pass += counts.pass;
                acc.fail += counts.fail;
                acc.warn += counts.warn;
                acc.error += counts.error;
                acc.skip += counts.skip;
                acc
            })
    }
}

impl<'a> IntoIterator for &'a SummaryIndex {
    type Item = (&'a ResourceId, &'a ResultCounts);
    type IntoIter = btree_map::Iter<'a, ResourceId, ResultCounts>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a [`SummaryIndex`] from report collections
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryIndexBuilder;

impl SummaryIndexBuilder {
    /// Fold resource-scoped and cluster-scoped reports into one index.
    ///
    /// Records not owned by Kubewarden, records without a named scope and
    /// results with an unrecognized outcome are skipped without error.
    pub fn build<'a, R, C>(resource_reports: R, cluster_reports: C) -> SummaryIndex
    where
        R: IntoIterator<Item = &'a ReportRecord>,
        C: IntoIterator<Item = &'a ReportRecord>,
    {
        let mut entries: BTreeMap<ResourceId, ResultCounts> = BTreeMap::new();

        for record in resource_reports.into_iter().chain(cluster_reports) {
            if !record.is_managed_by_kubewarden() {
                continue;
            }
            let Some(resource_id) = record.resource_id() else {
                continue;
            };

            let counts = entries.entry(resource_id).or_default();
            for kind in record.results().iter().filter_map(|result| result.kind()) {
                counts.record(kind);
            }
        }

        SummaryIndex { entries }
    }
}
