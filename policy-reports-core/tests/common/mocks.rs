//! Mock gateways for policy-reports-core tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use policy_reports_core::domain::reports::{
    GatewayError, RemoteGateway, ReportRecord, ReportType,
};

/// In-memory gateway that counts remote calls per report type
#[derive(Default)]
pub struct MockGateway {
    reports: Mutex<HashMap<ReportType, Vec<ReportRecord>>>,
    failures: Mutex<HashMap<ReportType, GatewayError>>,
    absent: Mutex<HashSet<ReportType>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<HashMap<ReportType, usize>>,
    total_calls: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch sleeps for `delay` before answering
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(Some(delay));
        self
    }

    pub fn with_reports(self, report_type: ReportType, records: Vec<ReportRecord>) -> Self {
        self.set_reports(report_type, records);
        self
    }

    pub fn with_failure(self, report_type: ReportType, error: GatewayError) -> Self {
        self.set_failure(report_type, error);
        self
    }

    /// `report_type` is reported as not served by the remote
    pub fn without_schema(self, report_type: ReportType) -> Self {
        self.absent.lock().expect("absent lock").insert(report_type);
        self
    }

    /// Replace what the remote returns from now on
    pub fn set_reports(&self, report_type: ReportType, records: Vec<ReportRecord>) {
        self.reports
            .lock()
            .expect("reports lock")
            .insert(report_type, records);
    }

    /// Delay applied to fetches started from now on
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().expect("delay lock") = delay;
    }

    /// Fail fetches of `report_type` started from now on
    pub fn set_failure(&self, report_type: ReportType, error: GatewayError) {
        self.failures
            .lock()
            .expect("failures lock")
            .insert(report_type, error);
    }

    pub fn clear_failure(&self, report_type: ReportType) {
        self.failures
            .lock()
            .expect("failures lock")
            .remove(&report_type);
    }

    pub fn calls(&self, report_type: ReportType) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .get(&report_type)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn fetch_all(&self, report_type: ReportType) -> Result<Vec<ReportRecord>, GatewayError> {
        *self
            .calls
            .lock()
            .expect("calls lock")
            .entry(report_type)
            .or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::SeqCst);

        // The answer is decided when the call starts, like a server snapshot
        let delay = *self.delay.lock().expect("delay lock");
        let answer = match self.failures.lock().expect("failures lock").get(&report_type) {
            Some(error) => Err(error.clone()),
            None => Ok(self
                .reports
                .lock()
                .expect("reports lock")
                .get(&report_type)
                .cloned()
                .unwrap_or_default()),
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    fn schema_exists(&self, report_type: ReportType) -> bool {
        !self.absent.lock().expect("absent lock").contains(&report_type)
    }
}
