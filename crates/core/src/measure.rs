//! This module provide the [QueryTracker] and the [QueryReport] it collects.
//! It is used to measure how many hops a lookup takes to reach the owner of a key.
#![warn(missing_docs)]
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;

/// Outcome of one client lookup, delivered back to the entry node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryReport {
    /// The key looked up.
    pub key: Did,
    /// The node the lookup terminated at.
    pub owner: Did,
    /// Number of `find_successor` invocations along the chain.
    pub steps: u32,
    /// Whether `owner` actually stores `key`.
    pub success: bool,
}

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "found key {} at node {} in {} steps",
                self.key, self.owner, self.steps
            )
        } else {
            write!(
                f,
                "located node {} for key {} in {} steps, but it does not store the key",
                self.owner, self.key, self.steps
            )
        }
    }
}

#[derive(Debug, Default)]
struct Records {
    hop_counts: Vec<u32>,
    reports: Vec<QueryReport>,
}

/// Shared handle carried along with every client lookup.
/// Cloning is cheap, all clones record into the same list.
#[derive(Debug, Clone, Default)]
pub struct QueryTracker {
    records: Arc<Mutex<Records>>,
}

impl QueryTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_records(&self) -> Result<MutexGuard<Records>> {
        self.records.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Record a terminal report. Only successful lookups append a hop count.
    pub fn record(&self, report: QueryReport) -> Result<()> {
        let mut records = self.lock_records()?;
        if report.success {
            records.hop_counts.push(report.steps);
        }
        records.reports.push(report);
        Ok(())
    }

    /// Hop counts of every successful lookup, in completion order.
    pub fn hop_counts(&self) -> Result<Vec<u32>> {
        Ok(self.lock_records()?.hop_counts.clone())
    }

    /// Every terminal report, failed ones included, in completion order.
    pub fn reports(&self) -> Result<Vec<QueryReport>> {
        Ok(self.lock_records()?.reports.clone())
    }
}
