use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use strum::{Display, EnumIter, IntoStaticStr};

use super::lookup::entries;
use super::rig::RigRecord;

/// The two results a refresh collects, under their stable keys.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, EnumIter, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum SnapshotField {
    /// Fleet data returned by the rigs fetch.
    Rigs,
    /// Balances returned by the account fetch.
    Account,
}

/// One complete poll result.
///
/// A snapshot is only ever built from two successful fetches and is never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Fleet data, as returned by the API
    pub rigs: Value,
    /// Account balances valued in the configured fiat currency
    pub account: Value,
    /// The time this snapshot was assembled, in seconds since the UNIX epoch
    pub timestamp: u64,
}

impl Snapshot {
    pub fn new(rigs: Value, account: Value) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        Self {
            rigs,
            account,
            timestamp,
        }
    }

    pub fn get(&self, field: SnapshotField) -> &Value {
        match field {
            SnapshotField::Rigs => &self.rigs,
            SnapshotField::Account => &self.account,
        }
    }

    /// Iterates the individual rig records of the fleet data.
    pub fn rig_records(&self) -> impl Iterator<Item = &RigRecord> {
        entries(Some(&self.rigs), "miningRigs")
    }
}
