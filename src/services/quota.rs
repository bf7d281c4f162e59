//! Daily quota tracking
//!
//! Counts accepted requests per (caller, UTC day). The whole map sits behind a
//! single mutex so check-and-increment is atomic. Entries for past days are
//! kept until the process exits.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Default accepted requests per caller per day
pub const DEFAULT_DAILY_LIMIT: u32 = 50;

/// Opaque caller identifier: hex SHA-256 of the requester's address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId(String);

impl CallerId {
    /// Derive the identifier from a network address
    pub fn from_ip(ip: IpAddr) -> Self {
        Self::from_address(&ip.to_string())
    }

    /// Derive the identifier from a textual address
    pub fn from_address(address: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(address.as_bytes())))
    }

    /// Use an already-derived identifier as is
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current calendar day
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock whose day is set by hand
#[derive(Debug)]
pub struct ManualClock {
    day: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day: Mutex::new(day) }
    }

    pub fn set(&self, day: NaiveDate) {
        *self.day.lock().unwrap_or_else(|e| e.into_inner()) = day;
    }

    /// Move forward by whole days
    pub fn advance_days(&self, days: u64) {
        let mut day = self.day.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = day.checked_add_days(chrono::Days::new(days)) {
            *day = next;
        }
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.day.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QuotaKey {
    caller: CallerId,
    day: NaiveDate,
}

/// Point-in-time usage for one caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub daily_limit: u32,
    pub used: u32,
    pub remaining: i64,
    pub date: NaiveDate,
}

/// Per-caller daily request counter
pub struct QuotaTracker {
    daily_limit: u32,
    clock: Arc<dyn Clock>,
    counts: Mutex<HashMap<QuotaKey, u32>>,
}

impl QuotaTracker {
    /// Tracker on the UTC wall clock
    pub fn new(daily_limit: u32) -> Self {
        Self::with_clock(daily_limit, Arc::new(SystemClock))
    }

    pub fn with_clock(daily_limit: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            daily_limit,
            clock,
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    fn counts(&self) -> MutexGuard<'_, HashMap<QuotaKey, u32>> {
        // Counters stay consistent even if a holder panicked
        self.counts.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn key(&self, caller: &CallerId) -> QuotaKey {
        QuotaKey {
            caller: caller.clone(),
            day: self.clock.today(),
        }
    }

    /// Accept and count one request, or refuse it without counting
    pub fn check_and_increment(&self, caller: &CallerId) -> bool {
        let key = self.key(caller);
        let mut counts = self.counts();
        let count = counts.entry(key).or_insert(0);

        if *count >= self.daily_limit {
            debug!("Caller {} is at the daily limit ({})", caller, self.daily_limit);
            return false;
        }

        *count += 1;
        true
    }

    /// Requests left today
    pub fn remaining(&self, caller: &CallerId) -> i64 {
        self.usage(caller).remaining
    }

    /// Usage for today
    pub fn usage(&self, caller: &CallerId) -> UsageSnapshot {
        let key = self.key(caller);
        let used = self.counts().get(&key).copied().unwrap_or(0);

        UsageSnapshot {
            daily_limit: self.daily_limit,
            used,
            remaining: i64::from(self.daily_limit) - i64::from(used),
            date: key.day,
        }
    }

    /// Number of (caller, day) entries held in memory
    pub fn tracked_keys(&self) -> usize {
        self.counts().len()
    }
}

impl fmt::Debug for QuotaTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuotaTracker")
            .field("daily_limit", &self.daily_limit)
            .field("tracked_keys", &self.tracked_keys())
            .finish()
    }
}
