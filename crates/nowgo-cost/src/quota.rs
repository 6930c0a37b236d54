// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API key resolution and per-caller request quotas.
//!
//! The registry is built once from `[[api_keys]]` and `[[plans]]`. Each
//! caller has a request counter for the current calendar month (UTC), the
//! same period the usage ledger reports. Checking the limit and taking a
//! slot happen under one per-caller lock, so concurrent requests can never
//! push a caller past its quota. A reservation in a new month starts the
//! counter from zero.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use nowgo_config::model::NowgoConfig;
use nowgo_core::{
    Admission, AdmissionAdapter, AuthAdapter, CallerId, DenialReason, NowgoError, QuotaSnapshot,
};
use tracing::{debug, info};

use crate::usage::current_period;

#[derive(Debug, Default)]
struct QuotaWindow {
    period: String,
    used: u64,
}

#[derive(Debug)]
struct CallerQuota {
    plan: String,
    limit: u64,
    window: Mutex<QuotaWindow>,
}

impl CallerQuota {
    fn used_in(&self, period: &str) -> u64 {
        let window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        if window.period == period { window.used } else { 0 }
    }
}

/// In-memory key table and quota counters.
#[derive(Debug, Default)]
pub struct QuotaRegistry {
    by_key: HashMap<String, CallerId>,
    quotas: HashMap<CallerId, CallerQuota>,
}

impl QuotaRegistry {
    /// Build the registry from configured keys and plans.
    ///
    /// A key without `requests_limit` gets its plan's `requests_per_month`.
    pub fn from_config(config: &NowgoConfig) -> Result<Self, NowgoError> {
        let mut registry = Self::default();
        for entry in &config.api_keys {
            let limit = match entry.requests_limit {
                Some(limit) => limit,
                None => config
                    .plans
                    .iter()
                    .find(|p| p.id == entry.plan)
                    .map(|p| p.requests_per_month)
                    .ok_or_else(|| {
                        NowgoError::Config(format!(
                            "api key for `{}` references unknown plan `{}`",
                            entry.caller_id, entry.plan
                        ))
                    })?,
            };
            registry.insert(&entry.key, CallerId(entry.caller_id.clone()), &entry.plan, limit);
        }
        Ok(registry)
    }

    /// Register `key` for `caller` with a request `limit`.
    pub fn insert(&mut self, key: &str, caller: CallerId, plan: &str, limit: u64) {
        self.by_key.insert(key.to_string(), caller.clone());
        self.quotas.insert(
            caller,
            CallerQuota {
                plan: plan.to_string(),
                limit,
                window: Mutex::new(QuotaWindow::default()),
            },
        );
    }

    /// Resolve a bearer key to its caller.
    pub fn resolve(&self, api_key: &str) -> Option<&CallerId> {
        self.by_key.get(api_key)
    }

    /// Reserve one request for `caller` in the current month.
    pub fn try_reserve(&self, caller: &CallerId) -> Admission {
        self.try_reserve_in_period(caller, &current_period())
    }

    /// Reserve one request for `caller` in `period`.
    ///
    /// The limit check and the increment happen under the caller's lock.
    pub fn try_reserve_in_period(&self, caller: &CallerId, period: &str) -> Admission {
        let Some(quota) = self.quotas.get(caller) else {
            return Admission::Denied(DenialReason::UnknownCaller);
        };

        let mut window = quota.window.lock().unwrap_or_else(PoisonError::into_inner);
        if window.period != period {
            if !window.period.is_empty() {
                debug!(caller = %caller, from = %window.period, to = period, "quota period rolled over");
            }
            *window = QuotaWindow {
                period: period.to_string(),
                used: 0,
            };
        }

        if window.used < quota.limit {
            window.used += 1;
            return Admission::Allowed;
        }

        info!(
            caller = %caller,
            plan = %quota.plan,
            used = window.used,
            limit = quota.limit,
            "quota exhausted"
        );
        Admission::Denied(DenialReason::QuotaExceeded { limit: quota.limit })
    }

    /// Counter and limit for `caller` in the current month.
    pub fn snapshot(&self, caller: &CallerId) -> Option<QuotaSnapshot> {
        self.snapshot_in_period(caller, &current_period())
    }

    /// Counter and limit for `caller` in `period`; zero used if nothing was
    /// reserved then.
    pub fn snapshot_in_period(&self, caller: &CallerId, period: &str) -> Option<QuotaSnapshot> {
        self.quotas.get(caller).map(|q| QuotaSnapshot {
            used: q.used_in(period),
            limit: q.limit,
        })
    }

    /// Plan id of `caller`.
    pub fn plan_of(&self, caller: &CallerId) -> Option<&str> {
        self.quotas.get(caller).map(|q| q.plan.as_str())
    }

    pub fn len(&self) -> usize {
        self.quotas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotas.is_empty()
    }
}

#[async_trait]
impl AuthAdapter for QuotaRegistry {
    async fn authenticate(&self, api_key: &str) -> Result<Option<CallerId>, NowgoError> {
        Ok(self.resolve(api_key).cloned())
    }
}

#[async_trait]
impl AdmissionAdapter for QuotaRegistry {
    async fn check_and_reserve(&self, caller: &CallerId) -> Result<Admission, NowgoError> {
        Ok(self.try_reserve(caller))
    }

    async fn quota(&self, caller: &CallerId) -> Result<Option<QuotaSnapshot>, NowgoError> {
        Ok(self.snapshot(caller))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nowgo_config::model::ApiKeyConfig;

    use super::*;

    fn config_with_keys(keys: Vec<ApiKeyConfig>) -> NowgoConfig {
        NowgoConfig {
            api_keys: keys,
            ..Default::default()
        }
    }

    fn key(key: &str, caller: &str, plan: &str, limit: Option<u64>) -> ApiKeyConfig {
        ApiKeyConfig {
            key: key.to_string(),
            caller_id: caller.to_string(),
            plan: plan.to_string(),
            requests_limit: limit,
        }
    }

    fn alice() -> CallerId {
        CallerId("alice".to_string())
    }

    #[test]
    fn limit_defaults_to_plan_allowance() {
        let registry =
            QuotaRegistry::from_config(&config_with_keys(vec![key("k1", "alice", "starter", None)]))
                .unwrap();
        assert_eq!(
            registry.snapshot(&alice()),
            Some(QuotaSnapshot {
                used: 0,
                limit: 10_000
            })
        );
        assert_eq!(registry.plan_of(&alice()), Some("starter"));
    }

    #[test]
    fn unknown_plan_is_config_error() {
        let err =
            QuotaRegistry::from_config(&config_with_keys(vec![key("k1", "alice", "gold", None)]))
                .unwrap_err();
        assert!(matches!(err, NowgoError::Config(_)));
    }

    #[test]
    fn reserve_until_limit_then_deny() {
        let registry = QuotaRegistry::from_config(&config_with_keys(vec![key(
            "k1",
            "alice",
            "starter",
            Some(2),
        )]))
        .unwrap();

        assert_eq!(registry.try_reserve(&alice()), Admission::Allowed);
        assert_eq!(registry.try_reserve(&alice()), Admission::Allowed);
        assert_eq!(
            registry.try_reserve(&alice()),
            Admission::Denied(DenialReason::QuotaExceeded { limit: 2 })
        );
        assert_eq!(registry.snapshot(&alice()).unwrap().used, 2);
    }

    #[test]
    fn unknown_caller_is_denied() {
        let registry = QuotaRegistry::default();
        assert_eq!(
            registry.try_reserve(&CallerId("ghost".to_string())),
            Admission::Denied(DenialReason::UnknownCaller)
        );
        assert!(registry.snapshot(&CallerId("ghost".to_string())).is_none());
    }

    #[test]
    fn concurrent_reservations_never_exceed_limit() {
        let mut registry = QuotaRegistry::default();
        registry.insert("k1", alice(), "starter", 50);
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..20)
                        .filter(|_| registry.try_reserve(&alice()).is_allowed())
                        .count()
                })
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 50);
        assert_eq!(registry.snapshot(&alice()).unwrap().used, 50);
    }

    #[test]
    fn counter_resets_when_month_changes() {
        let mut registry = QuotaRegistry::default();
        registry.insert("k1", alice(), "starter", 2);

        assert!(registry.try_reserve_in_period(&alice(), "2026-09").is_allowed());
        assert!(registry.try_reserve_in_period(&alice(), "2026-09").is_allowed());
        assert!(!registry.try_reserve_in_period(&alice(), "2026-09").is_allowed());
        assert_eq!(registry.snapshot_in_period(&alice(), "2026-09").unwrap().used, 2);

        // Before any request in the new month the caller shows zero used.
        assert_eq!(registry.snapshot_in_period(&alice(), "2026-10").unwrap().used, 0);
        assert!(registry.try_reserve_in_period(&alice(), "2026-10").is_allowed());
        assert_eq!(
            registry.snapshot_in_period(&alice(), "2026-10"),
            Some(QuotaSnapshot { used: 1, limit: 2 })
        );
    }

    #[tokio::test]
    async fn authenticate_resolves_known_keys_only() {
        let registry =
            QuotaRegistry::from_config(&config_with_keys(vec![key("k1", "alice", "starter", None)]))
                .unwrap();
        assert_eq!(registry.authenticate("k1").await.unwrap(), Some(alice()));
        assert_eq!(registry.authenticate("k2").await.unwrap(), None);
        assert_eq!(registry.authenticate("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn admission_trait_reserves() {
        let mut registry = QuotaRegistry::default();
        registry.insert("k1", alice(), "starter", 1);
        assert!(registry.check_and_reserve(&alice()).await.unwrap().is_allowed());
        assert!(!registry.check_and_reserve(&alice()).await.unwrap().is_allowed());
        assert_eq!(
            registry.quota(&alice()).await.unwrap(),
            Some(QuotaSnapshot { used: 1, limit: 1 })
        );
    }
}
