//! Comparative reporter.
//!
//! Joins the real-behavior accountant with every policy instance into one table:
//! an aggregate `TOTAL` row first, then one row per task in first-seen order.
//! Tasks whose reconciled real total is zero are left out of the per-task rows.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::{HitCounters, HitRate, RealAccountant, TaskTable};
use crate::cache::policies::PolicyKind;
use crate::common::{Command, TaskKey};

/// Column order of the policy rates in the report.
pub const REPORT_ORDER: [PolicyKind; 4] = [
    PolicyKind::Fifo,
    PolicyKind::Lfu,
    PolicyKind::Lru,
    PolicyKind::Mru,
];

const COL: usize = 16;
const GAP: &str = "    ";

/// What the reporter needs from one policy instance.
#[derive(Debug, Clone, Copy)]
pub struct PolicyColumn<'a> {
    /// The policy simulated.
    pub kind: PolicyKind,
    /// Its per-task counters.
    pub tasks: &'a TaskTable,
    /// Its global counters.
    pub totals: HitCounters,
}

/// Hit rate of one policy within a row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolicyRate {
    /// The policy.
    pub policy: PolicyKind,
    /// Its hit percentage for the row.
    pub rate: HitRate,
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// `TOTAL` for the aggregate row, otherwise the task's command name.
    pub command: String,
    /// The task key, absent on the aggregate row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskKey>,
    /// Reconciled kernel hit rate.
    pub real: HitRate,
    /// Simulated hit rates, in [`REPORT_ORDER`].
    pub policies: Vec<PolicyRate>,
    /// Simulated accesses (hits plus misses) attributed to the row.
    pub accesses: u64,
}

impl ReportRow {
    /// Returns the simulated rate of one policy, if that policy was reported.
    pub fn rate(&self, policy: PolicyKind) -> Option<HitRate> {
        self.policies
            .iter()
            .find(|p| p.policy == policy)
            .map(|p| p.rate)
    }
}

/// Comparative hit-rate table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Aggregate row followed by per-task rows.
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Builds the report from the accountant and the policy instances.
    ///
    /// # Arguments
    ///
    /// * `real` - Accumulated raw kernel counters.
    /// * `columns` - One entry per policy instance, in any order.
    pub fn build(real: &RealAccountant, columns: &[PolicyColumn<'_>]) -> Self {
        let mut columns = columns.to_vec();
        columns.sort_by_key(|c| REPORT_ORDER.iter().position(|&k| k == c.kind));

        let mut rows = Vec::with_capacity(real.tasks().len() + 1);
        rows.push(ReportRow {
            command: "TOTAL".to_owned(),
            task: None,
            real: real.aggregate().rate(),
            policies: columns
                .iter()
                .map(|c| PolicyRate {
                    policy: c.kind,
                    rate: c.totals.rate(),
                })
                .collect(),
            accesses: columns.first().map_or(0, |c| c.totals.total()),
        });

        for (key, command) in union_of_tasks(real, &columns) {
            let outcome = real
                .tasks()
                .get(&key)
                .map(|c| c.reconcile())
                .unwrap_or_default();
            if outcome.total == 0 {
                continue;
            }
            let counters = |c: &PolicyColumn<'_>| c.tasks.get(&key).copied().unwrap_or_default();
            rows.push(ReportRow {
                command: command.display_name().into_owned(),
                task: Some(key),
                real: outcome.rate(),
                policies: columns
                    .iter()
                    .map(|c| PolicyRate {
                        policy: c.kind,
                        rate: counters(c).rate(),
                    })
                    .collect(),
                accesses: columns.first().map_or(0, |c| counters(c).total()),
            });
        }

        Self { rows }
    }

    /// The aggregate row.
    pub fn total(&self) -> Option<&ReportRow> {
        self.rows.first()
    }

    /// Per-task rows, in first-seen order.
    pub fn tasks(&self) -> &[ReportRow] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

fn union_of_tasks(real: &RealAccountant, columns: &[PolicyColumn<'_>]) -> Vec<(TaskKey, Command)> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    let real_keys = real.tasks().iter().map(|e| (e.key, e.command));
    let policy_keys = columns
        .iter()
        .flat_map(|c| c.tasks.iter().map(|e| (e.key, e.command)));
    for (key, command) in real_keys.chain(policy_keys) {
        if seen.insert(key) {
            order.push((key, command));
        }
    }
    order
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<COL$}{GAP}{:<COL$}", "Command", "Real Hit %")?;
        for kind in REPORT_ORDER {
            write!(f, "{GAP}{:<COL$}", format!("{kind} Hit %"))?;
        }
        writeln!(f, "{GAP}Hits+Misses")?;

        for row in &self.rows {
            write!(f, "{:<COL$}{GAP}{:<COL$.2}", row.command, row.real)?;
            for kind in REPORT_ORDER {
                let rate = row.rate(kind).unwrap_or(HitRate::NoData);
                write!(f, "{GAP}{rate:<COL$.2}")?;
            }
            writeln!(f, "{GAP}{}", row.accesses)?;
        }
        Ok(())
    }
}
