//! Execution strategies. Both return one result per case, in input order.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::RunError;

use super::validator::ContractValidator;
use super::{RunSummary, TestCase, TestResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Case `i + 1` starts after case `i` has its result.
    #[default]
    Sequential,
    /// `workers` tasks pull cases independently; cross-case ordering has no
    /// meaning in this mode.
    Pool { workers: usize },
}

pub async fn run(
    validator: Arc<ContractValidator>,
    cases: Arc<Vec<TestCase>>,
    strategy: ExecutionStrategy,
) -> Result<Vec<TestResult>, RunError> {
    let started = Instant::now();
    let results = match strategy {
        ExecutionStrategy::Sequential => validator.execute_tests(&cases).await,
        ExecutionStrategy::Pool { workers } => {
            warn!(
                workers,
                "pool execution runs cases independently; suites relying on cross-case side effects may behave differently"
            );
            run_pool(validator, cases, workers).await?
        }
    };

    let summary = RunSummary::from_results(&results);
    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        wall_ms = started.elapsed().as_millis() as u64,
        "run finished"
    );

    Ok(results)
}

async fn run_pool(
    validator: Arc<ContractValidator>,
    cases: Arc<Vec<TestCase>>,
    workers: usize,
) -> Result<Vec<TestResult>, RunError> {
    let worker_count = workers.max(1).min(cases.len().max(1));
    let next_index = Arc::new(AtomicUsize::new(0));
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(usize, TestResult)>();

    let mut handles = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let validator = validator.clone();
        let cases = cases.clone();
        let next_index = next_index.clone();
        let result_tx = result_tx.clone();

        let handle = tokio::spawn(async move {
            loop {
                let idx = next_index.fetch_add(1, Ordering::Relaxed);
                let Some(case) = cases.get(idx) else {
                    break;
                };
                let result = validator.execute_test(case).await;
                if result_tx.send((idx, result)).is_err() {
                    break;
                }
            }
        });
        handles.push(handle);
    }
    drop(result_tx);

    for handle in handles {
        handle
            .await
            .map_err(|err| RunError::Worker(format!("Contract worker crashed: {err}")))?;
    }

    let mut slots: Vec<Option<TestResult>> = vec![None; cases.len()];
    while let Some((idx, result)) = result_rx.recv().await {
        slots[idx] = Some(result);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.ok_or_else(|| RunError::Worker(format!("no result recorded for case {idx}")))
        })
        .collect()
}
