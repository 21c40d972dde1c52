//! The per-core worker loop (spec §4.3).
//!
//! Grounded on `lumen-runtime::scheduler::Scheduler::worker_loop` for
//! thread shape (named `thread::Builder` threads, an `Arc<AtomicBool>`
//! shutdown signal checked at loop entry) — the dequeue/execute/requeue
//! body itself follows `original_source/Scheduler.cpp::coreWorker`.

use crate::config::SchedulerConfig;
use crate::queue::SchedulerState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Spawn the OS thread for one core worker.
///
/// Loop (spec §4.3): wait for a ready process assigned to this core, run
/// one slice under the policy's quantum, then move it to the finished set
/// or requeue it depending on the outcome. The scheduler policy is
/// resolved fresh on every dequeue attempt (via `config.policy()`) rather
/// than once at spawn time, mirroring `original_source/Scheduler.cpp::coreWorker`'s
/// in-loop `schedulerType` check — an unknown policy is not fatal to the
/// worker, it just leaves the process queued (spec §7 UNKNOWN_POLICY).
pub fn spawn_core_worker(
    core_id: usize,
    state: Arc<SchedulerState>,
    shutdown: Arc<AtomicBool>,
    delay_per_exec: u64,
    config: Arc<SchedulerConfig>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("corebox-core-{}", core_id))
        .spawn(move || {
            loop {
                if shutdown.load(Ordering::Acquire) {
                    return;
                }

                let dequeued = state.dequeue_for_core(
                    core_id,
                    || shutdown.load(Ordering::Acquire),
                    || config.policy(),
                );
                let (process, policy) = match dequeued {
                    Some(p) => p,
                    None => return, // shutdown signalled while waiting
                };

                let outcome = process.execute_slice(core_id, delay_per_exec, policy.quantum(), &shutdown);
                let completed = matches!(outcome, crate::process::SliceOutcome::Completed);
                state.complete_slice(core_id, process, completed);
            }
        })
        .expect("failed to spawn core worker thread")
}
