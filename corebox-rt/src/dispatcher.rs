//! The dispatcher: a single producer thread that synthesizes processes at
//! a configured rate (spec §4.4).
//!
//! Grounded on `original_source/Scheduler.cpp::dispatcher` for the tick
//! cadence and naming scheme; thread shape follows
//! `lumen-runtime::scheduler::Scheduler`'s named-thread-plus-shutdown-flag
//! convention.

use crate::generator::ProgramGenerator;
use crate::process::Process;
use crate::queue::SchedulerState;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Approximately one tick per 10ms (spec §5, open question 2).
const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Spawn the dispatcher thread.
///
/// `next_id` is shared with the façade so manually created processes and
/// dispatcher-generated ones draw from the same monotonically increasing
/// id sequence.
#[allow(clippy::too_many_arguments)]
pub fn spawn_dispatcher(
    state: Arc<SchedulerState>,
    shutdown: Arc<AtomicBool>,
    next_id: Arc<AtomicU64>,
    batch_process_freq: u32,
    min_ins: u32,
    max_ins: u32,
    seed: Option<u64>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("corebox-dispatcher".to_string())
        .spawn(move || {
            let mut generator = match seed {
                Some(s) => ProgramGenerator::from_seed(s),
                None => ProgramGenerator::from_entropy(),
            };
            let mut tick: u64 = 0;
            let batch_process_freq = batch_process_freq.max(1) as u64;

            while !shutdown.load(Ordering::Acquire) {
                thread::sleep(TICK_INTERVAL);
                if shutdown.load(Ordering::Acquire) {
                    return;
                }

                if tick.is_multiple_of(batch_process_freq) {
                    let id = next_id.fetch_add(1, Ordering::Relaxed);
                    let name = process_name(id);
                    let length = generator.random_length(min_ins, max_ins);
                    let program = generator.generate(length);
                    state.push(Arc::new(Process::new(id, name, program)));
                }

                tick = tick.wrapping_add(1);
            }
        })
        .expect("failed to spawn dispatcher thread")
}

/// `"Process_<2-digit-id>"`, zero-padded, widening beyond 99 (spec §4.4).
pub fn process_name(id: u64) -> String {
    format!("Process_{:02}", id)
}
