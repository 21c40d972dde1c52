//! The scheduler façade (spec §4.6): lifecycle, policy selection, process
//! registries, and status snapshots.
//!
//! Grounded on `original_source/Scheduler.h`/`.cpp` for the public surface
//! (`initialize`/`start`/`stop`/`findProcessByName`/`createManualProcess`),
//! and on `lumen-runtime::scheduler::Scheduler` for the Rust shape: an
//! atomic `running`/shutdown flag, a `Drop` safety net, and named worker
//! threads joined on stop.

use crate::config::SchedulerConfig;
use crate::dispatcher::{process_name, spawn_dispatcher};
use crate::error::{Result, SchedulerError};
use crate::generator::ProgramGenerator;
use crate::policy::Policy;
use crate::process::Process;
use crate::queue::SchedulerState;
use crate::status::{ProcessSummary, Status};
use crate::worker::spawn_core_worker;

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Background threads spawned while the scheduler is running.
struct Handles {
    dispatcher: Option<JoinHandle<()>>,
    workers: Vec<JoinHandle<()>>,
}

/// The scheduler façade: owns configuration, lifecycle, and the shared
/// state core workers and the dispatcher operate on.
pub struct Scheduler {
    config: SchedulerConfig,
    state: Arc<SchedulerState>,
    shutdown: Arc<AtomicBool>,
    next_id: Arc<AtomicU64>,
    handles: Mutex<Handles>,
    running: AtomicBool,
    /// Deterministic seed for the manual-process generator, used by tests.
    seed: Option<u64>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let config = SchedulerConfig::default();
        Self {
            state: Arc::new(SchedulerState::new(config.num_cpu as usize)),
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            next_id: Arc::new(AtomicU64::new(1)),
            handles: Mutex::new(Handles { dispatcher: None, workers: Vec::new() }),
            running: AtomicBool::new(false),
            seed: None,
        }
    }

    /// A scheduler whose manual/dispatcher program generation is seeded,
    /// for deterministic tests (spec §4.5, §8).
    pub fn with_seed(seed: u64) -> Self {
        let mut s = Self::new();
        s.seed = Some(seed);
        s
    }

    /// Build a scheduler from an already-resolved configuration, bypassing
    /// file I/O — used by tests that need specific `num_cpu`/policy values.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            state: Arc::new(SchedulerState::new(config.num_cpu as usize)),
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            next_id: Arc::new(AtomicU64::new(1)),
            handles: Mutex::new(Handles { dispatcher: None, workers: Vec::new() }),
            running: AtomicBool::new(false),
            seed: None,
        }
    }

    /// Enqueue an already-built process directly, bypassing the program
    /// generator (spec §4.2: the ready queue accepts any process handle).
    pub fn submit(&self, process: Arc<Process>) {
        self.state.push(process);
    }

    /// Load `path` into the (immutable-once-loaded) configuration. Safe to
    /// call before `start`; idempotent. Not fatal if the file can't be
    /// opened — defaults are kept and the error is returned for the caller
    /// to log (spec §6, §7 CONFIG_IO).
    pub fn initialize(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let config = SchedulerConfig::load(path)?;
        self.state = Arc::new(SchedulerState::new(config.num_cpu as usize));
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Spawn `num_cpu` core workers and one dispatcher (spec §4.6).
    /// Illegal if already running (LIFECYCLE_VIOLATION). An unrecognized
    /// `scheduler` policy does NOT fail this call (spec §7
    /// UNKNOWN_POLICY is non-fatal): workers still spawn and re-resolve
    /// the policy on every dequeue attempt, logging and leaving processes
    /// queued until it resolves.
    pub fn start(&mut self) -> Result<()> {
        self.start_internal(true)
    }

    fn start_internal(&mut self, with_dispatcher: bool) -> Result<()> {
        if self.running.load(Ordering::Acquire) {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.shutdown.store(false, Ordering::Release);
        let mut handles = self.handles.lock().unwrap();
        let config = Arc::new(self.config.clone());

        for core_id in 0..config.num_cpu as usize {
            handles.workers.push(spawn_core_worker(
                core_id,
                Arc::clone(&self.state),
                Arc::clone(&self.shutdown),
                config.delay_per_exec,
                Arc::clone(&config),
            ));
        }

        if with_dispatcher {
            handles.dispatcher = Some(spawn_dispatcher(
                Arc::clone(&self.state),
                Arc::clone(&self.shutdown),
                Arc::clone(&self.next_id),
                self.config.batch_process_freq,
                self.config.min_ins,
                self.config.max_ins,
                self.seed,
            ));
        }

        self.running.store(true, Ordering::Release);
        Ok(())
    }

    /// Raise the shutdown flag, wake every waiter, and join the dispatcher
    /// then all workers (spec §4.6). Running processes are abandoned in
    /// place. Illegal if not running (LIFECYCLE_VIOLATION).
    pub fn stop(&mut self) -> Result<()> {
        if !self.running.load(Ordering::Acquire) {
            return Err(SchedulerError::NotRunning);
        }

        self.shutdown.store(true, Ordering::Release);
        self.state.notify_all();

        let mut handles = self.handles.lock().unwrap();
        if let Some(jh) = handles.dispatcher.take() {
            let _ = jh.join();
        }
        for jh in handles.workers.drain(..) {
            let _ = jh.join();
        }

        self.running.store(false, Ordering::Release);
        Ok(())
    }

    /// A consistent read of scheduler state for reporting (spec §4.6).
    pub fn snapshot(&self) -> Status {
        let running: Vec<ProcessSummary> =
            self.state.running_snapshot().iter().map(ProcessSummary::from_process).collect();
        let finished: Vec<ProcessSummary> =
            self.state.finished_snapshot().iter().map(ProcessSummary::from_process).collect();

        Status {
            num_cores: self.state.num_cores(),
            cores_used: self.state.cores_used(),
            running,
            finished,
        }
    }

    /// Search the running set then the finished set by name.
    pub fn find_process(&self, name: &str) -> Option<Arc<Process>> {
        self.state.find(name)
    }

    /// Build a process from generator settings and enqueue it. If the
    /// scheduler hasn't been started yet, lazily starts the core workers
    /// (without a dispatcher) so the process actually gets to run — mirrors
    /// `original_source/Scheduler.h`'s `start(bool withDispatcher=true)`.
    pub fn create_manual(&mut self, name: impl Into<String>) -> Arc<Process> {
        if !self.running.load(Ordering::Acquire) {
            let _ = self.start_internal(false);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut generator = match self.seed {
            Some(seed) => ProgramGenerator::from_seed(seed.wrapping_add(id)),
            None => ProgramGenerator::from_entropy(),
        };
        let length = generator.random_length(self.config.min_ins, self.config.max_ins);
        let program = generator.generate(length);
        let process = Arc::new(Process::new(id, name.into(), program));
        self.state.push(Arc::clone(&process));
        process
    }

    /// The dispatcher-style process name for a given id (exposed so the
    /// CLI can mirror it for manual processes if desired).
    pub fn dispatcher_style_name(id: u64) -> String {
        process_name(id)
    }

    /// The tagged policy the current configuration resolves to.
    pub fn policy(&self) -> Result<Policy> {
        self.config.policy()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if self.running.load(Ordering::Acquire) {
            let _ = self.stop();
        }
    }
}
