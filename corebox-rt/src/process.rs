//! A guest [`Process`]: its program, variable store, log buffer, and the
//! slice-bounded instruction executor (spec §3, §4.1).
//!
//! Mutable state lives behind one [`Mutex`] so a worker thread can run a
//! slice while the scheduler façade concurrently reads it for a status
//! snapshot — grounded on the `Mutex`-guarded-inner-struct pattern in
//! `lumen-runtime::process::ProcessControlBlock`.

use crate::instruction::Instruction;
use chrono::Local;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Outcome of a single bounded run through a process's program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOutcome {
    /// The program ran to completion.
    Completed,
    /// The quantum was exhausted before the program finished.
    Preempted,
    /// Shutdown was signalled mid-slice.
    Halted,
}

/// The derived lifecycle state of a process (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Ready,
    Running,
    Finished,
}

struct ProcessInner {
    program_counter: usize,
    memory: HashMap<String, u16>,
    logs: Vec<String>,
    assigned_core: Option<usize>,
    running: bool,
}

/// A single guest process: its immutable program plus the mutable
/// execution state a core worker advances.
pub struct Process {
    id: u64,
    name: String,
    creation_timestamp: String,
    program: Vec<Instruction>,
    inner: Mutex<ProcessInner>,
}

impl Process {
    /// Construct a new process at program counter 0, captured at the
    /// current wall-clock time.
    pub fn new(id: u64, name: String, program: Vec<Instruction>) -> Self {
        Self {
            id,
            name,
            creation_timestamp: now_formatted(),
            program,
            inner: Mutex::new(ProcessInner {
                program_counter: 0,
                memory: HashMap::new(),
                logs: Vec::new(),
                assigned_core: None,
                running: false,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creation_timestamp(&self) -> &str {
        &self.creation_timestamp
    }

    pub fn total_instructions(&self) -> usize {
        self.program.len()
    }

    pub fn program_counter(&self) -> usize {
        self.inner.lock().unwrap().program_counter
    }

    pub fn assigned_core(&self) -> Option<usize> {
        self.inner.lock().unwrap().assigned_core
    }

    /// `assigned_core`, formatted the way the status report wants it
    /// (spec §3: "last core id ... or 'none'").
    pub fn assigned_core_display(&self) -> String {
        match self.assigned_core() {
            Some(core) => core.to_string(),
            None => "none".to_string(),
        }
    }

    /// A copy of the log buffer accumulated so far.
    pub fn logs(&self) -> Vec<String> {
        self.inner.lock().unwrap().logs.clone()
    }

    /// A copy of the variable store.
    pub fn memory_snapshot(&self) -> HashMap<String, u16> {
        self.inner.lock().unwrap().memory.clone()
    }

    /// The derived lifecycle state (spec §4.7). A process is never
    /// observed as `Finished` while it is mid-slice on a core even if its
    /// program counter has already reached the end — the `running` flag
    /// wins until `execute_slice` returns.
    pub fn state(&self) -> ProcessState {
        let inner = self.inner.lock().unwrap();
        if inner.running {
            ProcessState::Running
        } else if inner.program_counter >= self.program.len() {
            ProcessState::Finished
        } else {
            ProcessState::Ready
        }
    }

    /// Run up to `quantum` top-level instructions (or to completion if
    /// `quantum == 0`, i.e. FCFS), stopping early on shutdown.
    ///
    /// `delay_per_exec` busy-spin iterations are burned after each executed
    /// top-level instruction to model guest CPU cycles (spec §4.1) — this
    /// must not be optimized away, hence [`std::hint::black_box`].
    pub fn execute_slice(
        &self,
        core_id: usize,
        delay_per_exec: u64,
        quantum: u32,
        shutdown: &AtomicBool,
    ) -> SliceOutcome {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.assigned_core = Some(core_id);
            inner.running = true;
        }

        let mut executed = 0u32;
        let outcome = loop {
            if shutdown.load(Ordering::Acquire) {
                break SliceOutcome::Halted;
            }

            let pc = self.inner.lock().unwrap().program_counter;
            if pc >= self.program.len() {
                break SliceOutcome::Completed;
            }

            let ins = self.program[pc].clone();
            {
                let mut inner = self.inner.lock().unwrap();
                let ProcessInner { memory, logs, .. } = &mut *inner;
                run_instruction(&self.name, &ins, memory, logs);
                inner.program_counter += 1;
            }
            executed += 1;
            busy_spin(delay_per_exec);

            if shutdown.load(Ordering::Acquire) {
                break SliceOutcome::Halted;
            }
            if quantum > 0 && executed >= quantum {
                break SliceOutcome::Preempted;
            }
        };

        self.inner.lock().unwrap().running = false;
        outcome
    }
}

/// Burn `iterations` busy-spin cycles to model guest CPU work. Intentional:
/// must not be replaced with a sleep or elided (spec §4.1, §9).
fn busy_spin(iterations: u64) {
    let mut acc: u64 = 0;
    for i in 0..iterations {
        acc = std::hint::black_box(acc.wrapping_add(i));
    }
    std::hint::black_box(acc);
}

/// Execute one instruction, recursing into `FOR` bodies. Only the
/// top-level caller advances `program_counter`; nested instructions
/// (inside a `FOR` body) mutate `memory`/`logs` only.
fn run_instruction(
    proc_name: &str,
    ins: &Instruction,
    memory: &mut HashMap<String, u16>,
    logs: &mut Vec<String>,
) {
    match ins {
        Instruction::Print => {
            logs.push(log_line(&format!("PRINT: Hello world from {}!", proc_name)));
        }
        Instruction::Declare { args } => {
            if args.len() < 2 {
                return; // MALFORMED_INSTRUCTION: skipped, no state change, no log
            }
            let value = parse_u16(&args[1]);
            memory.insert(args[0].clone(), value);
            logs.push(log_line(&format!("DECLARE: {} = {}", args[0], value)));
        }
        Instruction::Add { args } => {
            if args.len() < 3 {
                return;
            }
            let a = resolve(&args[1], memory);
            let b = resolve(&args[2], memory);
            let result = ((a as u32) + (b as u32)).min(u16::MAX as u32) as u16;
            memory.insert(args[0].clone(), result);
            logs.push(log_line(&format!("ADD: {} = {}", args[0], result)));
        }
        Instruction::Subtract { args } => {
            if args.len() < 3 {
                return;
            }
            let a = resolve(&args[1], memory) as i64;
            let b = resolve(&args[2], memory) as i64;
            let result = (a - b).clamp(0, u16::MAX as i64) as u16;
            memory.insert(args[0].clone(), result);
            logs.push(log_line(&format!("SUBTRACT: {} = {}", args[0], result)));
        }
        Instruction::Sleep { args } => {
            if args.is_empty() {
                return;
            }
            let ticks: u64 = args[0].parse().unwrap_or(0);
            logs.push(log_line(&format!("SLEEP: slept {} ticks", ticks)));
            std::thread::sleep(Duration::from_millis(ticks * 10));
        }
        Instruction::For { repeat, body } => {
            logs.push(log_line(&format!("FOR: repeat {} times {{", repeat)));
            for i in 1..=*repeat {
                logs.push(log_line(&format!("  [FOR iteration {}]", i)));
                for child in body {
                    run_instruction(proc_name, child, memory, logs);
                }
            }
            logs.push(log_line("  [FOR loop ended] };"));
        }
    }
}

/// Resolve an argument: a known variable name returns its value, otherwise
/// it is parsed as a decimal integer truncated to 16 bits.
fn resolve(arg: &str, memory: &HashMap<String, u16>) -> u16 {
    memory.get(arg).copied().unwrap_or_else(|| parse_u16(arg))
}

fn parse_u16(s: &str) -> u16 {
    s.parse::<i64>().unwrap_or(0) as u16
}

fn log_line(payload: &str) -> String {
    format!("[{}] {}", now_formatted(), payload)
}

/// `MM/DD/YYYY HH:MM:SS`, local time, 24-hour (spec §6).
fn now_formatted() -> String {
    Local::now().format("%m/%d/%Y %H:%M:%S").to_string()
}
