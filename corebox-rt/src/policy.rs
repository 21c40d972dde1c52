//! Scheduling policy as a tagged variant, not a string compared in the hot
//! path (spec §9 design note).

use crate::error::SchedulerError;

/// The active scheduling policy for a [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// First-come, first-served: a process runs to completion once dispatched.
    Fcfs,
    /// Round-robin with the given quantum (top-level instructions per slice).
    RoundRobin { quantum: u32 },
}

impl Policy {
    /// The quantum to pass to `Process::execute_slice` (0 means "no limit").
    pub fn quantum(&self) -> u32 {
        match self {
            Policy::Fcfs => 0,
            Policy::RoundRobin { quantum } => *quantum,
        }
    }

    /// Parse the `scheduler` config key (`"fcfs"` or `"rr"`), pairing it
    /// with the configured `quantum-cycles`.
    pub fn parse(raw: &str, quantum_cycles: u32) -> Result<Self, SchedulerError> {
        match raw {
            "fcfs" => Ok(Policy::Fcfs),
            "rr" => Ok(Policy::RoundRobin { quantum: quantum_cycles }),
            other => Err(SchedulerError::UnknownPolicy(other.to_string())),
        }
    }
}
