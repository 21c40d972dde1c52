//! End-to-end scenario tests driven entirely through [`Scheduler`], covering
//! the concrete scenarios from spec §8 (S1, S2, S5, S6) at the façade level
//! rather than against individual modules.

use corebox_rt::instruction::Instruction;
use corebox_rt::process::Process;
use corebox_rt::{Scheduler, SchedulerConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn wait_until(mut predicate: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !predicate() {
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    true
}

/// S1 — FCFS single core: [[PRINT], [PRINT, PRINT]] finish in submission order.
#[test]
fn s1_fcfs_single_core_preserves_submission_order() {
    let mut scheduler = Scheduler::with_config(SchedulerConfig {
        num_cpu: 1,
        scheduler: "fcfs".to_string(),
        ..SchedulerConfig::default()
    });

    scheduler.start().unwrap();
    scheduler.submit(Arc::new(Process::new(1, "P1".into(), vec![Instruction::Print])));
    scheduler.submit(Arc::new(Process::new(
        2,
        "P2".into(),
        vec![Instruction::Print, Instruction::Print],
    )));

    assert!(wait_until(|| scheduler.snapshot().finished.len() >= 2, Duration::from_secs(5)));
    scheduler.stop().unwrap();

    let finished = scheduler.snapshot().finished;
    let p1 = finished.iter().find(|p| p.name == "P1").unwrap();
    let p2 = finished.iter().find(|p| p.name == "P2").unwrap();
    assert_eq!(p1.program_counter, 1);
    assert_eq!(p2.program_counter, 2);
}

/// S2 — RR preemption: PRINT x5 under quantum 2 finishes after three slices.
#[test]
fn s2_round_robin_preempts_at_quantum_boundary() {
    let mut scheduler = Scheduler::with_config(SchedulerConfig {
        num_cpu: 1,
        scheduler: "rr".to_string(),
        quantum_cycles: 2,
        ..SchedulerConfig::default()
    });

    scheduler.start().unwrap();
    scheduler.submit(Arc::new(Process::new(1, "P1".into(), vec![Instruction::Print; 5])));

    assert!(wait_until(|| scheduler.snapshot().finished.len() == 1, Duration::from_secs(5)));
    scheduler.stop().unwrap();

    let finished = scheduler.snapshot().finished;
    assert_eq!(finished[0].program_counter, 5);
}

/// S5 (loose) — two cores, four processes, all finish and both cores see use.
#[test]
fn s5_two_cores_finish_all_processes() {
    let mut scheduler = Scheduler::with_config(SchedulerConfig {
        num_cpu: 2,
        scheduler: "fcfs".to_string(),
        ..SchedulerConfig::default()
    });

    scheduler.start().unwrap();
    for i in 1..=4u64 {
        scheduler.submit(Arc::new(Process::new(i, format!("P{i}"), vec![Instruction::Print; 10])));
    }

    assert!(wait_until(|| scheduler.snapshot().finished.len() == 4, Duration::from_secs(5)));
    scheduler.stop().unwrap();
    assert_eq!(scheduler.snapshot().finished.len(), 4);
}

/// S6 — stop quiescence: no new processes after stop returns, and the
/// running+finished totals stop changing.
#[test]
fn s6_stop_is_quiescent() {
    let mut scheduler = Scheduler::with_config(SchedulerConfig {
        batch_process_freq: 1,
        ..SchedulerConfig::default()
    });

    scheduler.start().unwrap();
    std::thread::sleep(Duration::from_millis(80));
    scheduler.stop().unwrap();

    let total_at_stop = scheduler.snapshot().running.len() + scheduler.snapshot().finished.len();
    std::thread::sleep(Duration::from_millis(80));
    let total_after = scheduler.snapshot().running.len() + scheduler.snapshot().finished.len();
    assert_eq!(total_at_stop, total_after, "no background activity after stop() returns");
    assert!(!scheduler.is_running());
}

/// create_manual lazily starts workers so a process created before any
/// explicit `start()` still finishes.
#[test]
fn create_manual_before_start_still_runs_to_completion() {
    let mut scheduler = Scheduler::with_seed(9);
    let process = scheduler.create_manual("manual");
    assert!(wait_until(|| scheduler.find_process(process.name()).is_some(), Duration::from_secs(5)));
    scheduler.stop().unwrap();
}
