//! The interactive REPL main loop (spec §4.8, §6), grounded on
//! `original_source/csopesy-mo.cpp::enterMainLoop` for command dispatch and
//! the initialize-gate, and on `lumen-cli::repl::run_repl` for the
//! `rustyline` editor shape.

mod banner;
mod report;

use corebox_rt::Scheduler;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

fn main() {
    banner::print_header();

    let mut scheduler = Scheduler::new();
    let mut initialized = false;
    let mut rl = DefaultEditor::new().expect("failed to create line editor");

    loop {
        let line = match rl.readline("Enter a command: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Exit command recognized. Closing application.");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        };
        let _ = rl.add_history_entry(line.as_str());
        let command = line.trim();

        if !initialized {
            match command {
                "initialize" => {
                    initialize(&mut scheduler);
                    initialized = true;
                }
                "exit" => {
                    println!("Exit command recognized. Closing application.");
                    break;
                }
                _ => println!("Please initialize the emulator first by typing 'initialize'."),
            }
            continue;
        }

        if command == "exit" {
            println!("Exit command recognized. Closing application.");
            break;
        } else if command == "initialize" {
            initialize(&mut scheduler);
        } else if command == "view-config" {
            view_config(&scheduler);
        } else if let Some(name) = command.strip_prefix("screen -s ") {
            start_process(&mut scheduler, name.trim());
        } else if let Some(name) = command.strip_prefix("screen -r ") {
            read_process(&scheduler, name.trim());
        } else if command == "screen -ls" {
            println!("{}", report::render(&scheduler.snapshot()));
        } else if command == "scheduler-start" {
            println!("Scheduler-start command recognized. Starting scheduler...");
            if let Err(err) = scheduler.start() {
                println!("{err}");
            }
        } else if command == "scheduler-stop" {
            println!("Scheduler-stop command recognized. Stopping process generation...");
            if let Err(err) = scheduler.stop() {
                println!("{err}");
            }
        } else if command == "report-util" {
            match report::write_to_file(&scheduler.snapshot()) {
                Ok(()) => println!("Report written to csopesy-log.txt"),
                Err(err) => eprintln!("Error: unable to write csopesy-log.txt: {err}"),
            }
        } else if command == "clear" {
            banner::print_header();
        } else if command.is_empty() {
            continue;
        } else {
            println!("Unrecognized command.");
        }
    }
}

fn initialize(scheduler: &mut Scheduler) {
    println!("Initialize command recognized. Configuring OS Emulator...");
    if let Err(err) = scheduler.initialize("config.txt") {
        println!("{err}");
    }
}

fn view_config(scheduler: &Scheduler) {
    let config = scheduler.config();
    println!("Current Scheduler Configuration:");
    println!("Number of Cores: {}", config.num_cpu);
    println!("Scheduler Type: {}", config.scheduler);
    println!("Quantum Cycles: {}", config.quantum_cycles);
    println!("Batch Process Frequency: {}", config.batch_process_freq);
    println!("Min Instructions: {}", config.min_ins);
    println!("Max Instructions: {}", config.max_ins);
    println!("Delay Per Execution: {}", config.delay_per_exec);
}

/// `screen -s <name>`: create a process and drop into its sub-shell.
/// Never prints the banner (spec §6 big note: header is main-menu only).
fn start_process(scheduler: &mut Scheduler, name: &str) {
    if name.is_empty() {
        println!("Usage: screen -s <process name>");
        return;
    }
    let process = scheduler.create_manual(name.to_string());
    println!("Process {} created and added to the queue.", process.name());
    process_subshell(scheduler, name);
}

/// `screen -r <name>`: drop into an existing process's sub-shell.
fn read_process(scheduler: &Scheduler, name: &str) {
    if scheduler.find_process(name).is_none() {
        println!("Process {name} not found.");
        return;
    }
    println!("Process name: {name}");
    process_subshell(scheduler, name);
}

fn process_subshell(scheduler: &Scheduler, name: &str) {
    let mut rl = DefaultEditor::new().expect("failed to create line editor");
    loop {
        let line = match rl.readline(&format!("{name}> ")) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(_) => break,
        };
        match line.trim() {
            "process-smi" => print_process_smi(scheduler, name),
            "exit" => break,
            "" => continue,
            _ => println!("Unrecognized command."),
        }
    }
}

fn print_process_smi(scheduler: &Scheduler, name: &str) {
    let Some(process) = scheduler.find_process(name) else {
        println!("Process {name} not found.");
        return;
    };
    println!("Process name: {}", process.name());
    println!("ID: {}", process.id());
    println!("Logs:");
    for line in process.logs() {
        println!("{line}");
    }
    if process.program_counter() >= process.total_instructions() {
        println!("Finished!");
    } else {
        println!(
            "Current instruction line: {} / {}",
            process.program_counter(),
            process.total_instructions()
        );
    }
}
