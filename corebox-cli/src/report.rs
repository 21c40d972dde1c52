//! Status report rendering (spec §6), grounded on
//! `original_source/Scheduler.cpp::printStatus`/`writeStatusToFile` — same
//! text shape, one writer for both the screen and `csopesy-log.txt`.

use corebox_rt::Status;
use std::fmt::Write as _;

/// Render a [`Status`] into the exact text format spec §6 describes.
/// Used for both `screen -ls` (to stdout) and `report-util` (to a file).
pub fn render(status: &Status) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "CPU Utilization: {}%", status.cpu_utilization_percent());
    let _ = writeln!(out, "Cores Used: {}", status.cores_used);
    let _ = writeln!(out, "Cores Available: {}", status.cores_available());
    let _ = writeln!(out, "________________________________________________________");
    let _ = writeln!(out);

    let _ = writeln!(out, "Running processes:");
    let _ = writeln!(out);
    for p in &status.running {
        let core = p.core.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string());
        let _ = writeln!(
            out,
            "{} | ({}) | Core:{} | {} / {}",
            p.name, p.timestamp, core, p.program_counter, p.total_instructions
        );
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Finished processes:");
    let _ = writeln!(out);
    for p in &status.finished {
        let _ = writeln!(
            out,
            "{} | ({}) | Finished | {}/{}",
            p.name, p.timestamp, p.total_instructions, p.total_instructions
        );
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "________________________________________________________");
    out
}

/// `report-util`: overwrite `csopesy-log.txt` with the same report text.
pub fn write_to_file(status: &Status) -> std::io::Result<()> {
    std::fs::write("csopesy-log.txt", render(status))
}
