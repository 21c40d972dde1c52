//! The startup banner (spec §4.9), grounded on
//! `original_source/csopesy-mo.cpp::printHeader`. Re-rendered on `clear`;
//! never shown inside a `screen -s`/`screen -r` sub-shell.

pub fn print_header() {
    println!("________________________________________________________");
    println!();
    println!("  COREBOX");
    println!();
    println!("Welcome to the corebox OS emulator!");
    println!();
    println!("Type 'exit' to quit, 'clear' to clear the screen");
    println!("________________________________________________________");
}
