//! Terminal status output for the maintenance CLI.

use ansi_term::Colour;
use std::fmt;

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Blue.bold().paint("[i]"), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Green.bold().paint("[ok]"), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Yellow.bold().paint("[!]"), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", Colour::Red.bold().paint("[x]"), msg);
}

/// Colour for an action column in entry listings.
pub fn action_colour(is_in: bool) -> Colour {
    if is_in {
        Colour::Green
    } else {
        Colour::Red
    }
}
