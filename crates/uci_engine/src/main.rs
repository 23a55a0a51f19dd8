//! Random-move UCI engine.
//!
//! Talks UCI over stdin/stdout. See [`engine`] for the scripting options.

mod engine;

use std::io::{self, BufRead, Write};
use std::thread;

use engine::{Action, RandomMover};

fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut mover = RandomMover::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };

        let lines = match mover.handle(line.trim()) {
            Action::Send(lines) => lines,
            Action::SendAfter(delay, lines) => {
                thread::sleep(delay);
                lines
            }
            Action::Exit => break,
        };

        for out in lines {
            if writeln!(stdout, "{out}").is_err() {
                return;
            }
        }
        if stdout.flush().is_err() {
            return;
        }
    }
}
