//! Interactive device confirmation for the daemon

use std::io::{self, BufRead, Write};

/// Ask on the terminal whether to connect to the device with `serial`.
/// Any read failure counts as "no".
pub fn confirm_device(serial: &str) -> bool {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout, serial)
}

pub fn confirm_with<R: BufRead, W: Write>(input: &mut R, output: &mut W, serial: &str) -> bool {
    if write!(output, "Connect to ZEI device \"{}\"? (y/n) ", serial)
        .and_then(|_| output.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => answer.trim_start().to_ascii_lowercase().starts_with('y'),
    }
}
