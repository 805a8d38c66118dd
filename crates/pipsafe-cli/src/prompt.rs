use std::io::{self, BufRead, Write};

use pipsafe_installer::Confirm;

/// Asks on stdout and reads one answer line from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StdinPrompt;

impl Confirm for StdinPrompt {
    fn confirm(&self, question: &str) -> bool {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        ask(question, &mut stdin.lock(), &mut stdout)
    }
}

/// Empty input, EOF and read or write failures all answer no.
pub(crate) fn ask<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> bool {
    if write!(output, "{question} (y/Nn): ")
        .and_then(|()| output.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_affirmative(&answer),
    }
}

pub(crate) fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(&'y'))
}
