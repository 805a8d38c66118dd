use std::io::{self, BufRead, BufReader, Read};
use std::process::{Command, Stdio};

use tracing::debug;

const ABBREVIATE_OVER: usize = 45;
const ABBREVIATE_KEEP: usize = 20;
const FAILURE_TAIL_LINES: usize = 5;

/// Combined output of a finished child process, one entry per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub description: String,
    pub success: bool,
    pub code: Option<i32>,
    pub lines: Vec<String>,
}

impl CommandOutput {
    /// Summary for error messages: exit status plus the last few lines.
    pub fn failure_reason(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit code {code}"),
            None => "termination by signal".to_string(),
        };
        let tail_start = self.lines.len().saturating_sub(FAILURE_TAIL_LINES);
        let tail = self.lines[tail_start..].join("\n");
        if tail.is_empty() {
            format!("command {} failed with {status}", self.description)
        } else {
            format!("command {} failed with {status}:\n{tail}", self.description)
        }
    }
}

/// Runs `command` to completion with stdin closed. Stdout and stderr share
/// one pipe, so the captured lines keep the order the child wrote them in.
/// Every line is logged at debug level as soon as it is read. A spawn failure
/// is returned as the `io::Error`; a non-zero exit is reported in the output.
pub fn run_captured(command: &mut Command) -> io::Result<CommandOutput> {
    let description = describe_command(command);
    debug!("Running command {description}");

    let (reader, writer) = io::pipe()?;
    command
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    let spawned = command.spawn();
    // The command keeps its copies of the write end until replaced; without
    // this the reader never sees EOF.
    command.stdout(Stdio::null()).stderr(Stdio::null());
    let mut child = spawned?;

    let mut lines = Vec::new();
    let read = read_lines(reader, &mut lines);
    let status = child.wait()?;
    read?;

    let captured = CommandOutput {
        description,
        success: status.success(),
        code: status.code(),
        lines,
    };
    if !captured.success {
        debug!(
            "Complete output from command {}:\n{}\n----------------------------------------",
            captured.description,
            captured.lines.join("\n")
        );
    }
    Ok(captured)
}

fn read_lines(source: impl Read, lines: &mut Vec<String>) -> io::Result<()> {
    for line in BufReader::new(source).split(b'\n') {
        let line = line?;
        let text = String::from_utf8_lossy(&line).trim_end().to_string();
        debug!("{text}");
        lines.push(text);
    }
    Ok(())
}

pub fn describe_command(command: &Command) -> String {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut parts = vec![abbreviate_part(&program)];
    parts.extend(
        command
            .get_args()
            .map(|arg| abbreviate_part(&arg.to_string_lossy())),
    );
    parts.join(" ")
}

fn abbreviate_part(part: &str) -> String {
    let chars = part.chars().collect::<Vec<_>>();
    let shortened = if chars.len() > ABBREVIATE_OVER {
        let head = chars[..ABBREVIATE_KEEP].iter().collect::<String>();
        let tail = chars[chars.len() - ABBREVIATE_KEEP..]
            .iter()
            .collect::<String>();
        format!("{head}...{tail}")
    } else {
        part.to_string()
    };

    if shortened.contains([' ', '\n', '"', '\'']) {
        format!("\"{}\"", shortened.replace('"', "\\\""))
    } else {
        shortened
    }
}
