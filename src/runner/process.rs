use super::Invocation;
use crate::shared::PageError;
use std::io::{BufReader, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

/// Output of a captured invocation that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

fn command_for(invocation: &Invocation) -> Command {
    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    if let Some(cwd) = &invocation.cwd {
        command.current_dir(cwd);
    }
    command
}

fn spawn_error(invocation: &Invocation, source: std::io::Error) -> PageError {
    PageError::Spawn {
        program: invocation.program.clone(),
        source,
    }
}

/// Runs the invocation to completion with piped stdio. The input payload,
/// if any, is written on a separate thread so a script that prints before
/// reading its input cannot deadlock against us.
pub fn run_captured(invocation: &Invocation) -> Result<CapturedOutput, PageError> {
    let mut command = command_for(invocation);
    command
        .stdin(if invocation.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|err| spawn_error(invocation, err))?;

    let stdin_writer = match (child.stdin.take(), invocation.input.clone()) {
        (Some(mut stdin), Some(input)) => Some(thread::spawn(move || {
            let _ = stdin.write_all(input.as_bytes());
        })),
        _ => None,
    };
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| spawn_error(invocation, std::io::Error::other("missing stdout pipe")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| spawn_error(invocation, std::io::Error::other("missing stderr pipe")))?;

    let stdout_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        let mut reader = BufReader::new(stdout);
        let _ = reader.read_to_end(&mut buf);
        buf
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        let mut reader = BufReader::new(stderr);
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    });

    let status = child.wait().map_err(|err| spawn_error(invocation, err))?;
    if let Some(writer) = stdin_writer {
        let _ = writer.join();
    }
    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    if !status.success() {
        return Err(PageError::script_execution(status.code(), &stderr));
    }
    Ok(CapturedOutput {
        stdout,
        stderr,
        exit_code: status.code(),
    })
}

/// Runs the invocation attached to the real terminal. Blocks until the
/// child exits.
pub fn run_interactive(invocation: &Invocation) -> Result<ExitStatus, PageError> {
    command_for(invocation)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|err| spawn_error(invocation, err))
}

/// Like [`run_interactive`] but with output discarded, for silent exec
/// actions.
pub fn run_discarding_output(invocation: &Invocation) -> Result<ExitStatus, PageError> {
    command_for(invocation)
        .stdin(Stdio::inherit())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|err| spawn_error(invocation, err))
}

/// Maps an interactive exit status onto the page error taxonomy.
pub fn check_status(status: ExitStatus) -> Result<(), PageError> {
    if status.success() {
        Ok(())
    } else {
        Err(PageError::script_execution(status.code(), ""))
    }
}
