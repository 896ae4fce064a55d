use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::{RenderError, Result};

/// Run a shell-ready command string to completion and return its exit code.
///
/// The string is split with POSIX word rules, so quoting in the command
/// behaves as it would under `sh`. The child inherits stdin, stdout, and
/// stderr; nothing is captured.
pub fn execute(command: &str) -> Result<i32> {
    let words = shell_words::split(command).map_err(|e| RenderError::CommandParse {
        command: command.to_string(),
        reason: e.to_string(),
    })?;
    let Some((program, args)) = words.split_first() else {
        return Err(RenderError::CommandParse {
            command: command.to_string(),
            reason: "empty command".into(),
        });
    };

    debug!(%program, argc = args.len(), "spawning");
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| RenderError::Spawn {
            command: program.clone(),
            source,
        })?;

    Ok(exit_code(status))
}

/// Exit code of a finished process; signal deaths map to `128 + signal` like a shell.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
