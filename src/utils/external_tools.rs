use crate::config::RenderedCommand;
use crate::error::{Error, Result};
use log::debug;
use std::fs::File;
use std::io;
use std::process::{Command, Stdio};

fn spawn_error(program: &str, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::ToolNotFound {
            tool: program.to_string(),
        }
    } else {
        Error::io(program, err)
    }
}

/// Fails with `ToolNotFound` if `program` cannot be spawned.
pub fn check_tool(program: &str) -> Result<()> {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(program, e))
        .map(|_| ())
}

/// Runs a rendered command to completion. Blocks with no timeout.
pub fn run(command: &RenderedCommand) -> Result<()> {
    debug!("Running {} {}", command.program, command.args.join(" "));

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stderr(Stdio::piped());
    match &command.stdout {
        Some(path) => {
            let file = File::create(path).map_err(|e| Error::io(path, e))?;
            cmd.stdout(file);
        }
        None => {
            cmd.stdout(Stdio::null());
        }
    }

    let output = cmd.output().map_err(|e| spawn_error(&command.program, e))?;
    if !output.status.success() {
        return Err(Error::External {
            tool: command.program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
