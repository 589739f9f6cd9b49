use crate::ActuationError;
use std::process::Command;

/// Runs external display-server tools.
pub trait CommandRunner {
    /// Run `program` with `args` and return its standard output.
    fn run(&mut self, program: &str, args: &[&str]) -> Result<String, ActuationError>;
}

/// Spawns real processes and waits for them.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<String, ActuationError> {
        tracing::trace!(program, ?args, "Running command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ActuationError::Io {
                what: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ActuationError::CommandFailed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
