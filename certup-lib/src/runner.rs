use crate::{error::*, log::*};
use async_trait::async_trait;
use std::{path::Path, process::Stdio};

/* ------------------------------------------------ */
/// Captured result of a finished external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  pub success: bool,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  /// Merged view of both streams, for tools that report on either one
  pub fn combined(&self) -> String {
    format!("{}{}", self.stdout, self.stderr)
  }
}

/* ------------------------------------------------ */
#[async_trait]
/// Execution boundary to the external collaborators (cloud CLI, ACME client,
/// TLS toolkit). Everything these tools do internally is out of scope here.
pub trait CommandRunner: Send + Sync {
  /// Run a command to completion with captured stdout/stderr
  async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

  /// Run a command with inherited stdio in the given working directory.
  /// Used for the operator-facing dns-01 prompt: the call returns only once
  /// the external tool finishes, which can be an indefinite wait on an
  /// out-of-band action.
  async fn run_interactive(&self, program: &str, args: &[&str], cwd: &Path) -> Result<bool>;
}

/* ------------------------------------------------ */
/// Production runner spawning real processes via tokio
#[derive(Debug, Clone, Default)]
pub struct ExecRunner;

#[async_trait]
impl CommandRunner for ExecRunner {
  async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
    debug!("exec: {} {}", program, args.join(" "));
    let output = tokio::process::Command::new(program)
      .args(args)
      .stdin(Stdio::null())
      .output()
      .await?;
    Ok(CommandOutput {
      success: output.status.success(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }

  async fn run_interactive(&self, program: &str, args: &[&str], cwd: &Path) -> Result<bool> {
    debug!("exec (interactive): {} {}", program, args.join(" "));
    // kill_on_drop so a timed-out wait does not leave the interactive child
    // running detached with our stdio
    let status = tokio::process::Command::new(program)
      .args(args)
      .current_dir(cwd)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .kill_on_drop(true)
      .status()
      .await?;
    Ok(status.success())
  }
}

/* ------------------------------------------------ */

/* ------------------------------------------------ */
#[cfg(test)]
pub(crate) mod mock {
  use super::*;
  use std::{
    path::PathBuf,
    sync::Mutex,
    time::Duration,
  };

  /// One recorded call through the boundary
  #[derive(Debug, Clone, PartialEq, Eq)]
  pub(crate) struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
  }

  impl Invocation {
    pub(crate) fn line(&self) -> String {
      format!("{} {}", self.program, self.args.join(" "))
    }
  }

  type Script = Box<dyn Fn(&Invocation) -> Result<CommandOutput> + Send + Sync>;

  /// Scripted runner recording every invocation
  pub(crate) struct MockRunner {
    calls: Mutex<Vec<Invocation>>,
    script: Script,
    pub(crate) interactive_delay: Option<Duration>,
  }

  impl MockRunner {
    pub(crate) fn new<F>(script: F) -> Self
    where
      F: Fn(&Invocation) -> Result<CommandOutput> + Send + Sync + 'static,
    {
      Self {
        calls: Mutex::new(Vec::new()),
        script: Box::new(script),
        interactive_delay: None,
      }
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
      self.calls.lock().unwrap().clone()
    }

    /// Recorded call lines matching a substring
    pub(crate) fn calls_matching(&self, needle: &str) -> Vec<String> {
      self
        .calls()
        .iter()
        .map(|i| i.line())
        .filter(|l| l.contains(needle))
        .collect()
    }

    fn record(&self, invocation: Invocation) {
      self.calls.lock().unwrap().push(invocation);
    }
  }

  pub(crate) fn ok_output(stdout: &str) -> CommandOutput {
    CommandOutput {
      success: true,
      stdout: stdout.to_string(),
      stderr: String::new(),
    }
  }

  pub(crate) fn failed_output(stderr: &str) -> CommandOutput {
    CommandOutput {
      success: false,
      stdout: String::new(),
      stderr: stderr.to_string(),
    }
  }

  #[async_trait]
  impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
      let invocation = Invocation {
        program: program.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        cwd: None,
      };
      self.record(invocation.clone());
      (self.script)(&invocation)
    }

    async fn run_interactive(&self, program: &str, args: &[&str], cwd: &Path) -> Result<bool> {
      if let Some(delay) = self.interactive_delay {
        tokio::time::sleep(delay).await;
      }
      let invocation = Invocation {
        program: program.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        cwd: Some(cwd.to_path_buf()),
      };
      self.record(invocation.clone());
      (self.script)(&invocation).map(|o| o.success)
    }
  }
}
