use std::{fs::File, path::Path, process::Stdio, time::Duration};

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::{process::Command, time::Instant};

use super::result::ExecutionResult;

/// Runs the subject program once against one input file.
#[async_trait]
pub trait Execute {
    async fn execute(&self, input_file: &Path) -> ExecutionResult;
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    args: Vec<String>,
    time_limit: Duration,
}

impl ProcessRunner {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);

    /// `command` is split on whitespace into a program and its arguments; no shell is involved.
    pub fn new(command: &str) -> Self {
        let mut words = command.split_whitespace().map(str::to_owned);
        let program = words.next().unwrap_or_default();
        Self {
            program,
            args: words.collect(),
            time_limit: Self::DEFAULT_TIME_LIMIT,
        }
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn get_time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn get_program(&self) -> &str {
        &self.program
    }

    /// On timeout only the direct child is killed; processes it spawned without `exec` may outlive it.
    pub async fn run(&self, input_file: &Path) -> ExecutionResult {
        let start_at = Instant::now();
        match self.try_run(input_file, start_at).await {
            Ok(res) => res,
            Err(e) => {
                log::debug!("Launch error on {:?}: {:#}", input_file, e);
                ExecutionResult::launch_error(start_at.elapsed(), format!("{:#}", e))
            }
        }
    }

    async fn try_run(&self, input_file: &Path, start_at: Instant) -> anyhow::Result<ExecutionResult> {
        anyhow::ensure!(!self.program.is_empty(), "Empty command");

        let stdin = File::open(input_file)
            .with_context(|| format!("Failed to open input file {:?}", input_file))?;

        let mut proc = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn '{}'", self.program))?;
        let mut stdout = proc.stdout.take().context("Failed to open stdout")?;
        let mut stderr = proc.stderr.take().context("Failed to open stderr")?;

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let res = {
            let fut_stdout = tokio::io::copy(&mut stdout, &mut stdout_buf);
            let fut_stderr = tokio::io::copy(&mut stderr, &mut stderr_buf);
            let fut_exit_status = proc.wait();

            tokio::time::timeout(self.time_limit, async {
                tokio::try_join!(fut_stdout, fut_stderr, fut_exit_status)
                    .context("Failed to communicate with subprocess")
            })
            .await
        };
        let elapsed = start_at.elapsed();

        match res {
            Err(_) => {
                // kill() also waits, so the child is reaped before we return.
                proc.kill()
                    .await
                    .unwrap_or_else(|e| log::warn!("Failed to kill timed out process: {:#}", e));
                Ok(ExecutionResult::timeout(elapsed))
            }

            Ok(Err(e)) => Err(e),

            Ok(Ok((_, _, exit_status))) => Ok(ExecutionResult::exited(
                exit_code(exit_status),
                elapsed,
                String::from_utf8_lossy(&stdout_buf).into(),
                String::from_utf8_lossy(&stderr_buf).into(),
            )),
        }
    }
}

#[async_trait]
impl Execute for ProcessRunner {
    async fn execute(&self, input_file: &Path) -> ExecutionResult {
        self.run(input_file).await
    }
}

/// Exit code, or the negated signal number when the process was killed by a signal.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return -sig;
        }
    }
    super::result::LAUNCH_ERROR_CODE
}
