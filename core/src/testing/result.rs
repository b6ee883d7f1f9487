use std::time::Duration;

/// How a subject process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitKind {
    Success,
    NonZero,
    Timeout,
    LaunchError,
}

/// Exit code reported for a process that could not be launched.
pub const LAUNCH_ERROR_CODE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub kind: ExitKind,
    /// `None` only for timeouts.
    pub code: Option<i32>,
    pub elapsed: Duration,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn timeout(elapsed: Duration) -> Self {
        Self {
            kind: ExitKind::Timeout,
            code: None,
            elapsed,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn launch_error(elapsed: Duration, message: impl Into<String>) -> Self {
        Self {
            kind: ExitKind::LaunchError,
            code: Some(LAUNCH_ERROR_CODE),
            elapsed,
            stdout: String::new(),
            stderr: message.into(),
        }
    }

    pub fn exited(code: i32, elapsed: Duration, stdout: String, stderr: String) -> Self {
        Self {
            kind: if code == 0 {
                ExitKind::Success
            } else {
                ExitKind::NonZero
            },
            code: Some(code),
            elapsed,
            stdout,
            stderr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum Status {
    #[strum(serialize = "OK")]
    Ok,
    #[strum(serialize = "Wrong")]
    Wrong,
    #[strum(serialize = "timelimit")]
    TimeLimit,
}

/// The judged result of one case, ready to be emitted as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub filename: String,
    pub status: Status,
    /// `None` for timeouts.
    pub elapsed: Option<Duration>,
    pub code: Option<i32>,
    pub diagnostic: String,
}

impl Outcome {
    pub fn time_limit(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: Status::TimeLimit,
            elapsed: None,
            code: None,
            diagnostic: String::new(),
        }
    }

    /// Diagnostic text with every newline replaced by a literal `\n`.
    pub fn escaped_diagnostic(&self) -> String {
        self.diagnostic.replace('\n', r"\n")
    }
}
