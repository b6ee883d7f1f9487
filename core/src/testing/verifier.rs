use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use fsutil::ScratchFile;
use tokio::process::Command;

use super::{
    error::{Error, Result},
    testcase::Case,
};

/// Token whose presence anywhere in the checker's stdout means acceptance.
pub const CHECKER_ACCEPT_TOKEN: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    /// Extra text to append to the case diagnostic. Empty for exact-match.
    pub explanation: String,
}

impl Verdict {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            explanation: String::new(),
        }
    }

    pub fn rejected(explanation: impl Into<String>) -> Self {
        Self {
            accepted: false,
            explanation: explanation.into(),
        }
    }
}

/// Decides whether the stdout of a cleanly exited run is acceptable for `case`.
#[async_trait]
pub trait Verify {
    async fn verify(&self, case: &Case, stdout: &str) -> Result<Verdict>;

    /// Releases whatever the strategy staged on disk. Called once, after the run.
    fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Verifier {
    ExactMatch,
    External(ExternalChecker),
}

#[derive(Debug, Clone)]
pub struct ExternalChecker {
    program: PathBuf,
    interpreter: Option<String>,
    scratch: ScratchFile,
}

impl Verifier {
    /// Picks the external checker if `checker` exists as a file, exact-match otherwise.
    pub fn detect(
        checker: impl AsRef<Path>,
        interpreter: Option<String>,
        scratch_file: impl Into<PathBuf>,
    ) -> Self {
        let checker = checker.as_ref();
        if checker.is_file() {
            log::info!("Verifying with external checker {:?}", checker);
            Self::External(ExternalChecker::new(checker, interpreter, scratch_file))
        } else {
            log::info!("No checker at {:?}; verifying by exact match", checker);
            Self::ExactMatch
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

#[async_trait]
impl Verify for Verifier {
    async fn verify(&self, case: &Case, stdout: &str) -> Result<Verdict> {
        match self {
            Self::ExactMatch => {
                let expected = reference_path(case)?;
                let truth = fsutil::read_to_string(expected)
                    .map_err(|e| Error::ReadReference(case.name().to_owned(), e))?;
                Ok(if exact_match(stdout, &truth) {
                    Verdict::accepted()
                } else {
                    Verdict::rejected("")
                })
            }
            Self::External(checker) => checker.check(case, stdout).await,
        }
    }

    fn cleanup(&self) -> Result<()> {
        match self {
            Self::ExactMatch => Ok(()),
            Self::External(checker) => checker.cleanup(),
        }
    }
}

/// Equality after trimming leading and trailing whitespace; inner whitespace is significant.
pub fn exact_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

fn reference_path(case: &Case) -> Result<&Path> {
    case.expected_path()
        .ok_or_else(|| Error::MissingReference(case.name().to_owned()))
}

impl ExternalChecker {
    pub fn new(
        program: impl Into<PathBuf>,
        interpreter: Option<String>,
        scratch_file: impl Into<PathBuf>,
    ) -> Self {
        let program = program.into();
        let interpreter = interpreter.or_else(|| {
            let is_py = program.extension().map_or(false, |ext| ext == "py");
            is_py.then(|| "python3".to_owned())
        });
        Self {
            program,
            interpreter,
            scratch: ScratchFile::new(scratch_file),
        }
    }

    fn command(&self) -> Command {
        // A bare relative name must not be looked up in $PATH.
        let program = if self.program.is_relative() {
            Path::new(".").join(&self.program)
        } else {
            self.program.clone()
        };
        match &self.interpreter {
            Some(interp) => {
                let mut cmd = Command::new(interp);
                cmd.arg(program);
                cmd
            }
            None => Command::new(program),
        }
    }

    async fn check(&self, case: &Case, stdout: &str) -> Result<Verdict> {
        let expected = reference_path(case)?;
        self.scratch.write(stdout).map_err(Error::StageCandidate)?;

        let output = self
            .command()
            .arg(case.input_path())
            .arg(self.scratch.path())
            .arg(expected)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                log::warn!("Failed to launch checker {:?}: {}", self.program, e);
                return Ok(Verdict::rejected(format!(
                    "Failed to launch checker {:?}: {}",
                    self.program, e
                )));
            }
        };

        let out = String::from_utf8_lossy(&output.stdout);
        let err = String::from_utf8_lossy(&output.stderr);
        if out.contains(CHECKER_ACCEPT_TOKEN) {
            return Ok(Verdict::accepted());
        }

        let mut explanation = out.into_owned();
        if !err.is_empty() {
            if !explanation.is_empty() {
                explanation.push('\n');
            }
            explanation.push_str(&err);
        }
        Ok(Verdict::rejected(explanation))
    }

    fn cleanup(&self) -> Result<()> {
        match self.scratch.remove() {
            Ok(removed) => {
                log::debug!("Scratch file {:?} removed={}", self.scratch.path(), removed);
                Ok(())
            }
            Err(e) => Err(Error::RemoveScratch(e)),
        }
    }
}
