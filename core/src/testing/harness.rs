use std::{collections::HashMap, io::Write};

use super::{
    error::Result,
    record::RecordWriter,
    result::{ExitKind, Outcome, Status},
    runner::Execute,
    testcase::{Case, Group},
    verifier::Verify,
};

pub const NONZERO_EXIT_NOTE: &str = "Non-zero exit code";

/// What to do after a case has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    NextCase,
    StopGroup,
    StopRun,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<Outcome>,
    /// Set when a wrong answer halted the run before all groups were processed.
    pub halted: bool,
    /// Groups abandoned because their timeout budget ran out.
    pub abandoned_groups: usize,
}

impl RunSummary {
    pub fn count_by_status(&self) -> HashMap<Status, usize> {
        self.outcomes.iter().fold(HashMap::new(), |mut count, o| {
            *count.entry(o.status).or_default() += 1;
            count
        })
    }

    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.status == Status::Ok)
    }
}

/// Drives groups of cases through an executor and a verifier, one case at a time.
#[derive(Debug, Clone)]
pub struct Harness<E, V> {
    executor: E,
    verifier: V,
    max_timeouts: usize,
}

impl<E, V> Harness<E, V>
where
    E: Execute + Sync,
    V: Verify + Sync,
{
    pub const DEFAULT_MAX_TIMEOUTS: usize = 10;

    pub fn new(executor: E, verifier: V) -> Self {
        Self {
            executor,
            verifier,
            max_timeouts: Self::DEFAULT_MAX_TIMEOUTS,
        }
    }

    /// Number of timeouts a group may accumulate before its remaining cases are skipped.
    pub fn max_timeouts(mut self, n: usize) -> Self {
        self.max_timeouts = n;
        self
    }

    /// Judges every group in order, streaming one record per resolved case.
    /// The verifier's scratch state is cleaned up on every exit path.
    pub async fn run<W: Write>(
        &self,
        groups: &[Group],
        records: &mut RecordWriter<W>,
    ) -> Result<RunSummary> {
        let res = self.run_groups(groups, records).await;
        let cleaned = self.verifier.cleanup();
        let summary = res?;
        cleaned?;
        Ok(summary)
    }

    async fn run_groups<W: Write>(
        &self,
        groups: &[Group],
        records: &mut RecordWriter<W>,
    ) -> Result<RunSummary> {
        records.header()?;

        let mut summary = RunSummary::default();
        'groups: for group in groups {
            log::debug!("Group {} ({} cases)", group.key, group.cases.len());
            let mut timeouts = 0;

            for case in &group.cases {
                let outcome = self.judge(case).await?;
                records.emit(&outcome)?;
                let flow = self.advance(&outcome, &mut timeouts);
                summary.outcomes.push(outcome);

                match flow {
                    Flow::NextCase => {}
                    Flow::StopGroup => {
                        log::warn!(
                            "Group {}: {} timeouts reached, skipping the rest of the group",
                            group.key,
                            timeouts
                        );
                        summary.abandoned_groups += 1;
                        break;
                    }
                    Flow::StopRun => {
                        log::info!("Wrong answer on {}, stopping", case.name());
                        summary.halted = true;
                        break 'groups;
                    }
                }
            }
        }
        Ok(summary)
    }

    fn advance(&self, outcome: &Outcome, timeouts: &mut usize) -> Flow {
        match outcome.status {
            Status::Ok => Flow::NextCase,
            Status::Wrong => Flow::StopRun,
            Status::TimeLimit => {
                *timeouts += 1;
                if *timeouts >= self.max_timeouts {
                    Flow::StopGroup
                } else {
                    Flow::NextCase
                }
            }
        }
    }

    /// Runs and verifies one case. Only configuration problems surface as `Err`.
    pub async fn judge(&self, case: &Case) -> Result<Outcome> {
        let run = self.executor.execute(case.input_path()).await;
        log::debug!("{}: {:?} in {:?}", case.name(), run.kind, run.elapsed);

        let mut diagnostic = run.stderr;
        let status = match run.kind {
            ExitKind::Timeout => return Ok(Outcome::time_limit(case.name())),
            ExitKind::Success => {
                let verdict = self.verifier.verify(case, &run.stdout).await?;
                if verdict.accepted {
                    Status::Ok
                } else {
                    if !verdict.explanation.is_empty() {
                        diagnostic.push('\n');
                        diagnostic.push_str(&verdict.explanation);
                    }
                    Status::Wrong
                }
            }
            ExitKind::NonZero | ExitKind::LaunchError => {
                diagnostic.push('\n');
                diagnostic.push_str(NONZERO_EXIT_NOTE);
                Status::Wrong
            }
        };

        Ok(Outcome {
            filename: case.name().to_owned(),
            status,
            elapsed: Some(run.elapsed),
            code: run.code,
            diagnostic,
        })
    }
}

#[cfg(test)]
mod test {
    use std::{
        path::Path,
        sync::{
            atomic::{AtomicBool, Ordering},
            Mutex,
        },
        time::Duration,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::testing::{CaseGrouper, Error, ExecutionResult, Verdict};

    /// Answers by input filename: `tle` times out, `re` exits 1, `wa` prints a wrong answer.
    #[derive(Default)]
    struct FakeExecutor {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Execute for FakeExecutor {
        async fn execute(&self, input_file: &Path) -> ExecutionResult {
            let name = input_file.file_name().unwrap().to_string_lossy().into_owned();
            self.calls.lock().unwrap().push(name.clone());
            let t = Duration::from_millis(10);
            if name.contains("tle") {
                ExecutionResult::timeout(t)
            } else if name.contains("re") {
                ExecutionResult::exited(1, t, "ok".into(), "boom".into())
            } else if name.contains("wa") {
                ExecutionResult::exited(0, t, "wrong".into(), "".into())
            } else {
                ExecutionResult::exited(0, t, "ok".into(), "".into())
            }
        }
    }

    #[derive(Default)]
    struct FakeVerifier {
        cleaned: AtomicBool,
    }

    #[async_trait]
    impl Verify for FakeVerifier {
        async fn verify(&self, _case: &Case, stdout: &str) -> Result<Verdict> {
            Ok(if stdout == "ok" {
                Verdict::accepted()
            } else {
                Verdict::rejected("checker says no")
            })
        }

        fn cleanup(&self) -> Result<()> {
            self.cleaned.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MissingReference;

    #[async_trait]
    impl Verify for MissingReference {
        async fn verify(&self, case: &Case, _stdout: &str) -> Result<Verdict> {
            Err(Error::MissingReference(case.name().to_owned()))
        }
    }

    fn groups(names: &[&str]) -> Vec<Group> {
        let cases = names
            .iter()
            .map(|&n| Case::new(n, Path::new("in").join(n), None))
            .collect();
        CaseGrouper::partition(cases)
    }

    async fn run(
        harness: &Harness<FakeExecutor, FakeVerifier>,
        names: &[&str],
    ) -> (RunSummary, Vec<String>) {
        let mut records = RecordWriter::new(Vec::new());
        let summary = harness.run(&groups(names), &mut records).await.unwrap();
        let out = String::from_utf8(records.into_inner()).unwrap();
        (summary, out.lines().map(str::to_owned).collect())
    }

    fn calls(h: &Harness<FakeExecutor, FakeVerifier>) -> Vec<String> {
        h.executor.calls.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn all_groups_run_in_order() {
        let h = Harness::new(FakeExecutor::default(), FakeVerifier::default());
        let (summary, lines) = run(&h, &["2a.in", "1b.in", "1a.in"]).await;

        assert_eq!(calls(&h), vec!["1a.in", "1b.in", "2a.in"]);
        assert_eq!(lines[0], "file,status,time,return,stderr");
        assert_eq!(lines[1], "1a.in,OK,0.010,0,");
        assert_eq!(lines.len(), 4);
        assert!(summary.all_ok());
        assert!(!summary.halted);
        assert!(h.verifier.cleaned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn timeout_budget_abandons_only_the_group() {
        let h = Harness::new(FakeExecutor::default(), FakeVerifier::default()).max_timeouts(2);
        let names = [
            "1a-tle.in",
            "1b-tle.in",
            "1c-tle.in",
            "1d-tle.in",
            "2a.in",
            "2b.in",
        ];
        let (summary, lines) = run(&h, &names).await;

        assert_eq!(calls(&h), vec!["1a-tle.in", "1b-tle.in", "2a.in", "2b.in"]);
        assert_eq!(lines[1], "1a-tle.in,timelimit,,,");
        assert_eq!(lines[2], "1b-tle.in,timelimit,,,");
        assert_eq!(lines.len(), 5);
        assert_eq!(summary.abandoned_groups, 1);
        assert_eq!(summary.count_by_status()[&Status::TimeLimit], 2);
        assert!(!summary.halted);
    }

    #[tokio::test]
    async fn timeouts_are_counted_per_group_not_consecutively() {
        let h = Harness::new(FakeExecutor::default(), FakeVerifier::default()).max_timeouts(2);
        let (summary, _) = run(&h, &["1a-tle.in", "1b.in", "1c-tle.in", "1d.in"]).await;

        assert_eq!(calls(&h), vec!["1a-tle.in", "1b.in", "1c-tle.in"]);
        assert_eq!(summary.abandoned_groups, 1);
    }

    #[tokio::test]
    async fn wrong_answer_halts_every_later_group() {
        let h = Harness::new(FakeExecutor::default(), FakeVerifier::default());
        let names = ["1a.in", "1b-wa.in", "1c.in", "2a.in", "2b.in", "3a.in", "3b.in"];
        let (summary, lines) = run(&h, &names).await;

        assert_eq!(calls(&h), vec!["1a.in", "1b-wa.in"]);
        assert_eq!(lines.last().unwrap(), r"1b-wa.in,Wrong,0.010,0,\nchecker says no");
        assert!(summary.halted);
        assert!(h.verifier.cleaned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn nonzero_exit_is_wrong_without_verification() {
        let h = Harness::new(FakeExecutor::default(), FakeVerifier::default());
        let (summary, lines) = run(&h, &["1a.in", "2-re.in", "3a.in"]).await;

        assert_eq!(lines.last().unwrap(), r"2-re.in,Wrong,0.010,1,boom\nNon-zero exit code");
        assert_eq!(calls(&h), vec!["1a.in", "2-re.in"]);
        assert!(summary.halted);
    }

    #[tokio::test]
    async fn configuration_error_aborts_the_run() {
        let h = Harness::new(FakeExecutor::default(), MissingReference);
        let mut records = RecordWriter::new(Vec::new());
        let err = h.run(&groups(&["1.in"]), &mut records).await.unwrap_err();
        assert!(matches!(err, Error::MissingReference(_)));

        let out = String::from_utf8(records.into_inner()).unwrap();
        assert_eq!(out, "file,status,time,return,stderr\n");
    }
}
