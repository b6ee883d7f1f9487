pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use error::*;

use crate::config::JudgeConfig;
use crate::style;
use crate::testing::{CaseGrouper, Harness, ProcessRunner, RecordWriter, RunSummary, Verifier};
use crate::vertex_cover::{
    checker::{parse_candidate, parse_reference_size},
    minimum_vertex_cover, solver, CoverVerdict, Graph, VerificationContext,
};

/// Judges `command` against every testcase of the configured layout, streaming records to stdout.
pub async fn do_judge(command: &str, cfg: &JudgeConfig) -> Result<RunSummary> {
    let summary = judge_into(command, cfg, io::stdout()).await?;
    style::print_run_summary(&summary);
    Ok(summary)
}

pub async fn judge_into<W: Write>(command: &str, cfg: &JudgeConfig, sink: W) -> Result<RunSummary> {
    ensure!(!command.trim().is_empty(), "Empty subject command");

    let layout = &cfg.layout;
    let groups = CaseGrouper::new()
        .input_suffix(&layout.input_suffix)
        .output_suffix(&layout.output_suffix)
        .output_dir(&layout.output_dir)
        .group(&layout.input_dir)
        .context("Failed to find testcases")?;
    if groups.is_empty() {
        log::warn!(
            "No '*{}' testcases in {:?}",
            layout.input_suffix,
            layout.input_dir
        );
    }
    log::info!(
        "{} testcases in {} group(s)",
        groups.iter().map(|g| g.cases.len()).sum::<usize>(),
        groups.len()
    );

    let runner = ProcessRunner::new(command).time_limit(cfg.harness.time_limit_duration());
    let verifier = Verifier::detect(
        &cfg.checker.path,
        cfg.checker.interpreter.clone(),
        &cfg.checker.scratch_file,
    );
    let harness = Harness::new(runner, verifier).max_timeouts(cfg.harness.max_timeouts);

    log::info!("Running: {}", command);
    let mut records = RecordWriter::new(sink);
    let summary = harness.run(&groups, &mut records).await?;
    Ok(summary)
}

/// The external-checker side of the protocol for vertex cover problems.
pub fn check_vertex_cover(
    input_file: impl AsRef<Path>,
    candidate_file: impl AsRef<Path>,
    reference_file: impl AsRef<Path>,
) -> Result<CoverVerdict> {
    let candidate_file = candidate_file.as_ref();
    if !candidate_file.exists() {
        return Ok(CoverVerdict::MissingCandidate);
    }

    let reference = fsutil::read_to_string(&reference_file)?;
    let optimum = parse_reference_size(&reference)?;
    let candidate = parse_candidate(&fsutil::read_to_string(candidate_file)?);
    let graph = fsutil::read_to_string(&input_file)?;

    let verdict = VerificationContext::new(&graph, candidate, optimum)
        .verify()
        .with_context(|| format!("Invalid input file {:?}", input_file.as_ref()))?;
    log::debug!("Vertex cover verdict: {:?}", verdict);
    Ok(verdict)
}

/// Reads a graph and returns a minimum vertex cover, one 1-based id per line.
pub fn solve_vertex_cover(graph: &str) -> Result<String> {
    let g = Graph::parse(graph).context("Failed to parse graph")?;
    let cover = minimum_vertex_cover(&g);
    log::info!(
        "Minimum vertex cover of {} vertices: {}",
        g.num_vertices(),
        cover.len()
    );
    Ok(solver::format_cover(&cover))
}

pub fn init_config(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(JudgeConfig::FILENAME);
    ensure!(!path.exists(), "{:?} already exists", path);
    fsutil::write(&path, JudgeConfig::example_toml()?).context("Failed to write config")?;
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_files(dir: &Path, files: &[(&str, &str)]) {
        for (name, contents) in files {
            fsutil::write_with_mkdir(dir.join(name), contents).unwrap();
        }
    }

    #[test]
    fn check_follows_the_protocol() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_files(
            d,
            &[
                ("g.in", "3 2\nA B\nB C\n"),
                ("g.out", "1\n"),
                ("good.txt", "B # the hub\n"),
                ("big.txt", "A\nC\n"),
                ("bad.txt", "A\n"),
                ("broken.out", "one\n"),
            ],
        );

        let check = |cand: &str| check_vertex_cover(d.join("g.in"), d.join(cand), d.join("g.out"));
        assert_eq!(check("good.txt").unwrap(), CoverVerdict::Ok);
        assert!(matches!(check("big.txt").unwrap(), CoverVerdict::TooManyNodes { .. }));
        assert!(matches!(check("bad.txt").unwrap(), CoverVerdict::EdgeNotCovered { .. }));
        assert_eq!(check("missing.txt").unwrap(), CoverVerdict::MissingCandidate);

        let err = check_vertex_cover(d.join("g.in"), d.join("good.txt"), d.join("broken.out"))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Can not read solution size"));
    }

    #[test]
    fn solve_prints_one_based_ids() {
        assert_eq!(solve_vertex_cover("3 2\n1 2\n2 3\n").unwrap(), "2\n");
        assert!(solve_vertex_cover("2 1\n1 1\n").is_err());
    }

    #[test]
    fn init_writes_example_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_config(dir.path()).unwrap();
        let cfg = JudgeConfig::from_toml_file(path).unwrap();
        assert_eq!(cfg.harness.max_timeouts, 10);
        assert!(init_config(dir.path()).is_err());
    }
}
