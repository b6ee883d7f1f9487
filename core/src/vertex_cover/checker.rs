use std::{collections::HashSet, fmt};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("Can not read solution size from model output file")]
    InvalidReferenceSize,

    #[error("Malformed edge on line {0} of the input file")]
    MalformedEdge(usize),
}

pub type Result<T> = std::result::Result<T, CheckError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverVerdict {
    Ok,
    MissingCandidate,
    /// `line` is the 1-based line of the first uncovered edge in the input file.
    EdgeNotCovered { line: usize },
    TooManyNodes { size: usize, optimum: i64 },
}

impl CoverVerdict {
    pub fn is_ok(&self) -> bool {
        *self == Self::Ok
    }

    /// Text printed by the checker: `OK`, or `WRONG` followed by the reason.
    pub fn report(&self) -> String {
        match self {
            Self::Ok => "OK".to_owned(),
            _ => format!("WRONG\n{}", self),
        }
    }
}

impl fmt::Display for CoverVerdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::MissingCandidate => write!(f, "User output file does not exist"),
            Self::EdgeNotCovered { line } => write!(f, "Edge not covered (input line {})", line),
            Self::TooManyNodes { size, optimum } => {
                write!(f, "Too many nodes ({} > {})", size, optimum)
            }
        }
    }
}

/// Everything needed to judge one candidate cover. Built per case and dropped after the verdict.
#[derive(Debug, Clone)]
pub struct VerificationContext<'g> {
    graph: &'g str,
    candidate: HashSet<String>,
    optimum: i64,
}

impl<'g> VerificationContext<'g> {
    pub fn new(graph: &'g str, candidate: HashSet<String>, optimum: i64) -> Self {
        Self {
            graph,
            candidate,
            optimum,
        }
    }

    /// Builds the context from raw file contents, reading the reference size first.
    pub fn from_texts(graph: &'g str, candidate: &str, reference: &str) -> Result<Self> {
        let optimum = parse_reference_size(reference)?;
        Ok(Self::new(graph, parse_candidate(candidate), optimum))
    }

    pub fn candidate(&self) -> &HashSet<String> {
        &self.candidate
    }

    /// Feasibility first (stopping at the first uncovered edge), then the size bound.
    pub fn verify(&self) -> Result<CoverVerdict> {
        for (i, line) in self.graph.lines().enumerate().skip(1) {
            let mut endpoints = line.split_whitespace();
            let Some(u) = endpoints.next() else {
                continue;
            };
            let v = endpoints.next().ok_or(CheckError::MalformedEdge(i + 1))?;
            if !self.candidate.contains(u) && !self.candidate.contains(v) {
                return Ok(CoverVerdict::EdgeNotCovered { line: i + 1 });
            }
        }

        let size = self.candidate.len();
        if i64::try_from(size).map_or(true, |n| n > self.optimum) {
            return Ok(CoverVerdict::TooManyNodes {
                size,
                optimum: self.optimum,
            });
        }
        Ok(CoverVerdict::Ok)
    }
}

/// One vertex id per line; anything after `#` is a comment; blank lines are ignored.
pub fn parse_candidate(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

/// The first line of the reference output holds the optimal cover size.
pub fn parse_reference_size(text: &str) -> Result<i64> {
    text.lines()
        .next()
        .and_then(|line| line.trim().parse().ok())
        .ok_or(CheckError::InvalidReferenceSize)
}

#[cfg(test)]
mod test {
    use super::*;

    const PATH_ABC: &str = "3 2\nA B\nB C\n";

    fn verify(candidate: &str, optimum: i64) -> CoverVerdict {
        VerificationContext::new(PATH_ABC, parse_candidate(candidate), optimum)
            .verify()
            .unwrap()
    }

    #[test]
    fn missing_candidate_report() {
        assert_eq!(
            CoverVerdict::MissingCandidate.report(),
            "WRONG\nUser output file does not exist"
        );
    }

    #[test]
    fn optimal_cover_is_ok() {
        assert_eq!(verify("B\n", 1), CoverVerdict::Ok);
        assert_eq!(verify("B\n", 1).report(), "OK");
    }

    #[test]
    fn feasible_but_oversized_cover_has_too_many_nodes() {
        let v = verify("A\nC\n", 1);
        assert_eq!(v, CoverVerdict::TooManyNodes { size: 2, optimum: 1 });
        assert!(v.report().starts_with("WRONG\nToo many nodes"));
    }

    #[test]
    fn uncovered_edge_is_reported_before_size() {
        let v = verify("A\n", 1);
        assert_eq!(v, CoverVerdict::EdgeNotCovered { line: 3 });
        assert!(v.report().starts_with("WRONG\nEdge not covered"));

        // Also too large for the bound, but the edge check still wins.
        assert_eq!(verify("A\nX\nY\n", 1), CoverVerdict::EdgeNotCovered { line: 3 });
    }

    #[test]
    fn only_the_first_uncovered_edge_is_reported() {
        let graph = "4 3\n1 2\n3 4\n2 3\n";
        let ctx = VerificationContext::new(graph, parse_candidate(""), 2);
        assert_eq!(ctx.verify().unwrap(), CoverVerdict::EdgeNotCovered { line: 2 });
    }

    #[test]
    fn edge_order_does_not_matter() {
        let shuffled = "3 2\nC B\nB A\n";
        let ctx = VerificationContext::new(shuffled, parse_candidate("B"), 1);
        assert_eq!(ctx.verify().unwrap(), CoverVerdict::Ok);
    }

    #[test]
    fn candidate_parsing_strips_comments_blanks_and_duplicates() {
        let set = parse_candidate("B # hub\n\n  B\n#only comment\nC\t\n");
        let mut ids: Vec<_> = set.into_iter().collect();
        ids.sort();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn ids_are_opaque_strings() {
        let graph = "2 1\n1 2\n";
        let ctx = VerificationContext::new(graph, parse_candidate("01\n"), 1);
        assert_eq!(ctx.verify().unwrap(), CoverVerdict::EdgeNotCovered { line: 2 });
    }

    #[test]
    fn reference_size_comes_from_first_line() {
        assert_eq!(parse_reference_size(" 6 \n1\n2\n").unwrap(), 6);
        assert_eq!(parse_reference_size(""), Err(CheckError::InvalidReferenceSize));
        assert_eq!(parse_reference_size("six\n"), Err(CheckError::InvalidReferenceSize));
    }

    #[test]
    fn blank_edge_lines_are_skipped_and_half_edges_rejected() {
        let ctx = VerificationContext::new("3 2\nA B\n\nB C\n", parse_candidate("B"), 1);
        assert_eq!(ctx.verify().unwrap(), CoverVerdict::Ok);

        let ctx = VerificationContext::new("3 2\nA B\nC\n", parse_candidate("B"), 1);
        assert_eq!(ctx.verify().unwrap_err(), CheckError::MalformedEdge(3));
    }

    #[test]
    fn from_texts_reads_reference_first() {
        let err = VerificationContext::from_texts(PATH_ABC, "B\n", "n/a").unwrap_err();
        assert_eq!(err, CheckError::InvalidReferenceSize);

        let ctx = VerificationContext::from_texts(PATH_ABC, "B\n", "1\n").unwrap();
        assert_eq!(ctx.candidate().len(), 1);
        assert!(ctx.verify().unwrap().is_ok());
    }
}
