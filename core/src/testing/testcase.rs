use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use super::error::{Error, Result};

/// Group key derived from the digits of a filename.
///
/// Kept as a normalised decimal string (no leading zeros, `"0"` for no digits)
/// so that `007` and `7` share a key and arbitrarily long digit runs never overflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn zero() -> Self {
        Self("0".to_owned())
    }

    /// Concatenates every ASCII digit found anywhere in `filename`.
    pub fn from_filename(filename: &str) -> Self {
        let digits: String = filename.chars().filter(char::is_ascii_digit).collect();
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self::zero()
        } else {
            Self(trimmed.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    name: String,
    key: GroupKey,
    input: PathBuf,
    expected: Option<PathBuf>,
}

impl Case {
    pub fn new(
        name: impl Into<String>,
        input: impl Into<PathBuf>,
        expected: Option<PathBuf>,
    ) -> Self {
        let name = name.into();
        Self {
            key: GroupKey::from_filename(&name),
            name,
            input: input.into(),
            expected,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn input_path(&self) -> &Path {
        &self.input
    }

    pub fn expected_path(&self) -> Option<&Path> {
        self.expected.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: GroupKey,
    pub cases: Vec<Case>,
}

impl Group {
    pub fn names(&self) -> Vec<&str> {
        self.cases.iter().map(Case::name).collect()
    }
}

/// Discovers testcases in an input directory and partitions them into groups.
#[derive(Debug, Clone)]
pub struct CaseGrouper {
    input_suffix: String,
    output_suffix: String,
    output_dir: Option<PathBuf>,
}

impl CaseGrouper {
    pub const DEFAULT_INPUT_SUFFIX: &str = ".in";
    pub const DEFAULT_OUTPUT_SUFFIX: &str = ".out";

    pub fn new() -> Self {
        Self {
            input_suffix: Self::DEFAULT_INPUT_SUFFIX.to_owned(),
            output_suffix: Self::DEFAULT_OUTPUT_SUFFIX.to_owned(),
            output_dir: None,
        }
    }

    pub fn input_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.input_suffix = suffix.into();
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn group(&self, input_dir: impl AsRef<Path>) -> Result<Vec<Group>> {
        let input_dir = input_dir.as_ref();
        let names = fsutil::list_filenames(input_dir)
            .map_err(|e| Error::EnumerateCases(input_dir.to_owned(), e))?;
        let cases = names
            .into_iter()
            .filter(|name| name.ends_with(&self.input_suffix))
            .map(|name| {
                let expected = self.expected_path_for(&name);
                let input = input_dir.join(&name);
                Case::new(name, input, expected)
            })
            .collect();
        Ok(Self::partition(cases))
    }

    fn expected_path_for(&self, input_name: &str) -> Option<PathBuf> {
        let dir = self.output_dir.as_ref()?;
        let stem = input_name
            .strip_suffix(&self.input_suffix)
            .unwrap_or(input_name);
        Some(dir.join(format!("{}{}", stem, self.output_suffix)))
    }

    /// Sorts `cases` by name and buckets them by key, in first-seen key order.
    ///
    /// When no two cases share a key the whole set collapses into one group keyed `0`.
    /// This is all-or-nothing: one duplicate key anywhere switches to per-key groups.
    pub fn partition(mut cases: Vec<Case>) -> Vec<Group> {
        cases.sort_by(|a, b| a.name.cmp(&b.name));

        let mut groups: Vec<Group> = Vec::new();
        let mut index_of: HashMap<GroupKey, usize> = HashMap::new();
        let mut flatten = true;

        for case in &cases {
            match index_of.get(case.key()) {
                Some(&i) => {
                    flatten = false;
                    groups[i].cases.push(case.clone());
                }
                None => {
                    index_of.insert(case.key().clone(), groups.len());
                    groups.push(Group {
                        key: case.key().clone(),
                        cases: vec![case.clone()],
                    });
                }
            }
        }

        if flatten {
            if cases.is_empty() {
                return Vec::new();
            }
            log::debug!("All {} testcases have distinct keys; running flat", cases.len());
            return vec![Group {
                key: GroupKey::zero(),
                cases,
            }];
        }
        groups
    }
}

impl Default for CaseGrouper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cases(names: &[&str]) -> Vec<Case> {
        names
            .iter()
            .map(|&n| Case::new(n, Path::new("in").join(n), None))
            .collect()
    }

    fn layout(groups: &[Group]) -> Vec<(String, Vec<&str>)> {
        groups
            .iter()
            .map(|g| (g.key.to_string(), g.names()))
            .collect()
    }

    #[test]
    fn key_concatenates_all_digits() {
        assert_eq!(GroupKey::from_filename("vc1cg.in").as_str(), "1");
        assert_eq!(GroupKey::from_filename("a12b3.in").as_str(), "123");
        assert_eq!(GroupKey::from_filename("007.in").as_str(), "7");
        assert_eq!(
            GroupKey::from_filename("99999999999999999999999.in").as_str(),
            "99999999999999999999999"
        );
    }

    #[test]
    fn key_is_zero_without_digits() {
        for name in ["a.in", "sample.in", ".in", "000.in"] {
            assert_eq!(GroupKey::from_filename(name), GroupKey::zero(), "{}", name);
        }
    }

    #[test]
    fn distinct_keys_flatten_into_one_sorted_group() {
        let groups = CaseGrouper::partition(cases(&["3.in", "1.in", "10.in", "2.in"]));
        assert_eq!(
            layout(&groups),
            vec![("0".to_owned(), vec!["1.in", "10.in", "2.in", "3.in"])]
        );
    }

    #[test]
    fn duplicate_key_groups_in_first_seen_order() {
        let groups = CaseGrouper::partition(cases(&["2a.in", "1b.in", "1a.in"]));
        assert_eq!(
            layout(&groups),
            vec![
                ("1".to_owned(), vec!["1a.in", "1b.in"]),
                ("2".to_owned(), vec!["2a.in"]),
            ]
        );
    }

    #[test]
    fn group_order_follows_sorted_scan_not_numeric_value() {
        let groups = CaseGrouper::partition(cases(&["10a.in", "10b.in", "9a.in", "9b.in"]));
        assert_eq!(
            layout(&groups),
            vec![
                ("10".to_owned(), vec!["10a.in", "10b.in"]),
                ("9".to_owned(), vec!["9a.in", "9b.in"]),
            ]
        );
    }

    #[test]
    fn single_duplicate_switches_whole_run_to_grouped_mode() {
        let groups = CaseGrouper::partition(cases(&["1.in", "2.in", "3a.in", "3b.in", "4.in"]));
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[2].names(), vec!["3a.in", "3b.in"]);
    }

    #[test]
    fn empty_listing_has_no_groups() {
        assert!(CaseGrouper::partition(Vec::new()).is_empty());
    }

    #[test]
    fn group_scans_directory_with_suffix_filter() {
        let dir = tempfile::tempdir().unwrap();
        let in_dir = dir.path().join("in");
        for name in ["1a.in", "1b.in", "2a.in", "notes.txt"] {
            fsutil::write_with_mkdir(in_dir.join(name), "").unwrap();
        }
        fsutil::mkdir_all(in_dir.join("3.in")).unwrap();

        let groups = CaseGrouper::new()
            .output_dir(dir.path().join("out"))
            .group(&in_dir)
            .unwrap();

        assert_eq!(
            layout(&groups),
            vec![
                ("1".to_owned(), vec!["1a.in", "1b.in"]),
                ("2".to_owned(), vec!["2a.in"]),
            ]
        );
        let first = &groups[0].cases[0];
        assert_eq!(first.input_path(), in_dir.join("1a.in"));
        assert_eq!(
            first.expected_path(),
            Some(dir.path().join("out").join("1a.out").as_path())
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CaseGrouper::new().group(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::EnumerateCases(..)));
    }
}
