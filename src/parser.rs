//! Instance parser for the OR-Library job shop format.
//!
//! # Format
//!
//! ```text
//! instance ft06
//! +++++++++++++++++++++++++++++
//! Fisher and Thompson 6x6 instance
//! +++++++++++++++++++++++++++++
//! 6 6
//! 2  1  0  3  1  6  3  7  5  3  4  6
//! ...
//! ```
//!
//! - `instance <name>` opens a named instance (multi-instance files).
//! - Blank lines and lines starting with `+` are ignored.
//! - The first line holding exactly two integers is `num_jobs num_machines`;
//!   free-text description lines before it are skipped.
//! - Each of the next `num_jobs` lines lists `machine duration` pairs in
//!   operation order.
//!
//! Single-instance files contain only the dimension line and job lines.
//! Every parsed instance is checked with
//! [`validate_instance`](crate::validation::validate_instance).
//!
//! # Reference
//! Beasley (1990), "OR-Library: distributing test problems by electronic mail"

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParseError;
use crate::models::{Instance, Operation};
use crate::validation::validate_instance;

const INSTANCE_PREFIX: &str = "instance ";

/// An instance together with its name from the file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedInstance {
    /// Name from the `instance <name>` line.
    pub name: String,
    /// Parsed instance.
    pub instance: Instance,
}

/// Parses every named instance of a multi-instance file, in file order.
pub fn parse_instances(text: &str) -> Result<Vec<NamedInstance>, ParseError> {
    let lines = content_lines(text);
    let mut instances = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (_, line) = lines[i];
        i += 1;
        let Some(name) = line.strip_prefix(INSTANCE_PREFIX) else {
            continue;
        };
        let name = name.trim().to_string();

        let dims = lines[i..]
            .iter()
            .take_while(|(_, l)| !l.starts_with(INSTANCE_PREFIX))
            .position(|(_, l)| dimensions(l).is_some());
        let Some(offset) = dims else {
            return Err(ParseError::MissingDimensions {
                instance: Some(name),
            });
        };
        let (num_jobs, num_machines) = dimensions(lines[i + offset].1).unwrap_or_default();
        i += offset + 1;

        let job_lines = &lines[i..i.saturating_add(num_jobs).min(lines.len())];
        let instance = build_instance(Some(&name), num_jobs, num_machines, job_lines)?;
        i += num_jobs;

        debug!(name = %name, jobs = num_jobs, machines = num_machines, "Parsed instance");
        instances.push(NamedInstance { name, instance });
    }

    Ok(instances)
}

/// Parses a file holding one unnamed instance.
///
/// Files with `instance <name>` headers are rejected with the list of
/// names they contain; use [`parse_instances`] for those.
pub fn parse_single_instance(text: &str) -> Result<Instance, ParseError> {
    let lines = content_lines(text);

    let available: Vec<String> = lines
        .iter()
        .filter_map(|(_, l)| l.strip_prefix(INSTANCE_PREFIX))
        .map(|name| name.trim().to_string())
        .collect();
    if !available.is_empty() {
        return Err(ParseError::NamedInstances { available });
    }

    let Some(idx) = lines.iter().position(|(_, l)| dimensions(l).is_some()) else {
        return Err(ParseError::MissingDimensions { instance: None });
    };
    let (num_jobs, num_machines) = dimensions(lines[idx].1).unwrap_or_default();

    let start = idx + 1;
    let job_lines = &lines[start..start.saturating_add(num_jobs).min(lines.len())];
    build_instance(None, num_jobs, num_machines, job_lines)
}

/// Looks up an instance by name.
pub fn find_instance<'a>(
    instances: &'a [NamedInstance],
    name: &str,
) -> Result<&'a Instance, ParseError> {
    instances
        .iter()
        .find(|named| named.name == name)
        .map(|named| &named.instance)
        .ok_or_else(|| ParseError::UnknownInstance {
            name: name.to_string(),
        })
}

/// Reads and parses a multi-instance file.
pub fn load_instances(path: impl AsRef<Path>) -> Result<Vec<NamedInstance>, ParseError> {
    parse_instances(&read(path.as_ref())?)
}

/// Reads and parses a single-instance file.
pub fn load_single_instance(path: impl AsRef<Path>) -> Result<Instance, ParseError> {
    parse_single_instance(&read(path.as_ref())?)
}

fn read(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Non-empty, non-separator lines with their 1-based line numbers.
fn content_lines(text: &str) -> Vec<(usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('+'))
        .collect()
}

fn dimensions(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let jobs = parts.next()?.parse().ok()?;
    let machines = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((jobs, machines)),
    }
}

fn build_instance(
    name: Option<&str>,
    num_jobs: usize,
    num_machines: usize,
    job_lines: &[(usize, &str)],
) -> Result<Instance, ParseError> {
    if job_lines.len() < num_jobs {
        return Err(ParseError::MissingJobs {
            instance: name.map(str::to_string),
            expected: num_jobs,
            found: job_lines.len(),
        });
    }

    let jobs = job_lines
        .iter()
        .map(|&(line_no, line)| parse_job(line_no, line))
        .collect::<Result<Vec<_>, _>>()?;

    let instance = Instance {
        num_jobs,
        num_machines,
        jobs,
    };
    validate_instance(&instance).map_err(|errors| ParseError::Invalid {
        instance: name.map(str::to_string),
        errors,
    })?;
    Ok(instance)
}

fn parse_job(line_no: usize, line: &str) -> Result<Vec<Operation>, ParseError> {
    let values = line
        .split_whitespace()
        .map(|token| {
            token.parse::<u64>().map_err(|_| ParseError::InvalidNumber {
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() % 2 != 0 {
        return Err(ParseError::UnpairedValues {
            line: line_no,
            count: values.len(),
        });
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| Operation::new(pair[0] as usize, pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI: &str = "\
 +++++++++++++++++++++++++++++

 instance tiny
 +++++++++++++++++++++++++++++
 A 2x2 example
 +++++++++++++++++++++++++++++
 2 2
 0 3 1 2
 1 4 0 1
 +++++++++++++++++++++++++++++

 instance ft06
 +++++++++++++++++++++++++++++
 Fisher and Thompson 6x6 instance, alternate name (mt06)
 +++++++++++++++++++++++++++++
 6 6
 2  1  0  3  1  6  3  7  5  3  4  6
 1  8  2  5  4 10  5 10  0 10  3  4
 2  5  3  4  5  8  0  9  1  1  4  7
 1  5  0  5  2  5  3  3  4  8  5  9
 2  9  1  3  4  5  5  4  0  3  3  1
 1  3  3  3  5  9  0 10  4  4  2  1
 +++++++++++++++++++++++++++++
";

    const SINGLE: &str = "3 2\n0 5 1 2\n1 3 0 4\n\n0 1 1 1\n";

    #[test]
    fn test_parse_instances() {
        let instances = parse_instances(MULTI).unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].name, "tiny");
        assert_eq!(instances[1].name, "ft06");

        let tiny = &instances[0].instance;
        assert_eq!(
            *tiny,
            Instance::from_pairs(2, vec![vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]])
        );

        let ft06 = &instances[1].instance;
        assert_eq!(ft06.num_jobs, 6);
        assert_eq!(ft06.num_machines, 6);
        assert_eq!(ft06.jobs[1][2], Operation::new(4, 10));
        assert_eq!(ft06.jobs[5][5], Operation::new(2, 1));
    }

    #[test]
    fn test_find_instance() {
        let instances = parse_instances(MULTI).unwrap();
        assert_eq!(find_instance(&instances, "ft06").unwrap().num_jobs, 6);

        let err = find_instance(&instances, "la01").unwrap_err();
        assert!(matches!(err, ParseError::UnknownInstance { .. }));
    }

    #[test]
    fn test_parse_single_instance() {
        let inst = parse_single_instance(SINGLE).unwrap();
        assert_eq!(inst.num_jobs, 3);
        assert_eq!(inst.num_machines, 2);
        assert_eq!(inst.jobs[2], vec![Operation::new(0, 1), Operation::new(1, 1)]);
    }

    #[test]
    fn test_single_parser_rejects_named_file() {
        let err = parse_single_instance(MULTI).unwrap_err();
        match err {
            ParseError::NamedInstances { available } => {
                assert_eq!(available, vec!["tiny".to_string(), "ft06".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_dimensions() {
        let err = parse_single_instance("just text\nmore text\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingDimensions { instance: None }));

        let err = parse_instances("instance broken\nno numbers here\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingDimensions { instance: Some(_) }));
    }

    #[test]
    fn test_missing_job_lines() {
        let err = parse_single_instance("3 2\n0 5 1 2\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingJobs {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_single_instance("1 2\n0 5 x 2\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn test_unpaired_values() {
        let err = parse_single_instance("1 2\n0 5 1\n").unwrap_err();
        assert!(matches!(err, ParseError::UnpairedValues { line: 2, count: 3 }));
    }

    #[test]
    fn test_inconsistent_instance() {
        // machine 4 does not exist in a 2-machine instance
        let err = parse_single_instance("1 2\n0 5 4 2\n").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { .. }));
        assert!(err.to_string().contains("machine 4"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_single_instance("/nonexistent/jobshop.txt").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn test_huge_job_count() {
        let err = parse_single_instance("18446744073709551615 2\n0 1 1 1\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingJobs { found: 1, .. }));

        let err = parse_instances("instance big\n18446744073709551615 2\n0 1 1 1\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingJobs { found: 1, .. }));
    }

    #[test]
    fn test_huge_machine_count() {
        let err = parse_single_instance("1 18446744073709551615\n0 1\n").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { .. }));

        let err = parse_single_instance("1 4000000000\n0 1\n").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { .. }));
    }

    #[test]
    fn test_overflowing_durations() {
        let err = parse_single_instance("1 2\n0 18446744073709551615 1 1\n").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { .. }));
        assert!(err.to_string().contains("exceeds u64::MAX"));
    }
}
