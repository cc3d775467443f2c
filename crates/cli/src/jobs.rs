//! Jobs file parsing.
//!
//! One job per line. A bare URL is a strip job; `target|source` and
//! `target|source|keyword` lines are copy jobs. Blank lines and `#`
//! comments are skipped, malformed lines are dropped with a warning.

use std::fs;
use std::path::Path;

use anyhow::Context;
use retexo_core::JobSpec;

use crate::echo;

/// Reads and parses a jobs file.
pub fn load_jobs(path: &Path) -> anyhow::Result<Vec<JobSpec>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read jobs file: {}", path.display()))?;

    let jobs = parse_jobs(&content);
    if jobs.is_empty() {
        anyhow::bail!("no valid job configurations in {}", path.display());
    }

    Ok(jobs)
}

/// Parses jobs file content into job specs.
pub fn parse_jobs(content: &str) -> Vec<JobSpec> {
    let mut jobs = Vec::new();

    for (line_number, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(job) = parse_line(line) {
            jobs.push(job);
        } else {
            echo::print_warning(&format!("skipping malformed line {}: {}", line_number + 1, line));
        }
    }

    jobs
}

fn parse_line(line: &str) -> Option<JobSpec> {
    if !line.contains('|') {
        return Some(JobSpec::Strip { target_url: line.to_string() });
    }

    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [target, source] if !target.is_empty() && !source.is_empty() => Some(JobSpec::Copy {
            target_url: target.to_string(),
            source_url: source.to_string(),
            start_keyword: None,
        }),
        [target, source, keyword] if !target.is_empty() && !source.is_empty() => Some(JobSpec::Copy {
            target_url: target.to_string(),
            source_url: source.to_string(),
            start_keyword: if keyword.is_empty() { None } else { Some(keyword.to_string()) },
        }),
        _ => None,
    }
}
