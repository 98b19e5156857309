//! Heuristic source review: line-level checks over Rust files.
//!
//! This is deliberately not a parser. Single-line heuristics cover the
//! common review nits (long lines, parameter pileups, stray unwraps,
//! undocumented public functions, leftover markers); anything that
//! needs real syntax awareness belongs in clippy.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Serialize;

use crate::severity::Severity;

static FN_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fn\s+([A-Za-z0-9_]+)\s*(?:<[^>]*>)?\s*\(([^)]*)\)").expect("static regex")
});

const MAX_LINE_LEN: usize = 120;
const MAX_PARAMS: usize = 5;

/// One review finding, anchored to a 1-based line.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub severity: Severity,
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReview {
    pub file: PathBuf,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirReview {
    pub directory: PathBuf,
    pub files_reviewed: usize,
    pub total_issues: usize,
    pub files: Vec<FileReview>,
}

/// Scan source text for review findings.
pub fn review_source(source: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut in_tests = false;
    let mut prev_nonblank: Option<String> = None;

    for (idx, line) in source.lines().enumerate() {
        let lineno = idx + 1;
        let trimmed = line.trim();

        // Test modules sit below their subject by convention; stop
        // flagging unwraps once we cross into one.
        if trimmed.starts_with("#[cfg(test)]") {
            in_tests = true;
        }

        if line.chars().count() > MAX_LINE_LEN {
            issues.push(Issue {
                kind: "line_too_long",
                severity: Severity::Low,
                line: lineno,
                message: format!(
                    "Line exceeds {MAX_LINE_LEN} characters ({} chars)",
                    line.chars().count()
                ),
            });
        }

        if !in_tests && (trimmed.contains(".unwrap()") || trimmed.contains(".expect(")) {
            issues.push(Issue {
                kind: "unwrap_in_code",
                severity: Severity::High,
                line: lineno,
                message: "unwrap()/expect() outside test code; propagate the error instead"
                    .to_string(),
            });
        }

        if trimmed.contains("TODO") || trimmed.contains("FIXME") {
            issues.push(Issue {
                kind: "todo_marker",
                severity: Severity::Low,
                line: lineno,
                message: format!("Leftover marker: {}", truncate(trimmed, 60)),
            });
        }

        if let Some(caps) = FN_SIGNATURE.captures(trimmed) {
            let name = &caps[1];
            let params = count_params(&caps[2]);
            if params > MAX_PARAMS {
                issues.push(Issue {
                    kind: "too_many_parameters",
                    severity: Severity::Medium,
                    line: lineno,
                    message: format!(
                        "Function '{name}' has {params} parameters (max recommended: {MAX_PARAMS})"
                    ),
                });
            }

            if !in_tests && trimmed.starts_with("pub fn") {
                // Attributes between the doc comment and the signature
                // are fine, so either counts as "documented".
                let documented = prev_nonblank
                    .as_deref()
                    .is_some_and(|p| p.starts_with("///") || p.starts_with("#["));
                if !documented {
                    issues.push(Issue {
                        kind: "missing_docs",
                        severity: Severity::Low,
                        line: lineno,
                        message: format!("Public function '{name}' missing doc comment"),
                    });
                }
            }
        }

        if !trimmed.is_empty() {
            prev_nonblank = Some(trimmed.to_string());
        }
    }

    issues
}

/// Review one Rust source file.
pub fn review_file(path: &Path) -> Result<FileReview> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    if path.extension().and_then(|e| e.to_str()) != Some("rs") {
        bail!("only Rust sources are supported: {}", path.display());
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    Ok(FileReview {
        file: path.to_path_buf(),
        issues: review_source(&source),
    })
}

/// Review every `.rs` file under a directory, recursively.
pub fn review_dir(path: &Path) -> Result<DirReview> {
    let mut sources = Vec::new();
    collect_rs_files(path, &mut sources)
        .with_context(|| format!("walking {}", path.display()))?;
    sources.sort();

    let mut files = Vec::new();
    for source in sources {
        files.push(review_file(&source)?);
    }

    let total_issues = files.iter().map(|f| f.issues.len()).sum();
    Ok(DirReview {
        directory: path.to_path_buf(),
        files_reviewed: files.len(),
        total_issues,
        files,
    })
}

fn collect_rs_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rs_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
            out.push(path);
        }
    }
    Ok(())
}

fn count_params(params: &str) -> usize {
    params
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .count()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(issues: &[Issue]) -> Vec<&'static str> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn flags_too_many_parameters() {
        let src = "fn mega(a: i32, b: i32, c: i32, d: i32, e: i32, f: i32) -> i32 { a }\n";
        let issues = review_source(src);
        assert!(kinds(&issues).contains(&"too_many_parameters"));
        assert_eq!(issues[0].line, 1);
    }

    #[test]
    fn five_parameters_are_fine() {
        let src = "fn ok(a: i32, b: i32, c: i32, d: i32, e: i32) -> i32 { a }\n";
        assert!(review_source(src).is_empty());
    }

    #[test]
    fn flags_long_lines() {
        let src = format!("let x = \"{}\";\n", "y".repeat(130));
        assert!(kinds(&review_source(&src)).contains(&"line_too_long"));
    }

    #[test]
    fn flags_unwrap_outside_tests_only() {
        let src = "\
fn risky() {
    let v = std::env::var(\"HOME\").unwrap();
}

#[cfg(test)]
mod tests {
    fn helper() {
        let v = std::env::var(\"HOME\").unwrap();
    }
}
";
        let issues = review_source(src);
        let unwraps: Vec<&Issue> = issues.iter().filter(|i| i.kind == "unwrap_in_code").collect();
        assert_eq!(unwraps.len(), 1);
        assert_eq!(unwraps[0].line, 2);
    }

    #[test]
    fn flags_undocumented_public_fn() {
        let src = "\
/// Documented.
pub fn documented() {}

pub fn bare() {}
";
        let issues = review_source(src);
        let missing: Vec<&Issue> = issues.iter().filter(|i| i.kind == "missing_docs").collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].message.contains("'bare'"));
    }

    #[test]
    fn attribute_between_doc_and_fn_counts_as_documented() {
        let src = "\
/// Documented.
#[inline]
pub fn fast() {}
";
        assert!(review_source(src).is_empty());
    }

    #[test]
    fn flags_todo_markers() {
        let src = "// TODO tighten the retry bounds\n";
        assert!(kinds(&review_source(src)).contains(&"todo_marker"));
    }

    #[test]
    fn review_file_rejects_non_rust_paths() {
        assert!(review_file(Path::new("notes.txt")).is_err());
        assert!(review_file(Path::new("missing.rs")).is_err());
    }
}
