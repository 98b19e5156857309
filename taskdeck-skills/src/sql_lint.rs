//! Rule-based SQL query linting with a weighted optimization score.
//!
//! Rules are single-pass keyword/regex checks; no SQL parsing. Each
//! finding states the issue, a recommendation, and a rewrite example.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::severity::Severity;

static SELECT_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SELECT\s+\*").expect("static regex"));
static FUNCTION_IN_WHERE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)WHERE.*\b(UPPER|LOWER|SUBSTRING|DATE)\s*\(").expect("static regex")
});
static LEADING_WILDCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)LIKE\s+['"]%"#).expect("static regex"));

/// One lint finding.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub kind: &'static str,
    pub severity: Severity,
    pub issue: String,
    pub recommendation: &'static str,
    pub example: &'static str,
}

/// Lint result for one query or code snippet.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    /// Echo of the input, truncated to 100 chars.
    pub query: String,
    /// 100 minus severity-weighted penalties, floored at 0.
    pub optimization_score: u32,
    pub findings: Vec<Finding>,
}

impl QueryReport {
    fn new(input: &str, findings: Vec<Finding>) -> Self {
        let penalty: u32 = findings.iter().map(|f| f.severity.weight()).sum();
        Self {
            query: echo(input),
            optimization_score: 100u32.saturating_sub(penalty),
            findings,
        }
    }
}

/// Analyze a SQL query for common performance problems.
pub fn analyze_query(query: &str) -> QueryReport {
    let upper = query.to_uppercase();
    let mut findings = Vec::new();

    if SELECT_STAR.is_match(query) {
        findings.push(Finding {
            kind: "select_star",
            severity: Severity::Medium,
            issue: "Using SELECT * retrieves all columns".to_string(),
            recommendation: "Explicitly specify only the columns you need to reduce data transfer",
            example: "SELECT id, name, email FROM users",
        });
    }

    let has_select = upper.contains("SELECT");
    let has_where = upper.contains("WHERE");
    let has_limit = upper.contains("LIMIT");

    if has_select && upper.contains("FROM") && !has_where && !has_limit {
        findings.push(Finding {
            kind: "missing_where",
            severity: Severity::High,
            issue: "Query has no WHERE clause or LIMIT".to_string(),
            recommendation: "Add WHERE clause to filter data or LIMIT to restrict results",
            example: "SELECT * FROM tasks WHERE status = 'active' LIMIT 100",
        });
    }

    if has_select && !has_limit && !has_where {
        findings.push(Finding {
            kind: "missing_limit",
            severity: Severity::Medium,
            issue: "No LIMIT clause found".to_string(),
            recommendation: "Add LIMIT to prevent accidentally retrieving too many rows",
            example: "SELECT * FROM tasks LIMIT 100",
        });
    }

    let or_count = upper.matches(" OR ").count();
    if or_count > 3 {
        findings.push(Finding {
            kind: "multiple_or",
            severity: Severity::Medium,
            issue: format!("Query has {or_count} OR conditions"),
            recommendation: "Consider using IN clause instead of multiple ORs",
            example: "WHERE status IN ('todo', 'in_progress', 'completed')",
        });
    }

    if FUNCTION_IN_WHERE.is_match(query) {
        findings.push(Finding {
            kind: "function_in_where",
            severity: Severity::High,
            issue: "Function call in WHERE clause prevents index usage".to_string(),
            recommendation: "Avoid functions on indexed columns in WHERE clause",
            example: "Use computed columns or store preprocessed values",
        });
    }

    // Subquery in the SELECT list: more than one SELECT before FROM.
    let select_part = upper.split("FROM").next().unwrap_or(&upper);
    if select_part.matches("SELECT").count() > 1 {
        findings.push(Finding {
            kind: "subquery_in_select",
            severity: Severity::Medium,
            issue: "Subquery in SELECT clause".to_string(),
            recommendation: "Consider using JOINs instead of subqueries for better performance",
            example: "SELECT t.*, u.name FROM tasks t JOIN users u ON t.user_id = u.id",
        });
    }

    if LEADING_WILDCARD.is_match(query) {
        findings.push(Finding {
            kind: "leading_wildcard",
            severity: Severity::High,
            issue: "LIKE pattern starts with wildcard (%)".to_string(),
            recommendation: "Leading wildcards prevent index usage. Consider full-text search",
            example: "Use LIKE 'pattern%' or full-text search indexes",
        });
    }

    if upper.contains("DISTINCT") {
        findings.push(Finding {
            kind: "distinct_usage",
            severity: Severity::Low,
            issue: "DISTINCT requires sorting and deduplication".to_string(),
            recommendation:
                "Verify if DISTINCT is necessary or if the data model can prevent duplicates",
            example: "Consider using GROUP BY or fixing the join logic",
        });
    }

    QueryReport::new(query, findings)
}

/// Analyze query-builder code for the same class of problems.
pub fn analyze_orm_code(code: &str) -> QueryReport {
    let mut findings = Vec::new();

    if code.contains(".all()") && !code.to_lowercase().contains("limit") {
        findings.push(Finding {
            kind: "missing_limit",
            severity: Severity::Medium,
            issue: "Fetching all rows without a limit".to_string(),
            recommendation: "Add a limit to prevent loading excessive data",
            example: "statement.limit(100)",
        });
    }

    static SPECIFIC_COLUMNS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"select\([A-Za-z_]+\)").expect("static regex"));
    if code.contains("select(") && !SPECIFIC_COLUMNS.is_match(code) {
        findings.push(Finding {
            kind: "missing_specific_columns",
            severity: Severity::Low,
            issue: "Consider selecting specific columns".to_string(),
            recommendation: "Use select with specific columns for better performance",
            example: "select((tasks::id, tasks::title))",
        });
    }

    QueryReport::new(code, findings)
}

fn echo(input: &str) -> String {
    if input.chars().count() > 100 {
        let head: String = input.chars().take(100).collect();
        format!("{head}...")
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(report: &QueryReport) -> Vec<&'static str> {
        report.findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn detects_select_star() {
        let report = analyze_query("SELECT * FROM tasks WHERE id = 1");
        assert!(kinds(&report).contains(&"select_star"));
    }

    #[test]
    fn detects_missing_where_and_limit() {
        let report = analyze_query("SELECT id, title FROM tasks");
        let kinds = kinds(&report);
        assert!(kinds.contains(&"missing_where"));
        assert!(kinds.contains(&"missing_limit"));
    }

    #[test]
    fn detects_leading_wildcard_and_function_in_where() {
        let report = analyze_query("SELECT * FROM tasks WHERE UPPER(title) LIKE '%urgent%'");
        let kinds = kinds(&report);
        assert!(kinds.contains(&"leading_wildcard"));
        assert!(kinds.contains(&"function_in_where"));
    }

    #[test]
    fn detects_or_pileup_and_distinct() {
        let report = analyze_query(
            "SELECT DISTINCT id FROM t WHERE a = 1 OR a = 2 OR a = 3 OR a = 4 OR a = 5",
        );
        let kinds = kinds(&report);
        assert!(kinds.contains(&"multiple_or"));
        assert!(kinds.contains(&"distinct_usage"));
    }

    #[test]
    fn detects_subquery_in_select_list() {
        let report = analyze_query(
            "SELECT id, (SELECT name FROM users WHERE users.id = t.user_id) FROM tasks t WHERE t.id = 1",
        );
        assert!(kinds(&report).contains(&"subquery_in_select"));
    }

    #[test]
    fn clean_query_scores_100() {
        let report = analyze_query("SELECT id, title FROM tasks WHERE status = 'active' LIMIT 100");
        assert!(report.findings.is_empty());
        assert_eq!(report.optimization_score, 100);
    }

    #[test]
    fn score_subtracts_severity_weights() {
        // select_star (15) + missing_where (25) + missing_limit (15)
        let report = analyze_query("SELECT * FROM tasks");
        assert_eq!(report.optimization_score, 100 - 15 - 25 - 15);
    }

    #[test]
    fn score_floors_at_zero() {
        let report = analyze_query(
            "SELECT DISTINCT *, (SELECT 1 FROM x), (SELECT 2 FROM y) FROM t \
             WHERE UPPER(a) LIKE '%x%' OR b = 1 OR b = 2 OR b = 3 OR b = 4 OR b = 5",
        );
        // select_star + multiple_or + function_in_where + subquery +
        // leading_wildcard + distinct = 100 points of penalty.
        assert_eq!(report.optimization_score, 0);
    }

    #[test]
    fn long_queries_are_truncated_in_the_echo() {
        let long = format!("SELECT id FROM tasks WHERE note = '{}'", "x".repeat(200));
        let report = analyze_query(&long);
        assert!(report.query.ends_with("..."));
        assert_eq!(report.query.chars().count(), 103);
    }

    #[test]
    fn orm_code_without_limit_is_flagged() {
        let report = analyze_orm_code("conn.query(select(tasks::table)).all()");
        assert!(kinds(&report).contains(&"missing_limit"));
    }
}
