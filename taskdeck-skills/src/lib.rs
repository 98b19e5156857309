//! taskdeck-skills: heuristic workflow and code-quality skills layered
//! on the taskdeck-core task model.

pub mod review;
pub mod severity;
pub mod sql_lint;
pub mod standup;
pub mod testgen;

pub use review::{DirReview, FileReview, Issue, review_dir, review_file, review_source};
pub use severity::Severity;
pub use sql_lint::{Finding, QueryReport, analyze_orm_code, analyze_query};
pub use standup::{StandupReport, from_commits, from_tasks};
pub use testgen::{HttpMethod, RouteDef, crud_suite, scan_routes, suite_for_routes};
