use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command as Process;

use taskdeck_core::{ScoredTask, TaskView, estimate_capacity, prioritize, suggest_daily};
use taskdeck_skills::{review, sql_lint, standup, testgen};

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Task prioritization and workflow heuristics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank every task in the input file and print recommendations
    Prioritize {
        /// Task file (JSON array of task records)
        #[arg(long)]
        tasks: Option<PathBuf>,
    },

    /// Suggest the top tasks to focus on today
    PlanDay {
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Number of tasks to suggest (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Check whether today's high-priority load is manageable
    Capacity {
        #[arg(long)]
        tasks: Option<PathBuf>,
    },

    /// Generate a standup report from the task file or a git repo
    Standup {
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Build the report from yesterday's commits in this repo
        /// instead of the task file
        #[arg(long)]
        repo: Option<PathBuf>,
    },

    /// Lint a SQL query for common performance problems
    LintSql {
        /// The query text (or use --file)
        query: Option<String>,

        /// Read the query from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Scan a Rust source file or directory for review findings
    Review { path: PathBuf },

    /// Emit an HTTP test suite for a resource or a scanned router file
    GenTests {
        /// Resource name, e.g. "Task" (used with --base-path)
        #[arg(long)]
        model: Option<String>,

        /// Base path for the resource, e.g. "/tasks"
        #[arg(long, default_value = "/tasks")]
        base_path: String,

        /// Scan a router source file for .route(...) registrations
        #[arg(long)]
        routes: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let now = Utc::now();

    match cli.command {
        Command::Prioritize { tasks } => {
            let tasks = load_tasks(tasks.as_deref(), &cfg)?;
            let result = prioritize(&tasks, now)?;

            println!("📊 Task Prioritization Results\n");
            for task in &result.ranked {
                print_ranked(task);
            }
            print_recommendations(&result.recommendations);
        }

        Command::PlanDay { tasks, limit } => {
            let tasks = load_tasks(tasks.as_deref(), &cfg)?;
            let limit = limit.unwrap_or(cfg.daily_limit);
            let plan = suggest_daily(&tasks, limit, now)?;

            println!(
                "📋 Daily plan for {} ({} task(s))\n",
                plan.date.format("%Y-%m-%d"),
                plan.suggested.len()
            );
            for task in &plan.suggested {
                print_ranked(task);
            }
            print_recommendations(&plan.recommendations);
        }

        Command::Capacity { tasks } => {
            let tasks = load_tasks(tasks.as_deref(), &cfg)?;
            let cap = estimate_capacity(&tasks, now)?;

            println!(
                "{} of {} task(s) are urgent/high priority",
                cap.urgent_high_priority, cap.total_tasks
            );
            println!("{}\n", cap.assessment);
            for task in &cap.top_tasks {
                print_ranked(task);
            }
        }

        Command::Standup { tasks, repo } => {
            let report = match repo {
                Some(repo) => {
                    let commits = yesterday_commits(&repo)?;
                    standup::from_commits(&commits, Local::now().date_naive())
                }
                None => {
                    let tasks = load_tasks(tasks.as_deref(), &cfg)?;
                    standup::from_tasks(&tasks, now)
                }
            };
            println!("{}", report.render());
        }

        Command::LintSql { query, file } => {
            let query = match (query, file) {
                (Some(q), _) => q,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => bail!("pass a query or --file <path>"),
            };
            let report = sql_lint::analyze_query(&query);

            println!("Optimization score: {}/100", report.optimization_score);
            println!("{} finding(s)", report.findings.len());
            for f in &report.findings {
                println!("\n[{}] {}", f.severity.as_str().to_uppercase(), f.issue);
                println!("  → {}", f.recommendation);
                println!("  e.g. {}", f.example);
            }
        }

        Command::Review { path } => {
            if path.is_dir() {
                let result = review::review_dir(&path)?;
                println!(
                    "Reviewed {} file(s): {} issue(s)\n",
                    result.files_reviewed, result.total_issues
                );
                for file in result.files.iter().filter(|f| !f.issues.is_empty()) {
                    println!("{}", file.file.display());
                    print_issues(&file.issues);
                }
            } else {
                let result = review::review_file(&path)?;
                println!("{}: {} issue(s)", result.file.display(), result.issues.len());
                print_issues(&result.issues);
            }
        }

        Command::GenTests {
            model,
            base_path,
            routes,
        } => {
            let suite = match (routes, model) {
                (Some(path), _) => {
                    let source = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    let routes = testgen::scan_routes(&source);
                    if routes.is_empty() {
                        bail!("no .route(...) registrations found in {}", path.display());
                    }
                    testgen::suite_for_routes(&routes)
                }
                (None, Some(model)) => testgen::crud_suite(&model, &base_path),
                (None, None) => bail!("pass --model <Name> or --routes <file>"),
            };
            println!("{suite}");
        }
    }

    Ok(())
}

fn load_tasks(path: Option<&Path>, cfg: &Config) -> Result<Vec<TaskView>> {
    let path = path.unwrap_or(&cfg.tasks_file);
    if !path.exists() {
        bail!("task file not found: {} (pass --tasks <path>)", path.display());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_ranked(task: &ScoredTask) {
    println!(
        "{}. {} [{}] score={:.1}",
        task.recommended_order,
        task.task.title,
        task.task.priority.as_str(),
        task.priority_score
    );
}

fn print_recommendations(recommendations: &[String]) {
    println!("\n💡 Recommendations:");
    for rec in recommendations {
        println!("   {rec}");
    }
}

fn print_issues(issues: &[review::Issue]) {
    for issue in issues {
        println!(
            "  line {}: [{}] {}",
            issue.line,
            issue.severity.as_str(),
            issue.message
        );
    }
}

/// Subjects of yesterday's commits, oldest first.
fn yesterday_commits(repo: &Path) -> Result<Vec<String>> {
    let yesterday = (Local::now() - chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    let output = Process::new("git")
        .arg("-C")
        .arg(repo)
        .args([
            "log",
            "--reverse",
            &format!("--since={yesterday} 00:00"),
            &format!("--until={yesterday} 23:59"),
            "--pretty=format:%s",
        ])
        .output()
        .with_context(|| format!("running git log in {}", repo.display()))?;

    if !output.status.success() {
        bail!(
            "git log failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.to_string())
        .collect())
}
