//! HTTP test-suite generation from route tables.
//!
//! Emits Rust test-function source for a blocking HTTP client. The
//! generated text targets a locally running server; this crate itself
//! takes no HTTP dependency.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ROUTE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.route\(\s*"([^"]+)"\s*,\s*(get|post|put|delete|patch)\(([A-Za-z0-9_:]+)\)"#)
        .expect("static regex")
});
static CHAINED_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(get|post|put|delete|patch)\(([A-Za-z0-9_:]+)\)").expect("static regex")
});
static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// One route registration found in a router source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
    pub method: HttpMethod,
    pub path: String,
    pub handler: String,
}

/// Extract `.route("path", method(handler))` registrations, including
/// chained methods on the same path.
pub fn scan_routes(source: &str) -> Vec<RouteDef> {
    let mut routes = Vec::new();

    for line in source.lines() {
        let calls: Vec<regex::Captures> = ROUTE_CALL.captures_iter(line).collect();
        for (i, caps) in calls.iter().enumerate() {
            let Some(whole) = caps.get(0) else { continue };
            let path = caps[1].to_string();

            // Methods chained on this call, up to the next `.route`.
            let end = calls
                .get(i + 1)
                .and_then(|c| c.get(0))
                .map(|m| m.start())
                .unwrap_or(line.len());
            for chained in CHAINED_METHOD.captures_iter(&line[whole.start()..end]) {
                if let Some(method) = HttpMethod::parse(&chained[1]) {
                    routes.push(RouteDef {
                        method,
                        path: path.clone(),
                        handler: chained[2].to_string(),
                    });
                }
            }
        }
    }

    routes
}

/// Emit a test suite covering every scanned route.
pub fn suite_for_routes(routes: &[RouteDef]) -> String {
    let mut parts = vec![suite_header()];
    for route in routes {
        let name = format!("test_{}", short_handler_name(&route.handler));
        parts.push(emit_test(route.method, &route.path, &name, None));
    }
    parts.join("\n")
}

/// Emit a full CRUD suite for one resource.
pub fn crud_suite(model: &str, base_path: &str) -> String {
    let m = model.to_lowercase();
    let item_path = format!("{}/1", base_path.trim_end_matches('/'));

    let parts = vec![
        suite_header(),
        emit_test(
            HttpMethod::Post,
            base_path,
            &format!("test_create_{m}"),
            Some(model),
        ),
        emit_test(HttpMethod::Get, base_path, &format!("test_list_{m}s"), None),
        emit_test(
            HttpMethod::Get,
            &item_path,
            &format!("test_get_{m}_by_id"),
            None,
        ),
        emit_test(
            HttpMethod::Put,
            &item_path,
            &format!("test_update_{m}"),
            Some(model),
        ),
        emit_test(
            HttpMethod::Delete,
            &item_path,
            &format!("test_delete_{m}"),
            None,
        ),
    ];
    parts.join("\n")
}

fn suite_header() -> String {
    "use reqwest::blocking::Client;\n\n\
     const BASE_URL: &str = \"http://localhost:8000\";\n\n\
     fn client() -> Client {\n    Client::new()\n}\n"
        .to_string()
}

fn emit_test(method: HttpMethod, path: &str, name: &str, model: Option<&str>) -> String {
    let concrete = PATH_PARAM.replace_all(path, "1");

    match method {
        HttpMethod::Get => format!(
            "#[test]\n\
             fn {name}() {{\n    \
                 let resp = client()\n        \
                     .get(format!(\"{{BASE_URL}}{concrete}\"))\n        \
                     .send()\n        \
                     .expect(\"GET {concrete}\");\n    \
                 assert!(matches!(resp.status().as_u16(), 200 | 404));\n\
             }}\n"
        ),
        HttpMethod::Post => format!(
            "#[test]\n\
             fn {name}() {{\n    \
                 let payload = serde_json::json!({{\n        \
                     // fields for {resource}\n    \
                 }});\n    \
                 let resp = client()\n        \
                     .post(format!(\"{{BASE_URL}}{concrete}\"))\n        \
                     .json(&payload)\n        \
                     .send()\n        \
                     .expect(\"POST {concrete}\");\n    \
                 assert!(matches!(resp.status().as_u16(), 201 | 422));\n    \
                 if resp.status().as_u16() == 201 {{\n        \
                     let body: serde_json::Value = resp.json().expect(\"json body\");\n        \
                     assert!(body.get(\"id\").is_some());\n    \
                 }}\n\
             }}\n",
            resource = model.unwrap_or("the request")
        ),
        HttpMethod::Put => format!(
            "#[test]\n\
             fn {name}() {{\n    \
                 let payload = serde_json::json!({{\n        \
                     // updated fields for {resource}\n    \
                 }});\n    \
                 let resp = client()\n        \
                     .put(format!(\"{{BASE_URL}}{concrete}\"))\n        \
                     .json(&payload)\n        \
                     .send()\n        \
                     .expect(\"PUT {concrete}\");\n    \
                 assert!(matches!(resp.status().as_u16(), 200 | 404 | 422));\n\
             }}\n",
            resource = model.unwrap_or("the request")
        ),
        HttpMethod::Delete => format!(
            "#[test]\n\
             fn {name}() {{\n    \
                 let resp = client()\n        \
                     .delete(format!(\"{{BASE_URL}}{concrete}\"))\n        \
                     .send()\n        \
                     .expect(\"DELETE {concrete}\");\n    \
                 assert!(matches!(resp.status().as_u16(), 204 | 404));\n\
             }}\n"
        ),
        HttpMethod::Patch => format!(
            "#[test]\n\
             fn {name}() {{\n    \
                 // TODO: exercise PATCH {concrete} once the handler settles\n\
             }}\n"
        ),
    }
}

fn short_handler_name(handler: &str) -> &str {
    handler.rsplit("::").next().unwrap_or(handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTER_SRC: &str = r#"
        let app = Router::new()
            .route("/tasks", get(list_tasks).post(create_task))
            .route("/tasks/{id}", get(get_task))
            .route("/tasks/{id}", put(update_task))
            .route("/tasks/{id}", delete(delete_task));
    "#;

    #[test]
    fn scans_chained_route_registrations() {
        let routes = scan_routes(ROUTER_SRC);
        assert_eq!(routes.len(), 5);
        assert_eq!(
            routes[0],
            RouteDef {
                method: HttpMethod::Get,
                path: "/tasks".to_string(),
                handler: "list_tasks".to_string(),
            }
        );
        assert_eq!(routes[1].method, HttpMethod::Post);
        assert_eq!(routes[2].path, "/tasks/{id}");
    }

    #[test]
    fn suite_covers_every_route() {
        let routes = scan_routes(ROUTER_SRC);
        let suite = suite_for_routes(&routes);
        assert!(suite.contains("fn test_list_tasks()"));
        assert!(suite.contains("fn test_create_task()"));
        assert!(suite.contains("fn test_update_task()"));
        assert!(suite.contains("fn test_delete_task()"));
        assert!(suite.contains("const BASE_URL"));
    }

    #[test]
    fn path_params_are_substituted() {
        let routes = scan_routes(ROUTER_SRC);
        let suite = suite_for_routes(&routes);
        assert!(suite.contains("{BASE_URL}/tasks/1"));
        assert!(!suite.contains("/tasks/{id}\""));
    }

    #[test]
    fn crud_suite_has_one_test_per_verb() {
        let suite = crud_suite("Task", "/tasks");
        for name in [
            "fn test_create_task()",
            "fn test_list_tasks()",
            "fn test_get_task_by_id()",
            "fn test_update_task()",
            "fn test_delete_task()",
        ] {
            assert!(suite.contains(name), "missing {name}");
        }
        assert!(suite.contains("assert!(matches!(resp.status().as_u16(), 201 | 422))"));
    }

    #[test]
    fn qualified_handlers_use_their_last_segment() {
        let src = r#".route("/health", get(handlers::health_check))"#;
        let routes = scan_routes(src);
        assert_eq!(routes[0].handler, "handlers::health_check");
        let suite = suite_for_routes(&routes);
        assert!(suite.contains("fn test_health_check()"));
    }
}
