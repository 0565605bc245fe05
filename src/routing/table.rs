//! The ordered, compiled route table.
//!
//! Route order is the precedence contract: lookup scans in configured order
//! and the first route whose method and path both match wins.

use std::collections::HashSet;
use std::fmt;

use crate::routing::matcher::{placeholder_names, PathMatcher, PathParams, PatternError};
use crate::routing::route::RouteDefinition;

/// A problem with one route of the table.
#[derive(Debug, thiserror::Error)]
#[error("route #{index} ({method} {path}): {reason}")]
pub struct RouteIssue {
    pub index: usize,
    pub method: String,
    pub path: String,
    pub reason: IssueKind,
}

#[derive(Debug, thiserror::Error)]
pub enum IssueKind {
    #[error("method is empty")]
    EmptyMethod,

    #[error("path must start with '/'")]
    RelativePath,

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("response_template references {{{0}}} which the path does not capture")]
    UnboundPlaceholder(String),

    #[error("match rule has an empty field name")]
    EmptyMatchField,

    #[error("match rule has an empty default")]
    EmptyMatchDefault,
}

/// Error building a route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("malformed route configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid route configuration: {}", IssueList(.0))]
    Invalid(Vec<RouteIssue>),
}

struct IssueList<'a>(&'a [RouteIssue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// A route with its path pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub definition: RouteDefinition,
    pub matcher: PathMatcher,
}

/// A route selected for a request.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    /// Position of the route in the table.
    pub index: usize,
    pub route: &'a RouteDefinition,
    pub params: PathParams,
}

/// Immutable, ordered collection of compiled routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Parse and compile the JSON route configuration.
    pub fn from_json(bytes: &[u8]) -> Result<Self, RouteTableError> {
        let definitions: Vec<RouteDefinition> = serde_json::from_slice(bytes)?;
        Self::compile(definitions)
    }

    /// Compile definitions, reporting every invalid route.
    pub fn compile(definitions: Vec<RouteDefinition>) -> Result<Self, RouteTableError> {
        let mut routes = Vec::with_capacity(definitions.len());
        let mut issues = Vec::new();

        for (index, definition) in definitions.into_iter().enumerate() {
            let mut report = |reason: IssueKind| {
                issues.push(RouteIssue {
                    index,
                    method: definition.method.clone(),
                    path: definition.path_pattern.clone(),
                    reason,
                })
            };

            if definition.method.is_empty() {
                report(IssueKind::EmptyMethod);
            }
            if !definition.path_pattern.starts_with('/') {
                report(IssueKind::RelativePath);
            }

            let matcher = match PathMatcher::compile(&definition.path_pattern) {
                Ok(matcher) => matcher,
                Err(e) => {
                    report(e.into());
                    continue;
                }
            };

            match &definition.match_rule {
                Some(rule) => {
                    if rule.field.is_empty() {
                        report(IssueKind::EmptyMatchField);
                    }
                    if rule.default.is_empty() {
                        report(IssueKind::EmptyMatchDefault);
                    }
                }
                None => {
                    let captured: HashSet<&str> =
                        matcher.placeholders().iter().map(String::as_str).collect();
                    for name in placeholder_names(&definition.response_template) {
                        if !captured.contains(name) {
                            report(IssueKind::UnboundPlaceholder(name.to_string()));
                        }
                    }
                }
            }

            routes.push(CompiledRoute {
                definition,
                matcher,
            });
        }

        if issues.is_empty() {
            Ok(Self { routes })
        } else {
            Err(RouteTableError::Invalid(issues))
        }
    }

    /// First route, in table order, whose method and path both match.
    pub fn find(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, compiled)| compiled.definition.method == method)
            .find_map(|(index, compiled)| {
                compiled.matcher.matches(path).map(|params| RouteMatch {
                    index,
                    route: &compiled.definition,
                    params,
                })
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(method: &str, path: &str, template: &str) -> RouteDefinition {
        RouteDefinition {
            method: method.into(),
            path_pattern: path.into(),
            response_template: template.into(),
            match_rule: None,
            auth_required: false,
            delay_millis: 0,
        }
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::compile(vec![
            route("GET", "/users/me", "me.json"),
            route("GET", "/users/{id}", "user_{id}.json"),
            route("GET", "/users/{other}", "shadowed.json"),
        ])
        .unwrap();

        let hit = table.find("GET", "/users/me").unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.route.response_template, "me.json");

        let hit = table.find("GET", "/users/7").unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.params.get("id"), Some("7"));
    }

    #[test]
    fn test_method_is_case_sensitive() {
        let table = RouteTable::compile(vec![route("GET", "/ping", "pong.json")]).unwrap();
        assert!(table.find("GET", "/ping").is_some());
        assert!(table.find("get", "/ping").is_none());
        assert!(table.find("POST", "/ping").is_none());
    }

    #[test]
    fn test_method_mismatch_skips_to_later_route() {
        let table = RouteTable::compile(vec![
            route("POST", "/items", "created.json"),
            route("GET", "/items", "list.json"),
        ])
        .unwrap();
        assert_eq!(table.find("GET", "/items").unwrap().index, 1);
    }

    #[test]
    fn test_unbound_template_placeholder_rejected() {
        let err = RouteTable::compile(vec![route("GET", "/users/{id}", "user_{uid}.json")])
            .unwrap_err();
        match err {
            RouteTableError::Invalid(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].index, 0);
                assert!(matches!(&issues[0].reason, IssueKind::UnboundPlaceholder(n) if n == "uid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reports_all_issues() {
        let err = RouteTable::compile(vec![
            route("", "/a", "a.json"),
            route("GET", "b", "b.json"),
            route("GET", "/{x}/{x}", "c.json"),
        ])
        .unwrap_err();
        match err {
            RouteTableError::Invalid(issues) => {
                let indices: Vec<_> = issues.iter().map(|i| i.index).collect();
                assert_eq!(indices, vec![0, 1, 2]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_template_not_checked_when_match_rule_present() {
        let json = br#"[{
            "method": "GET",
            "path": "/profile",
            "response_template": "{unused}.json",
            "match": {"field": "type", "source": "query", "cases": {}, "default": "guest.json"}
        }]"#;
        let table = RouteTable::from_json(json).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RouteTable::from_json(b"{not json"),
            Err(RouteTableError::Parse(_))
        ));
    }
}
