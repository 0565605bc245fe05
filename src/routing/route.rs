//! Route definitions as persisted in the route configuration file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One configured mock endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteDefinition {
    /// HTTP verb, compared case-sensitively.
    pub method: String,

    /// Path template, e.g. `/users/{id}`.
    #[serde(rename = "path")]
    pub path_pattern: String,

    /// Artifact filename template, e.g. `user_{id}.json`.
    #[serde(default)]
    pub response_template: String,

    /// Conditional response selection; replaces the template result when present.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_rule: Option<MatchRule>,

    #[serde(rename = "auth", default)]
    pub auth_required: bool,

    /// Artificial latency in milliseconds.
    #[serde(rename = "delay", default)]
    pub delay_millis: u64,
}

/// Where a match rule reads its field from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Body,
    Query,
}

/// Picks an alternate artifact based on a single request field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchRule {
    pub field: String,
    pub source: MatchSource,
    #[serde(default)]
    pub cases: HashMap<String, String>,
    pub default: String,
}

impl MatchRule {
    /// Artifact name for an observed field value.
    pub fn select(&self, observed: &str) -> &str {
        self.cases
            .get(observed)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_names() {
        let route: RouteDefinition = serde_json::from_str(
            r#"{
                "method": "POST",
                "path": "/login",
                "response_template": "login.json",
                "match": {
                    "field": "user",
                    "source": "body",
                    "cases": {"admin": "admin.json"},
                    "default": "guest.json"
                },
                "auth": true,
                "delay": 250
            }"#,
        )
        .unwrap();

        assert_eq!(route.path_pattern, "/login");
        assert!(route.auth_required);
        assert_eq!(route.delay_millis, 250);
        let rule = route.match_rule.unwrap();
        assert_eq!(rule.source, MatchSource::Body);
        assert_eq!(rule.select("admin"), "admin.json");
        assert_eq!(rule.select("bob"), "guest.json");
        assert_eq!(rule.select(""), "guest.json");
    }

    #[test]
    fn test_optional_fields_default() {
        let route: RouteDefinition =
            serde_json::from_str(r#"{"method":"GET","path":"/","response_template":"index.json"}"#)
                .unwrap();
        assert!(!route.auth_required);
        assert_eq!(route.delay_millis, 0);
        assert!(route.match_rule.is_none());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let parsed = serde_json::from_str::<RouteDefinition>(
            r#"{"method":"GET","path":"/","response_template":"a.json","delay":-5}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_source_rejected() {
        let parsed = serde_json::from_str::<MatchRule>(
            r#"{"field":"f","source":"header","cases":{},"default":"d.json"}"#,
        );
        assert!(parsed.is_err());
    }
}
