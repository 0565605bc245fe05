//! Response artifact name resolution.
//!
//! Order of operations:
//! 1. Start from the route's `response_template`
//! 2. Replace every `{name}` with the captured path value (textual, no escaping)
//! 3. If the route has a match rule, the selected case (or its default)
//!    replaces the result of step 2 entirely
//!
//! The returned name is an opaque key; the artifact store decides whether it
//! is safe to read.

use serde_json::{Map, Value};

use crate::http::request::InboundRequest;
use crate::routing::matcher::PathParams;
use crate::routing::route::{MatchRule, MatchSource, RouteDefinition};

/// Compute the artifact name for a matched route.
pub fn resolve(route: &RouteDefinition, params: &PathParams, request: &InboundRequest) -> String {
    let filename = substitute(&route.response_template, params);

    match &route.match_rule {
        Some(rule) => {
            let observed = observe(rule, request);
            let selected = rule.select(&observed).to_string();
            tracing::debug!(
                field = %rule.field,
                observed = %observed,
                selected = %selected,
                "Match rule applied"
            );
            selected
        }
        None => filename,
    }
}

/// Replace `{name}` tokens with path parameter values, in capture order.
pub fn substitute(template: &str, params: &PathParams) -> String {
    params.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

/// Value of the rule's field, or empty if absent or undecodable.
fn observe(rule: &MatchRule, request: &InboundRequest) -> String {
    let value = match rule.source {
        MatchSource::Body => body_field(&request.body, &rule.field),
        MatchSource::Query => query_field(request.query.as_deref(), &rule.field),
    };
    value.unwrap_or_default()
}

/// String value of a top-level body field. Fields of any other type read as absent.
fn body_field(body: &[u8], field: &str) -> Option<String> {
    match serde_json::from_slice::<Map<String, Value>>(body) {
        Ok(mut fields) => match fields.remove(field)? {
            Value::String(value) => Some(value),
            _ => None,
        },
        Err(e) => {
            tracing::debug!(error = %e, "Request body is not a JSON object");
            None
        }
    }
}

fn query_field(query: Option<&str>, field: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == field)
        .map(|(_, value)| value.into_owned())
}
