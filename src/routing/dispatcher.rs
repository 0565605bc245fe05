//! Request dispatch.
//!
//! One pass per request, against the route table snapshot taken at entry:
//!
//! ```text
//! method filter → path filter → delay → auth gate → resolve → load artifact
//! ```
//!
//! The first route in table order that passes both filters owns the request.
//! An auth failure or a missing artifact ends the request; scanning never
//! continues to later routes.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;

use crate::http::request::InboundRequest;
use crate::routing::resolver;
use crate::routing::router::RouteStore;
use crate::security::token::TokenService;
use crate::storage::artifacts::{ArtifactError, ArtifactStore};

/// Why a request produced no artifact.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no route matches {method} {path}")]
    NoRouteMatch { method: String, path: String },

    #[error("route #{route} requires a valid bearer token")]
    Unauthorized { route: usize },

    #[error("route #{route}: artifact {name:?} not readable: {source}")]
    ArtifactMissing {
        route: usize,
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("route #{route}: artifact name {name:?} rejected")]
    ArtifactRejected { route: usize, name: String },
}

impl DispatchError {
    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            DispatchError::NoRouteMatch { .. } => "no_route",
            DispatchError::Unauthorized { .. } => "unauthorized",
            DispatchError::ArtifactMissing { .. } => "artifact_missing",
            DispatchError::ArtifactRejected { .. } => "artifact_rejected",
        }
    }

    fn from_artifact(route: usize, err: ArtifactError) -> Self {
        match err {
            ArtifactError::Rejected(name) => DispatchError::ArtifactRejected { route, name },
            ArtifactError::Missing { name, source } => {
                DispatchError::ArtifactMissing { route, name, source }
            }
        }
    }
}

/// A served artifact.
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// Position of the route that served the request.
    pub route: usize,
    /// Resolved artifact name.
    pub artifact: String,
    pub body: Bytes,
}

/// Routes requests to artifacts.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Arc<RouteStore>,
    artifacts: ArtifactStore,
    tokens: Arc<TokenService>,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteStore>, artifacts: ArtifactStore, tokens: Arc<TokenService>) -> Self {
        Self {
            routes,
            artifacts,
            tokens,
        }
    }

    pub async fn dispatch(&self, request: &InboundRequest) -> Result<Dispatched, DispatchError> {
        let request_id = request.request_id();
        let table = self.routes.snapshot();

        let Some(hit) = table.find(request.method.as_str(), &request.path) else {
            return Err(DispatchError::NoRouteMatch {
                method: request.method.to_string(),
                path: request.path.clone(),
            });
        };
        let route = hit.route;

        tracing::debug!(
            request_id = %request_id,
            route = hit.index,
            pattern = %route.path_pattern,
            "Route matched"
        );

        if route.delay_millis > 0 {
            tokio::time::sleep(Duration::from_millis(route.delay_millis)).await;
        }

        if route.auth_required && !self.tokens.validate(&request.headers) {
            return Err(DispatchError::Unauthorized { route: hit.index });
        }

        let artifact = resolver::resolve(route, &hit.params, request);
        let body = self
            .artifacts
            .load(&artifact)
            .await
            .map_err(|e| DispatchError::from_artifact(hit.index, e))?;

        Ok(Dispatched {
            route: hit.index,
            artifact,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::table::RouteTable;
    use axum::http::{header, HeaderMap, HeaderValue, Method};
    use std::time::Instant;
    use tempfile::TempDir;

    const SECRET: &str = "test-secret";

    fn fixture(routes: &str, artifacts: &[(&str, &str)]) -> (TempDir, Dispatcher) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in artifacts {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let table = RouteTable::from_json(routes.as_bytes()).unwrap();
        let dispatcher = Dispatcher::new(
            Arc::new(RouteStore::new(table)),
            ArtifactStore::new(dir.path()),
            Arc::new(TokenService::new(SECRET)),
        );
        (dir, dispatcher)
    }

    fn get(uri: &str) -> InboundRequest {
        let (path, query) = match uri.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (uri, None),
        };
        InboundRequest {
            method: Method::GET,
            path: path.to_string(),
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[tokio::test]
    async fn test_path_parameter_artifact() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/users/{id}","response_template":"user_{id}.json"}]"#,
            &[("user_42.json", r#"{"id":42}"#)],
        );

        let served = dispatcher.dispatch(&get("/users/42")).await.unwrap();
        assert_eq!(served.artifact, "user_42.json");
        assert_eq!(&served.body[..], br#"{"id":42}"#);
    }

    #[tokio::test]
    async fn test_query_match_scenario() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/profile","response_template":"profile.json",
                "match":{"field":"type","source":"query","cases":{"admin":"admin.json"},"default":"guest.json"}}]"#,
            &[("admin.json", "{\"role\":\"admin\"}"), ("guest.json", "{\"role\":\"guest\"}")],
        );

        let admin = dispatcher.dispatch(&get("/profile?type=admin")).await.unwrap();
        assert_eq!(admin.artifact, "admin.json");

        let other = dispatcher.dispatch(&get("/profile?type=x")).await.unwrap();
        assert_eq!(other.artifact, "guest.json");
    }

    #[tokio::test]
    async fn test_no_route_and_missing_artifact_are_distinct() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/users/{id}","response_template":"user_{id}.json"}]"#,
            &[],
        );

        let err = dispatcher.dispatch(&get("/orders/1")).await.unwrap_err();
        assert!(matches!(err, DispatchError::NoRouteMatch { .. }));

        let err = dispatcher.dispatch(&get("/users/7")).await.unwrap_err();
        assert!(matches!(err, DispatchError::ArtifactMissing { route: 0, .. }));
        assert_ne!(err.outcome(), "no_route");
    }

    #[tokio::test]
    async fn test_traversal_in_parameter_rejected() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/files/{name}","response_template":"{name}"}]"#,
            &[],
        );

        let err = dispatcher.dispatch(&get("/files/..")).await.unwrap_err();
        assert!(matches!(err, DispatchError::ArtifactRejected { .. }));
    }

    #[tokio::test]
    async fn test_unauthorized_stops_scanning() {
        let (_dir, dispatcher) = fixture(
            r#"[
                {"method":"GET","path":"/secret","response_template":"missing.json","auth":true},
                {"method":"GET","path":"/secret","response_template":"open.json"}
            ]"#,
            &[("open.json", "{}")],
        );

        // The artifact of the gated route does not exist: an auth failure
        // must be reported before any read is attempted.
        let err = dispatcher.dispatch(&get("/secret")).await.unwrap_err();
        assert!(matches!(err, DispatchError::Unauthorized { route: 0 }));
    }

    #[tokio::test]
    async fn test_valid_token_passes_gate() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/me","response_template":"me.json","auth":true}]"#,
            &[("me.json", "{\"me\":true}")],
        );

        let token = TokenService::new(SECRET).issue("alice").unwrap().token;
        let mut request = get("/me");
        request.headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        assert!(dispatcher.dispatch(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/me","response_template":"me.json","auth":true}]"#,
            &[("me.json", "{}")],
        );

        let expired = TokenService::new(SECRET)
            .issue_until("alice", chrono::Utc::now() - chrono::Duration::seconds(10))
            .unwrap()
            .token;
        let mut request = get("/me");
        request.headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {expired}")).unwrap(),
        );

        let err = dispatcher.dispatch(&request).await.unwrap_err();
        assert!(matches!(err, DispatchError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_delays_do_not_serialize() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/slow","response_template":"slow.json","delay":400}]"#,
            &[("slow.json", "{}")],
        );

        let (req_a, req_b) = (get("/slow"), get("/slow"));
        let start = Instant::now();
        let (a, b) = tokio::join!(dispatcher.dispatch(&req_a), dispatcher.dispatch(&req_b));
        let elapsed = start.elapsed();

        assert!(a.is_ok() && b.is_ok());
        assert!(elapsed >= Duration::from_millis(400));
        assert!(elapsed < Duration::from_millis(700), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_replaced_table_applies_to_next_request() {
        let (_dir, dispatcher) = fixture(
            r#"[{"method":"GET","path":"/a","response_template":"a.json"}]"#,
            &[("a.json", "{}"), ("b.json", "{}")],
        );
        assert!(dispatcher.dispatch(&get("/a")).await.is_ok());

        dispatcher.routes.replace(
            RouteTable::from_json(br#"[{"method":"GET","path":"/b","response_template":"b.json"}]"#)
                .unwrap(),
        );

        assert!(matches!(
            dispatcher.dispatch(&get("/a")).await,
            Err(DispatchError::NoRouteMatch { .. })
        ));
        assert_eq!(dispatcher.dispatch(&get("/b")).await.unwrap().artifact, "b.json");
    }
}
