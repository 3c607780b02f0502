//! HTTP contract tests for the auth router
//! Drives the full Router with `oneshot`; no socket is opened.

#[cfg(test)]
mod http_tests {
    use std::time::Duration;

    use axum::Router;
    use axum::body::{Body, Bytes, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use chrono::{TimeDelta, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::{AuthConfig, HashCost};
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{user_name::UserName, user_role::UserRole};
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::dto::{LoginResponse, ProfileResponse};
    use crate::presentation::handlers::{self, AuthAppState};
    use crate::presentation::middleware::restrict_to_role;
    use crate::{admin_router, auth_router};

    const CHEAP: HashCost = HashCost {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };

    type State = AuthAppState<InMemoryUserRepository>;

    fn test_state() -> State {
        let config = AuthConfig {
            hash_cost: CHEAP,
            ..AuthConfig::with_random_secret()
        };
        AuthAppState::new(InMemoryUserRepository::new(), config).unwrap()
    }

    fn app(state: &State) -> Router {
        auth_router(state.clone()).merge(admin_router(state))
    }

    struct Reply {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    }

    impl Reply {
        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> Reply {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            headers,
            body,
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn register(app: &Router, user_name: &str, password: &str, role: Option<&str>) -> Reply {
        let mut body = json!({ "username": user_name, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        send(app, post_json("/register", body)).await
    }

    async fn login(app: &Router, user_name: &str, password: &str) -> Reply {
        send(
            app,
            post_json("/login", json!({ "username": user_name, "password": password })),
        )
        .await
    }

    async fn token_for(app: &Router, user_name: &str, password: &str) -> String {
        let reply = login(app, user_name, password).await;
        assert_eq!(reply.status, StatusCode::OK);
        serde_json::from_slice::<LoginResponse>(&reply.body)
            .unwrap()
            .token
    }

    fn assert_bearer_challenge(reply: &Reply) {
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    // ------------------------------------------------------------------------
    // Register
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_register_returns_created_without_body() {
        let state = test_state();
        let app = app(&state);

        let reply = register(&app, "alice", "pw", None).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert!(reply.body.is_empty());

        let user = state
            .repo
            .get_by_user_name(&UserName::new("alice").unwrap())
            .await
            .unwrap();
        assert_eq!(user.user_role, UserRole::user());
    }

    #[tokio::test]
    async fn test_register_requires_both_fields() {
        let state = test_state();
        let app = app(&state);

        for body in [
            json!({ "username": "", "password": "pw" }),
            json!({ "username": "bob", "password": "" }),
            json!({ "username": "bob" }),
            json!({}),
        ] {
            let reply = send(&app, post_json("/register", body)).await;
            assert_eq!(reply.status, StatusCode::BAD_REQUEST);
            assert_eq!(reply.json()["detail"], "username & password required");
        }

        assert!(state.repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_rejects_unparseable_payload() {
        let app = app(&test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let reply = send(&app, req).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.json()["detail"], "Invalid payload");
    }

    #[tokio::test]
    async fn test_register_requires_json_content_type() {
        let state = test_state();
        let app = app(&state);
        let body = json!({"username": "alice", "password": "pw"}).to_string();

        for content_type in [None, Some("text/plain")] {
            let mut builder = Request::builder().method("POST").uri("/register");
            if let Some(value) = content_type {
                builder = builder.header(header::CONTENT_TYPE, value);
            }
            let req = builder.body(Body::from(body.clone())).unwrap();

            let reply = send(&app, req).await;
            assert_eq!(reply.status, StatusCode::BAD_REQUEST);
            assert_eq!(reply.json()["detail"], "Invalid payload");
        }
        assert!(state.repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_register_is_bad_request_and_keeps_record() {
        let state = test_state();
        let app = app(&state);

        assert_eq!(register(&app, "carol", "first", None).await.status, StatusCode::CREATED);
        let before = state
            .repo
            .get_by_user_name(&UserName::new("carol").unwrap())
            .await
            .unwrap();

        let reply = register(&app, "carol", "second", Some("admin")).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.json()["detail"], "User name already taken");

        let after = state
            .repo
            .get_by_user_name(&UserName::new("carol").unwrap())
            .await
            .unwrap();
        assert_eq!(before, after);

        // Old password still works, new one does not
        assert_eq!(login(&app, "carol", "first").await.status, StatusCode::OK);
        assert_eq!(login(&app, "carol", "second").await.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_name_register_has_one_winner() {
        let app = app(&test_state());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    register(&app, "racer", &format!("pw{i}"), None).await.status
                })
            })
            .collect();

        let mut statuses = Vec::new();
        for handle in handles {
            statuses.push(handle.await.unwrap());
        }

        let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
        let rejected = statuses.iter().filter(|s| **s == StatusCode::BAD_REQUEST).count();
        assert_eq!(created, 1);
        assert_eq!(rejected, 7);
    }

    // ------------------------------------------------------------------------
    // Login
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_register_then_login_yields_token_for_user() {
        let state = test_state();
        let app = app(&state);

        register(&app, "dave", "hunter2", None).await;
        let reply = login(&app, "dave", "hunter2").await;
        assert_eq!(reply.status, StatusCode::OK);

        let body = reply.json();
        assert_eq!(body.as_object().unwrap().len(), 1);

        let token = body["token"].as_str().unwrap();
        let claims = state.codec.verify(token).unwrap();
        assert_eq!(claims.username, "dave");
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_identical() {
        let app = app(&test_state());
        register(&app, "erin", "right", None).await;

        let wrong = login(&app, "erin", "wrong").await;
        let unknown = login(&app, "nobody", "right").await;

        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.body, unknown.body);
        assert_eq!(wrong.json()["detail"], "Invalid credentials");
    }

    // ------------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_profile_requires_authorization_header() {
        let app = app(&test_state());

        let reply = send(&app, get_with_auth("/profile", None)).await;
        assert_bearer_challenge(&reply);

        let reply = send(&app, get_with_auth("/profile", Some("Basic Zm9vOmJhcg=="))).await;
        assert_bearer_challenge(&reply);
    }

    #[tokio::test]
    async fn test_profile_with_valid_token() {
        let app = app(&test_state());
        register(&app, "frank", "pw", Some("editor")).await;
        let token = token_for(&app, "frank", "pw").await;

        let reply = send(&app, get_with_auth("/profile", Some(&format!("bearer {token}")))).await;
        assert_eq!(reply.status, StatusCode::OK);

        let profile: ProfileResponse = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(
            profile,
            ProfileResponse {
                user_name: "frank".to_string(),
                role: "editor".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_profile_rejects_expired_token() {
        let state = test_state();
        let app = app(&state);

        let issued = Utc::now() - TimeDelta::hours(2);
        let token = state
            .codec
            .issue_at("gina", "user", Duration::from_secs(3600), issued)
            .unwrap();

        let reply = send(&app, get_with_auth("/profile", Some(&format!("Bearer {token}")))).await;
        assert_bearer_challenge(&reply);
        assert_eq!(reply.json()["detail"], "Invalid token");
    }

    #[tokio::test]
    async fn test_token_failures_share_one_response() {
        let state = test_state();
        let app = app(&state);
        register(&app, "hank", "pw", None).await;
        let token = token_for(&app, "hank", "pw").await;

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let expired = state
            .codec
            .issue_at("hank", "user", Duration::from_secs(1), Utc::now() - TimeDelta::hours(1))
            .unwrap();

        let foreign = crate::application::token::TokenCodec::new([0u8; 32])
            .issue("hank", "admin", Duration::from_secs(3600))
            .unwrap();

        let mut bodies = Vec::new();
        for bad in [tampered, expired, foreign, "not-a-token".to_string()] {
            let reply = send(&app, get_with_auth("/profile", Some(&format!("Bearer {bad}")))).await;
            assert_bearer_challenge(&reply);
            bodies.push(reply.body);
        }
        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }

    // ------------------------------------------------------------------------
    // Role Gate
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_admin_gate() {
        let app = app(&test_state());
        register(&app, "ivy", "pw", None).await;
        register(&app, "root", "pw", Some("admin")).await;

        let user_token = token_for(&app, "ivy", "pw").await;
        let reply = send(&app, get_with_auth("/admin", Some(&format!("Bearer {user_token}")))).await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);
        assert!(reply.headers.get(header::WWW_AUTHENTICATE).is_none());

        let admin_token = token_for(&app, "root", "pw").await;
        let reply = send(&app, get_with_auth("/admin", Some(&format!("Bearer {admin_token}")))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["username"], "root");
        assert_eq!(reply.json()["role"], "admin");
    }

    #[tokio::test]
    async fn test_admin_gate_without_token_is_unauthorized() {
        let app = app(&test_state());
        let reply = send(&app, get_with_auth("/admin", None)).await;
        assert_bearer_challenge(&reply);
    }

    #[tokio::test]
    async fn test_role_gate_without_auth_middleware_is_unauthorized() {
        let app = restrict_to_role(
            Router::new().route("/ops", axum::routing::get(handlers::profile)),
            "ops",
        );

        let reply = send(&app, get_with_auth("/ops", None)).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_match_is_exact() {
        let app = app(&test_state());
        register(&app, "jane", "pw", Some("Admin")).await;
        let token = token_for(&app, "jane", "pw").await;

        let reply = send(&app, get_with_auth("/admin", Some(&format!("Bearer {token}")))).await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);
    }
}
