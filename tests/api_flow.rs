//! End-to-end flows against a real PostgreSQL container.
//!
//! Run with `cargo test -- --ignored` on a machine with Docker.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use tower::ServiceExt;

use clubhouse::{
    build_router,
    config::{AdminConfig, CorsConfig, DatabaseConfig, JwtConfig, ServerConfig, TournamentConfig},
    db,
    services::AuthService,
    AppState, Config,
};

const PASSWORD: &str = "correct-horse-battery";

struct TestApp {
    router: Router,
    pool: PgPool,
    _container: ContainerAsync<Postgres>,
}

impl TestApp {
    async fn start() -> Self {
        let container = Postgres::default()
            .with_user("clubhouse")
            .with_password("clubhouse_test")
            .with_db_name("clubhouse_test")
            .start()
            .await
            .expect("Failed to start PostgreSQL container");

        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(5432).await.unwrap();
        let url = format!("postgres://clubhouse:clubhouse_test@{host}:{port}/clubhouse_test");

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                rust_log: "debug".to_string(),
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "integration-secret".to_string(),
                expiry_hours: 1,
                refresh_token_expiry_days: 7,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
            tournament: TournamentConfig {
                invitation_expiry_days: 7,
            },
            admin: Some(admin_config("boss")),
        };

        let pool = db::create_pool(&config.database)
            .await
            .expect("Failed to connect to test database");
        db::run_migrations(&pool).await.expect("Failed to run migrations");
        if let Some(admin) = &config.admin {
            AuthService::bootstrap_admin(&pool, admin)
                .await
                .expect("Failed to bootstrap admin");
        }

        Self {
            router: build_router(AppState::new(pool.clone(), config)),
            pool,
            _container: container,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(format!("/api/v1{uri}"));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Register and log in; returns (user id, access token)
    async fn sign_up(&self, username: &str) -> (i64, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@club.example"),
                    "full_name": format!("Player {username}"),
                    "password": PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let id = body["user"]["id"].as_i64().unwrap();

        (id, self.log_in(username).await)
    }

    async fn log_in(&self, username: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "identifier": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Log in as the configured admin; returns (user id, access token)
    async fn admin(&self) -> (i64, String) {
        let id = self.user_id("boss").await;
        (id, self.log_in("boss").await)
    }

    async fn user_id(&self, username: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn count(&self, sql: &str, id: i64) -> i64 {
        sqlx::query_scalar(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Create a tournament as `token`; returns its id
    async fn create_tournament(&self, token: &str, name: &str) -> i64 {
        let (status, tournament) = self
            .call(
                Method::POST,
                "/tournaments",
                Some(token),
                Some(json!({ "name": name, "start_date": "2026-10-01T10:00:00Z" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{tournament}");
        tournament["id"].as_i64().unwrap()
    }

    /// Invite a user; returns (status, response body)
    async fn invite(&self, token: &str, tid: i64, user_id: i64) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            &format!("/tournaments/{tid}/invite/{user_id}"),
            Some(token),
            None,
        )
        .await
    }

    async fn respond(&self, token: &str, invitation_id: i64, response: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            &format!("/invitations/{invitation_id}/respond"),
            Some(token),
            Some(json!({ "response": response })),
        )
        .await
    }
}

fn admin_config(username: &str) -> AdminConfig {
    AdminConfig {
        username: username.to_string(),
        email: format!("{username}@club.example"),
        password: PASSWORD.to_string(),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_match_verification_flow() {
    let app = TestApp::start().await;
    let (alice, alice_token) = app.sign_up("alice").await;
    let (bob, bob_token) = app.sign_up("bob").await;
    let (_, boss_token) = app.admin().await;

    let (status, created) = app
        .call(
            Method::POST,
            "/matches",
            Some(&alice_token),
            Some(json!({
                "player1_id": alice,
                "player2_id": bob,
                "player1_score": 21,
                "player2_score": 15,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["status"], "pending_verification");
    assert_eq!(created["match_type"], "casual");
    assert_eq!(created["player1_verified"], true);
    assert_eq!(created["player2_verified"], false);
    let match_id = created["id"].as_i64().unwrap();

    let (_, progress) = app
        .call(
            Method::GET,
            &format!("/matches/{match_id}/verification-status"),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(progress["can_current_user_verify"], false);
    assert_eq!(progress["player2_needs_verification"], true);

    let (status, pending) = app
        .call(Method::GET, "/matches/pending-verification", Some(&bob_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["matches"].as_array().unwrap().len(), 1);

    let (status, verified) = app
        .call(
            Method::POST,
            &format!("/matches/{match_id}/verify"),
            Some(&bob_token),
            Some(json!({ "verified": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{verified}");
    assert_eq!(verified["status"], "verified");
    assert_eq!(verified["winner_id"], alice);

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/matches/{match_id}/verify"),
            Some(&bob_token),
            Some(json!({ "verified": true })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, second) = app
        .call(
            Method::POST,
            "/matches",
            Some(&bob_token),
            Some(json!({
                "player1_id": alice,
                "player2_id": bob,
                "player1_score": 3,
                "player2_score": 21,
            })),
        )
        .await;
    let second_id = second["id"].as_i64().unwrap();

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/matches/{second_id}/reject"),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, rejected) = app
        .call(
            Method::POST,
            &format!("/matches/{second_id}/reject"),
            Some(&boss_token),
            Some(json!({ "notes": "scores disputed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{rejected}");
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["notes"], "scores disputed");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_tournament_to_medals_flow() {
    let app = TestApp::start().await;
    let (alice, alice_token) = app.sign_up("alice").await;
    let (bob, bob_token) = app.sign_up("bob").await;
    let (boss, boss_token) = app.admin().await;

    let (status, tournament) = app
        .call(
            Method::POST,
            "/tournaments",
            Some(&boss_token),
            Some(json!({
                "name": "Autumn Open",
                "start_date": "2026-10-01T10:00:00Z",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{tournament}");
    assert_eq!(tournament["status"], "inviting");
    let tid = tournament["id"].as_i64().unwrap();

    let (status, _) = app
        .call(Method::POST, &format!("/tournaments/{tid}/start"), Some(&boss_token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for (user_id, token) in [(alice, &alice_token), (bob, &bob_token)] {
        let (status, invited) = app
            .call(
                Method::POST,
                &format!("/tournaments/{tid}/invite/{user_id}"),
                Some(&boss_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{invited}");
        assert_eq!(invited["outcome"], "invited");
        let invitation_id = invited["invitation"]["id"].as_i64().unwrap();

        let (status, answered) = app
            .call(
                Method::POST,
                &format!("/invitations/{invitation_id}/respond"),
                Some(token),
                Some(json!({ "response": "accepted" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{answered}");
        assert_eq!(answered["status"], "accepted");
    }

    let (_, joined) = app
        .call(
            Method::POST,
            &format!("/tournaments/{tid}/invite/{boss}"),
            Some(&boss_token),
            None,
        )
        .await;
    assert_eq!(joined["outcome"], "joined");

    let (status, started) = app
        .call(Method::POST, &format!("/tournaments/{tid}/start"), Some(&boss_token), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{started}");
    assert_eq!(started["status"], "active");

    // One win each; alice takes the better points delta
    let games = [
        (&alice_token, &bob_token, 21, 10),
        (&bob_token, &alice_token, 19, 21),
    ];
    for (submitter, confirmer, p1, p2) in games {
        let (status, m) = app
            .call(
                Method::POST,
                "/matches",
                Some(submitter),
                Some(json!({
                    "player1_id": alice,
                    "player2_id": bob,
                    "player1_score": p1,
                    "player2_score": p2,
                    "tournament_id": tid,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{m}");
        assert_eq!(m["match_type"], "tournament");

        let (status, _) = app
            .call(
                Method::POST,
                &format!("/matches/{}/verify", m["id"]),
                Some(confirmer),
                Some(json!({ "verified": true })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, board) = app
        .call(Method::GET, &format!("/tournaments/{tid}/leaderboard"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{board}");
    let standings = board["standings"].as_array().unwrap();
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0]["user_id"], alice);
    assert_eq!(standings[0]["rank"], 1);
    assert_eq!(standings[0]["points_delta"], 9);

    let (status, _) = app
        .call(
            Method::GET,
            &format!("/tournaments/{tid}/leaderboard"),
            Some("not-a-jwt"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/tournaments/{tid}/complete"),
            Some(&boss_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, awarded) = app
        .call(
            Method::POST,
            &format!("/medals/tournament/{tid}/award"),
            Some(&boss_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{awarded}");
    assert_eq!(awarded["awarded"]["gold"], 1);
    assert_eq!(awarded["awarded"]["silver"], 1);
    assert_eq!(awarded["awarded"]["total"], 2);

    let (status, again) = app
        .call(
            Method::POST,
            &format!("/medals/tournament/{tid}/award"),
            Some(&boss_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{again}");
    assert_eq!(again["awarded"], awarded["awarded"]);
    assert_eq!(
        app.count("SELECT COUNT(*) FROM medals WHERE tournament_id = $1", tid).await,
        2
    );

    let (_, listed) = app
        .call(Method::GET, &format!("/medals/tournament/{tid}"), Some(&boss_token), None)
        .await;
    let medals = listed["medals"].as_array().unwrap();
    let gold = medals.iter().find(|m| m["user_id"] == alice).unwrap();
    assert_eq!(gold["position"], 1);
    assert_eq!(gold["medal_type"], "gold");
    let silver = medals.iter().find(|m| m["user_id"] == bob).unwrap();
    assert_eq!(silver["position"], 2);
    assert_eq!(silver["medal_type"], "silver");

    let (_, mine) = app.call(Method::GET, "/medals/me", Some(&alice_token), None).await;
    assert_eq!(mine["medals"]["gold"], 1);

    let (_, theirs) = app.call(Method::GET, "/medals/me", Some(&bob_token), None).await;
    assert_eq!(theirs["medals"]["silver"], 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_admin_bootstrap_is_idempotent_and_promotes() {
    let app = TestApp::start().await;
    let (boss, boss_token) = app.admin().await;
    app.create_tournament(&boss_token, "Spring Ladder").await;

    let again = AuthService::bootstrap_admin(&app.pool, &admin_config("boss"))
        .await
        .unwrap();
    assert_eq!(again.id, boss);

    let (carol, carol_token) = app.sign_up("carol").await;
    let payload = json!({ "name": "Carol Cup", "start_date": "2026-11-01T10:00:00Z" });
    let (status, _) = app
        .call(Method::POST, "/tournaments", Some(&carol_token), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let promoted = AuthService::bootstrap_admin(&app.pool, &admin_config("carol"))
        .await
        .unwrap();
    assert_eq!(promoted.id, carol);

    // Existing password still works and the new role applies
    let carol_token = app.log_in("carol").await;
    let (status, _) = app
        .call(Method::POST, "/tournaments", Some(&carol_token), Some(payload))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_invitation_lifecycle() {
    let app = TestApp::start().await;
    let (boss, boss_token) = app.admin().await;
    let (alice, alice_token) = app.sign_up("alice").await;
    let (carol, _) = app.sign_up("carol").await;
    let (dave, dave_token) = app.sign_up("dave").await;
    let tid = app.create_tournament(&boss_token, "Winter Cup").await;

    // Organizer joins directly without an invitation row
    let (status, joined) = app.invite(&boss_token, tid, boss).await;
    assert_eq!(status, StatusCode::CREATED, "{joined}");
    assert_eq!(joined["outcome"], "joined");
    assert_eq!(
        app.count(
            "SELECT COUNT(*) FROM tournament_invitations WHERE user_id = $1",
            boss
        )
        .await,
        0
    );

    // Pending invitation blocks a second one
    let (status, _) = app.invite(&boss_token, tid, carol).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.invite(&boss_token, tid, carol).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Removed participants can be invited again
    let (_, invited) = app.invite(&boss_token, tid, alice).await;
    let first = invited["invitation"]["id"].as_i64().unwrap();
    let (status, _) = app.respond(&alice_token, first, "accepted").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/tournaments/{tid}/participants/{alice}"),
            Some(&boss_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, reinvited) = app.invite(&boss_token, tid, alice).await;
    assert_eq!(status, StatusCode::CREATED, "{reinvited}");
    assert_eq!(reinvited["invitation"]["status"], "pending");
    let second = reinvited["invitation"]["id"].as_i64().unwrap();
    let (status, _) = app.respond(&alice_token, second, "accepted").await;
    assert_eq!(status, StatusCode::OK);

    let (_, participants) = app
        .call(
            Method::GET,
            &format!("/tournaments/{tid}/participants"),
            Some(&boss_token),
            None,
        )
        .await;
    let participants = participants["participants"].as_array().unwrap();
    assert!(participants.iter().any(|p| p["user_id"] == alice));

    // Answering after the deadline persists the expiry and enrolls nobody
    let (_, invited) = app.invite(&boss_token, tid, dave).await;
    let late = invited["invitation"]["id"].as_i64().unwrap();
    sqlx::query("UPDATE tournament_invitations SET expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(late)
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, _) = app.respond(&dave_token, late, "accepted").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let expired: String =
        sqlx::query_scalar("SELECT status FROM tournament_invitations WHERE id = $1")
            .bind(late)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(expired, "expired");
    assert_eq!(
        app.count(
            "SELECT COUNT(*) FROM tournament_participants WHERE user_id = $1",
            dave
        )
        .await,
        0
    );

    // Starting drops invitations nobody answered
    let (status, _) = app
        .call(Method::POST, &format!("/tournaments/{tid}/start"), Some(&boss_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.count(
            "SELECT COUNT(*) FROM tournament_invitations WHERE tournament_id = $1 AND status = 'pending'",
            tid
        )
        .await,
        0
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_concurrent_verification_settles_once() {
    let app = TestApp::start().await;
    let (alice, alice_token) = app.sign_up("alice").await;
    let (bob, bob_token) = app.sign_up("bob").await;
    let (_, carol_token) = app.sign_up("carol").await;

    let (status, created) = app
        .call(
            Method::POST,
            "/matches",
            Some(&carol_token),
            Some(json!({
                "player1_id": alice,
                "player2_id": bob,
                "player1_score": 11,
                "player2_score": 7,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["player1_verified"], false);
    assert_eq!(created["player2_verified"], false);
    let match_id = created["id"].as_i64().unwrap();

    let uri = format!("/matches/{match_id}/verify");
    let body = json!({ "verified": true });
    let (first, second) = tokio::join!(
        app.call(Method::POST, &uri, Some(&alice_token), Some(body.clone())),
        app.call(Method::POST, &uri, Some(&bob_token), Some(body.clone())),
    );
    assert_eq!(first.0, StatusCode::OK, "{}", first.1);
    assert_eq!(second.0, StatusCode::OK, "{}", second.1);

    let (_, settled) = app
        .call(Method::GET, &format!("/matches/{match_id}"), Some(&alice_token), None)
        .await;
    assert_eq!(settled["status"], "verified");
    assert_eq!(settled["player1_verified"], true);
    assert_eq!(settled["player2_verified"], true);
    assert_eq!(settled["winner_id"], alice);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_login_prunes_expired_refresh_tokens() {
    let app = TestApp::start().await;
    let (alice, _) = app.sign_up("alice").await;

    sqlx::query(
        "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, 'stale', NOW() - INTERVAL '1 day')",
    )
    .bind(alice)
    .execute(&app.pool)
    .await
    .unwrap();

    let _ = app.log_in("alice").await;

    assert_eq!(
        app.count(
            "SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1 AND expires_at < NOW()",
            alice
        )
        .await,
        0
    );
    assert_eq!(
        app.count("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1", alice)
            .await,
        2
    );
}
