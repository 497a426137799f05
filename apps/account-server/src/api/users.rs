//! User API endpoints.

use std::sync::Arc;

use account_store::AccountStore;
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::CookieJar;
use entities::{NewUser, Profile, Settings, UniqueKey, UserId, UserSummary, UserView};
use serde::{Deserialize, Serialize};

use crate::error::ServerResult;
use crate::middleware::{BearerToken, session_cookie};
use crate::state::AppState;

/// Login request. Which credential field is read depends on the unique key.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    fn credential(&self, key: UniqueKey) -> &str {
        match key {
            UniqueKey::Email => self.email.as_deref(),
            UniqueKey::Handle => self.handle.as_deref(),
        }
        .unwrap_or_default()
    }
}

/// Login response: the user's view plus the token also set as a cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserView,
    pub access_token: String,
}

/// Registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

/// Subscribe/unsubscribe request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub user_id: UserId,
}

/// Response for operations with nothing else to report.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Registers a new user.
pub async fn register<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<NewUser>,
) -> ServerResult<(StatusCode, Json<RegisterResponse>)> {
    let user = state.accounts.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
            name: user.name,
        }),
    ))
}

/// Logs a user in and sets the session cookie.
pub async fn login<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ServerResult<(CookieJar, Json<LoginResponse>)> {
    let credential = request.credential(state.accounts.unique_key());
    let (user, token) = state.accounts.login(credential, &request.password).await?;

    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            user,
            access_token: token,
        }),
    ))
}

/// Gets the current user.
pub async fn get_user_info<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(token): BearerToken,
) -> ServerResult<Json<UserView>> {
    Ok(Json(state.accounts.resolve_token(&token).await?))
}

/// Lists every user.
pub async fn list_all<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<UserSummary>>> {
    Ok(Json(state.accounts.list_all().await?))
}

/// Lists users born today.
pub async fn list_today<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<UserSummary>>> {
    Ok(Json(state.accounts.list_born_today().await?))
}

/// Lists other users with the caller's subscription flags.
pub async fn list_profiles<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(token): BearerToken,
) -> ServerResult<Json<Vec<Profile>>> {
    Ok(Json(state.accounts.list_profiles(&token).await?))
}

/// Subscribes the caller to a user.
pub async fn subscribe<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(token): BearerToken,
    Json(request): Json<SubscribeRequest>,
) -> ServerResult<Json<SuccessResponse>> {
    state.accounts.subscribe(&token, request.user_id).await?;
    Ok(SuccessResponse::ok())
}

/// Unsubscribes the caller from a user.
pub async fn unsubscribe<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(token): BearerToken,
    Json(request): Json<SubscribeRequest>,
) -> ServerResult<Json<SuccessResponse>> {
    state.accounts.unsubscribe(&token, request.user_id).await?;
    Ok(SuccessResponse::ok())
}

/// Updates the caller's notification settings.
pub async fn update_settings<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(token): BearerToken,
    Json(request): Json<Settings>,
) -> ServerResult<Json<SuccessResponse>> {
    state.accounts.update_settings(&token, request).await?;
    Ok(SuccessResponse::ok())
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{
            HeaderMap, Request,
            header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        },
    };
    use chrono::Local;
    use entities::format_date;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::{create_app, create_state, create_store};

    fn app() -> Router {
        app_keyed_by(UniqueKey::Email)
    }

    fn app_keyed_by(unique_key: UniqueKey) -> Router {
        let config = Config {
            unique_key,
            seed_users: false,
            birthday_sweep_interval: None,
            ..Config::default()
        };
        create_app(create_state(&config, create_store(&config)))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    fn post(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn registration(email: &str, date_of_birth: &str) -> Value {
        json!({
            "email": email,
            "name": "Test User",
            "password": "password",
            "dateOfBirth": date_of_birth,
        })
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let (status, _, _) = send(app, post("/user/register", registration(email, "1990-05-17"), None)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _, body) = send(
            app,
            post("/user/login", json!({"email": email, "password": "password"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["accessToken"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_register_statuses() {
        let app = app();

        let (status, _, body) =
            send(&app, post("/user/register", registration("a@example.com", "1990-05-17"), None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert!(body.get("password").is_none());

        let (status, _, body) =
            send(&app, post("/user/register", registration("a@example.com", "1990-05-17"), None)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "already_exists");

        let (status, _, body) =
            send(&app, post("/user/register", registration("b@example.com", ""), None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "fields_required");
    }

    #[tokio::test]
    async fn test_login_and_info() {
        let app = app();
        send(&app, post("/user/register", registration("a@example.com", "1990-05-17"), None)).await;

        let (status, _, _) = send(
            &app,
            post("/user/login", json!({"email": "a@example.com", "password": "wrong"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, body) = send(
            &app,
            post("/user/login", json!({"email": "nobody@example.com", "password": "x"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "user doesn't exist");

        let (status, headers, body) = send(
            &app,
            post("/user/login", json!({"email": "a@example.com", "password": "password"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@example.com");
        assert_eq!(body["daysToNotification"], 2);
        assert!(body.get("password").is_none());
        let token = body["accessToken"].as_str().unwrap().to_string();

        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("token={token}")));

        // Bearer header.
        let (status, _, body) = send(&app, get("/user/info", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@example.com");

        // Cookie.
        let request = Request::builder()
            .uri("/user/info")
            .header(COOKIE, format!("token={token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = send(&app, get("/user/info", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, _) = send(&app, get("/user/info", Some("bogus"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_handle_keyed_register_and_login() {
        let app = app_keyed_by(UniqueKey::Handle);

        // Handle is required when users are keyed by it.
        let (status, _, _) =
            send(&app, post("/user/register", registration("a@example.com", "1990-05-17"), None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let mut alice = registration("a@example.com", "1990-05-17");
        alice["handle"] = json!("alice");
        let (status, _, _) = send(&app, post("/user/register", alice, None)).await;
        assert_eq!(status, StatusCode::CREATED);

        // Same handle, different email.
        let mut clash = registration("b@example.com", "1990-05-17");
        clash["handle"] = json!("alice");
        let (status, _, _) = send(&app, post("/user/register", clash, None)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        // The email field is not a credential here.
        let (status, _, _) = send(
            &app,
            post("/user/login", json!({"email": "a@example.com", "password": "password"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _, body) = send(
            &app,
            post("/user/login", json!({"handle": "alice", "password": "password"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@example.com");

        let token = body["accessToken"].as_str().unwrap().to_string();
        let (status, _, body) = send(&app, get("/user/info", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@example.com");
    }

    #[tokio::test]
    async fn test_missing_fields_use_error_body() {
        let app = app();
        let token = register_and_login(&app, "a@example.com").await;

        let (status, _, body) =
            send(&app, post("/user/login", json!({"email": "a@example.com"}), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_credentials");

        let (status, _, body) = send(&app, post("/user/settings", json!({}), Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, _, body) = send(&app, get("/user/info", Some(&token))).await;
        assert_eq!(body["daysToNotification"], 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_target_and_token() {
        let app = app();
        let token = register_and_login(&app, "a@example.com").await;

        let (status, _, body) = send(
            &app,
            post("/user/unsubscribe", json!({"userId": 99}), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "not_exists");

        let (status, _, body) = send(
            &app,
            post("/user/unsubscribe", json!({"userId": 1}), Some("bogus")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_relogin_invalidates_old_token() {
        let app = app();
        let first = register_and_login(&app, "a@example.com").await;

        let (_, _, body) = send(
            &app,
            post("/user/login", json!({"email": "a@example.com", "password": "password"}), None),
        )
        .await;
        let second = body["accessToken"].as_str().unwrap().to_string();

        let (status, _, _) = send(&app, get("/user/info", Some(&first))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _, _) = send(&app, get("/user/info", Some(&second))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_subscription_endpoints() {
        let app = app();
        let token = register_and_login(&app, "a@example.com").await;
        send(&app, post("/user/register", registration("b@example.com", "1990-05-17"), None)).await;

        let subscribe = || post("/user/subscribe", json!({"userId": 2}), Some(&token));
        let unsubscribe = || post("/user/unsubscribe", json!({"userId": 2}), Some(&token));

        let (status, _, body) = send(&app, subscribe()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _, _) = send(&app, subscribe()).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _, body) = send(&app, get("/user/list", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{
            "id": 2,
            "email": "b@example.com",
            "name": "Test User",
            "isSubscribed": true,
        }]));

        let (status, _, _) = send(&app, unsubscribe()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _, body) = send(&app, unsubscribe()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "not_exists");

        let (status, _, _) = send(
            &app,
            post("/user/subscribe", json!({"userId": 1}), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _, _) = send(&app, post("/user/subscribe", json!({"userId": 2}), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_listings() {
        let app = app();
        let today = format_date(Local::now().date_naive());
        send(&app, post("/user/register", registration("today@example.com", &today), None)).await;
        send(&app, post("/user/register", registration("past@example.com", "1985-03-14"), None)).await;

        let (status, _, body) = send(&app, get("/user/list-today", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"email": "today@example.com", "name": "Test User"}]));

        let (status, _, body) = send(&app, get("/user/all", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_settings() {
        let app = app();
        let token = register_and_login(&app, "a@example.com").await;

        let (status, _, body) = send(
            &app,
            post("/user/settings", json!({"daysToNotification": 7}), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, _, body) = send(&app, get("/user/info", Some(&token))).await;
        assert_eq!(body["daysToNotification"], 7);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
