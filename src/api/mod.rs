use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::Router;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

const SESSION_COOKIE: &str = "sid";

#[derive(Serialize)]
struct Ack {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl Ack {
    fn ok() -> Json<Ack> {
        Json(Ack {
            success: true,
            message: None,
        })
    }

    fn with_message(message: &'static str) -> Json<Ack> {
        Json(Ack {
            success: true,
            message: Some(message),
        })
    }
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    message: &'static str,
    user: BTreeMap<String, UserRecord>,
}

#[derive(Serialize)]
struct SessionResponse {
    success: bool,
    username: String,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-session", get(verify_session))
        .route("/logout", post(logout))
        .route("/todos/{username}", get(list_todos).post(add_todo))
        .route(
            "/todos/{username}/{todo_id}",
            put(toggle_todo).delete(delete_todo),
        )
        .route("/todos/{username}/{todo_id}/edit", put(edit_todo))
        .with_state(state);

    Router::new().nest("/api", api)
}

async fn register(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<Ack>, AppError> {
    let mut db = state.store.load().await?;

    if db.users.contains_key(&creds.username) {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    db.users.insert(
        creds.username,
        UserRecord {
            password: creds.password,
            todos: Vec::new(),
        },
    );
    state.store.save(&db).await?;

    Ok(Ack::ok())
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(creds): Json<Credentials>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let db = state.store.load().await?;

    let valid = db
        .users
        .get(&creds.username)
        .is_some_and(|u| u.password == creds.password);
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let token = state.sessions.create(&creds.username);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build();

    // The response carries every user's record, passwords included. The
    // front end consumes this shape, so it stays; known defect (DESIGN.md).
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Login successful",
            user: db.users,
        }),
    ))
}

async fn verify_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, AppError> {
    let username = jar
        .get(SESSION_COOKIE)
        .and_then(|c| state.sessions.get(c.value()))
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(SessionResponse {
        success: true,
        username,
    }))
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Ack>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value());
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Ack::with_message("Logged out"))
}

// Plain array, no `success` envelope, and no 404 for unknown users.
async fn list_todos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let db = state.store.load().await?;

    let todos = db
        .users
        .get(&username)
        .map(|u| u.todos.clone())
        .unwrap_or_default();
    Ok(Json(todos))
}

async fn add_todo(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(todo): Json<Todo>,
) -> Result<Json<Ack>, AppError> {
    let mut db = state.store.load().await?;

    // Unknown users get a record with an empty password.
    db.users.entry(username).or_default().todos.push(todo);
    state.store.save(&db).await?;

    Ok(Ack::ok())
}

async fn toggle_todo(
    State(state): State<AppState>,
    Path((username, todo_id)): Path<(String, String)>,
) -> Result<Json<Ack>, AppError> {
    let mut db = state.store.load().await?;

    let user = db
        .users
        .get_mut(&username)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // A non-numeric id matches nothing; the request still succeeds.
    if let Ok(id) = todo_id.parse::<i64>() {
        for todo in user.todos.iter_mut().filter(|t| t.id == id) {
            todo.completed = !todo.completed;
        }
    }

    state.store.save(&db).await?;
    Ok(Ack::ok())
}

async fn edit_todo(
    State(state): State<AppState>,
    Path((username, todo_id)): Path<(String, String)>,
    Json(req): Json<EditTodoRequest>,
) -> Result<Json<Ack>, AppError> {
    let mut db = state.store.load().await?;

    let user = db
        .users
        .get_mut(&username)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let todo = todo_id
        .parse::<i64>()
        .ok()
        .and_then(|id| user.todos.iter_mut().find(|t| t.id == id))
        .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))?;

    todo.text = req.text;

    state.store.save(&db).await?;
    Ok(Ack::with_message("Todo updated successfully"))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path((username, todo_id)): Path<(String, String)>,
) -> Result<Json<Ack>, AppError> {
    let mut db = state.store.load().await?;

    let user = db
        .users
        .get_mut(&username)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Ok(id) = todo_id.parse::<i64>() {
        user.todos.retain(|t| t.id != id);
    }

    state.store.save(&db).await?;
    Ok(Ack::ok())
}
