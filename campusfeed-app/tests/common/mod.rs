//! In-process stand-in for the campus backend.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use campusfeed_common::model::{
    Id,
    post::{Caption, CreatePost, MediaReference, MediaType, Post, UpdatePost},
    user::{Author, Role, SessionUser},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::{collections::HashMap, sync::Arc};
use time::macros::datetime;
use url::Url;

pub type Shared = Arc<Mutex<Backend>>;

#[derive(Debug, Default)]
pub struct Backend {
    pub posts: Vec<Post>,
    pub me: Option<SessionUser>,
    /// `"METHOD /path"` for every request received, in order.
    pub requests: Vec<String>,
    /// Canned error replies, keyed by the request line they answer.
    pub failures: HashMap<String, (StatusCode, Value)>,
    /// `(file name, resource_type)` of every upload.
    pub uploads: Vec<(String, String)>,
    pub next_id: u64,
}

impl Backend {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            next_id: 100,
            posts,
            ..Self::default()
        }
    }

    pub fn signed_in_as(mut self, user: SessionUser) -> Self {
        self.me = Some(user);
        self
    }

    pub fn failing(mut self, request: &str, status: StatusCode, body: Value) -> Self {
        self.failures.insert(request.to_owned(), (status, body));
        self
    }

    fn record(&mut self, request: String) -> Option<Response> {
        let failure = self.failures.get(&request).cloned();
        self.requests.push(request);
        failure.map(|(status, body)| (status, Json(body)).into_response())
    }

    fn post_mut(&mut self, id: u64) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id == Id::new(id))
    }
}

pub fn make_post(id: u64, author_id: u64, caption: &str) -> Post {
    Post {
        id: Id::new(id),
        caption: Caption::new(caption.to_owned()).unwrap(),
        created_at: datetime!(2026-01-01 00:00 UTC),
        author: Author {
            id: Id::new(author_id),
            name: Some("A".to_owned()),
            email: Some("a@school.edu".to_owned()),
        },
        media: MediaReference {
            public_id: format!("p{id}"),
            url: "https://cdn/img.jpg".to_owned(),
            media_type: MediaType::Image,
        },
        likes: 0,
        views: 0,
        liked_by_me: false,
        viewed_by_me: false,
    }
}

pub fn user(id: u64, role: Role) -> SessionUser {
    SessionUser {
        id: Some(Id::new(id)),
        email: format!("user{id}@school.edu"),
        name: Some(format!("User {id}")),
        role,
    }
}

/// Serves `backend` on an ephemeral local port and returns its base url.
pub async fn spawn(backend: Backend) -> (Url, Shared) {
    let shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/{id}", put(update_post).delete(delete_post))
        .route("/api/posts/{id}/like", post(toggle_like))
        .route("/api/posts/{id}/view", post(register_view))
        .route("/api/media/upload", post(upload_media))
        .route("/users/me", get(current_user))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), shared)
}

/// A base url nothing is listening on.
pub async fn unreachable_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    Url::parse(&format!("http://{addr}")).unwrap()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Post not found" }))).into_response()
}

async fn list_posts(State(backend): State<Shared>) -> Response {
    let mut backend = backend.lock();
    if let Some(failure) = backend.record("GET /api/posts".to_owned()) {
        return failure;
    }

    Json(json!({ "posts": backend.posts })).into_response()
}

async fn create_post(State(backend): State<Shared>, Json(body): Json<CreatePost>) -> Response {
    let mut backend = backend.lock();
    if let Some(failure) = backend.record("POST /api/posts".to_owned()) {
        return failure;
    }

    let id = backend.next_id;
    backend.next_id += 1;
    let author_id = backend
        .me
        .as_ref()
        .and_then(|me| me.id)
        .map_or(1, Id::get);
    let mut post = make_post(id, author_id, body.caption.get());
    post.media = MediaReference {
        public_id: body.media_public_id,
        url: body.media_url,
        media_type: body.media_type,
    };
    backend.posts.insert(0, post.clone());

    (StatusCode::CREATED, Json(post)).into_response()
}

async fn update_post(
    State(backend): State<Shared>,
    Path(id): Path<u64>,
    Json(body): Json<UpdatePost>,
) -> Response {
    let mut backend = backend.lock();
    if let Some(failure) = backend.record(format!("PUT /api/posts/{id}")) {
        return failure;
    }

    let Some(post) = backend.post_mut(id) else {
        return not_found();
    };
    // The real backend trims captions before storing them.
    post.caption = Caption::new(body.caption.get().trim().to_owned()).unwrap();

    Json(post.clone()).into_response()
}

async fn delete_post(State(backend): State<Shared>, Path(id): Path<u64>) -> Response {
    let mut backend = backend.lock();
    if let Some(failure) = backend.record(format!("DELETE /api/posts/{id}")) {
        return failure;
    }

    backend.posts.retain(|post| post.id != Id::new(id));
    Json(json!({ "deleted": id })).into_response()
}

async fn toggle_like(State(backend): State<Shared>, Path(id): Path<u64>) -> Response {
    let mut backend = backend.lock();
    if let Some(failure) = backend.record(format!("POST /api/posts/{id}/like")) {
        return failure;
    }

    let Some(post) = backend.post_mut(id) else {
        return not_found();
    };
    if post.liked_by_me {
        post.likes -= 1;
    } else {
        post.likes += 1;
    }
    post.liked_by_me = !post.liked_by_me;

    Json(post.clone()).into_response()
}

async fn register_view(State(backend): State<Shared>, Path(id): Path<u64>) -> Response {
    let mut backend = backend.lock();
    if let Some(failure) = backend.record(format!("POST /api/posts/{id}/view")) {
        return failure;
    }

    let Some(post) = backend.post_mut(id) else {
        return not_found();
    };
    if !post.viewed_by_me {
        post.views += 1;
        post.viewed_by_me = true;
    }

    Json(post.clone()).into_response()
}

async fn upload_media(State(backend): State<Shared>, mut multipart: Multipart) -> Response {
    let mut file_name = String::new();
    let mut resource_type = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name() {
            Some("file") => file_name = field.file_name().unwrap_or_default().to_owned(),
            Some("resource_type") => resource_type = field.text().await.unwrap(),
            _ => {}
        }
    }

    let mut backend = backend.lock();
    if let Some(failure) = backend.record("POST /api/media/upload".to_owned()) {
        return failure;
    }
    backend.uploads.push((file_name, resource_type.clone()));

    Json(json!({
        "public_id": "new-public",
        "url": "https://cdn/new.jpg",
        "type": resource_type,
    }))
    .into_response()
}

async fn current_user(State(backend): State<Shared>) -> Response {
    let mut backend = backend.lock();
    if let Some(failure) = backend.record("GET /users/me".to_owned()) {
        return failure;
    }

    match &backend.me {
        Some(me) => Json(me.clone()).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized", "message": "Valid access token is required" })),
        )
            .into_response(),
    }
}
