use crate::{
    media::MediaFile,
    record::{ErrorBody, SessionRecord, UploadRecord},
};
use campusfeed_common::model::{
    Id, ModelValidationError,
    post::{CreatePost, DeletedPost, MediaReference, Post, PostList, PostMarker, UpdatePost},
    user::SessionUser,
};
use reqwest::{
    RequestBuilder, Response, StatusCode,
    cookie::Jar,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server replied with {status}: {}", .body.message().unwrap_or("no message"))]
    Server { status: StatusCode, body: ErrorBody },
    #[error("Invalid API url: {0}")]
    Url(#[from] url::ParseError),
    #[error("The server sent an invalid object: {0}")]
    Data(#[from] ModelValidationError),
}

impl ClientError {
    /// The message the server attached to a failed reply, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { body, .. } => body.message(),
            _ => None,
        }
    }
}

/// Typed access to the posts, media upload and session endpoints.
///
/// Session credentials live in the client's cookie store, so every request
/// carries whatever cookies the backend has set.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_session_cookie(base_url, None)
    }

    /// Like [`ApiClient::new`], seeding the cookie store with a session
    /// cookie such as `session=abc123`.
    pub fn with_session_cookie(mut base_url: Url, session_cookie: Option<&str>) -> Result<Self> {
        // Endpoint paths are joined relative to the base.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let jar = Jar::default();
        if let Some(cookie) = session_cookie {
            jar.add_cookie_str(cookie, &base_url);
        }

        let http = reqwest::Client::builder()
            .cookie_provider(Arc::new(jar))
            .build()?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        debug!("Fetching posts");
        let list: PostList = self.send(self.http.get(self.endpoint("api/posts")?)).await?;

        Ok(list.posts)
    }

    pub async fn create_post(&self, post: &CreatePost) -> Result<Post> {
        debug!(media_public_id = %post.media_public_id, "Creating post");
        let request = self.http.post(self.endpoint("api/posts")?).json(post);

        self.send(request).await
    }

    pub async fn update_post(&self, post_id: Id<PostMarker>, update: &UpdatePost) -> Result<Post> {
        debug!(%post_id, "Updating post");
        let request = self
            .http
            .put(self.endpoint(&format!("api/posts/{post_id}"))?)
            .json(update);

        self.send(request).await
    }

    pub async fn delete_post(&self, post_id: Id<PostMarker>) -> Result<Id<PostMarker>> {
        debug!(%post_id, "Deleting post");
        let request = self
            .http
            .delete(self.endpoint(&format!("api/posts/{post_id}"))?);
        let deleted: DeletedPost = self.send(request).await?;

        Ok(deleted.deleted)
    }

    pub async fn toggle_like(&self, post_id: Id<PostMarker>) -> Result<Post> {
        debug!(%post_id, "Toggling like");
        let request = self
            .http
            .post(self.endpoint(&format!("api/posts/{post_id}/like"))?);

        self.send(request).await
    }

    pub async fn register_view(&self, post_id: Id<PostMarker>) -> Result<Post> {
        debug!(%post_id, "Registering view");
        let request = self
            .http
            .post(self.endpoint(&format!("api/posts/{post_id}/view"))?);

        self.send(request).await
    }

    pub async fn upload_media(&self, file: &MediaFile) -> Result<MediaReference> {
        debug!(name = file.name(), len = file.len(), "Uploading media");
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_owned())
            .mime_str(file.content_type())?;
        let form = Form::new()
            .part("file", part)
            .text("resource_type", file.media_type().as_str());
        let request = self
            .http
            .post(self.endpoint("api/media/upload")?)
            .multipart(form);
        let upload: UploadRecord = self.send(request).await?;

        Ok(upload.into())
    }

    pub async fn fetch_current_user(&self) -> Result<SessionUser> {
        let record: SessionRecord = self.send(self.http.get(self.endpoint("users/me")?)).await?;

        Ok(SessionUser::try_from(record)?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|err| {
        warn!(%status, error = %err, "Error reply did not carry a JSON body");
        ErrorBody::default()
    });

    Err(ClientError::Server { status, body })
}
