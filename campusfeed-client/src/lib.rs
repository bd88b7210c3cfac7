pub mod client;
pub mod media;
pub mod record;

pub use client::{ApiClient, ClientError};
pub use media::MediaFile;
pub use reqwest::StatusCode;
