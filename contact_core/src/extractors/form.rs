//! Lenient contact form extractor
//!
//! Accepts `application/x-www-form-urlencoded` and `multipart/form-data`
//! bodies. It never rejects: an unreadable body yields whatever fields were
//! recovered before the failure, so the relay still attempts the provider
//! call.

use crate::models::ContactSubmission;
use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use std::convert::Infallible;
use tracing::warn;

pub struct ContactFields(pub ContactSubmission);

#[async_trait]
impl<S> FromRequest<S> for ContactFields
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .trim_start()
                    .to_ascii_lowercase()
                    .starts_with("multipart/form-data")
            })
            .unwrap_or(false);

        let pairs = if is_multipart {
            read_multipart(req, state).await
        } else {
            read_urlencoded(req, state).await
        };

        Ok(ContactFields(ContactSubmission::from_pairs(pairs)))
    }
}

async fn read_urlencoded<S>(req: Request<Body>, state: &S) -> Vec<(String, String)>
where
    S: Send + Sync,
{
    match Bytes::from_request(req, state).await {
        Ok(bytes) => url::form_urlencoded::parse(&bytes).into_owned().collect(),
        Err(rejection) => {
            warn!(error = %rejection, "failed to read contact form body");
            Vec::new()
        }
    }
}

async fn read_multipart<S>(req: Request<Body>, state: &S) -> Vec<(String, String)>
where
    S: Send + Sync,
{
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(error = %rejection, "failed to open multipart contact form");
            return Vec::new();
        }
    };

    let mut pairs = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => pairs.push((name, value)),
                    Err(err) => {
                        warn!(field = %name, error = %err, "failed to read multipart field");
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "malformed multipart contact form");
                break;
            }
        }
    }

    pairs
}
