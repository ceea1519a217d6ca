//! Request body extraction for claim submissions and updates.

use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A claim request body, read as a URL-encoded form when the request says
/// so and as JSON otherwise.
///
/// Either way a body that fails to parse is an [`ApiError::InvalidRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimBody<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with(FORM_CONTENT_TYPE))
}

impl<S, T> FromRequest<S> for ClaimBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(body) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
            Ok(Self(body))
        } else {
            let Json(body) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
            Ok(Self(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;
    use test_case::test_case;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        claim_date: Option<String>,
        category: Option<String>,
    }

    fn request(content_type: &str, body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test_case("application/json", r#"{"claimDate":"2024-01-01","category":"Auto"}"# ; "json")]
    #[test_case("application/x-www-form-urlencoded", "claimDate=2024-01-01&category=Auto" ; "form")]
    #[test_case("application/x-www-form-urlencoded; charset=UTF-8", "claimDate=2024-01-01&category=Auto" ; "form with charset")]
    #[tokio::test]
    async fn test_reads_body_by_content_type(content_type: &str, body: &str) {
        let ClaimBody(sample) = ClaimBody::<Sample>::from_request(request(content_type, body), &())
            .await
            .unwrap();

        assert_eq!(
            sample,
            Sample {
                claim_date: Some("2024-01-01".to_string()),
                category: Some("Auto".to_string()),
            }
        );
    }

    #[test]
    fn test_form_detection() {
        assert!(is_form(&request(FORM_CONTENT_TYPE, "")));
        assert!(!is_form(&request("application/json", "")));
        assert!(!is_form(&request("text/plain", "")));
    }

    #[test_case("application/json", "{not json" ; "malformed json")]
    #[test_case("text/plain", "claimDate=2024-01-01" ; "unsupported content type")]
    #[tokio::test]
    async fn test_bad_body_is_invalid_request(content_type: &str, body: &str) {
        let result = ClaimBody::<Sample>::from_request(request(content_type, body), &()).await;

        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
