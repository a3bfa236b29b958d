//! # Development Error Disclosure
//!
//! Installed only when `APP_ENV=dev`. Rewrites error responses produced by
//! [`AppError`](crate::error::AppError) so the body's `message` and `detail`
//! carry the internal error text instead of the caller-safe message. Status,
//! code and error id are unchanged.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{ApiResponse, ErrorContext};

pub async fn disclose_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(ctx) = response.extensions().get::<ErrorContext>().cloned() else {
        return response;
    };

    let mut detail = ctx.detail;
    detail.message = ctx.internal.clone();
    detail.detail = Some(ctx.internal);
    (ctx.status, Json(ApiResponse::<()>::failure(detail))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn failing() -> Result<&'static str, AppError> {
        Err(AppError::Internal("connection refused by 10.0.0.7".into()))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_text_disclosed() {
        let app = Router::new()
            .route("/fail", get(failing))
            .layer(from_fn(disclose_errors));
        let response = app
            .oneshot(axum::http::Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "SYS-500");
        assert_eq!(
            json["error"]["message"],
            "internal error: connection refused by 10.0.0.7"
        );
        assert_eq!(json["error"]["detail"], json["error"]["message"]);
        assert_eq!(json["error"]["errorId"].as_str().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn successful_responses_untouched() {
        let app = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .layer(from_fn(disclose_errors));
        let response = app
            .oneshot(axum::http::Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"fine");
    }
}
