use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections are reported as `AppError`, so malformed
/// bodies get the same JSON error shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
