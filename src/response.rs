// src/response.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// Builds the success envelope `{status: "success", data, message}` shared by
/// every endpoint, paired with the given HTTP status code.
pub fn success<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    let body = Json(json!({
        "status": "success",
        "data": data,
        "message": message,
    }));

    (status, body).into_response()
}

/// 200 OK envelope.
pub fn ok<T: Serialize>(data: T, message: &str) -> Response {
    success(StatusCode::OK, data, message)
}

/// 201 Created envelope.
pub fn created<T: Serialize>(data: T, message: &str) -> Response {
    success(StatusCode::CREATED, data, message)
}
