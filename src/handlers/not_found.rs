use actix_web::{
    http::{
        header::{self, HeaderValue},
        StatusCode,
    },
    HttpRequest,
};
use serde::{Deserialize, Serialize};

use super::{Handler, ResponseWriter};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
    pub code: Option<String>,
}

/// Terminal fallback: answers 404 with a JSON error body.
#[derive(Debug, Clone, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn serve(&self, req: &HttpRequest, w: &mut ResponseWriter) {
        let body = ErrorResponse {
            error: "Path not configured".into(),
            details: Some(req.uri().path().to_string()),
            code: None,
        };
        w.insert_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        w.write_status(StatusCode::NOT_FOUND);
        match serde_json::to_vec(&body) {
            Ok(bytes) => w.write(&bytes),
            Err(err) => log::error!("cannot serialize error response: {}", err),
        }
    }
}
