//! Static web client, embedded at compile time.

use axum::{
    http::{header::CONTENT_TYPE, Method, Uri},
    response::{IntoResponse, Response},
};
use include_dir::{include_dir, Dir};
use mime_guess::mime;

use crate::error::GatewayError;

static WEB: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web");

pub const INDEX: &str = "index.html";

pub async fn serve(method: Method, uri: Uri) -> Result<Response, GatewayError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(GatewayError::MethodNotAllowed { allow: "GET" });
    }

    let path = match uri.path() {
        "/" => INDEX,
        path => path.trim_start_matches('/'),
    };
    let file = WEB.get_file(path).ok_or(GatewayError::NotFound)?;

    Ok(([(CONTENT_TYPE, content_type(path))], file.contents()).into_response())
}

/// Guess from the extension; textual types are declared UTF-8.
fn content_type(path: &str) -> String {
    let guess = mime_guess::from_path(path).first_or_octet_stream();
    let textual = guess.type_() == mime::TEXT
        || guess.subtype() == mime::JAVASCRIPT
        || guess.subtype() == mime::JSON;
    if textual {
        format!("{guess}; charset=utf-8")
    } else {
        guess.to_string()
    }
}
