//! Demo handlers exercising the session lifecycle.

use axum::{
    extract::Query,
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::types::LoginQuery;
use crate::session::SessionHandle;
use crate::Result;

/// Health check endpoint. Never creates or extends a session.
pub async fn health(session: SessionHandle) -> Result<&'static str> {
    session.lock()?.set_no_store(true);
    Ok("OK")
}

/// API information endpoint.
pub async fn api_info(session: SessionHandle) -> Result<Json<serde_json::Value>> {
    session.lock()?.set_no_store(true);
    Ok(Json(serde_json::json!({
        "name": "cookie-sessions",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    })))
}

/// Greets the logged-in user, if any.
pub async fn index(session: SessionHandle) -> Result<String> {
    let session = session.lock()?;
    Ok(match session.get_as::<String>("username") {
        Some(name) => format!("TOP: Hello {}", name),
        None => "TOP".to_string(),
    })
}

/// Increments a per-session counter.
pub async fn counter(session: SessionHandle) -> Result<String> {
    let mut session = session.lock()?;
    let value = session.get_as::<i64>("counter").unwrap_or(0) + 1;
    session.set("counter", value)?;
    Ok(format!("counter=>{}", value))
}

/// Logs a user in and rotates the session identifier.
///
/// Already logged-in clients are redirected to `/`.
pub async fn login(session: SessionHandle, Query(query): Query<LoginQuery>) -> Result<Response> {
    let mut session = session.lock()?;
    if session.exists("username") {
        return Ok((StatusCode::FOUND, [(LOCATION, "/")]).into_response());
    }
    session.set_change_id(true);
    session.set("username", query.name())?;
    Ok("LOGIN".into_response())
}

/// Destroys the session.
pub async fn logout(session: SessionHandle) -> Result<&'static str> {
    session.lock()?.set_expire(true);
    Ok("LOGOUT")
}

/// Shows queued flash messages, or queues two when there are none.
pub async fn flash(session: SessionHandle) -> Result<String> {
    let mut session = session.lock()?;
    let flashes = session.consume_flashes();
    if flashes.is_empty() {
        session.add_flash("hoge")?;
        session.add_flash("fuga")?;
        return Ok("AddFlash".to_string());
    }

    let rendered: Vec<String> = flashes
        .iter()
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
        .collect();
    Ok(format!("Flashes {}", rendered.join(" ")))
}
