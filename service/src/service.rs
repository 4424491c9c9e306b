use crate::{auth::SESSION_COOKIE, error::ApiError, render, AdminSession, AppState};
use abi::{Error, Reservation, ReservationInput};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use reservation::Rsvp;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct OccupiedQuery {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub field: String,
}

#[derive(Debug, Serialize)]
pub struct OccupiedResponse {
    pub times: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn create_reservation(
    State(state): State<AppState>,
    Json(input): Json<ReservationInput>,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    let rsvp = state.manager.reserve(input).await?;
    spawn_confirmation(&state, rsvp.clone());

    let message = format!(
        "reservation confirmed for field {} on {} at {}",
        rsvp.field, rsvp.date, rsvp.time
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            id: rsvp.id,
            message,
        }),
    ))
}

// The reservation is already durable here; mail is best-effort and must not
// delay or change the response.
fn spawn_confirmation(state: &AppState, rsvp: Reservation) {
    let notifier = state.notifier.clone();
    let operator = state.operator.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.send_confirmation(&rsvp, &operator).await {
            warn!(id = rsvp.id, error = %e, "confirmation mail failed");
        }
    });
}

pub async fn occupied_times(
    State(state): State<AppState>,
    Query(query): Query<OccupiedQuery>,
) -> Result<Json<OccupiedResponse>, ApiError> {
    let mut missing = Vec::new();
    if query.date.trim().is_empty() {
        missing.push("date");
    }
    if query.field.trim().is_empty() {
        missing.push("field");
    }
    if !missing.is_empty() {
        return Err(Error::MissingFields(missing).into());
    }

    let times = state.manager.occupied_times(&query.date, &query.field).await?;
    Ok(Json(OccupiedResponse { times }))
}

pub async fn login_form() -> Html<&'static str> {
    Html(render::LOGIN_PAGE)
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.verifier.verify(&form.username, &form.password) {
        return (StatusCode::UNAUTHORIZED, Html(render::LOGIN_FAILED_PAGE)).into_response();
    }

    let token = state.sessions.issue();
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build();
    (jar.add(cookie), Redirect::to("/admin/reservations")).into_response()
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value());
    }
    (
        jar.remove(Cookie::from(SESSION_COOKIE)),
        Redirect::to("/admin/login"),
    )
}

pub async fn list_reservations(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Html<String>, ApiError> {
    let reservations = state.manager.list_all().await?;
    Ok(Html(render::reservations_page(&reservations)))
}

pub async fn delete_reservation(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.manager.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound(id).into())
    }
}
