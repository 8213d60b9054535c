use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use models::{FormErrors, UserInput};
use serde::Deserialize;
use service::errors::ServiceError;

use crate::errors::HttpError;
use crate::flash::{self, Flash};
use crate::routes::table::{url_for, RouteName};
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

/// Urlencoded `user[name]` / `user[email]` fields.
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    #[serde(rename = "user[name]", default)]
    pub name: String,
    #[serde(rename = "user[email]", default)]
    pub email: String,
}

impl From<UserForm> for UserInput {
    fn from(f: UserForm) -> Self {
        UserInput { name: f.name, email: f.email }
    }
}

/// Only plain ASCII digits name a record; anything else is a 404.
fn parse_id(raw: &str) -> Result<u64, HttpError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HttpError::NotFound);
    }
    raw.parse::<u64>().map_err(|_| HttpError::NotFound)
}

/// 302 to the user list carrying the flash cookie.
fn redirect_with(jar: CookieJar, notice: Flash) -> Result<Response, HttpError> {
    let location = url_for(RouteName::UsersIndex, None)?;
    let jar = flash::set(jar, notice);
    Ok((StatusCode::FOUND, jar, [(header::LOCATION, location)]).into_response())
}

pub async fn index(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), HttpError> {
    let users = state.users.list(q.term.as_deref()).await?;
    let (jar, notice) = flash::take(jar);
    Ok((jar, Html(views::users_index(&users, q.term.as_deref(), notice)?)))
}

pub async fn new_form() -> Result<Html<String>, HttpError> {
    Ok(Html(views::user_new(&UserInput::default(), &FormErrors::default())?))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, HttpError> {
    let user = state.users.get(parse_id(&id)?).await?;
    Ok(Html(views::user_show(&user)?))
}

pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<UserForm>,
) -> Result<Response, HttpError> {
    let input = UserInput::from(form);
    match state.users.create(input.clone()).await {
        Ok(_) => redirect_with(jar, Flash::Created),
        Err(ServiceError::Validation(errors)) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(views::user_new(&input, &errors)?)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, HttpError> {
    let user = state.users.get(parse_id(&id)?).await?;
    let input = UserInput { name: user.name, email: user.email };
    Ok(Html(views::user_edit(user.id, &input, &FormErrors::default())?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(form): Form<UserForm>,
) -> Result<Response, HttpError> {
    let id = parse_id(&id)?;
    let input = UserInput::from(form);
    match state.users.update(id, input.clone()).await {
        Ok(_) => redirect_with(jar, Flash::Updated),
        Err(ServiceError::Validation(errors)) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(views::user_edit(id, &input, &errors)?)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Response, HttpError> {
    state.users.delete(parse_id(&id)?).await?;
    redirect_with(jar, Flash::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_plain_integers() {
        assert_eq!(parse_id("42").ok(), Some(42));
        assert!(matches!(parse_id("abc"), Err(HttpError::NotFound)));
        assert!(matches!(parse_id("-1"), Err(HttpError::NotFound)));
        assert!(matches!(parse_id("+5"), Err(HttpError::NotFound)));
        assert!(matches!(parse_id(" 5"), Err(HttpError::NotFound)));
        assert!(matches!(parse_id("99999999999999999999"), Err(HttpError::NotFound)));
        assert!(matches!(parse_id(""), Err(HttpError::NotFound)));
    }
}
