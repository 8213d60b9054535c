use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use models::User;
use tower::Service;
use uuid::Uuid;

use server::routes;
use server::routes::table::{url_for, ROUTES};
use server::state::AppState;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app() -> anyhow::Result<(Router, PathBuf)> {
    let tmp = std::env::temp_dir().join(format!("server_users_{}.json", Uuid::new_v4()));
    let state = AppState::from_file(tmp.to_str().unwrap()).await?;
    Ok((routes::build_router(state, cors()), tmp))
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method("GET").uri(uri).body(Body::empty())?)
}

fn form(method: &str, uri: &str, body: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))?)
}

fn user_form(name: &str, email: &str) -> String {
    format!("user%5Bname%5D={}&user%5Bemail%5D={}", name, email.replace('@', "%40"))
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<Response> {
    Ok(app.clone().call(req).await?)
}

async fn body_string(resp: Response) -> anyhow::Result<String> {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

async fn stored(path: &PathBuf) -> anyhow::Result<Vec<User>> {
    Ok(serde_json::from_slice(&tokio::fs::read(path).await?)?)
}

fn set_cookie(resp: &Response) -> String {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn create_redirects_and_flash_shows_once() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;

    let resp = send(&app, form("POST", "/users", &user_form("Alice123", "a@x.com"))?).await?;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/users");
    assert!(set_cookie(&resp).contains("flash=created"));

    assert_eq!(stored(&tmp).await?, vec![User { id: 1, name: "Alice123".into(), email: "a@x.com".into() }]);

    let req = Request::builder().uri("/users").header(header::COOKIE, "flash=created").body(Body::empty())?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    // the notice is cleared on display
    assert!(set_cookie(&resp).contains("flash="));
    let html = body_string(resp).await?;
    assert!(html.contains("User was created successfully!"));
    assert!(html.contains("Alice123"));

    let html = body_string(send(&app, get("/users")?).await?).await?;
    assert!(!html.contains("successfully"));

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn invalid_create_is_unprocessable_and_not_saved() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;
    send(&app, form("POST", "/users", &user_form("Alice123", "a@x.com"))?).await?;
    let before = tokio::fs::read(&tmp).await?;

    let resp = send(&app, form("POST", "/users", &user_form("Al", "A@X.com"))?).await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(set_cookie(&resp).is_empty());
    let html = body_string(resp).await?;
    assert!(html.contains("Name must be at least 4 characters long"));
    assert!(html.contains("Email must be unique"));
    assert!(html.contains("value=\"Al\""));
    assert!(html.contains("value=\"A@X.com\""));

    let resp = send(&app, form("POST", "/users", "user%5Bname%5D=Valid+Name")?).await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(resp).await?.contains("Email must be valid"));

    assert_eq!(tokio::fs::read(&tmp).await?, before);
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn show_edit_and_new_pages() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;
    send(&app, form("POST", "/users", &user_form("Natalie", "nat@x.com"))?).await?;

    let resp = send(&app, get("/users/1")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await?.contains("nat@x.com"));

    let resp = send(&app, get("/users/1/edit")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await?;
    assert!(html.contains("value=\"Natalie\""));
    assert!(html.contains("action=\"/users/1\""));

    let resp = send(&app, get("/users/new")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await?.contains("name=\"user[email]\" value=\"\""));

    for missing in ["/users/2", "/users/2/edit", "/users/abc", "/users/abc/edit", "/users/+1", "/users/+1/edit"] {
        let resp = send(&app, get(missing)?).await?;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{missing}");
    }

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn update_through_method_override() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;
    send(&app, form("POST", "/users", &user_form("Alice123", "a@x.com"))?).await?;
    send(&app, form("POST", "/users", &user_form("Bobby", "b@x.com"))?).await?;

    // own email stays allowed
    let body = format!("_METHOD=PATCH&{}", user_form("Alice+Renamed", "a@x.com"));
    let resp = send(&app, form("POST", "/users/1", &body)?).await?;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(set_cookie(&resp).contains("flash=updated"));

    // someone else's email is rejected and the id is kept in the form
    let body = format!("_METHOD=PATCH&{}", user_form("Bobby", "A@x.com"));
    let resp = send(&app, form("POST", "/users/2", &body)?).await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(resp).await?;
    assert!(html.contains("Email must be unique"));
    assert!(html.contains("action=\"/users/2\""));

    let resp = send(&app, form("PATCH", "/users/9", &user_form("Nobody", "n@x.com"))?).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(
        stored(&tmp).await?,
        vec![
            User { id: 1, name: "Alice Renamed".into(), email: "a@x.com".into() },
            User { id: 2, name: "Bobby".into(), email: "b@x.com".into() },
        ]
    );
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn delete_through_method_override() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;
    send(&app, form("POST", "/users", &user_form("Alice123", "a@x.com"))?).await?;
    send(&app, form("POST", "/users", &user_form("Bobby", "b@x.com"))?).await?;

    let resp = send(&app, form("POST", "/users/1", "_METHOD=DELETE")?).await?;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(set_cookie(&resp).contains("flash=deleted"));

    let resp = send(&app, form("POST", "/users/1", "_METHOD=DELETE")?).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = Request::builder()
        .method("POST")
        .uri("/users/2")
        .header("x-http-method-override", "DELETE")
        .body(Body::empty())?;
    assert_eq!(send(&app, req).await?.status(), StatusCode::FOUND);

    assert!(stored(&tmp).await?.is_empty());
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn search_filters_by_name() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;
    for (name, email) in [("Natalie", "n@x.com"), ("Boris", "b@x.com"), ("Kalina", "k@x.com")] {
        send(&app, form("POST", "/users", &user_form(name, email))?).await?;
    }

    let html = body_string(send(&app, get("/users?term=ALI")?).await?).await?;
    assert!(html.contains("Natalie"));
    assert!(html.contains("Kalina"));
    assert!(!html.contains("Boris"));
    assert!(html.find("Natalie") < html.find("Kalina"));
    assert!(html.contains("value=\"ALI\""));

    let html = body_string(send(&app, get("/users?term=zzz")?).await?).await?;
    assert!(html.contains("No users found"));

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn every_declared_route_is_served() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;
    send(&app, form("POST", "/users", &user_form("Alice123", "a@x.com"))?).await?;

    for route in ROUTES {
        let id = route.path.contains(":id").then_some(1);
        let uri = url_for(route.name, id)?;
        let method = route.method.as_str();
        let req = match method {
            "POST" => form(method, &uri, &user_form("Created", "c@x.com"))?,
            "PATCH" | "PUT" => form(method, &uri, &user_form("Alice123", "a@x.com"))?,
            _ => Request::builder().method(method).uri(&uri).body(Body::empty())?,
        };
        let status = send(&app, req).await?.status();
        assert!(
            status.is_success() || status == StatusCode::FOUND,
            "{} {} {} answered {}",
            route.name.as_str(),
            method,
            uri,
            status
        );
    }

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let (app, tmp) = build_app().await?;
    let resp = send(&app, get("/health")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await?)?;
    assert_eq!(body["status"], "ok");
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}
