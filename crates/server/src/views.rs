//! Server-rendered HTML pages for the user directory.

use models::{FormErrors, User, UserInput};

use crate::flash::Flash;
use crate::method_override::METHOD_FIELD;
use crate::routes::table::{url_for, RouteError, RouteName};

/// Minimal HTML escaping for text and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

fn field_error(error: Option<&str>) -> String {
    error
        .map(|msg| format!("<div class=\"error\">{}</div>\n", escape(msg)))
        .unwrap_or_default()
}

fn user_fields(input: &UserInput, errors: &FormErrors) -> String {
    format!(
        "<div>\n<label>Name <input type=\"text\" name=\"user[name]\" value=\"{}\"></label>\n{}</div>\n\
         <div>\n<label>Email <input type=\"email\" name=\"user[email]\" value=\"{}\"></label>\n{}</div>\n",
        escape(&input.name),
        field_error(errors.name.as_deref()),
        escape(&input.email),
        field_error(errors.email.as_deref()),
    )
}

pub fn users_index(users: &[User], term: Option<&str>, flash: Option<Flash>) -> Result<String, RouteError> {
    let mut body = String::from("<h1>Users</h1>\n");
    if let Some(flash) = flash {
        body.push_str(&format!("<div class=\"flash success\">{}</div>\n", escape(flash.message())));
    }
    body.push_str(&format!(
        "<form action=\"{}\" method=\"get\">\n<input type=\"search\" name=\"term\" value=\"{}\">\n<input type=\"submit\" value=\"Search\">\n</form>\n",
        url_for(RouteName::UsersIndex, None)?,
        escape(term.unwrap_or_default())
    ));
    body.push_str(&format!("<a href=\"{}\">New user</a>\n", url_for(RouteName::UsersNew, None)?));
    if users.is_empty() {
        body.push_str("<p>No users found</p>\n");
    } else {
        body.push_str("<ul>\n");
        for u in users {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a> {}</li>\n",
                url_for(RouteName::UsersShow, Some(u.id))?,
                escape(&u.name),
                escape(&u.email)
            ));
        }
        body.push_str("</ul>\n");
    }
    Ok(layout("Users", &body))
}

pub fn user_new(input: &UserInput, errors: &FormErrors) -> Result<String, RouteError> {
    let body = format!(
        "<h1>New user</h1>\n<form action=\"{}\" method=\"post\">\n{}<input type=\"submit\" value=\"Create\">\n</form>\n<a href=\"{}\">Back</a>\n",
        url_for(RouteName::UsersCreate, None)?,
        user_fields(input, errors),
        url_for(RouteName::UsersIndex, None)?
    );
    Ok(layout("New user", &body))
}

pub fn user_show(user: &User) -> Result<String, RouteError> {
    let body = format!(
        "<h1>{}</h1>\n<dl>\n<dt>Id</dt><dd>{}</dd>\n<dt>Email</dt><dd>{}</dd>\n</dl>\n\
         <a href=\"{}\">Edit</a>\n\
         <form action=\"{}\" method=\"post\">\n<input type=\"hidden\" name=\"{}\" value=\"DELETE\">\n<input type=\"submit\" value=\"Delete\">\n</form>\n\
         <a href=\"{}\">Back</a>\n",
        escape(&user.name),
        user.id,
        escape(&user.email),
        url_for(RouteName::UsersEdit, Some(user.id))?,
        url_for(RouteName::UsersDelete, Some(user.id))?,
        METHOD_FIELD,
        url_for(RouteName::UsersIndex, None)?
    );
    Ok(layout(&user.name, &body))
}

/// Edit form for user `id`; `input` is either the stored record or the rejected submission.
pub fn user_edit(id: u64, input: &UserInput, errors: &FormErrors) -> Result<String, RouteError> {
    let body = format!(
        "<h1>Edit user</h1>\n<form action=\"{}\" method=\"post\">\n<input type=\"hidden\" name=\"{}\" value=\"PATCH\">\n{}<input type=\"submit\" value=\"Update\">\n</form>\n<a href=\"{}\">Back</a>\n",
        url_for(RouteName::UsersUpdate, Some(id))?,
        METHOD_FIELD,
        user_fields(input, errors),
        url_for(RouteName::UsersShow, Some(id))?
    );
    Ok(layout("Edit user", &body))
}
