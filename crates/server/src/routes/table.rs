//! Named routes. Each route is declared once here; the router registers these
//! paths and views build links through [`url_for`].

use std::collections::HashSet;

use thiserror::Error;

pub const USERS: &str = "/users";
pub const USERS_NEW: &str = "/users/new";
pub const USER: &str = "/users/:id";
pub const USER_EDIT: &str = "/users/:id/edit";
pub const HEALTH: &str = "/health";

const ID_PARAM: &str = ":id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    UsersIndex,
    UsersNew,
    UsersShow,
    UsersCreate,
    UsersEdit,
    UsersUpdate,
    UsersReplace,
    UsersDelete,
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteDef {
    pub name: RouteName,
    pub method: Verb,
    pub path: &'static str,
}

pub const ROUTES: &[RouteDef] = &[
    RouteDef { name: RouteName::UsersIndex, method: Verb::Get, path: USERS },
    RouteDef { name: RouteName::UsersNew, method: Verb::Get, path: USERS_NEW },
    RouteDef { name: RouteName::UsersShow, method: Verb::Get, path: USER },
    RouteDef { name: RouteName::UsersCreate, method: Verb::Post, path: USERS },
    RouteDef { name: RouteName::UsersEdit, method: Verb::Get, path: USER_EDIT },
    RouteDef { name: RouteName::UsersUpdate, method: Verb::Patch, path: USER },
    RouteDef { name: RouteName::UsersReplace, method: Verb::Put, path: USER },
    RouteDef { name: RouteName::UsersDelete, method: Verb::Delete, path: USER },
    RouteDef { name: RouteName::Health, method: Verb::Get, path: HEALTH },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("unknown route name: {0}")]
    UnknownName(&'static str),
    #[error("route {0} needs an id")]
    MissingId(&'static str),
    #[error("route {0} takes no id")]
    UnexpectedId(&'static str),
    #[error("route {0} is declared twice")]
    DuplicateName(&'static str),
    #[error("{0} {1} is declared twice")]
    DuplicatePath(&'static str, &'static str),
}

impl RouteName {
    pub const ALL: [RouteName; 9] = [
        RouteName::UsersIndex,
        RouteName::UsersNew,
        RouteName::UsersShow,
        RouteName::UsersCreate,
        RouteName::UsersEdit,
        RouteName::UsersUpdate,
        RouteName::UsersReplace,
        RouteName::UsersDelete,
        RouteName::Health,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::UsersIndex => "users.index",
            RouteName::UsersNew => "users.new",
            RouteName::UsersShow => "users.show",
            RouteName::UsersCreate => "users.create",
            RouteName::UsersEdit => "users.edit",
            RouteName::UsersUpdate => "users.update",
            RouteName::UsersReplace => "users.replace",
            RouteName::UsersDelete => "users.delete",
            RouteName::Health => "health",
        }
    }
}

pub fn lookup(name: RouteName) -> Option<&'static RouteDef> {
    ROUTES.iter().find(|r| r.name == name)
}

/// Expand a named route into a concrete path.
pub fn url_for(name: RouteName, id: Option<u64>) -> Result<String, RouteError> {
    let route = lookup(name).ok_or(RouteError::UnknownName(name.as_str()))?;
    let needs_id = route.path.contains(ID_PARAM);
    match (needs_id, id) {
        (true, Some(id)) => Ok(route.path.replace(ID_PARAM, &id.to_string())),
        (true, None) => Err(RouteError::MissingId(name.as_str())),
        (false, None) => Ok(route.path.to_string()),
        (false, Some(_)) => Err(RouteError::UnexpectedId(name.as_str())),
    }
}

/// Every name declared exactly once and no method/path pair declared twice.
pub fn validate() -> Result<(), RouteError> {
    let mut names = HashSet::new();
    let mut endpoints = HashSet::new();
    for r in ROUTES {
        if !names.insert(r.name) {
            return Err(RouteError::DuplicateName(r.name.as_str()));
        }
        if !endpoints.insert((r.method, r.path)) {
            return Err(RouteError::DuplicatePath(r.method.as_str(), r.path));
        }
    }
    for name in RouteName::ALL {
        if lookup(name).is_none() {
            return Err(RouteError::UnknownName(name.as_str()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_consistent() {
        assert_eq!(validate(), Ok(()));
        assert_eq!(ROUTES.len(), RouteName::ALL.len());
    }

    #[test]
    fn expands_ids() {
        assert_eq!(url_for(RouteName::UsersIndex, None).unwrap(), "/users");
        assert_eq!(url_for(RouteName::UsersNew, None).unwrap(), "/users/new");
        assert_eq!(url_for(RouteName::UsersEdit, Some(5)).unwrap(), "/users/5/edit");
        assert_eq!(url_for(RouteName::UsersShow, Some(12)).unwrap(), "/users/12");
        assert_eq!(url_for(RouteName::UsersDelete, Some(3)).unwrap(), "/users/3");
    }

    #[test]
    fn rejects_bad_lookups() {
        assert_eq!(url_for(RouteName::UsersShow, None), Err(RouteError::MissingId("users.show")));
        assert_eq!(url_for(RouteName::UsersNew, Some(1)), Err(RouteError::UnexpectedId("users.new")));
    }

    #[test]
    fn put_and_patch_share_the_member_path() {
        let update = lookup(RouteName::UsersUpdate).unwrap();
        let replace = lookup(RouteName::UsersReplace).unwrap();
        assert_eq!(update.path, replace.path);
        assert_eq!((update.method, replace.method), (Verb::Patch, Verb::Put));
    }
}
