//! `http.Handler` generation.
//!
//! [`Config::generate`] emits a file holding one `ServeHTTP` method whose
//! body is the concatenation of every route's statements. Routes are plain
//! [`Code`] values; they find the names of the writer, request and receiver
//! through [`config`] at resolution time.

use crate::code::{file, func, ident, import, int, scoped, Code};
use crate::scope::{Scope, StashKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub package: String,
    pub type_name: String,
    pub receiver: String,
    pub writer: String,
    pub request: String,
}

/// Stash key under which the active [`Config`] is visible to routes.
pub struct RouterConfig;

impl StashKey for RouterConfig {
    type Value = Config;
}

impl Config {
    /// The receiver is the lowercased first letter of `type_name`, except
    /// that `r` is taken by the request and becomes `rr`.
    pub fn new(package: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut type_name = type_name.into();
        if type_name.is_empty() {
            type_name = "Router".to_owned();
        }

        let mut receiver: String = type_name
            .chars()
            .take(1)
            .flat_map(char::to_lowercase)
            .collect();
        if receiver == "r" {
            receiver = "rr".to_owned();
        }

        Self {
            package: package.into(),
            type_name,
            receiver,
            writer: "w".to_owned(),
            request: "r".to_owned(),
        }
    }

    /// `func (recv T) ServeHTTP(w http.ResponseWriter, r *http.Request)`
    /// with the routes as its body, wrapped in a file.
    pub fn generate(&self, routes: &[&dyn Route]) -> Code {
        let body: Vec<Code> = routes.iter().map(|r| r.route()).collect();

        let http = import("net/http");
        let serve = func("ServeHTTP")
            .with_receiver(&[Some(ident(&self.receiver)), Some(ident(&self.type_name)), None])
            .with_param(&[
                Some(ident(&self.writer)),
                Some(http.dot("ResponseWriter")),
                None,
            ])
            .with_param(&[
                Some(ident(&self.request)),
                Some(http.dot("Request").star()),
                None,
            ])
            .with_body(&body);

        file(&self.package, &[serve]).with_stash::<RouterConfig>(self.clone())
    }
}

/// The router configuration in effect.
///
/// # Panics
/// Panics outside of [`Config::generate`].
pub fn config<'s>(scope: &'s Scope<'_>) -> &'s Config {
    scope
        .lookup_stash::<RouterConfig>()
        .unwrap_or_else(|| panic!("route resolved outside of a generated router"))
}

pub trait Route {
    fn route(&self) -> Code;
}

/// Responds with a fixed status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl Route for StatusCode {
    fn route(&self) -> Code {
        let status = i64::from(self.0);
        scoped(move |s| ident(&config(s).writer).dot("WriteHeader").call(&[int(status)]))
    }
}
