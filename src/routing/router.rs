//! Request dispatch to the fixed route set.
//!
//! # Responsibilities
//! - Define the `Dispatcher` seam the connection driver calls
//! - Match a request's route against the allow-list
//! - Produce the response for each built-in route
//!
//! # Design Decisions
//! - The allow-list is immutable data handed in at construction
//! - Routes are matched on the route part of the target only
//! - File routes are disabled when no root directory is configured

use std::future::Future;
use std::path::PathBuf;

use crate::http::request::{Request, USER_AGENT};
use crate::http::response::{Response, Status, CONTENT_TYPE};
use crate::routing::files::FileStore;

/// Turns a decoded request into a response.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, request: &Request) -> impl Future<Output = Response> + Send;
}

/// Built-in routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` liveness probe.
    Root,
    /// `/echo/<text>` reflects `<text>`.
    Echo,
    /// `/user-agent` reflects the `User-Agent` header.
    UserAgent,
    /// `/files/<name>` reads or writes a file under the root directory.
    Files,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Echo => "/echo",
            Route::UserAgent => "/user-agent",
            Route::Files => "/files",
        }
    }
}

/// Immutable allow-list of routes the server answers.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: impl IntoIterator<Item = Route>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
        }
    }

    /// Find the route whose path equals `route` exactly.
    pub fn lookup(&self, route: &str) -> Option<Route> {
        self.routes.iter().copied().find(|r| r.path() == route)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new([Route::Root, Route::Echo, Route::UserAgent, Route::Files])
    }
}

/// Dispatcher for the built-in routes.
#[derive(Debug, Clone)]
pub struct StaticRouter {
    table: RouteTable,
    files: Option<FileStore>,
}

impl StaticRouter {
    /// Create a router; `root` enables the `/files` route.
    pub fn new(table: RouteTable, root: Option<PathBuf>) -> Self {
        Self {
            table,
            files: root.map(FileStore::new),
        }
    }

    async fn handle(&self, request: &Request) -> Response {
        let response = Response::for_request(request);

        let Some(route) = self.table.lookup(request.route()) else {
            tracing::debug!(route = %request.route(), "No route matched");
            return response.with_status(Status::NotFound);
        };

        match route {
            Route::Root => response,
            Route::Echo => response
                .with_header(CONTENT_TYPE, "text/plain")
                .with_body(request.params()),
            Route::UserAgent => response
                .with_header(CONTENT_TYPE, "text/plain")
                .with_body(request.header(USER_AGENT).unwrap_or("")),
            Route::Files => match &self.files {
                Some(store) => store.handle(request, response).await,
                None => response.with_status(Status::NotFound),
            },
        }
    }
}

impl Default for StaticRouter {
    fn default() -> Self {
        Self::new(RouteTable::default(), None)
    }
}

impl Dispatcher for StaticRouter {
    fn dispatch(&self, request: &Request) -> impl Future<Output = Response> + Send {
        self.handle(request)
    }
}
