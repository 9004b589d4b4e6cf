//! Projects, routes and the HTTP method vocabulary shared by the stores and
//! the test runner.
mod method;
mod project;
mod route;


pub use method::HttpMethod;
pub use project::{NewProject, Project, ProjectId, validate_base_url};
pub use route::{NewRoute, Route, RouteId, RouteUpdate, default_route_name, validate_path};
