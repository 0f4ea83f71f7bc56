pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod upload;

pub use routes::create_router;
