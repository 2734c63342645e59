//! HTTP server for the item collection.
//!
//! Maps REST routes onto the four [`items_store::ItemStore`] operations and
//! translates store errors into status codes:
//!
//! | Route | Operation | Success | Failure |
//! |---|---|---|---|
//! | `GET /api/items` | list | 200 | 500 |
//! | `POST /api/items` | create | 201 | 400, 500 |
//! | `PUT /api/items/:id` | update | 200 | 400, 404, 500 |
//! | `DELETE /api/items/:id` | remove | 204 | 404, 500 |

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_app, build_router, cors_layer};
pub use server::ItemsServer;
pub use state::AppState;
