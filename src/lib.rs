//! Recipebox: a small recipe-sharing API.
//!
//! Anyone can browse recipes; registered users publish their own and may
//! edit or delete only what they authored. Persistence sits behind the
//! traits in [`store`], so the HTTP surface also runs against an
//! in-memory store in tests.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod recipes;
pub mod state;
pub mod store;
pub mod users;
