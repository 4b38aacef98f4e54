// Saved comparisons: an in-memory store behind a small CRUD API.
// No durability; everything is lost on restart.

pub mod handlers;
pub mod store;
