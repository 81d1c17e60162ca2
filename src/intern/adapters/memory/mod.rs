//! In-memory adapters for intern directory tests.

mod user;

pub use user::InMemoryUserRepository;
