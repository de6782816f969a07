//! The session object

mod session;

pub use session::Session;
