//! Ordered keyed collections

mod store;

pub use store::{Keyed, Store};
