//! Record models and store interfaces for the apiary unit server.
//!
//! The engine consumes every backend through the narrow traits in
//! [`store`]; [`store::memory`] is the reference implementation used by the
//! host binary and the tests.

pub mod error;
pub mod etag;
pub mod model;
pub mod store;
