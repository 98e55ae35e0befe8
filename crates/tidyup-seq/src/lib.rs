//! Lazy asynchronous sequences.
//!
//! [`AsyncArray`] wraps a source that may be produced synchronously or
//! asynchronously and exposes chainable operators (`map`, `filter`,
//! `flat_map`, `take`, `drop`) plus terminal consumers (`to_vec`, `reduce`,
//! `for_each`, `some`, `every`, `find`). Nothing runs until a terminal is
//! awaited. Each operator stage is drained completely before the next stage
//! starts, and a materialized pipeline caches its result for later reads.

pub mod array;
pub mod count;
pub mod error;

pub use array::{AsyncArray, Element, ItemStream};
pub use count::IntoCount;
pub use error::{BoxError, SeqError};
