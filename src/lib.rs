//! A hash map that remembers the order its keys went in, with list-style
//! operations for rearranging that order by key.
//!
//! ```
//! use ordered_map::{Error, OrderedMap};
//!
//! let mut ordinals = OrderedMap::new();
//! ordinals
//!     .set("first", "1st")
//!     .set("second", "2nd")
//!     .set("fourth", "4th");
//!
//! ordinals.insert_after("third", "3rd", &"second")?;
//! ordinals.move_to_front(&"fourth")?;
//! assert_eq!(vec!["fourth", "first", "second", "third"], ordinals.keys());
//!
//! // inserting never overwrites; use set for that
//! assert_eq!(
//!     Err(Error::DuplicateKeyValue { key: "first", value: "1st" }),
//!     ordinals.insert_before("first", "one", &"third"),
//! );
//! # Ok::<(), Error<&str, &str>>(())
//! ```
//!
//! This is ordering, not sorting: keys are only ever compared for equality.
//! Nothing in here locks; wrap a map in a [`SharedOrderedMap`] (feature
//! `shared_map`) or your own lock to share it between threads.

pub mod diff;
mod entry;
pub mod equal;
mod error;
pub mod iter;
mod linked_list;
mod ordered_map;
#[cfg(feature = "shared_map")]
mod shared_map;

pub use equal::equal;
pub use error::Error;
pub use iter::{IntoIter, Iter, Values};
pub use ordered_map::OrderedMap;
#[cfg(feature = "shared_map")]
pub use shared_map::SharedOrderedMap;
