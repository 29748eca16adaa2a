#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// The separate-chaining hash table engine and its cost instrumentation.
pub mod hash_table;

/// A line-oriented command interpreter over the hash table.
///
/// This module reads whitespace-delimited commands from any buffered reader
/// and writes results to any writer, which keeps the interpreter testable
/// against in-memory streams.
#[cfg(feature = "std")]
pub mod command;

/// The comparative benchmark harness behind the CSV amortized-cost report.
#[cfg(feature = "std")]
pub mod report;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when no explicit hasher is supplied.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when no explicit hasher is supplied.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        compile_error!("enable the `foldhash` or `std` feature to get a default hasher");
    }
}

pub use hash_table::Cost;
pub use hash_table::HashTable;
