//! graze: a personal RSS aggregator.
//!
//! `storage` owns the SQLite tables (users, feeds, follows, posts), `feed`
//! owns fetching and normalization, `poller` drives the collection loop, and
//! `commands` is the CLI shell over all of it.

pub mod commands;
pub mod config;
pub mod feed;
pub mod poller;
pub mod storage;
pub mod util;
