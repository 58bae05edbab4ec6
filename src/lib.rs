//! Resource commitment and reconciliation for live-event production.
//!
//! The core is four pure modules over immutable snapshots:
//!
//! - [`ledger`]: can an inventory item be committed over a date range?
//! - [`costing`]: what does a job cost, and what margin does it leave?
//! - [`rollup`]: company revenue and cost by month for a year.
//! - [`rest`]: did a crew member get their weekly rest days?
//!
//! [`storage`] and [`cli`] are the thin shells around it. Storage adds the
//! serialized reserve step the advisory ledger cannot provide on its own.

pub mod cli;
pub mod config;
pub mod costing;
pub mod interval;
pub mod ledger;
pub mod model;
pub mod rest;
pub mod rollup;
pub mod storage;
