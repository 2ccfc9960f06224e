//! Quotation builder
//!
//! Rich-text website descriptions for sale orders, their lines and optional
//! products. Order descriptions follow the selected quotation template, line
//! descriptions default from the product, option descriptions follow the
//! product, and each value is carried along when templates are applied and
//! options are added to the order.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod compute;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod models;
pub mod services;

pub use errors::ServiceError;
pub use models::{Patch, SaleOrderLineValues, SaleOrderOptionValues, SaleOrderValues};
pub use services::QuotationServices;
