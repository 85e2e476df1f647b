// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Data types for the receipt tables controller.
//!
//! This crate contains the identifier and key types that are shared between
//! the database layer and the REST API.
//!
//! # Features
//!
//! ## `backend`
//!
//! Set the `backend` feature when the types are used by a service that
//! creates new values (e.g. the controller creating table keys).
//!
//! Depends on:
//! - `rand`
//!
//! ## `rand`
//!
//! Functions for generating values from random numbers are gated by this flag.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    no_mangle_generic_items,
    non_shorthand_field_patterns,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unsafe_code,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_extern_crates,
    unused_import_braces,
    unused_parens,
    while_true
)]

mod macros;

pub mod core;

mod imports {
    pub use validator::{Validate, ValidationError, ValidationErrors};
}
