// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Credentials of the users
//!
//! Users authenticate either with their username and password (HTTP Basic) or with a
//! bearer token which they can obtain from `GET /token`.
pub mod password;
pub mod token;

pub use token::{Claims, TokenContext, TokenError};
