// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Response types of the REST API
pub mod error;

pub use error::{ApiError, AuthenticationError};

pub const CODE_INVALID_LENGTH: &str = "invalid_length";
pub const CODE_INVALID_VALUE: &str = "invalid_value";
pub const CODE_VALUE_REQUIRED: &str = "value_required";
