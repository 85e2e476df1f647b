// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! This module contains the core types of the receipt tables controller.
//!
//! All core types are simple newtypes of primitive types.

mod table_id;
mod table_key;
mod user_id;
#[cfg(feature = "rand")]
mod words;

pub use table_id::TableId;
pub use table_key::{TableKey, MAX_TABLE_KEY_LENGTH};
pub use user_id::UserId;
