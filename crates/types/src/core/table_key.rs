// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::imports::*;

crate::diesel_newtype! {
    TableKey(String) => diesel::sql_types::Text
}

/// The maximum length of a table key accepted from clients
pub const MAX_TABLE_KEY_LENGTH: usize = 255;

impl TableKey {
    /// Generate a new random passphrase key in the form `adjective-noun-noun`
    #[cfg(feature = "rand")]
    pub fn generate_with<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        use super::words::{ADJECTIVES, NOUNS};
        use rand::seq::SliceRandom as _;

        let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("plain");
        let first = NOUNS.choose(rng).copied().unwrap_or("table");
        let second = NOUNS.choose(rng).copied().unwrap_or("receipt");

        Self::from(format!("{adjective}-{first}-{second}"))
    }
}

impl Validate for TableKey {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let key = self.inner();

        if key.trim().is_empty() {
            errors.add("table_key", ValidationError::new("required"));
            return Err(errors);
        }

        if key.len() > MAX_TABLE_KEY_LENGTH {
            errors.add("table_key", ValidationError::new("length"));
            return Err(errors);
        }

        // not storable in postgres text columns
        if key.contains('\0') {
            errors.add("table_key", ValidationError::new("invalid_value"));
            return Err(errors);
        }

        Ok(())
    }
}
