// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::TableError;
use database::DatabaseError;
use rand::Rng;
use types::core::TableKey;

/// Draw random table keys until one is found that is not in use
///
/// `key_exists` is asked for every candidate. Gives up with
/// [`TableError::KeyGenerationExhausted`] after `max_attempts` taken keys, at least one
/// candidate is always drawn.
pub fn generate_unique_key<F>(max_attempts: u32, key_exists: F) -> Result<TableKey, TableError>
where
    F: FnMut(&TableKey) -> Result<bool, DatabaseError>,
{
    generate_unique_key_with(&mut rand::thread_rng(), max_attempts, key_exists)
}

fn generate_unique_key_with<R, F>(
    rng: &mut R,
    max_attempts: u32,
    mut key_exists: F,
) -> Result<TableKey, TableError>
where
    R: Rng + ?Sized,
    F: FnMut(&TableKey) -> Result<bool, DatabaseError>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let candidate = TableKey::generate_with(rng);

        if !key_exists(&candidate)? {
            return Ok(candidate);
        }

        log::debug!("Table key collision on attempt {attempt}/{max_attempts}");
    }

    log::warn!("Giving up on finding an unused table key after {max_attempts} attempts");

    Err(TableError::KeyGenerationExhausted(max_attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_free_key_is_returned() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut checked = Vec::new();

        let key = generate_unique_key_with(&mut rng, 10, |key| {
            checked.push(key.clone());
            Ok(checked.len() < 4)
        })
        .unwrap();

        assert_eq!(checked.len(), 4);
        assert_eq!(checked.last(), Some(&key));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut calls = 0;

        let result = generate_unique_key_with(&mut rng, 5, |_| {
            calls += 1;
            Ok(true)
        });

        assert!(matches!(result, Err(TableError::KeyGenerationExhausted(5))));
        assert_eq!(calls, 5);
    }

    #[test]
    fn zero_attempts_still_draw_one_key() {
        let mut calls = 0;

        let result = generate_unique_key(0, |_| {
            calls += 1;
            Ok(false)
        });

        assert!(result.is_ok());
        assert_eq!(calls, 1);
    }

    #[test]
    fn store_errors_abort_the_generation() {
        let result = generate_unique_key(10, |_| Err(DatabaseError::custom("gone")));

        assert!(matches!(result, Err(TableError::Database(_))));
    }
}
