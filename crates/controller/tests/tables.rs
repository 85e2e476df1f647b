// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Table lifecycle against a real database
//!
//! Needs a postgres instance, see [`test_util::database::DatabaseContext::new`].
use db_storage::tables::{Table, TableKey, UserTable};
use pretty_assertions::assert_eq;
use receipt_tables_controller_core::services::tables::{
    create_table, join_table, leave_table, list_members,
};
use receipt_tables_controller_core::services::TableError;
use serial_test::serial;
use std::sync::{Arc, Barrier};
use std::thread;
use test_util::database::DatabaseContext;

const RACE_ROUNDS: usize = 25;

/// Run both closures on their own connection, released at the same time
fn race<A, B, RA, RB>(db_ctx: &DatabaseContext, first: A, second: B) -> (RA, RB)
where
    A: FnOnce(&mut database::DbConnection) -> RA + Send + 'static,
    B: FnOnce(&mut database::DbConnection) -> RB + Send + 'static,
    RA: Send + 'static,
    RB: Send + 'static,
{
    let barrier = Arc::new(Barrier::new(2));

    let first = {
        let db = db_ctx.db.clone();
        let barrier = barrier.clone();

        thread::spawn(move || {
            let mut conn = db.get_conn().unwrap();
            barrier.wait();
            first(&mut conn)
        })
    };

    let second = {
        let db = db_ctx.db.clone();

        thread::spawn(move || {
            let mut conn = db.get_conn().unwrap();
            barrier.wait();
            second(&mut conn)
        })
    };

    (first.join().unwrap(), second.join().unwrap())
}

#[tokio::test]
#[serial]
async fn table_lifecycle() {
    let db_ctx = DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let alice = db_ctx.create_test_user("alice").unwrap();
    let bob = db_ctx.create_test_user("bob").unwrap();

    let key = create_table(&mut conn, &alice, 10).unwrap();
    let table = Table::get_by_key(&mut conn, &key).unwrap().unwrap();

    let joined = join_table(&mut conn, &bob, &key).unwrap();
    assert_eq!(joined.table_id, table.id);
    assert_eq!(joined.user_id, bob.id);

    let members: Vec<_> = list_members(&mut conn, &alice)
        .unwrap()
        .into_iter()
        .map(|member| member.username)
        .collect();
    assert_eq!(members, vec!["alice", "bob"]);

    // listing does not change anything
    let again: Vec<_> = list_members(&mut conn, &bob)
        .unwrap()
        .into_iter()
        .map(|member| member.username)
        .collect();
    assert_eq!(again, members);

    let left = leave_table(&mut conn, &bob).unwrap();
    assert_eq!(left.table_id, table.id);
    assert_eq!(left.user_id, bob.id);

    let members = list_members(&mut conn, &alice).unwrap();
    assert_eq!(members.len(), 1);
    assert!(Table::key_exists(&mut conn, &key).unwrap());

    leave_table(&mut conn, &alice).unwrap();
    assert!(!Table::key_exists(&mut conn, &key).unwrap());

    assert!(matches!(
        join_table(&mut conn, &bob, &key),
        Err(TableError::TableNotFound)
    ));
    assert!(UserTable::get_for_user(&mut conn, bob.id).unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn one_table_per_user() {
    let db_ctx = DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let alice = db_ctx.create_test_user("alice").unwrap();
    let bob = db_ctx.create_test_user("bob").unwrap();

    let first = create_table(&mut conn, &alice, 10).unwrap();
    let second = create_table(&mut conn, &bob, 10).unwrap();
    assert_ne!(first, second);

    assert!(matches!(
        create_table(&mut conn, &alice, 10),
        Err(TableError::UserAlreadyInTable)
    ));
    assert_eq!(Table::get_all(&mut conn).unwrap().len(), 2);

    assert!(matches!(
        join_table(&mut conn, &alice, &second),
        Err(TableError::UserAlreadyInTable)
    ));

    let second = Table::get_by_key(&mut conn, &second).unwrap().unwrap();
    assert_eq!(UserTable::count_for_table(&mut conn, second.id).unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn outsiders() {
    let db_ctx = DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let carol = db_ctx.create_test_user("carol").unwrap();

    assert!(matches!(
        list_members(&mut conn, &carol),
        Err(TableError::NotInAnyTable)
    ));
    assert!(matches!(
        leave_table(&mut conn, &carol),
        Err(TableError::NotInAnyTable)
    ));

    let unknown = TableKey::from("quiet-otter-ladle".to_owned());
    assert!(matches!(
        join_table(&mut conn, &carol, &unknown),
        Err(TableError::TableNotFound)
    ));
    assert!(UserTable::get_for_user(&mut conn, carol.id)
        .unwrap()
        .is_none());
}

#[tokio::test]
#[serial]
async fn keys_with_nul_are_not_found() {
    let db_ctx = DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let alice = db_ctx.create_test_user("alice").unwrap();

    let key = TableKey::from("jolly\0mango-kettle".to_owned());
    assert!(matches!(
        join_table(&mut conn, &alice, &key),
        Err(TableError::TableNotFound)
    ));
    assert!(UserTable::get_for_user(&mut conn, alice.id)
        .unwrap()
        .is_none());
}

#[tokio::test]
#[serial]
async fn join_racing_the_last_leave() {
    let db_ctx = DatabaseContext::new(true).await;

    let alice = db_ctx.create_test_user("alice").unwrap();
    let bob = db_ctx.create_test_user("bob").unwrap();

    for _ in 0..RACE_ROUNDS {
        let key = {
            let mut conn = db_ctx.db.get_conn().unwrap();
            create_table(&mut conn, &alice, 10).unwrap()
        };

        let (left, joined) = {
            let alice = alice.clone();
            let bob = bob.clone();
            let key = key.clone();

            race(
                &db_ctx,
                move |conn| leave_table(conn, &alice),
                move |conn| join_table(conn, &bob, &key),
            )
        };

        assert!(left.is_ok());

        let mut conn = db_ctx.db.get_conn().unwrap();

        match joined {
            Ok(membership) => {
                // bob sits alone at a table that still exists
                assert!(Table::key_exists(&mut conn, &key).unwrap());
                assert_eq!(
                    UserTable::count_for_table(&mut conn, membership.table_id).unwrap(),
                    1
                );

                leave_table(&mut conn, &bob).unwrap();
            }
            Err(TableError::TableNotFound) => {
                assert!(UserTable::get_for_user(&mut conn, bob.id).unwrap().is_none());
            }
            Err(e) => panic!("unexpected join result {e:?}"),
        }

        assert!(Table::get_all(&mut conn).unwrap().is_empty());
    }
}

#[tokio::test]
#[serial]
async fn concurrent_creates_of_one_user() {
    let db_ctx = DatabaseContext::new(true).await;

    let alice = db_ctx.create_test_user("alice").unwrap();

    for _ in 0..RACE_ROUNDS {
        let (first, second) = {
            let first_user = alice.clone();
            let second_user = alice.clone();

            race(
                &db_ctx,
                move |conn| create_table(conn, &first_user, 10),
                move |conn| create_table(conn, &second_user, 10),
            )
        };

        let mut results = [first, second];
        results.sort_by_key(|result| result.is_ok());

        assert!(matches!(results[0], Err(TableError::UserAlreadyInTable)));
        assert!(results[1].is_ok());

        let mut conn = db_ctx.db.get_conn().unwrap();
        assert_eq!(Table::get_all(&mut conn).unwrap().len(), 1);

        leave_table(&mut conn, &alice).unwrap();
        assert!(Table::get_all(&mut conn).unwrap().is_empty());
    }
}

#[tokio::test]
#[serial]
async fn listing_while_leaving() {
    let db_ctx = DatabaseContext::new(true).await;

    let alice = db_ctx.create_test_user("alice").unwrap();
    let bob = db_ctx.create_test_user("bob").unwrap();

    for _ in 0..RACE_ROUNDS {
        db_ctx
            .create_test_table("quiet-otter-ladle", &[&alice, &bob])
            .unwrap();

        let (listed, left) = {
            let listing = bob.clone();
            let leaving = bob.clone();

            race(
                &db_ctx,
                move |conn| list_members(conn, &listing),
                move |conn| leave_table(conn, &leaving),
            )
        };

        assert!(left.is_ok());

        match listed {
            Ok(members) => assert!(members.iter().any(|member| member.user_id == bob.id)),
            Err(TableError::NotInAnyTable) => {}
            Err(e) => panic!("unexpected listing result {e:?}"),
        }

        let mut conn = db_ctx.db.get_conn().unwrap();
        leave_table(&mut conn, &alice).unwrap();
        assert!(Table::get_all(&mut conn).unwrap().is_empty());
    }
}
