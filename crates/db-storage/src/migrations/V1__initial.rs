// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.create_table("users", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("username", types::varchar(64).unique(true).nullable(false));
        table.add_column("password_hash", types::varchar(255).nullable(false));
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ DEFAULT now()"),
        );
    });

    migr.create_table("tables", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("table_key", types::varchar(255).unique(true).nullable(false));
        table.add_column("table_date", types::custom("TIMESTAMPTZ"));
    });

    migr.create_table("user_tables", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));

        // make the user FK unique, a user can only sit at one table at a time
        table.add_column(
            "user_id",
            types::custom("BIGINT REFERENCES users(id) ON DELETE CASCADE").unique(true),
        );
        table.add_column(
            "table_id",
            types::custom("BIGINT REFERENCES tables(id)"),
        );
        table.add_column(
            "joined_at",
            types::custom("TIMESTAMPTZ DEFAULT now()"),
        );
    });

    migr.create_table("user_product", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column(
            "user_id",
            types::custom("BIGINT REFERENCES users(id) ON DELETE CASCADE").nullable(true),
        );
        table.add_column("product", types::varchar(255).nullable(false));
    });

    migr.make::<Pg>()
}
