// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.change_table("user_product", |table| {
        table.add_column("temp_username", types::varchar(64).nullable(true));
        table.add_index(
            "ix_user_product_temp_username",
            types::index(vec!["temp_username"]),
        );
    });

    migr.make::<Pg>()
}
