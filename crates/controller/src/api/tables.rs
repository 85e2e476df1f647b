// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Table related API structs and Endpoints
//!
//! All endpoints act on behalf of the authenticated user.
use super::response::ApiError;
use crate::services::tables;
use crate::services::TableError;
use crate::settings::SharedSettingsActix;
use actix_web::web::{Data, Json, ReqData};
use actix_web::{delete, get, post, HttpResponse};
use database::Db;
use db_storage::tables::{Member, TableId, TableKey, UserTable};
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Response body of `POST /tables`
#[derive(Debug, Serialize)]
pub struct CreatedTable {
    pub table_key: TableKey,
}

/// Request body of `POST /tables/users`
#[derive(Debug, Deserialize, Validate)]
pub struct JoinTableBody {
    #[validate]
    pub table_key: TableKey,
}

/// A membership of a user in a table
#[derive(Debug, Serialize)]
pub struct Membership {
    pub table_id: TableId,
    pub user_id: UserId,
}

impl From<UserTable> for Membership {
    fn from(user_table: UserTable) -> Self {
        Self {
            table_id: user_table.table_id,
            user_id: user_table.user_id,
        }
    }
}

/// A co-member as listed by `GET /tables/users`
#[derive(Debug, Serialize)]
pub struct TableMember {
    pub id: UserId,
    pub name: String,
}

impl From<Member> for TableMember {
    fn from(member: Member) -> Self {
        Self {
            id: member.user_id,
            name: member.username,
        }
    }
}

/// Response body of `GET /tables/users`
#[derive(Debug, Serialize)]
pub struct TableMembers {
    pub users: Vec<TableMember>,
}

/// API Endpoint *POST /tables*
///
/// Creates a new table with a random key and makes the requesting user its first member.
/// Returns the key of the new table.
#[post("")]
pub async fn create(
    settings: SharedSettingsActix,
    db: Data<Db>,
    current_user: ReqData<User>,
) -> Result<HttpResponse, ApiError> {
    let max_key_attempts = settings.load().tables.max_key_attempts;
    let current_user = current_user.into_inner();

    let table_key = crate::block(move || -> Result<TableKey, TableError> {
        let mut conn = db.get_conn()?;

        tables::create_table(&mut conn, &current_user, max_key_attempts)
    })
    .await??;

    Ok(HttpResponse::Created().json(CreatedTable { table_key }))
}

/// API Endpoint *GET /tables/users*
///
/// Lists the members of the requesting user's table in the order they joined.
#[get("/users")]
pub async fn members(
    db: Data<Db>,
    current_user: ReqData<User>,
) -> Result<Json<TableMembers>, ApiError> {
    let current_user = current_user.into_inner();

    let members = crate::block(move || -> Result<Vec<Member>, TableError> {
        let mut conn = db.get_conn()?;

        tables::list_members(&mut conn, &current_user)
    })
    .await??;

    Ok(Json(TableMembers {
        users: members.into_iter().map(TableMember::from).collect(),
    }))
}

/// API Endpoint *POST /tables/users*
///
/// Adds the requesting user to the table with the key given in the body.
#[post("/users")]
pub async fn join(
    db: Data<Db>,
    current_user: ReqData<User>,
    body: Json<JoinTableBody>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let current_user = current_user.into_inner();

    let membership = crate::block(move || -> Result<UserTable, TableError> {
        let mut conn = db.get_conn()?;

        tables::join_table(&mut conn, &current_user, &body.table_key)
    })
    .await??;

    Ok(HttpResponse::Created().json(Membership::from(membership)))
}

/// API Endpoint *DELETE /tables/users*
///
/// Removes the requesting user from their table. The table is deleted when its last member leaves.
#[delete("/users")]
pub async fn leave(
    db: Data<Db>,
    current_user: ReqData<User>,
) -> Result<Json<Membership>, ApiError> {
    let current_user = current_user.into_inner();

    let membership = crate::block(move || -> Result<UserTable, TableError> {
        let mut conn = db.get_conn()?;

        tables::leave_table(&mut conn, &current_user)
    })
    .await??;

    Ok(Json(Membership::from(membership)))
}
