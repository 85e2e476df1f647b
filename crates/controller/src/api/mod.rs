// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! REST API
//!
//! Current Endpoints. See their respective function:
//! - `/tables` ([POST](tables::create))
//! - `/tables/users` ([GET](tables::members), [POST](tables::join), [DELETE](tables::leave))
//! - `/token` ([GET](token::get))
use actix_web::{web, Scope};
use middleware::user_auth::UserAuth;

pub mod middleware;
pub mod response;
pub mod tables;
pub mod token;

pub(crate) fn tables_scope() -> Scope {
    // empty scope to attach the authentication to all table endpoints
    web::scope("/tables").service(
        web::scope("")
            .wrap(UserAuth::any())
            .service(tables::create)
            .service(tables::members)
            .service(tables::join)
            .service(tables::leave),
    )
}

pub(crate) fn token_scope() -> Scope {
    web::scope("/token").service(
        web::scope("")
            .wrap(UserAuth::basic())
            .service(token::get),
    )
}
