// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::response::ApiError;
use crate::auth::TokenContext;
use crate::settings::SharedSettingsActix;
use actix_web::get;
use actix_web::web::{Data, Json, ReqData};
use db_storage::users::User;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// API Endpoint *GET /token*
///
/// Issues a bearer token for the user authenticated with HTTP Basic credentials.
#[get("")]
pub async fn get(
    settings: SharedSettingsActix,
    token_ctx: Data<TokenContext>,
    current_user: ReqData<User>,
) -> Result<Json<TokenResponse>, ApiError> {
    let lifetime = settings.load().auth.token_lifetime;

    let token = token_ctx.issue(&current_user, lifetime).map_err(|e| {
        log::error!("Failed to issue token, {}", e);
        ApiError::internal()
    })?;

    Ok(Json(TokenResponse { token }))
}
