// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Handles user Authentication in API requests
use crate::api::response::{ApiError, AuthenticationError};
use crate::auth::password::{verify_password, verify_unknown_user};
use crate::auth::{TokenContext, TokenError};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::Error;
use actix_web::http::header::Header;
use actix_web::web::Data;
use actix_web::{HttpMessage, ResponseError};
use actix_web_httpauth::headers::authorization::{Authorization, Basic, Bearer};
use core::future::ready;
use database::{DatabaseError, Db, DbConnection, OptionalExt};
use db_storage::users::User;
use std::future::{Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Authentication schemes a scope accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schemes {
    BasicOrBearer,
    Basic,
}

impl Schemes {
    fn reject(self, error: AuthenticationError) -> ApiError {
        match self {
            Self::BasicOrBearer => ApiError::auth_bearer(error),
            Self::Basic => ApiError::auth_basic(error),
        }
    }
}

/// Middleware factory
///
/// Transforms into [`UserAuthMiddleware`]
pub struct UserAuth {
    schemes: Schemes,
}

impl UserAuth {
    /// Accept HTTP Basic credentials as well as bearer tokens issued by `GET /token`
    pub fn any() -> Self {
        Self {
            schemes: Schemes::BasicOrBearer,
        }
    }

    /// Accept HTTP Basic credentials only
    pub fn basic() -> Self {
        Self {
            schemes: Schemes::Basic,
        }
    }
}

impl<S> Transform<S, ServiceRequest> for UserAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Transform = UserAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthMiddleware {
            service: Rc::new(service),
            schemes: self.schemes,
        }))
    }
}

/// Authentication middleware
///
/// Whenever an API request is received, the UserAuthMiddleware will check the credentials
/// and provide the associated user as [`ReqData`](actix_web::web::ReqData) for the subsequent services.
pub struct UserAuthMiddleware<S> {
    service: Rc<S>,
    schemes: Schemes,
}

type ResultFuture<O, E> = Pin<Box<dyn Future<Output = Result<O, E>>>>;

impl<S> Service<ServiceRequest> for UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = ResultFuture<Self::Response, Self::Error>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let schemes = self.schemes;

        let credentials = match Credentials::parse(&req, schemes) {
            Some(credentials) => credentials,
            None => {
                let error = schemes.reject(AuthenticationError::MissingCredentials);
                let response = req.into_response(error.error_response());
                return Box::pin(ready(Ok(response)));
            }
        };

        let db = req.app_data::<Data<Db>>().cloned();
        let token_ctx = req.app_data::<Data<TokenContext>>().cloned();

        Box::pin(async move {
            match check_credentials(credentials, schemes, db, token_ctx).await {
                Ok(current_user) => {
                    req.extensions_mut().insert(current_user);
                    service.call(req).await
                }
                Err(error) => Ok(req.into_response(error.error_response())),
            }
        })
    }
}

enum Credentials {
    Basic { username: String, password: String },
    Bearer(String),
}

impl Credentials {
    fn parse(req: &ServiceRequest, schemes: Schemes) -> Option<Self> {
        if let Ok(auth) = Authorization::<Basic>::parse(req) {
            let basic = auth.into_scheme();

            return Some(Self::Basic {
                username: basic.user_id().to_string(),
                password: basic
                    .password()
                    .map(|password| password.to_string())
                    .unwrap_or_default(),
            });
        }

        if schemes == Schemes::BasicOrBearer {
            if let Ok(auth) = Authorization::<Bearer>::parse(req) {
                return Some(Self::Bearer(auth.into_scheme().token().to_string()));
            }
        }

        None
    }
}

/// Resolve the credentials to the user they belong to
async fn check_credentials(
    credentials: Credentials,
    schemes: Schemes,
    db: Option<Data<Db>>,
    token_ctx: Option<Data<TokenContext>>,
) -> Result<User, ApiError> {
    match credentials {
        Credentials::Basic { username, password } => {
            let db = db.ok_or_else(missing_app_data::<Db>)?;

            let user = crate::block(move || -> Result<Option<User>, DatabaseError> {
                let mut conn = db.get_conn()?;

                find_user_by_password(&mut conn, &username, &password)
            })
            .await??;

            user.ok_or_else(|| {
                log::debug!("Rejected basic credentials");
                schemes.reject(AuthenticationError::InvalidCredentials)
            })
        }
        Credentials::Bearer(token) => {
            let token_ctx = token_ctx.ok_or_else(missing_app_data::<TokenContext>)?;

            let claims = token_ctx.verify(&token).map_err(|e| match e {
                TokenError::Expired => schemes.reject(AuthenticationError::TokenExpired),
                e => {
                    log::debug!("Rejected bearer token, {}", e);
                    schemes.reject(AuthenticationError::InvalidToken)
                }
            })?;

            let db = db.ok_or_else(missing_app_data::<Db>)?;

            let user = crate::block(move || -> Result<Option<User>, DatabaseError> {
                let mut conn = db.get_conn()?;

                User::get(&mut conn, claims.sub).optional()
            })
            .await??;

            user.ok_or_else(|| {
                log::warn!("The user of a valid bearer token could not be found in the database");
                schemes.reject(AuthenticationError::InvalidToken)
            })
        }
    }
}

/// Look up the user and check the password, unknown users cost as much as wrong passwords
fn find_user_by_password(
    conn: &mut DbConnection,
    username: &str,
    password: &str,
) -> Result<Option<User>, DatabaseError> {
    // postgres rejects NUL in text values, no user can have such a name
    let user = if username.contains('\0') {
        None
    } else {
        User::get_by_username(conn, username)?
    };

    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(Some(user)),
        Some(_) => Ok(None),
        None => {
            verify_unknown_user(password);
            Ok(None)
        }
    }
}

fn missing_app_data<T>() -> ApiError {
    log::error!(
        "Missing app data {} for user authentication",
        std::any::type_name::<T>()
    );
    ApiError::internal()
}
