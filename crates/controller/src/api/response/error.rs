// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Error response types of the REST API
use super::{CODE_INVALID_LENGTH, CODE_INVALID_VALUE, CODE_VALUE_REQUIRED};
use crate::services::TableError;
use actix_web::error::JsonPayloadError;
use actix_web::http::header::{self, HeaderValue, TryIntoHeaderValue};
use actix_web::http::StatusCode;
use actix_web::HttpRequest;
use actix_web::{body::BoxBody, HttpResponse, ResponseError};
use actix_web_httpauth::headers::www_authenticate::basic::Basic;
use actix_web_httpauth::headers::www_authenticate::bearer::{self, Bearer};
use database::DatabaseError;
use itertools::Itertools;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use validator::ValidationErrors;

/// Realm sent in the `WWW-Authenticate` challenges
const REALM: &str = "receipt-tables";

/// Error handler for the actix JSON extractor
///
/// Gets called when a incoming request results in an [`JsonPayloadError`].
/// Returns a `Bad Request` [`ApiError`] error with an appropriate error code and message.
pub fn json_error_handler(err: JsonPayloadError, _: &HttpRequest) -> actix_web::error::Error {
    let error_code = match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "payload_overflow"
        }
        JsonPayloadError::ContentType => "invalid_content_type",
        JsonPayloadError::Deserialize(_) | JsonPayloadError::Serialize(_) => "invalid_json",
        _ => "invalid_payload",
    };
    ApiError::bad_request()
        .with_code(error_code)
        .with_message(err.to_string())
        .into()
}

#[derive(Debug, Serialize)]
struct StandardErrorBody {
    // Machine readable error code
    code: Cow<'static, str>,
    // Human readable message
    message: Cow<'static, str>,
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorEntry {
    /// The field related to the error
    /// It's a struct level error when no field is set
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<Cow<'static, str>>,
    /// Machine readable error message
    code: Cow<'static, str>,
    /// Human readable error message
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<Cow<'static, str>>,
}

#[derive(Debug, Serialize)]
struct ValidationErrorBody {
    /// Machine readable error message
    code: Cow<'static, str>,
    // Human readable message
    message: Cow<'static, str>,
    // A list validation errors
    errors: Vec<ValidationErrorEntry>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorBody {
    /// The standard error body
    Standard(StandardErrorBody),
    /// Special error body for validation errors
    Validation(ValidationErrorBody),
}

/// Reasons for rejecting the credentials of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    MissingCredentials,
    InvalidCredentials,
    InvalidToken,
    TokenExpired,
}

impl AuthenticationError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidToken => "invalid_token",
            Self::TokenExpired => "token_expired",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "The request carries no usable credentials",
            Self::InvalidCredentials => "Unknown username or wrong password",
            Self::InvalidToken => "The provided bearer token is invalid",
            Self::TokenExpired => "The provided bearer token expired",
        }
    }

    fn bearer_error(&self) -> Option<bearer::Error> {
        match self {
            Self::InvalidToken | Self::TokenExpired => Some(bearer::Error::InvalidToken),
            Self::MissingCredentials | Self::InvalidCredentials => None,
        }
    }
}

/// The REST API error
///
/// Can be build via the associated functions to represent various HTTP errors. Each
/// HTTP error has their default error code and message that get send in a JSON body.
/// The error code and message can be overwritten when creating an error.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    www_authenticate: Option<HeaderValue>,
    body: ErrorBody,
}

impl ApiError {
    fn new_standard<T>(status: StatusCode, code: T, message: T) -> Self
    where
        T: Into<Cow<'static, str>>,
    {
        Self {
            status,
            www_authenticate: None,
            body: ErrorBody::Standard(StandardErrorBody {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Override the default code for an error
    pub fn with_code<T>(mut self, code: T) -> Self
    where
        T: Into<Cow<'static, str>>,
    {
        match &mut self.body {
            ErrorBody::Standard(std) => std.code = code.into(),
            ErrorBody::Validation(val) => val.code = code.into(),
        }

        self
    }

    /// Override the default message for an error
    pub fn with_message<T>(mut self, message: T) -> Self
    where
        T: Into<Cow<'static, str>>,
    {
        match &mut self.body {
            ErrorBody::Standard(std) => std.message = message.into(),
            ErrorBody::Validation(val) => val.message = message.into(),
        }

        self
    }

    fn with_www_authenticate<T: TryIntoHeaderValue>(mut self, challenge: T) -> Self {
        self.www_authenticate = challenge.try_into_value().ok();

        self
    }

    /// Create a 401 Unauthorized error with a `Basic` challenge
    pub fn auth_basic(error: AuthenticationError) -> Self {
        Self::unauthorized()
            .with_code(error.code())
            .with_message(error.message())
            .with_www_authenticate(Basic::with_realm(REALM))
    }

    /// Create a 401 Unauthorized error with a `Bearer` challenge
    pub fn auth_bearer(error: AuthenticationError) -> Self {
        let mut challenge = Bearer::build().realm(REALM);

        if let Some(bearer_error) = error.bearer_error() {
            challenge = challenge
                .error(bearer_error)
                .error_description(error.message());
        }

        Self::unauthorized()
            .with_code(error.code())
            .with_message(error.message())
            .with_www_authenticate(challenge.finish())
    }

    /// Create a new 400 Bad Request error
    pub fn bad_request() -> Self {
        Self::new_standard(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "Invalid request due to malformed syntax",
        )
    }

    /// Create a new 401 Unauthorized error
    pub fn unauthorized() -> Self {
        Self::new_standard(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Authentication failed",
        )
    }

    /// Create a new 404 Not Found error
    pub fn not_found() -> Self {
        Self::new_standard(
            StatusCode::NOT_FOUND,
            "not_found",
            "A requested resource could not be found",
        )
    }

    /// Create a new 406 Not Acceptable error
    pub fn not_acceptable() -> Self {
        Self::new_standard(
            StatusCode::NOT_ACCEPTABLE,
            "not_acceptable",
            "The request can not be fulfilled in the current state",
        )
    }

    /// Create a new 409 Conflict error
    pub fn conflict() -> Self {
        Self::new_standard(
            StatusCode::CONFLICT,
            "conflict",
            "The request conflicts with the state of the resource",
        )
    }

    /// Create a new 400 Bad Request error listing the invalid fields
    ///
    /// This error is normally created from [`ValidationErrors`] from the validator crate.
    pub fn validation_failed<T, I>(errors: I) -> Self
    where
        T: Into<ValidationErrorEntry>,
        I: IntoIterator<Item = T>,
    {
        let errors = errors.into_iter().map(|entry| entry.into()).collect();

        Self {
            status: StatusCode::BAD_REQUEST,
            www_authenticate: None,
            body: ErrorBody::Validation(ValidationErrorBody {
                code: "validation_failed".into(),
                message: "Some provided values are invalid".into(),
                errors,
            }),
        }
    }

    /// Create a new 500 Internal Server Error
    pub fn internal() -> Self {
        Self::new_standard(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_server_error",
            "An internal server error occurred",
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ErrorBody::Standard(StandardErrorBody { code, message }) => {
                write!(
                    f,
                    "status={}, code={}, message={}",
                    self.status, code, message
                )
            }
            ErrorBody::Validation(ValidationErrorBody {
                code,
                message,
                errors,
            }) => {
                write!(
                    f,
                    "status={}, code={}, message={}, errors={}",
                    self.status,
                    code,
                    message,
                    serde_json::to_string(errors)
                        .unwrap_or_else(|_| "unserializable errors".to_string())
                )
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let mut response = HttpResponse::new(self.status_code());

        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        if let Some(www_authenticate) = self.www_authenticate.clone() {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, www_authenticate);
        }

        let body = match serde_json::to_string(&self.body) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Unable to serialize API error body, {}", e);
                String::new()
            }
        };

        response.set_body(BoxBody::new(body))
    }
}

impl From<crate::BlockingError> for ApiError {
    fn from(e: crate::BlockingError) -> Self {
        log::error!("REST API threw internal error from blocking error: {}", e);
        Self::internal()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        log::error!("REST API threw internal error from anyhow error: {:?}", e);
        Self::internal()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(db_error: DatabaseError) -> Self {
        log::error!(
            "REST API threw internal error from database error: {}",
            db_error
        );
        Self::internal()
    }
}

impl From<TableError> for ApiError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::TableAlreadyExists => Self::conflict()
                .with_code("table_already_exists")
                .with_message("A table with the generated key already exists, try again"),
            TableError::KeyGenerationExhausted(_) => Self::conflict()
                .with_code("key_generation_exhausted")
                .with_message("Could not find an unused table key, try again"),
            TableError::UserAlreadyInTable => Self::not_acceptable()
                .with_code("already_in_table")
                .with_message("The user already is a member of a table"),
            TableError::NotInAnyTable => Self::not_found()
                .with_code("not_in_table")
                .with_message("The user is not a member of any table"),
            TableError::TableNotFound => Self::not_found()
                .with_code("table_not_found")
                .with_message("No table with the given key exists"),
            TableError::TableInconsistent => Self::bad_request()
                .with_code("table_inconsistent")
                .with_message("The table changed while it was being left, try again"),
            TableError::Database(e) => e.into(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    /// Creates a 400 Bad Request response from the [`ValidationErrors`]
    ///
    /// Errors of nested structs are reported as if the struct was flattened into its parent,
    /// with the field name the nested validation reported.
    fn from(validation_errors: ValidationErrors) -> Self {
        let mut entries = Vec::with_capacity(validation_errors.errors().len());

        collect_validation_errors(validation_errors, &mut entries);

        Self::validation_failed(entries)
    }
}

/// Convert [`ValidationErrors`] into multiple [`ValidationErrorEntries`](ValidationErrorEntry) and collect them in `entries`
fn collect_validation_errors(
    validation_errors: ValidationErrors,
    entries: &mut Vec<ValidationErrorEntry>,
) {
    let errors = validation_errors.into_errors();

    for (field, error_kind) in errors {
        let field = match field {
            "__all__" => None,
            field => Some(field.into()),
        };

        match error_kind {
            validator::ValidationErrorsKind::Field(v) => {
                for error in v {
                    let code = convert_validation_code(&error.code);

                    entries.push(ValidationErrorEntry {
                        field: field.clone(),
                        code: Cow::Borrowed(code),
                        message: error.message,
                    });
                }
            }
            validator::ValidationErrorsKind::Struct(inner_errors) => {
                collect_validation_errors(*inner_errors, entries);
            }
            validator::ValidationErrorsKind::List(list) => {
                let invalid_indexes = list.iter().map(|(idx, ..)| idx).take(15).join(", ");

                let message = format!("Invalid values at index {invalid_indexes}");

                entries.push(ValidationErrorEntry {
                    field,
                    code: "invalid_values".into(),
                    message: Some(Cow::Owned(message)),
                })
            }
        };
    }
}

fn convert_validation_code(code: &str) -> &'static str {
    match code {
        "length" => CODE_INVALID_LENGTH,
        "required" => CODE_VALUE_REQUIRED,
        _ => CODE_INVALID_VALUE,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_util::{assert_eq, assert_eq_json};
    use types::core::TableKey;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct ValidationTester {
        #[validate(length(max = 5))]
        length: String,
        #[validate]
        table_key: TableKey,
    }

    #[test]
    fn api_validation_error() {
        let tester = ValidationTester {
            length: "looong".into(),
            table_key: TableKey::from("".into()),
        };

        let mut api_error = match tester.validate() {
            Ok(_) => panic!("Validation should fail"),
            Err(err) => ApiError::from(err),
        };

        assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

        match &mut api_error.body {
            ErrorBody::Standard(_) => panic!("Expected validation error body"),
            ErrorBody::Validation(val) => val.errors.sort_by(|a, b| a.field.cmp(&b.field)),
        }

        assert_eq_json!(
            api_error.body,
            {
                "code": "validation_failed",
                "message": "Some provided values are invalid",
                "errors": [
                  {
                    "field": "length",
                    "code": "invalid_length"
                  },
                  {
                    "field": "table_key",
                    "code": "value_required"
                  }
                ]
            }
        );
    }

    #[test]
    fn api_error_with_code() {
        let error = ApiError::not_found().with_code("custom_code");

        assert_eq_json!(
            error.body,
            {
                "code": "custom_code",
                "message": "A requested resource could not be found"
            }
        );
    }

    #[test]
    fn table_errors_map_to_status_codes() {
        let cases = [
            (TableError::TableAlreadyExists, StatusCode::CONFLICT),
            (TableError::KeyGenerationExhausted(10), StatusCode::CONFLICT),
            (TableError::UserAlreadyInTable, StatusCode::NOT_ACCEPTABLE),
            (TableError::NotInAnyTable, StatusCode::NOT_FOUND),
            (TableError::TableNotFound, StatusCode::NOT_FOUND),
            (TableError::TableInconsistent, StatusCode::BAD_REQUEST),
            (
                TableError::Database(DatabaseError::custom("down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status_code(), status);
        }

        assert_eq_json!(
            ApiError::from(TableError::UserAlreadyInTable).body,
            {
                "code": "already_in_table",
                "message": "The user already is a member of a table"
            }
        );
    }

    #[test]
    fn challenges() {
        let basic = ApiError::auth_basic(AuthenticationError::MissingCredentials);
        let response = basic.error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"receipt-tables\""
        );

        let bearer = ApiError::auth_bearer(AuthenticationError::TokenExpired);
        let response = bearer.error_response();
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(challenge.starts_with("Bearer"));
        assert!(challenge.contains("invalid_token"));
        assert_eq_json!(
            bearer.body,
            {
                "code": "token_expired",
                "message": "The provided bearer token expired"
            }
        );
    }
}
