//! Stable numeric error codes used by the Oxygen service.
//!
//! These values are part of the wire contract: they appear in the `code`
//! field of JSON error bodies. Never renumber an existing entry; new codes are
//! appended after [`ErrorCode::NoResponseRequired`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! error_codes {
    ($($variant:ident = $value:literal => $name:literal,)+) => {
        /// A service error code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i64)]
        pub enum ErrorCode {
            $($variant = $value,)+
        }

        impl ErrorCode {
            /// Every known code, in wire order.
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$variant,)+];

            /// Look up a wire value. Unknown values return `None`.
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($value => Some(ErrorCode::$variant),)+
                    _ => None,
                }
            }

            /// The service's name for this code.
            pub fn name(self) -> &'static str {
                match self {
                    $(ErrorCode::$variant => $name,)+
                }
            }
        }
    };
}

error_codes! {
    Success = 1_000_000 => "SUCCESS",
    ParsingJson = 2 => "ERROR_PARSING_JSON",
    InvalidMethod = 3 => "ERROR_INVALID_METHOD",
    InvalidVersion = 4 => "ERROR_INVALID_VERSION",
    MissingArguments = 5 => "ERROR_MISSING_ARGUMENTS",
    InvalidProjectName = 6 => "ERROR_INVALID_PROJECTNAME",
    ProjectAlreadyExists = 7 => "ERROR_PROJECT_ALREADY_EXISTS",
    InvalidToken = 8 => "ERROR_INVALID_TOKEN",
    InvalidRange = 9 => "ERROR_INVALID_RANGE",
    InvalidContentLength = 10 => "ERROR_INVALID_CONTENT_LENGTH",
    InvalidIdParameter = 11 => "ERROR_INVALID_ID_PARAMETER",
    RequireToken = 12 => "ERROR_REQUIRE_TOKEN",
    MaxProjectsReached = 13 => "ERROR_MAX_PROJECTS_REACHED",
    InvalidCredentials = 14 => "ERROR_INVALID_CREDENTIALS",
    NeedEmailPasswordOrToken = 15 => "ERROR_NEED_EMAIL_PASSWORD_OR_TOKEN",
    InvalidEmail = 16 => "ERROR_INVALID_EMAIL",
    InvalidPassword = 17 => "ERROR_INVALID_PASSWORD",
    InvalidExpires = 18 => "ERROR_INVALID_EXPIRES",
    InvalidArgumentType = 19 => "ERROR_INVALID_ARGUMENT_TYPE",
    TokenEmpty = 20 => "ERROR_TOKEN_EMPTY",
    ProjectDoesNotExist = 21 => "ERROR_PROJECT_DOES_NOT_EXIST",
    InternalError = 22 => "ERROR_INTERNAL_ERROR",
    PathNotFound = 23 => "ERROR_PATH_NOT_FOUND",
    PathNotFoundSource = 24 => "ERROR_PATH_NOT_FOUND_SOURCE",
    PathNotFoundDestination = 25 => "ERROR_PATH_NOT_FOUND_DESTINATION",
    InvalidPath = 26 => "ERROR_INVALID_PATH",
    InvalidSourcePath = 27 => "ERROR_INVALID_SOURCE_PATH",
    InvalidDestinationPath = 28 => "ERROR_INVALID_DESTINATIO_PATH",
    DirectoryAlreadyExists = 29 => "ERROR_DIRECTORY_ALREADY_EXISTS",
    InvalidUsername = 30 => "ERROR_INVALID_USERNAME",
    UsernameAlreadyExists = 31 => "ERROR_USERNAME_ALREADY_EXISTS",
    EmailAlreadyInUse = 32 => "ERROR_EMAIL_ALREADY_IN_USE",
    NoWritePermission = 33 => "ERROR_NO_WRITE_PERMISSION",
    NotADirectory = 34 => "ERROR_NOT_A_DIRECTORY",
    DirectoryNotEmpty = 35 => "ERROR_DIRECTORY_NOT_EMPTY",
    PathAlreadyExists = 36 => "ERROR_PATH_ALREADY_EXISTS",
    UserCannotTakeProject = 37 => "ERROR_USER_CANNOT_TAKE_PROJECT",
    ProjectAlreadySharedWithUser = 38 => "ERROR_PROJECT_ALREADY_SHARED_WITH_USER",
    InvalidPermissions = 39 => "ERROR_INVALID_PERMISSIONS",
    InsufficientPermissions = 40 => "ERROR_INSUFFICIENT_PERMISSIONS",
    InsufficientPermissionsSource = 41 => "ERROR_INSUFFICIENT_PERMISSIONS_SOURCE",
    InsufficientPermissionsDestination = 42 => "ERROR_INSUFFICIENT_PERMISSIONS_DESTINATION",
    MethodNotAllowed = 43 => "ERROR_405",
    OutOfRange = 44 => "ERROR_OUT_OF_RANGE",
    NoResponseRequired = 45 => "NO_RESPONSE_REQUIRED",
}

impl ErrorCode {
    /// The wire value.
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// The JSON body the service attaches to error responses.
///
/// Both fields default when absent, so `{}` and `{"code": 35}` both parse.
/// A missing code is `None`, never a real table entry. Fields are read
/// independently: a malformed `description` never costs the `code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub description: String,
}

impl ErrorEnvelope {
    /// Parse a response body, falling back to an empty envelope when the
    /// body is empty or not JSON.
    pub fn parse(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => return Self::default(),
        };

        Self {
            code: value.get("code").and_then(Value::as_i64),
            description: value
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// The code as a table entry, if it is one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.code.and_then(ErrorCode::from_code)
    }
}
