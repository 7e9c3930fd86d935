//! 领域错误
//!
//! Five error kinds shared by every layer above storage, plus the single
//! classifier that turns raw `DbErr` values into them.

use std::fmt;

use sea_orm::DbErr;
use strum::{Display, IntoStaticStr};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 错误类别（不带负载，便于穷举匹配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum ErrorKind {
    #[strum(serialize = "INVALID_ARGUMENT")]
    InvalidArgument,
    #[strum(serialize = "NOT_FOUND")]
    NotFound,
    #[strum(serialize = "ALREADY_EXISTS")]
    AlreadyExists,
    #[strum(serialize = "NOT_AUTHORIZED")]
    NotAuthorized,
    #[strum(serialize = "INTERNAL_ERROR")]
    Internal,
}

#[derive(Debug)]
pub enum AppError {
    InvalidArgument {
        message: String,
        cause: Option<BoxError>,
    },
    NotFound {
        message: String,
        cause: Option<BoxError>,
    },
    AlreadyExists {
        message: String,
        cause: Option<BoxError>,
    },
    NotAuthorized {
        message: String,
        cause: Option<BoxError>,
    },
    Internal {
        message: String,
        cause: Option<BoxError>,
    },
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            AppError::NotAuthorized { .. } => ErrorKind::NotAuthorized,
            AppError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        self.kind().into()
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AppError::InvalidArgument { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::AlreadyExists { message, .. }
            | AppError::NotAuthorized { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            AppError::InvalidArgument { cause, .. }
            | AppError::NotFound { cause, .. }
            | AppError::AlreadyExists { cause, .. }
            | AppError::NotAuthorized { cause, .. }
            | AppError::Internal { cause, .. } => cause.as_deref(),
        }
    }

    /// Attaches (or replaces) the wrapped cause.
    pub fn with_cause<E>(mut self, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        let slot = match &mut self {
            AppError::InvalidArgument { cause, .. }
            | AppError::NotFound { cause, .. }
            | AppError::AlreadyExists { cause, .. }
            | AppError::NotAuthorized { cause, .. }
            | AppError::Internal { cause, .. } => cause,
        };
        *slot = Some(err.into());
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause() {
            Some(cause) => write!(f, "[{}] {}: {}", self.code(), self.message(), cause),
            None => write!(f, "[{}] {}", self.code(), self.message()),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

// 便捷的构造函数
impl AppError {
    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidArgument {
            message: msg.into(),
            cause: None,
        }
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AppError::NotFound {
            message: msg.into(),
            cause: None,
        }
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        AppError::AlreadyExists {
            message: msg.into(),
            cause: None,
        }
    }

    pub fn not_authorized<T: Into<String>>(msg: T) -> Self {
        AppError::NotAuthorized {
            message: msg.into(),
            cause: None,
        }
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        AppError::Internal {
            message: msg.into(),
            cause: None,
        }
    }
}

/// Constraint class behind a vendor error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbCodeClass {
    UniqueViolation,
    ForeignKeyViolation,
    CheckViolation,
    Other,
}

/// Maps a PostgreSQL SQLSTATE, SQLite extended result code or MySQL error
/// number onto a constraint class.
pub fn classify_db_code(code: &str) -> DbCodeClass {
    match code {
        // PostgreSQL / SQLite (UNIQUE, PRIMARYKEY) / MySQL
        "23505" | "2067" | "1555" | "1062" => DbCodeClass::UniqueViolation,
        "23503" | "787" | "1451" | "1452" => DbCodeClass::ForeignKeyViolation,
        "23514" | "275" | "3819" => DbCodeClass::CheckViolation,
        _ => DbCodeClass::Other,
    }
}

/// 从 DbErr 中提取数据库厂商错误码
pub fn db_error_code(err: &DbErr) -> Option<String> {
    use sea_orm::error::RuntimeErr;
    use std::ops::Deref;

    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Conn(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err
            .deref()
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}

/// Translates a storage failure into the domain vocabulary.
///
/// `action` names the attempted operation and becomes the error message.
pub fn map_repo_err(action: &str, err: DbErr) -> AppError {
    if matches!(err, DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated) {
        return AppError::not_found(action).with_cause(err);
    }

    let kind = match db_error_code(&err) {
        Some(code) => match classify_db_code(&code) {
            DbCodeClass::UniqueViolation => ErrorKind::AlreadyExists,
            DbCodeClass::ForeignKeyViolation | DbCodeClass::CheckViolation => {
                ErrorKind::InvalidArgument
            }
            DbCodeClass::Other => ErrorKind::Internal,
        },
        None => ErrorKind::Internal,
    };

    let base = match kind {
        ErrorKind::InvalidArgument => AppError::invalid_argument(action),
        ErrorKind::NotFound => AppError::not_found(action),
        ErrorKind::AlreadyExists => AppError::already_exists(action),
        ErrorKind::NotAuthorized => AppError::not_authorized(action),
        ErrorKind::Internal => AppError::internal(action),
    };
    base.with_cause(err)
}

pub type Result<T> = std::result::Result<T, AppError>;
