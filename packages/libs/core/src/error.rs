//! 공통 에러 타입
//!
//! 데이터 접근 계층 전체에서 사용되는 에러 타입을 정의합니다.
//! 컬럼 해석과 조건 빌드는 실패하지 않으므로, 여기 정의된 에러는
//! 초기화 오용과 실행 단계(Executor)에서 발생하는 것들입니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// 데이터 접근 계층 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Lifecycle Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("default executor is not initialized; call init() first")]
    NotInitialized,

    #[error("default executor is already initialized")]
    AlreadyInitialized,

    // ─────────────────────────────────────────────────────────────────────────────
    // Query Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("record not found")]
    NotFound,

    #[error("refusing to {operation} without a WHERE clause")]
    MissingWhereClause { operation: &'static str },

    #[error("primary key '{column}' has no value")]
    MissingPrimaryKey { column: String },

    #[error("unsupported operation: {operation}")]
    Unsupported { operation: String },

    #[error("statement error: {message}")]
    Statement { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Execution / Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("executor error: {0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Executor 에러를 그대로 감싸서 전달
    pub fn executor<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Executor(Box::new(err))
    }

    /// 지원하지 않는 동작
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Error::Unsupported {
            operation: operation.into(),
        }
    }

    /// 조회 결과 없음 여부
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// 에러 코드 (로그/클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotInitialized => "NOT_INITIALIZED",
            Error::AlreadyInitialized => "ALREADY_INITIALIZED",
            Error::NotFound => "RECORD_NOT_FOUND",
            Error::MissingWhereClause { .. } => "MISSING_WHERE_CLAUSE",
            Error::MissingPrimaryKey { .. } => "MISSING_PRIMARY_KEY",
            Error::Unsupported { .. } => "UNSUPPORTED",
            Error::Statement { .. } => "STATEMENT_ERROR",
            Error::Executor(_) => "EXECUTOR_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}
