//! gp-sql: 제네릭 조건 빌더와 CRUD 디스패처
//!
//! 레코드 타입의 정적 메타데이터(`#[derive(Record)]`)를 바탕으로
//! 파라미터화된 WHERE 조건, 페이지네이션, 배치 INSERT를 만들고
//! 실제 실행은 교체 가능한 `Executor`에 맡깁니다.
//!
//! # 모듈 구조
//!
//! - `query`: 조건 빌더 (`Query<T>`, `Conditions`, `Group`)
//! - `statement`: executor에 넘기는 문장 힌트와 SeaQuery 렌더링
//! - `executor`: Statement Executor 경계
//! - `dao`: CRUD 연산
//! - `page` / `chunk`: 페이지네이션, 배치 청크
//! - `options` / `context`: 호출별 옵션, 전역 기본 핸들
//! - `sqlite`: rusqlite 기반 참조 executor (feature `sqlite`)

extern crate self as gp_sql;

pub mod chunk;
pub mod context;
pub mod dao;
pub mod executor;
pub mod options;
pub mod page;
pub mod query;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod statement;

pub use gp_core::record;
pub use gp_core::record::Record;
pub use gp_core::{config, Config, Error, Result};
pub use gp_macros::Record;

pub use chunk::chunk;
pub use context::{default_handle, init, init_with, is_initialized};
pub use executor::{Executor, Handle, TxBehavior, TxOptions};
pub use options::Options;
pub use page::{offset_limit, Page};
pub use query::{Condition, Conditions, Group, Operator, Query, SortOrder};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;
pub use statement::{InsertRows, Statement};

/// 자주 쓰는 타입 모음
pub mod prelude {
    pub use crate::options::Options;
    pub use crate::page::Page;
    pub use crate::query::{Conditions, Query};
    pub use crate::record::Columns;
    pub use crate::Record;
}
