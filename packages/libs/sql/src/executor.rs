//! Statement Executor
//!
//! 실제 저장소에 문장을 실행하는 외부 구현의 경계입니다.
//! 이 계층은 조건을 컴파일하고 구조 힌트(`Statement`)를 채워서 넘길 뿐,
//! 실행 결과나 에러를 해석하지 않습니다.

use std::sync::Arc;

use serde_json::Value;

use gp_core::record::Row;
use gp_core::{Error, Result};

use crate::statement::{InsertRows, Statement};

/// 공유 가능한 executor 핸들
pub type Handle = Arc<dyn Executor>;

/// 트랜잭션 잠금 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TxBehavior {
    /// 첫 접근 시 잠금 (기본값)
    #[default]
    Deferred,
    /// 시작 시 쓰기 잠금
    Immediate,
    /// 시작 시 배타 잠금
    Exclusive,
}

/// 트랜잭션 옵션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    pub behavior: TxBehavior,
}

/// Statement Executor
///
/// 모든 메서드는 동기 호출이며 에러는 구현이 만든 값을 그대로 돌려줍니다.
pub trait Executor: Send + Sync {
    /// INSERT, 영향받은 row 수 반환
    fn insert(&self, rows: &InsertRows) -> Result<u64>;

    /// SELECT, row 목록 반환
    fn select(&self, stmt: &Statement) -> Result<Vec<Row>>;

    /// COUNT (order/limit/offset 무시)
    fn count(&self, stmt: &Statement) -> Result<u64>;

    /// UPDATE, 영향받은 row 수 반환
    fn update(&self, stmt: &Statement, values: &[(String, Value)]) -> Result<u64>;

    /// DELETE, 영향받은 row 수 반환
    fn delete(&self, stmt: &Statement) -> Result<u64>;

    /// 트랜잭션 시작, 트랜잭션 핸들 반환
    fn begin(&self, _opts: &TxOptions) -> Result<Handle> {
        Err(Error::unsupported("begin"))
    }

    /// 트랜잭션 커밋 (트랜잭션 핸들에서만)
    fn commit(&self) -> Result<()> {
        Err(Error::unsupported("commit"))
    }

    /// 트랜잭션 롤백 (트랜잭션 핸들에서만)
    fn rollback(&self) -> Result<()> {
        Err(Error::unsupported("rollback"))
    }
}
