//! 페이지네이션

use serde::{Deserialize, Serialize};

use gp_core::config::DEFAULT_PAGE_SIZE;

/// 페이지 요청/응답
///
/// `current`, `size`를 채워 넘기면 `select_page*`가 `total`과 `records`를 채웁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<R> {
    /// 현재 페이지 (1부터 시작, 0 이하는 1로 취급)
    pub current: i64,

    /// 페이지 크기 (0 이하는 기본값으로 취급)
    pub size: i64,

    /// 전체 row 수 (count 쿼리 결과)
    pub total: u64,

    /// 현재 페이지의 레코드
    pub records: Vec<R>,
}

impl<R> Page<R> {
    pub fn new(current: i64, size: i64) -> Self {
        Self {
            current,
            size,
            total: 0,
            records: Vec::new(),
        }
    }

    /// 전체 페이지 수
    pub fn pages(&self) -> u64 {
        let (_, limit) = offset_limit(self.current, self.size);
        self.total.div_ceil(limit)
    }
}

/// (current, size) → (offset, limit)
///
/// `current <= 0`이면 1, `size <= 0`이면 10으로 취급합니다.
pub fn offset_limit(current: i64, size: i64) -> (u64, u64) {
    offset_limit_with(current, size, DEFAULT_PAGE_SIZE)
}

/// 기본 페이지 크기를 지정하는 `offset_limit`
pub fn offset_limit_with(current: i64, size: i64, default_size: i64) -> (u64, u64) {
    let current = if current <= 0 { 1 } else { current as u64 };
    let size = match size {
        s if s > 0 => s as u64,
        _ if default_size > 0 => default_size as u64,
        _ => DEFAULT_PAGE_SIZE as u64,
    };
    ((current - 1).saturating_mul(size), size)
}
