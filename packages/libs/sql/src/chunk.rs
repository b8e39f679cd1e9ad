//! 배치 분할

use gp_core::config::DEFAULT_BATCH_SIZE;

/// 레코드 목록을 `size` 크기의 조각으로 분할
///
/// 순서를 유지하며 마지막 조각만 더 짧을 수 있습니다.
/// `size == 0`이면 기본 배치 크기(1000)를 사용합니다.
pub fn chunk<R>(records: &[R], size: usize) -> std::slice::Chunks<'_, R> {
    let size = if size == 0 { DEFAULT_BATCH_SIZE } else { size };
    records.chunks(size)
}
