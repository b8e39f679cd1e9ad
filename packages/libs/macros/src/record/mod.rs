//! `#[derive(Record)]` 매크로
//!
//! 구조체 선언에서 레코드 메타데이터(테이블, 필드, PK, 컬럼명)를 생성합니다.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
