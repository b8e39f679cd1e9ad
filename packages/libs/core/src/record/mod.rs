//! 레코드 메타데이터 및 컬럼 해석
//!
//! # 개요
//!
//! 레코드 타입은 컴파일 타임에 고정된 필드 메타데이터(`Field`)를 제공합니다.
//! 보통 `#[derive(Record)]`가 생성하며, 이 모듈은 그 메타데이터로부터
//! 물리 컬럼명과 PK 컬럼을 해석합니다.
//!
//! # 모듈 구조
//!
//! - `field`: 필드 메타데이터와 `Record` trait
//! - `naming`: 컬럼/테이블 이름 규칙 (기본: snake_case)
//! - `descriptor`: 타입별 해석 결과 캐시 (`Descriptor`)
//! - `marshal`: 레코드 ↔ Row 변환
//! - `lenient`: 저장소 값의 관대한 역직렬화 (NULL → zero value, 정수 → bool)

mod descriptor;
mod field;
mod lenient;
mod marshal;
mod naming;

pub use descriptor::{resolve_column, resolve_primary_key, Descriptor};
pub use field::{Columns, Field, Record};
pub use marshal::{decode_row, encode_record, is_zero, Row};
pub use naming::{NamingStrategy, SnakeCase};
