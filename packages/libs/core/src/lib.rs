//! gp-core: 데이터 접근 계층 공통 핵심 라이브러리
//!
//! 이 크레이트는 조건 빌더와 CRUD 디스패처가 공유하는 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `record`: 레코드 메타데이터, 컬럼명/PK 해석, Row 변환
//! - `config`: 배치 크기, 기본 PK 이름 등 프로세스 설정
//! - `error`: 공통 에러 타입

pub mod config;
pub mod error;
pub mod record;

pub use config::Config;
pub use error::{Error, Result};
