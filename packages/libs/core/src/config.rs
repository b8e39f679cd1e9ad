//! 데이터 접근 계층 설정

use std::env;

use once_cell::sync::{Lazy, OnceCell};

/// 배치 INSERT 기본 청크 크기
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// PK가 선언되지 않은 레코드의 기본 PK 컬럼명
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// 페이지 크기 기본값
pub const DEFAULT_PAGE_SIZE: i64 = 10;

static INSTALLED: OnceCell<Config> = OnceCell::new();
static FALLBACK: Lazy<Config> = Lazy::new(Config::default);

/// 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// insert_batch 청크 크기
    pub batch_size: usize,

    /// PK 미선언 시 사용할 컬럼명
    pub primary_key: String,

    /// 페이지 크기 기본값 (size <= 0 인 경우)
    pub page_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// 값이 없거나 파싱할 수 없으면 기본값을 사용합니다.
    pub fn from_env() -> Self {
        Self {
            batch_size: env::var("GP_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_BATCH_SIZE),

            primary_key: env::var("GP_PRIMARY_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string()),

            page_size: env::var("GP_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// 프로세스 전역 설정 등록
///
/// 한 번만 등록됩니다. 이미 등록되어 있으면 `false`를 반환하고 기존 값을 유지합니다.
pub fn install(config: Config) -> bool {
    INSTALLED.set(config).is_ok()
}

/// 현재 설정 (등록 전에는 기본값)
pub fn current() -> &'static Config {
    INSTALLED.get().unwrap_or(&FALLBACK)
}
