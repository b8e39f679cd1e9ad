//! 전역 실행 컨텍스트
//!
//! 프로세스 전체에서 하나의 기본 executor 핸들을 보관합니다.
//! 한 번만 설정할 수 있고, 이후에는 읽기만 합니다.

use once_cell::sync::OnceCell;

use gp_core::config::{self, Config};
use gp_core::{Error, Result};

use crate::executor::Handle;

static DEFAULT_HANDLE: OnceCell<Handle> = OnceCell::new();

/// 기본 executor 등록 (설정은 환경변수에서 로드)
pub fn init(handle: Handle) -> Result<()> {
    init_with(handle, Config::from_env())
}

/// 기본 executor와 설정 등록
///
/// 두 번째 호출은 `Error::AlreadyInitialized`를 반환하며, 기존 핸들과 설정은 그대로입니다.
pub fn init_with(handle: Handle, config: Config) -> Result<()> {
    if DEFAULT_HANDLE.set(handle).is_err() {
        tracing::warn!("default executor already initialized, ignoring init");
        return Err(Error::AlreadyInitialized);
    }

    let batch_size = config.batch_size;
    let page_size = config.page_size;
    let primary_key = config.primary_key.clone();
    if !config::install(config) {
        tracing::debug!("configuration already installed, keeping existing values");
    }

    tracing::info!(
        batch_size,
        page_size,
        primary_key = %primary_key,
        "data access layer initialized"
    );
    Ok(())
}

/// 기본 executor 핸들
pub fn default_handle() -> Result<Handle> {
    DEFAULT_HANDLE.get().cloned().ok_or(Error::NotInitialized)
}

pub fn is_initialized() -> bool {
    DEFAULT_HANDLE.get().is_some()
}
