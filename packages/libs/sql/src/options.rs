//! 호출별 옵션
//!
//! 호출마다 새로 만들어 넘기며, 전역 상태를 바꾸지 않습니다.

use std::fmt;

use gp_core::Result;

use crate::context;
use crate::executor::Handle;

/// 호출별 옵션
#[derive(Clone, Default)]
pub struct Options {
    db: Option<Handle>,
    selects: Vec<String>,
    omits: Vec<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이번 호출에 사용할 executor (전역 기본값 대신)
    pub fn db(mut self, handle: Handle) -> Self {
        self.db = Some(handle);
        self
    }

    /// 읽기/쓰기 대상 필드 제한 (논리 이름)
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selects.extend(fields.into_iter().map(Into::into));
        self
    }

    /// 읽기/쓰기에서 제외할 필드 (논리 이름)
    pub fn omit<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.omits.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn selects(&self) -> &[String] {
        &self.selects
    }

    pub fn omits(&self) -> &[String] {
        &self.omits
    }

    /// 사용할 executor: 지정된 핸들, 없으면 전역 기본 핸들
    pub fn handle(&self) -> Result<Handle> {
        match &self.db {
            Some(handle) => Ok(handle.clone()),
            None => context::default_handle(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("db", &self.db.as_ref().map(|_| "<executor>"))
            .field("selects", &self.selects)
            .field("omits", &self.omits)
            .finish()
    }
}
