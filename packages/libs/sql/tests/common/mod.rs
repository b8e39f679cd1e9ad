//! 통합 테스트 공용 헬퍼

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use gp_sql::record::Row;
use gp_sql::statement::{InsertRows, Statement};
use gp_sql::{Error, Executor, Handle, Record, Result};

/// 테스트 로그 출력 (`RUST_LOG`로 제어, 여러 번 호출해도 안전)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Record, Serialize, Deserialize)]
#[record(table = "users")]
pub struct User {
    #[record(primary_key)]
    pub id: i64,
    pub user_name: String,
    pub age: i64,
    pub email: Option<String>,
}

impl User {
    pub fn new(name: &str, age: i64) -> Self {
        Self {
            id: 0,
            user_name: name.to_string(),
            age,
            email: None,
        }
    }
}

/// executor가 받은 호출
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert(InsertRows),
    Select(Statement),
    Count(Statement),
    Update(Statement, Vec<(String, Value)>),
    Delete(Statement),
}

/// 호출을 기록하고 고정된 결과를 돌려주는 executor
#[derive(Default)]
pub struct RecordingExecutor {
    pub calls: Mutex<Vec<Call>>,
    pub rows: Mutex<Vec<Row>>,
    pub total: u64,
    pub fail_count: bool,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_count() -> Arc<Self> {
        Arc::new(Self {
            fail_count: true,
            ..Default::default()
        })
    }

    pub fn with_rows(rows: Vec<Row>, total: u64) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            total,
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

pub fn handle(exec: &Arc<RecordingExecutor>) -> Handle {
    exec.clone()
}

impl Executor for RecordingExecutor {
    fn insert(&self, rows: &InsertRows) -> Result<u64> {
        self.calls.lock().push(Call::Insert(rows.clone()));
        Ok(rows.len() as u64)
    }

    fn select(&self, stmt: &Statement) -> Result<Vec<Row>> {
        self.calls.lock().push(Call::Select(stmt.clone()));
        Ok(self.rows.lock().clone())
    }

    fn count(&self, stmt: &Statement) -> Result<u64> {
        self.calls.lock().push(Call::Count(stmt.clone()));
        if self.fail_count {
            return Err(Error::executor(std::io::Error::new(
                std::io::ErrorKind::Other,
                "count failed",
            )));
        }
        Ok(self.total)
    }

    fn update(&self, stmt: &Statement, values: &[(String, Value)]) -> Result<u64> {
        self.calls
            .lock()
            .push(Call::Update(stmt.clone(), values.to_vec()));
        Ok(1)
    }

    fn delete(&self, stmt: &Statement) -> Result<u64> {
        self.calls.lock().push(Call::Delete(stmt.clone()));
        Ok(stmt.args.len() as u64)
    }
}
