//! SQLite Executor
//!
//! `rusqlite` 연결 하나를 감싸는 참조 구현입니다. 문장은 SeaQuery로
//! 렌더링한 뒤 위치 인자로 바인딩해 실행합니다.
//!
//! 트랜잭션 핸들은 같은 연결을 공유하므로, `begin` 이후 `commit` / `rollback`
//! 전까지는 원래 핸들로 실행한 문장도 같은 트랜잭션에 포함됩니다.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use sea_query::{QueryStatementWriter, SqliteQueryBuilder, Values};
use serde_json::{Number, Value};

use gp_core::record::Row;
use gp_core::{Error, Result};

use crate::executor::{Executor, Handle, TxBehavior, TxOptions};
use crate::statement::{InsertRows, Statement};

/// SQLite Executor
#[derive(Clone)]
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
    in_tx: bool,
}

impl SqliteExecutor {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(Error::executor)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::executor)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            in_tx: false,
        }
    }

    pub fn into_handle(self) -> Handle {
        Arc::new(self)
    }

    /// 스키마 준비용 SQL 일괄 실행
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.lock().execute_batch(sql).map_err(Error::executor)
    }

    fn execute(&self, sql: &str, values: Values) -> Result<u64> {
        tracing::trace!(sql, "sqlite execute");
        let conn = self.conn.lock();
        let changed = conn
            .execute(sql, params_from_iter(bind(values)))
            .map_err(Error::executor)?;
        Ok(changed as u64)
    }

    fn query(&self, sql: &str, values: Values) -> Result<Vec<Row>> {
        tracing::trace!(sql, "sqlite query");
        let conn = self.conn.lock();
        query_rows(&conn, sql, values).map_err(Error::executor)
    }
}

impl Executor for SqliteExecutor {
    fn insert(&self, rows: &InsertRows) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let (sql, values) = rows.to_insert()?.build(SqliteQueryBuilder);
        self.execute(&sql, values)
    }

    fn select(&self, stmt: &Statement) -> Result<Vec<Row>> {
        let (sql, values) = stmt.to_select().build(SqliteQueryBuilder);
        self.query(&sql, values)
    }

    fn count(&self, stmt: &Statement) -> Result<u64> {
        let (sql, values) = stmt.to_count().build(SqliteQueryBuilder);
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(&sql, params_from_iter(bind(values)), |row| row.get(0))
            .map_err(Error::executor)?;
        Ok(count.max(0) as u64)
    }

    fn update(&self, stmt: &Statement, values: &[(String, Value)]) -> Result<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let (sql, values) = stmt.to_update(values).build(SqliteQueryBuilder);
        self.execute(&sql, values)
    }

    fn delete(&self, stmt: &Statement) -> Result<u64> {
        let (sql, values) = stmt.to_delete().build(SqliteQueryBuilder);
        self.execute(&sql, values)
    }

    fn begin(&self, opts: &TxOptions) -> Result<Handle> {
        if self.in_tx {
            return Err(Error::unsupported("nested transaction"));
        }

        let sql = match opts.behavior {
            TxBehavior::Deferred => "BEGIN DEFERRED",
            TxBehavior::Immediate => "BEGIN IMMEDIATE",
            TxBehavior::Exclusive => "BEGIN EXCLUSIVE",
        };
        self.execute_batch(sql)?;
        tracing::debug!(behavior = ?opts.behavior, "sqlite transaction started");

        Ok(Arc::new(Self {
            conn: Arc::clone(&self.conn),
            in_tx: true,
        }))
    }

    fn commit(&self) -> Result<()> {
        if !self.in_tx {
            return Err(Error::unsupported("commit outside of a transaction"));
        }
        self.execute_batch("COMMIT")?;
        tracing::debug!("sqlite transaction committed");
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        if !self.in_tx {
            return Err(Error::unsupported("rollback outside of a transaction"));
        }
        self.execute_batch("ROLLBACK")?;
        tracing::debug!("sqlite transaction rolled back");
        Ok(())
    }
}

fn query_rows(conn: &Connection, sql: &str, values: Values) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params_from_iter(bind(values)))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (i, name) in names.iter().enumerate() {
            record.insert(name.clone(), from_sql(row.get_ref(i)?));
        }
        out.push(record);
    }
    Ok(out)
}

/// SeaQuery 값 → rusqlite 값
fn bind(values: Values) -> Vec<SqlValue> {
    values
        .0
        .into_iter()
        .map(|value| match value {
            sea_query::Value::Bool(Some(b)) => SqlValue::Integer(b as i64),
            sea_query::Value::TinyInt(Some(i)) => SqlValue::Integer(i as i64),
            sea_query::Value::SmallInt(Some(i)) => SqlValue::Integer(i as i64),
            sea_query::Value::Int(Some(i)) => SqlValue::Integer(i as i64),
            sea_query::Value::BigInt(Some(i)) => SqlValue::Integer(i),
            sea_query::Value::TinyUnsigned(Some(u)) => SqlValue::Integer(u as i64),
            sea_query::Value::SmallUnsigned(Some(u)) => SqlValue::Integer(u as i64),
            sea_query::Value::Unsigned(Some(u)) => SqlValue::Integer(u as i64),
            sea_query::Value::BigUnsigned(Some(u)) => match i64::try_from(u) {
                Ok(i) => SqlValue::Integer(i),
                Err(_) => SqlValue::Real(u as f64),
            },
            sea_query::Value::Float(Some(f)) => SqlValue::Real(f as f64),
            sea_query::Value::Double(Some(f)) => SqlValue::Real(f),
            sea_query::Value::String(Some(s)) => SqlValue::Text(s.to_string()),
            sea_query::Value::Char(Some(c)) => SqlValue::Text(c.to_string()),
            sea_query::Value::Bytes(Some(b)) => SqlValue::Blob(b.to_vec()),
            _ => SqlValue::Null,
        })
        .collect()
}

/// SQLite 셀 → JSON 값
fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn executor() -> SqliteExecutor {
        let exec = SqliteExecutor::open_in_memory().unwrap();
        exec.execute_batch(
            "CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL, score REAL);",
        )
        .unwrap();
        exec
    }

    fn insert(exec: &SqliteExecutor, titles: &[&str]) {
        let rows = InsertRows {
            table: "notes".into(),
            columns: vec!["title".into(), "score".into()],
            rows: titles.iter().map(|t| vec![json!(t), json!(1.5)]).collect(),
        };
        assert_eq!(exec.insert(&rows).unwrap(), titles.len() as u64);
    }

    #[test]
    fn test_insert_select_count() {
        let exec = executor();
        insert(&exec, &["a", "b", "c"]);

        let mut stmt = Statement::new("notes");
        stmt.predicate = "title <> ?".into();
        stmt.args = vec![json!("b")];
        assert_eq!(exec.count(&stmt).unwrap(), 2);

        let rows = exec.select(&stmt).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some(&json!("a")));
        assert_eq!(rows[0].get("score"), Some(&json!(1.5)));
        assert_eq!(rows[0].get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_update_and_delete() {
        let exec = executor();
        insert(&exec, &["a", "b"]);

        let mut stmt = Statement::new("notes");
        stmt.predicate = "id = ?".into();
        stmt.args = vec![json!(2)];
        assert_eq!(exec.update(&stmt, &[("title".into(), json!("z"))]).unwrap(), 1);
        assert_eq!(exec.delete(&stmt).unwrap(), 1);
        assert_eq!(exec.count(&Statement::new("notes")).unwrap(), 1);
    }

    #[test]
    fn test_transaction_rollback() {
        let exec = executor();
        let tx = exec.begin(&TxOptions::default()).unwrap();
        insert_via(&tx);
        tx.rollback().unwrap();
        assert_eq!(exec.count(&Statement::new("notes")).unwrap(), 0);

        let tx = exec.begin(&TxOptions::default()).unwrap();
        insert_via(&tx);
        tx.commit().unwrap();
        assert_eq!(exec.count(&Statement::new("notes")).unwrap(), 1);
    }

    #[test]
    fn test_nested_begin_is_unsupported() {
        let exec = executor();
        let tx = exec.begin(&TxOptions::default()).unwrap();
        let err = tx.begin(&TxOptions::default()).err().unwrap();
        assert_eq!(err.code(), "UNSUPPORTED");
        tx.rollback().unwrap();

        assert!(exec.commit().is_err());
    }

    #[test]
    fn test_engine_error_is_forwarded() {
        let exec = executor();
        let err = exec.select(&Statement::new("missing")).unwrap_err();
        assert_eq!(err.code(), "EXECUTOR_ERROR");
    }

    fn insert_via(handle: &Handle) {
        let rows = InsertRows {
            table: "notes".into(),
            columns: vec!["title".into()],
            rows: vec![vec![json!("tx")]],
        };
        handle.insert(&rows).unwrap();
    }
}
