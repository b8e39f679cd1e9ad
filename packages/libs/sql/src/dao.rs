//! CRUD Dispatcher
//!
//! 레코드 타입 `T`에 대한 제네릭 연산 모음입니다. 각 연산은
//!
//! 1. 핸들을 결정하고 (`Options`의 지정 핸들, 없으면 전역 기본값)
//! 2. `Query<T>`를 컴파일해 `Statement` 힌트를 채운 뒤
//! 3. executor에 위임하고 결과를 레코드 / 목록 / Row / 페이지로 변환합니다.
//!
//! executor가 돌려준 에러는 해석하지 않고 그대로 전달합니다.
//!
//! # 예시
//!
//! ```
//! use gp_sql::prelude::*;
//! use gp_sql::{dao, SqliteExecutor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Record, Serialize, Deserialize)]
//! struct Task {
//!     #[record(primary_key)]
//!     id: i64,
//!     title: String,
//!     priority: i64,
//! }
//!
//! let exec = SqliteExecutor::open_in_memory().unwrap();
//! exec.execute_batch("CREATE TABLE task (id INTEGER PRIMARY KEY, title TEXT, priority INTEGER)")
//!     .unwrap();
//! let opts = Options::new().db(exec.into_handle());
//!
//! let task = Task { id: 0, title: "write docs".into(), priority: 2 };
//! dao::insert(&task, &opts).unwrap();
//!
//! let found: Task = dao::select_one(&Query::new().eq("title", "write docs"), &opts).unwrap();
//! assert_eq!(found.id, 1);
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use gp_core::config;
use gp_core::record::{decode_row, encode_record, is_zero, Descriptor, Record, Row};
use gp_core::{Error, Result};

use crate::chunk::chunk;
use crate::executor::{Handle, TxOptions};
use crate::options::Options;
use crate::page::{offset_limit_with, Page};
use crate::query::{Conditions, Query, SortOrder};
use crate::statement::{InsertRows, Statement};

// ─────────────────────────────────────────────────────────────────────────────
// Statement assembly
// ─────────────────────────────────────────────────────────────────────────────

fn resolve_all<'a>(
    descriptor: &'a Descriptor,
    names: &'a [String],
) -> impl Iterator<Item = String> + 'a {
    names.iter().map(move |name| descriptor.column(name))
}

/// 쿼리와 옵션으로 문장 힌트 구성
fn statement<T: Record>(query: &Query<T>, descriptor: &Descriptor, opts: &Options) -> Statement {
    let condition = query.build_condition_with(descriptor);
    let having = query.having_condition();

    let mut stmt = Statement::new(descriptor.table());
    stmt.columns = descriptor.columns().map(String::from).collect();
    stmt.predicate = condition.predicate;
    stmt.args = condition.args;
    stmt.selects = resolve_all(descriptor, query.selects())
        .chain(resolve_all(descriptor, opts.selects()))
        .collect();
    stmt.distinct = resolve_all(descriptor, query.distincts()).collect();
    stmt.omits = resolve_all(descriptor, query.omits())
        .chain(resolve_all(descriptor, opts.omits()))
        .collect();
    stmt.order = query
        .order()
        .iter()
        .map(|(column, order)| (descriptor.column(column), *order))
        .collect();
    stmt.group = resolve_all(descriptor, query.groups()).collect();
    stmt.having = having.predicate;
    stmt.having_args = having.args;
    stmt
}

/// PK 조건만 가진 문장 힌트
fn statement_by_key<T: Record>(
    descriptor: &Descriptor,
    opts: &Options,
    build: impl FnOnce(Query<T>, &str) -> Query<T>,
) -> Statement {
    let primary_key = descriptor.primary_key();
    let query = build(Query::new(), &primary_key);
    statement(&query, descriptor, opts)
}

/// 옵션의 select / omit에 따라 쓰기 대상 컬럼인지
fn writable(column: &str, opts: &Options, descriptor: &Descriptor) -> bool {
    let selected = opts.selects().is_empty()
        || opts.selects().iter().any(|s| descriptor.column(s) == column);
    let omitted = opts.omits().iter().any(|o| descriptor.column(o) == column);
    selected && !omitted
}

fn log_dispatch(operation: &'static str, stmt: &Statement) {
    tracing::debug!(
        operation,
        table = %stmt.table,
        predicate = %stmt.predicate,
        args = stmt.args.len(),
        "dispatching statement"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Insert
// ─────────────────────────────────────────────────────────────────────────────

/// 레코드 묶음 → INSERT 대상 row
///
/// 모든 레코드의 PK 값이 zero value이면 PK 컬럼을 빼서 엔진이 값을 정하게 합니다.
fn insert_rows<T: Record + Serialize>(
    records: &[T],
    descriptor: &Descriptor,
    opts: &Options,
) -> Result<InsertRows> {
    let encoded = records
        .iter()
        .map(|record| encode_record(record, descriptor))
        .collect::<Result<Vec<_>>>()?;

    let primary_key = descriptor.primary_key();
    let skip_key = encoded.iter().all(|row| {
        row.iter()
            .find(|(column, _)| *column == primary_key)
            .map_or(true, |(_, value)| is_zero(value))
    });

    let keep: Vec<bool> = descriptor
        .columns()
        .map(|column| {
            writable(column, opts, descriptor) && !(skip_key && column == primary_key)
        })
        .collect();

    let columns = descriptor
        .columns()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(column, _)| column.to_string())
        .collect();

    let rows = encoded
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keep)
                .filter(|(_, keep)| **keep)
                .map(|((_, value), _)| value)
                .collect::<Vec<Value>>()
        })
        .collect();

    Ok(InsertRows {
        table: descriptor.table().to_string(),
        columns,
        rows,
    })
}

/// 레코드 하나 INSERT
pub fn insert<T>(record: &T, opts: &Options) -> Result<u64>
where
    T: Record + Serialize,
{
    insert_batch_size(std::slice::from_ref(record), 1, opts)
}

/// 설정된 배치 크기로 여러 레코드 INSERT
pub fn insert_batch<T>(records: &[T], opts: &Options) -> Result<u64>
where
    T: Record + Serialize,
{
    insert_batch_size(records, config::current().batch_size, opts)
}

/// 지정한 배치 크기로 여러 레코드 INSERT
///
/// 청크마다 executor를 한 번 호출합니다. 청크 사이의 원자성은 보장하지 않습니다.
/// 빈 입력은 executor를 호출하지 않고 `Ok(0)`을 반환합니다.
pub fn insert_batch_size<T>(records: &[T], size: usize, opts: &Options) -> Result<u64>
where
    T: Record + Serialize,
{
    if records.is_empty() {
        return Ok(0);
    }

    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();

    let mut affected = 0;
    for batch in chunk(records, size) {
        let rows = insert_rows(batch, &descriptor, opts)?;
        tracing::debug!(
            operation = "insert",
            table = %rows.table,
            rows = rows.len(),
            "dispatching statement"
        );
        affected += db.insert(&rows)?;
    }
    Ok(affected)
}

// ─────────────────────────────────────────────────────────────────────────────
// Delete
// ─────────────────────────────────────────────────────────────────────────────

fn dispatch_delete(db: &Handle, stmt: &Statement) -> Result<u64> {
    if !stmt.has_predicate() {
        return Err(Error::MissingWhereClause { operation: "delete" });
    }
    log_dispatch("delete", stmt);
    db.delete(stmt)
}

/// PK로 삭제
pub fn delete_by_id<T: Record>(id: impl Into<Value>, opts: &Options) -> Result<u64> {
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    let id = id.into();
    let stmt = statement_by_key::<T>(&descriptor, opts, |q, pk| q.eq(pk, id));
    dispatch_delete(&db, &stmt)
}

/// PK 목록으로 삭제: `<pk> IN (?,...)`
pub fn delete_by_ids<T: Record>(
    ids: impl IntoIterator<Item = impl Into<Value>>,
    opts: &Options,
) -> Result<u64> {
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    let stmt = statement_by_key::<T>(&descriptor, opts, |q, pk| q.in_(pk, ids));
    dispatch_delete(&db, &stmt)
}

/// 조건으로 삭제 (조건이 비어 있으면 `MissingWhereClause`)
pub fn delete<T: Record>(query: &Query<T>, opts: &Options) -> Result<u64> {
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    dispatch_delete(&db, &statement(query, &descriptor, opts))
}

/// 필드 이름 → 값 동등 조건으로 삭제
pub fn delete_by_map<T: Record>(
    map: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    opts: &Options,
) -> Result<u64> {
    delete(&Query::<T>::new().condition_eq(map), opts)
}

// ─────────────────────────────────────────────────────────────────────────────
// Update
// ─────────────────────────────────────────────────────────────────────────────

fn dispatch_update(db: &Handle, stmt: &Statement, values: &[(String, Value)]) -> Result<u64> {
    if !stmt.has_predicate() {
        return Err(Error::MissingWhereClause { operation: "update" });
    }
    if values.is_empty() {
        tracing::debug!(table = %stmt.table, "nothing to update");
        return Ok(0);
    }
    log_dispatch("update", stmt);
    db.update(stmt, values)
}

/// PK로 레코드 갱신
///
/// zero value가 아닌 필드만 갱신합니다. PK 값이 zero value이면 `MissingPrimaryKey`.
pub fn update_by_id<T>(record: &T, opts: &Options) -> Result<u64>
where
    T: Record + Serialize,
{
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    let primary_key = descriptor.primary_key();

    let mut key = None;
    let mut values = Vec::new();
    for (column, value) in encode_record(record, &descriptor)? {
        if column == primary_key {
            key = Some(value);
        } else if !is_zero(&value) && writable(&column, opts, &descriptor) {
            values.push((column, value));
        }
    }

    let key = match key {
        Some(key) if !is_zero(&key) => key,
        _ => return Err(Error::MissingPrimaryKey { column: primary_key }),
    };

    let stmt = statement_by_key::<T>(&descriptor, opts, |q, pk| q.eq(pk, key));
    dispatch_update(&db, &stmt, &values)
}

/// 조건에 맞는 row를 `Query::set`으로 지정한 값으로 갱신
pub fn update<T: Record>(query: &Query<T>, opts: &Options) -> Result<u64> {
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    let values: Vec<(String, Value)> = query
        .update_map()
        .iter()
        .map(|(field, value)| (descriptor.column(field), value.clone()))
        .collect();
    dispatch_update(&db, &statement(query, &descriptor, opts), &values)
}

// ─────────────────────────────────────────────────────────────────────────────
// Select
// ─────────────────────────────────────────────────────────────────────────────

fn fetch(db: &Handle, operation: &'static str, stmt: &Statement) -> Result<Vec<Row>> {
    log_dispatch(operation, stmt);
    db.select(stmt)
}

fn decode_all<R: DeserializeOwned>(rows: Vec<Row>, descriptor: &Descriptor) -> Result<Vec<R>> {
    rows.into_iter().map(|row| decode_row(row, descriptor)).collect()
}

/// 첫 번째 row (없으면 `NotFound`)
///
/// 정렬과 GROUP BY가 없으면 PK 오름차순으로 정렬합니다.
fn fetch_first<T: Record>(query: &Query<T>, descriptor: &Descriptor, opts: &Options) -> Result<Row> {
    let db = opts.handle()?;
    let mut stmt = statement(query, descriptor, opts);
    if stmt.order.is_empty() && stmt.group.is_empty() {
        stmt.order.push((descriptor.primary_key(), SortOrder::Asc));
    }
    stmt.limit = Some(1);

    fetch(&db, "select_one", &stmt)?
        .into_iter()
        .next()
        .ok_or(Error::NotFound)
}

/// PK로 레코드 하나 조회
pub fn select_by_id<T>(id: impl Into<Value>, opts: &Options) -> Result<T>
where
    T: Record + DeserializeOwned,
{
    let descriptor = Descriptor::of::<T>();
    let primary_key = descriptor.primary_key();
    let query = Query::<T>::new().eq(&primary_key, id);
    let row = fetch_first(&query, &descriptor, opts)?;
    decode_row(row, &descriptor)
}

/// PK 목록으로 레코드 조회
pub fn select_by_ids<T>(
    ids: impl IntoIterator<Item = impl Into<Value>>,
    opts: &Options,
) -> Result<Vec<T>>
where
    T: Record + DeserializeOwned,
{
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    let stmt = statement_by_key::<T>(&descriptor, opts, |q, pk| q.in_(pk, ids));
    decode_all(fetch(&db, "select_by_ids", &stmt)?, &descriptor)
}

/// 조건에 맞는 첫 번째 레코드 (없으면 `NotFound`)
pub fn select_one<T>(query: &Query<T>, opts: &Options) -> Result<T>
where
    T: Record + DeserializeOwned,
{
    let descriptor = Descriptor::of::<T>();
    let row = fetch_first(query, &descriptor, opts)?;
    decode_row(row, &descriptor)
}

/// 조건에 맞는 레코드 존재 여부
///
/// `select_one`과 같은 조회를 수행하며, 결과 없음은 에러가 아니라 `false`입니다.
pub fn exists<T: Record>(query: &Query<T>, opts: &Options) -> Result<bool> {
    let descriptor = Descriptor::of::<T>();
    match fetch_first(query, &descriptor, opts) {
        Ok(_) => Ok(true),
        Err(Error::NotFound) => Ok(false),
        Err(e) => Err(e),
    }
}

/// 조건에 맞는 레코드 목록
pub fn select_list<T>(query: &Query<T>, opts: &Options) -> Result<Vec<T>>
where
    T: Record + DeserializeOwned,
{
    select_list_model::<T, T>(query, opts)
}

/// 조건에 맞는 row를 다른 모델 `R`로 변환한 목록
///
/// 컬럼명은 `T`의 필드 이름으로 바뀐 뒤 `R`로 역직렬화됩니다.
pub fn select_list_model<T, R>(query: &Query<T>, opts: &Options) -> Result<Vec<R>>
where
    T: Record,
    R: DeserializeOwned,
{
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    let stmt = statement(query, &descriptor, opts);
    decode_all(fetch(&db, "select_list", &stmt)?, &descriptor)
}

/// 필드 이름 → 값 동등 조건으로 레코드 목록 조회
pub fn select_list_by_map<T>(
    map: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    opts: &Options,
) -> Result<Vec<T>>
where
    T: Record + DeserializeOwned,
{
    select_list(&Query::<T>::new().condition_eq(map), opts)
}

/// 조건에 맞는 row 목록 (컬럼명 → 값)
pub fn select_list_maps<T: Record>(query: &Query<T>, opts: &Options) -> Result<Vec<Row>> {
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    fetch(&db, "select_list_maps", &statement(query, &descriptor, opts))
}

/// 조건에 맞는 row 수 (정렬/제한 무시)
pub fn select_count<T: Record>(query: &Query<T>, opts: &Options) -> Result<u64> {
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    count(&db, &statement(query, &descriptor, opts))
}

fn count(db: &Handle, stmt: &Statement) -> Result<u64> {
    log_dispatch("count", stmt);
    db.count(stmt)
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// count 후 현재 페이지의 row 조회
///
/// count가 실패하면 페이지를 건드리지 않고 바로 에러를 반환합니다.
fn fetch_page<T, R>(
    page: &mut Page<R>,
    query: &Query<T>,
    opts: &Options,
    decode: impl FnOnce(Vec<Row>, &Descriptor) -> Result<Vec<R>>,
) -> Result<()>
where
    T: Record,
{
    let db = opts.handle()?;
    let descriptor = Descriptor::of::<T>();
    let mut stmt = statement(query, &descriptor, opts);

    page.total = count(&db, &stmt)?;

    let (offset, limit) = offset_limit_with(page.current, page.size, config::current().page_size);
    stmt.offset = Some(offset);
    stmt.limit = Some(limit);

    let rows = fetch(&db, "select_page", &stmt)?;
    page.records = decode(rows, &*descriptor)?;
    Ok(())
}

/// 페이지 조회
pub fn select_page<T>(page: &mut Page<T>, query: &Query<T>, opts: &Options) -> Result<()>
where
    T: Record + DeserializeOwned,
{
    fetch_page(page, query, opts, decode_all)
}

/// 다른 모델 `R`로 변환한 페이지 조회
pub fn select_page_model<T, R>(page: &mut Page<R>, query: &Query<T>, opts: &Options) -> Result<()>
where
    T: Record,
    R: DeserializeOwned,
{
    fetch_page(page, query, opts, decode_all)
}

/// row(컬럼명 → 값) 페이지 조회
pub fn select_page_maps<T: Record>(
    page: &mut Page<Row>,
    query: &Query<T>,
    opts: &Options,
) -> Result<()> {
    fetch_page(page, query, opts, |rows, _| Ok(rows))
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction
// ─────────────────────────────────────────────────────────────────────────────

/// 트랜잭션 핸들 시작 (기본 옵션)
///
/// 반환된 핸들을 `Options::db`로 넘겨 연산을 묶고, 직접 `commit` / `rollback` 합니다.
pub fn begin(opts: &Options) -> Result<Handle> {
    begin_with(opts, &TxOptions::default())
}

pub fn begin_with(opts: &Options, tx: &TxOptions) -> Result<Handle> {
    let db = opts.handle()?;
    tracing::debug!(behavior = ?tx.behavior, "beginning transaction");
    db.begin(tx)
}
