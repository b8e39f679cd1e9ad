//! 조건 빌더
//!
//! 레코드 타입 하나에 대한 WHERE / HAVING / ORDER / GROUP 상태를 누적하고,
//! `build_condition()`으로 하나의 조건 텍스트와 인자 목록으로 컴파일합니다.
//!
//! # 컴파일 순서
//!
//! 1. 루트 조각 (기본 AND 연결)
//! 2. AND 그룹: `AND (...)`, 인자는 루트 인자 뒤
//! 3. OR 그룹: `OR (...)`, 인자는 마지막
//! 4. 동등 조건 맵: 컬럼명 해석 후 AND 연결. 앞선 조건에 최상위 OR가 있으면
//!    앞부분 전체를 괄호로 묶은 뒤 연결합니다.
//!
//! # 예시
//!
//! ```
//! use gp_sql::{Conditions, Query, Record};
//!
//! #[derive(Record)]
//! struct Member {
//!     #[record(primary_key)]
//!     id: i64,
//!     status: i64,
//! }
//!
//! let query = Query::<Member>::new()
//!     .eq("status", 1)
//!     .and_bracket(|g| g.eq("city", "NY").eq("zip", "10001"))
//!     .or_bracket(|g| g.eq("vip", true));
//!
//! let condition = query.build_condition();
//! assert_eq!(condition.predicate, "status = ? AND (city = ? AND zip = ?) OR (vip = ?)");
//! assert_eq!(condition.args.len(), 4);
//! ```

mod clause;
mod operator;

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use gp_core::record::{Columns, Descriptor, Record};

pub use clause::{Clause, Condition, Conditions, Connector, Group};
pub use operator::{Operator, SortOrder};

/// 레코드 타입 `T`에 대한 조건 빌더
pub struct Query<T> {
    root: Clause,
    and_group: Option<Clause>,
    or_group: Option<Clause>,
    condition_map: BTreeMap<String, Value>,
    order: Vec<(String, SortOrder)>,
    group: Vec<String>,
    having: Clause,
    select: Vec<String>,
    distinct: Vec<String>,
    omit: Vec<String>,
    update_map: BTreeMap<String, Value>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            root: Clause::default(),
            and_group: None,
            or_group: None,
            condition_map: BTreeMap::new(),
            order: Vec::new(),
            group: Vec::new(),
            having: Clause::default(),
            select: Vec::new(),
            distinct: Vec::new(),
            omit: Vec::new(),
            update_map: BTreeMap::new(),
            _record: PhantomData,
        }
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            and_group: self.and_group.clone(),
            or_group: self.or_group.clone(),
            condition_map: self.condition_map.clone(),
            order: self.order.clone(),
            group: self.group.clone(),
            having: self.having.clone(),
            select: self.select.clone(),
            distinct: self.distinct.clone(),
            omit: self.omit.clone(),
            update_map: self.update_map.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("root", &self.root)
            .field("and_group", &self.and_group)
            .field("or_group", &self.or_group)
            .field("condition_map", &self.condition_map)
            .field("order", &self.order)
            .field("group", &self.group)
            .field("having", &self.having)
            .field("select", &self.select)
            .field("distinct", &self.distinct)
            .field("omit", &self.omit)
            .field("update_map", &self.update_map)
            .finish()
    }
}

impl<T> Conditions for Query<T> {
    fn clause_mut(&mut self) -> &mut Clause {
        &mut self.root
    }
}

fn owned<I, S>(columns: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    columns.into_iter().map(|c| c.as_ref().to_string())
}

impl<T> Query<T> {
    /// 빈 조건 빌더
    pub fn new() -> Self {
        Self::default()
    }

    /// AND 그룹 설정: `... AND (<group>)`
    ///
    /// 그룹은 하나만 유지되며, 다시 호출하면 이전 그룹을 대체합니다.
    pub fn and_bracket<F>(mut self, build: F) -> Self
    where
        F: FnOnce(Group) -> Group,
    {
        self.and_group = Some(build(Group::new()).into_clause());
        self
    }

    /// OR 그룹 설정: `... OR (<group>)`
    ///
    /// 그룹은 하나만 유지되며, 다시 호출하면 이전 그룹을 대체합니다.
    pub fn or_bracket<F>(mut self, build: F) -> Self
    where
        F: FnOnce(Group) -> Group,
    {
        self.or_group = Some(build(Group::new()).into_clause());
        self
    }

    /// 필드 이름 → 값 동등 조건 (컴파일 시 컬럼명 해석)
    pub fn condition_eq<I, K, V>(mut self, map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.condition_map
            .extend(map.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn condition_eq_one(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition_map.insert(field.into(), value.into());
        self
    }

    pub fn order_by_asc<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order.extend(owned(columns).map(|c| (c, SortOrder::Asc)));
        self
    }

    pub fn order_by_desc<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order.extend(owned(columns).map(|c| (c, SortOrder::Desc)));
        self
    }

    pub fn group<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.group.extend(owned(columns));
        self
    }

    /// HAVING 조각 추가 (`predicate`의 `?` 개수와 `args` 개수가 같아야 합니다)
    pub fn having<I, V>(mut self, predicate: impl AsRef<str>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let predicate = predicate.as_ref();
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        let placeholders = predicate.matches('?').count();
        if placeholders != args.len() {
            tracing::warn!(
                predicate,
                placeholders,
                args = args.len(),
                "having placeholder count does not match argument count"
            );
        }
        self.having.push(predicate, args);
        self
    }

    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select.extend(owned(columns));
        self
    }

    pub fn distinct<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.distinct.extend(owned(columns));
        self
    }

    pub fn omit<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.omit.extend(owned(columns));
        self
    }

    /// UPDATE 값 설정 (`dao::update` 전용)
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.update_map.insert(field.into(), value.into());
        self
    }

    pub fn order(&self) -> &[(String, SortOrder)] {
        &self.order
    }

    pub fn groups(&self) -> &[String] {
        &self.group
    }

    pub fn selects(&self) -> &[String] {
        &self.select
    }

    pub fn distincts(&self) -> &[String] {
        &self.distinct
    }

    pub fn omits(&self) -> &[String] {
        &self.omit
    }

    pub fn condition_map(&self) -> &BTreeMap<String, Value> {
        &self.condition_map
    }

    pub fn update_map(&self) -> &BTreeMap<String, Value> {
        &self.update_map
    }

    /// HAVING 조건
    pub fn having_condition(&self) -> Condition {
        self.having.clone().into_condition()
    }
}

impl<T: Columns> Query<T> {
    /// 빈 조건 빌더와 컬럼명 프록시
    pub fn with_columns() -> (Self, T::Proxy) {
        (Self::new(), T::columns())
    }
}

impl<T: Record> Query<T> {
    /// WHERE 조건 컴파일
    ///
    /// 빌더 상태를 바꾸지 않으므로 여러 번 호출해도 같은 결과를 냅니다.
    pub fn build_condition(&self) -> Condition {
        let descriptor = Descriptor::of::<T>();
        self.build_condition_with(&descriptor)
    }

    pub(crate) fn build_condition_with(&self, descriptor: &Descriptor) -> Condition {
        let mut out = Clause::default();
        out.append(&self.root);

        if let Some(group) = &self.and_group {
            out.push_group(Connector::And, group);
        }
        if let Some(group) = &self.or_group {
            out.push_group(Connector::Or, group);
        }

        if !self.condition_map.is_empty() && out.has_or() {
            out.enclose();
        }

        for (field, value) in &self.condition_map {
            let column = descriptor.column(field);
            match value {
                Value::Null => out.null_check(&column, Operator::IsNull),
                value => out.compare(&column, Operator::Eq, value.clone()),
            }
        }

        out.into_condition()
    }
}
