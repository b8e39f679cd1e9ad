//! 레코드 타입별 컬럼 해석 결과
//!
//! `Descriptor`는 타입마다 한 번 만들어져 프로세스 전역 캐시에 보관됩니다.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::field::{Field, Record};
use super::naming::NamingStrategy;
use crate::config;

static CACHE: Lazy<RwLock<HashMap<TypeId, Arc<Descriptor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 레코드 타입의 컬럼 해석 결과
#[derive(Debug, Clone)]
pub struct Descriptor {
    table: &'static str,
    fields: &'static [Field],
    /// fields와 같은 순서의 물리 컬럼명
    columns: Vec<String>,
    by_name: HashMap<&'static str, usize>,
    /// 첫 번째 PK 필드의 위치
    primary_key: Option<usize>,
}

impl Descriptor {
    /// 메타데이터로부터 생성
    pub fn build(table: &'static str, fields: &'static [Field], naming: &dyn NamingStrategy) -> Self {
        let columns: Vec<String> = fields
            .iter()
            .map(|f| match f.column {
                Some(column) => column.to_string(),
                None => naming.column_name(f.name),
            })
            .collect();

        let by_name = fields.iter().enumerate().map(|(i, f)| (f.name, i)).collect();
        let primary_key = fields.iter().position(|f| f.primary_key);

        Self {
            table,
            fields,
            columns,
            by_name,
            primary_key,
        }
    }

    /// 타입별 캐시된 Descriptor
    pub fn of<T: Record>() -> Arc<Descriptor> {
        let key = TypeId::of::<T>();
        if let Some(found) = CACHE.read().get(&key) {
            return Arc::clone(found);
        }

        let mut cache = CACHE.write();
        Arc::clone(
            cache
                .entry(key)
                .or_insert_with(|| Arc::new(Descriptor::build(T::TABLE, T::fields(), T::naming()))),
        )
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// 선언 순서의 (필드, 컬럼) 목록
    pub fn fields(&self) -> impl Iterator<Item = (&'static Field, &str)> + '_ {
        self.fields.iter().zip(self.columns.iter().map(String::as_str))
    }

    /// 선언 순서의 물리 컬럼 목록
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(String::as_str)
    }

    /// 논리 이름 → 물리 컬럼명
    ///
    /// 필드 이름이 아니면 (이미 컬럼명이거나 표현식이면) 그대로 반환합니다.
    pub fn column(&self, logical: &str) -> String {
        match self.by_name.get(logical) {
            Some(&i) => self.columns[i].clone(),
            None => logical.to_string(),
        }
    }

    /// 물리 컬럼명 → 필드 이름
    pub fn field_name(&self, column: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.fields[i].name)
    }

    /// PK 필드 (선언된 경우)
    pub fn primary_key_field(&self) -> Option<&'static Field> {
        self.primary_key.map(|i| &self.fields[i])
    }

    /// PK 컬럼명
    ///
    /// PK로 표시된 필드가 없으면 설정된 기본 PK 이름을 반환합니다.
    pub fn primary_key(&self) -> String {
        match self.primary_key {
            Some(i) => self.columns[i].clone(),
            None => {
                let fallback = &config::current().primary_key;
                tracing::debug!(
                    table = self.table,
                    fallback = %fallback,
                    "no primary key declared, using default"
                );
                fallback.clone()
            }
        }
    }
}

/// 레코드 타입의 논리 이름 → 물리 컬럼명
pub fn resolve_column<T: Record>(logical: &str) -> String {
    Descriptor::of::<T>().column(logical)
}

/// 레코드 타입의 PK 컬럼명
pub fn resolve_primary_key<T: Record>() -> String {
    Descriptor::of::<T>().primary_key()
}
