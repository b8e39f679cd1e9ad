//! 문장 힌트와 SQL 렌더링
//!
//! `Statement`는 디스패처가 executor에 넘기는 구조 힌트입니다.
//! SQL 기반 executor는 `to_select` / `to_count` / `to_update` / `to_delete`로
//! SeaQuery 문장을 얻어 자신의 백엔드로 빌드합니다.
//!
//! 조건 텍스트의 위치 인자는 `?` placeholder로 표현되며, SeaQuery의
//! `Expr::cust_with_values`가 백엔드별 바인딩으로 바꿉니다.

use sea_query::{
    Asterisk, ConditionalStatement, DeleteStatement, Expr, Iden, InsertStatement, Order, Query,
    SelectStatement, SimpleExpr, UpdateStatement,
};
use serde_json::Value;

use gp_core::{Error, Result};

use crate::query::SortOrder;

/// 동적 테이블/컬럼 식별자
#[derive(Debug, Clone)]
struct DynIden(String);

impl Iden for DynIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = write!(s, "{}", self.0);
    }
}

/// 문장 구조 힌트
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    /// 대상 테이블
    pub table: String,

    /// 레코드의 전체 컬럼 (선언 순서)
    pub columns: Vec<String>,

    /// WHERE 조건 텍스트 (`?` placeholder)
    pub predicate: String,

    /// WHERE 위치 인자
    pub args: Vec<Value>,

    /// SELECT 컬럼 (비어 있으면 전체)
    pub selects: Vec<String>,

    /// SELECT DISTINCT 컬럼
    pub distinct: Vec<String>,

    /// 제외 컬럼
    pub omits: Vec<String>,

    /// 정렬
    pub order: Vec<(String, SortOrder)>,

    /// GROUP BY
    pub group: Vec<String>,

    /// HAVING 조건 텍스트
    pub having: String,

    /// HAVING 위치 인자
    pub having_args: Vec<Value>,

    /// 제한
    pub limit: Option<u64>,

    /// 오프셋
    pub offset: Option<u64>,
}

impl Statement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn has_predicate(&self) -> bool {
        !self.predicate.trim().is_empty()
    }

    /// 실제로 읽을 컬럼 (비어 있으면 `*`)
    ///
    /// `selects`가 있으면 그 목록에서, 없으면 전체 컬럼에서 `omits`를 뺍니다.
    pub fn projection(&self) -> Vec<&str> {
        let keep = |c: &&String| !self.omits.contains(*c);
        if !self.selects.is_empty() {
            self.selects.iter().filter(keep).map(String::as_str).collect()
        } else if !self.omits.is_empty() {
            self.columns.iter().filter(keep).map(String::as_str).collect()
        } else {
            Vec::new()
        }
    }

    fn where_expr(&self) -> SimpleExpr {
        Expr::cust_with_values(self.predicate.clone(), self.args.iter().map(to_sea_value))
    }

    /// SELECT 문장
    pub fn to_select(&self) -> SelectStatement {
        let mut query = Query::select();
        query.from(DynIden(self.table.clone()));

        // SELECT columns
        if !self.distinct.is_empty() {
            query.distinct();
            for column in &self.distinct {
                query.expr(column_expr(column));
            }
        } else {
            let projection = self.projection();
            if projection.is_empty() {
                query.column(Asterisk);
            }
            for column in projection {
                query.expr(column_expr(column));
            }
        }

        // WHERE
        if self.has_predicate() {
            query.and_where(self.where_expr());
        }

        // GROUP BY / HAVING
        if !self.group.is_empty() {
            query.add_group_by(self.group.iter().map(|c| column_expr(c)));
        }
        if !self.having.trim().is_empty() {
            query.and_having(Expr::cust_with_values(
                self.having.clone(),
                self.having_args.iter().map(to_sea_value),
            ));
        }

        // ORDER BY
        for (column, order) in &self.order {
            let order = match order {
                SortOrder::Asc => Order::Asc,
                SortOrder::Desc => Order::Desc,
            };
            query.order_by_expr(column_expr(column), order);
        }

        // LIMIT / OFFSET
        if let Some(limit) = self.limit {
            query.limit(limit);
        }
        if let Some(offset) = self.offset {
            query.offset(offset);
        }

        query
    }

    /// COUNT 문장
    ///
    /// 정렬/제한은 무시합니다. GROUP BY나 DISTINCT가 있으면 하위 쿼리의 row 수를 셉니다.
    pub fn to_count(&self) -> SelectStatement {
        let count = Expr::cust("COUNT(*)".to_string());
        let mut query = Query::select();

        if self.group.is_empty() && self.distinct.is_empty() {
            query
                .expr_as(count, DynIden("count".to_string()))
                .from(DynIden(self.table.clone()));
            if self.has_predicate() {
                query.and_where(self.where_expr());
            }
        } else {
            let mut base = self.clone();
            base.order.clear();
            base.limit = None;
            base.offset = None;
            query
                .expr_as(count, DynIden("count".to_string()))
                .from_subquery(base.to_select(), DynIden("grouped".to_string()));
        }

        query
    }

    /// UPDATE 문장
    pub fn to_update(&self, values: &[(String, Value)]) -> UpdateStatement {
        let mut query = Query::update();
        query.table(DynIden(self.table.clone()));
        query.values(
            values
                .iter()
                .map(|(column, value)| (DynIden(column.clone()), value_to_expr(value))),
        );
        if self.has_predicate() {
            query.and_where(self.where_expr());
        }
        query
    }

    /// DELETE 문장
    pub fn to_delete(&self) -> DeleteStatement {
        let mut query = Query::delete();
        query.from_table(DynIden(self.table.clone()));
        if self.has_predicate() {
            query.and_where(self.where_expr());
        }
        query
    }
}

/// INSERT 대상 row 묶음 (배치 하나)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertRows {
    pub table: String,
    pub columns: Vec<String>,
    /// `columns`와 같은 순서의 값
    pub rows: Vec<Vec<Value>>,
}

impl InsertRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// INSERT 문장
    pub fn to_insert(&self) -> Result<InsertStatement> {
        if self.columns.is_empty() {
            return Err(Error::Statement {
                message: format!("no columns to insert into '{}'", self.table),
            });
        }

        let mut query = Query::insert();
        query
            .into_table(DynIden(self.table.clone()))
            .columns(self.columns.iter().map(|c| DynIden(c.clone())));

        for row in &self.rows {
            query
                .values(row.iter().map(value_to_expr))
                .map_err(|e| Error::Statement {
                    message: e.to_string(),
                })?;
        }

        Ok(query)
    }
}

/// 단순 식별자는 인용된 컬럼으로, 그 외(`t.col`, `COUNT(*)` 등)는 그대로 사용
fn column_expr(name: &str) -> SimpleExpr {
    let mut chars = name.chars();
    let is_identifier = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_identifier {
        Expr::col(DynIden(name.to_string())).into()
    } else {
        Expr::cust(name.to_string())
    }
}

/// serde_json::Value를 SeaQuery Value로 변환
fn to_sea_value(value: &Value) -> sea_query::Value {
    match value {
        Value::Null => sea_query::Value::String(None),
        Value::Bool(b) => sea_query::Value::Bool(Some(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                sea_query::Value::BigInt(Some(i))
            } else if let Some(u) = n.as_u64() {
                sea_query::Value::BigUnsigned(Some(u))
            } else {
                sea_query::Value::Double(n.as_f64())
            }
        }
        Value::String(s) => sea_query::Value::from(s.clone()),
        // JSON 텍스트로 직렬화
        Value::Array(_) | Value::Object(_) => sea_query::Value::from(value.to_string()),
    }
}

fn value_to_expr(value: &Value) -> SimpleExpr {
    SimpleExpr::Value(to_sea_value(value))
}
