//! 비교 연산자 / 정렬 순서

use serde::{Deserialize, Serialize};

/// 정렬 순서
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// WHERE 조건 연산자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// 같음
    Eq,
    /// 같지 않음
    Ne,
    /// 보다 큼
    Gt,
    /// 보다 크거나 같음
    Ge,
    /// 보다 작음
    Lt,
    /// 보다 작거나 같음
    Le,
    /// LIKE 패턴
    Like,
    /// NOT LIKE 패턴
    NotLike,
    /// 포함 (IN)
    In,
    /// 미포함 (NOT IN)
    NotIn,
    /// 범위 (BETWEEN)
    Between,
    /// 범위 밖 (NOT BETWEEN)
    NotBetween,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
}

impl Operator {
    /// SQL 키워드/기호
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// 단일 값 비교 연산자 여부 (`<column> <op> ?`)
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Ne
                | Operator::Gt
                | Operator::Ge
                | Operator::Lt
                | Operator::Le
                | Operator::Like
                | Operator::NotLike
        )
    }
}
