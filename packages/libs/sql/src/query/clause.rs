//! 조건 조각 누적기
//!
//! `Clause`는 `"<column> <op> ?"` 형태의 조각과 그 인자를 함께 쌓습니다.
//! 조각과 인자는 항상 한 번의 호출로 같이 추가되므로, 컴파일된 텍스트의
//! `?` 개수와 인자 개수는 같은 순서로 일치합니다.

use serde_json::Value;

use super::operator::Operator;

/// 조각 사이의 논리 연산자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// 컴파일된 조건 (WHERE/HAVING 텍스트 + 위치 인자)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub predicate: String,
    pub args: Vec<Value>,
}

impl Condition {
    pub fn is_empty(&self) -> bool {
        self.predicate.is_empty()
    }
}

/// 조건 조각 누적기
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    sql: String,
    args: Vec<Value>,
    /// 다음 조각 앞에 붙일 연산자 (없으면 AND)
    pending: Option<Connector>,
    /// 최상위에 OR 연결이 있는지
    has_or: bool,
}

impl Clause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// 조각 하나와 그 인자를 추가
    pub fn push<I>(&mut self, fragment: &str, args: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let connector = self.pending.take().unwrap_or(Connector::And);
        if !self.sql.is_empty() {
            self.has_or |= connector == Connector::Or;
            self.sql.push(' ');
            self.sql.push_str(connector.as_sql());
            self.sql.push(' ');
        }
        self.sql.push_str(fragment);
        self.args.extend(args);
    }

    /// 다음 조각의 연산자 지정
    pub fn connect(&mut self, connector: Connector) {
        self.pending = Some(connector);
    }

    /// 다른 조각 묶음을 그대로 이어붙임 (AND 연결)
    pub fn append(&mut self, other: &Clause) {
        if other.is_empty() {
            return;
        }
        self.push(&other.sql, other.args.iter().cloned());
        self.has_or |= other.has_or;
    }

    /// 최상위 OR 연결 여부
    pub fn has_or(&self) -> bool {
        self.has_or
    }

    /// 전체를 하나의 괄호 단위로 감쌈
    ///
    /// 이후 AND로 붙는 조각이 OR의 한쪽 피연산자에만 묶이지 않게 합니다.
    pub fn enclose(&mut self) {
        if self.sql.is_empty() {
            return;
        }
        self.sql = format!("({})", self.sql);
        self.has_or = false;
    }

    /// 다른 조각 묶음을 괄호로 감싸 추가
    ///
    /// 비어 있는 묶음은 무시합니다.
    pub fn push_group(&mut self, connector: Connector, group: &Clause) {
        if group.is_empty() {
            return;
        }
        self.pending = Some(connector);
        self.push(&format!("({})", group.sql), group.args.iter().cloned());
    }

    /// 비교 조각 추가
    pub fn compare(&mut self, column: &str, op: Operator, value: Value) {
        self.push(&format!("{} {} ?", column, op.as_sql()), [value]);
    }

    /// IN / NOT IN 조각 추가 (요소마다 placeholder 하나)
    ///
    /// 빈 목록은 IN이면 항상 거짓, NOT IN이면 항상 참인 조각이 됩니다.
    pub fn membership(&mut self, column: &str, op: Operator, values: Vec<Value>) {
        if values.is_empty() {
            let always = if op == Operator::NotIn { "1 = 1" } else { "1 = 0" };
            self.push(always, []);
            return;
        }
        let placeholders = vec!["?"; values.len()].join(",");
        self.push(&format!("{} {} ({})", column, op.as_sql(), placeholders), values);
    }

    /// BETWEEN / NOT BETWEEN 조각 추가
    pub fn range(&mut self, column: &str, op: Operator, low: Value, high: Value) {
        self.push(&format!("{} {} ? AND ?", column, op.as_sql()), [low, high]);
    }

    /// IS NULL / IS NOT NULL 조각 추가
    pub fn null_check(&mut self, column: &str, op: Operator) {
        self.push(&format!("{} {}", column, op.as_sql()), []);
    }

    pub fn into_condition(self) -> Condition {
        Condition {
            predicate: self.sql,
            args: self.args,
        }
    }
}

/// 비교 조건 빌더
///
/// 루트 쿼리(`Query`)와 괄호 그룹(`Group`)이 같은 연산을 공유합니다.
/// 모든 연산은 값으로 `self`를 받아 다시 반환합니다.
pub trait Conditions: Sized {
    /// 조각이 추가될 대상
    fn clause_mut(&mut self) -> &mut Clause;

    fn eq(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.clause_mut().compare(column.as_ref(), Operator::Eq, value.into());
        self
    }

    fn ne(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.clause_mut().compare(column.as_ref(), Operator::Ne, value.into());
        self
    }

    fn gt(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.clause_mut().compare(column.as_ref(), Operator::Gt, value.into());
        self
    }

    fn ge(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.clause_mut().compare(column.as_ref(), Operator::Ge, value.into());
        self
    }

    fn lt(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.clause_mut().compare(column.as_ref(), Operator::Lt, value.into());
        self
    }

    fn le(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.clause_mut().compare(column.as_ref(), Operator::Le, value.into());
        self
    }

    /// `column LIKE '%value%'`
    fn like(mut self, column: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let pattern = format!("%{}%", value.as_ref());
        self.clause_mut().compare(column.as_ref(), Operator::Like, pattern.into());
        self
    }

    /// `column NOT LIKE '%value%'`
    fn not_like(mut self, column: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let pattern = format!("%{}%", value.as_ref());
        self.clause_mut().compare(column.as_ref(), Operator::NotLike, pattern.into());
        self
    }

    /// `column LIKE '%value'`
    fn like_left(mut self, column: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let pattern = format!("%{}", value.as_ref());
        self.clause_mut().compare(column.as_ref(), Operator::Like, pattern.into());
        self
    }

    /// `column LIKE 'value%'`
    fn like_right(mut self, column: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let pattern = format!("{}%", value.as_ref());
        self.clause_mut().compare(column.as_ref(), Operator::Like, pattern.into());
        self
    }

    fn in_<I, V>(mut self, column: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.clause_mut().membership(column.as_ref(), Operator::In, values);
        self
    }

    fn not_in<I, V>(mut self, column: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.clause_mut().membership(column.as_ref(), Operator::NotIn, values);
        self
    }

    fn between(mut self, column: impl AsRef<str>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.clause_mut()
            .range(column.as_ref(), Operator::Between, low.into(), high.into());
        self
    }

    fn not_between(
        mut self,
        column: impl AsRef<str>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        self.clause_mut()
            .range(column.as_ref(), Operator::NotBetween, low.into(), high.into());
        self
    }

    fn is_null(mut self, column: impl AsRef<str>) -> Self {
        self.clause_mut().null_check(column.as_ref(), Operator::IsNull);
        self
    }

    fn is_not_null(mut self, column: impl AsRef<str>) -> Self {
        self.clause_mut().null_check(column.as_ref(), Operator::IsNotNull);
        self
    }

    /// 다음 조건을 OR로 연결
    fn or(mut self) -> Self {
        self.clause_mut().connect(Connector::Or);
        self
    }

    /// 다음 조건을 AND로 연결 (기본값)
    fn and(mut self) -> Self {
        self.clause_mut().connect(Connector::And);
        self
    }
}

/// 괄호 그룹 빌더
///
/// `Query::and_bracket` / `Query::or_bracket`의 클로저가 받습니다.
#[derive(Debug, Clone, Default)]
pub struct Group {
    clause: Clause,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_clause(self) -> Clause {
        self.clause
    }
}

impl Conditions for Group {
    fn clause_mut(&mut self) -> &mut Clause {
        &mut self.clause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn test_default_connector_is_and() {
        let clause = Group::new().eq("age", 30).eq("name", "Tom").into_clause();
        assert_eq!(clause.sql(), "age = ? AND name = ?");
        assert_eq!(clause.args(), &[json!(30), json!("Tom")]);
    }

    #[test]
    fn test_or_connector_applies_once() {
        let clause = Group::new()
            .eq("a", 1)
            .or()
            .eq("b", 2)
            .eq("c", 3)
            .into_clause();
        assert_eq!(clause.sql(), "a = ? OR b = ? AND c = ?");
    }

    #[test]
    fn test_membership_expands_placeholders() {
        let clause = Group::new().in_("id", [1, 2, 3]).into_clause();
        assert_eq!(clause.sql(), "id IN (?,?,?)");
        assert_eq!(clause.args(), &[json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_empty_membership() {
        let clause = Group::new()
            .in_("id", Vec::<i64>::new())
            .not_in("code", Vec::<String>::new())
            .into_clause();
        assert_eq!(clause.sql(), "1 = 0 AND 1 = 1");
        assert!(clause.args().is_empty());
    }

    #[test]
    fn test_like_variants() {
        let clause = Group::new()
            .like("name", "om")
            .like_left("email", "@example.com")
            .like_right("code", "A")
            .not_like("tag", "x")
            .into_clause();
        assert_eq!(
            clause.sql(),
            "name LIKE ? AND email LIKE ? AND code LIKE ? AND tag NOT LIKE ?"
        );
        assert_eq!(
            clause.args(),
            &[json!("%om%"), json!("%@example.com"), json!("A%"), json!("%x%")]
        );
    }

    #[test]
    fn test_placeholder_count_matches_args() {
        let clause = Group::new()
            .eq("a", 1)
            .ne("b", 2)
            .gt("c", 3)
            .ge("d", 4)
            .lt("e", 5)
            .le("f", 6)
            .between("g", 1, 9)
            .not_between("h", 2, 8)
            .in_("i", ["x", "y"])
            .not_in("j", [true])
            .is_null("k")
            .or()
            .is_not_null("l")
            .into_clause();
        assert_eq!(placeholders(clause.sql()), clause.args().len());
        assert_eq!(clause.args().len(), 13);
    }

    #[test]
    fn test_has_or_tracks_top_level_only() {
        let mut clause = Group::new().eq("a", 1).eq("b", 2).into_clause();
        assert!(!clause.has_or());

        let inner = Group::new().eq("x", 1).or().eq("y", 2).into_clause();
        clause.push_group(Connector::And, &inner);
        assert!(!clause.has_or());

        clause.push_group(Connector::Or, &inner);
        assert!(clause.has_or());

        clause.enclose();
        assert!(!clause.has_or());
        assert!(clause.sql().starts_with("(a = ?"));
        assert!(clause.sql().ends_with("(x = ? OR y = ?))"));
    }

    #[test]
    fn test_push_group_skips_empty() {
        let mut clause = Clause::default();
        clause.push_group(Connector::Or, &Clause::default());
        assert!(clause.is_empty());

        let group = Group::new().eq("vip", true).into_clause();
        clause.push_group(Connector::Or, &group);
        assert_eq!(clause.sql(), "(vip = ?)");
    }
}
