//! 필드 정의
//!
//! 레코드 구조체의 필드 메타데이터를 정의합니다.

use super::naming::{NamingStrategy, SnakeCase};

/// 필드 정의
///
/// 선언 순서대로 `Record::fields()`에 나열됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// 필드 이름 (논리 이름)
    pub name: &'static str,

    /// 명시적 컬럼명 (생략 시 naming 규칙으로 유도)
    pub column: Option<&'static str>,

    /// PK 여부
    pub primary_key: bool,
}

impl Field {
    /// 새 필드
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            primary_key: false,
        }
    }

    /// 명시적 컬럼명 지정
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    /// PK로 지정
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// 레코드 타입
///
/// # 예시
///
/// ```
/// use gp_core::record::{Field, Record};
///
/// struct User {
///     id: i64,
///     user_name: String,
/// }
///
/// impl Record for User {
///     const TABLE: &'static str = "users";
///
///     fn fields() -> &'static [Field] {
///         const FIELDS: &[Field] = &[Field::new("id").primary_key(), Field::new("user_name")];
///         FIELDS
///     }
/// }
///
/// assert_eq!(gp_core::record::resolve_primary_key::<User>(), "id");
/// ```
pub trait Record: 'static {
    /// 테이블 이름
    const TABLE: &'static str;

    /// 필드 메타데이터 (선언 순서)
    fn fields() -> &'static [Field];

    /// 컬럼명 유도 규칙
    fn naming() -> &'static dyn NamingStrategy {
        &SnakeCase
    }
}

/// 컬럼명 프록시를 제공하는 레코드
///
/// `Proxy`는 필드마다 물리 컬럼명을 담은 값으로, 조건 빌더에
/// 문자열 리터럴 대신 넘길 수 있습니다.
pub trait Columns: Record {
    type Proxy;

    fn columns() -> Self::Proxy;
}
