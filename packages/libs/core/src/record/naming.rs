//! 이름 규칙

use heck::ToSnakeCase;

/// 필드/타입 이름 → 물리 이름 변환 규칙
pub trait NamingStrategy: Send + Sync {
    /// 필드 이름 → 컬럼명
    fn column_name(&self, field: &str) -> String;

    /// 타입 이름 → 테이블명
    fn table_name(&self, type_name: &str) -> String;
}

/// snake_case 규칙 (`userName` → `user_name`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCase;

impl NamingStrategy for SnakeCase {
    fn column_name(&self, field: &str) -> String {
        field.to_snake_case()
    }

    fn table_name(&self, type_name: &str) -> String {
        type_name.to_snake_case()
    }
}
