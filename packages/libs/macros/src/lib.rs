//! gp-macros: 레코드 메타데이터 derive 매크로
//!
//! 리플렉션 대신 컴파일 타임에 필드 메타데이터를 생성합니다.
//! 생성된 코드는 `gp_sql::record` 경로를 참조하므로 `gp-sql`과 함께 사용합니다.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// `Record` / `Columns` 구현 생성
///
/// # 속성
///
/// | 위치 | 속성 | 설명 |
/// |------|------|------|
/// | 구조체 | `table = "..."` | 테이블 이름 (기본: 타입 이름의 snake_case) |
/// | 필드 | `primary_key` | PK 필드 (첫 번째 선언이 우선) |
/// | 필드 | `column = "..."` | 명시적 컬럼명 (기본: 필드 이름의 snake_case) |
/// | 필드 | `skip` | 컬럼이 아닌 필드 |
///
/// # 생성 코드
///
/// 1. `impl Record for T`
/// 2. `<T>Columns` 프록시 구조체 (필드별 물리 컬럼명)
/// 3. `impl Columns for T`
///
/// # 예시
///
/// ```ignore
/// use gp_sql::Record;
///
/// #[derive(Record, Serialize, Deserialize)]
/// #[record(table = "users")]
/// struct User {
///     #[record(primary_key)]
///     id: i64,
///     name: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
