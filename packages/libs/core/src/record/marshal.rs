//! 레코드 ↔ Row 변환
//!
//! 레코드는 serde로 직렬화되며, 필드 이름과 물리 컬럼명 사이의 매핑은
//! `Descriptor`가 담당합니다.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::descriptor::Descriptor;
use super::lenient::Lenient;
use crate::error::{Error, Result};

/// 컬럼명 → 값
pub type Row = serde_json::Map<String, Value>;

/// 값이 zero value인지 (null, false, 0, "", 빈 배열/객체)
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// 레코드 → 선언 순서의 (컬럼, 값) 목록
///
/// 직렬화 결과의 키는 선언된 필드 이름과 같아야 합니다. `#[serde(rename_all)]` 등으로
/// 키가 달라지면 `Error::Statement`를 반환합니다.
pub fn encode_record<T: Serialize>(record: &T, descriptor: &Descriptor) -> Result<Vec<(String, Value)>> {
    let mut object = match serde_json::to_value(record)? {
        Value::Object(object) => object,
        other => {
            return Err(Error::Statement {
                message: format!(
                    "record for table '{}' must serialize to an object, got {}",
                    descriptor.table(),
                    other
                ),
            })
        }
    };

    descriptor
        .fields()
        .map(|(field, column)| {
            let value = object.remove(field.name).ok_or_else(|| Error::Statement {
                message: format!(
                    "field '{}' of table '{}' is missing from the serialized record",
                    field.name,
                    descriptor.table()
                ),
            })?;
            Ok((column.to_string(), value))
        })
        .collect()
}

/// Row → 레코드
///
/// 알려진 컬럼은 필드 이름으로 바꾸고, 나머지 키는 그대로 둡니다.
/// 조회되지 않은 필드는 NULL로 채운 뒤 zero value로 역직렬화하며,
/// 정수로 저장된 bool도 받아들입니다.
pub fn decode_row<T: DeserializeOwned>(row: Row, descriptor: &Descriptor) -> Result<T> {
    let mut renamed: Row = row
        .into_iter()
        .map(|(column, value)| match descriptor.field_name(&column) {
            Some(name) => (name.to_string(), value),
            None => (column, value),
        })
        .collect();

    for (field, _) in descriptor.fields() {
        renamed.entry(field.name).or_insert(Value::Null);
    }

    Ok(<T as Deserialize>::deserialize(Lenient(Value::Object(renamed)))?)
}
