//! `#[record(...)]` 속성 파싱
//!
//! 구조체 속성: `table = "..."`
//! 필드 속성: `primary_key`, `column = "..."`, `skip`

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, Meta, Result, Token,
};

/// 구조체 수준 속성
#[derive(Debug, Clone, Default)]
pub struct RecordAttr {
    /// 테이블 이름 (생략 시 타입 이름의 snake_case)
    pub table: Option<String>,
}

/// 필드 수준 속성
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    pub primary_key: bool,
    pub column: Option<String>,
    pub skip: bool,
}

fn string_value(expr: &Expr, what: &str) -> Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("table") => {
                    attr.table = Some(string_value(&nv.value, "table")?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: table = \"...\"",
                    ))
                }
            }
        }

        Ok(attr)
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("primary_key") => attr.primary_key = true,
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::NameValue(nv) if nv.path.is_ident("column") => {
                    attr.column = Some(string_value(&nv.value, "column")?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown field attribute. Expected: primary_key, skip, or column = \"...\"",
                    ))
                }
            }
        }

        Ok(attr)
    }
}

/// 구조체의 `#[record(...)]` 속성 추출
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}

/// 필드의 `#[record(...)]` 속성 추출
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}
