//! Request extractor.
//!
//! [`extract`] produces the typed value for one field from one request by
//! reading the field's declared source and coercing the text found there.

use crate::{coerce, ExtractionContext, ExtractionError, FieldDescriptor, FieldValue, SourceDescriptor};

/// Extracts the value of `field` from the request.
///
/// A query parameter that is absent from the request is read as the empty
/// string, so text fields become `""` while numeric and boolean fields fail
/// coercion.
///
/// # Errors
///
/// - [`ExtractionError::no_source`] when the field declares no source
/// - a coercion error when the text cannot be converted into the field kind
///
/// # Example
///
/// ```rust
/// use satchel_extract::{extract, ExtractionContextBuilder, FieldDescriptor, FieldKind, FieldValue, SourceDescriptor};
/// use http::Uri;
///
/// let ctx = ExtractionContextBuilder::new()
///     .uri(Uri::from_static("/?UserID=user1"))
///     .build();
/// let field = FieldDescriptor::new("user_id", FieldKind::Text)
///     .with_source(SourceDescriptor::query("UserID"));
///
/// assert_eq!(extract(&ctx, &field).unwrap(), FieldValue::Text("user1".into()));
/// ```
pub fn extract(ctx: &ExtractionContext, field: &FieldDescriptor) -> Result<FieldValue, ExtractionError> {
    let Some(source) = field.source() else {
        return Err(ExtractionError::no_source(field.name()));
    };

    let raw = match source {
        SourceDescriptor::Query { key } => ctx.query_param(key).unwrap_or_default(),
    };

    coerce(raw, field.kind())
        .map_err(|err| ExtractionError::coercion(source.extraction_source(), field.name(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractionContextBuilder, ExtractionSource, FieldKind};
    use http::{StatusCode, Uri};

    fn ctx(uri: &'static str) -> ExtractionContext {
        ExtractionContextBuilder::new().uri(Uri::from_static(uri)).build()
    }

    fn query_field(name: &'static str, key: &'static str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new(name, kind).with_source(SourceDescriptor::query(key))
    }

    #[test]
    fn test_extract_text() {
        let field = query_field("user_id", "UserID", FieldKind::Text);
        let value = extract(&ctx("/?UserID=user1"), &field).unwrap();
        assert_eq!(value, FieldValue::Text("user1".into()));
    }

    #[test]
    fn test_extract_bool() {
        let field = query_field("active", "Active", FieldKind::Bool);
        assert_eq!(extract(&ctx("/?Active=T"), &field).unwrap(), FieldValue::Bool(true));
        assert_eq!(extract(&ctx("/?Active=0"), &field).unwrap(), FieldValue::Bool(false));
    }

    #[test]
    fn test_missing_key_reads_as_empty_text() {
        let field = query_field("user_id", "UserID", FieldKind::Text);
        let value = extract(&ctx("/?other=1"), &field).unwrap();
        assert_eq!(value, FieldValue::Text(String::new()));
    }

    #[test]
    fn test_missing_key_fails_for_integer() {
        let field = query_field("page", "Page", FieldKind::Int { bits: 64 });
        let err = extract(&ctx("/"), &field).unwrap_err();

        assert_eq!(err.extraction_source(), ExtractionSource::Query);
        assert_eq!(err.field(), "page");
        assert_eq!(err.raw_value(), Some(""));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_integer() {
        let field = query_field("page", "Page", FieldKind::Int { bits: 64 });
        let err = extract(&ctx("/?Page=abc"), &field).unwrap_err();

        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(err.raw_value(), Some("abc"));
    }

    #[test]
    fn test_field_without_source() {
        let field = FieldDescriptor::new("orphan", FieldKind::Text);
        let err = extract(&ctx("/?orphan=x"), &field).unwrap_err();

        assert_eq!(err.error_code(), "NO_SOURCE");
        assert_eq!(err.extraction_source(), ExtractionSource::Unbound);
    }

    #[test]
    fn test_composite_field_is_unsupported() {
        let field = query_field("address", "Address", FieldKind::Composite("Address"));
        let err = extract(&ctx("/?Address=x"), &field).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FIELD_TYPE");
    }

    #[test]
    fn test_decoded_value_is_used() {
        let field = query_field("name", "name", FieldKind::Text);
        let value = extract(&ctx("/?name=Jane%20Doe"), &field).unwrap();
        assert_eq!(value, FieldValue::Text("Jane Doe".into()));
    }
}
