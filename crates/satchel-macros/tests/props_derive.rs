//! Integration tests for `#[derive(Props)]`.
//!
//! These verify that derived schemas are accepted or rejected by the binding
//! plan builder and hydrate correctly from requests.

use bytes::Bytes;
use http::StatusCode;
use satchel_core::{
    generate_handler, BasicResponder, BindingError, BufferedResponse, Endpoint, FieldKind,
    FieldValue, Props, RequestContext,
};
use satchel_macros::Props;
use std::io::Write;

#[derive(Debug, Clone, Default, PartialEq, Props)]
struct UserProps {
    #[param(query = "UserID")]
    user_id: String,
    #[param("Active")]
    active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Props)]
struct AllKinds {
    #[param("b")]
    flag: bool,
    #[param("i8")]
    tiny: i8,
    #[param("i64")]
    big: i64,
    #[param("u16")]
    port: u16,
    #[param("usize")]
    count: usize,
    #[param("f32")]
    ratio: f32,
    #[param("f64")]
    precise: f64,
    #[param("s")]
    text: String,
    #[param("raw")]
    raw: Vec<u8>,
    #[param("bytes")]
    blob: Bytes,
}

#[derive(Debug, Clone, Default)]
struct Address {
    _street: String,
}

#[derive(Debug, Clone, Default, Props)]
struct NestedProps {
    #[param("Name")]
    name: String,
    #[param("Address")]
    address: Address,
}

#[derive(Debug, Clone, Default, Props)]
struct MissingSourceProps {
    #[param("UserID")]
    user_id: String,
    note: String,
}

#[derive(Debug, Clone, Default, Props)]
struct RawIdentProps {
    #[param("type")]
    r#type: String,
}

#[derive(Debug, Clone, Default, Props)]
struct NoFields;

fn get(endpoint: &dyn Endpoint, uri: &str) -> BufferedResponse {
    let request = http::Request::get(uri).body(Bytes::new()).unwrap();
    let mut response = BufferedResponse::new();
    endpoint.serve(&mut response, &request);
    response
}

#[test]
fn derived_schema_lists_fields_in_order() {
    let fields = UserProps::fields();

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name(), "user_id");
    assert_eq!(fields[0].kind(), FieldKind::Text);
    assert_eq!(fields[0].source().map(|s| s.key()), Some("UserID"));
    assert_eq!(fields[1].name(), "active");
    assert_eq!(fields[1].kind(), FieldKind::Bool);
    assert_eq!(fields[1].source().map(|s| s.key()), Some("Active"));
    assert_eq!(UserProps::type_name(), "UserProps");
}

#[test]
fn derived_kinds_follow_field_types() {
    let kinds: Vec<_> = AllKinds::fields().iter().map(|f| f.kind()).collect();

    assert_eq!(
        kinds,
        vec![
            FieldKind::Bool,
            FieldKind::Int { bits: 8 },
            FieldKind::Int { bits: 64 },
            FieldKind::Uint { bits: 16 },
            FieldKind::Uint { bits: usize::BITS },
            FieldKind::Float32,
            FieldKind::Float64,
            FieldKind::Text,
            FieldKind::Bytes,
            FieldKind::Bytes,
        ]
    );
}

#[test]
fn derived_assign_stores_values() {
    let mut props = AllKinds::default();
    props.assign(0, FieldValue::Bool(true)).unwrap();
    props.assign(1, FieldValue::Int(-8)).unwrap();
    props.assign(3, FieldValue::Uint(8080)).unwrap();
    props.assign(7, FieldValue::Text("hi".into())).unwrap();
    props.assign(9, FieldValue::Bytes(b"blob".to_vec())).unwrap();

    assert!(props.flag);
    assert_eq!(props.tiny, -8);
    assert_eq!(props.port, 8080);
    assert_eq!(props.text, "hi");
    assert_eq!(props.blob, Bytes::from_static(b"blob"));

    assert!(props.assign(42, FieldValue::Bool(true)).is_err());
}

#[test]
fn derived_props_hydrate_every_kind() {
    fn echo(props: AllKinds) -> BasicResponder {
        satchel_core::ok().with_body(format!(
            "{} {} {} {} {} {} {} {} {} {}",
            props.flag,
            props.tiny,
            props.big,
            props.port,
            props.count,
            props.ratio,
            props.precise,
            props.text,
            String::from_utf8_lossy(&props.raw),
            String::from_utf8_lossy(&props.blob),
        ))
    }

    let endpoint = generate_handler(echo).unwrap();
    let response = get(
        &endpoint,
        "/?b=true&i8=-5&i64=9000000000&u16=443&usize=7&f32=0.5&f64=2.25&s=hello&raw=abc&bytes=xyz",
    );

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        String::from_utf8(response.body().to_vec()).unwrap(),
        "true -5 9000000000 443 7 0.5 2.25 hello abc xyz"
    );
}

#[test]
fn user_id_is_bound_from_query() {
    fn greet(mut ctx: RequestContext<'_>, props: UserProps) {
        if let Some(writer) = ctx.writer() {
            let _ = write!(writer, "{}", props.user_id);
        }
    }

    let endpoint = generate_handler(greet).unwrap();
    let response = get(&endpoint, "/?UserID=user1&Active=1");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), b"user1");
}

#[test]
fn narrow_integer_overflow_is_rejected() {
    fn handler(_props: AllKinds) {}

    let endpoint = generate_handler(handler).unwrap();
    let response = get(&endpoint, "/?b=1&i8=200");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(response.body()).contains("tiny"));
}

#[test]
fn nested_struct_field_is_rejected_at_build() {
    fn handler(_props: NestedProps) -> BasicResponder {
        satchel_core::ok()
    }

    let err = generate_handler(handler).unwrap_err();
    assert_eq!(
        err,
        BindingError::UnsupportedFieldType {
            props: "NestedProps",
            field: "address",
            type_name: "struct Address".into(),
        }
    );
}

#[test]
fn field_without_param_is_rejected_at_build() {
    fn handler(_props: MissingSourceProps) {}

    let err = generate_handler(handler).unwrap_err();
    assert_eq!(
        err,
        BindingError::MissingSource {
            props: "MissingSourceProps",
            field: "note",
        }
    );
}

#[test]
fn raw_identifier_fields_use_plain_names() {
    let fields = RawIdentProps::fields();
    assert_eq!(fields[0].name(), "type");
}

#[test]
fn unit_struct_props_have_no_fields() {
    fn handler(_props: NoFields) -> Result<(), String> {
        Ok(())
    }

    assert!(NoFields::fields().is_empty());
    let endpoint = generate_handler(handler).unwrap();
    assert_eq!(get(&endpoint, "/").status(), StatusCode::OK);
}
