#![cfg(feature = "macros")]
use pgfield::{
    BufferCategory, Composite, ErrorKind, FieldBuffer, UserTypes,
    format::{DecodeError, EncodeError},
    postgres::{PgType, oid},
    write_raw_binary,
};

#[derive(Debug, PartialEq, Composite)]
#[pg(name = "inventory_item")]
struct Item {
    name: String,
    supplier_id: i32,
    price: Option<f64>,
}

#[derive(Debug, PartialEq, Composite)]
struct Point(i64, i64);

fn types() -> UserTypes {
    let mut types = UserTypes::new();
    types.register("inventory_item", 16401, 16400, BufferCategory::CompositeBuffer);
    types.register("point", 16410, 16409, BufferCategory::CompositeBuffer);
    types
}

fn item() -> Item {
    Item { name: "fuzzy dice".into(), supplier_id: 42, price: Some(1.99) }
}

#[test]
fn resolve_oid_by_name() {
    let types = types();
    assert_eq!(Item::oid(&types), 16401);
    assert_eq!(Item::array_oid(&types), 16400);
    assert_eq!(Point::oid(&types), 16410);
    assert_eq!(Item::oid(&UserTypes::new()), pgfield::postgres::INVALID_OID);
}

#[test]
fn composite_layout() {
    let types = types();
    let mut buf = Vec::new();
    write_raw_binary(&types, &mut buf, &Point(1, -1)).unwrap();

    let mut expected = vec![0, 0, 0, 36, 0, 0, 0, 2];
    for value in [1i64, -1] {
        expected.extend_from_slice(&oid::INT8.to_be_bytes());
        expected.extend_from_slice(&8i32.to_be_bytes());
        expected.extend_from_slice(&value.to_be_bytes());
    }
    assert_eq!(buf, expected);
}

#[test]
fn composite_roundtrip() {
    let types = types();
    let mut buf = Vec::new();
    write_raw_binary(&types, &mut buf, &item()).unwrap();
    write_raw_binary(&types, &mut buf, &Item { price: None, ..item() }).unwrap();

    let mut field = FieldBuffer::binary(&buf);
    let mut value = Item { name: String::new(), supplier_id: 0, price: None };
    field.read_raw(&mut value, types.categories(), BufferCategory::CompositeBuffer).unwrap();
    assert_eq!(value, item());
    field.read_raw(&mut value, types.categories(), BufferCategory::CompositeBuffer).unwrap();
    assert_eq!(value.price, None);
    assert!(field.is_empty());
}

#[test]
fn composite_array() {
    let types = types();
    let items = vec![item(), Item { name: "dice".into(), supplier_id: 7, price: None }];

    let mut buf = Vec::new();
    write_raw_binary(&types, &mut buf, &items).unwrap();
    // element oid in the array header
    assert_eq!(&buf[12..16], 16401u32.to_be_bytes());

    let out = FieldBuffer::binary(&buf)
        .decode_raw::<Vec<Item>>(types.categories())
        .unwrap();
    assert_eq!(out, items);
}

#[test]
fn composite_in_record() {
    let types = types();
    let value = (Point(3, 4), Some(String::from("origin")));

    let mut buf = Vec::new();
    write_raw_binary(&types, &mut buf, &value).unwrap();

    let out = FieldBuffer::binary(&buf)
        .decode_raw::<(Point, Option<String>)>(types.categories())
        .unwrap();
    assert_eq!(out, value);
}

#[test]
fn unregistered_type() {
    let types = UserTypes::new();
    let mut buf = vec![0xaa];
    let err = write_raw_binary(&types, &mut buf, &item()).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Encode(EncodeError::UnknownOid("inventory_item"))));
    assert_eq!(buf, [0xaa]);
}

#[test]
fn failed_read_keeps_value() {
    let types = types();
    let mut buf = Vec::new();
    write_raw_binary(&types, &mut buf, &Point(8, 9)).unwrap();
    // second field payload cut short
    buf.truncate(buf.len() - 1);
    buf[..4].copy_from_slice(&35i32.to_be_bytes());

    let mut value = Point(1, 2);
    let mut field = FieldBuffer::binary(&buf);
    let err = field
        .read_raw(&mut value, types.categories(), BufferCategory::CompositeBuffer)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidBufferSize(_)));
    assert_eq!(value, Point(1, 2));
    assert_eq!(field.len(), buf.len());
}

#[test]
fn null_into_non_nullable_field() {
    let types = types();
    let mut buf = Vec::new();
    write_raw_binary(&types, &mut buf, &(None::<i64>, Some(2i64))).unwrap();

    let err = FieldBuffer::binary(&buf)
        .decode_raw::<Point>(types.categories())
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::UnexpectedNull)));
}
