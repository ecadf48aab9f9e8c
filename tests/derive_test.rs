#![allow(non_snake_case)]

use std::collections::BTreeMap;

use utcode::{
    Decode, DecodeError, DecodeErrorKind, DecodeResult, Encode, FieldDescriptor, Record, Value,
    decode_into, from_slice, resolve, to_vec,
};

fn assert_roundtrips<T: Encode + Decode + PartialEq + std::fmt::Debug>(
    cases: &[(DecodeResult<T>, &[u8])],
) {
    for (expected, bytes) in cases {
        let decoded = from_slice::<T>(bytes);
        assert_eq!(expected, &decoded);
        if let Ok(val) = expected {
            assert_eq!(to_vec(val).as_deref(), Ok(*bytes));
        }
    }
}

#[derive(Debug, PartialEq, Record)]
struct Product {
    pub Name: String,
    pub Description: String,
    pub Quantity: i32,
    pub Image: Option<Box<ProductImage>>,
}

#[derive(Debug, PartialEq, Record)]
struct ProductImage {
    pub Large: String,
    pub Medium: String,
    pub Small: String,
}

fn shirt() -> Product {
    Product {
        Name: "Shirt".to_string(),
        Description: "black shirt".to_string(),
        Quantity: 5,
        Image: Some(Box::new(ProductImage {
            Large: "large".to_string(),
            Medium: "__medium".to_string(),
            Small: "smallllll".to_string(),
        })),
    }
}

#[test]
fn test_nested_record() {
    assert_roundtrips(&[
        (
            Ok(shirt()),
            b"ut:d:k4:nameu8:U2hpcnQ=k11:descriptionu16:YmxhY2sgc2hpcnQ=k8:quantityi:5e\
              k5:imaged:k5:largeu8:bGFyZ2U=k6:mediumu12:X19tZWRpdW0=k5:smallu12:c21hbGxsbGxsee",
        ),
        (
            Ok(Product {
                Image: None,
                ..shirt()
            }),
            b"ut:d:k4:nameu8:U2hpcnQ=k11:descriptionu16:YmxhY2sgc2hpcnQ=k8:quantityi:5e\
              k5:imagen:ee",
        ),
    ]);
}

#[test]
fn test_field_schema() {
    assert_eq!(
        Product::FIELDS,
        &[
            FieldDescriptor::new("Name", None),
            FieldDescriptor::new("Description", None),
            FieldDescriptor::new("Quantity", None),
            FieldDescriptor::new("Image", None),
        ]
    );
    let keys: Vec<_> = resolve::<Product>()
        .into_iter()
        .map(|(key, _)| key.into_owned())
        .collect();
    assert_eq!(keys, ["name", "description", "quantity", "image"]);
}

#[test]
fn test_rename() {
    #[derive(Debug, PartialEq, Record)]
    struct Thumbnail {
        #[utcode(rename = "src")]
        pub Url: String,
        #[utcode(rename = "W")]
        pub width: u16,
    }

    assert_roundtrips(&[(
        Ok(Thumbnail {
            Url: "x.png".to_string(),
            width: 64,
        }),
        b"ut:d:k3:srcu8:eC5wbmc=k1:Wi:64ee",
    )]);
}

#[test]
fn test_raw_identifier() {
    #[derive(Debug, PartialEq, Record)]
    struct Token {
        pub r#type: u8,
    }

    assert_roundtrips(&[(Ok(Token { r#type: 7 }), b"ut:d:k4:typei:7ee")]);
}

#[test]
fn test_skipped_and_private_fields() {
    #[derive(Debug, PartialEq, Record)]
    struct Account {
        pub Name: String,
        #[utcode(skip)]
        pub Session: u64,
        pub(crate) Internal: u8,
        secret: String,
    }

    let account = Account {
        Name: "Bob".to_string(),
        Session: 99,
        Internal: 3,
        secret: "hunter2".to_string(),
    };
    assert_eq!(to_vec(&account).unwrap(), b"ut:d:k4:nameu4:Qm9ie");

    // Fields outside the schema are defaulted on create and kept on bind.
    let created: Account = from_slice(b"ut:d:k4:nameu4:Qm9ie").unwrap();
    assert_eq!(
        created,
        Account {
            Name: "Bob".to_string(),
            Session: 0,
            Internal: 0,
            secret: String::new(),
        }
    );

    let mut bound = account;
    decode_into(b"ut:d:k4:names0:k6:secrets1:xe", &mut bound).unwrap();
    assert_eq!(bound.Name, "");
    assert_eq!(bound.Session, 99);
    assert_eq!(bound.Internal, 3);
    assert_eq!(bound.secret, "hunter2");
}

#[test]
fn test_unknown_and_reordered_keys() {
    let decoded: ProductImage = from_slice(
        b"ut:d:k5:smalls1:sk5:extral:i:1ed:k1:ab:1eek5:larges1:lk6:mediums1:me",
    )
    .unwrap();
    assert_eq!(
        decoded,
        ProductImage {
            Large: "l".to_string(),
            Medium: "m".to_string(),
            Small: "s".to_string(),
        }
    );
}

#[test]
fn test_missing_keys_are_absent() {
    let decoded: Product = from_slice(b"ut:d:k4:names1:xe").unwrap();
    assert_eq!(
        decoded,
        Product {
            Name: "x".to_string(),
            Description: String::new(),
            Quantity: 0,
            Image: None,
        }
    );
}

#[test]
fn test_absent_document() {
    let decoded: Product = from_slice(b"ut:n:e").unwrap();
    assert_eq!(decoded, <Product as Decode>::absent());

    let mut bound = shirt();
    decode_into(b"ut:n:e", &mut bound).unwrap();
    assert_eq!(bound.Name, "");
    assert_eq!(bound.Image, None);
}

#[test]
fn test_bind_merges_nested_record() {
    let mut bound = shirt();
    decode_into(b"ut:d:k8:quantityi:6ek5:imaged:k5:smalls1:xee", &mut bound).unwrap();

    let mut expected = shirt();
    expected.Quantity = 6;
    if let Some(image) = expected.Image.as_mut() {
        image.Small = "x".to_string();
    }
    assert_eq!(bound, expected);
}

#[derive(Debug, PartialEq, Record)]
struct Event {
    pub Name: String,
    pub Payload: Value,
}

fn dict<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Dict(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn test_dynamic_field_create() {
    let event: Event = from_slice(
        b"ut:d:k4:names4:pingk7:payloadd:k4:tagsl:i:1es1:xek5:innerd:k2:okb:1eee",
    )
    .unwrap();
    assert_eq!(
        event,
        Event {
            Name: "ping".to_string(),
            Payload: dict([
                ("tags", Value::List(vec![Value::Integer(1), Value::from("x")])),
                ("inner", dict([("ok", Value::Bool(true))])),
            ]),
        }
    );
    assert_eq!(from_slice::<Event>(&to_vec(&event).unwrap()), Ok(event));

    let missing: Event = from_slice(b"ut:d:k4:names1:xe").unwrap();
    assert_eq!(missing.Payload, Value::Absent);
}

#[test]
fn test_dynamic_field_bind() {
    let existing = || Event {
        Name: "kept".to_string(),
        Payload: dict([
            ("keep", Value::Integer(1)),
            (
                "tags",
                Value::List(vec![Value::from("a"), Value::from("b"), Value::from("c")]),
            ),
        ]),
    };

    let mut bound = existing();
    decode_into(b"ut:d:k7:payloadd:k4:tagsl:i:9eeee", &mut bound).unwrap();
    assert_eq!(
        bound,
        Event {
            Name: "kept".to_string(),
            Payload: dict([
                ("keep", Value::Integer(1)),
                (
                    "tags",
                    Value::List(vec![Value::Integer(9), Value::from("b"), Value::from("c")]),
                ),
            ]),
        }
    );

    let mut bound = existing();
    decode_into(b"ut:d:k7:payloadi:5ee", &mut bound).unwrap();
    assert_eq!(bound.Payload, Value::Integer(5));

    let mut bound = existing();
    decode_into(b"ut:d:k7:payloadn:ee", &mut bound).unwrap();
    assert_eq!(bound.Name, "kept");
    assert_eq!(bound.Payload, Value::Absent);
}

#[test]
fn test_errors() {
    assert_roundtrips::<ProductImage>(&[
        (
            Err(DecodeError::new(
                DecodeErrorKind::TypeMismatch {
                    expected: "record",
                    found: 'l',
                },
                3,
            )),
            b"ut:l:e",
        ),
        (
            Err(DecodeError::new(
                DecodeErrorKind::TypeMismatch {
                    expected: "text",
                    found: 'i',
                },
                13,
            )),
            b"ut:d:k5:largei:1ee",
        ),
        (
            Err(DecodeError::new(DecodeErrorKind::Unterminated('d'), 16)),
            b"ut:d:k5:larges0:",
        ),
    ]);
}
