use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

use bytes::Bytes;
use proptest::prelude::*;
use utcode::{
    Custom, CustomCategory, DecodeErrorKind, EncodeError, Encoder, MAX_DEPTH, Value, decode_into,
    from_bytes, from_slice, to_vec,
};

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, ..ProptestConfig::default() })]

    #[test]
    fn signed_integers_roundtrip(n in any::<i64>()) {
        let encoded = to_vec(&n).unwrap();
        prop_assert_eq!(from_slice::<i64>(&encoded), Ok(n));
        prop_assert_eq!(from_slice::<Value>(&encoded), Ok(Value::from(n)));
    }

    #[test]
    fn wide_integers_roundtrip(n in any::<i128>(), u in any::<u128>()) {
        prop_assert_eq!(from_slice::<i128>(&to_vec(&n).unwrap()), Ok(n));
        prop_assert_eq!(from_slice::<u128>(&to_vec(&u).unwrap()), Ok(u));
    }

    #[test]
    fn finite_floats_roundtrip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let encoded = to_vec(&f).unwrap();
        prop_assert_eq!(encoded[3], b'f');
        prop_assert_eq!(from_slice::<f64>(&encoded), Ok(f));
    }

    #[test]
    fn text_roundtrips(s in any::<String>()) {
        prop_assert_eq!(from_slice::<String>(&to_vec(&s).unwrap()), Ok(s));
    }

    #[test]
    fn byte_buffers_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let bytes = Bytes::from(data);
        prop_assert_eq!(from_slice::<Bytes>(&to_vec(&bytes).unwrap()), Ok(bytes));
    }

    #[test]
    fn text_lists_roundtrip(items in proptest::collection::vec(".*", 0..8)) {
        prop_assert_eq!(from_slice::<Vec<String>>(&to_vec(&items).unwrap()), Ok(items));
    }
}

#[test]
fn test_scalar_identity() {
    assert_eq!(from_slice::<bool>(&to_vec(&true).unwrap()), Ok(true));
    assert_eq!(from_slice::<bool>(&to_vec(&false).unwrap()), Ok(false));
    for n in [0i32, 1, -1, i32::MIN, i32::MAX] {
        assert_eq!(from_slice::<i32>(&to_vec(&n).unwrap()), Ok(n));
    }
    assert_eq!(from_slice::<f64>(&to_vec(&PI).unwrap()), Ok(PI));
    assert_eq!(to_vec(&"héllo ✓").unwrap(), b"ut:u16:aMOpbGxvIOKckw==");
    assert_eq!(
        from_slice::<String>(b"ut:u16:aMOpbGxvIOKckw==").as_deref(),
        Ok("héllo ✓")
    );

    let nan: f64 = from_slice(&to_vec(&f64::NAN).unwrap()).unwrap();
    assert!(nan.is_nan());
}

#[test]
fn test_integral_float_forms() {
    assert_eq!(to_vec(&3.0f64).unwrap(), b"ut:f:3.0z");
    assert_eq!(from_slice::<f64>(b"ut:f:3.0z"), Ok(3.0));
    assert_eq!(from_slice::<f64>(b"ut:i:3e"), Ok(3.0));
    assert_eq!(from_slice::<f32>(b"ut:i:-2e"), Ok(-2.0));
}

#[test]
fn test_text_sequence_keeps_order() {
    let names = vec![
        "foo".to_string(),
        "bar".to_string(),
        "john".to_string(),
        "doe".to_string(),
    ];
    let encoded = to_vec(&names).unwrap();
    assert_eq!(encoded, b"ut:l:u4:Zm9vu4:YmFyu8:am9obg==u4:ZG9le");

    let mut destination: Vec<String> = Vec::new();
    decode_into(&encoded, &mut destination).unwrap();
    assert_eq!(destination, names);
}

#[test]
fn test_dynamic_dictionary() {
    let map = HashMap::from([
        ("key1".to_string(), "value1".to_string()),
        ("key2".to_string(), "value2".to_string()),
    ]);
    let encoded = to_vec(&map).unwrap();

    let mut destination: Option<Value> = None;
    decode_into(&encoded, &mut destination).unwrap();
    let entries = destination
        .as_ref()
        .and_then(Value::as_dict)
        .expect("dictionary");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.get("key1"), Some(&Value::from("value1")));
    assert_eq!(entries.get("key2"), Some(&Value::from("value2")));

    let typed: BTreeMap<String, String> = from_bytes(Bytes::from(encoded)).unwrap();
    assert_eq!(typed.len(), 2);
    assert_eq!(typed["key1"], "value1");
}

#[test]
fn test_absent_handling() {
    let list: Option<Vec<String>> = None;
    let map: Option<HashMap<String, i32>> = None;
    assert_eq!(to_vec(&list).unwrap(), b"ut:n:e");
    assert_eq!(to_vec(&map).unwrap(), b"ut:n:e");
    assert_eq!(to_vec(&Value::Absent).unwrap(), b"ut:n:e");

    assert_eq!(from_slice::<bool>(b"ut:n:e"), Ok(false));
    assert_eq!(from_slice::<u64>(b"ut:n:e"), Ok(0));
    assert_eq!(from_slice::<f64>(b"ut:n:e"), Ok(0.0));
    assert_eq!(from_slice::<String>(b"ut:n:e"), Ok(String::new()));
    assert_eq!(from_slice::<Vec<i32>>(b"ut:n:e"), Ok(Vec::new()));
    assert_eq!(from_slice::<Option<i32>>(b"ut:n:e"), Ok(None));
    assert_eq!(from_slice::<Value>(b"ut:n:e"), Ok(Value::Absent));

    let mut destination = vec![1, 2, 3];
    decode_into(b"ut:n:e", &mut destination).unwrap();
    assert!(destination.is_empty());
}

#[test]
fn test_malformed_input() {
    let err = from_slice::<Vec<i32>>(b"l:i:1ee").unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::MissingPrefix);
    assert_eq!(err.offset(), 0);

    let mut destination: Vec<String> = Vec::new();
    let err = decode_into(b"ut:l:s1:as1:b", &mut destination).unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::Unterminated('l'));
    assert_eq!(destination, ["a", "b"]);

    let mut destination: HashMap<String, i32> = HashMap::new();
    let err = decode_into(b"ut:d:k1:ai:1e", &mut destination).unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::Unterminated('d'));
    assert_eq!(destination.get("a"), Some(&1));

    let err = from_slice::<bool>(b"ut:d:e").unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::TypeMismatch { .. }));
}

#[test]
fn test_nesting_limit() {
    let mut document = b"ut:".to_vec();
    document.extend(std::iter::repeat_n(b"l:".as_slice(), MAX_DEPTH + 1).flatten());
    document.extend(std::iter::repeat_n(b'e', MAX_DEPTH + 1));

    let err = from_slice::<Value>(&document).unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::TooDeep(MAX_DEPTH));
}

struct Celsius(f64);

impl CustomCategory for Celsius {
    const CATEGORY: &'static str = "celsius";
}

#[test]
fn test_custom_category_is_encode_only() {
    let mut encoder = Encoder::new();
    encoder.register(Celsius::CATEGORY, |value, out| {
        let celsius = value
            .downcast_ref::<Celsius>()
            .ok_or_else(|| EncodeError::custom("expected Celsius"))?;
        out.extend_from_slice(format!("{}C", celsius.0).as_bytes());
        Ok(())
    });

    let readings = vec![Custom(Celsius(21.5)), Custom(Celsius(-3.0))];
    let encoded = encoder.encode(&readings).unwrap();
    assert_eq!(encoded, b"ut:l:c5:21.5Cc3:-3Ce");

    let err = from_slice::<Value>(&encoded).unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::CustomUnsupported);
    assert_eq!(err.offset(), 5);
}
