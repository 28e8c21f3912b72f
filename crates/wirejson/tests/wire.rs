use std::collections::BTreeMap;

use wirejson::{
    decode, decode_reader, decode_str, encode, encode_to, encode_with, try_parse_if_json,
    try_parse_str_if_json, Blob, CodecOptions, Decimal, ErrorKind, IntWidth, JsonDecoder,
    JsonEncoder, Map, ToJsonObject, Utf16Str, Value, PNG_BASE64_PREFIX,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png_bytes() -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R', 0xFF, 0xFF, 0xFF, 0xFB, 0xEF]);
    bytes
}

fn nested_arrays(levels: usize) -> Value {
    let mut value = Value::Integer(1);
    for _ in 0..levels {
        value = Value::Array(vec![value]);
    }
    value
}

fn error_of(input: &str) -> (ErrorKind, Option<usize>) {
    let err = decode_str(input).unwrap_err();
    (err.kind(), err.offset())
}

#[test]
fn malformed_documents() {
    assert_eq!(error_of(r#"{"a":}"#), (ErrorKind::InvalidObject, Some(5)));
    assert_eq!(error_of("[1,2").0, ErrorKind::UnexpectedTermination);
    assert_eq!(error_of("tru").0, ErrorKind::InvalidLiteral);
    assert_eq!(error_of(r#""\uZZZZ""#).0, ErrorKind::InvalidUnicode);
}

#[test]
fn error_message_names_position() {
    let err = decode_str(r#"{"a":}"#).unwrap_err();
    assert!(err.to_string().contains("(position: 5)"), "{err}");
}

#[test]
fn depth_ceiling_on_both_paths() {
    let at_limit = nested_arrays(8);
    let bytes = encode(&at_limit).unwrap();
    assert_eq!(decode(&bytes).unwrap(), at_limit);

    let too_deep = nested_arrays(9);
    assert_eq!(encode(&too_deep).unwrap_err().kind(), ErrorKind::DepthLimitExceeded);
    let text = format!("{}1{}", "[".repeat(9), "]".repeat(9));
    assert_eq!(error_of(&text).0, ErrorKind::DepthLimitExceeded);

    let options = CodecOptions::new().with_max_depth(9);
    assert!(encode_with(&too_deep, options).is_ok());
    assert!(wirejson::decode_with(text.as_bytes(), options).is_ok());
}

#[test]
fn objects_nest_against_the_same_ceiling() {
    let text = format!("{}1{}", r#"{"k":"#.repeat(9), "}".repeat(9));
    assert_eq!(error_of(&text).0, ErrorKind::DepthLimitExceeded);
    let text = format!("{}1{}", r#"{"k":"#.repeat(8), "}".repeat(8));
    assert!(decode_str(&text).is_ok());
}

#[test]
fn png_binary_encodes_with_signature_prefix() {
    let bytes = encode(&Value::Binary(png_bytes())).unwrap();
    assert_eq!(bytes[0], b'"');
    assert!(bytes[1..].starts_with(PNG_BASE64_PREFIX));
    assert_eq!(decode(&bytes).unwrap(), Value::Binary(png_bytes()));
}

#[test]
fn png_binary_decodes_through_escaped_slashes() {
    let base64 = wirejson_base64::to_base64(&png_bytes());
    assert!(base64.contains('/'));
    let escaped = format!("\"{}\"", base64.replace('/', "\\/"));
    assert_eq!(decode_str(&escaped).unwrap(), Value::Binary(png_bytes()));
}

#[test]
fn screenshot_response_shape() {
    let base64 = wirejson_base64::to_base64(&png_bytes());
    let text = format!(r#"{{"sessionId":"s1","status":0,"value":"{base64}"}}"#);
    let value = decode_str(&text).unwrap();
    assert_eq!(value.get("value"), Some(&Value::Binary(png_bytes())));
    assert_eq!(value.get("status"), Some(&Value::Integer(0)));
}

#[test]
fn other_base64_strings_stay_text() {
    let value = decode_str(r#""aGVsbG8=""#).unwrap();
    assert_eq!(value, Value::from("aGVsbG8="));
    assert_eq!(encode(&Blob(b"hello")).unwrap(), br#""aGVsbG8=""#);
}

#[test]
fn astral_characters_round_trip() {
    let s = "smile \u{1F600} done";
    let bytes = encode(s).unwrap();
    assert_eq!(bytes, format!("\"{s}\"").as_bytes());
    assert_eq!(decode(&bytes).unwrap(), Value::from(s));
    assert_eq!(decode_str(r#""😀""#).unwrap(), Value::from("\u{1F600}"));
}

#[test]
fn utf16_host_strings() {
    let units: Vec<u16> = "a\u{1F600}".encode_utf16().collect();
    let bytes = encode(&Utf16Str(&units)).unwrap();
    assert_eq!(decode(&bytes).unwrap(), Value::from("a\u{1F600}"));
    // An unpaired surrogate is escaped and refused on the way back in.
    let bytes = encode(&Utf16Str(&[0xD83D])).unwrap();
    assert_eq!(bytes, br#""\uD83D""#);
    assert_eq!(decode(&bytes).unwrap_err().kind(), ErrorKind::InvalidUnicode);
}

#[test]
fn insertion_order_is_kept() {
    let mut map = Map::new();
    map.insert("c".into(), Value::Integer(1));
    map.insert("a".into(), Value::Integer(2));
    map.insert("b".into(), Value::Integer(3));
    let bytes = encode(&Value::Object(map)).unwrap();
    assert_eq!(bytes, br#"{"c":1,"a":2,"b":3}"#);
    let keys: Vec<String> = decode(&bytes).unwrap().as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["c", "a", "b"]);
}

#[test]
fn duplicate_keys_keep_last_value() {
    let value = decode_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
    assert_eq!(encode(&value).unwrap(), br#"{"a":3,"b":2}"#);
}

#[test]
fn number_classes_follow_the_literal() {
    assert_eq!(decode_str("10").unwrap(), Value::Integer(10));
    assert_eq!(decode_str("1.0e0").unwrap(), Value::Float(1.0));
    assert_eq!(decode_str("10.5").unwrap(), Value::Float(10.5));
    assert_eq!(decode_str("2147483647").unwrap().int_width(), Some(IntWidth::I32));
    assert_eq!(decode_str("2147483648").unwrap().int_width(), Some(IntWidth::I64));
    let price: Decimal = "1234567.123456789012".parse().unwrap();
    assert_eq!(decode_str("1234567.123456789012").unwrap(), Value::Decimal(price));
    let huge: Decimal = "99999999999999999999999".parse().unwrap();
    assert_eq!(decode_str("99999999999999999999999").unwrap(), Value::Decimal(huge));
    assert_eq!(
        decode_str("1234567890123456789012345678901234567890").unwrap_err().kind(),
        ErrorKind::InvalidNumber
    );
}

#[test]
fn decimals_round_trip_as_decimals() {
    let d: Decimal = "0.1".parse().unwrap();
    let bytes = encode(&d).unwrap();
    assert_eq!(bytes, b"0.100000000000000");
    assert_eq!(decode(&bytes).unwrap(), Value::Decimal(d));
}

#[test]
fn try_parse_pass_through() {
    assert_eq!(try_parse_if_json(Value::from("hello")).unwrap(), Value::from("hello"));
    let parsed = try_parse_if_json(Value::from(r#"{"a":1}"#)).unwrap();
    assert_eq!(parsed.get("a"), Some(&Value::Integer(1)));
    assert_eq!(try_parse_str_if_json("[true]").unwrap(), Value::Array(vec![Value::Bool(true)]));
    assert_eq!(try_parse_if_json(Value::Bool(false)).unwrap(), Value::Bool(false));
}

struct Cookie {
    name: &'static str,
    value: &'static str,
    expiry: Option<i64>,
}

impl ToJsonObject for Cookie {
    fn to_json_object(&self) -> Map {
        let mut map = Map::new();
        map.insert("name".into(), Value::from(self.name));
        map.insert("value".into(), Value::from(self.value));
        map.insert("expiry".into(), Value::from(self.expiry));
        map
    }
}

#[test]
fn domain_objects_serialize_themselves() {
    let cookie = Cookie {
        name: "sid",
        value: "x1",
        expiry: None,
    };
    let cookies: Vec<&dyn ToJsonObject> = vec![&cookie];
    let mut params = BTreeMap::new();
    params.insert("cookies", cookies);
    assert_eq!(
        encode(&params).unwrap(),
        br#"{"cookies":[{"name":"sid","value":"x1","expiry":null}]}"#
    );
}

#[test]
fn host_shapes_mix() {
    let dt = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    assert_eq!(encode(&dt).unwrap(), br#""2020-01-02T03:04:05""#);

    let mut args = indexmap::IndexMap::new();
    args.insert("ratio", Value::Float(0.25));
    args.insert("flags", Value::Array(vec![Value::Bool(true), Value::Null]));
    args.insert("text", Value::from("line\nbreak"));
    assert_eq!(
        encode(&args).unwrap(),
        br#"{"ratio":0.25,"flags":[true,null],"text":"line\nbreak"}"#
    );
    assert_eq!(encode(&[1u8, 2, 3]).unwrap(), b"[1,2,3]");
    assert_eq!(encode(&Some(2.5f32)).unwrap(), b"2.5");
}

#[test]
fn stream_entry_points() {
    let mut out = Vec::new();
    encode_to(&vec!["a", "b"], &mut out).unwrap();
    assert_eq!(out, br#"["a","b"]"#);
    let value = decode_reader(std::io::Cursor::new(out)).unwrap();
    assert_eq!(value, Value::Array(vec![Value::from("a"), Value::from("b")]));
}

#[test]
fn failed_calls_do_not_poison_instances() {
    let mut decoder = JsonDecoder::new();
    assert!(decoder.decode_str(r#"{"a":[1,2"#).is_err());
    assert_eq!(decoder.decode_str("[]").unwrap(), Value::Array(vec![]));

    let mut encoder = JsonEncoder::new();
    assert!(encoder.encode(&nested_arrays(20)).is_err());
    assert_eq!(encoder.encode(&nested_arrays(1)).unwrap(), b"[1]");
}

#[test]
fn serde_json_agrees_on_plain_documents() {
    let text = r#"{"b":[1,-2,3.5,"x\ny",null,false],"a":{"nested":"é"}}"#;
    let ours = decode_str(text).unwrap();
    let theirs: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(serde_json::Value::from(ours), theirs);
}
