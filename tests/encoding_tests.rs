use encoding_rs::{Encoding, EUC_KR, GBK, SHIFT_JIS};
use sgf_format::{
    decode, from_reader, parse_bytes, parse_bytes_with, parse_bytes_with_options, EncodingTable,
    Forest, Nodes, ParseOptions,
};
use std::io::Cursor;

fn game(charset: &str, comment: &str) -> String {
    format!(
        "(;GM[1]FF[4]CA[{charset}]SZ[19]\n;B[pd]\n;W[dp]C[{comment} is fun])"
    )
}

fn encode(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = encoding.encode(text);
    assert!(!unmappable);
    bytes.into_owned()
}

fn comment(forest: &Forest) -> &str {
    forest[0].children[0].children[0].data.first("C").unwrap()
}

#[test]
fn test_decode_non_utf8_text() {
    let cases = [
        (GBK, "gb2312", "围棋"),
        (SHIFT_JIS, "Shift_JIS", "囲碁"),
        (EUC_KR, "EUC-KR", "바둑"),
    ];

    for (encoding, charset, word) in cases {
        let bytes = encode(encoding, &game(charset, word));
        let forest = parse_bytes(&bytes);
        assert_eq!(comment(&forest), format!("{word} is fun"), "{charset}");
        assert_eq!(forest[0].data.first("CA"), Some(charset));
    }
}

#[test]
fn test_reparse_properties_before_ca() {
    let text = "(;PW[柯洁]PB[古力]CA[gb2312]C[第\\]一局];B[pd])";
    let forest = parse_bytes(&encode(GBK, text));

    assert_eq!(forest[0].data.first("PW"), Some("柯洁"));
    assert_eq!(forest[0].data.first("PB"), Some("古力"));
    assert_eq!(forest[0].data.first("C"), Some("第]一局"));
    assert_eq!(forest[0].children[0].data.first("B"), Some("pd"));
}

#[test]
fn test_ca_property_keeps_token_positions_consistent() {
    let text = "(;PB[本因坊秀策]CA[SJIS](;B[qd])(;B[dd]))";
    let forest = parse_bytes(&encode(SHIFT_JIS, text));

    assert_eq!(forest[0].data.first("PB"), Some("本因坊秀策"));
    assert_eq!(forest[0].children.len(), 2);
    assert_eq!(forest[0].children[1].data.first("B"), Some("dd"));
}

#[test]
fn test_ignore_unknown_encodings() {
    let text = game("does-not-exist", "囲碁");
    let mut nodes = Nodes::from_bytes(text.as_bytes(), &ParseOptions::default());
    let forest = sgf_format::build_forest(nodes.by_ref());

    assert_eq!(comment(&forest), "囲碁 is fun");
    assert_eq!(forest[0].data.first("CA"), Some("does-not-exist"));
    assert_eq!(nodes.encoding(), Some("UTF-8"));
}

#[test]
fn test_custom_encoding_labels() {
    let bytes = encode(SHIFT_JIS, &game("x-nihongo", "囲碁"));
    let options = ParseOptions::new()
        .with_encodings(EncodingTable::empty().with_label("x-nihongo", SHIFT_JIS));
    let forest = parse_bytes_with_options(&bytes, &options);
    assert_eq!(comment(&forest), "囲碁 is fun");

    let text = game("Shift_JIS", "囲碁");
    let forest = parse_bytes_with_options(text.as_bytes(), &options);
    assert_eq!(comment(&forest), "囲碁 is fun");
}

#[test]
fn test_whatwg_labels_can_be_disabled() {
    let text = game("gb2312", "围棋");
    let options =
        ParseOptions::new().with_encodings(EncodingTable::new().with_whatwg_labels(false));
    let mut nodes = Nodes::from_bytes(text.as_bytes(), &options);
    let forest = sgf_format::build_forest(nodes.by_ref());

    assert_eq!(comment(&forest), "围棋 is fun");
    assert_eq!(nodes.encoding(), Some("UTF-8"));
}

#[test]
fn test_detect_encoding_without_ca() {
    let text = "(;GM[1]SZ[19]C[【第三型】围棋是一种策略性两人棋类游戏，中国古时称为弈。\
棋盘上纵横各十九条线，黑白双方轮流落子，以围地多者为胜。]\n;B[pd];W[dd])";
    let forest = parse_bytes(&encode(GBK, text));

    let root = &forest[0];
    assert!(root.data.first("C").unwrap().starts_with("【第三型】围棋"));
    assert_eq!(root.children[0].data.first("B"), Some("pd"));
    assert_eq!(root.children[0].children[0].data.first("W"), Some("dd"));
}

#[test]
fn test_backslash_trail_byte_before_ca() {
    let text = "(;PB[本因坊秀策 十]CA[Shift_JIS]\
C[これは囲碁の対局です。黒番は本因坊秀策、白番は太田雄蔵でした。]\
;B[qd];W[dc])";
    let forest = parse_bytes(&encode(SHIFT_JIS, text));

    let root = &forest[0];
    assert_eq!(root.data.first("PB"), Some("本因坊秀策 十"));
    assert_eq!(root.data.first("CA"), Some("Shift_JIS"));
    assert!(root.data.first("C").unwrap().starts_with("これは囲碁の対局です"));
    assert_eq!(root.children[0].data.first("B"), Some("qd"));
}

#[test]
fn test_utf8_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("(;C[héllo])".as_bytes());

    let forest = parse_bytes(&bytes);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].data.first("C"), Some("héllo"));
}

#[test]
fn test_utf16le_bom() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "(;GM[1]CA[UTF-8]C[바둑 is fun])".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let forest = parse_bytes(&bytes);
    assert_eq!(forest[0].data.first("C"), Some("바둑 is fun"));
    assert_eq!(decode(&bytes, &ParseOptions::default()).encoding, "UTF-16LE");
}

#[test]
fn test_explicit_encoding_keeps_ca() {
    let options = ParseOptions::new().with_encoding("ISO-8859-1");
    let forest = parse_bytes_with_options(b"(;B[aa]CA[UTF-8])", &options);

    assert_eq!(forest[0].data.first("B"), Some("aa"));
    assert_eq!(forest[0].data.first("CA"), Some("UTF-8"));
}

#[test]
fn test_explicit_encoding_wins_over_ca() {
    let bytes = encode(EUC_KR, "(;CA[UTF-8]C[바둑])");
    let options = ParseOptions::new().with_encoding("euc-kr");
    let forest = parse_bytes_with_options(&bytes, &options);
    assert_eq!(forest[0].data.first("C"), Some("바둑"));
}

#[test]
fn test_node_stream_reports_encoding() {
    let bytes = encode(GBK, "(;CA[GBK]C[围棋];B[aa])");
    let mut nodes = Nodes::from_bytes(&bytes, &ParseOptions::default());
    assert!(nodes.encoding().is_some());

    let root = nodes.next().unwrap();
    assert_eq!(root.data.first("C"), Some("围棋"));
    assert_eq!(nodes.encoding(), Some("GBK"));
    assert_eq!(nodes.count(), 1);
}

#[test]
fn test_byte_callback_sees_decoded_values() {
    let bytes = encode(GBK, "(;PB[古力]CA[GB2312];C[围棋])");
    let mut players = Vec::new();
    parse_bytes_with(&bytes, &ParseOptions::default(), |node| {
        players.extend(node.data.first("PB").map(str::to_string));
    });
    assert_eq!(players, vec!["古力"]);
}

#[test]
fn test_from_reader_uses_declared_encoding() {
    let bytes = encode(EUC_KR, &game("EUC-KR", "바둑"));
    let forest = from_reader(Cursor::new(bytes), &ParseOptions::default()).unwrap();
    assert_eq!(comment(&forest), "바둑 is fun");
}
