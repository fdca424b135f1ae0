use sgf_format::{
    build_forest, forest_content_eq, parse, parse_with, parse_with_options, props, stringify,
    stringify_node, stringify_with_options, tokenize, Node, Nodes, ParseOptions, PropertyMap,
    StringifyOptions, TokenKind,
};

fn leaf(data: PropertyMap) -> Node {
    Node::with_data(data)
}

fn branch(data: PropertyMap, children: Vec<Node>) -> Node {
    let mut node = Node::with_data(data);
    node.children = children;
    node
}

const GAME: &str = "(;GM[1]FF[4]CA[UTF-8]SZ[19]KM[6.5]PB[Black]PW[White]DT[2016-03-09]
;B[pd];W[dp];B[pq];W[dd]
(;B[fq]C[Low approach])
(;B[qk]C[Side extension](;W[nc])(;W[qf]))
)";

#[test]
fn test_parse_multiple_nodes() {
    let forest = parse("(;B[aa]SZ[19];AB[cc][dd:ee])");
    let expected = vec![branch(
        props! { "B" => ["aa"], "SZ" => ["19"] },
        vec![leaf(props! { "AB" => ["cc", "dd:ee"] })],
    )];

    assert!(forest_content_eq(&forest, &expected));
}

#[test]
fn test_parse_variations() {
    let forest = parse("(;B[hh](;W[ii])(;W[hi]C[h]))");
    let expected = vec![branch(
        props! { "B" => ["hh"] },
        vec![
            leaf(props! { "W" => ["ii"] }),
            leaf(props! { "W" => ["hi"], "C" => ["h"] }),
        ],
    )];

    assert!(forest_content_eq(&forest, &expected));
}

#[test]
fn test_node_created_order() {
    let mut created = Vec::new();
    parse_with(
        "(;B[hh](;W[ii])(;W[hi];C[h]))",
        &ParseOptions::default(),
        |node| created.push(node.clone()),
    );

    let expected = vec![
        (0, None, props! { "B" => ["hh"] }),
        (1, Some(0), props! { "W" => ["ii"] }),
        (2, Some(0), props! { "W" => ["hi"] }),
        (3, Some(2), props! { "C" => ["h"] }),
    ];
    let actual: Vec<_> = created
        .into_iter()
        .map(|node| {
            assert!(node.children.is_empty());
            (node.id, node.parent_id, node.data)
        })
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_lower_case_properties() {
    let forest = parse("(;CoPyright[hello](;White[ii])(;White[hi]Comment[h]))");
    let expected = vec![branch(
        props! { "CP" => ["hello"] },
        vec![
            leaf(props! { "W" => ["ii"] }),
            leaf(props! { "W" => ["hi"], "C" => ["h"] }),
        ],
    )];

    assert!(forest_content_eq(&forest, &expected));
}

#[test]
fn test_nodes_outside_a_game() {
    assert_eq!(parse(";B[hh];W[ii]"), parse("(;B[hh];W[ii])"));
}

#[test]
fn test_missing_initial_semicolon() {
    let reference = parse("(;B[hh];W[ii])");
    assert_eq!(parse("B[hh];W[ii]"), reference);
    assert_eq!(parse("(B[hh];W[ii])"), reference);
}

#[test]
fn test_ignore_empty_variations() {
    let with_empty = parse("(;B[hh]()(;W[ii])()(;W[hi]C[h]))");
    let without = parse("(;B[hh](;W[ii])(;W[hi]C[h]))");
    assert_eq!(with_empty, without);
}

#[test]
fn test_complex_game() {
    let forest = parse(GAME);
    assert_eq!(forest.len(), 1);

    let root = &forest[0];
    assert_eq!(root.data.first("KM"), Some("6.5"));
    assert_eq!(root.descendants().count(), 9);

    let branch_point = root
        .descendants()
        .find(|node| node.data.first("W") == Some("dd"))
        .unwrap();
    assert_eq!(branch_point.children.len(), 2);
    assert_eq!(branch_point.children[1].children.len(), 2);

    let last = root.descendants().last().unwrap();
    assert_eq!(last.data.first("W"), Some("qf"));
}

#[test]
fn test_ids_are_contiguous() {
    let options = ParseOptions::new().with_first_id(50);
    let forest = parse_with_options(GAME, &options);
    let mut ids: Vec<_> = forest[0].descendants().map(|node| node.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (50..59).collect::<Vec<_>>());

    for node in forest[0].descendants() {
        for child in &node.children {
            assert_eq!(child.parent_id, Some(node.id));
        }
    }
}

#[test]
fn test_stream_then_build() {
    let streamed: Vec<_> = Nodes::new(GAME, &ParseOptions::default()).collect();
    assert!(streamed.iter().all(Node::is_leaf));
    assert_eq!(build_forest(streamed), parse(GAME));
}

#[test]
fn test_tokens_cover_game() {
    let kinds: Vec<_> = tokenize("(;B[aa]\n;W[b\\]b])").map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Parenthesis,
            TokenKind::Semicolon,
            TokenKind::PropIdent,
            TokenKind::Value,
            TokenKind::Semicolon,
            TokenKind::PropIdent,
            TokenKind::Value,
            TokenKind::Parenthesis,
        ]
    );

    let value = tokenize("(;B[aa]\n;W[b\\]b])").nth(6).unwrap();
    assert_eq!(value.value, "[b\\]b]");
    assert_eq!((value.row, value.col), (1, 2));
}

#[test]
fn test_stringify_single_tree() {
    let forest = vec![branch(
        props! { "B" => ["aa"], "SZ" => ["19"] },
        vec![leaf(props! { "AB" => ["cc", "dd:ee"] })],
    )];

    assert_eq!(
        stringify(&forest),
        "(\n  ;B[aa]SZ[19]\n  ;AB[cc][dd:ee]\n)\n"
    );
}

#[test]
fn test_stringify_multiple_trees() {
    let forest = vec![
        branch(
            props! { "B" => ["aa"], "SZ" => ["19"] },
            vec![leaf(props! { "AB" => ["cc", "dd:ee"] })],
        ),
        branch(
            props! { "CP" => ["Copyright"] },
            vec![leaf(props! { "B" => ["ab"] }), leaf(props! { "W" => ["ac"] })],
        ),
    ];

    assert_eq!(
        stringify(&forest),
        "(\n  ;B[aa]SZ[19]\n  ;AB[cc][dd:ee]\n)(\n  ;CP[Copyright]\n  (\n    ;B[ab]\n  )(\n    ;W[ac]\n  )\n)\n"
    );
    assert_eq!(
        stringify_with_options(&forest, &StringifyOptions::new().with_line_break("")),
        "(;B[aa]SZ[19];AB[cc][dd:ee])(;CP[Copyright](;B[ab])(;W[ac]))"
    );
}

#[test]
fn test_stringify_ignores_mixed_case_properties() {
    let mut data = props! { "B" => ["ab"] };
    data.append("board", "...");
    assert_eq!(stringify_node(&leaf(data)), ";B[ab]\n");
}

#[test]
fn test_stringify_escapes_values() {
    let forest = vec![leaf(props! { "C" => ["hello]world\\"] })];
    let text = stringify_with_options(&forest, &StringifyOptions::compact());
    assert_eq!(text, "(;C[hello\\]world\\\\])");
    assert_eq!(parse(&text)[0].data.first("C"), Some("hello]world\\"));
}

#[test]
fn test_game_round_trip() {
    let forest = parse(GAME);
    for options in [
        StringifyOptions::default(),
        StringifyOptions::compact(),
        StringifyOptions::new().with_line_break("\r\n").with_indent("\t"),
    ] {
        let text = stringify_with_options(&forest, &options);
        assert!(forest_content_eq(&parse(&text), &forest), "{text}");
    }
}

#[test]
fn test_json_export() {
    let forest = parse("(;B[aa];W[bb])");
    let json = serde_json::to_value(&forest).unwrap();
    assert_eq!(json[0]["data"]["B"][0], "aa");
    assert_eq!(json[0]["children"][0]["id"], 1);

    let back: Vec<Node> = serde_json::from_value(json).unwrap();
    assert_eq!(back, forest);
}
