// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use super::Translator;
use crate::ast;
use crate::cst::{Node, NodeKind};
use crate::options::TranslateOptions;
use crate::source_map::SourceMap;
use crate::testing::TreeBuilder;
use pretty_assertions::assert_eq;
use stree_common::{Range, TranslateError};
use test_case::test_case;
use unindent::unindent;

fn assert_well_formed(tree: &ast::Node) {
    tree.walk(&mut |node| {
        if let Some(map) = &node.location {
            assert!(map.is_well_formed(), "malformed map on {node}: {map:?}");
        }
    });
}

fn translate_with(t: &TreeBuilder, root: &Node, options: &TranslateOptions) -> ast::Node {
    let buffer = t.buffer();
    let mut translator = Translator::new(&buffer, options);
    let tree = translator
        .translate_root(root)
        .unwrap()
        .expect("program has statements");
    assert_eq!(translator.depth(), 0);
    assert_well_formed(&tree);
    tree
}

fn translate(t: &TreeBuilder, root: &Node) -> ast::Node {
    translate_with(t, root, &TranslateOptions::default())
}

fn b(node: Node) -> Box<Node> {
    Box::new(node)
}

fn send_map(tree: &ast::Node) -> (Option<Range>, Option<Range>, Range) {
    match &tree.location {
        Some(SourceMap::Send {
            dot,
            selector,
            expression,
            ..
        }) => (*dot, *selector, *expression),
        other => panic!("expected a send map, got {other:?}"),
    }
}

#[test]
fn test_binary_operator_is_a_send() {
    let mut t = TreeBuilder::new("1 + 2");
    let one = t.int("1");
    let two = t.int("2");
    let sum = t.binary(one, "+", two);
    let root = t.program(vec![sum]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(send (int 1) :+ (int 2))");
    assert_eq!(
        send_map(&tree),
        (None, Some(Range::new(2, 3)), Range::new(0, 5))
    );
}

#[test]
fn test_rescue_modifier() {
    let mut t = TreeBuilder::new("foo.bar rescue nil");
    let foo = t.vcall("foo");
    let call = t.call(Some(foo), ".", "bar", vec![], false);
    let nil = t.var_ref("nil");
    let rescued = t.span(
        NodeKind::RescueMod {
            statement: b(call),
            value: b(nil),
        },
        0,
        18,
    );
    let root = t.program(vec![rescued]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(rescue (send (send nil :foo) :bar) (resbody nil nil (nil)) nil)"
    );
    let resbody = tree.child_node(1).unwrap();
    let Some(SourceMap::RescueBody {
        keyword,
        expression,
        ..
    }) = &resbody.location
    else {
        panic!("expected a rescue body map");
    };
    assert_eq!(*keyword, Some(Range::new(8, 14)));
    assert_eq!(*expression, Range::new(8, 18));
}

#[test]
fn test_trailing_comma_array_pattern() {
    let mut t = TreeBuilder::new("case foo; in [bar,]; end");
    let keyword = t.kw("case");
    let foo = t.vcall("foo");
    let bar = t.var_field("bar");
    let tail = t.tail_marker(18);
    let pattern = t.span(
        NodeKind::AryPtn {
            constant: None,
            requireds: vec![bar],
            rest: Some(b(tail)),
            posts: vec![],
        },
        13,
        19,
    );
    t.seek(19);
    let body = t.statements(vec![]);
    let clause = t.span(
        NodeKind::In {
            pattern: b(pattern),
            statements: b(body),
            consequent: None,
        },
        10,
        19,
    );
    let case = t.span(
        NodeKind::Case {
            keyword: b(keyword),
            value: Some(b(foo)),
            consequent: b(clause),
        },
        0,
        24,
    );
    let root = t.program(vec![case]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        concat!(
            "(case_match (send nil :foo) ",
            "(in_pattern (array_pattern_with_tail (match_var :bar)) nil nil) nil)"
        )
    );
    let pattern = tree.child_node(1).and_then(|clause| clause.child_node(0)).unwrap();
    assert_eq!(
        pattern.location,
        Some(SourceMap::collection(
            Some(Range::new(13, 14)),
            Some(Range::new(18, 19)),
            Range::new(13, 19),
        ))
    );
}

#[test]
fn test_nested_assignment_is_the_same_everywhere() {
    let mut t = TreeBuilder::new("a = b = c");
    let a = t.var_field("a");
    let b_ = t.var_field("b");
    let c = t.vcall("c");
    let inner = t.assign(b_, c);
    let outer = t.assign(a, inner);
    let root = t.program(vec![outer]);
    let statement = translate(&t, &root);
    assert_eq!(statement.to_string(), "(lvasgn :a (lvasgn :b (send nil :c)))");

    let mut t = TreeBuilder::new("def m(x = b = c); end");
    let keyword = t.kw("def");
    let name = t.token("m");
    let lparen = t.locate("(");
    let lparen = t.at(
        NodeKind::LParen {
            value: "(".to_string(),
        },
        lparen,
    );
    let x = t.token("x");
    let b_ = t.var_field("b");
    let c = t.vcall("c");
    let default = t.assign(b_, c);
    let params = t.span(
        NodeKind::Params {
            requireds: vec![],
            optionals: vec![(x, default)],
            rest: None,
            posts: vec![],
            keywords: vec![],
            keyword_rest: None,
            block: None,
        },
        6,
        15,
    );
    let paren = t.span(
        NodeKind::Paren {
            lparen: b(lparen),
            contents: Some(b(params)),
        },
        5,
        16,
    );
    t.seek(16);
    let body = t.body(vec![]);
    let def = t.span(
        NodeKind::DefNode {
            target: None,
            operator: None,
            name: b(name),
            params: Some(b(paren)),
            bodystmt: b(body),
        },
        keyword.start_char(),
        21,
    );
    let root = t.program(vec![def]);
    let method = translate(&t, &root);
    assert_eq!(
        method.to_string(),
        "(def :m (args (optarg :x (lvasgn :b (send nil :c)))) nil)"
    );

    let optarg = method
        .child_node(1)
        .and_then(|args| args.child_node(0))
        .unwrap();
    assert_eq!(
        optarg.location,
        Some(SourceMap::Variable {
            name: Some(Range::new(6, 7)),
            operator: Some(Range::new(8, 9)),
            expression: Range::new(6, 15),
        })
    );
}

#[test]
fn test_squiggly_heredoc_dedents_around_interpolation() {
    let mut t = TreeBuilder::new("<<~FOO\n  bar\n  #{baz}\nFOO");
    let opening = t.locate("<<~FOO");
    let beginning = t.at(
        NodeKind::HeredocBeg {
            value: "<<~FOO".to_string(),
        },
        opening,
    );
    let content = t.at(
        NodeKind::TStringContent {
            value: "  bar\n  ".to_string(),
        },
        Range::new(7, 15),
    );
    let baz = t.var_ref("baz");
    let statements = t.statements(vec![baz]);
    let embedded = t.span(
        NodeKind::StringEmbExpr {
            statements: b(statements),
        },
        15,
        21,
    );
    let newline = t.at(
        NodeKind::TStringContent {
            value: "\n".to_string(),
        },
        Range::new(21, 22),
    );
    let terminator = t.locate("FOO");
    let ending = t.at(
        NodeKind::HeredocEnd {
            value: "FOO".to_string(),
        },
        terminator,
    );
    let heredoc = t.span(
        NodeKind::Heredoc {
            beginning: b(beginning),
            ending: Some(b(ending)),
            dedent: 2,
            parts: vec![content, embedded, newline],
        },
        0,
        25,
    );
    let root = t.program(vec![heredoc]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        r#"(dstr (str "bar\n") (begin (lvar :baz)) (str "\n"))"#
    );
    assert_eq!(
        tree.location,
        Some(SourceMap::Heredoc {
            heredoc_body: Some(Range::new(7, 22)),
            heredoc_end: Some(Range::new(22, 25)),
            expression: Range::new(0, 6),
        })
    );
    let interpolation = tree.child_node(1).unwrap();
    assert_eq!(
        interpolation.location,
        Some(SourceMap::collection(
            Some(Range::new(15, 17)),
            Some(Range::new(20, 21)),
            Range::new(15, 21),
        ))
    );
}

#[test]
fn test_without_source_maps() {
    let mut t = TreeBuilder::new("foo.bar rescue nil");
    let foo = t.vcall("foo");
    let call = t.call(Some(foo), ".", "bar", vec![], false);
    let nil = t.var_ref("nil");
    let rescued = t.span(
        NodeKind::RescueMod {
            statement: b(call),
            value: b(nil),
        },
        0,
        18,
    );
    let root = t.program(vec![rescued]);

    let tree = translate_with(&t, &root, &TranslateOptions::without_source_maps());
    assert_eq!(
        tree.to_string(),
        "(rescue (send (send nil :foo) :bar) (resbody nil nil (nil)) nil)"
    );
    let mut located = 0;
    tree.walk(&mut |node| located += usize::from(node.location.is_some()));
    assert_eq!(located, 0);
}

#[test]
fn test_empty_program_translates_to_nothing() {
    let t = TreeBuilder::new("");
    let root = t.program(vec![]);
    let buffer = t.buffer();
    let options = TranslateOptions::default();
    let mut translator = Translator::new(&buffer, &options);
    assert_eq!(translator.translate_root(&root), Ok(None));
}

#[test]
fn test_failure_unwinds_the_ancestor_stack() {
    let t = TreeBuilder::new("x");
    let field = t.span(NodeKind::VarField { value: None }, 0, 1);
    let root = t.program(vec![field]);
    let buffer = t.buffer();
    let options = TranslateOptions::default();
    let mut translator = Translator::new(&buffer, &options);
    assert_eq!(
        translator.translate_root(&root),
        Err(TranslateError::MissingChild {
            node: "VarField",
            field: "value",
        })
    );
    assert_eq!(translator.depth(), 0);
}

#[test]
fn test_safe_navigation_call() {
    let mut t = TreeBuilder::new("foo&.bar(1)");
    let foo = t.vcall("foo");
    let one = t.locate_after(9, "1");
    let one = t.at(
        NodeKind::Int {
            value: "1".to_string(),
        },
        one,
    );
    let call = t.call(Some(foo), "&.", "bar", vec![one], true);
    let root = t.program(vec![call]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(csend (send nil :foo) :bar (int 1))");
    let Some(SourceMap::Send {
        dot, begin, end, ..
    }) = &tree.location
    else {
        panic!("expected a send map");
    };
    assert_eq!(
        (*dot, *begin, *end),
        (
            Some(Range::new(3, 5)),
            Some(Range::new(8, 9)),
            Some(Range::new(10, 11))
        )
    );
}

#[test]
fn test_command_with_trailing_hash_is_kwargs() {
    let mut t = TreeBuilder::new("puts 1, a: 2");
    let one = t.locate_after(5, "1");
    let one = t.at(
        NodeKind::Int {
            value: "1".to_string(),
        },
        one,
    );
    t.seek(6);
    let label = t.label("a:");
    let two = t.int("2");
    let assoc = t.span(
        NodeKind::Assoc {
            key: b(label),
            value: Some(b(two)),
        },
        8,
        12,
    );
    let hash = t.span(NodeKind::BareAssocHash { assocs: vec![assoc] }, 8, 12);
    t.seek(0);
    let command = t.command("puts", vec![one, hash]);
    let root = t.program(vec![command]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(send nil :puts (int 1) (kwargs (pair (sym :a) (int 2))))"
    );

    let options = TranslateOptions {
        emit_kwargs: false,
        ..TranslateOptions::default()
    };
    let tree = translate_with(&t, &root, &options);
    assert_eq!(
        tree.to_string(),
        "(send nil :puts (int 1) (hash (pair (sym :a) (int 2))))"
    );
}

#[test_case("-", "(send (send nil :a) :-@)"; "negation")]
#[test_case("!", "(send (send nil :a) :!)"; "not")]
#[test_case("~", "(send (send nil :a) :~)"; "complement")]
fn test_unary_operator(operator: &str, expected: &str) {
    let source = format!("{operator}a");
    let mut t = TreeBuilder::new(&source);
    let a = t.vcall("a");
    let unary = t.unary(operator, a);
    let root = t.program(vec![unary]);
    assert_eq!(translate(&t, &root).to_string(), expected);
}

#[test]
fn test_negative_literal_folds_sign() {
    let mut t = TreeBuilder::new("-1");
    let one = t.int("1");
    let unary = t.unary("-@", one);
    let root = t.program(vec![unary]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(int -1)");
    assert_eq!(
        tree.location,
        Some(SourceMap::operator(Some(Range::new(0, 1)), Range::new(0, 2)))
    );
}

#[test]
fn test_or_assign_instance_variable() {
    let mut t = TreeBuilder::new("@a ||= 1");
    let target = t.var_field("@a");
    let operator = t.op("||=");
    let one = t.int("1");
    let node = t.span(
        NodeKind::OpAssign {
            target: b(target),
            operator: b(operator),
            value: b(one),
        },
        0,
        8,
    );
    let root = t.program(vec![node]);
    assert_eq!(translate(&t, &root).to_string(), "(or_asgn (ivasgn :@a) (int 1))");
}

#[test]
fn test_multiple_assignment() {
    let mut t = TreeBuilder::new("a, b = 1, 2");
    let a = t.var_field("a");
    let b_ = t.var_field("b");
    let targets = t.span(
        NodeKind::MLHS {
            parts: vec![a, b_],
            comma: false,
        },
        0,
        4,
    );
    let one = t.int("1");
    let two = t.int("2");
    let values = t.span(NodeKind::MRHS { parts: vec![one, two] }, 7, 11);
    let node = t.span(
        NodeKind::MAssign {
            target: b(targets),
            value: b(values),
        },
        0,
        11,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(masgn (mlhs (lvasgn :a) (lvasgn :b)) (array (int 1) (int 2)))"
    );
    assert_eq!(
        tree.location,
        Some(SourceMap::operator(Some(Range::new(5, 6)), Range::new(0, 11)))
    );
}

#[test_case(true, "(index (send nil :a) (int 1))"; "index node")]
#[test_case(false, "(send (send nil :a) :[] (int 1))"; "element reference send")]
fn test_element_reference(emit_index: bool, expected: &str) {
    let mut t = TreeBuilder::new("a[1]");
    let a = t.vcall("a");
    let one = t.int("1");
    let index = t.span(NodeKind::Args { parts: vec![one] }, 2, 3);
    let node = t.span(
        NodeKind::ARef {
            collection: b(a),
            index: Some(b(index)),
        },
        0,
        4,
    );
    let root = t.program(vec![node]);
    let options = TranslateOptions {
        emit_index,
        ..TranslateOptions::default()
    };
    assert_eq!(translate_with(&t, &root, &options).to_string(), expected);
}

#[test_case("__FILE__", true, r#"(str "(test)")"#; "file as literal")]
#[test_case("__FILE__", false, "(__FILE__)"; "file node")]
#[test_case("__LINE__", true, "(int 2)"; "line as literal")]
#[test_case("__LINE__", false, "(__LINE__)"; "line node")]
#[test_case("__ENCODING__", true, "(const (const nil :Encoding) :UTF_8)"; "encoding constant")]
fn test_source_keywords(keyword: &str, literals: bool, expected: &str) {
    let source = format!("x\n{keyword}");
    let mut t = TreeBuilder::new(&source);
    t.seek(2);
    let node = t.var_ref(keyword);
    let root = t.program(vec![node]);
    let options = TranslateOptions {
        emit_file_line_as_literals: literals,
        ..TranslateOptions::default()
    };
    assert_eq!(translate_with(&t, &root, &options).to_string(), expected);
}

#[test]
fn test_hash_with_label_key() {
    let mut t = TreeBuilder::new("{a: 1}");
    let lbrace = t.locate("{");
    let lbrace = t.at(
        NodeKind::LBrace {
            value: "{".to_string(),
        },
        lbrace,
    );
    let key = t.label("a:");
    let one = t.int("1");
    let assoc = t.span(
        NodeKind::Assoc {
            key: b(key),
            value: Some(b(one)),
        },
        1,
        5,
    );
    let hash = t.span(
        NodeKind::HashLiteral {
            lbrace: b(lbrace),
            assocs: vec![assoc],
        },
        0,
        6,
    );
    let root = t.program(vec![hash]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(hash (pair (sym :a) (int 1)))");
    let pair = tree.child_node(0).unwrap();
    assert_eq!(
        pair.location,
        Some(SourceMap::operator(Some(Range::new(2, 3)), Range::new(1, 5)))
    );
}

#[test]
fn test_interpolated_string() {
    let mut t = TreeBuilder::new(r#""a#{b}c""#);
    let a = t.at(
        NodeKind::TStringContent {
            value: "a".to_string(),
        },
        Range::new(1, 2),
    );
    t.seek(4);
    let call = t.vcall("b");
    let statements = t.statements(vec![call]);
    let embedded = t.span(
        NodeKind::StringEmbExpr {
            statements: b(statements),
        },
        2,
        6,
    );
    let c = t.at(
        NodeKind::TStringContent {
            value: "c".to_string(),
        },
        Range::new(6, 7),
    );
    let string = t.span(
        NodeKind::StringLiteral {
            parts: vec![a, embedded, c],
            quote: "\"".to_string(),
        },
        0,
        8,
    );
    let root = t.program(vec![string]);
    assert_eq!(
        translate(&t, &root).to_string(),
        r#"(dstr (str "a") (begin (send nil :b)) (str "c"))"#
    );
}

#[test]
fn test_single_quoted_string_keeps_backslashes() {
    let mut t = TreeBuilder::new(r"'a\nb'");
    let string = t.string(r"'a\nb'");
    let root = t.program(vec![string]);
    assert_eq!(translate(&t, &root).to_string(), r#"(str "a\\nb")"#);
}

#[test]
fn test_regexp_options_are_sorted() {
    let mut t = TreeBuilder::new("/a/mi");
    let body = t.at(
        NodeKind::TStringContent {
            value: "a".to_string(),
        },
        Range::new(1, 2),
    );
    let regexp = t.span(
        NodeKind::RegexpLiteral {
            beginning: "/".to_string(),
            ending: "/mi".to_string(),
            parts: vec![body],
        },
        0,
        5,
    );
    let root = t.program(vec![regexp]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), r#"(regexp (str "a") (regopt :i :m))"#);
    assert_eq!(
        tree.location,
        Some(SourceMap::collection(
            Some(Range::new(0, 1)),
            Some(Range::new(2, 3)),
            Range::new(0, 5),
        ))
    );
}

#[test]
fn test_symbol_word_list() {
    let t = TreeBuilder::new("%i[a b]");
    let a = t.at(
        NodeKind::TStringContent {
            value: "a".to_string(),
        },
        Range::new(3, 4),
    );
    let b_ = t.at(
        NodeKind::TStringContent {
            value: "b".to_string(),
        },
        Range::new(5, 6),
    );
    let words = t.span(
        NodeKind::QSymbols {
            beginning: "%i[".to_string(),
            elements: vec![a, b_],
        },
        0,
        7,
    );
    let root = t.program(vec![words]);
    assert_eq!(translate(&t, &root).to_string(), "(array (sym :a) (sym :b))");
}

#[test]
fn test_modifier_if() {
    let mut t = TreeBuilder::new("foo if bar");
    let foo = t.vcall("foo");
    let statements = t.statements(vec![foo]);
    let bar = t.vcall("bar");
    let node = t.span(
        NodeKind::IfNode {
            predicate: b(bar),
            statements: b(statements),
            consequent: None,
        },
        0,
        10,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(if (send nil :bar) (send nil :foo) nil)");
    assert_eq!(
        tree.location,
        Some(SourceMap::keyword(Range::new(4, 6), None, None, Range::new(0, 10)))
    );
}

#[test]
fn test_range_condition_is_a_flip_flop() {
    let mut t = TreeBuilder::new("foo if a..b");
    let foo = t.vcall("foo");
    let statements = t.statements(vec![foo]);
    let a = t.vcall("a");
    let operator = t.op("..");
    let b_ = t.vcall("b");
    let range = t.span(
        NodeKind::RangeNode {
            left: Some(b(a)),
            operator: b(operator),
            right: Some(b(b_)),
        },
        7,
        11,
    );
    let node = t.span(
        NodeKind::IfNode {
            predicate: b(range),
            statements: b(statements),
            consequent: None,
        },
        0,
        11,
    );
    let root = t.program(vec![node]);
    assert_eq!(
        translate(&t, &root).to_string(),
        "(if (iflipflop (send nil :a) (send nil :b)) (send nil :foo) nil)"
    );
}

#[test]
fn test_if_then_else() {
    let mut t = TreeBuilder::new("if a then 1 else 2 end");
    let a = t.vcall("a");
    let one = t.int("1");
    let truthy = t.statements(vec![one]);
    let keyword = t.kw("else");
    let two = t.int("2");
    let falsy = t.statements(vec![two]);
    let else_clause = t.span(
        NodeKind::Else {
            keyword: b(keyword),
            statements: b(falsy),
        },
        12,
        18,
    );
    let node = t.span(
        NodeKind::IfNode {
            predicate: b(a),
            statements: b(truthy),
            consequent: Some(b(else_clause)),
        },
        0,
        22,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(if (send nil :a) (int 1) (int 2))");
    assert_eq!(
        tree.location,
        Some(SourceMap::Condition {
            keyword: Some(Range::new(0, 2)),
            begin: Some(Range::new(5, 9)),
            else_: Some(Range::new(12, 16)),
            end: Some(Range::new(19, 22)),
            expression: Range::new(0, 22),
        })
    );
}

#[test]
fn test_ternary() {
    let mut t = TreeBuilder::new("a ? 1 : 2");
    let a = t.vcall("a");
    let one = t.int("1");
    let two = t.int("2");
    let node = t.span(
        NodeKind::IfOp {
            predicate: b(a),
            truthy: b(one),
            falsy: b(two),
        },
        0,
        9,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(if (send nil :a) (int 1) (int 2))");
    assert_eq!(
        tree.location,
        Some(SourceMap::Ternary {
            question: Some(Range::new(2, 3)),
            colon: Some(Range::new(6, 7)),
            expression: Range::new(0, 9),
        })
    );
}

#[test]
fn test_begin_rescue_ensure() {
    let source = unindent(
        "
        begin
          a
        rescue Foo => e
          b
        ensure
          c
        end
        ",
    );
    let mut t = TreeBuilder::new(&source);
    let a = t.vcall("a");
    let statements = t.statements(vec![a]);
    let rescue_keyword = t.kw("rescue");
    let foo = t.var_ref("Foo");
    let e = t.var_field("e");
    let exception = t.span(
        NodeKind::RescueEx {
            exceptions: Some(b(foo)),
            variable: Some(b(e)),
        },
        17,
        25,
    );
    let handler = t.vcall("b");
    let handler_body = t.statements(vec![handler]);
    let rescue = t.span(
        NodeKind::Rescue {
            keyword: b(rescue_keyword),
            exception: Some(b(exception)),
            statements: b(handler_body),
            consequent: None,
        },
        10,
        29,
    );
    let ensure_keyword = t.kw("ensure");
    let c = t.vcall("c");
    let ensure_body = t.statements(vec![c]);
    let ensure = t.span(
        NodeKind::Ensure {
            keyword: b(ensure_keyword),
            statements: b(ensure_body),
        },
        30,
        40,
    );
    let bodystmt = t.span(
        NodeKind::BodyStmt {
            statements: b(statements),
            rescue_clause: Some(b(rescue)),
            else_keyword: None,
            else_clause: None,
            ensure_clause: Some(b(ensure)),
        },
        8,
        40,
    );
    let end = t.locate("end");
    let node = t.span(
        NodeKind::Begin {
            bodystmt: b(bodystmt),
        },
        0,
        end.end_char,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        concat!(
            "(kwbegin (ensure (rescue (send nil :a) ",
            "(resbody (array (const nil :Foo)) (lvasgn :e) (send nil :b)) nil) ",
            "(send nil :c)))"
        )
    );
    let resbody = tree
        .child_node(0)
        .and_then(|ensure| ensure.child_node(0))
        .and_then(|rescue| rescue.child_node(1))
        .unwrap();
    assert_eq!(
        resbody.location,
        Some(SourceMap::RescueBody {
            keyword: Some(Range::new(10, 16)),
            assoc: Some(Range::new(21, 23)),
            begin: None,
            expression: Range::new(10, 29),
        })
    );
}

#[test]
fn test_method_with_every_parameter_kind() {
    let mut t = TreeBuilder::new("def m(a, b = 1, *c, d:, e: 2, **f, &g); end");
    let keyword = t.kw("def");
    let name = t.token("m");
    let lparen = t.locate("(");
    let lparen = t.at(
        NodeKind::LParen {
            value: "(".to_string(),
        },
        lparen,
    );
    let a = t.token("a");
    let b_ = t.token("b");
    let one = t.int("1");
    let star = t.locate("*");
    let c = t.token("c");
    let rest = t.span(NodeKind::RestParam { name: Some(b(c)) }, star.start_char, 18);
    let d = t.label("d:");
    let e = t.label("e:");
    let two = t.int("2");
    let stars = t.locate("**");
    let f = t.token("f");
    let keyword_rest = t.span(NodeKind::KwRestParam { name: Some(b(f)) }, stars.start_char, 33);
    let amp = t.locate("&");
    let g = t.token("g");
    let block = t.span(NodeKind::BlockArg { name: Some(b(g)) }, amp.start_char, 37);
    let params = t.span(
        NodeKind::Params {
            requireds: vec![a],
            optionals: vec![(b_, one)],
            rest: Some(b(rest)),
            posts: vec![],
            keywords: vec![(d, None), (e, Some(two))],
            keyword_rest: Some(b(keyword_rest)),
            block: Some(b(block)),
        },
        6,
        37,
    );
    let paren = t.span(
        NodeKind::Paren {
            lparen: b(lparen),
            contents: Some(b(params)),
        },
        5,
        38,
    );
    t.seek(38);
    let body = t.body(vec![]);
    let def = t.span(
        NodeKind::DefNode {
            target: None,
            operator: None,
            name: b(name),
            params: Some(b(paren)),
            bodystmt: b(body),
        },
        keyword.start_char(),
        43,
    );
    let root = t.program(vec![def]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        concat!(
            "(def :m (args (arg :a) (optarg :b (int 1)) (restarg :c) ",
            "(kwarg :d) (kwoptarg :e (int 2)) (kwrestarg :f) (blockarg :g)) nil)"
        )
    );
    let args = tree.child_node(1).unwrap();
    assert_eq!(
        args.location,
        Some(SourceMap::collection(
            Some(Range::new(5, 6)),
            Some(Range::new(37, 38)),
            Range::new(5, 38),
        ))
    );
    let Some(SourceMap::MethodDefinition {
        keyword, name, end, ..
    }) = &tree.location
    else {
        panic!("expected a method definition map");
    };
    assert_eq!(
        (*keyword, *name, *end),
        (
            Some(Range::new(0, 3)),
            Some(Range::new(4, 5)),
            Some(Range::new(40, 43))
        )
    );
}

#[test]
fn test_class_with_superclass() {
    let mut t = TreeBuilder::new("class Foo < Bar; end");
    let name = t.token("Foo");
    let constant = t.span(NodeKind::ConstRef { constant: b(name) }, 6, 9);
    let superclass = t.var_ref("Bar");
    t.seek(15);
    let body = t.body(vec![]);
    let class = t.span(
        NodeKind::ClassDeclaration {
            constant: b(constant),
            superclass: Some(b(superclass)),
            bodystmt: b(body),
        },
        0,
        20,
    );
    let root = t.program(vec![class]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(class (const nil :Foo) (const nil :Bar) nil)"
    );
    let Some(SourceMap::Definition {
        keyword, operator, ..
    }) = &tree.location
    else {
        panic!("expected a definition map");
    };
    assert_eq!(
        (*keyword, *operator),
        (Some(Range::new(0, 5)), Some(Range::new(10, 11)))
    );
}

#[test]
fn test_block_with_single_parameter() {
    let mut t = TreeBuilder::new("foo { |x| x }");
    let call = t.call(None, ".", "foo", vec![], false);
    let opening = t.locate("{");
    let opening = t.at(
        NodeKind::LBrace {
            value: "{".to_string(),
        },
        opening,
    );
    let x = t.token("x");
    let params = t.span(
        NodeKind::Params {
            requireds: vec![x],
            optionals: vec![],
            rest: None,
            posts: vec![],
            keywords: vec![],
            keyword_rest: None,
            block: None,
        },
        7,
        8,
    );
    let block_var = t.span(
        NodeKind::BlockVar {
            params: b(params),
            locals: vec![],
        },
        6,
        9,
    );
    let reference = t.var_ref("x");
    let body = t.body(vec![reference]);
    let block = t.span(
        NodeKind::BlockNode {
            opening: b(opening),
            block_var: Some(b(block_var)),
            bodystmt: b(body),
        },
        4,
        13,
    );
    let node = t.span(
        NodeKind::MethodAddBlock {
            call: b(call),
            block: b(block),
        },
        0,
        13,
    );
    let root = t.program(vec![node]);
    assert_eq!(
        translate(&t, &root).to_string(),
        "(block (send nil :foo) (args (procarg0 (arg :x))) (lvar :x))"
    );
}

#[test]
fn test_numbered_parameters_make_a_numblock() {
    let mut t = TreeBuilder::new("foo { _1 }");
    let call = t.call(None, ".", "foo", vec![], false);
    let opening = t.locate("{");
    let opening = t.at(
        NodeKind::LBrace {
            value: "{".to_string(),
        },
        opening,
    );
    let reference = t.var_ref("_1");
    let body = t.body(vec![reference]);
    let block = t.span(
        NodeKind::BlockNode {
            opening: b(opening),
            block_var: None,
            bodystmt: b(body),
        },
        4,
        10,
    );
    let node = t.span(
        NodeKind::MethodAddBlock {
            call: b(call),
            block: b(block),
        },
        0,
        10,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(numblock (send nil :foo) 1 (lvar :_1))");
    assert_eq!(
        tree.location,
        Some(SourceMap::collection(
            Some(Range::new(4, 5)),
            Some(Range::new(9, 10)),
            Range::new(0, 10),
        ))
    );
}

#[test]
fn test_pattern_alternatives() {
    let mut t = TreeBuilder::new("case 1; in 1 | 2; end");
    let keyword = t.kw("case");
    let subject = t.int("1");
    let left = t.int("1");
    let right = t.int("2");
    let alternatives = t.binary(left, "|", right);
    let body = t.statements(vec![]);
    let clause = t.span(
        NodeKind::In {
            pattern: b(alternatives),
            statements: b(body),
            consequent: None,
        },
        8,
        16,
    );
    let case = t.span(
        NodeKind::Case {
            keyword: b(keyword),
            value: Some(b(subject)),
            consequent: b(clause),
        },
        0,
        21,
    );
    let root = t.program(vec![case]);
    assert_eq!(
        translate(&t, &root).to_string(),
        "(case_match (int 1) (in_pattern (match_alt (int 1) (int 2)) nil nil) nil)"
    );
}

#[test]
fn test_pattern_guard() {
    let mut t = TreeBuilder::new("case 1; in x if y; end");
    let keyword = t.kw("case");
    let subject = t.int("1");
    let x = t.var_field("x");
    let guarded = t.statements(vec![x]);
    let y = t.vcall("y");
    let guard = t.span(
        NodeKind::IfNode {
            predicate: b(y),
            statements: b(guarded),
            consequent: None,
        },
        11,
        17,
    );
    let body = t.statements(vec![]);
    let clause = t.span(
        NodeKind::In {
            pattern: b(guard),
            statements: b(body),
            consequent: None,
        },
        8,
        17,
    );
    let case = t.span(
        NodeKind::Case {
            keyword: b(keyword),
            value: Some(b(subject)),
            consequent: b(clause),
        },
        0,
        22,
    );
    let root = t.program(vec![case]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(case_match (int 1) (in_pattern (match_var :x) (if_guard (send nil :y)) nil) nil)"
    );
    let guard = tree.child_node(1).and_then(|clause| clause.child_node(1)).unwrap();
    assert_eq!(
        guard.location,
        Some(SourceMap::keyword(Range::new(13, 15), None, None, Range::new(13, 17)))
    );
}

#[test]
fn test_rightward_hash_pattern() {
    let mut t = TreeBuilder::new("x => {a:}");
    let x = t.vcall("x");
    let operator = t.op("=>");
    let key = t.label("a:");
    let pattern = t.span(
        NodeKind::HshPtn {
            constant: None,
            keywords: vec![(key, None)],
            keyword_rest: None,
        },
        5,
        9,
    );
    let node = t.span(
        NodeKind::RAssign {
            value: b(x),
            operator: b(operator),
            pattern: b(pattern),
        },
        0,
        9,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(match_pattern (send nil :x) (hash_pattern (match_var :a)))"
    );
    let binding = tree.child_node(1).and_then(|pattern| pattern.child_node(0)).unwrap();
    assert_eq!(
        binding.location,
        Some(SourceMap::variable(Range::new(6, 7), Range::new(6, 8)))
    );
}

#[test]
fn test_assignment_outside_pattern_is_not_a_binding() {
    let mut t = TreeBuilder::new("case 1; in Integer; x = 2; end");
    let keyword = t.kw("case");
    let subject = t.int("1");
    let pattern = t.var_ref("Integer");
    let x = t.var_field("x");
    let two = t.int("2");
    let assignment = t.assign(x, two);
    let body = t.statements(vec![assignment]);
    let clause = t.span(
        NodeKind::In {
            pattern: b(pattern),
            statements: b(body),
            consequent: None,
        },
        8,
        25,
    );
    let case = t.span(
        NodeKind::Case {
            keyword: b(keyword),
            value: Some(b(subject)),
            consequent: b(clause),
        },
        0,
        30,
    );
    let root = t.program(vec![case]);
    assert_eq!(
        translate(&t, &root).to_string(),
        "(case_match (int 1) (in_pattern (const nil :Integer) nil (lvasgn :x (int 2))) nil)"
    );
}

#[test_case("if a then b end", Some(Range::new(5, 9)); "then on the head line")]
#[test_case("if a\nthen b\nend", Some(Range::new(5, 9)); "then on its own line")]
#[test_case("if a # then\n  b\nend", None; "then inside a comment")]
fn test_if_then_keyword(source: &str, then: Option<Range>) {
    let mut t = TreeBuilder::new(source);
    let a = t.vcall("a");
    let call = t.vcall("b");
    let truthy = t.statements(vec![call]);
    let len = source.len();
    let node = t.span(
        NodeKind::IfNode {
            predicate: b(a),
            statements: b(truthy),
            consequent: None,
        },
        0,
        len,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(if (send nil :a) (send nil :b) nil)");
    assert_eq!(
        tree.location,
        Some(SourceMap::Condition {
            keyword: Some(Range::new(0, 2)),
            begin: then,
            else_: None,
            end: Some(Range::new(len - 3, len)),
            expression: Range::new(0, len),
        })
    );
}

#[test_case("while", "while a do b end", Some(Range::new(8, 10)); "while with do")]
#[test_case("while", "while a # done\n  b\nend", None; "while with a look-alike comment")]
#[test_case("until", "until a do b end", Some(Range::new(8, 10)); "until with do")]
#[test_case("until", "until a # do\n  b\nend", None; "until with do inside a comment")]
fn test_loop_do_keyword(keyword: &str, source: &str, begin: Option<Range>) {
    let mut t = TreeBuilder::new(source);
    let a = t.vcall("a");
    let call = t.vcall("b");
    let body = t.statements(vec![call]);
    let len = source.len();
    let kind = if keyword == "until" {
        NodeKind::UntilNode {
            predicate: b(a),
            statements: b(body),
        }
    } else {
        NodeKind::WhileNode {
            predicate: b(a),
            statements: b(body),
        }
    };
    let node = t.span(kind, 0, len);
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        format!("({keyword} (send nil :a) (send nil :b))")
    );
    assert_eq!(
        tree.location,
        Some(SourceMap::keyword(
            Range::new(0, 5),
            begin,
            Some(Range::new(len - 3, len)),
            Range::new(0, len),
        ))
    );
}

#[test_case("for x in y do foo end", Some(Range::new(11, 13)); "with do")]
#[test_case("for x in y # do it\n  foo\nend", None; "do inside a comment")]
fn test_for_loop_map(source: &str, begin: Option<Range>) {
    let mut t = TreeBuilder::new(source);
    let index = t.var_field("x");
    let collection = t.vcall("y");
    let foo = t.vcall("foo");
    let body = t.statements(vec![foo]);
    let len = source.len();
    let node = t.span(
        NodeKind::For {
            index: b(index),
            collection: b(collection),
            statements: b(body),
        },
        0,
        len,
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(for (lvasgn :x) (send nil :y) (send nil :foo))"
    );
    assert_eq!(
        tree.location,
        Some(SourceMap::For {
            keyword: Some(Range::new(0, 3)),
            in_: Some(Range::new(6, 8)),
            begin,
            end: Some(Range::new(len - 3, len)),
            expression: Range::new(0, len),
        })
    );
}

#[test_case("case x\nwhen 1 then a\nend", Some(Range::new(14, 18)); "with then")]
#[test_case("case x\nwhen 1\n  a\nend", None; "body on the next line")]
#[test_case("case x\nwhen 1 # then\n  a\nend", None; "then inside a comment")]
fn test_when_clause_map(source: &str, then: Option<Range>) {
    let mut t = TreeBuilder::new(source);
    let keyword = t.kw("case");
    let subject = t.vcall("x");
    let one = t.int("1");
    let arguments = t.at(NodeKind::Args { parts: vec![one] }, Range::new(12, 13));
    let a = t.vcall("a");
    let body_end = a.end_char();
    let body = t.statements(vec![a]);
    let clause = t.span(
        NodeKind::When {
            arguments: b(arguments),
            statements: b(body),
            consequent: None,
        },
        7,
        body_end,
    );
    let len = source.len();
    let case = t.span(
        NodeKind::Case {
            keyword: b(keyword),
            value: Some(b(subject)),
            consequent: b(clause),
        },
        0,
        len,
    );
    let root = t.program(vec![case]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(case (send nil :x) (when (int 1) (send nil :a)) nil)"
    );
    assert_eq!(
        tree.location,
        Some(SourceMap::Condition {
            keyword: Some(Range::new(0, 4)),
            begin: None,
            else_: None,
            end: Some(Range::new(len - 3, len)),
            expression: Range::new(0, len),
        })
    );
    assert_eq!(
        tree.child_node(1).and_then(|when| when.location.clone()),
        Some(SourceMap::keyword(
            Range::new(7, 11),
            then,
            None,
            Range::new(7, body_end),
        ))
    );
}

#[test_case("case x\nin Integer then a\nend", Some(Range::new(18, 22)); "with then")]
#[test_case("case x\nin Integer # then\n  a\nend", None; "then inside a comment")]
fn test_in_clause_map(source: &str, then: Option<Range>) {
    let mut t = TreeBuilder::new(source);
    let keyword = t.kw("case");
    let subject = t.vcall("x");
    let pattern = t.var_ref("Integer");
    let a = t.vcall("a");
    let body_end = a.end_char();
    let body = t.statements(vec![a]);
    let clause = t.span(
        NodeKind::In {
            pattern: b(pattern),
            statements: b(body),
            consequent: None,
        },
        7,
        body_end,
    );
    let len = source.len();
    let case = t.span(
        NodeKind::Case {
            keyword: b(keyword),
            value: Some(b(subject)),
            consequent: b(clause),
        },
        0,
        len,
    );
    let root = t.program(vec![case]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(case_match (send nil :x) (in_pattern (const nil :Integer) nil (send nil :a)) nil)"
    );
    assert_eq!(
        tree.child_node(1).and_then(|clause| clause.location.clone()),
        Some(SourceMap::keyword(
            Range::new(7, 9),
            then,
            None,
            Range::new(7, body_end),
        ))
    );
}

#[test_case("begin\n  a\nrescue Foo then b\nend", Some(Range::new(21, 25)); "with then")]
#[test_case("begin\n  a\nrescue Foo # then\n  b\nend", None; "then inside a comment")]
fn test_rescue_body_then_keyword(source: &str, then: Option<Range>) {
    let mut t = TreeBuilder::new(source);
    let a = t.vcall("a");
    let statements = t.statements(vec![a]);
    let rescue_keyword = t.kw("rescue");
    let foo = t.var_ref("Foo");
    let foo_range = foo.range();
    let exception = t.at(
        NodeKind::RescueEx {
            exceptions: Some(b(foo)),
            variable: None,
        },
        foo_range,
    );
    let handler = t.vcall("b");
    let handler_end = handler.end_char();
    let handler_body = t.statements(vec![handler]);
    let rescue = t.span(
        NodeKind::Rescue {
            keyword: b(rescue_keyword),
            exception: Some(b(exception)),
            statements: b(handler_body),
            consequent: None,
        },
        10,
        handler_end,
    );
    let bodystmt = t.span(
        NodeKind::BodyStmt {
            statements: b(statements),
            rescue_clause: Some(b(rescue)),
            else_keyword: None,
            else_clause: None,
            ensure_clause: None,
        },
        8,
        handler_end,
    );
    let node = t.span(
        NodeKind::Begin {
            bodystmt: b(bodystmt),
        },
        0,
        source.len(),
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(
        tree.to_string(),
        "(kwbegin (rescue (send nil :a) (resbody (array (const nil :Foo)) nil (send nil :b)) nil))"
    );
    let resbody = tree
        .child_node(0)
        .and_then(|rescue| rescue.child_node(1))
        .unwrap();
    assert_eq!(
        resbody.location,
        Some(SourceMap::RescueBody {
            keyword: Some(Range::new(10, 16)),
            assoc: None,
            begin: then,
            expression: Range::new(10, handler_end),
        })
    );
}

#[test_case("->(x) do x end", Range::new(6, 8), Range::new(11, 14); "do block")]
#[test_case("->(x) { x }", Range::new(6, 7), Range::new(10, 11); "brace block")]
fn test_lambda_map(source: &str, begin: Range, end: Range) {
    let mut t = TreeBuilder::new(source);
    let lparen = t.locate("(");
    let lparen = t.at(
        NodeKind::LParen {
            value: "(".to_string(),
        },
        lparen,
    );
    let x = t.token("x");
    let params = t.span(
        NodeKind::Params {
            requireds: vec![x],
            optionals: vec![],
            rest: None,
            posts: vec![],
            keywords: vec![],
            keyword_rest: None,
            block: None,
        },
        3,
        4,
    );
    let paren = t.span(
        NodeKind::Paren {
            lparen: b(lparen),
            contents: Some(b(params)),
        },
        2,
        5,
    );
    let reference = t.var_ref("x");
    let body = t.statements(vec![reference]);
    let node = t.span(
        NodeKind::Lambda {
            params: b(paren),
            statements: b(body),
        },
        0,
        source.len(),
    );
    let root = t.program(vec![node]);

    let tree = translate(&t, &root);
    assert_eq!(tree.to_string(), "(block (lambda) (args (arg :x)) (lvar :x))");
    assert_eq!(
        tree.location,
        Some(SourceMap::collection(
            Some(begin),
            Some(end),
            Range::new(0, source.len()),
        ))
    );
    assert_eq!(
        tree.child_node(1).and_then(|args| args.location.clone()),
        Some(SourceMap::collection(
            Some(Range::new(2, 3)),
            Some(Range::new(4, 5)),
            Range::new(2, 5),
        ))
    );
}
