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

//! The origin concrete syntax tree, as handed over by the parser.
//!
//! The tree keeps every delimiter the parser saw as either a token child or a
//! location boundary. The translator borrows it and never mutates it.

use stree_common::{Location, Range};
use strum::IntoStaticStr;

/// A comment attached to a node by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text including the leading `#`
    pub value: String,
    /// Whether the comment trails code on the same line
    pub inline: bool,
    pub location: Location,
}

/// One node of the origin tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What this node is, and its children
    pub kind: NodeKind,
    /// Where the node sits in the source buffer
    pub location: Location,
    /// Comments the parser attached to this node
    pub comments: Vec<Comment>,
}

/// The closed set of origin node variants.
///
/// Token variants (`Ident`, `Kw`, `Op`, ...) carry the raw source text of the
/// token. Composite variants hold their children in source order.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum NodeKind {
    // Program structure
    Program {
        statements: Box<Node>,
    },
    Statements {
        body: Vec<Node>,
    },
    /// An empty statement, e.g. between two semicolons
    VoidStmt,
    /// The body of a `def`, `class`, `begin`, ... with its rescue/else/ensure clauses
    BodyStmt {
        statements: Box<Node>,
        rescue_clause: Option<Box<Node>>,
        else_keyword: Option<Box<Node>>,
        else_clause: Option<Box<Node>>,
        ensure_clause: Option<Box<Node>>,
    },
    Begin {
        bodystmt: Box<Node>,
    },
    Paren {
        lparen: Box<Node>,
        contents: Option<Box<Node>>,
    },
    /// `BEGIN { ... }`
    BeginBlock {
        lbrace: Box<Node>,
        statements: Box<Node>,
    },
    /// `END { ... }`
    EndBlock {
        lbrace: Box<Node>,
        statements: Box<Node>,
    },
    /// Everything after `__END__`
    EndContent {
        value: String,
    },
    Comment {
        value: String,
        inline: bool,
    },
    /// `=begin` ... `=end`
    EmbDoc {
        value: String,
    },

    // Tokens
    Ident {
        value: String,
    },
    Const {
        value: String,
    },
    IVar {
        value: String,
    },
    CVar {
        value: String,
    },
    GVar {
        value: String,
    },
    /// `$&`, `$1`, ...
    Backref {
        value: String,
    },
    Kw {
        value: String,
    },
    Op {
        value: String,
    },
    Period {
        value: String,
    },
    /// `foo:` including the colon
    Label {
        value: String,
    },
    /// The closing `":` of a quoted label
    LabelEnd {
        value: String,
    },
    Backtick {
        value: String,
    },
    /// Raw, unescaped text between string delimiters
    TStringContent {
        value: String,
    },
    TStringBeg {
        value: String,
    },
    TStringEnd {
        value: String,
    },
    SymBeg {
        value: String,
    },
    LParen {
        value: String,
    },
    LBrace {
        value: String,
    },
    LBracket {
        value: String,
    },
    HeredocBeg {
        value: String,
    },
    /// The terminator line, including its trailing newline when present
    HeredocEnd {
        value: String,
    },
    EmbExprBeg {
        value: String,
    },
    EmbExprEnd {
        value: String,
    },
    TLambda {
        value: String,
    },
    TLamBeg {
        value: String,
    },
    Comma {
        value: String,
    },

    // Literals
    /// Integer literal text, possibly signed, e.g. `-0x1f`
    Int {
        value: String,
    },
    FloatLiteral {
        value: String,
    },
    RationalLiteral {
        value: String,
    },
    Imaginary {
        value: String,
    },
    /// `?a`, including the question mark
    Char {
        value: String,
    },
    /// `quote` is the opening delimiter: `"`, `'`, `%q{`, `%Q(`, `%(`
    StringLiteral {
        parts: Vec<Node>,
        quote: String,
    },
    /// Adjacent string literals, `"a" "b"`
    StringConcat {
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `#{...}` inside a string-like literal
    StringEmbExpr {
        statements: Box<Node>,
    },
    /// `#@ivar`, `#$gvar`, `#@@cvar` inside a string-like literal
    StringDVar {
        variable: Box<Node>,
    },
    XStringLiteral {
        parts: Vec<Node>,
    },
    Heredoc {
        beginning: Box<Node>,
        ending: Option<Box<Node>>,
        /// Common indentation to strip, computed by the parser for `<<~` heredocs
        dedent: usize,
        parts: Vec<Node>,
    },
    SymbolLiteral {
        value: Box<Node>,
    },
    /// `:"..."`, `%s(...)` or a quoted hash label; `quote` is the opening delimiter
    DynaSymbol {
        parts: Vec<Node>,
        quote: Option<String>,
    },
    RegexpLiteral {
        beginning: String,
        /// Closing delimiter followed by any option letters, e.g. `/im`
        ending: String,
        parts: Vec<Node>,
    },
    ArrayLiteral {
        lbracket: Option<Box<Node>>,
        contents: Option<Box<Node>>,
    },
    /// `%w[...]`
    QWords {
        beginning: String,
        elements: Vec<Node>,
    },
    /// `%W[...]`
    Words {
        beginning: String,
        elements: Vec<Node>,
    },
    /// `%i[...]`
    QSymbols {
        beginning: String,
        elements: Vec<Node>,
    },
    /// `%I[...]`
    Symbols {
        beginning: String,
        elements: Vec<Node>,
    },
    /// One element of a `%W` or `%I` literal
    Word {
        parts: Vec<Node>,
    },
    HashLiteral {
        lbrace: Box<Node>,
        assocs: Vec<Node>,
    },
    /// A hash written without braces, e.g. trailing call arguments
    BareAssocHash {
        assocs: Vec<Node>,
    },
    Assoc {
        key: Box<Node>,
        value: Option<Box<Node>>,
    },
    AssocSplat {
        value: Option<Box<Node>>,
    },
    RangeNode {
        left: Option<Box<Node>>,
        operator: Box<Node>,
        right: Option<Box<Node>>,
    },

    // Variables
    VarRef {
        value: Box<Node>,
    },
    /// The target of an assignment or a pattern binding; `None` is an anonymous splat
    VarField {
        value: Option<Box<Node>>,
    },
    PinnedVarRef {
        value: Box<Node>,
    },
    /// An identifier that can only be a method call
    VCall {
        value: Box<Node>,
    },
    ConstPathRef {
        parent: Box<Node>,
        constant: Box<Node>,
    },
    ConstPathField {
        parent: Box<Node>,
        constant: Box<Node>,
    },
    TopConstRef {
        constant: Box<Node>,
    },
    TopConstField {
        constant: Box<Node>,
    },
    ConstRef {
        constant: Box<Node>,
    },
    Field {
        parent: Box<Node>,
        operator: Box<Node>,
        name: Box<Node>,
    },
    ARef {
        collection: Box<Node>,
        index: Option<Box<Node>>,
    },
    ARefField {
        collection: Box<Node>,
        index: Option<Box<Node>>,
    },

    // Assignment
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
    OpAssign {
        target: Box<Node>,
        operator: Box<Node>,
        value: Box<Node>,
    },
    MAssign {
        target: Box<Node>,
        value: Box<Node>,
    },
    MLHS {
        parts: Vec<Node>,
        /// Whether a trailing comma follows the last part
        comma: bool,
    },
    MLHSParen {
        contents: Box<Node>,
        comma: bool,
    },
    MRHS {
        parts: Vec<Node>,
    },

    // Calls
    /// `recv.msg(args)`, `msg(args)` and `recv.()`; `message` is `None` for the latter
    CallNode {
        receiver: Option<Box<Node>>,
        operator: Option<Box<Node>>,
        message: Option<Box<Node>>,
        arguments: Option<Box<Node>>,
    },
    /// `msg args` without parentheses
    Command {
        message: Box<Node>,
        arguments: Box<Node>,
        block: Option<Box<Node>>,
    },
    /// `recv.msg args` without parentheses
    CommandCall {
        receiver: Box<Node>,
        operator: Box<Node>,
        message: Box<Node>,
        arguments: Option<Box<Node>>,
        block: Option<Box<Node>>,
    },
    ArgParen {
        arguments: Option<Box<Node>>,
    },
    Args {
        parts: Vec<Node>,
    },
    ArgBlock {
        value: Option<Box<Node>>,
    },
    ArgStar {
        value: Option<Box<Node>>,
    },
    /// `...`
    ArgsForward,
    MethodAddBlock {
        call: Box<Node>,
        block: Box<Node>,
    },
    /// `{ |x| ... }` or `do |x| ... end`; `opening` is the `{` or `do` token
    BlockNode {
        opening: Box<Node>,
        block_var: Option<Box<Node>>,
        bodystmt: Box<Node>,
    },
    BlockVar {
        params: Box<Node>,
        locals: Vec<Node>,
    },
    Lambda {
        params: Box<Node>,
        statements: Box<Node>,
    },
    LambdaVar {
        params: Box<Node>,
        locals: Vec<Node>,
    },
    Super {
        arguments: Box<Node>,
    },
    ZSuper,
    YieldNode {
        arguments: Option<Box<Node>>,
    },
    /// Operands of a binary operator; the operator itself is not located by the parser
    Binary {
        left: Box<Node>,
        operator: String,
        right: Box<Node>,
    },
    Unary {
        operator: String,
        statement: Box<Node>,
    },
    Not {
        statement: Option<Box<Node>>,
        parentheses: bool,
    },
    Defined {
        value: Box<Node>,
    },

    // Control flow
    IfNode {
        predicate: Box<Node>,
        statements: Box<Node>,
        consequent: Option<Box<Node>>,
    },
    UnlessNode {
        predicate: Box<Node>,
        statements: Box<Node>,
        consequent: Option<Box<Node>>,
    },
    Elsif {
        predicate: Box<Node>,
        statements: Box<Node>,
        consequent: Option<Box<Node>>,
    },
    Else {
        keyword: Box<Node>,
        statements: Box<Node>,
    },
    /// `predicate ? truthy : falsy`
    IfOp {
        predicate: Box<Node>,
        truthy: Box<Node>,
        falsy: Box<Node>,
    },
    WhileNode {
        predicate: Box<Node>,
        statements: Box<Node>,
    },
    UntilNode {
        predicate: Box<Node>,
        statements: Box<Node>,
    },
    For {
        index: Box<Node>,
        collection: Box<Node>,
        statements: Box<Node>,
    },
    Case {
        keyword: Box<Node>,
        value: Option<Box<Node>>,
        consequent: Box<Node>,
    },
    When {
        arguments: Box<Node>,
        statements: Box<Node>,
        consequent: Option<Box<Node>>,
    },
    In {
        pattern: Box<Node>,
        statements: Box<Node>,
        consequent: Option<Box<Node>>,
    },
    /// Rightward pattern matching, `value => pattern` or `value in pattern`
    RAssign {
        value: Box<Node>,
        operator: Box<Node>,
        pattern: Box<Node>,
    },
    Break {
        arguments: Box<Node>,
    },
    Next {
        arguments: Box<Node>,
    },
    ReturnNode {
        arguments: Option<Box<Node>>,
    },
    Redo,
    Retry,
    Rescue {
        keyword: Box<Node>,
        exception: Option<Box<Node>>,
        statements: Box<Node>,
        consequent: Option<Box<Node>>,
    },
    RescueEx {
        exceptions: Option<Box<Node>>,
        variable: Option<Box<Node>>,
    },
    /// `statement rescue value`
    RescueMod {
        statement: Box<Node>,
        value: Box<Node>,
    },
    Ensure {
        keyword: Box<Node>,
        statements: Box<Node>,
    },

    // Definitions
    /// `def name ... end`, `def target.name ...`, and the endless `def name = value`
    DefNode {
        target: Option<Box<Node>>,
        operator: Option<Box<Node>>,
        name: Box<Node>,
        params: Option<Box<Node>>,
        bodystmt: Box<Node>,
    },
    Params {
        requireds: Vec<Node>,
        optionals: Vec<(Node, Node)>,
        rest: Option<Box<Node>>,
        posts: Vec<Node>,
        keywords: Vec<(Node, Option<Node>)>,
        keyword_rest: Option<Box<Node>>,
        block: Option<Box<Node>>,
    },
    RestParam {
        name: Option<Box<Node>>,
    },
    KwRestParam {
        name: Option<Box<Node>>,
    },
    BlockArg {
        name: Option<Box<Node>>,
    },
    /// The trailing comma of a block parameter list, `|a,|`
    ExcessedComma,
    ClassDeclaration {
        constant: Box<Node>,
        superclass: Option<Box<Node>>,
        bodystmt: Box<Node>,
    },
    ModuleDeclaration {
        constant: Box<Node>,
        bodystmt: Box<Node>,
    },
    /// `class << target`
    SClass {
        target: Box<Node>,
        bodystmt: Box<Node>,
    },
    AliasNode {
        left: Box<Node>,
        right: Box<Node>,
    },
    Undef {
        symbols: Vec<Node>,
    },

    // Pattern matching
    AryPtn {
        constant: Option<Box<Node>>,
        requireds: Vec<Node>,
        rest: Option<Box<Node>>,
        posts: Vec<Node>,
    },
    FndPtn {
        constant: Option<Box<Node>>,
        left: Box<Node>,
        values: Vec<Node>,
        right: Box<Node>,
    },
    HshPtn {
        constant: Option<Box<Node>>,
        keywords: Vec<(Node, Option<Node>)>,
        keyword_rest: Option<Box<Node>>,
    },
    /// `^(expression)`
    PinnedBegin {
        statement: Box<Node>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self {
            kind,
            location,
            comments: vec![],
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn range(&self) -> Range {
        self.location.range()
    }

    pub fn start_char(&self) -> usize {
        self.location.start_char
    }

    pub fn end_char(&self) -> usize {
        self.location.end_char
    }

    /// Variant name, for diagnostics.
    pub fn name(&self) -> &'static str {
        (&self.kind).into()
    }

    /// Raw text of a token node.
    pub fn token(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Ident { value }
            | NodeKind::Const { value }
            | NodeKind::IVar { value }
            | NodeKind::CVar { value }
            | NodeKind::GVar { value }
            | NodeKind::Backref { value }
            | NodeKind::Kw { value }
            | NodeKind::Op { value }
            | NodeKind::Period { value }
            | NodeKind::Label { value }
            | NodeKind::LabelEnd { value }
            | NodeKind::Backtick { value }
            | NodeKind::TStringContent { value }
            | NodeKind::TStringBeg { value }
            | NodeKind::TStringEnd { value }
            | NodeKind::SymBeg { value }
            | NodeKind::LParen { value }
            | NodeKind::LBrace { value }
            | NodeKind::LBracket { value }
            | NodeKind::HeredocBeg { value }
            | NodeKind::HeredocEnd { value }
            | NodeKind::EmbExprBeg { value }
            | NodeKind::EmbExprEnd { value }
            | NodeKind::TLambda { value }
            | NodeKind::TLamBeg { value }
            | NodeKind::Comma { value } => Some(value),
            _ => None,
        }
    }

    /// Whether this is a keyword token with the given text.
    pub fn is_keyword(&self, text: &str) -> bool {
        matches!(&self.kind, NodeKind::Kw { value } if value == text)
    }

    /// Direct children in source order, tokens included.
    pub fn child_nodes(&self) -> Vec<&Node> {
        fn push<'a>(out: &mut Vec<&'a Node>, node: &'a Option<Box<Node>>) {
            if let Some(node) = node {
                out.push(node);
            }
        }

        let mut out: Vec<&Node> = vec![];
        match &self.kind {
            NodeKind::Program { statements } => out.push(statements),
            NodeKind::Statements { body } => out.extend(body),
            NodeKind::BodyStmt {
                statements,
                rescue_clause,
                else_keyword,
                else_clause,
                ensure_clause,
            } => {
                out.push(statements);
                push(&mut out, rescue_clause);
                push(&mut out, else_keyword);
                push(&mut out, else_clause);
                push(&mut out, ensure_clause);
            }
            NodeKind::Begin { bodystmt } => out.push(bodystmt),
            NodeKind::Paren { lparen, contents } => {
                out.push(lparen);
                push(&mut out, contents);
            }
            NodeKind::BeginBlock { lbrace, statements }
            | NodeKind::EndBlock { lbrace, statements } => {
                out.push(lbrace);
                out.push(statements);
            }
            NodeKind::StringLiteral { parts, .. }
            | NodeKind::XStringLiteral { parts }
            | NodeKind::DynaSymbol { parts, .. }
            | NodeKind::RegexpLiteral { parts, .. }
            | NodeKind::Word { parts }
            | NodeKind::MLHS { parts, .. }
            | NodeKind::MRHS { parts }
            | NodeKind::Args { parts } => out.extend(parts),
            NodeKind::StringConcat { left, right } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::StringEmbExpr { statements } => out.push(statements),
            NodeKind::StringDVar { variable } => out.push(variable),
            NodeKind::Heredoc {
                beginning,
                ending,
                parts,
                ..
            } => {
                out.push(beginning);
                out.extend(parts);
                push(&mut out, ending);
            }
            NodeKind::SymbolLiteral { value }
            | NodeKind::VarRef { value }
            | NodeKind::PinnedVarRef { value }
            | NodeKind::VCall { value }
            | NodeKind::Defined { value } => out.push(value),
            NodeKind::ArrayLiteral { lbracket, contents } => {
                push(&mut out, lbracket);
                push(&mut out, contents);
            }
            NodeKind::QWords { elements, .. }
            | NodeKind::Words { elements, .. }
            | NodeKind::QSymbols { elements, .. }
            | NodeKind::Symbols { elements, .. } => out.extend(elements),
            NodeKind::HashLiteral { lbrace, assocs } => {
                out.push(lbrace);
                out.extend(assocs);
            }
            NodeKind::BareAssocHash { assocs } => out.extend(assocs),
            NodeKind::Assoc { key, value } => {
                out.push(key);
                push(&mut out, value);
            }
            NodeKind::AssocSplat { value }
            | NodeKind::VarField { value }
            | NodeKind::ArgBlock { value }
            | NodeKind::ArgStar { value } => push(&mut out, value),
            NodeKind::RangeNode {
                left,
                operator,
                right,
            } => {
                push(&mut out, left);
                out.push(operator);
                push(&mut out, right);
            }
            NodeKind::ConstPathRef { parent, constant }
            | NodeKind::ConstPathField { parent, constant } => {
                out.push(parent);
                out.push(constant);
            }
            NodeKind::TopConstRef { constant }
            | NodeKind::TopConstField { constant }
            | NodeKind::ConstRef { constant } => out.push(constant),
            NodeKind::Field {
                parent,
                operator,
                name,
            } => {
                out.push(parent);
                out.push(operator);
                out.push(name);
            }
            NodeKind::ARef { collection, index } | NodeKind::ARefField { collection, index } => {
                out.push(collection);
                push(&mut out, index);
            }
            NodeKind::Assign { target, value } | NodeKind::MAssign { target, value } => {
                out.push(target);
                out.push(value);
            }
            NodeKind::OpAssign {
                target,
                operator,
                value,
            } => {
                out.push(target);
                out.push(operator);
                out.push(value);
            }
            NodeKind::MLHSParen { contents, .. } => out.push(contents),
            NodeKind::CallNode {
                receiver,
                operator,
                message,
                arguments,
            } => {
                push(&mut out, receiver);
                push(&mut out, operator);
                push(&mut out, message);
                push(&mut out, arguments);
            }
            NodeKind::Command {
                message,
                arguments,
                block,
            } => {
                out.push(message);
                out.push(arguments);
                push(&mut out, block);
            }
            NodeKind::CommandCall {
                receiver,
                operator,
                message,
                arguments,
                block,
            } => {
                out.push(receiver);
                out.push(operator);
                out.push(message);
                push(&mut out, arguments);
                push(&mut out, block);
            }
            NodeKind::ArgParen { arguments } | NodeKind::YieldNode { arguments } => {
                push(&mut out, arguments)
            }
            NodeKind::ReturnNode { arguments } => push(&mut out, arguments),
            NodeKind::MethodAddBlock { call, block } => {
                out.push(call);
                out.push(block);
            }
            NodeKind::BlockNode {
                opening,
                block_var,
                bodystmt,
            } => {
                out.push(opening);
                push(&mut out, block_var);
                out.push(bodystmt);
            }
            NodeKind::BlockVar { params, locals } | NodeKind::LambdaVar { params, locals } => {
                out.push(params);
                out.extend(locals);
            }
            NodeKind::Lambda { params, statements } => {
                out.push(params);
                out.push(statements);
            }
            NodeKind::Super { arguments }
            | NodeKind::Break { arguments }
            | NodeKind::Next { arguments } => out.push(arguments),
            NodeKind::Binary { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::Unary { statement, .. } | NodeKind::PinnedBegin { statement } => {
                out.push(statement)
            }
            NodeKind::Not { statement, .. } => push(&mut out, statement),
            NodeKind::IfNode {
                predicate,
                statements,
                consequent,
            }
            | NodeKind::UnlessNode {
                predicate,
                statements,
                consequent,
            }
            | NodeKind::Elsif {
                predicate,
                statements,
                consequent,
            } => {
                // Modifier forms put the statements first.
                if statements.start_char() < predicate.start_char() {
                    out.push(statements);
                    out.push(predicate);
                } else {
                    out.push(predicate);
                    out.push(statements);
                }
                push(&mut out, consequent);
            }
            NodeKind::Else {
                keyword,
                statements,
            }
            | NodeKind::Ensure {
                keyword,
                statements,
            } => {
                out.push(keyword);
                out.push(statements);
            }
            NodeKind::IfOp {
                predicate,
                truthy,
                falsy,
            } => {
                out.push(predicate);
                out.push(truthy);
                out.push(falsy);
            }
            NodeKind::WhileNode {
                predicate,
                statements,
            }
            | NodeKind::UntilNode {
                predicate,
                statements,
            } => {
                if statements.start_char() < predicate.start_char() {
                    out.push(statements);
                    out.push(predicate);
                } else {
                    out.push(predicate);
                    out.push(statements);
                }
            }
            NodeKind::For {
                index,
                collection,
                statements,
            } => {
                out.push(index);
                out.push(collection);
                out.push(statements);
            }
            NodeKind::Case {
                keyword,
                value,
                consequent,
            } => {
                out.push(keyword);
                push(&mut out, value);
                out.push(consequent);
            }
            NodeKind::When {
                arguments: head,
                statements,
                consequent,
            }
            | NodeKind::In {
                pattern: head,
                statements,
                consequent,
            } => {
                out.push(head);
                out.push(statements);
                push(&mut out, consequent);
            }
            NodeKind::RAssign {
                value,
                operator,
                pattern,
            } => {
                out.push(value);
                out.push(operator);
                out.push(pattern);
            }
            NodeKind::Rescue {
                keyword,
                exception,
                statements,
                consequent,
            } => {
                out.push(keyword);
                push(&mut out, exception);
                out.push(statements);
                push(&mut out, consequent);
            }
            NodeKind::RescueEx {
                exceptions,
                variable,
            } => {
                push(&mut out, exceptions);
                push(&mut out, variable);
            }
            NodeKind::RescueMod { statement, value } => {
                out.push(statement);
                out.push(value);
            }
            NodeKind::DefNode {
                target,
                operator,
                name,
                params,
                bodystmt,
            } => {
                push(&mut out, target);
                push(&mut out, operator);
                out.push(name);
                push(&mut out, params);
                out.push(bodystmt);
            }
            NodeKind::Params {
                requireds,
                optionals,
                rest,
                posts,
                keywords,
                keyword_rest,
                block,
            } => {
                out.extend(requireds);
                for (name, value) in optionals {
                    out.push(name);
                    out.push(value);
                }
                push(&mut out, rest);
                out.extend(posts);
                for (name, value) in keywords {
                    out.push(name);
                    out.extend(value);
                }
                push(&mut out, keyword_rest);
                push(&mut out, block);
            }
            NodeKind::RestParam { name }
            | NodeKind::KwRestParam { name }
            | NodeKind::BlockArg { name } => push(&mut out, name),
            NodeKind::ClassDeclaration {
                constant,
                superclass,
                bodystmt,
            } => {
                out.push(constant);
                push(&mut out, superclass);
                out.push(bodystmt);
            }
            NodeKind::ModuleDeclaration { constant, bodystmt } => {
                out.push(constant);
                out.push(bodystmt);
            }
            NodeKind::SClass { target, bodystmt } => {
                out.push(target);
                out.push(bodystmt);
            }
            NodeKind::AliasNode { left, right } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::Undef { symbols } => out.extend(symbols),
            NodeKind::AryPtn {
                constant,
                requireds,
                rest,
                posts,
            } => {
                push(&mut out, constant);
                out.extend(requireds);
                push(&mut out, rest);
                out.extend(posts);
            }
            NodeKind::FndPtn {
                constant,
                left,
                values,
                right,
            } => {
                push(&mut out, constant);
                out.push(left);
                out.extend(values);
                out.push(right);
            }
            NodeKind::HshPtn {
                constant,
                keywords,
                keyword_rest,
            } => {
                push(&mut out, constant);
                for (key, value) in keywords {
                    out.push(key);
                    out.extend(value);
                }
                push(&mut out, keyword_rest);
            }
            NodeKind::VoidStmt
            | NodeKind::EndContent { .. }
            | NodeKind::Comment { .. }
            | NodeKind::EmbDoc { .. }
            | NodeKind::Ident { .. }
            | NodeKind::Const { .. }
            | NodeKind::IVar { .. }
            | NodeKind::CVar { .. }
            | NodeKind::GVar { .. }
            | NodeKind::Backref { .. }
            | NodeKind::Kw { .. }
            | NodeKind::Op { .. }
            | NodeKind::Period { .. }
            | NodeKind::Label { .. }
            | NodeKind::LabelEnd { .. }
            | NodeKind::Backtick { .. }
            | NodeKind::TStringContent { .. }
            | NodeKind::TStringBeg { .. }
            | NodeKind::TStringEnd { .. }
            | NodeKind::SymBeg { .. }
            | NodeKind::LParen { .. }
            | NodeKind::LBrace { .. }
            | NodeKind::LBracket { .. }
            | NodeKind::HeredocBeg { .. }
            | NodeKind::HeredocEnd { .. }
            | NodeKind::EmbExprBeg { .. }
            | NodeKind::EmbExprEnd { .. }
            | NodeKind::TLambda { .. }
            | NodeKind::TLamBeg { .. }
            | NodeKind::Comma { .. }
            | NodeKind::Int { .. }
            | NodeKind::FloatLiteral { .. }
            | NodeKind::RationalLiteral { .. }
            | NodeKind::Imaginary { .. }
            | NodeKind::Char { .. }
            | NodeKind::ArgsForward
            | NodeKind::ZSuper
            | NodeKind::Redo
            | NodeKind::Retry
            | NodeKind::ExcessedComma => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: NodeKind, start: usize, end: usize) -> Node {
        Node::new(kind, Location::new(1, start, start, 1, end, end))
    }

    #[test]
    fn test_names_come_from_variants() {
        let node = leaf(
            NodeKind::Ident {
                value: "foo".into(),
            },
            0,
            3,
        );
        assert_eq!(node.name(), "Ident");
        assert_eq!(node.token(), Some("foo"));
    }

    #[test]
    fn test_modifier_children_in_source_order() {
        // `a if b`
        let statements = leaf(
            NodeKind::Statements {
                body: vec![leaf(NodeKind::VoidStmt, 0, 1)],
            },
            0,
            1,
        );
        let predicate = leaf(NodeKind::Int { value: "1".into() }, 5, 6);
        let node = leaf(
            NodeKind::IfNode {
                predicate: Box::new(predicate),
                statements: Box::new(statements),
                consequent: None,
            },
            0,
            6,
        );
        let children = node.child_nodes();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "Statements");
        assert_eq!(children[1].name(), "Int");
    }
}
