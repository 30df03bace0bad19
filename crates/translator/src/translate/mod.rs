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

//! Origin tree to target AST, one rule per origin variant.

mod calls;
mod control;
mod definitions;
mod literals;
mod patterns;
mod strings;
mod variables;

#[cfg(test)]
mod tests;

use crate::ancestors::AncestorStack;
use crate::ast::{self, NodeType, Value};
use crate::cst::{Node, NodeKind};
use crate::options::TranslateOptions;
use crate::ranges::{range_find, range_find_last, range_search, range_search_keyword};
use crate::source_map::SourceMap;
use stree_common::{Range, SourceBuffer, TranslateError};

pub(crate) type Result<T> = std::result::Result<T, TranslateError>;

/// The `expression` range of a translated node, if it has one.
pub(crate) fn expression(node: &ast::Node) -> Option<Range> {
    node.location.as_ref().and_then(SourceMap::expression)
}

pub(crate) fn value_expression(value: &Value) -> Option<Range> {
    value.as_node().and_then(expression)
}

/// Smallest range covering every present range.
pub(crate) fn join_all(ranges: impl IntoIterator<Item = Option<Range>>) -> Option<Range> {
    ranges
        .into_iter()
        .flatten()
        .reduce(|acc, range| acc.join(&range))
}

pub(crate) fn missing(node: &Node, field: &'static str) -> TranslateError {
    TranslateError::MissingChild {
        node: node.name(),
        field,
    }
}

pub(crate) fn unexpected(context: &'static str, found: &Node) -> TranslateError {
    TranslateError::UnexpectedNode {
        context,
        found: found.name(),
    }
}

/// Statements that produce a value; comments and empty statements are dropped.
pub(crate) fn statement_nodes(node: &Node) -> Vec<&Node> {
    match &node.kind {
        NodeKind::Statements { body } => body
            .iter()
            .filter(|n| {
                !matches!(
                    n.kind,
                    NodeKind::VoidStmt
                        | NodeKind::Comment { .. }
                        | NodeKind::EmbDoc { .. }
                        | NodeKind::EndContent { .. }
                )
            })
            .collect(),
        NodeKind::BodyStmt { statements, .. } => statement_nodes(statements),
        _ => vec![node],
    }
}

/// Translation state for one tree.
pub(crate) struct Translator<'a> {
    pub(crate) buffer: &'a SourceBuffer,
    pub(crate) options: &'a TranslateOptions,
    pub(crate) stack: AncestorStack<'a>,
}

impl<'a> Translator<'a> {
    pub(crate) fn new(buffer: &'a SourceBuffer, options: &'a TranslateOptions) -> Self {
        Self {
            buffer,
            options,
            stack: AncestorStack::new(),
        }
    }

    /// Number of origin nodes currently being visited.
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Translate a whole tree. A program without statements translates to nothing.
    pub(crate) fn translate_root(&mut self, root: &'a Node) -> Result<Option<ast::Node>> {
        let result = match &root.kind {
            NodeKind::Program { statements } => {
                self.frame(root, |t| t.visit_body(statements))?
            }
            _ => self.visit_body(root)?,
        };
        Ok(match result {
            Some(node) if !self.options.source_maps => Some(strip_locations(node)),
            other => other,
        })
    }

    /// Run `f` with `node` pushed as the node being visited.
    pub(crate) fn frame<T>(
        &mut self,
        node: &'a Node,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.stack.push(node);
        let result = f(self);
        self.stack.pop();
        result
    }

    pub(crate) fn visit(&mut self, node: &'a Node) -> Result<ast::Node> {
        self.frame(node, |t| t.dispatch(node))
    }

    pub(crate) fn visit_opt(&mut self, node: Option<&'a Node>) -> Result<Option<ast::Node>> {
        node.map(|n| self.visit(n)).transpose()
    }

    pub(crate) fn visit_value(&mut self, node: Option<&'a Node>) -> Result<Value> {
        Ok(self.visit_opt(node)?.into())
    }

    /// A statement list or body: nothing, the single statement, or a `begin` of all of them.
    pub(crate) fn visit_body(&mut self, node: &'a Node) -> Result<Option<ast::Node>> {
        match &node.kind {
            NodeKind::Statements { .. } => self.frame(node, |t| t.visit_statements(node)),
            NodeKind::BodyStmt { .. } => self.frame(node, |t| t.visit_bodystmt(node)),
            _ => self.visit(node).map(Some),
        }
    }

    fn visit_statements(&mut self, node: &'a Node) -> Result<Option<ast::Node>> {
        let statements = statement_nodes(node);
        match statements.as_slice() {
            [] => Ok(None),
            [single] => self.visit(*single).map(Some),
            [first, .., last] => {
                let fallback = Range::new(first.start_char(), last.end_char());
                let children = statements
                    .iter()
                    .map(|n| self.visit(*n))
                    .collect::<Result<Vec<_>>>()?;
                let range = join_all(children.iter().map(expression)).unwrap_or(fallback);
                Ok(Some(self.s(
                    NodeType::Begin,
                    children.into_iter().map(Value::Node).collect(),
                    SourceMap::bare(range),
                )))
            }
        }
    }

    pub(crate) fn s(&self, node_type: NodeType, children: Vec<Value>, map: SourceMap) -> ast::Node {
        ast::Node::new(node_type, children, Some(map))
    }

    pub(crate) fn find(&self, start: usize, end: usize, needle: &str) -> Result<Range> {
        range_find(self.buffer, start, end, needle)
    }

    pub(crate) fn find_last(&self, start: usize, end: usize, needle: &str) -> Result<Range> {
        range_find_last(self.buffer, start, end, needle)
    }

    pub(crate) fn search(&self, start: usize, end: usize, needle: &str) -> Result<Option<Range>> {
        if start > end {
            return Ok(None);
        }
        range_search(self.buffer, start, end, needle)
    }

    pub(crate) fn search_keyword(
        &self,
        start: usize,
        end: usize,
        keyword: &str,
    ) -> Result<Option<Range>> {
        range_search_keyword(self.buffer, start, end, keyword)
    }

    pub(crate) fn source(&self, range: Range) -> Result<&'a str> {
        self.buffer.slice(range)
    }

    /// Whether the source text of `node` begins with `prefix`.
    pub(crate) fn starts_with(&self, node: &Node, prefix: &str) -> bool {
        self.source(node.range())
            .is_ok_and(|text| text.starts_with(prefix))
    }

    pub(crate) fn ends_with(&self, node: &Node, suffix: &str) -> bool {
        self.source(node.range())
            .is_ok_and(|text| text.ends_with(suffix))
    }

    fn dispatch(&mut self, node: &'a Node) -> Result<ast::Node> {
        match &node.kind {
            NodeKind::Program { statements } => Ok(self
                .visit_body(statements)?
                .unwrap_or_else(|| self.s(NodeType::Begin, vec![], SourceMap::bare(node.range())))),
            NodeKind::Statements { .. } | NodeKind::BodyStmt { .. } => Ok(self
                .visit_body(node)?
                .unwrap_or_else(|| self.s(NodeType::Begin, vec![], SourceMap::bare(node.range())))),
            NodeKind::Begin { bodystmt } => self.visit_kwbegin(node, bodystmt),
            NodeKind::Paren { contents, .. } => self.visit_paren(node, contents.as_deref()),
            NodeKind::BeginBlock { lbrace, statements } => {
                self.visit_prepost(node, NodeType::Preexe, lbrace, statements)
            }
            NodeKind::EndBlock { lbrace, statements } => {
                self.visit_prepost(node, NodeType::Postexe, lbrace, statements)
            }

            NodeKind::Ident { .. }
            | NodeKind::Const { .. }
            | NodeKind::IVar { .. }
            | NodeKind::CVar { .. }
            | NodeKind::GVar { .. }
            | NodeKind::Backref { .. } => self.visit_variable_token(node),
            NodeKind::Kw { value } => self.visit_keyword_literal(node, value),
            NodeKind::Label { value } => self.visit_label(node, value),

            NodeKind::Int { value }
            | NodeKind::FloatLiteral { value }
            | NodeKind::RationalLiteral { value }
            | NodeKind::Imaginary { value } => self.visit_numeric(node, value, None, node.range()),
            NodeKind::Char { value } => self.visit_char(node, value),
            NodeKind::StringLiteral { parts, quote } => self.visit_string(node, parts, quote),
            NodeKind::StringConcat { left, right } => self.visit_string_concat(node, left, right),
            NodeKind::StringEmbExpr { statements } => self.visit_string_embexpr(node, statements),
            NodeKind::StringDVar { variable } => self.visit(variable),
            NodeKind::XStringLiteral { parts } => self.visit_xstring(node, parts),
            NodeKind::Heredoc {
                beginning,
                ending,
                dedent,
                parts,
            } => self.visit_heredoc(node, beginning, ending.as_deref(), *dedent, parts),
            NodeKind::SymbolLiteral { value } => self.visit_symbol(node, value),
            NodeKind::DynaSymbol { parts, quote } => {
                self.visit_dyna_symbol(node, parts, quote.as_deref())
            }
            NodeKind::RegexpLiteral {
                beginning,
                ending,
                parts,
            } => self.visit_regexp(node, beginning, ending, parts),
            NodeKind::ArrayLiteral { lbracket, contents } => {
                self.visit_array(node, lbracket.as_deref(), contents.as_deref())
            }
            NodeKind::QWords {
                beginning,
                elements,
            } => self.visit_words(node, beginning, elements, NodeType::Str),
            NodeKind::Words {
                beginning,
                elements,
            } => self.visit_words(node, beginning, elements, NodeType::Str),
            NodeKind::QSymbols {
                beginning,
                elements,
            } => self.visit_words(node, beginning, elements, NodeType::Sym),
            NodeKind::Symbols {
                beginning,
                elements,
            } => self.visit_words(node, beginning, elements, NodeType::Sym),
            NodeKind::Word { parts } => {
                self.visit_word(node, parts, NodeType::Str, crate::escape::EscapeMode::Double)
            }
            NodeKind::HashLiteral { assocs, .. } => self.visit_hash(node, assocs, true),
            NodeKind::BareAssocHash { assocs } => self.visit_hash(node, assocs, false),
            NodeKind::Assoc { key, value } => self.visit_assoc(node, key, value.as_deref()),
            NodeKind::AssocSplat { value } => self.visit_assoc_splat(node, value.as_deref()),
            NodeKind::RangeNode {
                left,
                operator,
                right,
            } => self.visit_range(node, left.as_deref(), operator, right.as_deref()),

            NodeKind::VarRef { value } => self.visit_variable_token(value),
            NodeKind::VarField { value } => self.visit_var_field(node, value.as_deref()),
            NodeKind::PinnedVarRef { value } => self.visit_pinned_var(node, value),
            NodeKind::VCall { .. } => self.visit_call(node),
            NodeKind::ConstPathRef { parent, constant } => {
                self.visit_const_path(node, parent, constant, false)
            }
            NodeKind::ConstPathField { parent, constant } => {
                self.visit_const_path(node, parent, constant, true)
            }
            NodeKind::TopConstRef { constant } => self.visit_top_const(node, constant, false),
            NodeKind::TopConstField { constant } => self.visit_top_const(node, constant, true),
            NodeKind::ConstRef { constant } => self.visit_variable_token(constant),
            NodeKind::Field {
                parent,
                operator,
                name,
            } => self.visit_field(node, parent, operator, name),
            NodeKind::ARef { collection, index } => {
                self.visit_aref(node, collection, index.as_deref(), false)
            }
            NodeKind::ARefField { collection, index } => {
                self.visit_aref(node, collection, index.as_deref(), true)
            }

            NodeKind::Assign { target, value } => self.visit_assign(node, target, value),
            NodeKind::OpAssign {
                target,
                operator,
                value,
            } => self.visit_op_assign(node, target, operator, value),
            NodeKind::MAssign { target, value } => self.visit_massign(node, target, value),
            NodeKind::MLHS { parts, .. } => self.visit_mlhs(node, parts, None),
            NodeKind::MLHSParen { contents, .. } => self.visit_mlhs_paren(node, contents),
            NodeKind::MRHS { parts } => self.visit_mrhs(node, parts),

            NodeKind::CallNode { .. } | NodeKind::Command { .. } | NodeKind::CommandCall { .. } => {
                self.visit_call(node)
            }
            NodeKind::ArgParen { arguments } => match arguments {
                Some(arguments) => self.visit(arguments),
                None => Err(missing(node, "arguments")),
            },
            NodeKind::Args { parts } => match parts.as_slice() {
                [single] => self.visit(single),
                _ => Err(unexpected("expression", node)),
            },
            NodeKind::ArgBlock { value } => self.visit_block_pass(node, value.as_deref()),
            NodeKind::ArgStar { value } => self.visit_splat(node, value.as_deref()),
            NodeKind::ArgsForward => Ok(self.s(
                NodeType::ForwardedArgs,
                vec![],
                SourceMap::map(node.range()),
            )),
            NodeKind::MethodAddBlock { call, block } => {
                self.visit_method_add_block(node, call, block)
            }
            NodeKind::Lambda { params, statements } => self.visit_lambda(node, params, statements),
            NodeKind::Super { arguments } => self.visit_super(node, arguments),
            NodeKind::ZSuper => Ok(self.s(
                NodeType::Zsuper,
                vec![],
                SourceMap::keyword(node.range(), None, None, node.range()),
            )),
            NodeKind::YieldNode { arguments } => self.visit_yield(node, arguments.as_deref()),
            NodeKind::Binary {
                left,
                operator,
                right,
            } => self.visit_binary(node, left, operator, right),
            NodeKind::Unary { operator, statement } => self.visit_unary(node, operator, statement),
            NodeKind::Not {
                statement,
                parentheses,
            } => self.visit_not(node, statement.as_deref(), *parentheses),
            NodeKind::Defined { value } => self.visit_defined(node, value),

            NodeKind::IfNode {
                predicate,
                statements,
                consequent,
            } => self.visit_if(node, predicate, statements, consequent.as_deref(), false),
            NodeKind::UnlessNode {
                predicate,
                statements,
                consequent,
            } => self.visit_if(node, predicate, statements, consequent.as_deref(), true),
            NodeKind::Elsif {
                predicate,
                statements,
                consequent,
            } => self.visit_elsif(node, predicate, statements, consequent.as_deref()),
            NodeKind::IfOp {
                predicate,
                truthy,
                falsy,
            } => self.visit_ternary(node, predicate, truthy, falsy),
            NodeKind::WhileNode {
                predicate,
                statements,
            } => self.visit_loop(node, predicate, statements, false),
            NodeKind::UntilNode {
                predicate,
                statements,
            } => self.visit_loop(node, predicate, statements, true),
            NodeKind::For {
                index,
                collection,
                statements,
            } => self.visit_for(node, index, collection, statements),
            NodeKind::Case {
                keyword,
                value,
                consequent,
            } => self.visit_case(node, keyword, value.as_deref(), consequent),
            NodeKind::RAssign {
                value,
                operator,
                pattern,
            } => self.visit_rassign(node, value, operator, pattern),
            NodeKind::Break { arguments } => {
                self.visit_flow(node, NodeType::Break, "break", Some(arguments))
            }
            NodeKind::Next { arguments } => {
                self.visit_flow(node, NodeType::Next, "next", Some(arguments))
            }
            NodeKind::ReturnNode { arguments } => {
                self.visit_flow(node, NodeType::Return, "return", arguments.as_deref())
            }
            NodeKind::Redo => Ok(self.s(
                NodeType::Redo,
                vec![],
                SourceMap::keyword(node.range(), None, None, node.range()),
            )),
            NodeKind::Retry => Ok(self.s(
                NodeType::Retry,
                vec![],
                SourceMap::keyword(node.range(), None, None, node.range()),
            )),
            NodeKind::RescueMod { statement, value } => {
                self.visit_rescue_mod(node, statement, value)
            }

            NodeKind::DefNode {
                target,
                operator,
                name,
                params,
                bodystmt,
            } => self.visit_def(
                node,
                target.as_deref(),
                operator.as_deref(),
                name,
                params.as_deref(),
                bodystmt,
            ),
            NodeKind::ClassDeclaration {
                constant,
                superclass,
                bodystmt,
            } => self.visit_class(node, constant, superclass.as_deref(), bodystmt),
            NodeKind::ModuleDeclaration { constant, bodystmt } => {
                self.visit_module(node, constant, bodystmt)
            }
            NodeKind::SClass { target, bodystmt } => self.visit_sclass(node, target, bodystmt),
            NodeKind::AliasNode { left, right } => self.visit_alias(node, left, right),
            NodeKind::Undef { symbols } => self.visit_undef(node, symbols),

            NodeKind::AryPtn {
                constant,
                requireds,
                rest,
                posts,
            } => self.visit_array_pattern(
                node,
                constant.as_deref(),
                requireds,
                rest.as_deref(),
                posts,
            ),
            NodeKind::FndPtn {
                constant,
                left,
                values,
                right,
            } => self.visit_find_pattern(node, constant.as_deref(), left, values, right),
            NodeKind::HshPtn {
                constant,
                keywords,
                keyword_rest,
            } => self.visit_hash_pattern(
                node,
                constant.as_deref(),
                keywords,
                keyword_rest.as_deref(),
            ),
            NodeKind::PinnedBegin { statement } => self.visit_pinned_begin(node, statement),

            // Only meaningful inside their parent's rule.
            NodeKind::Else { .. }
            | NodeKind::When { .. }
            | NodeKind::In { .. }
            | NodeKind::Rescue { .. }
            | NodeKind::RescueEx { .. }
            | NodeKind::Ensure { .. }
            | NodeKind::BlockNode { .. }
            | NodeKind::BlockVar { .. }
            | NodeKind::LambdaVar { .. }
            | NodeKind::Params { .. }
            | NodeKind::RestParam { .. }
            | NodeKind::KwRestParam { .. }
            | NodeKind::BlockArg { .. }
            | NodeKind::ExcessedComma
            | NodeKind::VoidStmt
            | NodeKind::EndContent { .. }
            | NodeKind::Comment { .. }
            | NodeKind::EmbDoc { .. }
            | NodeKind::Op { .. }
            | NodeKind::Period { .. }
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
            | NodeKind::Comma { .. } => Err(unexpected("expression", node)),
        }
    }
}

/// Drop every source map, for the minimal export.
pub(crate) fn strip_locations(node: ast::Node) -> ast::Node {
    let children = node
        .children
        .into_iter()
        .map(|child| match child {
            Value::Node(node) => Value::Node(strip_locations(node)),
            other => other,
        })
        .collect();
    ast::Node::new(node.node_type, children, None)
}
