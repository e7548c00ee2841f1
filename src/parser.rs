//! Backtracking recursive-descent parser.
//!
//! Rules never move a shared read position.  Each one takes the `Cursor` it starts from and, on
//! success, returns the node together with the cursor right after it.  Failing is just returning
//! nothing, so the caller still holds the cursor it started from and can try the next alternative.
//!
//! Expression rules are purely speculative and return an `Option`.  Rules that commit once a
//! keyword or opening token has been seen return a `Result` and report a positioned
//! `SyntaxError` when the rest of the construct is malformed.

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{
    BinaryOp, Binding, Decl, Expr, FunctionDecl, Program, Stmt, VariableDecl, VariableKind,
};
use crate::diag::{Position, SyntaxError, SyntaxErrorKind};
use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("program is empty")]
    EmptyProgram,

    #[error("{0}")]
    Syntax(#[from] SyntaxError),
}

/// Builds the syntax tree of a whole program.
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).program()
}

/// Read position in the token sequence.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Cursor(usize);

impl Cursor {
    pub fn start() -> Cursor {
        Cursor(0)
    }

    /// Number of tokens before the cursor.
    pub fn offset(self) -> usize {
        self.0
    }

    fn next(self) -> Cursor {
        Cursor(self.0 + 1)
    }
}

/// Result of a committing rule: `Ok(None)` when the rule does not apply at the cursor.
pub type Attempt<T> = Result<Option<(T, Cursor)>, SyntaxError>;

/// Symbols that delimit constructs rather than act as operators.
const PUNCTUATION: [&str; 6] = ["(", ")", "{", "}", ";", ","];

#[derive(Debug)]
pub struct Parser<'t> {
    tokens: &'t [Token],
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Parser<'t> {
        Parser { tokens }
    }

    /// `program := declaration+`
    pub fn program(&self) -> Result<Program, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyProgram);
        }

        let mut declarations = vec![];
        let mut at = Cursor::start();
        while let Some(token) = self.peek(at) {
            match self.declaration(at)? {
                Some((decl, next)) => {
                    declarations.push(decl);
                    at = self.literal(next, ";").unwrap_or(next);
                }
                None => {
                    return Err(SyntaxError {
                        pos: token.pos(),
                        kind: SyntaxErrorKind::TopLevelDeclarationExpected(token.text.clone()),
                    }
                    .into())
                }
            }
        }
        debug!(count = declarations.len(), "parsed program");
        Ok(Program { declarations })
    }

    /// `declaration := functionDeclaration | constDeclaration | letDeclaration | varDeclaration`
    pub fn declaration(&self, at: Cursor) -> Attempt<Decl> {
        if let Some((decl, next)) = self.function_declaration(at)? {
            return Ok(Some((Decl::Function(decl), next)));
        }
        for kind in [VariableKind::Const, VariableKind::Let, VariableKind::Var] {
            if let Some((decl, next)) = self.variable_declaration(at, kind)? {
                return Ok(Some((Decl::Variable(decl), next)));
            }
        }
        Ok(None)
    }

    /// `functionDeclaration := "function" identifier "(" parameters block`
    pub fn function_declaration(&self, at: Cursor) -> Attempt<FunctionDecl> {
        let Some(at) = self.literal(at, "function") else {
            return Ok(None);
        };
        let (name, at) = self.expect_identifier(at)?;
        trace!(%name, "function declaration");
        let at = self.expect(at, "(")?;
        let (parameters, at) = self.parameters(at)?;
        let (body, at) = self.block(at)?;
        Ok(Some((
            FunctionDecl {
                name,
                parameters,
                body,
            },
            at,
        )))
    }

    /// `variableDeclaration := keyword identifier "=" expression ("," identifier "=" expression)*`
    pub fn variable_declaration(&self, at: Cursor, kind: VariableKind) -> Attempt<VariableDecl> {
        let Some(mut at) = self.literal(at, kind.keyword()) else {
            return Ok(None);
        };
        let mut bindings = vec![];
        loop {
            let (name, next) = self.expect_identifier(at)?;
            let next = self.expect(next, "=")?;
            let (initializer, next) = self.expect_expression(next)?;
            trace!(%name, keyword = kind.keyword(), "variable binding");
            bindings.push(Binding { name, initializer });
            match self.literal(next, ",") {
                Some(after_comma) => at = after_comma,
                None => return Ok(Some((VariableDecl { kind, bindings }, next))),
            }
        }
    }

    /// `parameters := (identifier ("," identifier)*)? ")"`
    ///
    /// Called right after the opening parenthesis.
    pub fn parameters(&self, mut at: Cursor) -> Result<(Vec<String>, Cursor), SyntaxError> {
        let mut parameters = vec![];
        loop {
            if let Some(next) = self.literal(at, ")") {
                return Ok((parameters, next));
            }
            if !parameters.is_empty() {
                at = self.expect(at, ",")?;
            }
            let (name, next) = self.expect_identifier(at)?;
            parameters.push(name);
            at = next;
        }
    }

    /// `block := "{" (statement ";")* "}"`
    ///
    /// The `;` may be left out after the last statement and after a nested function declaration.
    pub fn block(&self, at: Cursor) -> Result<(Vec<Stmt>, Cursor), SyntaxError> {
        let mut at = self.expect(at, "{")?;
        let mut body = vec![];
        loop {
            if let Some(next) = self.literal(at, "}") {
                return Ok((body, next));
            }
            let Some((stmt, next)) = self.statement(at)? else {
                return Err(self.unexpected(at, "statement or '}'"));
            };
            let ends_with_block =
                matches!(&stmt, Stmt::Declaration(decl) if matches!(**decl, Decl::Function(_)));
            body.push(stmt);
            at = match self.literal(next, ";") {
                Some(after) => after,
                None if ends_with_block || self.literal(next, "}").is_some() => next,
                None => return Err(self.missing_semicolon(next)),
            };
        }
    }

    /// `statement := declaration | "return" expression | expression`
    pub fn statement(&self, at: Cursor) -> Attempt<Stmt> {
        if let Some((decl, next)) = self.declaration(at)? {
            return Ok(Some((Stmt::Declaration(Box::new(decl)), next)));
        }
        if let Some(next) = self.literal(at, "return") {
            let (expr, next) = self.expect_expression(next)?;
            return Ok(Some((Stmt::Return(expr), next)));
        }
        Ok(self
            .expression(at)
            .map(|(expr, next)| (Stmt::Expression(expr), next)))
    }

    /// `expression := parenthesized | identifier | number | call | binaryOp`
    ///
    /// The operand alternatives are tried in that order.  The operand is then extended by as
    /// many call suffixes as follow it, and the result by as many operator tails as follow:
    /// calls bind tighter than operators and all four operators share one precedence level,
    /// folding to the left.
    pub fn expression(&self, at: Cursor) -> Option<(Expr, Cursor)> {
        let (operand, at) = self.postfix(at)?;
        let (expr, at, _) = self.fold_operators(operand, at);
        Some((expr, at))
    }

    /// `binaryOp := expression ("+"|"-"|"*"|"/") expression`
    ///
    /// Only matches when at least one operator is present.
    pub fn binary_op(&self, at: Cursor) -> Option<(Expr, Cursor)> {
        let (operand, at) = self.postfix(at)?;
        match self.fold_operators(operand, at) {
            (expr, at, folded) if folded > 0 => Some((expr, at)),
            _ => None,
        }
    }

    /// `call := expression "(" expressions`
    ///
    /// Only matches when at least one argument list is present.
    pub fn call(&self, at: Cursor) -> Option<(Expr, Cursor)> {
        let (callee, at) = self.operand(at)?;
        match self.call_suffixes(callee, at) {
            (expr, at, calls) if calls > 0 => Some((expr, at)),
            _ => None,
        }
    }

    /// `expressions := (expression ("," expression)*)? ")"`
    ///
    /// Called right after the opening parenthesis of an argument list.
    pub fn expressions(&self, mut at: Cursor) -> Option<(Vec<Expr>, Cursor)> {
        let mut exprs = vec![];
        loop {
            if let Some(next) = self.literal(at, ")") {
                return Some((exprs, next));
            }
            if !exprs.is_empty() {
                at = self.literal(at, ",")?;
            }
            let (expr, next) = self.expression(at)?;
            exprs.push(expr);
            at = next;
        }
    }

    /// `parenthesized := "(" expression ")"`
    pub fn parenthesized(&self, at: Cursor) -> Option<(Expr, Cursor)> {
        let at = self.literal(at, "(")?;
        let (expr, at) = self.expression(at)?;
        let at = self.literal(at, ")")?;
        Some((expr, at))
    }

    /// Matches a token spelled like an identifier: `[$_a-zA-Z][$_a-zA-Z0-9]*`, keywords excluded.
    pub fn identifier(&self, at: Cursor) -> Option<(String, Cursor)> {
        let token = self.peek(at)?;
        if token.kind == TokenKind::Identifier && is_identifier(&token.text) {
            Some((token.text.clone(), at.next()))
        } else {
            None
        }
    }

    /// Matches a token that is entirely a base-10 floating point literal.
    pub fn number(&self, at: Cursor) -> Option<(f64, Cursor)> {
        let token = self.peek(at)?;
        if token.kind != TokenKind::Number {
            return None;
        }
        token.text.parse::<f64>().ok().map(|n| (n, at.next()))
    }

    fn operand(&self, at: Cursor) -> Option<(Expr, Cursor)> {
        self.parenthesized(at)
            .or_else(|| {
                self.identifier(at)
                    .map(|(name, next)| (Expr::Identifier(name), next))
            })
            .or_else(|| self.number(at).map(|(n, next)| (Expr::Number(n), next)))
    }

    fn postfix(&self, at: Cursor) -> Option<(Expr, Cursor)> {
        let (callee, at) = self.operand(at)?;
        let (expr, at, _) = self.call_suffixes(callee, at);
        Some((expr, at))
    }

    /// Wraps `callee` in one call per argument list that follows it.
    fn call_suffixes(&self, mut callee: Expr, mut at: Cursor) -> (Expr, Cursor, usize) {
        let mut calls = 0;
        while let Some(after_paren) = self.literal(at, "(") {
            let Some((args, next)) = self.expressions(after_paren) else {
                break;
            };
            callee = Expr::call(callee, args);
            at = next;
            calls += 1;
        }
        (callee, at, calls)
    }

    /// Folds `operator operand` tails into `lhs`.  A trailing operator without a right operand
    /// is left unconsumed.
    fn fold_operators(&self, mut lhs: Expr, mut at: Cursor) -> (Expr, Cursor, usize) {
        let mut folded = 0;
        while let Some((op, after_op)) = self.operator(at) {
            let Some((rhs, next)) = self.postfix(after_op) else {
                break;
            };
            lhs = Expr::binary(op, lhs, rhs);
            at = next;
            folded += 1;
        }
        (lhs, at, folded)
    }

    fn operator(&self, at: Cursor) -> Option<(BinaryOp, Cursor)> {
        let token = self.peek(at)?;
        if token.kind != TokenKind::Symbol {
            return None;
        }
        BinaryOp::from_symbol(&token.text).map(|op| (op, at.next()))
    }

    fn expect_identifier(&self, at: Cursor) -> Result<(String, Cursor), SyntaxError> {
        if let Some(found) = self.identifier(at) {
            return Ok(found);
        }
        match self.peek(at) {
            Some(token) => Err(SyntaxError {
                pos: token.pos(),
                kind: SyntaxErrorKind::InvalidIdentifier(token.text.clone()),
            }),
            None => Err(self.unexpected(at, "identifier")),
        }
    }

    fn expect_expression(&self, at: Cursor) -> Result<(Expr, Cursor), SyntaxError> {
        self.expression(at)
            .ok_or_else(|| self.unexpected(at, "expression"))
    }

    fn expect(&self, at: Cursor, text: &str) -> Result<Cursor, SyntaxError> {
        self.literal(at, text)
            .ok_or_else(|| self.unexpected(at, &format!("'{}'", text)))
    }

    /// Matches the keyword or symbol spelled `text`.
    fn literal(&self, at: Cursor, text: &str) -> Option<Cursor> {
        self.peek(at).filter(|t| t.is(text)).map(|_| at.next())
    }

    fn peek(&self, at: Cursor) -> Option<&'t Token> {
        self.tokens.get(at.0)
    }

    fn missing_semicolon(&self, at: Cursor) -> SyntaxError {
        match self.peek(at) {
            // An operator tail is only left unfolded when its right operand does not parse.
            Some(token)
                if token.kind == TokenKind::Symbol
                    && BinaryOp::from_symbol(&token.text).is_some() =>
            {
                self.unexpected(at.next(), "expression")
            }
            Some(token)
                if token.kind == TokenKind::Symbol
                    && BinaryOp::from_symbol(&token.text).is_none()
                    && !PUNCTUATION.contains(&token.text.as_str()) =>
            {
                SyntaxError {
                    pos: token.pos(),
                    kind: SyntaxErrorKind::InvalidOperator(token.text.clone()),
                }
            }
            _ => self.unexpected(at, "';'"),
        }
    }

    fn unexpected(&self, at: Cursor, expected: &str) -> SyntaxError {
        match self.peek(at) {
            Some(token) => SyntaxError {
                pos: token.pos(),
                kind: SyntaxErrorKind::UnexpectedToken {
                    found: token.text.clone(),
                    expected: expected.to_string(),
                },
            },
            None => SyntaxError {
                pos: self.end_pos(),
                kind: SyntaxErrorKind::UnexpectedEof {
                    expected: expected.to_string(),
                },
            },
        }
    }

    fn end_pos(&self) -> Position {
        self.tokens.last().map(Token::end).unwrap_or_default()
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '$' || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).expect("lex error")
    }

    fn parse_prg(input: &str) -> Result<Program, ParseError> {
        parse(&tokens(input))
    }

    fn parse_expr(input: &str) -> Option<(Expr, usize)> {
        let tokens = tokens(input);
        Parser::new(&tokens)
            .expression(Cursor::start())
            .map(|(expr, at)| (expr, at.offset()))
    }

    fn num(n: f64) -> Expr {
        Expr::Number(n)
    }

    fn id(name: &str) -> Expr {
        Expr::Identifier(name.to_string())
    }

    fn syntax_error(input: &str) -> SyntaxError {
        match parse_prg(input) {
            Err(ParseError::Syntax(e)) => e,
            r => panic!("unexpected output: {:?}", r),
        }
    }

    fn at(line: u32, column: u32) -> Position {
        Position { line, column }
    }

    #[test]
    fn identifier_validity() {
        for accepted in ["a", "ab", "abcd124", "_", "$", "$12", "a_$9"] {
            let tokens = tokens(accepted);
            assert_eq!(
                Parser::new(&tokens).identifier(Cursor::start()),
                Some((accepted.to_string(), Cursor(1))),
                "{}",
                accepted
            );
        }
        for rejected in ["1a", "12", "function", "=", "a=b"] {
            let tokens = tokens(rejected);
            assert_eq!(
                Parser::new(&tokens).identifier(Cursor::start()),
                None,
                "{}",
                rejected
            );
        }
    }

    #[test]
    fn number_must_be_fully_consumed() {
        let tokens = tokens("42 1e3 1a 0x10");
        let parser = Parser::new(&tokens);
        assert_eq!(parser.number(Cursor(0)), Some((42.0, Cursor(1))));
        assert_eq!(parser.number(Cursor(1)), Some((1000.0, Cursor(2))));
        assert_eq!(parser.number(Cursor(2)), None);
        assert_eq!(parser.number(Cursor(3)), None);
    }

    #[test]
    fn rules_fail_at_end_of_input() {
        let parser = Parser::new(&[]);
        assert_eq!(parser.identifier(Cursor::start()), None);
        assert_eq!(parser.number(Cursor::start()), None);
        assert_eq!(parser.expression(Cursor::start()), None);
    }

    #[test]
    fn empty_function_declaration() -> Result<(), SyntaxError> {
        let tokens = tokens("function a() {}");
        let (decl, at) = Parser::new(&tokens)
            .function_declaration(Cursor::start())?
            .expect("no declaration");
        assert_eq!(
            decl,
            FunctionDecl {
                name: "a".to_string(),
                parameters: vec![],
                body: vec![],
            }
        );
        assert_eq!(at.offset(), 6);
        Ok(())
    }

    #[test]
    fn function_declaration_with_parameters() -> Result<(), ParseError> {
        assert_eq!(
            parse_prg("function add(a, b) { return a + b; }")?,
            Program {
                declarations: vec![Decl::Function(FunctionDecl {
                    name: "add".to_string(),
                    parameters: vec!["a".to_string(), "b".to_string()],
                    body: vec![Stmt::Return(Expr::binary(
                        BinaryOp::Plus,
                        id("a"),
                        id("b")
                    ))],
                })]
            }
        );
        Ok(())
    }

    #[test]
    fn non_function_does_not_match_function_declaration() -> Result<(), SyntaxError> {
        let tokens = tokens("var a = 1");
        assert_eq!(
            Parser::new(&tokens).function_declaration(Cursor::start())?,
            None
        );
        Ok(())
    }

    #[test]
    fn failed_call_leaves_cursor_untouched() {
        let tokens = tokens("a + 1");
        let parser = Parser::new(&tokens);
        let before = Cursor::start();
        assert_eq!(parser.call(before), None);
        assert_eq!(before.offset(), 0);
        assert_eq!(
            parser.expression(before),
            Some((Expr::binary(BinaryOp::Plus, id("a"), num(1.0)), Cursor(3)))
        );
    }

    #[test]
    fn failed_binary_op_leaves_cursor_untouched() {
        let tokens = tokens("f(1)");
        let parser = Parser::new(&tokens);
        assert_eq!(parser.binary_op(Cursor::start()), None);
        assert_eq!(
            parser.call(Cursor::start()),
            Some((Expr::call(id("f"), vec![num(1.0)]), Cursor(4)))
        );
    }

    #[test]
    fn single_operand_expressions() {
        assert_eq!(parse_expr("42"), Some((num(42.0), 1)));
        assert_eq!(parse_expr("foo"), Some((id("foo"), 1)));
        assert_eq!(parse_expr("((x))"), Some((id("x"), 5)));
    }

    #[test]
    fn binary_operators_fold_to_the_left() {
        assert_eq!(
            parse_expr("1 - 2 - 3"),
            Some((
                Expr::binary(
                    BinaryOp::Minus,
                    Expr::binary(BinaryOp::Minus, num(1.0), num(2.0)),
                    num(3.0)
                ),
                5
            ))
        );
    }

    #[test]
    fn operators_share_one_precedence_level() {
        assert_eq!(
            parse_expr("1 + 2 * 3"),
            Some((
                Expr::binary(
                    BinaryOp::Times,
                    Expr::binary(BinaryOp::Plus, num(1.0), num(2.0)),
                    num(3.0)
                ),
                5
            ))
        );
    }

    #[test]
    fn parentheses_group() {
        assert_eq!(
            parse_expr("1 + (2 * 3)"),
            Some((
                Expr::binary(
                    BinaryOp::Plus,
                    num(1.0),
                    Expr::binary(BinaryOp::Times, num(2.0), num(3.0))
                ),
                7
            ))
        );
    }

    #[test]
    fn unclosed_parenthesis_does_not_match() {
        assert_eq!(parse_expr("(1 + 2"), None);
    }

    #[test]
    fn trailing_operator_is_not_consumed() {
        assert_eq!(parse_expr("a + ;"), Some((id("a"), 1)));
    }

    #[test]
    fn calls_bind_tighter_than_operators() {
        assert_eq!(
            parse_expr("f(1) + g(2, x)"),
            Some((
                Expr::binary(
                    BinaryOp::Plus,
                    Expr::call(id("f"), vec![num(1.0)]),
                    Expr::call(id("g"), vec![num(2.0), id("x")])
                ),
                11
            ))
        );
    }

    #[test]
    fn chained_calls() {
        assert_eq!(
            parse_expr("make()(1)"),
            Some((
                Expr::call(Expr::call(id("make"), vec![]), vec![num(1.0)]),
                6
            ))
        );
    }

    #[test]
    fn parenthesized_callee() {
        assert_eq!(
            parse_expr("(f)(1)"),
            Some((Expr::call(id("f"), vec![num(1.0)]), 6))
        );
    }

    #[test]
    fn argument_expressions() {
        assert_eq!(
            parse_expr("f(a + 1, g())"),
            Some((
                Expr::call(
                    id("f"),
                    vec![
                        Expr::binary(BinaryOp::Plus, id("a"), num(1.0)),
                        Expr::call(id("g"), vec![])
                    ]
                ),
                10
            ))
        );
    }

    #[test]
    fn malformed_argument_list_is_not_a_call() {
        assert_eq!(parse_expr("f(1 2)"), Some((id("f"), 1)));
    }

    #[test]
    fn block_statements() -> Result<(), SyntaxError> {
        let tokens = tokens("{ f(1); return x }");
        let (body, at) = Parser::new(&tokens).block(Cursor::start())?;
        assert_eq!(
            body,
            vec![
                Stmt::Expression(Expr::call(id("f"), vec![num(1.0)])),
                Stmt::Return(id("x")),
            ]
        );
        assert_eq!(at.offset(), tokens.len());
        Ok(())
    }

    #[test]
    fn nested_function_needs_no_semicolon() -> Result<(), ParseError> {
        let prg = parse_prg(
            "function make() { function inner() { return 1; } return inner(); }",
        )?;
        let Decl::Function(make) = &prg.declarations[0] else {
            panic!("unexpected declaration: {:?}", prg.declarations[0]);
        };
        assert_eq!(make.body.len(), 2);
        assert!(matches!(&make.body[0], Stmt::Declaration(_)));
        assert_eq!(make.body[1], Stmt::Return(Expr::call(id("inner"), vec![])));
        Ok(())
    }

    #[test]
    fn variable_declarations() -> Result<(), ParseError> {
        assert_eq!(
            parse_prg("var a = 1, b = a + 1; let c = 2 const d = c")?,
            Program {
                declarations: vec![
                    Decl::Variable(VariableDecl {
                        kind: VariableKind::Var,
                        bindings: vec![
                            Binding {
                                name: "a".to_string(),
                                initializer: num(1.0),
                            },
                            Binding {
                                name: "b".to_string(),
                                initializer: Expr::binary(BinaryOp::Plus, id("a"), num(1.0)),
                            },
                        ],
                    }),
                    Decl::Variable(VariableDecl {
                        kind: VariableKind::Let,
                        bindings: vec![Binding {
                            name: "c".to_string(),
                            initializer: num(2.0),
                        }],
                    }),
                    Decl::Variable(VariableDecl {
                        kind: VariableKind::Const,
                        bindings: vec![Binding {
                            name: "d".to_string(),
                            initializer: id("c"),
                        }],
                    }),
                ]
            }
        );
        Ok(())
    }

    #[test]
    fn variable_declaration_in_block() -> Result<(), ParseError> {
        let prg = parse_prg("function main() { const x = 2; return x; }")?;
        let Decl::Function(main) = &prg.declarations[0] else {
            panic!("unexpected declaration: {:?}", prg.declarations[0]);
        };
        assert_eq!(
            main.body[0],
            Stmt::Declaration(Box::new(Decl::Variable(VariableDecl {
                kind: VariableKind::Const,
                bindings: vec![Binding {
                    name: "x".to_string(),
                    initializer: num(2.0),
                }],
            })))
        );
        Ok(())
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse_prg(""), Err(ParseError::EmptyProgram));
        assert_eq!(parse_prg("// nothing here"), Err(ParseError::EmptyProgram));
    }

    #[test]
    fn top_level_expression() {
        assert_eq!(
            syntax_error("1 + 2"),
            SyntaxError {
                pos: at(1, 1),
                kind: SyntaxErrorKind::TopLevelDeclarationExpected("1".to_string()),
            }
        );
    }

    #[test]
    fn top_level_statement_after_declaration() {
        assert_eq!(
            syntax_error("function main() { return 1; }\nmain();"),
            SyntaxError {
                pos: at(2, 1),
                kind: SyntaxErrorKind::TopLevelDeclarationExpected("main".to_string()),
            }
        );
    }

    #[test]
    fn missing_comma_between_parameters() {
        assert_eq!(
            syntax_error("function f(a b) {}"),
            SyntaxError {
                pos: at(1, 14),
                kind: SyntaxErrorKind::UnexpectedToken {
                    found: "b".to_string(),
                    expected: "','".to_string(),
                },
            }
        );
    }

    #[test]
    fn invalid_parameter_name() {
        assert_eq!(
            syntax_error("function f(1) {}"),
            SyntaxError {
                pos: at(1, 12),
                kind: SyntaxErrorKind::InvalidIdentifier("1".to_string()),
            }
        );
    }

    #[test]
    fn keyword_as_function_name() {
        assert_eq!(
            syntax_error("function return() {}"),
            SyntaxError {
                pos: at(1, 10),
                kind: SyntaxErrorKind::InvalidIdentifier("return".to_string()),
            }
        );
    }

    #[test]
    fn missing_closing_brace() {
        assert_eq!(
            syntax_error("function f() { return 1;"),
            SyntaxError {
                pos: at(1, 25),
                kind: SyntaxErrorKind::UnexpectedEof {
                    expected: "statement or '}'".to_string(),
                },
            }
        );
    }

    #[test]
    fn missing_semicolon() {
        assert_eq!(
            syntax_error("function f() { f() return 1; }"),
            SyntaxError {
                pos: at(1, 20),
                kind: SyntaxErrorKind::UnexpectedToken {
                    found: "return".to_string(),
                    expected: "';'".to_string(),
                },
            }
        );
    }

    #[test]
    fn dangling_operator() {
        assert_eq!(
            syntax_error("function main() { return 1 + ; }"),
            SyntaxError {
                pos: at(1, 30),
                kind: SyntaxErrorKind::UnexpectedToken {
                    found: ";".to_string(),
                    expected: "expression".to_string(),
                },
            }
        );
    }

    #[test]
    fn operator_followed_by_operator() {
        assert_eq!(
            syntax_error("function main() { return 1 + * 2; }"),
            SyntaxError {
                pos: at(1, 30),
                kind: SyntaxErrorKind::UnexpectedToken {
                    found: "*".to_string(),
                    expected: "expression".to_string(),
                },
            }
        );
    }

    #[test]
    fn dangling_operator_at_end_of_input() {
        assert_eq!(
            syntax_error("function main() { return 1 -"),
            SyntaxError {
                pos: at(1, 29),
                kind: SyntaxErrorKind::UnexpectedEof {
                    expected: "expression".to_string(),
                },
            }
        );
    }

    #[test]
    fn unsupported_operator() {
        assert_eq!(
            syntax_error("function main() { return a & b; }"),
            SyntaxError {
                pos: at(1, 28),
                kind: SyntaxErrorKind::InvalidOperator("&".to_string()),
            }
        );
    }

    #[test]
    fn return_without_expression() {
        assert_eq!(
            syntax_error("function main() { return; }"),
            SyntaxError {
                pos: at(1, 25),
                kind: SyntaxErrorKind::UnexpectedToken {
                    found: ";".to_string(),
                    expected: "expression".to_string(),
                },
            }
        );
    }

    #[test]
    fn binding_without_initializer() {
        assert_eq!(
            syntax_error("let x 1"),
            SyntaxError {
                pos: at(1, 7),
                kind: SyntaxErrorKind::UnexpectedToken {
                    found: "1".to_string(),
                    expected: "'='".to_string(),
                },
            }
        );
    }

    #[test]
    fn top_level_semicolons_are_optional() -> Result<(), ParseError> {
        let prg = parse_prg("function a() {}; function b() {}")?;
        assert_eq!(prg.declarations.len(), 2);
        Ok(())
    }
}
