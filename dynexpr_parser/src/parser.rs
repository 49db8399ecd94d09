//! Recursive descent parser for the expression grammar
//!
//! Converts the token stream into an untyped `SynExpr` tree using
//! precedence climbing for binary operators and a postfix loop for member
//! access, invocation and indexing.

use crate::ast::{AnonInit, SynBinaryOp, SynExpr, SynExprKind, SynLit, SynUnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, unescape_char, unescape_string, SpannedToken};
use crate::span::Span;
use crate::token::{Associativity, Precedence, Token};

/// Expression parser
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given source text
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    /// Parse the source as a single expression; trailing tokens are an error
    pub fn parse(mut self) -> ParseResult<SynExpr> {
        if self.tokens.is_empty() {
            return Err(ParseError::unexpected_eof("expression", Span::empty()));
        }
        let expr = self.parse_expression()?;
        if let Some(tok) = self.peek() {
            return Err(ParseError::unexpected_token(
                tok.text,
                "end of input",
                tok.span,
            ));
        }
        Ok(expr)
    }

    // ==================== Token Management ====================

    fn peek(&self) -> Option<&SpannedToken<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&SpannedToken<'a>> {
        self.tokens.get(self.pos + offset)
    }

    fn check(&self, expected: Token) -> bool {
        self.peek().map(|t| t.token == expected).unwrap_or(false)
    }

    fn check_at(&self, offset: usize, expected: Token) -> bool {
        self.peek_at(offset)
            .map(|t| t.token == expected)
            .unwrap_or(false)
    }

    fn advance(&mut self) -> Option<SpannedToken<'a>> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken<'a>> {
        if self.check(expected) {
            Ok(self.advance().unwrap())
        } else {
            let (found, span) = match self.peek() {
                Some(t) => (t.text, t.span),
                None => ("end of input", self.eof_span()),
            };
            Err(ParseError::unexpected_token(
                found,
                format!("{:?}", expected),
                span,
            ))
        }
    }

    fn eof_span(&self) -> Span {
        Span::new(self.source.len(), self.source.len())
    }

    fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or_else(|| self.eof_span())
    }

    // ==================== Expression Parsing ====================

    /// Parse an expression, recognizing a lambda at this position
    fn parse_expression(&mut self) -> ParseResult<SynExpr> {
        // x => body
        if self.check(Token::Identifier) && self.check_at(1, Token::FatArrow) {
            return self.parse_lambda(false);
        }
        // (x) => body
        if self.check(Token::LParen)
            && self.check_at(1, Token::Identifier)
            && self.check_at(2, Token::RParen)
            && self.check_at(3, Token::FatArrow)
        {
            return self.parse_lambda(true);
        }
        self.parse_conditional()
    }

    fn parse_lambda(&mut self, parenthesized: bool) -> ParseResult<SynExpr> {
        let start = self.current_span();
        if parenthesized {
            self.expect(Token::LParen)?;
        }
        let param = self.expect(Token::Identifier)?.text.to_string();
        if parenthesized {
            self.expect(Token::RParen)?;
        }
        self.expect(Token::FatArrow)?;
        let body = self.parse_expression()?;
        let span = start.merge(&body.span);
        Ok(SynExpr::new(
            SynExprKind::Lambda {
                param,
                body: Box::new(body),
            },
            span,
        ))
    }

    /// Parse a conditional (`?:`) or anything of higher precedence
    fn parse_conditional(&mut self) -> ParseResult<SynExpr> {
        let test = self.parse_binary(Precedence::Coalesce as u8)?;

        if !self.check(Token::Question) {
            return Ok(test);
        }
        self.advance();
        let if_true = self.parse_conditional()?;
        self.expect(Token::Colon)?;
        let if_false = self.parse_conditional()?;
        let span = test.span.merge(&if_false.span);
        Ok(SynExpr::new(
            SynExprKind::Conditional {
                test: Box::new(test),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            },
            span,
        ))
    }

    /// Precedence-climbing loop for binary operators
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<SynExpr> {
        let mut left = self.parse_unary()?;

        while let Some(tok) = self.peek() {
            let Some((prec, assoc)) = tok.token.binary_precedence() else {
                break;
            };
            if (prec as u8) < min_prec {
                break;
            }

            let op_token = self.advance().unwrap();
            let next_prec = match assoc {
                Associativity::Left => prec as u8 + 1,
                Associativity::Right => prec as u8,
            };
            let right = self.parse_binary(next_prec)?;

            let op = binary_op(op_token.token);
            let span = left.span.merge(&right.span);
            left = SynExpr::new(
                SynExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<SynExpr> {
        let op = match self.peek().map(|t| t.token) {
            Some(Token::Not) => Some(SynUnaryOp::Not),
            Some(Token::Minus) => Some(SynUnaryOp::Negate),
            Some(Token::Plus) => Some(SynUnaryOp::Plus),
            _ => None,
        };
        if let Some(op) = op {
            let op_token = self.advance().unwrap();
            let operand = self.parse_unary()?;
            let span = op_token.span.merge(&operand.span);
            return Ok(SynExpr::new(
                SynExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    /// Parse a primary expression followed by member access, invocation
    /// and element access
    fn parse_postfix(&mut self) -> ParseResult<SynExpr> {
        let mut left = self.parse_primary()?;

        loop {
            match self.peek().map(|t| t.token) {
                Some(Token::Dot) => {
                    self.advance();
                    let name_tok = self.expect(Token::Identifier)?;
                    let name = name_tok.text.to_string();
                    if self.check(Token::LParen) {
                        let (args, end) = self.parse_arg_list()?;
                        let span = left.span.merge(&end);
                        left = SynExpr::new(
                            SynExprKind::Call {
                                target: Some(Box::new(left)),
                                name,
                                args,
                                null_safe: false,
                            },
                            span,
                        );
                    } else {
                        let span = left.span.merge(&name_tok.span);
                        left = SynExpr::new(
                            SynExprKind::Member {
                                target: Box::new(left),
                                name,
                            },
                            span,
                        );
                    }
                }
                Some(Token::QuestionDot) => {
                    self.advance();
                    let name_tok = self.expect(Token::Identifier)?;
                    let name = name_tok.text.to_string();
                    if self.check(Token::LParen) {
                        let (args, end) = self.parse_arg_list()?;
                        let span = left.span.merge(&end);
                        left = SynExpr::new(
                            SynExprKind::Call {
                                target: Some(Box::new(left)),
                                name,
                                args,
                                null_safe: true,
                            },
                            span,
                        );
                    } else {
                        let span = left.span.merge(&name_tok.span);
                        left = SynExpr::new(
                            SynExprKind::NullSafeMember {
                                target: Box::new(left),
                                name,
                            },
                            span,
                        );
                    }
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(Token::RBracket) {
                        loop {
                            args.push(self.parse_expression()?);
                            if !self.check(Token::Comma) {
                                break;
                            }
                            self.advance();
                        }
                    }
                    let end = self.expect(Token::RBracket)?;
                    let span = left.span.merge(&end.span);
                    left = SynExpr::new(
                        SynExprKind::Index {
                            target: Box::new(left),
                            args,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> ParseResult<SynExpr> {
        let Some(tok) = self.peek() else {
            return Err(ParseError::unexpected_eof("expression", self.eof_span()));
        };

        match tok.token {
            Token::NumberLiteral => {
                let tok = self.advance().unwrap();
                Ok(SynExpr::new(
                    SynExprKind::Literal(SynLit::Number(tok.text.to_string())),
                    tok.span,
                ))
            }
            Token::StringLiteral => {
                let tok = self.advance().unwrap();
                let body = &tok.text[1..tok.text.len() - 1];
                let value = unescape_string(body, tok.span)?;
                Ok(SynExpr::new(
                    SynExprKind::Literal(SynLit::Str(value)),
                    tok.span,
                ))
            }
            Token::CharLiteral => {
                let tok = self.advance().unwrap();
                let value = unescape_char(tok.text, tok.span)?;
                Ok(SynExpr::new(
                    SynExprKind::Literal(SynLit::Char(value)),
                    tok.span,
                ))
            }
            Token::True | Token::False => {
                let tok = self.advance().unwrap();
                Ok(SynExpr::new(
                    SynExprKind::Literal(SynLit::Bool(tok.token == Token::True)),
                    tok.span,
                ))
            }
            Token::Null => {
                let tok = self.advance().unwrap();
                Ok(SynExpr::new(SynExprKind::Literal(SynLit::Null), tok.span))
            }
            Token::Identifier => {
                let tok = self.advance().unwrap();
                let name = tok.text.to_string();
                if self.check(Token::LParen) {
                    // Bare invocation: Method(args)
                    let (args, end) = self.parse_arg_list()?;
                    let span = tok.span.merge(&end);
                    Ok(SynExpr::new(
                        SynExprKind::Call {
                            target: None,
                            name,
                            args,
                            null_safe: false,
                        },
                        span,
                    ))
                } else {
                    Ok(SynExpr::new(SynExprKind::Ident(name), tok.span))
                }
            }
            Token::LParen => {
                if self.is_cast_ahead() {
                    self.parse_cast()
                } else {
                    let start = self.advance().unwrap().span;
                    let inner = self.parse_expression()?;
                    let end = self.expect(Token::RParen)?;
                    let span = start.merge(&end.span);
                    Ok(SynExpr::new(SynExprKind::Paren(Box::new(inner)), span))
                }
            }
            Token::KwNew => self.parse_new(),
            _ => {
                let tok = self.advance().unwrap();
                Err(ParseError::unexpected_token(tok.text, "expression", tok.span))
            }
        }
    }

    /// Decide between `(Type)operand` and `(expr)` at an opening paren.
    /// A cast is a single identifier (optionally `?`-suffixed), a closing
    /// paren, and a token that can start an operand.
    fn is_cast_ahead(&self) -> bool {
        if !self.check_at(1, Token::Identifier) {
            return false;
        }
        if self.check_at(2, Token::RParen) {
            return self
                .peek_at(3)
                .map(|t| t.token.starts_operand())
                .unwrap_or(false);
        }
        if self.check_at(2, Token::Question) && self.check_at(3, Token::RParen) {
            return self
                .peek_at(4)
                .map(|t| t.token.starts_operand())
                .unwrap_or(false);
        }
        false
    }

    fn parse_cast(&mut self) -> ParseResult<SynExpr> {
        let start = self.expect(Token::LParen)?.span;
        let type_name = self.expect(Token::Identifier)?.text.to_string();
        let nullable = if self.check(Token::Question) {
            self.advance();
            true
        } else {
            false
        };
        self.expect(Token::RParen)?;
        // Casts bind at unary precedence: (int)x.A + 1 casts only x.A
        let operand = self.parse_unary()?;
        let span = start.merge(&operand.span);
        Ok(SynExpr::new(
            SynExprKind::Cast {
                type_name,
                nullable,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Parse the `new` forms: implicit array, anonymous object, or named
    /// object creation
    fn parse_new(&mut self) -> ParseResult<SynExpr> {
        let start = self.expect(Token::KwNew)?.span;

        // new [] { e1, e2, ... }
        if self.check(Token::LBracket) {
            self.advance();
            self.expect(Token::RBracket)?;
            self.expect(Token::LBrace)?;
            let mut elements = Vec::new();
            if !self.check(Token::RBrace) {
                loop {
                    elements.push(self.parse_expression()?);
                    if !self.check(Token::Comma) {
                        break;
                    }
                    self.advance();
                }
            }
            let end = self.expect(Token::RBrace)?;
            let span = start.merge(&end.span);
            return Ok(SynExpr::new(SynExprKind::ArrayLit(elements), span));
        }

        // new { Name = e, x.Id, ... }
        if self.check(Token::LBrace) {
            self.advance();
            let inits = self.parse_initializers()?;
            let end = self.expect(Token::RBrace)?;
            let span = start.merge(&end.span);
            return Ok(SynExpr::new(SynExprKind::AnonObject(inits), span));
        }

        // new TypeName(args) { inits }
        if self.check(Token::Identifier) {
            let type_name = self.advance().unwrap().text.to_string();
            let mut args = Vec::new();
            let mut end = self.current_span();
            if self.check(Token::LParen) {
                let (parsed, end_span) = self.parse_arg_list()?;
                args = parsed;
                end = end_span;
            }
            let mut inits = Vec::new();
            if self.check(Token::LBrace) {
                self.advance();
                inits = self.parse_initializers()?;
                end = self.expect(Token::RBrace)?.span;
            }
            let span = start.merge(&end);
            return Ok(SynExpr::new(
                SynExprKind::ObjectCreation {
                    type_name,
                    args,
                    inits,
                },
                span,
            ));
        }

        let (found, span) = match self.peek() {
            Some(t) => (t.text, t.span),
            None => ("end of input", self.eof_span()),
        };
        Err(ParseError::unexpected_token(
            found,
            "array, anonymous object, or type name after 'new'",
            span,
        ))
    }

    /// Parse comma-separated object initializers: `Name = expr` or a bare
    /// expression
    fn parse_initializers(&mut self) -> ParseResult<Vec<AnonInit>> {
        let mut inits = Vec::new();
        if self.check(Token::RBrace) {
            return Ok(inits);
        }
        loop {
            if self.check(Token::Identifier) && self.check_at(1, Token::Eq) {
                let name = self.advance().unwrap().text.to_string();
                self.advance(); // consume '='
                let value = self.parse_expression()?;
                inits.push(AnonInit {
                    name: Some(name),
                    value,
                });
            } else {
                let value = self.parse_expression()?;
                inits.push(AnonInit { name: None, value });
            }
            if !self.check(Token::Comma) {
                break;
            }
            self.advance();
        }
        Ok(inits)
    }

    /// Parse a parenthesized argument list, returning the arguments and the
    /// span of the closing paren
    fn parse_arg_list(&mut self) -> ParseResult<(Vec<SynExpr>, Span)> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !self.check(Token::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.check(Token::Comma) {
                    break;
                }
                self.advance();
            }
        }
        let end = self.expect(Token::RParen)?;
        Ok((args, end.span))
    }
}

fn binary_op(token: Token) -> SynBinaryOp {
    match token {
        Token::EqEq => SynBinaryOp::Eq,
        Token::NotEq => SynBinaryOp::Ne,
        Token::Lt => SynBinaryOp::Lt,
        Token::LtEq => SynBinaryOp::Le,
        Token::Gt => SynBinaryOp::Gt,
        Token::GtEq => SynBinaryOp::Ge,
        Token::AndAnd => SynBinaryOp::AndAlso,
        Token::OrOr => SynBinaryOp::OrElse,
        Token::Plus => SynBinaryOp::Add,
        Token::Minus => SynBinaryOp::Sub,
        Token::Star => SynBinaryOp::Mul,
        Token::Slash => SynBinaryOp::Div,
        Token::Percent => SynBinaryOp::Rem,
        Token::QuestionQuestion => SynBinaryOp::Coalesce,
        // binary_precedence() admits only the tokens above
        _ => unreachable!("token {:?} is not a binary operator", token),
    }
}

/// Find the first single-parameter lambda in a syntax tree (pre-order)
pub fn first_lambda(expr: &SynExpr) -> Option<&SynExpr> {
    if matches!(expr.kind, SynExprKind::Lambda { .. }) {
        return Some(expr);
    }
    match &expr.kind {
        SynExprKind::Binary { left, right, .. } => {
            first_lambda(left).or_else(|| first_lambda(right))
        }
        SynExprKind::Unary { operand, .. } => first_lambda(operand),
        SynExprKind::Conditional {
            test,
            if_true,
            if_false,
        } => first_lambda(test)
            .or_else(|| first_lambda(if_true))
            .or_else(|| first_lambda(if_false)),
        SynExprKind::Member { target, .. } | SynExprKind::NullSafeMember { target, .. } => {
            first_lambda(target)
        }
        SynExprKind::Call { target, args, .. } => target
            .as_deref()
            .and_then(first_lambda)
            .or_else(|| args.iter().find_map(first_lambda)),
        SynExprKind::Index { target, args } => {
            first_lambda(target).or_else(|| args.iter().find_map(first_lambda))
        }
        SynExprKind::Cast { operand, .. } => first_lambda(operand),
        SynExprKind::ArrayLit(elements) => elements.iter().find_map(first_lambda),
        SynExprKind::AnonObject(inits) => inits.iter().find_map(|i| first_lambda(&i.value)),
        SynExprKind::ObjectCreation { args, inits, .. } => args
            .iter()
            .find_map(first_lambda)
            .or_else(|| inits.iter().find_map(|i| first_lambda(&i.value))),
        SynExprKind::Paren(inner) => first_lambda(inner),
        SynExprKind::Ident(_) | SynExprKind::Literal(_) | SynExprKind::Lambda { .. } => None,
    }
}

/// Parse source text into a syntax tree
pub fn parse(source: &str) -> ParseResult<SynExpr> {
    Parser::new(source)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lambda_body(expr: &SynExpr) -> &SynExpr {
        match &expr.kind {
            SynExprKind::Lambda { body, .. } => body,
            other => panic!("expected lambda, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_lambda() {
        let expr = parse("x => x.Name").unwrap();
        let SynExprKind::Lambda { param, body } = &expr.kind else {
            panic!("expected lambda");
        };
        assert_eq!(param, "x");
        assert!(matches!(body.kind, SynExprKind::Member { .. }));
    }

    #[test]
    fn test_parenthesized_parameter() {
        let expr = parse("(it) => it.A == 1").unwrap();
        let SynExprKind::Lambda { param, .. } = &expr.kind else {
            panic!("expected lambda");
        };
        assert_eq!(param, "it");
    }

    #[test]
    fn test_operator_precedence() {
        // a || b && c parses as a || (b && c)
        let expr = parse("x => x.A || x.B && x.C").unwrap();
        let SynExprKind::Binary { op, right, .. } = &lambda_body(&expr).kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, SynBinaryOp::OrElse);
        assert!(
            matches!(&right.kind, SynExprKind::Binary { op, .. } if *op == SynBinaryOp::AndAlso)
        );
    }

    #[test]
    fn test_comparison_binds_tighter_than_logic() {
        let expr = parse("x => x.A > 1 && x.B < 2").unwrap();
        let SynExprKind::Binary { op, left, right } = &lambda_body(&expr).kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, SynBinaryOp::AndAlso);
        assert!(matches!(&left.kind, SynExprKind::Binary { op, .. } if *op == SynBinaryOp::Gt));
        assert!(matches!(&right.kind, SynExprKind::Binary { op, .. } if *op == SynBinaryOp::Lt));
    }

    #[test]
    fn test_ternary() {
        let expr = parse("x => x.A > 0 ? x.B : x.C").unwrap();
        assert!(matches!(
            lambda_body(&expr).kind,
            SynExprKind::Conditional { .. }
        ));
    }

    #[test]
    fn test_nested_ternary_is_right_associative() {
        let expr = parse("x => x.A ? 1 : x.B ? 2 : 3").unwrap();
        let SynExprKind::Conditional { if_false, .. } = &lambda_body(&expr).kind else {
            panic!("expected conditional");
        };
        assert!(matches!(if_false.kind, SynExprKind::Conditional { .. }));
    }

    #[test]
    fn test_cast() {
        let expr = parse("x => (int)x.A").unwrap();
        let SynExprKind::Cast {
            type_name,
            nullable,
            ..
        } = &lambda_body(&expr).kind
        else {
            panic!("expected cast");
        };
        assert_eq!(type_name, "int");
        assert!(!nullable);
    }

    #[test]
    fn test_nullable_cast() {
        let expr = parse("x => (int?)x.A").unwrap();
        let SynExprKind::Cast { nullable, .. } = &lambda_body(&expr).kind else {
            panic!("expected cast");
        };
        assert!(nullable);
    }

    #[test]
    fn test_paren_is_not_cast() {
        // (x.A) is a parenthesized expression, not a cast
        let expr = parse("x => (x.A)").unwrap();
        assert!(matches!(lambda_body(&expr).kind, SynExprKind::Paren(_)));
    }

    #[test]
    fn test_cast_of_parenthesized() {
        let expr = parse("x => (double)(x.A)").unwrap();
        assert!(matches!(
            lambda_body(&expr).kind,
            SynExprKind::Cast { .. }
        ));
    }

    #[test]
    fn test_method_call_with_lambda_argument() {
        let expr = parse("x => x.Items.Any(i => i.Flag)").unwrap();
        let SynExprKind::Call { name, args, .. } = &lambda_body(&expr).kind else {
            panic!("expected call");
        };
        assert_eq!(name, "Any");
        assert_eq!(args.len(), 1);
        assert!(matches!(args[0].kind, SynExprKind::Lambda { .. }));
    }

    #[test]
    fn test_null_safe_member() {
        let expr = parse("x => x.Address?.City").unwrap();
        assert!(matches!(
            lambda_body(&expr).kind,
            SynExprKind::NullSafeMember { .. }
        ));
    }

    #[test]
    fn test_index() {
        let expr = parse("x => x.Items[0]").unwrap();
        let SynExprKind::Index { args, .. } = &lambda_body(&expr).kind else {
            panic!("expected index");
        };
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_implicit_array() {
        let expr = parse("x => new [] { 1, 2, 3 }").unwrap();
        let SynExprKind::ArrayLit(elements) = &lambda_body(&expr).kind else {
            panic!("expected array literal");
        };
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_anonymous_object() {
        let expr = parse("x => new { Id = x.Id, x.Name }").unwrap();
        let SynExprKind::AnonObject(inits) = &lambda_body(&expr).kind else {
            panic!("expected anonymous object");
        };
        assert_eq!(inits.len(), 2);
        assert_eq!(inits[0].name.as_deref(), Some("Id"));
        assert_eq!(inits[1].name, None);
    }

    #[test]
    fn test_object_creation_parses() {
        let expr = parse("x => new Foo(1, 2)").unwrap();
        assert!(matches!(
            lambda_body(&expr).kind,
            SynExprKind::ObjectCreation { .. }
        ));
    }

    #[test]
    fn test_coalesce_right_associative() {
        let expr = parse("x => x.A ?? x.B ?? x.C").unwrap();
        let SynExprKind::Binary { op, right, .. } = &lambda_body(&expr).kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, SynBinaryOp::Coalesce);
        assert!(
            matches!(&right.kind, SynExprKind::Binary { op, .. } if *op == SynBinaryOp::Coalesce)
        );
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(parse("").is_err());
    }

    #[test]
    fn test_trailing_tokens_fail() {
        assert!(parse("x => x.A 42").is_err());
    }

    #[test]
    fn test_first_lambda_finds_nested() {
        let expr = parse("Foo(x => x.A)").unwrap();
        let lambda = first_lambda(&expr).expect("lambda should be found");
        assert!(matches!(lambda.kind, SynExprKind::Lambda { .. }));
    }

    #[test]
    fn test_first_lambda_none() {
        let expr = parse("1 + 2").unwrap();
        assert!(first_lambda(&expr).is_none());
    }
}
