//! Recursive-descent parser with precedence climbing. The grammar is
//! layout-insensitive: newlines are real tokens, skipped between statements
//! and inside constructs where they're harmless (after commas, openers).
use std::rc::Rc;

use crate::ast::expression::{FunctionDeclaration, LogicalOp, Parameter};
use crate::ast::statement::IfBranch;
use crate::ast::{Expression, Program, Statement};
use crate::diagnostic::{Diagnostic, Position};
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn position(&self) -> Position {
        self.current().position
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, Diagnostic> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(Diagnostic::parse(
                format!("expected {what}, found {:?}", self.peek_kind()),
                self.position(),
            ))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    pub fn parse(mut self) -> Result<Program, Diagnostic> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }
        Ok(Program { statements })
    }

    fn parse_type_annotation(&mut self) -> Result<String, Diagnostic> {
        let name = match self.peek_kind().clone() {
            TokenKind::TypeInt => "int".to_string(),
            TokenKind::TypeFloat => "float".to_string(),
            TokenKind::TypeString => "string".to_string(),
            TokenKind::TypeBool => "bool".to_string(),
            TokenKind::TypeVoid => "void".to_string(),
            TokenKind::TypeList => "list".to_string(),
            TokenKind::TypeMap => "map".to_string(),
            TokenKind::Identifier(name) => name,
            other => {
                return Err(Diagnostic::parse(
                    format!("expected type annotation, found {other:?}"),
                    self.position(),
                ))
            }
        };
        self.advance();
        Ok(name)
    }

    fn parse_statement(&mut self) -> Result<Statement, Diagnostic> {
        match self.peek_kind() {
            TokenKind::Let | TokenKind::Const => self.parse_variable_declaration(),
            TokenKind::Fn => self.parse_function_declaration(false),
            TokenKind::Async => self.parse_async_function(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Break => {
                let position = self.position();
                self.advance();
                Ok(Statement::Break(position))
            }
            TokenKind::Continue => {
                let position = self.position();
                self.advance();
                Ok(Statement::Continue(position))
            }
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Struct => self.parse_struct_declaration(),
            TokenKind::Enum => self.parse_enum_declaration(),
            TokenKind::Contract => self.parse_contract_declaration(),
            TokenKind::Event => self.parse_event_declaration(),
            TokenKind::Emit => self.parse_emit_statement(),
            TokenKind::Impl => self.parse_impl_block(),
            _ => self.parse_expression_or_assignment(),
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        let is_const = self.check(&TokenKind::Const);
        self.advance();
        let name = self.expect_identifier("variable name")?;
        let type_annotation = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        let value = if self.matches(&TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Statement::VarDecl {
            name,
            type_annotation,
            value,
            is_const,
            position,
        })
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, Diagnostic> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(Diagnostic::parse(
                format!("expected {what}, found {other:?}"),
                self.position(),
            )),
        }
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, Diagnostic> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RParen) {
            let name = self.expect_identifier("parameter name")?;
            let type_annotation = if self.matches(&TokenKind::Colon) {
                Some(self.parse_type_annotation()?)
            } else {
                None
            };
            let default = if self.matches(&TokenKind::Assign) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            params.push(Parameter {
                name,
                type_annotation,
                default,
            });
            self.skip_newlines();
            if !self.matches(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(params)
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, Diagnostic> {
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(statements)
    }

    fn parse_function_declaration(&mut self, is_async: bool) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Fn, "'fn'")?;
        let name = self.expect_identifier("function name")?;
        let params = self.parse_parameters()?;
        let return_type = if self.matches(&TokenKind::Arrow) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Statement::FnDecl(Rc::new(FunctionDeclaration {
            name,
            params,
            return_type,
            body,
            is_async,
            position,
        })))
    }

    fn parse_async_function(&mut self) -> Result<Statement, Diagnostic> {
        self.expect(TokenKind::Async, "'async'")?;
        self.parse_function_declaration(true)
    }

    fn parse_if_statement(&mut self) -> Result<Statement, Diagnostic> {
        self.expect(TokenKind::If, "'if'")?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let then_branch = IfBranch { condition, body };
        let mut elif_branches = Vec::new();
        let mut else_branch = None;
        loop {
            self.skip_newlines_peek_only();
            if self.check(&TokenKind::Elif) {
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_block()?;
                elif_branches.push(IfBranch { condition, body });
            } else if self.check(&TokenKind::Else) {
                self.advance();
                else_branch = Some(self.parse_block()?);
                break;
            } else {
                break;
            }
        }
        Ok(Statement::If {
            then_branch,
            elif_branches,
            else_branch,
        })
    }

    /// `elif`/`else` may follow a `}` on the next line; peek past newlines
    /// without consuming them if neither keyword follows.
    fn skip_newlines_peek_only(&mut self) {
        let save = self.pos;
        self.skip_newlines();
        if !matches!(self.peek_kind(), TokenKind::Elif | TokenKind::Else) {
            self.pos = save;
        }
    }

    fn parse_while_statement(&mut self) -> Result<Statement, Diagnostic> {
        self.expect(TokenKind::While, "'while'")?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::While { condition, body })
    }

    fn parse_for_statement(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::For, "'for'")?;
        let var = self.expect_identifier("loop variable")?;
        self.expect(TokenKind::In, "'in'")?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::ForIn {
            var,
            iterable,
            body,
            position,
        })
    }

    fn parse_return_statement(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Return, "'return'")?;
        let value = if matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        Ok(Statement::Return(value, position))
    }

    fn parse_struct_declaration(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Struct, "'struct'")?;
        let name = self.expect_identifier("struct name")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Fn) {
            let field_name = self.expect_identifier("field name")?;
            self.expect(TokenKind::Colon, "':'")?;
            let field_type = self.parse_type_annotation()?;
            fields.push((field_name, field_type));
            self.skip_newlines();
            self.matches(&TokenKind::Comma);
            self.skip_newlines();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Statement::StructDecl {
            name,
            fields,
            position,
        })
    }

    fn parse_enum_declaration(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Enum, "'enum'")?;
        let name = self.expect_identifier("enum name")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();
        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            variants.push(self.expect_identifier("variant name")?);
            self.skip_newlines();
            self.matches(&TokenKind::Comma);
            self.skip_newlines();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Statement::EnumDecl {
            name,
            variants,
            position,
        })
    }

    fn parse_contract_declaration(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Contract, "'contract'")?;
        let name = self.expect_identifier("contract name")?;
        let body = self.parse_block()?;
        Ok(Statement::ContractDecl {
            name,
            body,
            position,
        })
    }

    fn parse_event_declaration(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Event, "'event'")?;
        let name = self.expect_identifier("event name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut fields = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RParen) {
            let field_name = self.expect_identifier("field name")?;
            self.expect(TokenKind::Colon, "':'")?;
            let field_type = self.parse_type_annotation()?;
            fields.push((field_name, field_type));
            self.skip_newlines();
            if !self.matches(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Statement::EventDecl {
            name,
            fields,
            position,
        })
    }

    fn parse_emit_statement(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Emit, "'emit'")?;
        let name = self.expect_identifier("event name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let args = self.parse_call_arguments()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Statement::Emit {
            name,
            args,
            position,
        })
    }

    fn parse_impl_block(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Impl, "'impl'")?;
        let type_name = self.expect_identifier("type name")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let is_async = self.matches(&TokenKind::Async);
            match self.parse_function_declaration(is_async)? {
                Statement::FnDecl(decl) => methods.push(decl),
                _ => unreachable!(),
            }
            self.skip_newlines();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Statement::Impl {
            type_name,
            methods,
            position,
        })
    }

    fn parse_expression_or_assignment(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.position();
        let expr = self.parse_expression()?;
        let op = match self.peek_kind() {
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            _ => return Ok(Statement::Expression(expr)),
        };
        self.advance();
        let value = self.parse_expression()?;
        Ok(Statement::Assignment {
            target: expr,
            op: op.to_string(),
            value,
            position,
        })
    }

    // ---- expressions, in precedence order (low to high): or, and, not,
    // comparison, additive, multiplicative, power (right-assoc), unary,
    // await, postfix, primary ----

    pub fn parse_expression(&mut self) -> Result<Expression, Diagnostic> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Or) {
            let position = self.position();
            self.advance();
            let right = self.parse_and()?;
            left = Expression::Logical {
                left: Box::new(left),
                op: LogicalOp::Or,
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_not()?;
        while self.check(&TokenKind::And) {
            let position = self.position();
            self.advance();
            let right = self.parse_not()?;
            left = Expression::Logical {
                left: Box::new(left),
                op: LogicalOp::And,
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression, Diagnostic> {
        if self.check(&TokenKind::Not) {
            let position = self.position();
            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expression::Unary {
                op: "not".to_string(),
                operand: Box::new(operand),
                position,
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => "==",
                TokenKind::NotEq => "!=",
                TokenKind::Less => "<",
                TokenKind::Greater => ">",
                TokenKind::LessEq => "<=",
                TokenKind::GreaterEq => ">=",
                _ => break,
            };
            let position = self.position();
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::Comparison {
                left: Box::new(left),
                op: op.to_string(),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => "+",
                TokenKind::Minus => "-",
                TokenKind::BitAnd => "&",
                TokenKind::BitOr => "|",
                TokenKind::BitXor => "^",
                TokenKind::Shl => "<<",
                TokenKind::Shr => ">>",
                _ => break,
            };
            let position = self.position();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary {
                left: Box::new(left),
                op: op.to_string(),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => "*",
                TokenKind::Slash => "/",
                TokenKind::Percent => "%",
                _ => break,
            };
            let position = self.position();
            self.advance();
            let right = self.parse_power()?;
            left = Expression::Binary {
                left: Box::new(left),
                op: op.to_string(),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Expression, Diagnostic> {
        let left = self.parse_unary()?;
        if self.check(&TokenKind::Power) {
            let position = self.position();
            self.advance();
            let right = self.parse_power()?; // right-associative
            return Ok(Expression::Binary {
                left: Box::new(left),
                op: "**".to_string(),
                right: Box::new(right),
                position,
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, Diagnostic> {
        match self.peek_kind() {
            TokenKind::Minus => {
                let position = self.position();
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expression::Unary {
                    op: "-".to_string(),
                    operand: Box::new(operand),
                    position,
                })
            }
            TokenKind::BitNot => {
                let position = self.position();
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expression::Unary {
                    op: "~".to_string(),
                    operand: Box::new(operand),
                    position,
                })
            }
            _ => self.parse_await(),
        }
    }

    fn parse_await(&mut self) -> Result<Expression, Diagnostic> {
        if self.check(&TokenKind::Await) {
            let position = self.position();
            self.advance();
            let expr = self.parse_await()?;
            return Ok(Expression::Await {
                expr: Box::new(expr),
                position,
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression, Diagnostic> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    let position = self.position();
                    self.advance();
                    let name = self.expect_identifier("member name")?;
                    if self.check(&TokenKind::LParen) {
                        self.advance();
                        let args = self.parse_call_arguments()?;
                        self.expect(TokenKind::RParen, "')'")?;
                        expr = Expression::MethodCall {
                            object: Box::new(expr),
                            method: name,
                            args,
                            position,
                        };
                    } else {
                        expr = Expression::Member {
                            object: Box::new(expr),
                            name,
                            position,
                        };
                    }
                }
                TokenKind::LBracket => {
                    let position = self.position();
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expression::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                        position,
                    };
                }
                TokenKind::LParen => {
                    let position = self.position();
                    self.advance();
                    let args = self.parse_call_arguments()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    expr = Expression::Call {
                        callee: Box::new(expr),
                        args,
                        position,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, Diagnostic> {
        let mut args = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.matches(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expression, Diagnostic> {
        let position = self.position();
        match self.peek_kind().clone() {
            TokenKind::Integer(v) => {
                self.advance();
                Ok(Expression::Integer(v, position))
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(Expression::Float(v, position))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expression::Str(s, position))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::Boolean(true, position))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::Boolean(false, position))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expression::Null(position))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expression::Identifier(name, position))
            }
            TokenKind::Backslash => self.parse_lambda(),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_map_literal(),
            other => Err(Diagnostic::parse(
                format!("unexpected token {other:?}"),
                position,
            )),
        }
    }

    /// `\(params) => expr` — reuses the reserved backslash/fat-arrow tokens.
    fn parse_lambda(&mut self) -> Result<Expression, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::Backslash, "'\\'")?;
        let params = self.parse_parameters()?;
        self.expect(TokenKind::FatArrow, "'=>'")?;
        let body = self.parse_expression()?;
        Ok(Expression::Lambda {
            params,
            body: Box::new(body),
            position,
        })
    }

    fn parse_list_literal(&mut self) -> Result<Expression, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::LBracket, "'['")?;
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RBracket) {
            items.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.matches(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Expression::ListLiteral(items, position))
    }

    fn parse_map_literal(&mut self) -> Result<Expression, Diagnostic> {
        let position = self.position();
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut entries = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) {
            let key = self.parse_expression()?;
            self.expect(TokenKind::Colon, "':'")?;
            let value = self.parse_expression()?;
            entries.push((key, value));
            self.skip_newlines();
            if !self.matches(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Expression::MapLiteral(entries, position))
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Program, Diagnostic> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(src: &str) -> Program {
        parse(tokenize(src).unwrap()).unwrap()
    }

    #[test]
    fn parses_arithmetic_precedence() {
        let program = parse_source("1 + 2 * 3\n");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Expression(Expression::Binary { op, left, .. }) => {
                assert_eq!(op, "+");
                assert!(matches!(**left, Expression::Integer(1, _)));
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let program = parse_source("2 ** 3 ** 2\n");
        match &program.statements[0] {
            Statement::Expression(Expression::Binary { right, .. }) => {
                assert!(matches!(**right, Expression::Binary { .. }));
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_if_elif_else() {
        let program = parse_source("if x {\n1\n} elif y {\n2\n} else {\n3\n}\n");
        assert!(matches!(&program.statements[0], Statement::If { .. }));
    }

    #[test]
    fn parses_lambda() {
        let program = parse_source("let f = \\(x) => x + 1\n");
        match &program.statements[0] {
            Statement::VarDecl {
                value: Some(Expression::Lambda { .. }),
                ..
            } => {}
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_compound_assignment() {
        let program = parse_source("x += 1\n");
        assert!(matches!(
            &program.statements[0],
            Statement::Assignment { op, .. } if op == "+="
        ));
    }

    #[test]
    fn distinguishes_member_from_method_call() {
        let program = parse_source("a.b\na.c()\n");
        assert!(matches!(
            &program.statements[0],
            Statement::Expression(Expression::Member { .. })
        ));
        assert!(matches!(
            &program.statements[1],
            Statement::Expression(Expression::MethodCall { .. })
        ));
    }
}
