use crate::ast::{BinaryOp, Block, Expr, Param, Program, Stmt, UnaryOp};
use crate::diagnostics::{Diagnostic, Reporter};
use crate::span::Span;
use crate::stream::{Checkpoint, TokenStream};
use crate::token::{Kind, Literal, Token};

type ParseResult<T> = Result<T, ()>;

/// Parse a token stream into a program. Always returns a best-effort AST,
/// even when diagnostics were reported; syntax errors never abort the pass.
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(TokenStream::new(tokens));
    let program = parser.parse_program();
    (program, parser.reporter.into_diagnostics())
}

pub struct Parser {
    stream: TokenStream,
    reporter: Reporter,
}

impl Parser {
    pub fn new(stream: TokenStream) -> Self {
        Self {
            stream,
            reporter: Reporter::new(),
        }
    }

    fn eat(&mut self, kind: Kind) -> bool {
        if self.stream.at(kind) {
            self.stream.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: Kind) -> ParseResult<Token> {
        if self.stream.at(kind) {
            Ok(self.stream.advance())
        } else {
            self.error_expected(kind.name());
            Err(())
        }
    }

    fn error_expected(&mut self, what: &str) {
        let token = self.stream.current();
        self.reporter.report(Diagnostic::syntax(
            format!("expected {}, found {}", what, token.kind.name()),
            token.span,
        ));
    }

    fn error_at(&mut self, span: Span, message: impl Into<String>) {
        self.reporter.report(Diagnostic::syntax(message, span));
    }

    /// Panic-mode recovery: discard tokens until a statement boundary. The
    /// `before` checkpoint guards against a failed parse that consumed
    /// nothing, so recovery always makes progress or reaches EOF.
    fn synchronize(&mut self, before: Checkpoint) {
        if self.stream.checkpoint() == before && !self.stream.at_eof() {
            self.stream.advance();
        }
        while !self.stream.at_eof() {
            match self.stream.current().kind {
                Kind::Semicolon => {
                    self.stream.advance();
                    return;
                }
                Kind::Var
                | Kind::Const
                | Kind::Func
                | Kind::Print
                | Kind::If
                | Kind::While
                | Kind::Return
                | Kind::Break
                | Kind::Continue
                | Kind::LBrace
                | Kind::RBrace => return,
                _ => {
                    self.stream.advance();
                }
            }
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let start = self.stream.current().span.start;
        let mut decls = Vec::new();

        while !self.stream.at_eof() {
            if self.eat(Kind::Semicolon) {
                continue;
            }
            let before = self.stream.checkpoint();
            match self.parse_statement() {
                Ok(stmt) => decls.push(stmt),
                Err(()) => self.synchronize(before),
            }
        }

        let end = self.stream.current().span.end;
        Program {
            decls,
            span: Span::new(start, end),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.stream.current().kind {
            Kind::Func => self.parse_function(),
            Kind::Var => self.parse_var_decl(),
            Kind::Const => self.parse_const_decl(),
            Kind::Print => self.parse_print(),
            Kind::If => self.parse_if(),
            Kind::While => self.parse_while(),
            Kind::Return => self.parse_return(),
            Kind::Break => {
                let token = self.stream.advance();
                let semi = self.expect(Kind::Semicolon)?;
                Ok(Stmt::Break {
                    span: token.span.to(&semi.span),
                })
            }
            Kind::Continue => {
                let token = self.stream.advance();
                let semi = self.expect(Kind::Semicolon)?;
                Ok(Stmt::Continue {
                    span: token.span.to(&semi.span),
                })
            }
            Kind::LBrace => {
                let block = self.parse_block()?;
                Ok(Stmt::Block {
                    span: block.span,
                    block,
                })
            }
            Kind::Import => {
                // Reserved without a statement form, matching the language.
                let span = self.stream.current().span;
                self.error_at(span, "'import' is reserved and cannot start a statement");
                Err(())
            }
            _ => self.parse_expr_statement(),
        }
    }

    fn parse_function(&mut self) -> ParseResult<Stmt> {
        let func_token = self.stream.advance();
        let name = self.expect(Kind::Identifier)?;
        self.expect(Kind::LParen)?;

        let mut params = Vec::new();
        if !self.stream.at(Kind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.eat(Kind::Comma) {
                    break;
                }
            }
        }
        self.expect(Kind::RParen)?;

        let return_type = if self.stream.at(Kind::Identifier) {
            Some(self.stream.advance().lexeme)
        } else {
            None
        };

        let body = self.parse_block()?;
        let span = func_token.span.to(&body.span);
        Ok(Stmt::Function {
            name: name.lexeme,
            params,
            return_type,
            body,
            span,
        })
    }

    fn parse_param(&mut self) -> ParseResult<Param> {
        let name = self.expect(Kind::Identifier)?;
        if !self.stream.at(Kind::Identifier) {
            self.error_expected("parameter type");
            return Err(());
        }
        let ty = self.stream.advance();
        Ok(Param {
            span: name.span.to(&ty.span),
            name: name.lexeme,
            ty: ty.lexeme,
        })
    }

    fn parse_var_decl(&mut self) -> ParseResult<Stmt> {
        let var_token = self.stream.advance();
        let name = self.expect(Kind::Identifier)?;
        let ty = if self.stream.at(Kind::Identifier) {
            Some(self.stream.advance().lexeme)
        } else {
            None
        };
        let init = if self.eat(Kind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let semi = self.expect(Kind::Semicolon)?;
        Ok(Stmt::VarDecl {
            name: name.lexeme,
            ty,
            init,
            span: var_token.span.to(&semi.span),
        })
    }

    fn parse_const_decl(&mut self) -> ParseResult<Stmt> {
        let const_token = self.stream.advance();
        let name = self.expect(Kind::Identifier)?;
        self.expect(Kind::Assign)?;
        let value = self.parse_expression()?;
        let semi = self.expect(Kind::Semicolon)?;
        Ok(Stmt::ConstDecl {
            name: name.lexeme,
            value,
            span: const_token.span.to(&semi.span),
        })
    }

    fn parse_print(&mut self) -> ParseResult<Stmt> {
        let print_token = self.stream.advance();
        let expr = self.parse_expression()?;
        let semi = self.expect(Kind::Semicolon)?;
        Ok(Stmt::Print {
            expr,
            span: print_token.span.to(&semi.span),
        })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let if_token = self.stream.advance();
        self.expect(Kind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(Kind::RParen)?;
        let then_block = self.parse_block()?;
        let mut span = if_token.span.to(&then_block.span);

        let else_branch = if self.eat(Kind::Else) {
            let branch = if self.stream.at(Kind::If) {
                self.parse_if()?
            } else {
                let block = self.parse_block()?;
                Stmt::Block {
                    span: block.span,
                    block,
                }
            };
            span = span.to(&branch.span());
            Some(Box::new(branch))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_branch,
            span,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let while_token = self.stream.advance();
        self.expect(Kind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(Kind::RParen)?;
        let body = self.parse_block()?;
        let span = while_token.span.to(&body.span);
        Ok(Stmt::While {
            condition,
            body,
            span,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let return_token = self.stream.advance();
        let value = if self.stream.at(Kind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let semi = self.expect(Kind::Semicolon)?;
        Ok(Stmt::Return {
            value,
            span: return_token.span.to(&semi.span),
        })
    }

    fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect(Kind::LBrace)?;
        let mut stmts = Vec::new();

        while !self.stream.at(Kind::RBrace) && !self.stream.at_eof() {
            if self.eat(Kind::Semicolon) {
                continue;
            }
            let before = self.stream.checkpoint();
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(()) => self.synchronize(before),
            }
        }

        let close = self.expect(Kind::RBrace)?;
        Ok(Block {
            stmts,
            span: open.span.to(&close.span),
        })
    }

    fn parse_expr_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;
        let semi = self.expect(Kind::Semicolon)?;
        let span = expr.span().to(&semi.span);
        Ok(Stmt::ExprStmt { expr, span })
    }

    // =========================================================================
    // Expressions, lowest precedence first
    // =========================================================================

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_or()?;
        if self.stream.at(Kind::Assign) {
            self.stream.advance();
            // Right-associative: x = y = 1 assigns to y first.
            let value = self.parse_assignment()?;
            return match expr {
                Expr::Identifier { name, span } => {
                    let full = span.to(&value.span());
                    Ok(Expr::Assign {
                        target: name,
                        target_span: span,
                        value: Box::new(value),
                        span: full,
                    })
                }
                other => {
                    self.error_at(other.span(), "invalid assignment target");
                    Err(())
                }
            };
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while self.stream.at(Kind::Or) {
            self.stream.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.stream.at(Kind::And) {
            self.stream.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.stream.current().kind {
                Kind::Eq => BinaryOp::Eq,
                Kind::NotEq => BinaryOp::NotEq,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.stream.current().kind {
                Kind::Lt => BinaryOp::Lt,
                Kind::LtEq => BinaryOp::LtEq,
                Kind::Gt => BinaryOp::Gt,
                Kind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.stream.current().kind {
                Kind::Plus => BinaryOp::Add,
                Kind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.stream.current().kind {
                Kind::Star => BinaryOp::Mul,
                Kind::Slash => BinaryOp::Div,
                Kind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.stream.current().kind {
            Kind::Minus => UnaryOp::Neg,
            Kind::Not => UnaryOp::Not,
            Kind::Plus => UnaryOp::Plus,
            _ => return self.parse_primary(),
        };
        let token = self.stream.advance();
        let operand = self.parse_unary()?;
        let span = token.span.to(&operand.span());
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.stream.current().kind {
            Kind::Integer => {
                let token = self.stream.advance();
                let value = match token.literal {
                    Some(Literal::Int(v)) => v,
                    _ => 0,
                };
                Ok(Expr::Integer {
                    value,
                    span: token.span,
                })
            }
            Kind::Float => {
                let token = self.stream.advance();
                let value = match token.literal {
                    Some(Literal::Float(v)) => v,
                    _ => 0.0,
                };
                Ok(Expr::Float {
                    value,
                    span: token.span,
                })
            }
            Kind::Str => {
                let token = self.stream.advance();
                let value = match token.literal {
                    Some(Literal::Str(v)) => v,
                    _ => String::new(),
                };
                Ok(Expr::Str {
                    value,
                    span: token.span,
                })
            }
            Kind::Char => {
                let token = self.stream.advance();
                let value = match token.literal {
                    Some(Literal::Char(v)) => v,
                    _ => '\0',
                };
                Ok(Expr::Char {
                    value,
                    span: token.span,
                })
            }
            Kind::True | Kind::False => {
                let token = self.stream.advance();
                Ok(Expr::Bool {
                    value: token.kind == Kind::True,
                    span: token.span,
                })
            }
            Kind::Identifier => {
                let ident = self.stream.advance();
                if self.stream.at(Kind::LParen) {
                    self.parse_call(ident)
                } else {
                    Ok(Expr::Identifier {
                        name: ident.lexeme,
                        span: ident.span,
                    })
                }
            }
            Kind::LParen => {
                self.stream.advance();
                let expr = self.parse_expression()?;
                self.expect(Kind::RParen)?;
                Ok(expr)
            }
            _ => {
                self.error_expected("expression");
                Err(())
            }
        }
    }

    fn parse_call(&mut self, ident: Token) -> ParseResult<Expr> {
        self.expect(Kind::LParen)?;
        let mut args = Vec::new();
        if !self.stream.at(Kind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(Kind::Comma) {
                    break;
                }
            }
        }
        let close = self.expect(Kind::RParen)?;
        Ok(Expr::Call {
            name: ident.lexeme,
            args,
            span: ident.span.to(&close.span),
        })
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span().to(&right.span());
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;
    use crate::source::SourceBuffer;

    fn parse_source(input: &str) -> (Program, Vec<Diagnostic>) {
        let (tokens, lex_diags) = lexer::tokenize(&SourceBuffer::new(input));
        assert!(lex_diags.is_empty(), "unexpected lex errors: {:?}", lex_diags);
        parse(tokens)
    }

    fn parse_ok(input: &str) -> Program {
        let (program, diags) = parse_source(input);
        assert!(diags.is_empty(), "unexpected parse errors: {:?}", diags);
        program
    }

    #[test]
    fn empty_program() {
        let program = parse_ok("");
        assert!(program.decls.is_empty());
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let program = parse_ok("x = 1 + 2 * 3;");
        let Stmt::ExprStmt { expr, .. } = &program.decls[0] else {
            panic!("expected expression statement");
        };
        let Expr::Assign { target, value, .. } = expr else {
            panic!("expected assignment, got {:?}", expr);
        };
        assert_eq!(target, "x");
        let Expr::Binary {
            op: BinaryOp::Add,
            left,
            right,
            ..
        } = value.as_ref()
        else {
            panic!("expected addition at the top, got {:?}", value);
        };
        assert!(matches!(**left, Expr::Integer { value: 1, .. }));
        let Expr::Binary {
            op: BinaryOp::Mul,
            left: mul_left,
            right: mul_right,
            ..
        } = right.as_ref()
        else {
            panic!("expected multiplication on the right");
        };
        assert!(matches!(**mul_left, Expr::Integer { value: 2, .. }));
        assert!(matches!(**mul_right, Expr::Integer { value: 3, .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse_ok("x = y = 1;");
        let Stmt::ExprStmt { expr, .. } = &program.decls[0] else {
            panic!("expected expression statement");
        };
        let Expr::Assign { target, value, .. } = expr else {
            panic!("expected assignment");
        };
        assert_eq!(target, "x");
        assert!(matches!(value.as_ref(), Expr::Assign { target, .. } if target == "y"));
    }

    #[test]
    fn binary_operators_are_left_associative() {
        let program = parse_ok("x = 1 - 2 - 3;");
        let Stmt::ExprStmt {
            expr: Expr::Assign { value, .. },
            ..
        } = &program.decls[0]
        else {
            panic!("expected assignment statement");
        };
        let Expr::Binary {
            op: BinaryOp::Sub,
            left,
            right,
            ..
        } = value.as_ref()
        else {
            panic!("expected subtraction at the top");
        };
        assert!(matches!(
            left.as_ref(),
            Expr::Binary {
                op: BinaryOp::Sub,
                ..
            }
        ));
        assert!(matches!(**right, Expr::Integer { value: 3, .. }));
    }

    #[test]
    fn if_with_condition_and_return() {
        let program = parse_ok("if (x > 0) { return x; }");
        let Stmt::If {
            condition,
            then_block,
            else_branch,
            ..
        } = &program.decls[0]
        else {
            panic!("expected if statement");
        };
        let Expr::Binary {
            op: BinaryOp::Gt,
            left,
            right,
            ..
        } = condition
        else {
            panic!("expected comparison condition");
        };
        assert!(matches!(left.as_ref(), Expr::Identifier { name, .. } if name == "x"));
        assert!(matches!(**right, Expr::Integer { value: 0, .. }));
        assert_eq!(then_block.stmts.len(), 1);
        assert!(matches!(then_block.stmts[0], Stmt::Return { .. }));
        assert!(else_branch.is_none());
    }

    #[test]
    fn else_if_chain() {
        let program = parse_ok("if (a) { } else if (b) { } else { }");
        let Stmt::If { else_branch, .. } = &program.decls[0] else {
            panic!("expected if statement");
        };
        let Some(else_branch) = else_branch else {
            panic!("expected else branch");
        };
        let Stmt::If {
            else_branch: inner_else,
            ..
        } = else_branch.as_ref()
        else {
            panic!("expected else-if");
        };
        assert!(matches!(
            inner_else.as_deref(),
            Some(Stmt::Block { .. })
        ));
    }

    #[test]
    fn function_declaration() {
        let program = parse_ok("func add(a int, b int) int { return a + b; }");
        let Stmt::Function {
            name,
            params,
            return_type,
            body,
            ..
        } = &program.decls[0]
        else {
            panic!("expected function");
        };
        assert_eq!(name, "add");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "a");
        assert_eq!(params[0].ty, "int");
        assert_eq!(return_type.as_deref(), Some("int"));
        assert_eq!(body.stmts.len(), 1);
    }

    #[test]
    fn function_without_return_type() {
        let program = parse_ok("func main() { print 1; }");
        let Stmt::Function { return_type, .. } = &program.decls[0] else {
            panic!("expected function");
        };
        assert!(return_type.is_none());
    }

    #[test]
    fn var_and_const_declarations() {
        let program = parse_ok("var x int = 1; var y; const z = 2;");
        assert_eq!(program.decls.len(), 3);
        assert!(matches!(
            &program.decls[0],
            Stmt::VarDecl { name, ty: Some(ty), init: Some(_), .. }
                if name == "x" && ty == "int"
        ));
        assert!(matches!(
            &program.decls[1],
            Stmt::VarDecl { ty: None, init: None, .. }
        ));
        assert!(matches!(&program.decls[2], Stmt::ConstDecl { name, .. } if name == "z"));
    }

    #[test]
    fn while_loop_with_break_and_continue() {
        let program = parse_ok("while (true) { break; continue; }");
        let Stmt::While { body, .. } = &program.decls[0] else {
            panic!("expected while");
        };
        assert!(matches!(body.stmts[0], Stmt::Break { .. }));
        assert!(matches!(body.stmts[1], Stmt::Continue { .. }));
    }

    #[test]
    fn call_arguments() {
        let program = parse_ok("print f(1, g(2), x);");
        let Stmt::Print { expr, .. } = &program.decls[0] else {
            panic!("expected print");
        };
        let Expr::Call { name, args, .. } = expr else {
            panic!("expected call");
        };
        assert_eq!(name, "f");
        assert_eq!(args.len(), 3);
        assert!(matches!(&args[1], Expr::Call { name, .. } if name == "g"));
    }

    #[test]
    fn unary_binds_tighter_than_multiplication() {
        let program = parse_ok("x = -a * b;");
        let Stmt::ExprStmt {
            expr: Expr::Assign { value, .. },
            ..
        } = &program.decls[0]
        else {
            panic!("expected assignment");
        };
        let Expr::Binary {
            op: BinaryOp::Mul,
            left,
            ..
        } = value.as_ref()
        else {
            panic!("expected multiplication at the top");
        };
        assert!(matches!(
            left.as_ref(),
            Expr::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
    }

    #[test]
    fn missing_expression_reports_once_and_recovers() {
        let (program, diags) = parse_source("x = ;\ny = 1;");
        assert_eq!(diags.len(), 1, "diagnostics: {:?}", diags);
        assert!(diags[0].message.contains("expected expression"));
        assert_eq!(program.decls.len(), 1);
        assert!(matches!(
            &program.decls[0],
            Stmt::ExprStmt {
                expr: Expr::Assign { target, .. },
                ..
            } if target == "y"
        ));
    }

    #[test]
    fn invalid_assignment_target() {
        let (_, diags) = parse_source("1 = 2;");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("invalid assignment target"));
    }

    #[test]
    fn recovery_inside_a_block() {
        let (program, diags) = parse_source("func f() { x = ; return 1; }");
        assert_eq!(diags.len(), 1);
        let Stmt::Function { body, .. } = &program.decls[0] else {
            panic!("expected function");
        };
        assert_eq!(body.stmts.len(), 1);
        assert!(matches!(body.stmts[0], Stmt::Return { .. }));
    }

    #[test]
    fn import_is_rejected() {
        let (_, diags) = parse_source("import \"fmt\";");
        assert!(!diags.is_empty());
        assert!(diags[0].message.contains("'import' is reserved"));
    }

    #[test]
    fn garbage_input_terminates() {
        let (tokens, _) = lexer::tokenize(&SourceBuffer::new(")))((( ;; }}} var"));
        let (program, diags) = parse(tokens);
        // Recovery reached EOF with a best-effort (here empty) program.
        assert!(!diags.is_empty());
        assert!(program.decls.is_empty());
    }

    #[test]
    fn child_spans_are_contained_in_parent_spans() {
        let program = parse_ok("func f(a int) int { if (a > 1) { return a * 2; } return 0; }");
        let Stmt::Function { body, span, .. } = &program.decls[0] else {
            panic!("expected function");
        };
        assert!(program.span.contains(span));
        assert!(span.contains(&body.span));
        for stmt in &body.stmts {
            assert!(body.span.contains(&stmt.span()));
        }
        let Stmt::If {
            condition,
            then_block,
            span: if_span,
            ..
        } = &body.stmts[0]
        else {
            panic!("expected if");
        };
        assert!(if_span.contains(&condition.span()));
        assert!(if_span.contains(&then_block.span));
    }
}
