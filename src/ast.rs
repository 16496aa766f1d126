use crate::span::Span;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub decls: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stmt {
    Function {
        name: String,
        params: Vec<Param>,
        return_type: Option<String>,
        body: Block,
        span: Span,
    },
    VarDecl {
        name: String,
        ty: Option<String>,
        init: Option<Expr>,
        span: Span,
    },
    ConstDecl {
        name: String,
        value: Expr,
        span: Span,
    },
    Print {
        expr: Expr,
        span: Span,
    },
    If {
        condition: Expr,
        then_block: Block,
        /// Either a block or another If (for `else if` chains).
        else_branch: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Block,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    Block {
        block: Block,
        span: Span,
    },
    ExprStmt {
        expr: Expr,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Function { span, .. }
            | Stmt::VarDecl { span, .. }
            | Stmt::ConstDecl { span, .. }
            | Stmt::Print { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Break { span }
            | Stmt::Continue { span }
            | Stmt::Block { span, .. }
            | Stmt::ExprStmt { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    Integer {
        value: i64,
        span: Span,
    },
    Float {
        value: f64,
        span: Span,
    },
    Str {
        value: String,
        span: Span,
    },
    Char {
        value: char,
        span: Span,
    },
    Bool {
        value: bool,
        span: Span,
    },
    Identifier {
        name: String,
        span: Span,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Assign {
        target: String,
        target_span: Span,
        value: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Integer { span, .. }
            | Expr::Float { span, .. }
            | Expr::Str { span, .. }
            | Expr::Char { span, .. }
            | Expr::Bool { span, .. }
            | Expr::Identifier { span, .. }
            | Expr::Call { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assign { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
    Plus,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Plus => "+",
        }
    }
}

impl Program {
    /// Indented textual rendering of the tree, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str("Program\n");
        for stmt in &self.decls {
            dump_stmt(&mut out, stmt, 1);
        }
        out
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn dump_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    indent(out, depth);
    match stmt {
        Stmt::Function {
            name,
            params,
            return_type,
            body,
            ..
        } => {
            match return_type {
                Some(ty) => {
                    let _ = writeln!(out, "Function({}) -> {}", name, ty);
                }
                None => {
                    let _ = writeln!(out, "Function({})", name);
                }
            }
            for param in params {
                indent(out, depth + 1);
                let _ = writeln!(out, "Param({}: {})", param.name, param.ty);
            }
            dump_block(out, body, depth + 1);
        }
        Stmt::VarDecl { name, ty, init, .. } => {
            match ty {
                Some(ty) => {
                    let _ = writeln!(out, "VarDecl({}: {})", name, ty);
                }
                None => {
                    let _ = writeln!(out, "VarDecl({})", name);
                }
            }
            if let Some(init) = init {
                dump_expr(out, init, depth + 1);
            }
        }
        Stmt::ConstDecl { name, value, .. } => {
            let _ = writeln!(out, "ConstDecl({})", name);
            dump_expr(out, value, depth + 1);
        }
        Stmt::Print { expr, .. } => {
            out.push_str("Print\n");
            dump_expr(out, expr, depth + 1);
        }
        Stmt::If {
            condition,
            then_block,
            else_branch,
            ..
        } => {
            out.push_str("If\n");
            dump_expr(out, condition, depth + 1);
            dump_block(out, then_block, depth + 1);
            if let Some(else_branch) = else_branch {
                indent(out, depth);
                out.push_str("Else\n");
                dump_stmt(out, else_branch, depth + 1);
            }
        }
        Stmt::While {
            condition, body, ..
        } => {
            out.push_str("While\n");
            dump_expr(out, condition, depth + 1);
            dump_block(out, body, depth + 1);
        }
        Stmt::Return { value, .. } => {
            out.push_str("Return\n");
            if let Some(value) = value {
                dump_expr(out, value, depth + 1);
            }
        }
        Stmt::Break { .. } => out.push_str("Break\n"),
        Stmt::Continue { .. } => out.push_str("Continue\n"),
        Stmt::Block { block, .. } => dump_block_inline(out, block, depth),
        Stmt::ExprStmt { expr, .. } => {
            out.push_str("ExprStmt\n");
            dump_expr(out, expr, depth + 1);
        }
    }
}

fn dump_block(out: &mut String, block: &Block, depth: usize) {
    indent(out, depth);
    dump_block_inline(out, block, depth);
}

fn dump_block_inline(out: &mut String, block: &Block, depth: usize) {
    out.push_str("Block\n");
    for stmt in &block.stmts {
        dump_stmt(out, stmt, depth + 1);
    }
}

fn dump_expr(out: &mut String, expr: &Expr, depth: usize) {
    indent(out, depth);
    match expr {
        Expr::Integer { value, .. } => {
            let _ = writeln!(out, "Integer({})", value);
        }
        Expr::Float { value, .. } => {
            let _ = writeln!(out, "Float({})", value);
        }
        Expr::Str { value, .. } => {
            let _ = writeln!(out, "Str({:?})", value);
        }
        Expr::Char { value, .. } => {
            let _ = writeln!(out, "Char({:?})", value);
        }
        Expr::Bool { value, .. } => {
            let _ = writeln!(out, "Bool({})", value);
        }
        Expr::Identifier { name, .. } => {
            let _ = writeln!(out, "Identifier({})", name);
        }
        Expr::Call { name, args, .. } => {
            let _ = writeln!(out, "Call({})", name);
            for arg in args {
                dump_expr(out, arg, depth + 1);
            }
        }
        Expr::Unary { op, operand, .. } => {
            let _ = writeln!(out, "UnaryOp({})", op.symbol());
            dump_expr(out, operand, depth + 1);
        }
        Expr::Binary {
            op, left, right, ..
        } => {
            let _ = writeln!(out, "BinaryOp({})", op.symbol());
            dump_expr(out, left, depth + 1);
            dump_expr(out, right, depth + 1);
        }
        Expr::Assign { target, value, .. } => {
            let _ = writeln!(out, "Assign({})", target);
            dump_expr(out, value, depth + 1);
        }
    }
}
