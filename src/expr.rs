use std::sync::atomic::{AtomicUsize, Ordering};

use crate::literal::Literal;
use crate::token::Token;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Allocates a stable identity for a `Variable`, `Assign`, `This` or
/// `Super` node.
///
/// Ids come from a process-wide counter rather than a per-parse one: the
/// prompt feeds every line through a fresh parser but keeps a single
/// interpreter, and the interpreter's resolution table must never see two
/// nodes share an id.
pub fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Represents a unary expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

/// Represents a binary expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// Represents a short-circuiting logical expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// Represents a grouping expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

/// Represents a variable access expression's data in the language.
///
/// The `id` is the node's stable identity, allocated by [`next_id`]. The
/// resolver records scope distances keyed by it, so two textually identical
/// accesses resolve independently.
#[derive(Debug, PartialEq, Clone)]
pub struct VariableData {
    pub id: usize,
    pub name: Token,
}

/// Represents an assignment expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct AssignData {
    pub id: usize,
    pub name: Token,
    pub value: Box<Expr>,
}

/// Represents a call expression's data in the language.
/// The closing parenthesis is kept for error locations.
#[derive(Debug, PartialEq, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

/// Represents a property access expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

/// Represents a property assignment expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

/// Represents a `this` expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct ThisData {
    pub id: usize,
    pub keyword: Token,
}

/// Represents a `super` method access expression's data in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct SuperData {
    pub id: usize,
    pub keyword: Token,
    pub method: Token,
}

/// Represents an expression in the language.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(Literal),
    Unary(UnaryData),
    Binary(BinaryData),
    Logical(LogicalData),
    Grouping(GroupingData),
    Variable(VariableData),
    Assign(AssignData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
}

impl Expr {
    /// Accepts a visitor and returns the result of the visit.
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(_) => visitor.visit_literal_expr(self),
            Expr::Unary(_) => visitor.visit_unary_expr(self),
            Expr::Binary(_) => visitor.visit_binary_expr(self),
            Expr::Logical(_) => visitor.visit_logical_expr(self),
            Expr::Grouping(_) => visitor.visit_grouping_expr(self),
            Expr::Variable(_) => visitor.visit_variable_expr(self),
            Expr::Assign(_) => visitor.visit_assign_expr(self),
            Expr::Call(_) => visitor.visit_call_expr(self),
            Expr::Get(_) => visitor.visit_get_expr(self),
            Expr::Set(_) => visitor.visit_set_expr(self),
            Expr::This(_) => visitor.visit_this_expr(self),
            Expr::Super(_) => visitor.visit_super_expr(self),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, expr: &Expr) -> T;
    fn visit_unary_expr(&mut self, expr: &Expr) -> T;
    fn visit_binary_expr(&mut self, expr: &Expr) -> T;
    fn visit_logical_expr(&mut self, expr: &Expr) -> T;
    fn visit_grouping_expr(&mut self, expr: &Expr) -> T;
    fn visit_variable_expr(&mut self, expr: &Expr) -> T;
    fn visit_assign_expr(&mut self, expr: &Expr) -> T;
    fn visit_call_expr(&mut self, expr: &Expr) -> T;
    fn visit_get_expr(&mut self, expr: &Expr) -> T;
    fn visit_set_expr(&mut self, expr: &Expr) -> T;
    fn visit_this_expr(&mut self, expr: &Expr) -> T;
    fn visit_super_expr(&mut self, expr: &Expr) -> T;
}
