use crate::token::Token;

/// Stable identity for an expression node.
///
/// The parser hands one out, from a monotonic counter, to every expression
/// the resolver may need to bind: variable reads, assignments, `this`, and
/// `super`.  The interpreter's resolution map is keyed on these ids, so the
/// AST can be copied or shared freely without disturbing resolved distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub usize);

#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal token: number, string, `true`, `false`, or `nil`.
    Literal(Token),

    /// A parenthesized expression.
    Grouping(Box<Expr>),

    Unary {
        operator: Token,
        right: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// `and` / `or`.  Kept apart from `Binary` because it short-circuits.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Variable {
        id: ExprId,
        name: Token,
    },

    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        /// The closing parenthesis, kept for runtime error positions.
        paren: Token,
        arguments: Vec<Expr>,
    },

    /// Property read: `object.name`.
    Get {
        object: Box<Expr>,
        name: Token,
    },

    /// Property write: `object.name = value`.
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    This {
        id: ExprId,
        keyword: Token,
    },

    /// `super.method` inside a subclass method.
    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },
}
