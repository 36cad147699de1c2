//! Lowered IR (Intermediate Representation) for generated validators
//!
//! This module defines a tree-structured IR that the validator compiler
//! produces instead of strings. The IR nodes represent the JavaScript
//! constructs that validators and call-site rewrites are made of.
//!
//! # Architecture
//!
//! The compiler builds one `IRNode::FunctionDecl` per validator and one
//! expression per rewritten call site. The printer then walks these IR trees
//! and emits JavaScript strings; the evaluator executes them directly.
//!
//! # IR Structure
//!
//! The IR is a tree of `IRNode` variants. Each variant represents a JavaScript
//! construct (expression, statement, declaration) that can be emitted.
//! Operator precedence is resolved by the printer, so builders never insert
//! parentheses.

/// Intermediate Representation node for generated JavaScript
#[derive(Debug, Clone, PartialEq)]
pub enum IRNode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Numeric literal: `42`, `3.14`
    NumericLiteral(String),

    /// String literal: `"hello"`
    StringLiteral(String),

    /// Boolean literal: `true`, `false`
    BooleanLiteral(bool),

    /// Null literal: `null`
    NullLiteral,

    /// Undefined: `void 0`
    Undefined,

    // =========================================================================
    // Identifiers
    // =========================================================================
    /// Identifier: `foo`, `_bar`
    Identifier(String),

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Binary expression: `left op right`
    BinaryExpr {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// Unary prefix expression: `!x`, `typeof x`
    PrefixUnaryExpr {
        operator: String,
        operand: Box<Self>,
    },

    /// Unary postfix expression: `i++`
    PostfixUnaryExpr {
        operand: Box<Self>,
        operator: String,
    },

    /// Call expression: `callee(args)`
    CallExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    /// New expression: `new Callee(args)`
    NewExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    /// Property access: `object.property`
    PropertyAccess { object: Box<Self>, property: String },

    /// Element access: `object[index]`
    ElementAccess { object: Box<Self>, index: Box<Self> },

    /// Array literal: `[a, b, c]`
    ArrayLiteral(Vec<Self>),

    /// Function expression: `function name(params) { body }`
    FunctionExpr {
        name: Option<String>,
        parameters: Vec<IRParam>,
        body: Vec<Self>,
    },

    /// Logical OR: `left || right`
    LogicalOr { left: Box<Self>, right: Box<Self> },

    /// Logical AND: `left && right`
    LogicalAnd { left: Box<Self>, right: Box<Self> },

    // =========================================================================
    // Statements
    // =========================================================================
    /// Variable declaration: `var x = value;`
    VarDecl {
        name: String,
        initializer: Option<Box<Self>>,
    },

    /// Expression statement: `expr;`
    ExpressionStatement(Box<Self>),

    /// Return statement: `return expr;`
    ReturnStatement(Option<Box<Self>>),

    /// If statement: `if (cond) { then } else { else }`
    IfStatement {
        condition: Box<Self>,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
    },

    /// Block statement: `{ statements }`
    Block(Vec<Self>),

    /// For statement: `for (init; cond; incr) { body }`
    ForStatement {
        initializer: Option<Box<Self>>,
        condition: Option<Box<Self>>,
        incrementor: Option<Box<Self>>,
        body: Box<Self>,
    },

    /// Throw statement: `throw expr;`
    ThrowStatement(Box<Self>),

    // =========================================================================
    // Declarations
    // =========================================================================
    /// Function declaration: `function name(params) { body }`
    FunctionDecl {
        name: String,
        parameters: Vec<IRParam>,
        body: Vec<Self>,
    },

    // =========================================================================
    // Special Nodes
    // =========================================================================
    /// Comment: `/* text */`
    Comment(String),

    /// Sequence of statements emitted one per line
    Sequence(Vec<Self>),
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IRParam {
    pub name: String,
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl IRNode {
    /// Create an identifier node
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Create a string literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral(s.into())
    }

    /// Create a numeric literal
    pub fn number(n: impl Into<String>) -> Self {
        Self::NumericLiteral(n.into())
    }

    /// Create a call expression
    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::CallExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    /// Create a property access
    pub fn prop(object: Self, property: impl Into<String>) -> Self {
        Self::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    /// Create an element access
    pub fn elem(object: Self, index: Self) -> Self {
        Self::ElementAccess {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    /// Create a binary expression
    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::BinaryExpr {
            left: Box::new(left),
            operator: op.into(),
            right: Box::new(right),
        }
    }

    /// Create a strict equality check: `left === right`
    pub fn strict_eq(left: Self, right: Self) -> Self {
        Self::binary(left, "===", right)
    }

    /// Create a strict inequality check: `left !== right`
    pub fn strict_ne(left: Self, right: Self) -> Self {
        Self::binary(left, "!==", right)
    }

    /// Create an assignment expression
    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, "=", value)
    }

    /// Create a prefix unary expression
    pub fn prefix(op: impl Into<String>, operand: Self) -> Self {
        Self::PrefixUnaryExpr {
            operator: op.into(),
            operand: Box::new(operand),
        }
    }

    /// Create a logical NOT: `!operand`
    pub fn not(operand: Self) -> Self {
        Self::prefix("!", operand)
    }

    /// Create a `typeof operand` expression
    pub fn type_of(operand: Self) -> Self {
        Self::prefix("typeof", operand)
    }

    /// Create a postfix increment: `operand++`
    pub fn increment(operand: Self) -> Self {
        Self::PostfixUnaryExpr {
            operand: Box::new(operand),
            operator: "++".to_string(),
        }
    }

    /// Create a var declaration
    pub fn var_decl(name: impl Into<String>, init: Option<Self>) -> Self {
        Self::VarDecl {
            name: name.into(),
            initializer: init.map(Box::new),
        }
    }

    /// Create a return statement
    pub fn ret(expr: Option<Self>) -> Self {
        Self::ReturnStatement(expr.map(Box::new))
    }

    /// Create an if statement
    pub fn if_stmt(condition: Self, then_branch: Self, else_branch: Option<Self>) -> Self {
        Self::IfStatement {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    /// Create a counting loop: `for (var i = 0; i < bound; i++) body`
    pub fn for_count(index: &str, start: Self, bound: Self, body: Vec<Self>) -> Self {
        Self::ForStatement {
            initializer: Some(Box::new(Self::var_decl(index, Some(start)))),
            condition: Some(Box::new(Self::binary(Self::id(index), "<", bound))),
            incrementor: Some(Box::new(Self::increment(Self::id(index)))),
            body: Box::new(Self::Block(body)),
        }
    }

    /// Create a throw statement
    pub fn throw(expr: Self) -> Self {
        Self::ThrowStatement(Box::new(expr))
    }

    /// Create a function expression
    pub const fn func_expr(name: Option<String>, params: Vec<IRParam>, body: Vec<Self>) -> Self {
        Self::FunctionExpr {
            name,
            parameters: params,
            body,
        }
    }

    /// Create a function declaration
    pub fn func_decl(name: impl Into<String>, params: Vec<IRParam>, body: Vec<Self>) -> Self {
        Self::FunctionDecl {
            name: name.into(),
            parameters: params,
            body,
        }
    }

    /// Create `void 0`
    pub const fn void_0() -> Self {
        Self::Undefined
    }

    /// Create a block
    pub const fn block(stmts: Vec<Self>) -> Self {
        Self::Block(stmts)
    }

    /// Create an expression statement
    pub fn expr_stmt(expr: Self) -> Self {
        Self::ExpressionStatement(Box::new(expr))
    }

    /// Create an array literal
    pub const fn array(elements: Vec<Self>) -> Self {
        Self::ArrayLiteral(elements)
    }

    /// Create a logical OR expression: `left || right`
    pub fn logical_or(left: Self, right: Self) -> Self {
        Self::LogicalOr {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a logical AND expression: `left && right`
    pub fn logical_and(left: Self, right: Self) -> Self {
        Self::LogicalAnd {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Fold a list of conditions with `||`. Returns `false` for an empty list.
    pub fn any_of(conditions: Vec<Self>) -> Self {
        conditions
            .into_iter()
            .reduce(Self::logical_or)
            .unwrap_or(Self::BooleanLiteral(false))
    }

    /// Create a sequence of statements
    pub const fn sequence(nodes: Vec<Self>) -> Self {
        Self::Sequence(nodes)
    }

    /// Create a new expression: `new Constructor(args)`
    pub fn new_expr(callee: Self, args: Vec<Self>) -> Self {
        Self::NewExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    /// Name of a function declaration, if this node is one.
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Self::FunctionDecl { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl IRParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
