/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      ast.rs
 * Purpose:   Defines the AST node that flows through the whole pipeline.
 *            Parse trees and runtime values share the same node shape; the
 *            evaluator turns syntax payloads into value payloads in place.
 *
 * License:
 * This file is part of the Rye programming language project.
 *
 * Rye is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::environment::EnvRef;
use crate::error::RyeError;

/// Shared handle to an AST node. Nodes are immutable in shape; anything that
/// needs to "change" a node rebuilds it. Collection payloads are the one
/// exception: they sit behind `Rc<RefCell<..>>` so that mutation through one
/// reference is observable through every other reference to the same
/// container.
pub type NodeRef = Rc<Node>;

/// A host-implemented callable bound into the root environment. Receives the
/// current environment and the pre-evaluated argument values.
pub type BuiltinFn = Rc<dyn Fn(&EnvRef, &[NodeRef]) -> Result<NodeRef, RyeError>>;

/// Every syntactic construct and every runtime value is one of these kinds.
/// The meaning of the `left` / `right` child slots is kind-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // program / statement linkage
    Stmt,

    // declarations and assignment
    ConstDecl,
    VarDecl,
    Assign,

    // control flow
    If,
    ThenBranch,
    While,
    For,
    Break,
    Continue,
    Return,

    // lambdas and calls
    Lambda,
    Param,
    Arg,
    Call,

    // unary operators
    Neg,
    Not,
    Cardinality,
    Maybe,
    Splat,

    // binary operators
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Fallback,
    In,

    // higher-order pipeline operators
    Map,
    Where,
    Pipe,
    Find,
    Fold,

    // containers
    List,
    Set,
    Object,
    SetItem,
    ObjectItem,
    KVPair,

    // accessors
    BracketAccess,
    FieldAccess,
    Slice,
    ListSlice,

    // range
    Range,

    // atoms
    Identifier,
    Int,
    Float,
    Bool,
    Str,
    Null,
    Fail,
    Success,
    Underscore,
    Index,

    // modules
    Import,
    Module,
}

impl NodeKind {
    /// Short descriptor used in S-expression dumps and error messages.
    pub fn descriptor(self) -> &'static str {
        match self {
            NodeKind::Stmt => "stmt",
            NodeKind::ConstDecl => "const",
            NodeKind::VarDecl => "var",
            NodeKind::Assign => "=",
            NodeKind::If => "if",
            NodeKind::ThenBranch => "then-branch",
            NodeKind::While => "while",
            NodeKind::For => "for",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::Return => "return",
            NodeKind::Lambda => "lambda",
            NodeKind::Param => "param",
            NodeKind::Arg => "arg",
            NodeKind::Call => "call",
            NodeKind::Neg => "-",
            NodeKind::Not => "!",
            NodeKind::Cardinality => "#",
            NodeKind::Maybe => "?",
            NodeKind::Splat => "...",
            NodeKind::Add => "+",
            NodeKind::Sub => "-",
            NodeKind::Mul => "*",
            NodeKind::Div => "/",
            NodeKind::Mod => "%",
            NodeKind::Power => "^",
            NodeKind::Equal => "==",
            NodeKind::NotEqual => "!=",
            NodeKind::Less => "<",
            NodeKind::LessEqual => "<=",
            NodeKind::Greater => ">",
            NodeKind::GreaterEqual => ">=",
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Fallback => "|",
            NodeKind::In => "in",
            NodeKind::Map => "map",
            NodeKind::Where => "where",
            NodeKind::Pipe => "|>",
            NodeKind::Find => "find",
            NodeKind::Fold => "fold",
            NodeKind::List => "list",
            NodeKind::Set => "set",
            NodeKind::Object => "obj",
            NodeKind::SetItem => "set-item",
            NodeKind::ObjectItem => "object-item",
            NodeKind::KVPair => ":",
            NodeKind::BracketAccess => "bracket-access",
            NodeKind::FieldAccess => "field-access",
            NodeKind::Slice => "slice",
            NodeKind::ListSlice => "slice-access",
            NodeKind::Range => "range",
            NodeKind::Identifier => "IDENT",
            NodeKind::Int => "INT",
            NodeKind::Float => "FLOAT",
            NodeKind::Bool => "BOOL",
            NodeKind::Str => "STRING",
            NodeKind::Null => "null",
            NodeKind::Fail => "fail",
            NodeKind::Success => "success",
            NodeKind::Underscore => "_",
            NodeKind::Index => "index",
            NodeKind::Import => "import",
            NodeKind::Module => "module",
        }
    }
}

/// Hashable summary of a scalar value. Set members and object keys are stored
/// under this summary, so two equal scalars always land in the same slot.
/// Floats go through `OrderedFloat` to pick up `Eq + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Int(i64),
    Float(OrderedFloat<f64>),
    Bool(bool),
    Str(String),
    Result(bool),
}

impl ValueKey {
    /// Rebuilds a value node from the summary.
    pub fn to_node(&self) -> NodeRef {
        match self {
            ValueKey::Int(v) => Node::int(*v),
            ValueKey::Float(v) => Node::float(v.into_inner()),
            ValueKey::Bool(v) => Node::boolean(*v),
            ValueKey::Str(v) => Node::string(v.clone()),
            ValueKey::Result(true) => Node::success(),
            ValueKey::Result(false) => Node::fail(),
        }
    }
}

/// The payload union. `Elems` is the parse-time shape of a list literal;
/// `List` / `Set` / `Object` are runtime collections sharing their storage
/// across every reference.
#[derive(Clone)]
pub enum Payload {
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Elems(Vec<NodeRef>),
    List(Rc<RefCell<Vec<NodeRef>>>),
    Set(Rc<RefCell<HashMap<ValueKey, bool>>>),
    Object(Rc<RefCell<HashMap<ValueKey, NodeRef>>>),
    Builtin(BuiltinFn),
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Empty => write!(f, "Empty"),
            Payload::Int(v) => write!(f, "Int({})", v),
            Payload::Float(v) => write!(f, "Float({})", v),
            Payload::Bool(v) => write!(f, "Bool({})", v),
            Payload::Str(v) => write!(f, "Str({:?})", v),
            Payload::Elems(v) => write!(f, "Elems(len={})", v.len()),
            Payload::List(v) => write!(f, "List(len={})", v.borrow().len()),
            Payload::Set(v) => write!(f, "Set(len={})", v.borrow().len()),
            Payload::Object(v) => write!(f, "Object(len={})", v.borrow().len()),
            Payload::Builtin(_) => write!(f, "[builtin]"),
        }
    }
}

/// One node of the tree. `line` is 1-based, 0 when unknown. `scope` is only
/// populated on lambda values (the captured environment) and module values
/// (the exported constants).
#[derive(Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub payload: Payload,
    pub left: Option<NodeRef>,
    pub right: Option<NodeRef>,
    pub line: usize,
    pub scope: Option<EnvRef>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({:?} {})", self.kind, self.to_sexpr())
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Node {
        Node {
            kind,
            payload: Payload::Empty,
            left: None,
            right: None,
            line: 0,
            scope: None,
        }
    }

    // -----------------------------------------------------------------
    // Value constructors
    // -----------------------------------------------------------------

    pub fn int(v: i64) -> NodeRef {
        Rc::new(Node {
            payload: Payload::Int(v),
            ..Node::new(NodeKind::Int)
        })
    }

    pub fn float(v: f64) -> NodeRef {
        Rc::new(Node {
            payload: Payload::Float(v),
            ..Node::new(NodeKind::Float)
        })
    }

    pub fn boolean(v: bool) -> NodeRef {
        Rc::new(Node {
            payload: Payload::Bool(v),
            ..Node::new(NodeKind::Bool)
        })
    }

    pub fn string(v: impl Into<String>) -> NodeRef {
        Rc::new(Node {
            payload: Payload::Str(v.into()),
            ..Node::new(NodeKind::Str)
        })
    }

    pub fn fail() -> NodeRef {
        Rc::new(Node::new(NodeKind::Fail))
    }

    pub fn success() -> NodeRef {
        Rc::new(Node::new(NodeKind::Success))
    }

    pub fn null() -> NodeRef {
        Rc::new(Node::new(NodeKind::Null))
    }

    pub fn list(items: Vec<NodeRef>) -> NodeRef {
        Rc::new(Node {
            payload: Payload::List(Rc::new(RefCell::new(items))),
            ..Node::new(NodeKind::List)
        })
    }

    pub fn set(members: HashMap<ValueKey, bool>) -> NodeRef {
        Rc::new(Node {
            payload: Payload::Set(Rc::new(RefCell::new(members))),
            ..Node::new(NodeKind::Set)
        })
    }

    pub fn object(fields: HashMap<ValueKey, NodeRef>) -> NodeRef {
        Rc::new(Node {
            payload: Payload::Object(Rc::new(RefCell::new(fields))),
            ..Node::new(NodeKind::Object)
        })
    }

    pub fn builtin(f: BuiltinFn) -> NodeRef {
        Rc::new(Node {
            payload: Payload::Builtin(f),
            ..Node::new(NodeKind::Lambda)
        })
    }

    // -----------------------------------------------------------------
    // Tree constructors
    // -----------------------------------------------------------------

    pub fn leaf(kind: NodeKind) -> NodeRef {
        Rc::new(Node::new(kind))
    }

    pub fn unary(kind: NodeKind, right: Option<NodeRef>) -> NodeRef {
        Rc::new(Node {
            right,
            ..Node::new(kind)
        })
    }

    pub fn binary(kind: NodeKind, left: Option<NodeRef>, right: Option<NodeRef>) -> NodeRef {
        Rc::new(Node {
            left,
            right,
            ..Node::new(kind)
        })
    }

    // -----------------------------------------------------------------
    // Rebuilders (nodes never mutate in place)
    // -----------------------------------------------------------------

    pub fn with_left(&self, left: Option<NodeRef>) -> NodeRef {
        Rc::new(Node {
            left,
            ..self.clone()
        })
    }

    pub fn with_right(&self, right: Option<NodeRef>) -> NodeRef {
        Rc::new(Node {
            right,
            ..self.clone()
        })
    }

    pub fn with_kind(&self, kind: NodeKind) -> NodeRef {
        Rc::new(Node {
            kind,
            ..self.clone()
        })
    }

    pub fn with_scope(&self, scope: Option<EnvRef>) -> NodeRef {
        Rc::new(Node {
            scope,
            ..self.clone()
        })
    }

    pub fn with_line(&self, line: usize) -> NodeRef {
        Rc::new(Node { line, ..self.clone() })
    }

    // -----------------------------------------------------------------
    // Payload accessors
    // -----------------------------------------------------------------

    pub fn as_int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.payload {
            Payload::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Rc<RefCell<Vec<NodeRef>>>> {
        match &self.payload {
            Payload::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Rc<RefCell<HashMap<ValueKey, bool>>>> {
        match &self.payload {
            Payload::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Rc<RefCell<HashMap<ValueKey, NodeRef>>>> {
        match &self.payload {
            Payload::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_builtin(&self) -> Option<&BuiltinFn> {
        match &self.payload {
            Payload::Builtin(f) => Some(f),
            _ => None,
        }
    }

    /// Identifier-ish nodes carry their name in the string payload.
    pub fn name(&self) -> Option<&str> {
        self.as_str()
    }

    /// Scalar value summary used for set membership and object keys.
    /// Anything without a scalar summary collapses to the `fail` result.
    pub fn to_value_key(&self) -> ValueKey {
        match (&self.kind, &self.payload) {
            (NodeKind::Int, Payload::Int(v)) => ValueKey::Int(*v),
            (NodeKind::Float, Payload::Float(v)) => ValueKey::Float(OrderedFloat(*v)),
            (NodeKind::Bool, Payload::Bool(v)) => ValueKey::Bool(*v),
            (NodeKind::Str, Payload::Str(v)) => ValueKey::Str(v.clone()),
            (NodeKind::Identifier, Payload::Str(v)) => ValueKey::Str(v.clone()),
            (NodeKind::Success, _) => ValueKey::Result(true),
            _ => ValueKey::Result(false),
        }
    }

    // -----------------------------------------------------------------
    // Printing
    // -----------------------------------------------------------------

    /// Renders the node as an S-expression. Values print as their literal
    /// forms; operator nodes print in prefix notation. Used by the REPL, the
    /// `print` builtin, and the test suite.
    pub fn to_sexpr(&self) -> String {
        match self.kind {
            NodeKind::Int => match self.payload {
                Payload::Int(v) => v.to_string(),
                _ => String::from("0"),
            },
            NodeKind::Float => match self.payload {
                Payload::Float(v) => v.to_string(),
                _ => String::from("0"),
            },
            NodeKind::Bool => match self.payload {
                Payload::Bool(v) => v.to_string(),
                _ => String::from("false"),
            },
            NodeKind::Identifier => self.name().unwrap_or("").to_string(),
            NodeKind::Str => format!("\"{}\"", self.as_str().unwrap_or("")),
            NodeKind::Null => String::from("null"),
            NodeKind::Fail => String::from("fail"),
            NodeKind::Success => String::from("success"),
            NodeKind::Underscore => String::from("_"),
            NodeKind::Index => String::from("index"),
            NodeKind::Break | NodeKind::Continue => self.kind.descriptor().to_string(),
            NodeKind::List => match &self.payload {
                Payload::List(items) => {
                    let inner = items
                        .borrow()
                        .iter()
                        .map(|n| n.to_sexpr())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("[{}]", inner)
                }
                Payload::Elems(items) => {
                    let inner = items
                        .iter()
                        .map(|n| n.to_sexpr())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("[{}]", inner)
                }
                _ => String::from("[]"),
            },
            NodeKind::Set => match &self.payload {
                Payload::Set(members) => {
                    let inner = members
                        .borrow()
                        .iter()
                        .filter(|(_, present)| **present)
                        .map(|(k, _)| k.to_node().to_sexpr())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{{{}}}", inner)
                }
                _ => String::from("{}"),
            },
            NodeKind::Object => match &self.payload {
                Payload::Object(fields) => {
                    let inner = fields
                        .borrow()
                        .iter()
                        .map(|(k, v)| format!("{}: {}", k.to_node().to_sexpr(), v.to_sexpr()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{{{}}}", inner)
                }
                _ => String::from("{}"),
            },
            NodeKind::Module => match &self.payload {
                Payload::Str(name) => format!("(module {})", name),
                _ => String::from("(module)"),
            },
            NodeKind::Import => match &self.payload {
                Payload::Str(path) => match &self.right {
                    Some(alias) => format!("(import {} {})", path, alias.to_sexpr()),
                    None => format!("(import {})", path),
                },
                _ => String::from("(import)"),
            },
            NodeKind::Stmt => match &self.right {
                Some(next) => format!(
                    "\n{}{}",
                    child_sexpr(&self.left),
                    next.to_sexpr()
                ),
                None => format!("\n{}", child_sexpr(&self.left)),
            },
            // unary shapes
            NodeKind::Neg
            | NodeKind::Not
            | NodeKind::Cardinality
            | NodeKind::Maybe
            | NodeKind::Splat
            | NodeKind::Return => format!(
                "({} {})",
                self.kind.descriptor(),
                child_sexpr(&self.right)
            ),
            // linked shapes (either child may be missing)
            NodeKind::Param | NodeKind::Arg | NodeKind::SetItem | NodeKind::ObjectItem => {
                match (&self.left, &self.right) {
                    (None, None) => format!("({})", self.kind.descriptor()),
                    (None, Some(r)) => format!("({} {})", self.kind.descriptor(), r.to_sexpr()),
                    (Some(l), None) => format!("({} {})", self.kind.descriptor(), l.to_sexpr()),
                    (Some(l), Some(r)) => format!(
                        "({} {} {})",
                        self.kind.descriptor(),
                        l.to_sexpr(),
                        r.to_sexpr()
                    ),
                }
            }
            // everything else prints as a binary prefix form
            _ => format!(
                "({} {} {})",
                self.kind.descriptor(),
                child_sexpr(&self.left),
                child_sexpr(&self.right)
            ),
        }
    }
}

fn child_sexpr(child: &Option<NodeRef>) -> String {
    match child {
        Some(n) => n.to_sexpr(),
        None => String::from("NIL_PTR"),
    }
}
