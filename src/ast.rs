use ptree::TreeItem;
use std::any::Any;
use std::borrow::Cow;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

/// Discriminant for [`Payload`]. Kept as its own field (rather than derived
/// on the fly everywhere) because production rules pattern-match on it
/// directly, the same way the source corpus matches on `Ast.Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadType {
    Nil,
    Rune,
    Int64,
    Uint64,
    Float64,
    Bool,
    String,
    Cons,
    ListOfAst,
    ListOfAny,
    Function,
    Any,
}

impl Display for PayloadType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// A type-erased value, used only for the `Function` and `Any` payload
/// variants, where the source corpus genuinely needs `interface{}` rather
/// than a known closed set of shapes. Equality falls back to comparing the
/// underlying concrete type via `downcast_ref`; values of differing
/// concrete type are never equal.
#[derive(Clone)]
pub struct AnyValue(pub Rc<dyn DynValue>);

pub trait DynValue: Debug {
    fn dyn_eq(&self, other: &dyn DynValue) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Debug + PartialEq + 'static> DynValue for T {
    fn dyn_eq(&self, other: &dyn DynValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl AnyValue {
    pub fn new<T: Debug + PartialEq + 'static>(value: T) -> Self {
        AnyValue(Rc::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Debug for AnyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(&*other.0)
    }
}

/// A pair of AST nodes, for tree-shaped intermediate results (`car`/`cdr`).
#[derive(Debug, Clone, PartialEq)]
pub struct AstCons {
    pub car: AstNode,
    pub cdr: AstNode,
}

/// The payload carried by an [`AstNode`], discriminated by [`PayloadType`].
#[derive(Debug, Clone)]
pub enum Payload {
    Nil,
    Rune(char),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    String(String),
    Cons(Box<AstCons>),
    ListOfAst(Vec<AstNode>),
    ListOfAny(Vec<AnyValue>),
    Function(AnyValue),
    Any(AnyValue),
}

impl Payload {
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Payload::Nil => PayloadType::Nil,
            Payload::Rune(_) => PayloadType::Rune,
            Payload::Int64(_) => PayloadType::Int64,
            Payload::Uint64(_) => PayloadType::Uint64,
            Payload::Float64(_) => PayloadType::Float64,
            Payload::Bool(_) => PayloadType::Bool,
            Payload::String(_) => PayloadType::String,
            Payload::Cons(_) => PayloadType::Cons,
            Payload::ListOfAst(_) => PayloadType::ListOfAst,
            Payload::ListOfAny(_) => PayloadType::ListOfAny,
            Payload::Function(_) => PayloadType::Function,
            Payload::Any(_) => PayloadType::Any,
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Nil, Payload::Nil) => true,
            (Payload::Rune(a), Payload::Rune(b)) => a == b,
            (Payload::Int64(a), Payload::Int64(b)) => a == b,
            (Payload::Uint64(a), Payload::Uint64(b)) => a == b,
            (Payload::Float64(a), Payload::Float64(b)) => a == b,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::String(a), Payload::String(b)) => a == b,
            (Payload::Cons(a), Payload::Cons(b)) => a.car == b.car && a.cdr == b.cdr,
            (Payload::ListOfAst(a), Payload::ListOfAst(b)) => a == b,
            (Payload::ListOfAny(a), Payload::ListOfAny(b)) => a == b,
            (Payload::Function(a), Payload::Function(b)) => a == b,
            (Payload::Any(a), Payload::Any(b)) => a == b,
            _ => false,
        }
    }
}

/// The byte/item span a node was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub position: usize,
    pub length: usize,
}

/// A node of the flat AST stack: an opcode tag, a class-name stereotype
/// used as the pattern-matching discriminator in production rules, a
/// type-tagged payload, and the source span it was produced from.
///
/// Equality is structural and recursive for `Cons`/`ListOfAst` payloads
/// (via [`Payload::eq`]), deep-equal on the payload otherwise; class name
/// and payload type must also agree.
#[derive(Debug, Clone)]
pub struct AstNode {
    pub opcode: u64,
    pub class_name: Cow<'static, str>,
    pub payload_type: PayloadType,
    pub payload: Payload,
    pub source_span: SourceSpan,
}

impl AstNode {
    pub fn new(
        class_name: impl Into<Cow<'static, str>>,
        payload: Payload,
        position: usize,
        length: usize,
    ) -> Self {
        let payload_type = payload.payload_type();
        Self {
            opcode: 0,
            class_name: class_name.into(),
            payload_type,
            payload,
            source_span: SourceSpan { position, length },
        }
    }

    pub fn with_opcode(mut self, opcode: u64) -> Self {
        self.opcode = opcode;
        self
    }

    pub fn nil(class_name: impl Into<Cow<'static, str>>, position: usize) -> Self {
        AstNode::new(class_name, Payload::Nil, position, 0)
    }
}

impl PartialEq for AstNode {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
            && self.payload_type == other.payload_type
            && self.payload == other.payload
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("")
            .field("class", &self.class_name)
            .field(
                "span",
                &(self.source_span.position, self.source_span.length),
            )
            .field("payload", &self.payload)
            .finish()
    }
}

impl TreeItem for AstNode {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(
            f,
            "{} #{} @ {}+{} = {:?}",
            self.class_name,
            self.opcode,
            self.source_span.position,
            self.source_span.length,
            self.payload
        )
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        match &self.payload {
            Payload::ListOfAst(children) => std::borrow::Cow::from(children),
            Payload::Cons(cons) => std::borrow::Cow::Owned(vec![cons.car.clone(), cons.cdr.clone()]),
            _ => std::borrow::Cow::from(&[][..]),
        }
    }
}

impl AstNode {
    /// Pretty-print this node and its children as a tree, for debugging.
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}
