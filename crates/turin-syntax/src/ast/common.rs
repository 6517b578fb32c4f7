use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use turin_source::Position;

use crate::SyntaxError;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
    fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Data every node carries besides its own content.
///
/// The parent link and the position are write-once: the parent is bound by
/// the constructor of the enclosing node, the position by the AST builder.
#[derive(Debug)]
pub struct NodeMeta {
    id: NodeId,
    position: OnceLock<Position>,
    parent: OnceLock<NodeId>,
}

impl NodeMeta {
    pub fn new() -> Self {
        NodeMeta {
            id: NodeId::fresh(),
            position: OnceLock::new(),
            parent: OnceLock::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Option<Position> {
        self.position.get().copied()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent.get().copied()
    }

    /// Attaches the source position.
    ///
    /// # Panics
    /// If the node already has a position.
    pub fn set_position(&self, position: Position) {
        if self.position.set(position).is_err() {
            panic!("position of node {:?} attached twice", self.id);
        }
    }

    /// Records `parent` as the enclosing node.
    ///
    /// # Panics
    /// If the node was already bound to a parent: a node belongs to exactly
    /// one tree position.
    pub(crate) fn bind_parent(&self, parent: NodeId) {
        if self.parent.set(parent).is_err() {
            panic!("node {:?} is already bound to parent {:?}", self.id, self.parent());
        }
    }
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements the accessors shared by every node struct with a `meta` field.
macro_rules! impl_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                pub fn meta(&self) -> &$crate::ast::common::NodeMeta {
                    &self.meta
                }

                pub fn id(&self) -> $crate::ast::common::NodeId {
                    self.meta.id()
                }

                pub fn position(&self) -> Option<turin_source::Position> {
                    self.meta.position()
                }

                /// Builder form of `NodeMeta::set_position`.
                pub fn at(self, position: turin_source::Position) -> Self {
                    self.meta.set_position(position);
                    self
                }
            }
        )*
    };
}
pub(crate) use impl_node;

/// Context name of a declaration, bound when the declaration is attached to
/// its enclosing file or type.
#[derive(Debug, Default)]
pub(crate) struct ContextSlot(OnceLock<String>);

impl ContextSlot {
    pub(crate) fn bind(&self, context: &str, id: NodeId) {
        if self.0.set(context.to_string()).is_err() {
            panic!("context of node {:?} bound twice", id);
        }
    }

    pub(crate) fn get(&self) -> &str {
        self.0.get().map(String::as_str).unwrap_or("")
    }
}

/// Joins a context and a local name into the resolver's lookup key,
/// `context.name`.
///
/// The one exception is an empty context, which yields the bare name. Only
/// declarations not yet attached to a file and platform functions without
/// an owning class have one; every attached declaration has a non-empty
/// context because namespaces cannot be empty.
pub fn qualify(context: &str, name: &str) -> String {
    if context.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", context, name)
    }
}

/// A dot separated name such as a namespace or a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Result<Self, SyntaxError> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty() || s.contains('.')) {
            return Err(SyntaxError::InvalidQualifiedName(segments.join(".")));
        }
        Ok(QualifiedName { segments })
    }

    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        Self::new(text.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last(&self) -> &str {
        // Construction guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    /// The name without its last segment, `None` for a single segment name.
    pub fn parent(&self) -> Option<QualifiedName> {
        if self.segments.len() == 1 {
            None
        } else {
            Some(QualifiedName {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    pub fn child(&self, name: &str) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        QualifiedName { segments }
    }

    pub fn qualified_name(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}
