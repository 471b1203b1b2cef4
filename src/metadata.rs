//! # Entity metadata
//!
//! The field tree that drives every translation. An entity is declared with
//! [`Field`] descriptions and stored as an arena of [`FieldNode`]s: children
//! are owned from the root down, parents are plain [`FieldId`] back-links, so
//! ancestor walks never need shared ownership.
//!
//! ```
//! use mongo_translator::metadata::{Element, EntityMetadata, Field, FieldType};
//! use mongo_translator::Path;
//!
//! let md = EntityMetadata::new(
//!     "user",
//!     vec![
//!         ("objectType", Field::Simple(FieldType::String)),
//!         ("login", Field::Simple(FieldType::String)),
//!         ("tags", Field::Array(Element::Simple(FieldType::String))),
//!     ],
//! );
//!
//! let tags = md.resolve(&Path::parse("tags.*").unwrap()).unwrap();
//! assert_eq!(md.node(tags).field_type(), Some(FieldType::String));
//! ```
pub mod resolver;
pub mod types;

pub use resolver::MetadataResolver;
pub use types::{Canonical, CastError, FieldType};

use crate::path::{Path, Segment};

/// Declarative description of a field, used to build [`EntityMetadata`].
#[derive(Debug, Clone)]
pub enum Field {
    Simple(FieldType),
    Object(Vec<(String, Field)>),
    Array(Element),
    /// Reference to another entity. Not translatable.
    Reference(String),
}

/// Declarative description of an array element.
#[derive(Debug, Clone)]
pub enum Element {
    Simple(FieldType),
    Object(Vec<(String, Field)>),
}

impl Field {
    /// Object field from `(name, field)` pairs.
    pub fn object<S: Into<String>>(fields: Vec<(S, Field)>) -> Self {
        Field::Object(fields.into_iter().map(|(n, f)| (n.into(), f)).collect())
    }

    /// Array of objects from `(name, field)` pairs.
    pub fn object_array<S: Into<String>>(fields: Vec<(S, Field)>) -> Self {
        Field::Array(Element::Object(
            fields.into_iter().map(|(n, f)| (n.into(), f)).collect(),
        ))
    }
}

/// Index of a node inside its [`EntityMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

/// Kind of a field-tree node.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Simple(FieldType),
    Object(Vec<FieldId>),
    Array(FieldId),
    SimpleElement(FieldType),
    ObjectElement(Vec<FieldId>),
    Reference(String),
}

#[derive(Debug, Clone)]
pub struct FieldNode {
    name: String,
    parent: Option<FieldId>,
    kind: FieldKind,
}

impl FieldNode {
    /// Member name; `*` for array elements, empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<FieldId> {
        self.parent
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Scalar type of simple fields and simple array elements.
    pub fn field_type(&self) -> Option<FieldType> {
        match self.kind {
            FieldKind::Simple(t) | FieldKind::SimpleElement(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, FieldKind::Array(_))
    }

    pub fn is_array_element(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::SimpleElement(_) | FieldKind::ObjectElement(_)
        )
    }

    /// Member fields of objects, object elements and the root.
    pub fn members(&self) -> &[FieldId] {
        match &self.kind {
            FieldKind::Object(fields) | FieldKind::ObjectElement(fields) => fields,
            _ => &[],
        }
    }
}

/// The field tree of one entity.
#[derive(Debug, Clone)]
pub struct EntityMetadata {
    name: String,
    nodes: Vec<FieldNode>,
}

const ROOT: FieldId = FieldId(0);

impl EntityMetadata {
    pub fn new<S: Into<String>>(name: impl Into<String>, fields: Vec<(S, Field)>) -> Self {
        let mut md = EntityMetadata {
            name: name.into(),
            nodes: vec![FieldNode {
                name: String::new(),
                parent: None,
                kind: FieldKind::Object(Vec::new()),
            }],
        };
        let members = fields
            .into_iter()
            .map(|(n, f)| md.add_field(ROOT, n.into(), f))
            .collect();
        md.nodes[ROOT.0].kind = FieldKind::Object(members);
        md
    }

    fn push(&mut self, name: String, parent: FieldId, kind: FieldKind) -> FieldId {
        let id = FieldId(self.nodes.len());
        self.nodes.push(FieldNode {
            name,
            parent: Some(parent),
            kind,
        });
        id
    }

    fn add_field(&mut self, parent: FieldId, name: String, field: Field) -> FieldId {
        match field {
            Field::Simple(t) => self.push(name, parent, FieldKind::Simple(t)),
            Field::Reference(entity) => self.push(name, parent, FieldKind::Reference(entity)),
            Field::Object(fields) => {
                let id = self.push(name, parent, FieldKind::Object(Vec::new()));
                let members = self.add_members(id, fields);
                self.nodes[id.0].kind = FieldKind::Object(members);
                id
            }
            Field::Array(element) => {
                // Element placeholder is patched once its id is known.
                let id = self.push(name, parent, FieldKind::Array(ROOT));
                let el = match element {
                    Element::Simple(t) => {
                        self.push(crate::path::ANY.into(), id, FieldKind::SimpleElement(t))
                    }
                    Element::Object(fields) => {
                        let el = self.push(
                            crate::path::ANY.into(),
                            id,
                            FieldKind::ObjectElement(Vec::new()),
                        );
                        let members = self.add_members(el, fields);
                        self.nodes[el.0].kind = FieldKind::ObjectElement(members);
                        el
                    }
                };
                self.nodes[id.0].kind = FieldKind::Array(el);
                id
            }
        }
    }

    fn add_members(&mut self, parent: FieldId, fields: Vec<(String, Field)>) -> Vec<FieldId> {
        fields
            .into_iter()
            .map(|(n, f)| self.add_field(parent, n, f))
            .collect()
    }

    /// Entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> FieldId {
        ROOT
    }

    pub fn node(&self, id: FieldId) -> &FieldNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: FieldId) -> Option<FieldId> {
        self.node(id).parent
    }

    /// Member named `name` of an object-like node.
    pub fn child(&self, parent: FieldId, name: &str) -> Option<FieldId> {
        self.node(parent)
            .members()
            .iter()
            .copied()
            .find(|id| self.node(*id).name == name)
    }

    /// Resolves `path` from the root.
    pub fn resolve(&self, path: &Path) -> Option<FieldId> {
        self.resolve_from(ROOT, path)
    }

    /// Resolves `path` relative to `context`.
    ///
    /// Names step into object members; indices and wildcards step into array
    /// elements.
    pub fn resolve_from(&self, context: FieldId, path: &Path) -> Option<FieldId> {
        path.segments()
            .iter()
            .try_fold(context, |at, segment| match (&self.node(at).kind, segment) {
                (FieldKind::Array(el), Segment::Index(_) | Segment::Any) => Some(*el),
                (FieldKind::Object(_) | FieldKind::ObjectElement(_), Segment::Name(name)) => {
                    self.child(at, name)
                }
                _ => None,
            })
    }

    /// `id` followed by each of its ancestors, ending at the root.
    pub fn ancestors(&self, id: FieldId) -> impl Iterator<Item = FieldId> + '_ {
        std::iter::successors(Some(id), move |at| self.parent(*at))
    }

    /// Absolute path of `id`; array elements appear as `*`.
    pub fn path_of(&self, id: FieldId) -> Path {
        let mut segments: Vec<Segment> = self
            .ancestors(id)
            .filter(|at| *at != ROOT)
            .map(|at| {
                let node = self.node(at);
                if node.is_array_element() {
                    Segment::Any
                } else {
                    Segment::Name(node.name.clone())
                }
            })
            .collect();
        segments.reverse();
        Path::from_segments(segments)
    }

    /// Every node except the root, in pre-order, with its absolute path.
    pub fn fields(&self) -> Vec<(Path, FieldId)> {
        let mut out = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        self.collect_fields(ROOT, &Path::root(), &mut out);
        out
    }

    fn collect_fields(&self, at: FieldId, prefix: &Path, out: &mut Vec<(Path, FieldId)>) {
        let children: Vec<FieldId> = match &self.node(at).kind {
            FieldKind::Array(el) => vec![*el],
            _ => self.node(at).members().to_vec(),
        };
        for child in children {
            let node = self.node(child);
            let path = if node.is_array_element() {
                prefix.child(Segment::Any)
            } else {
                prefix.child(Segment::Name(node.name.clone()))
            };
            out.push((path.clone(), child));
            self.collect_fields(child, &path, out);
        }
    }
}
