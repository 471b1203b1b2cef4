use crate::ast::QueryExpr;
use crate::path::{Path, Segment};

/// A parsed projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Include or exclude `field`
    ///
    /// A recursive projection covers every field below `field`. A
    /// non-recursive one covers `field` and its direct children; array
    /// wildcards do not count as a level.
    Field {
        field: Path,
        include: bool,
        recursive: bool,
    },
    /// Include or exclude elements of `field`.
    ///
    /// `project` and `elem_match` are relative to the array element.
    Array {
        field: Path,
        include: bool,
        elem_match: Option<Box<QueryExpr>>,
        project: Box<Projection>,
    },
    List(Vec<Projection>),
}

impl Projection {
    /// Included field projection.
    pub fn include(field: Path) -> Self {
        Projection::Field {
            field,
            include: true,
            recursive: false,
        }
    }

    /// Excluded field projection.
    pub fn exclude(field: Path) -> Self {
        Projection::Field {
            field,
            include: false,
            recursive: false,
        }
    }

    /// True when evaluating the projection needs the value of `field`.
    ///
    /// Only included parts of the projection require anything.
    pub fn is_field_required(&self, field: &Path) -> bool {
        self.is_required_under(&Path::root(), field)
    }

    fn is_required_under(&self, prefix: &Path, field: &Path) -> bool {
        match self {
            Projection::Field {
                field: p,
                include,
                recursive,
            } => {
                let target = prefix.join(p);
                *include
                    && target.overlaps(field)
                    && (*recursive || levels_below(&target, field) <= 1)
            }
            Projection::Array {
                field: p,
                include,
                elem_match,
                project,
            } => {
                if !*include {
                    return false;
                }
                let array = prefix.join(p);
                let elements = array.child(Segment::Any);
                let matched = elem_match.as_ref().is_some_and(|q| {
                    let mut referenced = Vec::new();
                    q.referenced_fields(&elements, &mut referenced);
                    referenced.iter().any(|r| r.overlaps(field))
                });
                matched
                    || project.is_required_under(&elements, field)
                    || (array.len() >= field.len() && array.overlaps(field))
            }
            Projection::List(items) => items.iter().any(|p| p.is_required_under(prefix, field)),
        }
    }
}

/// Named or indexed steps of `field` past the end of `target`.
fn levels_below(target: &Path, field: &Path) -> usize {
    field.segments()[target.len().min(field.len())..]
        .iter()
        .filter(|s| **s != Segment::Any)
        .count()
}
