//! Tie-break annotations on reference stops.
//!
//! Every entry of a reference sequence carries one `AnnotationKind`. The kind
//! decides how the entry takes part in direction matching and in stop
//! ordering:
//!
//! | kind                 | matching position | ordered by reference |
//! |----------------------|-------------------|----------------------|
//! | `Anchor`             | opens its own     | yes                  |
//! | `Equivalent`         | joins a neighbour | yes                  |
//! | `DirectionExclusive` | none              | no                   |
//! | `SharedAmbiguous`    | none              | no                   |
//!
//! A stop serves only the positions of the direction that lists it as an
//! anchor or equivalent. A `DirectionExclusive` stop also breaks ties
//! between two equally good matches in favour of its direction.
//!
//! Authored tables write the kind as an inline marker next to the stop ID:
//! no marker (or `++`) for an anchor, `==` for an equivalent, `!=`, `<=` or
//! `=>` for a direction-exclusive stop and `<>` for a shared stop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when an annotation code or marker is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid annotation {input:?}: {reason}")]
pub struct InvalidAnnotation {
    input: String,
    reason: &'static str,
}

/// How a reference stop takes part in matching and ordering.
///
/// # Examples
///
/// ```
/// use route_splitter::reference::AnnotationKind;
///
/// assert_eq!(AnnotationKind::parse("").unwrap(), AnnotationKind::Anchor);
/// assert_eq!(AnnotationKind::parse("==").unwrap(), AnnotationKind::Equivalent);
/// assert_eq!(AnnotationKind::parse("!= ==").unwrap(), AnnotationKind::DirectionExclusive);
/// assert_eq!(AnnotationKind::parse("shared").unwrap(), AnnotationKind::SharedAmbiguous);
///
/// assert!(AnnotationKind::parse("??").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnnotationKind {
    /// Must be present (or substituted by an equivalent), at a fixed position.
    #[default]
    Anchor,
    /// Interchangeable with its neighbouring anchor or equivalent.
    Equivalent,
    /// Only valid for this direction's variants; never matches the other one.
    DirectionExclusive,
    /// Also served by the other direction at a different relative position.
    SharedAmbiguous,
}

impl AnnotationKind {
    /// Parse a textual code (`anchor`, `equivalent`, `exclusive`, `shared`) or
    /// a whitespace-separated list of inline markers.
    ///
    /// When markers are combined, the strongest wins: `<>` over the exclusive
    /// markers over `==` over the anchor markers. `xx` carries no meaning and
    /// is ignored.
    pub fn parse(input: &str) -> Result<Self, InvalidAnnotation> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "anchor" => return Ok(AnnotationKind::Anchor),
            "equivalent" => return Ok(AnnotationKind::Equivalent),
            "exclusive" => return Ok(AnnotationKind::DirectionExclusive),
            "shared" => return Ok(AnnotationKind::SharedAmbiguous),
            _ => {}
        }

        let mut kind = AnnotationKind::Anchor;
        for token in trimmed.split_whitespace() {
            let marked = match token {
                "++" | "xx" => AnnotationKind::Anchor,
                "==" => AnnotationKind::Equivalent,
                "!=" | "<=" | "=>" => AnnotationKind::DirectionExclusive,
                "<>" => AnnotationKind::SharedAmbiguous,
                _ => {
                    return Err(InvalidAnnotation {
                        input: input.to_string(),
                        reason: "expected a code or the markers ==, !=, <=, =>, <>, ++",
                    });
                }
            };
            if marked.strength() > kind.strength() {
                kind = marked;
            }
        }
        Ok(kind)
    }

    /// Returns the textual code of this kind.
    pub fn code(self) -> &'static str {
        match self {
            AnnotationKind::Anchor => "anchor",
            AnnotationKind::Equivalent => "equivalent",
            AnnotationKind::DirectionExclusive => "exclusive",
            AnnotationKind::SharedAmbiguous => "shared",
        }
    }

    /// Returns true if the entry is a matching position (or part of one).
    ///
    /// Only anchors and equivalents decide direction; exclusive and shared
    /// stops never count towards a match.
    pub fn is_matching_position(self) -> bool {
        matches!(self, AnnotationKind::Anchor | AnnotationKind::Equivalent)
    }

    /// Returns true if the entry always opens a new matching position rather
    /// than joining its predecessor.
    pub fn opens_position(self) -> bool {
        self == AnnotationKind::Anchor
    }

    /// Returns true if the stop belongs to this direction's variants only.
    /// It counts as evidence for this direction unless the other direction
    /// lists it as one of its own positions.
    pub fn excludes_other_direction(self) -> bool {
        self == AnnotationKind::DirectionExclusive
    }

    /// Returns true if a stop ID with this kind may appear only once in a
    /// reference sequence.
    pub fn is_unique_within_sequence(self) -> bool {
        matches!(
            self,
            AnnotationKind::Anchor | AnnotationKind::SharedAmbiguous
        )
    }

    fn strength(self) -> u8 {
        match self {
            AnnotationKind::Anchor => 0,
            AnnotationKind::Equivalent => 1,
            AnnotationKind::DirectionExclusive => 2,
            AnnotationKind::SharedAmbiguous => 3,
        }
    }
}

impl TryFrom<String> for AnnotationKind {
    type Error = InvalidAnnotation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AnnotationKind::parse(&value)
    }
}

impl From<AnnotationKind> for String {
    fn from(value: AnnotationKind) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
