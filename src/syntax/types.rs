//! Syntax definitions describing how a single line encodes edges.
//!
//! A [`Syntax`] assumes that every edge declaration fits on one logical line.
//! Multi-line block formats (such as Dot's `digraph{ ... }`) are handled by
//! the graph prefix/suffix markers, which switch the syntax on and off while
//! scanning.

use serde::{Deserialize, Serialize};

/// Marks a field as not applicable to a syntax.
pub const IGNORE_FIELD: &str = "";

/// Declarative description of one line-oriented dependency format.
///
/// A declaration looks like
/// `edge_prefix sources edge_infix targets edge_suffix`, where sources and
/// targets are lists split by their delimiters.
///
/// # Example
///
/// ```rust
/// use depgrapher::syntax::Syntax;
///
/// let make = Syntax::makefile();
/// assert_eq!(make.edge_infix, ":");
/// assert!(make.is_always_active());
///
/// let dot = Syntax::dot();
/// assert_eq!(dot.graph_prefix, "digraph{");
/// assert!(!dot.is_always_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Syntax {
    /// Marker that opens a block of declarations (e.g. `digraph{`)
    pub graph_prefix: String,
    /// Text that precedes a declaration on its line
    pub edge_prefix: String,
    /// Separator between multiple sources
    pub source_delimiter: String,
    /// Separator between the sources and the targets
    pub edge_infix: String,
    /// Separator between multiple targets
    pub target_delimiter: String,
    /// Text that terminates a declaration
    pub edge_suffix: String,
    /// Marker that closes a block of declarations (e.g. `}`)
    pub graph_suffix: String,
    /// Whether names are trimmed of surrounding whitespace
    pub strip_whitespace: bool,
}

impl Syntax {
    /// Creates a syntax from its eight fields, in declaration order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        graph_prefix: impl Into<String>,
        edge_prefix: impl Into<String>,
        source_delimiter: impl Into<String>,
        edge_infix: impl Into<String>,
        target_delimiter: impl Into<String>,
        edge_suffix: impl Into<String>,
        graph_suffix: impl Into<String>,
        strip_whitespace: bool,
    ) -> Self {
        Self {
            graph_prefix: graph_prefix.into(),
            edge_prefix: edge_prefix.into(),
            source_delimiter: source_delimiter.into(),
            edge_infix: edge_infix.into(),
            target_delimiter: target_delimiter.into(),
            edge_suffix: edge_suffix.into(),
            graph_suffix: graph_suffix.into(),
            strip_whitespace,
        }
    }

    /// Makefile rules: `source1 source2: target1 target2`.
    pub fn makefile() -> Self {
        Self::new(IGNORE_FIELD, IGNORE_FIELD, " ", ":", " ", IGNORE_FIELD, IGNORE_FIELD, true)
    }

    /// Dot digraphs: one `source -> target;` statement per line inside `digraph{ ... }`.
    pub fn dot() -> Self {
        Self::new("digraph{", IGNORE_FIELD, IGNORE_FIELD, "->", IGNORE_FIELD, ";", "}", true)
    }

    /// Build-system macro calls.
    ///
    /// Two statement shapes live side by side in the same file:
    /// `$(call DEPEND_ALL,source,target1,target2)` and
    /// `$(call ALL_SPECS,source1,source2): target1 target2`.
    pub fn make_call() -> Vec<Self> {
        vec![
            Self::new(
                IGNORE_FIELD,
                "$(call DEPEND_ALL,",
                IGNORE_FIELD,
                ",",
                ",",
                ")",
                IGNORE_FIELD,
                true,
            ),
            Self::new(
                IGNORE_FIELD,
                "$(call ALL_SPECS,",
                ",",
                "):",
                " ",
                IGNORE_FIELD,
                IGNORE_FIELD,
                true,
            ),
        ]
    }

    /// Looks up a preset by name or abbreviation, ignoring case.
    ///
    /// Returns `None` for unknown names. Composite presets expand to more
    /// than one syntax.
    pub fn preset(name: &str) -> Option<Vec<Self>> {
        match name.to_ascii_lowercase().as_str() {
            "makefile" | "make" | "m" => Some(vec![Self::makefile()]),
            "makecall" | "c" => Some(Self::make_call()),
            "dot" | "d" => Some(vec![Self::dot()]),
            _ => None,
        }
    }

    /// Returns true if the syntax has no graph prefix and therefore applies
    /// to every line.
    pub fn is_always_active(&self) -> bool {
        self.graph_prefix.is_empty()
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self::makefile()
    }
}
