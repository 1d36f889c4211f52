//! Scene class discovery and declared-name reconciliation.

use crate::parse::{parse_python, text, walk_breadth_first};
use manimate_core::GeneratedScript;
use manimate_error::{ValidationError, ValidationErrorKind};
use tracing::{debug, instrument, warn};
use tree_sitter::Node;

/// Base classes that make a class renderable.
pub const SCENE_BASES: &[&str] = &["Scene", "MovingCameraScene", "ThreeDScene"];

/// Every class deriving directly from a scene base, in traversal order.
///
/// Traversal is breadth-first, so module-level classes come before nested
/// ones. A base may be a bare name (`Scene`) or attribute-qualified
/// (`manim.Scene`).
///
/// # Errors
///
/// Fails with `Unparseable` when the source has syntax errors.
pub fn scan_entry_points(source: &str) -> Result<Vec<String>, ValidationError> {
    let tree = parse_python(source)?;
    let mut names = Vec::new();
    walk_breadth_first(tree.root_node(), |node| {
        if node.kind() != "class_definition" || !derives_from_scene(node, source) {
            return;
        }
        if let Some(name) = node.child_by_field_name("name") {
            names.push(text(name, source).to_string());
        }
    });
    Ok(names)
}

/// Name of the first qualifying scene class, or `None` when there is none.
///
/// # Examples
///
/// ```
/// use manimate_script::extract_entry_point;
///
/// let source = "from manim import *\n\nclass Intro(Scene):\n    def construct(self):\n        pass\n";
/// assert_eq!(extract_entry_point(source).unwrap().as_deref(), Some("Intro"));
/// assert_eq!(extract_entry_point("class Helper:\n    pass\n").unwrap(), None);
/// ```
pub fn extract_entry_point(source: &str) -> Result<Option<String>, ValidationError> {
    Ok(scan_entry_points(source)?.into_iter().next())
}

/// Make `script.entry_point_name` agree with the source.
///
/// The declared name is kept when it names a qualifying class. Otherwise
/// a sole candidate overwrites it. Zero candidates, or several with none
/// matching, are validation failures.
#[instrument(skip(script), fields(declared = %script.entry_point_name()))]
pub fn reconcile_entry_point(script: &mut GeneratedScript) -> Result<(), ValidationError> {
    let candidates = scan_entry_points(script.source_code())?;
    let declared = script.entry_point_name().clone();

    if candidates.iter().any(|name| *name == declared) {
        debug!(count = candidates.len(), "Declared scene found in source");
        return Ok(());
    }

    match candidates.as_slice() {
        [] => Err(ValidationError::new(ValidationErrorKind::NoEntryPoint)),
        [only] => {
            warn!(found = %only, "Declared scene name differs from source, using source");
            script.set_entry_point_name(only.clone());
            Ok(())
        }
        many => Err(ValidationError::new(
            ValidationErrorKind::AmbiguousEntryPoint {
                declared,
                candidates: many.join(", "),
            },
        )),
    }
}

fn derives_from_scene(class: Node<'_>, source: &str) -> bool {
    let Some(bases) = class.child_by_field_name("superclasses") else {
        return false;
    };
    let mut cursor = bases.walk();
    let found = bases
        .named_children(&mut cursor)
        .any(|base| is_scene_base(base, source));
    found
}

fn is_scene_base(base: Node<'_>, source: &str) -> bool {
    let name = match base.kind() {
        "identifier" => base,
        "attribute" => match base.child_by_field_name("attribute") {
            Some(attr) => attr,
            None => return false,
        },
        _ => return false,
    };
    SCENE_BASES.contains(&text(name, source))
}
