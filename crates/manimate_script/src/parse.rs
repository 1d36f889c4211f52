//! Python parsing helpers.

use manimate_error::{ValidationError, ValidationErrorKind};
use std::collections::VecDeque;
use tree_sitter::{Node, Parser, Tree};

/// Parse Python source, failing on any syntax error.
pub(crate) fn parse_python(source: &str) -> Result<Tree, ValidationError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ValidationError::new(ValidationErrorKind::ParserInit(e.to_string())))?;

    let tree = parser.parse(source, None).ok_or_else(|| {
        ValidationError::new(ValidationErrorKind::Unparseable(
            "parser produced no tree".to_string(),
        ))
    })?;

    if let Some(node) = first_syntax_error(tree.root_node()) {
        let position = node.start_position();
        let what = if node.is_missing() {
            format!("missing '{}'", node.kind())
        } else {
            "invalid syntax".to_string()
        };
        return Err(ValidationError::new(ValidationErrorKind::Unparseable(
            format!("{} at line {}, column {}", what, position.row + 1, position.column + 1),
        )));
    }

    Ok(tree)
}

fn first_syntax_error(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut found = None;
    walk_breadth_first(root, |node| {
        if found.is_none() && (node.is_error() || node.is_missing()) {
            found = Some(node);
        }
    });
    found
}

/// Visit every node level by level, parents before children.
pub(crate) fn walk_breadth_first<'tree>(root: Node<'tree>, mut visit: impl FnMut(Node<'tree>)) {
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        visit(node);
        let mut cursor = node.walk();
        queue.extend(node.children(&mut cursor));
    }
}

/// Source text of `node`.
pub(crate) fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}
