//! Rejects scripts that reach outside the animation sandbox.

use crate::parse::{parse_python, text, walk_breadth_first};
use manimate_error::ValidationError;
use tracing::debug;
use tree_sitter::Node;

/// Modules a scene script may not import.
pub const BLOCKED_MODULES: &[&str] = &["os", "subprocess", "sys", "shutil"];

/// Builtins a scene script may not call.
pub const BLOCKED_CALLS: &[&str] = &["open", "exec", "eval", "__import__"];

/// One offending construct.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Finding {
    /// `import os`
    #[display("Import of '{}' module", _0)]
    Import(String),
    /// `from os import path`
    #[display("Import from '{}' module", _0)]
    ImportFrom(String),
    /// `open(...)`
    #[display("Call to '{}' function", _0)]
    Call(String),
}

/// Every offending construct in a script, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreeningReport {
    findings: Vec<Finding>,
}

impl ScreeningReport {
    /// True when nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// The flagged constructs.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

impl std::fmt::Display for ScreeningReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listed = self
            .findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Potentially dangerous operations detected: {}", listed)
    }
}

/// Screen source for blocked imports and calls.
///
/// Dotted imports are judged by their top-level package, so `os.path`
/// counts as `os`.
///
/// # Examples
///
/// ```
/// use manimate_script::{Finding, screen_source};
///
/// let report = screen_source("import subprocess\nopen('x')\n").unwrap();
/// assert_eq!(
///     report.findings(),
///     &[Finding::Import("subprocess".into()), Finding::Call("open".into())]
/// );
/// assert!(screen_source("from manim import *\n").unwrap().is_clean());
/// ```
///
/// # Errors
///
/// Fails with `Unparseable` when the source has syntax errors.
pub fn screen_source(source: &str) -> Result<ScreeningReport, ValidationError> {
    let tree = parse_python(source)?;
    let mut report = ScreeningReport::default();

    walk_breadth_first(tree.root_node(), |node| match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for name in node.children_by_field_name("name", &mut cursor) {
                let module = imported_module(name, source);
                if is_blocked_module(module) {
                    report.findings.push(Finding::Import(module.to_string()));
                }
            }
        }
        "import_from_statement" => {
            if let Some(module) = node.child_by_field_name("module_name") {
                let module = text(module, source);
                if is_blocked_module(module) {
                    report.findings.push(Finding::ImportFrom(module.to_string()));
                }
            }
        }
        "call" => {
            let function = node
                .child_by_field_name("function")
                .filter(|function| function.kind() == "identifier");
            if let Some(function) = function {
                let called = text(function, source);
                if BLOCKED_CALLS.contains(&called) {
                    report.findings.push(Finding::Call(called.to_string()));
                }
            }
        }
        _ => {}
    });

    debug!(findings = report.findings.len(), "Screened script source");
    Ok(report)
}

// `import a.b as c` names an aliased_import whose `name` field holds the
// dotted path.
fn imported_module<'s>(name: Node<'_>, source: &'s str) -> &'s str {
    match name.kind() {
        "aliased_import" => name
            .child_by_field_name("name")
            .map(|dotted| text(dotted, source))
            .unwrap_or(""),
        _ => text(name, source),
    }
}

fn is_blocked_module(module: &str) -> bool {
    let root = module.split('.').next().unwrap_or(module).trim();
    BLOCKED_MODULES.contains(&root)
}
