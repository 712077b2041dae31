//! TypeScript / JavaScript import extractor using Tree-sitter.

use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use crate::extractor::{ExtractError, FileAnalysis, ImportInfo, LanguageExtractor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    TypeScript,
    Tsx,
}

/// Extracts import specifiers from TypeScript, TSX and JavaScript source.
///
/// Recognized forms:
///
/// - `import ... from "x"` and `import "x"`
/// - `import x = require("x")`
/// - `export * from "x"` and `export { a } from "x"`
/// - `import("x")` and `require("x")` with a single string literal argument
pub struct TypeScriptExtractor {
    language: Language,
    dialect: Dialect,
}

impl TypeScriptExtractor {
    /// Extractor for `.ts`, `.mts` and `.cts` files.
    #[must_use]
    pub fn typescript() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            dialect: Dialect::TypeScript,
        }
    }

    /// Extractor for `.tsx` and JavaScript files. The TSX grammar accepts
    /// plain JavaScript and JSX.
    #[must_use]
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            dialect: Dialect::Tsx,
        }
    }

    /// Both dialects, covering every supported extension.
    #[must_use]
    pub fn all() -> Vec<Box<dyn LanguageExtractor>> {
        vec![Box::new(Self::typescript()), Box::new(Self::tsx())]
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Contents of a `string` literal node without its quotes.
    fn string_value(node: &Node<'_>, src: &[u8]) -> Option<String> {
        if node.kind() != "string" {
            return None;
        }
        let raw = Self::text(node, src);
        raw.get(1..raw.len().checked_sub(1)?).map(str::to_owned)
    }

    fn first_string_child<'t>(node: &Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "string");
        found
    }

    /// The single string argument of `import(...)` / `require(...)`.
    fn loader_argument<'t>(node: &Node<'t>, src: &[u8]) -> Option<Node<'t>> {
        let callee = node.child_by_field_name("function")?;
        let is_loader = match callee.kind() {
            "import" => true,
            "identifier" => Self::text(&callee, src) == "require",
            _ => false,
        };
        if !is_loader {
            return None;
        }

        let args = node.child_by_field_name("arguments")?;
        let mut cursor = args.walk();
        let named: Vec<Node<'t>> = args
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect();
        match named.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// The specifier literal carried by `node`, if it is an import form.
    fn specifier<'t>(node: &Node<'t>, src: &[u8]) -> Option<Node<'t>> {
        match node.kind() {
            "import_statement" | "export_statement" => node.child_by_field_name("source"),
            "import_require_clause" => node
                .child_by_field_name("source")
                .or_else(|| Self::first_string_child(node)),
            "call_expression" => Self::loader_argument(node, src),
            _ => None,
        }
    }

    fn extract_import(node: &Node<'_>, src: &[u8]) -> Option<ImportInfo> {
        let literal = Self::specifier(node, src)?;
        let path = Self::string_value(&literal, src)?;
        let start = literal.start_position();
        Some(ImportInfo {
            line: start.row + 1,
            column: start.column + 1,
            path,
        })
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        match self.dialect {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self.dialect {
            Dialect::TypeScript => &[".ts", ".mts", ".cts"],
            Dialect::Tsx => &[".tsx", ".js", ".jsx", ".mjs", ".cjs"],
        }
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let language = self.language_id();

        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language {
                language,
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or(ExtractError::Parse { language })?;
        let root = tree.root_node();

        if root.has_error() {
            debug!("{language} source has syntax errors, extracting recoverable imports");
        }

        let mut imports = Vec::new();

        // Pre-order walk so imports come out in document order.
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Some(imp) = Self::extract_import(&node, src) {
                imports.push(imp);
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(FileAnalysis {
            imports,
            ..FileAnalysis::default()
        })
    }
}
