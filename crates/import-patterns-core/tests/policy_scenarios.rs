//! Integration test: TOML configuration through to per-file violations.

use import_patterns_core::{Config, ImportReference, PolicySet, ViolationKind};

fn policies(toml: &str) -> PolicySet {
    Config::parse(toml)
        .expect("config should parse")
        .policy_set()
        .expect("policies should compile")
}

const BROWSER: &str = r#"
[[policies]]
target = "src/browser/**"
restrictions = "src/browser/**"
"#;

#[test]
fn browser_file_importing_node_module() {
    let file = "src/browser/foo.ts";
    let v = policies(BROWSER).check_file(file, [ImportReference::new("../node/bar", file, 2, 17)]);

    assert_eq!(v.len(), 1);
    assert_eq!(v[0].kind, ViolationKind::BadImport);
    assert_eq!((v[0].location.line, v[0].location.column), (2, 17));
    assert_eq!(v[0].restrictions_display().as_deref(), Some("src/browser/**"));
}

#[test]
fn file_outside_every_target() {
    let file = "src/common/baz.ts";
    let v = policies(BROWSER).check_file(file, [ImportReference::new("../node/bar", file, 2, 17)]);

    assert_eq!(v.len(), 1);
    assert_eq!(v[0].kind, ViolationKind::BadFilename);
    assert_eq!((v[0].location.line, v[0].location.column), (1, 1));
}

#[test]
fn multiple_restrictions_are_alternatives() {
    let set = policies(
        r#"
[[policies]]
target = "*.ts"
restrictions = ["a/**", "b/**"]
"#,
    );
    let v = set.check_file(
        "x.ts",
        [
            ImportReference::new("a/mod", "x.ts", 1, 1),
            ImportReference::new("c/mod", "x.ts", 2, 1),
        ],
    );

    assert_eq!(v.len(), 1);
    assert_eq!(v[0].location.line, 2);
    assert_eq!(v[0].restrictions_display().as_deref(), Some("a/** or b/**"));
}

#[test]
fn bare_module_is_flagged_by_path_restrictions() {
    let file = "src/browser/foo.ts";
    let v = policies(BROWSER).check_file(file, [ImportReference::new("fs", file, 1, 1)]);
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].kind, ViolationKind::BadImport);
}

#[test]
fn violations_never_mix_kinds_within_a_file() {
    let set = policies(BROWSER);
    for file in ["src/browser/a.ts", "src/node/b.ts"] {
        let imports = [
            ImportReference::new("fs", file, 1, 1),
            ImportReference::new("../node/x", file, 2, 1),
        ];
        let v = set.check_file(file, imports);
        let filenames = v.iter().filter(|v| v.kind == ViolationKind::BadFilename).count();
        assert!(filenames == 0 || v.len() == 1, "{file}: {v:?}");
    }
}
