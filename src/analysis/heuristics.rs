//! File-path heuristics used by the classifier: which paths look like
//! configuration, tests, or documentation. Matching is case-insensitive
//! and deliberately coarse; a wrong guess only shifts a file between
//! categories, it never breaks the partition invariant.

/// Filenames that mark configuration, build, or dependency changes.
const CONFIG_FILENAMES: [&str; 12] = [
    "makefile",
    "dockerfile",
    "cargo.toml",
    "cargo.lock",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "go.mod",
    "go.sum",
    "pom.xml",
    "requirements.txt",
    "tsconfig.json",
];

const CONFIG_EXTENSIONS: [&str; 8] = ["toml", "yaml", "yml", "ini", "cfg", "conf", "lock", "env"];

const DOC_EXTENSIONS: [&str; 5] = ["md", "rst", "txt", "adoc", "rdoc"];

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Configuration, build, or dependency file.
pub fn is_config_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    let name = file_name(&lower);

    if CONFIG_FILENAMES.contains(&name) || name.starts_with(".env") {
        return true;
    }
    if lower.starts_with(".github/") || lower.contains("/.github/") {
        return true;
    }
    if name.ends_with(".config.js") || name.ends_with(".config.ts") {
        return true;
    }
    matches!(extension(&lower), Some(ext) if CONFIG_EXTENSIONS.contains(&ext))
}

/// Test code, by directory convention or filename convention.
pub fn is_test_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    let name = file_name(&lower);

    lower.starts_with("test/")
        || lower.starts_with("tests/")
        || lower.contains("/test/")
        || lower.contains("/tests/")
        || lower.contains("__tests__")
        || name.contains(".test.")
        || name.contains(".spec.")
        || name.contains("_test.")
        || name.contains("_spec.")
        || name.starts_with("test_")
}

/// Documentation file.
pub fn is_doc_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    let name = file_name(&lower);

    if lower.starts_with("docs/") || lower.contains("/docs/") || lower.starts_with("doc/") {
        return true;
    }
    if name.starts_with("readme") || name.starts_with("changelog") || name.starts_with("license") {
        return true;
    }
    matches!(extension(&lower), Some(ext) if DOC_EXTENSIONS.contains(&ext))
}

/// Source code as opposed to config, docs, or tests. Used by the key-file
/// ranking, not the category partition.
pub fn is_source_path(path: &str) -> bool {
    !is_config_path(path) && !is_doc_path(path) && !is_test_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        assert!(is_config_path("Cargo.toml"));
        assert!(is_config_path("ci/deploy.yaml"));
        assert!(is_config_path(".github/workflows/ci.yml"));
        assert!(is_config_path("webpack.config.js"));
        assert!(is_config_path(".env.local"));
        assert!(!is_config_path("src/main.rs"));
    }

    #[test]
    fn test_test_paths() {
        assert!(is_test_path("tests/planner_test.rs"));
        assert!(is_test_path("src/__tests__/app.tsx"));
        assert!(is_test_path("src/session.spec.ts"));
        assert!(is_test_path("pkg/parser_test.go"));
        assert!(!is_test_path("src/contest.rs"));
    }

    #[test]
    fn test_doc_paths() {
        assert!(is_doc_path("README.md"));
        assert!(is_doc_path("docs/design.rst"));
        assert!(is_doc_path("CHANGELOG"));
        assert!(!is_doc_path("src/lib.rs"));
    }

    #[test]
    fn test_source_is_the_remainder() {
        assert!(is_source_path("src/planner/mod.rs"));
        assert!(!is_source_path("docs/guide.md"));
    }
}
