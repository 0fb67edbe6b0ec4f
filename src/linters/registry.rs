use crate::linters::{eslint, flake8, ruff, LinterSpec};
use crate::project::Language;
use std::collections::HashMap;
use std::sync::LazyLock;

const PYTHON_BIN_DIRS: &[&str] = &[".venv/bin", "venv/bin"];
const NODE_BIN_DIRS: &[&str] = &["node_modules/.bin"];

/// Built-in linters that can be referenced in post-tool-linter-hook.yaml via `linters:`
pub static LINTERS: LazyLock<HashMap<&'static str, LinterSpec>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(
        "ruff",
        LinterSpec {
            name: "ruff",
            program: "ruff",
            languages: &[Language::Python],
            local_bin_dirs: PYTHON_BIN_DIRS,
            args: ruff::args,
            parse: ruff::parse,
        },
    );

    m.insert(
        "flake8",
        LinterSpec {
            name: "flake8",
            program: "flake8",
            languages: &[Language::Python],
            local_bin_dirs: PYTHON_BIN_DIRS,
            args: flake8::args,
            parse: flake8::parse,
        },
    );

    m.insert(
        "eslint",
        LinterSpec {
            name: "eslint",
            program: "eslint",
            languages: &[Language::JavaScript, Language::TypeScript],
            local_bin_dirs: NODE_BIN_DIRS,
            args: eslint::args,
            parse: eslint::parse,
        },
    );

    m
});
