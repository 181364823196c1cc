//! Repo-local architectural lint for the grocery app's layering.
//!
//! `grocery-app` keeps its screen controllers free of transport and provider
//! details. The layers live in sibling modules under `app/src`:
//!
//! - `domain`: values, validation and ports; depends on nothing else
//! - `screens`: controllers driving the ports; may use `domain` only
//! - `inbound`: UI surfaces (the console); may use `domain` and `screens`
//! - `outbound`: adapters implementing ports; may use `domain` only
//!
//! Composition (`bootstrap`, `main`) is outside the layers and free to wire
//! anything together. Sibling test files (`*_tests.rs`, `tests.rs`) are
//! skipped because test harnesses assemble real adapters.
//!
//! Run with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name the app crate is imported under from integration code.
const APP_CRATE: &str = "grocery_app";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `app/src`.
    pub file: PathBuf,
    /// Which rule was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io(io::Error),
    /// Rust source parsing failed.
    Parse { file: PathBuf, message: String },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting architecture: {err}"),
            Self::Parse { file, message } => write!(
                f,
                "Failed to parse Rust source while linting architecture ({}): {message}",
                file.display()
            ),
            Self::Violations(violations) => {
                writeln!(f, "Architecture boundary violations:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Lint the app crate sources on disk.
///
/// `app_dir` must be the `app/` directory at the repository root.
pub fn lint_app_sources(app_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = app_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = Layer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "file is not inside a layer directory".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_layer(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `app/src`.
    pub file: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Screens,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 4] = [Self::Domain, Self::Screens, Self::Inbound, Self::Outbound];

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Screens => "screens",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn infer_from_path(relative_path: &Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_os_str();
        Self::ALL.into_iter().find(|layer| first == layer.dir())
    }

    /// Crate-internal modules this layer must not reach into.
    fn forbidden_modules(self) -> BTreeSet<&'static str> {
        let composition = ["bootstrap", "config", "telemetry"];
        let mut forbidden = BTreeSet::from(composition);
        forbidden.extend(match self {
            Self::Domain => &["screens", "inbound", "outbound"][..],
            Self::Screens => &["inbound", "outbound"][..],
            Self::Inbound => &["outbound"][..],
            Self::Outbound => &["screens", "inbound"][..],
        });
        forbidden
    }

    /// External crates this layer must not name directly.
    fn forbidden_crates(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from([
                "reqwest",
                "ortho_config",
                "rand",
                "tracing",
                "tracing_subscriber",
                "color_eyre",
            ]),
            Self::Screens | Self::Inbound => BTreeSet::from([
                "reqwest",
                "ortho_config",
                "serde_json",
                "tracing_subscriber",
                "color_eyre",
            ]),
            Self::Outbound => BTreeSet::from(["ortho_config", "tracing_subscriber", "color_eyre"]),
        }
    }
}

fn check_layer(file: &Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_modules = layer.forbidden_modules();
    let forbidden_crates = layer.forbidden_crates();

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(module) = internal_root(segments).and_then(|r| forbidden_modules.get(r)) {
            messages.insert(format!(
                "{} module must not depend on crate::{module}",
                layer.dir()
            ));
        }
        if let Some(krate) = external_root(segments).and_then(|r| forbidden_crates.get(r)) {
            messages.insert(format!(
                "{} module must not depend on external crate `{krate}`",
                layer.dir()
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First module named after `crate::`, `super::` chains or the app crate.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    let start = if first == APP_CRATE {
        1
    } else if is_relative_segment(first) {
        segments
            .iter()
            .position(|segment| !is_relative_segment(segment))?
    } else {
        return None;
    };
    segments.get(start).map(String::as_str)
}

fn external_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_segment(root) || root == APP_CRATE {
        return None;
    }
    Some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn is_test_harness(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem == "tests" || stem.ends_with("_tests"))
}

fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src_dir.join(layer.dir());
        if dir.exists() {
            collect_sources_under(src_dir, &dir, &mut sources)?;
        }
    }
    Ok(sources)
}

fn collect_sources_under(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources_under(src_root, &path, sources)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") || is_test_harness(&path)
        {
            continue;
        }

        let relative = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource {
            file: relative,
            contents,
        });
    }
    Ok(())
}
