//! Path and identity normalization for bundler-supplied module paths.
//!
//! Bundlers decorate the paths they report: webpack prefixes loader chains
//! (`style-loader!css-loader!/abs/file.css`), rollup plugins add a `\0` to mark
//! virtual modules, and most loaders append query strings. Everything the
//! graph stores is keyed by the identifier produced here, so two decorations
//! of the same file must collapse to the same string, and normalizing an
//! already normalized identifier must return it unchanged.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

/// File injected by the code injection collaborator. Never path-mangled.
pub const INJECTION_STUB: &str = "__DATADOG_INJECTION_STUB";

/// Marker of webpack/rspack runtime pseudo-modules.
const RUNTIME_MARKER: &str = "webpack/runtime";

const NODE_MODULES: &str = "node_modules/";

/// Lowercasing a runtime slug can surface another marker; cap the rewrites.
const MAX_RUNTIME_PASSES: usize = 8;

/// Characters allowed to start a path. Anything else at the head is noise
/// (null bytes, zero-width marks, control characters).
const LEADING_PUNCTUATION: &str = ".,!@#$%^&*()=+~`-/\\";

/// Roots a raw path is rendered relative to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathContext {
    /// Project root of the build.
    pub cwd: PathBuf,
    /// Output directory. Resolved against `cwd` when relative.
    pub out_dir: PathBuf,
}

impl PathContext {
    pub fn new(cwd: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Absolute output directory.
    pub fn absolute_out_dir(&self) -> PathBuf {
        absolute_path(&self.cwd, &self.out_dir)
    }

    /// Roots checked in order: output directory first, then the project root.
    fn roots(&self) -> [String; 2] {
        [
            root_string(&self.absolute_out_dir()),
            root_string(&self.cwd),
        ]
    }
}

/// Canonical module identifier for `raw`, relative to the build's roots.
///
/// # Example
///
/// ```
/// use tally_graph::paths::{normalize, PathContext};
///
/// let ctx = PathContext::new("/cwd", "/cwd/dist");
/// assert_eq!(normalize("/cwd/dist/path.js", &ctx), "path.js");
/// assert_eq!(normalize("/cwd/src/path.js", &ctx), "src/path.js");
/// assert_eq!(normalize("babel-loader!/cwd/src/a.js?x=1", &ctx), "src/a.js");
/// ```
pub fn normalize(raw: &str, ctx: &PathContext) -> String {
    if is_injection_file(raw) {
        return INJECTION_STUB.to_string();
    }

    let cleaned = clean_path(raw);
    if cleaned.contains(RUNTIME_MARKER) {
        let slug = runtime_slug(cleaned);
        return relativize(&slug, ctx);
    }

    relativize(&cleaned, ctx)
}

/// Same as [`normalize`]. Kept under the name the report layer uses.
pub fn clean_name(ctx: &PathContext, raw: &str) -> String {
    normalize(raw, ctx)
}

/// Strip decorations only: leading noise, loader chains and query strings.
///
/// The result is still absolute when the input was, which makes it suitable
/// for matching raw paths against each other.
pub fn clean_path(raw: &str) -> String {
    let path = strip_invisible(raw);
    let path = strip_loaders(path);
    let path = strip_query(path);
    strip_invisible(path).to_string()
}

/// Type of a module or asset, derived from its extension.
///
/// ```
/// use tally_graph::paths::get_type;
///
/// assert_eq!(get_type("webpack/runtime"), "runtime");
/// assert_eq!(get_type("path/to/file.js"), "js");
/// assert_eq!(get_type("unknown"), "unknown");
/// ```
pub fn get_type(raw: &str) -> String {
    if raw == "unknown" {
        return raw.to_string();
    }

    if raw.contains(RUNTIME_MARKER) {
        return "runtime".to_string();
    }

    extension(&clean_path(raw)).unwrap_or_else(|| "unknown".to_string())
}

/// Whether the file name of `raw` ends in the injection token.
pub fn is_injection_file(raw: &str) -> bool {
    raw.rsplit(['/', '\\'])
        .next()
        .is_some_and(|name| name.ends_with(INJECTION_STUB))
}

/// Resolve `path` against `base`, without touching the filesystem.
pub fn absolute_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        base.join(path).clean()
    }
}

/// Deepest directory shared by every path in `dirs`.
///
/// An empty list, or a common ancestor that is only the filesystem root,
/// yields `fallback`: the root is never a meaningful project directory.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tally_graph::paths::nearest_common_dir;
///
/// let fallback = Path::new("/fallback");
/// let common = nearest_common_dir(&["/a/b/c", "/a/b/d"], fallback);
/// assert_eq!(common, PathBuf::from("/a/b"));
/// assert_eq!(nearest_common_dir(&["/a", "/b"], fallback), fallback);
/// ```
pub fn nearest_common_dir<P: AsRef<Path>>(dirs: &[P], fallback: &Path) -> PathBuf {
    let mut split = dirs
        .iter()
        .map(|dir| dir.as_ref().components().collect::<Vec<_>>());

    let Some(first) = split.next() else {
        return fallback.to_path_buf();
    };

    let mut shared = first.len();
    for components in split {
        shared = first
            .iter()
            .zip(components.iter())
            .take(shared)
            .take_while(|(a, b)| a == b)
            .count();
    }

    let common: PathBuf = first[..shared].iter().collect();
    let is_root = common.has_root() && common.parent().is_none();
    if common.as_os_str().is_empty() || is_root {
        fallback.to_path_buf()
    } else {
        common
    }
}

fn root_string(path: &Path) -> String {
    let text = path.to_string_lossy();
    text.trim_end_matches('/').to_string()
}

/// Steps 4 to 7: strip the output directory or project root, keep what
/// follows the last `node_modules` segment, then trim leading dot segments.
fn relativize(cleaned: &str, ctx: &PathContext) -> String {
    let mut path = cleaned;
    let mut stripped = false;

    for root in ctx.roots() {
        if let Some(rest) = strip_root(path, &root) {
            path = rest;
            stripped = true;
            break;
        }
    }

    if let Some(rest) = after_node_modules(path) {
        path = rest;
        stripped = true;
    }

    trim_leading(path, stripped).to_string()
}

fn strip_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    if root.is_empty() || !root.starts_with('/') {
        return None;
    }

    let rest = path.strip_prefix(root)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn after_node_modules(path: &str) -> Option<&str> {
    path.match_indices(NODE_MODULES)
        .filter(|(idx, _)| *idx == 0 || path[..*idx].ends_with('/'))
        .last()
        .map(|(idx, _)| &path[idx + NODE_MODULES.len()..])
}

fn trim_leading(mut path: &str, strip_root_slashes: bool) -> &str {
    loop {
        let before = path.len();

        path = strip_invisible(path);
        if strip_root_slashes {
            path = path.trim_start_matches('/');
        }
        if path.starts_with("./") || path.starts_with("../") {
            path = strip_dot_segments(path);
        }

        if path.len() == before {
            return path;
        }
    }
}

fn strip_dot_segments(mut path: &str) -> &str {
    while let Some(rest) = path
        .strip_prefix("../")
        .or_else(|| path.strip_prefix("./"))
        .or_else(|| path.strip_prefix('/'))
    {
        path = rest;
    }
    path
}

fn strip_invisible(path: &str) -> &str {
    path.trim_start_matches(|c: char| {
        !(c.is_alphanumeric() || c == '_' || c.is_whitespace() || LEADING_PUNCTUATION.contains(c))
    })
}

fn strip_loaders(path: &str) -> &str {
    let path = path.trim_end_matches('!');
    match path.rfind('!') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn strip_query(path: &str) -> &str {
    let encoded = path
        .as_bytes()
        .windows(3)
        .position(|w| w.eq_ignore_ascii_case(b"%3f"));

    let cut = [path.find('?'), path.find('|'), encoded]
        .into_iter()
        .flatten()
        .min();

    match cut {
        Some(idx) => &path[..idx],
        None => path,
    }
}

fn runtime_slug(mut path: String) -> String {
    for _ in 0..MAX_RUNTIME_PASSES {
        let Some(idx) = path.rfind(RUNTIME_MARKER) else {
            break;
        };
        let tail = path[idx + RUNTIME_MARKER.len()..].trim_start_matches('/');
        path = if tail.is_empty() {
            "runtime".to_string()
        } else {
            tail.split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .to_lowercase()
        };
        path = clean_path(&path);
    }
    path
}

fn extension(path: &str) -> Option<String> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext: String = ext
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    (!ext.is_empty()).then(|| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PathContext {
        PathContext::new("/cwd", "/cwd/dist")
    }

    #[test]
    fn get_type_classifies_paths() {
        assert_eq!(get_type("webpack/runtime"), "runtime");
        assert_eq!(get_type("webpack/runtime/make namespace object"), "runtime");
        assert_eq!(get_type("path/to/file.js"), "js");
        assert_eq!(get_type("path/to/file.min.JS"), "js");
        assert_eq!(get_type("style-loader!/abs/file.css?inline"), "css");
        assert_eq!(get_type("unknown"), "unknown");
        assert_eq!(get_type("src/extensionless"), "unknown");
        assert_eq!(get_type("some.dir/extensionless"), "unknown");
    }

    #[test]
    fn injection_stub_is_returned_verbatim() {
        assert_eq!(clean_name(&ctx(), "./__DATADOG_INJECTION_STUB"), INJECTION_STUB);
        assert_eq!(
            clean_name(&ctx(), "/cwd/dist/__DATADOG_INJECTION_STUB"),
            INJECTION_STUB
        );
    }

    #[test]
    fn injection_token_must_end_the_file_name() {
        assert!(is_injection_file("__DATADOG_INJECTION_STUB"));
        assert!(is_injection_file("/cwd/dist/__DATADOG_INJECTION_STUB"));
        assert!(is_injection_file("C:\\proj\\__DATADOG_INJECTION_STUB"));
        assert!(!is_injection_file("/cwd/__DATADOG_INJECTION_STUB/index.js"));
        assert!(!is_injection_file("src/__DATADOG_INJECTION_STUB.js"));

        // Only a trailing token short-circuits normalization
        assert_eq!(
            clean_name(&ctx(), "/cwd/src/__DATADOG_INJECTION_STUB.js"),
            "src/__DATADOG_INJECTION_STUB.js"
        );
    }

    #[test]
    fn strips_out_dir_before_cwd() {
        assert_eq!(clean_name(&ctx(), "/cwd/dist/path.js"), "path.js");
        assert_eq!(clean_name(&ctx(), "/cwd/src/path.js"), "src/path.js");
    }

    #[test]
    fn relative_out_dir_is_resolved_against_cwd() {
        let ctx = PathContext::new("/cwd", "build");
        assert_eq!(normalize("/cwd/build/main.js", &ctx), "main.js");
    }

    #[test]
    fn root_prefix_requires_segment_boundary() {
        assert_eq!(normalize("/cwdx/file.js", &ctx()), "/cwdx/file.js");
    }

    #[test]
    fn strips_loaders_and_queries() {
        assert_eq!(
            normalize("style-loader!css-loader!/cwd/src/a.css", &ctx()),
            "src/a.css"
        );
        assert_eq!(normalize("/cwd/src/a.js?v=1", &ctx()), "src/a.js");
        assert_eq!(normalize("/cwd/src/a.js%3Fv=1", &ctx()), "src/a.js");
        assert_eq!(normalize("/cwd/src/a.vue|b", &ctx()), "src/a.vue");
    }

    #[test]
    fn strips_leading_noise() {
        assert_eq!(normalize("\0/cwd/src/virtual.js", &ctx()), "src/virtual.js");
        assert_eq!(normalize("\0commonjsHelpers.js", &ctx()), "commonjsHelpers.js");
    }

    #[test]
    fn keeps_node_modules_tail() {
        assert_eq!(
            normalize("/abs/node_modules/pkg/file.js", &ctx()),
            "pkg/file.js"
        );
        assert_eq!(
            normalize("/cwd/node_modules/@scope/pkg/index.js", &ctx()),
            "@scope/pkg/index.js"
        );
        assert_eq!(
            normalize("/a/node_modules/b/node_modules/c/index.js", &ctx()),
            "c/index.js"
        );
    }

    #[test]
    fn strips_relative_prefixes() {
        assert_eq!(normalize("./src/index.js", &ctx()), "src/index.js");
        assert_eq!(normalize("../../shared/util.js", &ctx()), "shared/util.js");
    }

    #[test]
    fn unrooted_absolute_paths_are_kept() {
        assert_eq!(normalize("/elsewhere/file.js", &ctx()), "/elsewhere/file.js");
    }

    #[test]
    fn runtime_modules_are_slugified() {
        assert_eq!(
            normalize("webpack/runtime/make namespace object", &ctx()),
            "make-namespace-object"
        );
        assert_eq!(
            normalize("webpack/runtime/Define Property Getters", &ctx()),
            "define-property-getters"
        );
    }

    #[test]
    fn normalize_is_idempotent_on_samples() {
        let samples = [
            "\0/cwd/src/a.js?x",
            "loader!./node_modules/pkg/a.js",
            "webpack/runtime/make namespace object",
            "./\0./src/x.ts",
            "/cwd/dist/chunks/a.js",
            "../node_modules/../x.js",
            "/elsewhere/file.js",
            "",
        ];
        for raw in samples {
            let once = normalize(raw, &ctx());
            assert_eq!(normalize(&once, &ctx()), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn nearest_common_dir_laws() {
        let fallback = Path::new("/fallback");
        assert_eq!(
            nearest_common_dir(&["/a/b/c"], fallback),
            PathBuf::from("/a/b/c")
        );
        assert_eq!(
            nearest_common_dir(&["/a/b/c", "/a/b/c"], fallback),
            PathBuf::from("/a/b/c")
        );
        assert_eq!(
            nearest_common_dir(&["/a/b/c", "/a/b"], fallback),
            PathBuf::from("/a/b")
        );
        assert_eq!(nearest_common_dir(&["/a", "/b"], fallback), fallback);
        assert_eq!(nearest_common_dir::<&str>(&[], fallback), fallback);
    }

    #[test]
    fn absolute_path_cleans_segments() {
        assert_eq!(
            absolute_path(Path::new("/cwd"), Path::new("./dist/../out")),
            PathBuf::from("/cwd/out")
        );
        assert_eq!(
            absolute_path(Path::new("/cwd"), Path::new("/abs/dist")),
            PathBuf::from("/abs/dist")
        );
    }
}
