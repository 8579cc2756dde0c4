//! Path classification: which lane does a discovered file belong to?
//!
//! A pure function of the path's extension and its ancestor directory
//! names. The exclusion tables are static policy, not user-configurable.

use std::path::{Component, Path};

/// Extension of source documents (matched case-insensitively).
pub const DOC_EXT: &str = "md";

/// Extension of rendered output documents.
pub const RENDERED_EXT: &str = "html";

/// Directory names never descended into for either lane.
///
/// Version control internals, generated book output and vendored
/// dependencies. Matched case-sensitively against whole path segments.
const EXCLUDED_DIRS: &[&str] = &[".git", ".hg", "_book", "node_modules"];

/// Extensions never copied (matched case-insensitively): rendered output,
/// cartwheel project markers, ignore files and scripting leftovers.
const EXCLUDED_EXTS: &[&str] = &["html", "cartwheel", "carttpl", "gitignore", "pre", "ok", "ps1"];

/// Which lane a discovered path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A document: render and write to the output tree.
    Transform,
    /// An asset: copy verbatim to the output tree.
    Copy,
    /// Neither: counted as seen, never enqueued.
    Skip,
}

/// Classify a discovered file path.
///
/// Files under excluded directories are skipped outright, documents
/// included: converting `.git/c.md` would re-render version control
/// internals.
pub fn classify(path: &Path, copy_enabled: bool) -> Classification {
    if under_excluded_dir(path) {
        return Classification::Skip;
    }

    if ext_matches(path, DOC_EXT) {
        return Classification::Transform;
    }

    if !copy_enabled || EXCLUDED_EXTS.iter().any(|ext| ext_matches(path, ext)) {
        return Classification::Skip;
    }

    Classification::Copy
}

/// Case-insensitive extension comparison. Unlike [`Path::extension`] this
/// treats dotfiles (`.gitignore`) as having an extension, so the exclusion
/// table catches them.
fn ext_matches(path: &Path, ext: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.rsplit_once('.'))
        .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext))
}

/// Whether any ancestor directory segment is excluded. The file name itself
/// is not checked.
fn under_excluded_dir(path: &Path) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    parent.components().any(|component| {
        matches!(
            component,
            Component::Normal(segment)
                if segment.to_str().is_some_and(|s| EXCLUDED_DIRS.contains(&s))
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn test_documents_transform() {
        assert_eq!(classify(&p("/in/a.md"), true), Classification::Transform);
        assert_eq!(classify(&p("/in/deep/b.md"), false), Classification::Transform);
    }

    #[test]
    fn test_document_extension_case_insensitive() {
        assert_eq!(classify(&p("/in/README.MD"), false), Classification::Transform);
        assert_eq!(classify(&p("/in/notes.Md"), false), Classification::Transform);
    }

    #[test]
    fn test_assets_copy_when_enabled() {
        assert_eq!(classify(&p("/in/logo.png"), true), Classification::Copy);
        assert_eq!(classify(&p("/in/b.txt"), true), Classification::Copy);
    }

    #[test]
    fn test_assets_skip_when_copy_disabled() {
        assert_eq!(classify(&p("/in/logo.png"), false), Classification::Skip);
    }

    #[test]
    fn test_excluded_dirs_skip_everything() {
        assert_eq!(classify(&p("/in/.git/c.md"), true), Classification::Skip);
        assert_eq!(classify(&p("/in/.hg/hgrc"), true), Classification::Skip);
        assert_eq!(classify(&p("/in/_book/out.txt"), true), Classification::Skip);
        assert_eq!(
            classify(&p("/in/node_modules/pkg/index.js"), true),
            Classification::Skip
        );
    }

    #[test]
    fn test_excluded_dirs_match_whole_segments_only() {
        // ".github" contains ".git" but is a different segment.
        assert_eq!(classify(&p("/in/.github/ci.yml"), true), Classification::Copy);
        // A *file* named node_modules is not a directory exclusion.
        assert_eq!(classify(&p("/in/node_modules"), true), Classification::Copy);
    }

    #[test]
    fn test_excluded_dirs_are_case_sensitive() {
        assert_eq!(classify(&p("/in/.GIT/c.txt"), true), Classification::Copy);
    }

    #[test]
    fn test_excluded_extensions_skip() {
        for name in [
            "page.html",
            "page.HTML",
            "marker.cartwheel",
            "site.carttpl",
            "x.gitignore",
            ".gitignore",
            "setup.pre",
            "tasks.ok",
            "deploy.ps1",
        ] {
            assert_eq!(
                classify(&p(&format!("/in/{name}")), true),
                Classification::Skip,
                "{name} should be skipped"
            );
        }
    }

    #[test]
    fn test_extensionless_files_copy() {
        assert_eq!(classify(&p("/in/CNAME"), true), Classification::Copy);
    }
}
