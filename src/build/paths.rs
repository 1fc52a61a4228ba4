//! Output naming for generated pages.
//!
//! - Pattern folders map to `All_Design_Patterns_<slug>.html`
//! - Host pages passed to `render` keep their file name
//! - Diagram artifacts are linked relative to the page output directory

use std::path::{Component, Path, PathBuf};

use crate::util::{slugify, to_href};

/// File name prefix shared by all generated pattern pages.
pub const PAGE_PREFIX: &str = "All_Design_Patterns_";

/// Output file name of a pattern folder's page.
///
/// # Examples
/// ```ignore
/// page_file_name("ProxyPattern") => "All_Design_Patterns_proxypattern.html"
/// page_file_name("Factory_Method") => "All_Design_Patterns_factory-method.html"
/// ```
pub fn page_file_name(folder_name: &str) -> String {
    format!("{PAGE_PREFIX}{}.html", slugify(folder_name))
}

/// Output file name of a host page given on the command line.
pub fn host_file_name(host_path: &Path) -> Option<String> {
    host_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Link from a page in `output_dir` to an artifact in `diagram_dir`.
///
/// Both directories must be relative to the same base, or both absolute;
/// otherwise the artifact path is returned as is.
///
/// # Examples
/// ```ignore
/// artifact_href(".", "build/diagrams", "a.svg") => "build/diagrams/a.svg"
/// artifact_href("site", "site/diagrams", "a.svg") => "diagrams/a.svg"
/// artifact_href("site", "build/diagrams", "a.svg") => "../build/diagrams/a.svg"
/// ```
pub fn artifact_href(output_dir: &Path, diagram_dir: &Path, file_name: &str) -> String {
    let target: PathBuf = diagram_dir.join(file_name);
    if output_dir.is_absolute() != target.is_absolute() {
        return to_href(&target);
    }

    let from: Vec<Component> = output_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let rest = &from[shared..];
    if !rest.iter().all(|c| matches!(c, Component::Normal(_))) {
        return to_href(&target);
    }

    let mut href = PathBuf::new();
    for _ in rest {
        href.push("..");
    }
    href.extend(&to[shared..]);
    to_href(&href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_file_name() {
        assert_eq!(
            page_file_name("ProxyPattern"),
            "All_Design_Patterns_proxypattern.html"
        );
        assert_eq!(
            page_file_name("Factory_Method"),
            "All_Design_Patterns_factory-method.html"
        );
    }

    #[test]
    fn test_host_file_name() {
        assert_eq!(
            host_file_name(Path::new("pages/proxy.html")).as_deref(),
            Some("proxy.html")
        );
        assert_eq!(host_file_name(Path::new("/")), None);
    }

    #[test]
    fn test_artifact_href_from_project_root() {
        assert_eq!(
            artifact_href(Path::new("."), Path::new("build/diagrams"), "a.svg"),
            "build/diagrams/a.svg"
        );
    }

    #[test]
    fn test_artifact_href_below_output() {
        assert_eq!(
            artifact_href(Path::new("site"), Path::new("site/diagrams"), "a.svg"),
            "diagrams/a.svg"
        );
    }

    #[test]
    fn test_artifact_href_elsewhere() {
        assert_eq!(
            artifact_href(Path::new("site"), Path::new("build/diagrams"), "a.svg"),
            "../build/diagrams/a.svg"
        );
    }

    #[test]
    fn test_artifact_href_absolute() {
        assert_eq!(
            artifact_href(
                Path::new("/repo/site/."),
                Path::new("/repo/build/diagrams"),
                "a.svg"
            ),
            "../build/diagrams/a.svg"
        );
        assert_eq!(
            artifact_href(Path::new("/repo/."), Path::new("/repo/build/diagrams"), "a.svg"),
            "build/diagrams/a.svg"
        );
    }
}
