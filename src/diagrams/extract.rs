//! Diagram source extraction and cleanup.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static MERMAID_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap());

static MARKDOWN_FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A`{3,}markdown[ \t]*\r?\n").unwrap());

static MARKDOWN_FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n`{3,}[ \t]*\r?\n?\z").unwrap());

/// The first fenced mermaid block in a document, without its fences.
pub fn extract_diagram(document: &str) -> Option<&str> {
    MERMAID_BLOCK
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Clean diagram source of characters that break the diagram engine.
///
/// HTML entities for `<`, `>` and `&` are decoded, `*` and `$` are dropped
/// and trailing whitespace is trimmed from every line.
pub fn clean_source(source: &str) -> String {
    source
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace(['*', '$'], "")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite a diagram document: unwrap an enclosing ```` ```markdown ````
/// fence and clean every mermaid block.
pub fn tidy_document(document: &str) -> String {
    let unwrapped = match MARKDOWN_FENCE_OPEN.find(document) {
        Some(open) => {
            let mut body = MARKDOWN_FENCE_CLOSE
                .replace(&document[open.end()..], "\n")
                .into_owned();
            // Some wrappers share their closing fence with the last block.
            let fences = body
                .lines()
                .filter(|line| line.trim_start().starts_with("```"))
                .count();
            if fences % 2 == 1 {
                body.push_str("```\n");
            }
            body
        }
        None => document.to_string(),
    };

    MERMAID_BLOCK
        .replace_all(&unwrapped, |caps: &Captures| {
            format!("```mermaid\n{}\n```", clean_source(&caps[1]))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_first_block() {
        let doc = "# UML\n\n```mermaid\nclassDiagram\n  A <|-- B\n```\n\n```mermaid\nflowchart\n```\n";
        assert_eq!(extract_diagram(doc), Some("classDiagram\n  A <|-- B"));
    }

    #[test]
    fn test_tolerates_crlf() {
        let doc = "```mermaid\r\nclassDiagram\r\n  A --> B\r\n```\r\n";
        assert_eq!(extract_diagram(doc), Some("classDiagram\r\n  A --> B"));
    }

    #[test]
    fn test_no_block() {
        assert_eq!(extract_diagram("# Nothing here\n```java\nclass A {}\n```"), None);
        assert_eq!(extract_diagram(""), None);
    }

    #[test]
    fn test_clean_source() {
        assert_eq!(
            clean_source("classDiagram   \n  A &lt;|-- B : *uses*  \n  +cost() $"),
            "classDiagram\n  A <|-- B : uses\n  +cost()"
        );
    }

    #[test]
    fn test_tidy_unwraps_markdown_fence() {
        let doc = "````markdown\n# Class Diagram\n\n```mermaid\nclassDiagram\n  A &gt; B   \n```\n````\n";
        assert_eq!(
            tidy_document(doc),
            "# Class Diagram\n\n```mermaid\nclassDiagram\n  A > B\n```\n"
        );
    }

    #[test]
    fn test_tidy_restores_shared_closing_fence() {
        let doc = "````markdown\n```mermaid\nclassDiagram\n  A --> B\n````\n";
        assert_eq!(tidy_document(doc), "```mermaid\nclassDiagram\n  A --> B\n```\n");
    }

    #[test]
    fn test_tidy_is_idempotent() {
        let doc = "# Class Diagram\n\n```mermaid\nclassDiagram\n  A --> B\n```\n";
        assert_eq!(tidy_document(doc), doc);
        assert_eq!(tidy_document(&tidy_document(doc)), doc);
    }
}
