//! Destination planning: where relocated bytes land and the tag that points at them.

use std::path::{Component, Path, PathBuf};

use crate::error::Error;
use crate::markup::TagMarkup;
use crate::resolver::SOURCE_ATTRIBUTE;
use crate::types::{Relocation, RelocationPlan, ResolvedReference};

/// Compute the relocation target and replacement text for one reference.
///
/// The destination keeps only the base file name of the source, so two sources
/// sharing a name land on the same file. The rewritten `src` is the path from
/// the document's directory back to the working directory, joined with the
/// destination, so the reference resolves from the document's own location.
///
/// # Errors
///
/// Returns `Error::MalformedReference` if the source location has no file name
/// or the working directory cannot be made absolute.
pub fn plan(
    resolved: &ResolvedReference,
    relocation: &Relocation,
    document_dir: &Path,
    markup: &dyn TagMarkup,
) -> Result<RelocationPlan, Error> {
    let Some(file_name) = Path::new(&resolved.source_location).file_name() else {
        return Err(Error::MalformedReference {
            document: PathBuf::new(),
            raw: resolved.source_location.clone(),
            reason: "source location has no file name".to_string(),
        });
    };
    let destination_path = normalize_path(&relocation.image_dir).join(file_name);

    let from = absolute_dir(document_dir, &relocation.working_dir);
    let to = normalize_path(&relocation.working_dir);
    let source = relative_path(&from, &to).join(&destination_path);

    let mut tag = resolved.tag.clone();
    tag.set_attribute(SOURCE_ATTRIBUTE, &to_slash(&source));

    return Ok(RelocationPlan {
        destination_path,
        replacement_reference_text: markup.serialize(&tag),
    });
}

/// Path from `from` to `to`, both absolute and normalized. Empty when equal.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();
    let shared = from.iter().zip(&to).take_while(|(a, b)| return a == b).count();

    let mut relative = PathBuf::new();
    for _ in from.iter().skip(shared) {
        relative.push("..");
    }
    for component in to.iter().skip(shared) {
        relative.push(component);
    }
    return relative;
}

/// Anchor `dir` at `working_dir` when relative, then collapse dots.
/// An empty directory (document in the working directory) is the working directory.
fn absolute_dir(dir: &Path, working_dir: &Path) -> PathBuf {
    return normalize_path(&working_dir.join(dir));
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
/// Pops the last component for `..` when possible, preserves it otherwise.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => {
            let can_pop = matches!(
                components.last(),
                Some(c) if matches!(c, Component::Normal(_))
            );
            if can_pop {
                components.pop();
            } else if !matches!(components.last(), Some(Component::RootDir | Component::Prefix(_))) {
                components.push(component);
            }
        },
        other => components.push(other),
    }
    return;
}

/// Render a path with `/` separators for use inside markup.
fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            },
        }
    }
    return out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{HtmlTagMarkup, Tag};

    fn relocation(image_dir: &str) -> Relocation {
        Relocation {
            image_dir: PathBuf::from(image_dir),
            working_dir: PathBuf::from("/work"),
        }
    }

    fn bracket(label: &str, location: &str) -> ResolvedReference {
        ResolvedReference {
            label: Some(label.to_string()),
            source_location: location.to_string(),
            tag: Tag::image(Some(label)),
        }
    }

    #[test]
    fn document_in_subdirectory_gets_parent_prefix() {
        let planned = plan(&bracket("cat", "cat.png"), &relocation("img"), Path::new("docs"), &HtmlTagMarkup)
            .unwrap();
        assert_eq!(planned.destination_path, PathBuf::from("img/cat.png"));
        assert_eq!(planned.replacement_reference_text, r#"<img alt="cat" src="../img/cat.png"/>"#);
    }

    #[test]
    fn document_in_working_dir_has_no_prefix() {
        let planned = plan(&bracket("cat", "cat.png"), &relocation("img"), Path::new(""), &HtmlTagMarkup)
            .unwrap();
        assert_eq!(planned.replacement_reference_text, r#"<img alt="cat" src="img/cat.png"/>"#);
    }

    #[test]
    fn nested_document_climbs_every_level() {
        let planned = plan(
            &bracket("", "https://example.com/assets/logo.svg"),
            &relocation("image"),
            Path::new("a/b/./c"),
            &HtmlTagMarkup,
        )
        .unwrap();
        assert_eq!(planned.destination_path, PathBuf::from("image/logo.svg"));
        assert_eq!(planned.replacement_reference_text, r#"<img alt="" src="../../../image/logo.svg"/>"#);
    }

    #[test]
    fn source_directories_are_discarded() {
        let planned = plan(&bracket("x", "../shared/pics/x.png"), &relocation("img"), Path::new("docs"), &HtmlTagMarkup)
            .unwrap();
        assert_eq!(planned.destination_path, PathBuf::from("img/x.png"));
    }

    #[test]
    fn document_outside_working_dir_descends_back_in() {
        let planned = plan(&bracket("x", "x.png"), &relocation("img"), Path::new("../other"), &HtmlTagMarkup)
            .unwrap();
        assert_eq!(planned.replacement_reference_text, r#"<img alt="x" src="../work/img/x.png"/>"#);
    }

    #[test]
    fn tag_form_only_changes_src() {
        let tag = HtmlTagMarkup
            .parse(r#"<img width="10" src="https://example.com/x.png" alt="x" />"#)
            .unwrap();
        let resolved = ResolvedReference {
            label: Some("x".to_string()),
            source_location: "https://example.com/x.png".to_string(),
            tag,
        };
        let planned = plan(&resolved, &relocation("img"), Path::new("docs"), &HtmlTagMarkup).unwrap();
        assert_eq!(planned.replacement_reference_text, r#"<img width="10" src="../img/x.png" alt="x"/>"#);
    }

    #[test]
    fn location_without_file_name_is_malformed() {
        let err = plan(&bracket("x", ".."), &relocation("img"), Path::new(""), &HtmlTagMarkup).unwrap_err();
        assert!(matches!(err, Error::MalformedReference { .. }));
    }

    #[test]
    fn leading_current_dir_in_image_dir_is_dropped() {
        let planned = plan(&bracket("x", "x.png"), &relocation("./img2"), Path::new(""), &HtmlTagMarkup)
            .unwrap();
        assert_eq!(planned.destination_path, PathBuf::from("img2/x.png"));
        assert_eq!(planned.replacement_reference_text, r#"<img alt="x" src="img2/x.png"/>"#);
    }

    #[test]
    fn relative_path_between_siblings() {
        assert_eq!(relative_path(Path::new("/w/a/b"), Path::new("/w/c")), PathBuf::from("../../c"));
        assert_eq!(relative_path(Path::new("/w"), Path::new("/w")), PathBuf::new());
    }
}
