use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::DocumentNotFound { path } => format!("\
# Error: Document Not Found

`{}` does not exist.
", path.display()),

        Error::DocumentUnreadable { path, reason } => format!("\
# Error: Document Unreadable

Could not read `{}` as text: {reason}
", path.display()),

        Error::FetchFailed { location, reason } => format!("\
# Error: Fetch Failed

Could not get image bytes for `{location}`: {reason}

## Fix

Relative paths are resolved from the document's own directory.
Check that the file exists there, or that the URL is reachable.
"),

        Error::ImageDirUnavailable { path, reason } => format!("\
# Error: Image Directory Unavailable

Could not create `{}`: {reason}

## Fix

Pass a writable location with `--image-dir`.
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::MalformedReference { document, raw, reason } => format!("\
# Error: Malformed Reference

In `{}`: {reason}

    {raw}

## Fix

Image tags need a `src=\"...\"` attribute pointing at a file name.
", document.display()),

        Error::TomlDe(e) => format!("\
# Error: Invalid {CONFIG_FILE}

{e}
"),

        Error::WriteFailed { path, reason } => format!("\
# Error: Write Failed

Could not write `{}`: {reason}
", path.display()),
    }
}
