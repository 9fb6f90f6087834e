//! # Naming Module
//!
//! Turns free text from the export into safe path segments and derives the
//! filename each photo receives in the organized tree:
//!
//! ```text
//! <sanitized name>+<id>___#<tag>#<tag>.<ext>
//! ```
//!
//! Two sanitizers exist on purpose. Photo filenames keep their spaces while
//! album folder names replace them with `_`. Merging them would rename every
//! folder or every file of an already organized tree.

use std::collections::BTreeSet;

/// Characters that are never allowed in a path segment
const UNSAFE_CHARS: &[char] = &['.', '<', '>', '/', '\\', ':'];

/// Characters replaced with `-` inside an encoded tag
const TAG_UNSAFE_CHARS: &[char] = &[' ', '\\', '/'];

/// Low-signal tags added automatically by upload clients
pub const IGNORED_TAGS: &[&str] = &[
    "flickrandroidapp:filter=none",
    "iphoneography",
    "instagram app",
    "uploaded:by=instagram",
    "Normal",
    "square",
    "square format",
];

/// Separator between the disambiguated name and the tag encoding
const TAG_SECTION_MARKER: &str = "___";

/// Make text safe as a filename segment. Spaces are kept.
pub fn sanitize_file_name(input: &str) -> String {
    input
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Make text safe as an album folder name. Spaces become `_` as well.
pub fn sanitize_folder_name(input: &str) -> String {
    input
        .chars()
        .map(|c| if c == ' ' || UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

pub fn is_ignored_tag(tag: &str) -> bool {
    IGNORED_TAGS.contains(&tag)
}

/// Sanitize a tag for use in a filename, or `None` if it is ignored
pub fn sanitize_tag(tag: &str) -> Option<String> {
    if is_ignored_tag(tag) {
        return None;
    }
    Some(
        tag.chars()
            .map(|c| if TAG_UNSAFE_CHARS.contains(&c) { '-' } else { c })
            .collect(),
    )
}

/// Encode tags as `#a#b`, sorted on the raw tag value.
///
/// Returns an empty string when no tag survives the ignore-list.
pub fn encode_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> String {
    let sorted: BTreeSet<&str> = tags.into_iter().collect();
    sorted
        .into_iter()
        .filter_map(sanitize_tag)
        .map(|tag| format!("#{}", tag))
        .collect()
}

/// Build the destination filename of a photo.
///
/// `name` is sanitized here; the `+<id>` suffix keeps photos that share a
/// display name apart.
pub fn destination_file_name<'a>(
    name: &str,
    id: &str,
    tags: impl IntoIterator<Item = &'a str>,
    extension: Option<&str>,
) -> String {
    let mut file_name = format!("{}+{}", sanitize_file_name(name), id);

    let encoded_tags = encode_tags(tags);
    if !encoded_tags.is_empty() {
        file_name.push_str(TAG_SECTION_MARKER);
        file_name.push_str(&encoded_tags);
    }

    if let Some(ext) = extension.filter(|e| !e.is_empty()) {
        file_name.push('.');
        file_name.push_str(&ext.to_lowercase());
    }
    file_name
}
