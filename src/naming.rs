//! Display names for picked items.
//!
//! Platforms hand back either a filesystem path or a URI. The display name is
//! the last segment with its extension removed, the same thing a file dialog
//! shows next to the thumbnail:
//!
//! - `/home/me/Pictures/IMG_0042.jpg` → `IMG_0042`
//! - `C:\Users\me\Pictures\Holiday 2024.jpeg` → `Holiday 2024`
//! - `content://media/external/images/media/1234` → `1234`
//! - `file:///tmp/My%20Photo.png?x=1` → `My Photo`

use percent_encoding::percent_decode_str;

/// Split off a URI scheme if `location` has one.
///
/// Only `scheme://` counts as a URI. Single-letter schemes are Windows drive
/// letters, and a bare `name:rest` is a relative file name.
fn uri_rest(location: &str) -> Option<&str> {
    let colon = location.find(':')?;
    let scheme = &location[..colon];
    let rest = &location[colon + 1..];
    let is_scheme = scheme.len() > 1
        && rest.starts_with("//")
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    is_scheme.then_some(rest)
}

/// Last path segment of `location`, percent-decoded for URIs.
pub fn file_name(location: &str) -> String {
    let (path, is_uri) = match uri_rest(location) {
        Some(rest) => {
            let end = rest.find(['?', '#']).unwrap_or(rest.len());
            (&rest[..end], true)
        }
        None => (location, false),
    };

    let segment = path
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");

    if is_uri {
        percent_decode_str(segment).decode_utf8_lossy().into_owned()
    } else {
        segment.to_string()
    }
}

/// Display name of a picked item: its file name without the final extension.
///
/// A name that is only an extension (`.hidden`) is kept whole.
pub fn display_name(location: &str) -> String {
    let name = file_name(location);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => name[..dot].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_path() {
        assert_eq!(display_name("/home/me/Pictures/IMG_0042.jpg"), "IMG_0042");
    }

    #[test]
    fn windows_path() {
        assert_eq!(
            display_name(r"C:\Users\me\Pictures\Holiday 2024.jpeg"),
            "Holiday 2024"
        );
    }

    #[test]
    fn relative_path_without_directory() {
        assert_eq!(display_name("photo.png"), "photo");
    }

    #[test]
    fn only_last_extension_is_removed() {
        assert_eq!(display_name("/tmp/archive.tar.jpg"), "archive.tar");
    }

    #[test]
    fn no_extension() {
        assert_eq!(display_name("/tmp/scan"), "scan");
    }

    #[test]
    fn dotfile_is_kept() {
        assert_eq!(display_name("/tmp/.hidden"), ".hidden");
    }

    #[test]
    fn android_content_uri() {
        assert_eq!(
            display_name("content://media/external/images/media/1234"),
            "1234"
        );
    }

    #[test]
    fn file_uri_is_decoded_and_query_dropped() {
        assert_eq!(display_name("file:///tmp/My%20Photo.png?x=1#frag"), "My Photo");
    }

    #[test]
    fn path_characters_are_not_decoded() {
        assert_eq!(display_name("/tmp/100%25 done.jpg"), "100%25 done");
    }

    #[test]
    fn colon_in_relative_name_is_not_a_scheme() {
        assert_eq!(display_name("photo:1.jpg"), "photo:1");
        assert_eq!(display_name("shots/12:30:05.jpg"), "12:30:05");
    }

    #[test]
    fn trailing_separator_is_ignored() {
        assert_eq!(file_name("/tmp/album/"), "album");
    }

    #[test]
    fn empty_input() {
        assert_eq!(display_name(""), "");
        assert_eq!(display_name("/"), "");
    }
}
