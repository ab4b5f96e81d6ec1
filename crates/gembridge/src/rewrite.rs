//! Generation request rewriting
//!
//! Walks a normalized content list and replaces every reference to a
//! buffered handle with an inline-data part carrying the buffered bytes,
//! so the outbound request never depends on the relay's Files API.

use crate::buffer::ContentBuffer;
use crate::types::{Content, INLINE_MIME_TYPE, Part};

/// Replace buffered file references with inline data, in place.
///
/// For each block, for each part in order: a `file_data` part whose URI is
/// present in the buffer becomes an `inline_data` part with the buffered
/// bytes and the declared media type. Every other part is left untouched,
/// including file references the buffer has never seen - those forward to
/// the real operation and fail or succeed exactly as they would without
/// interception. Part and block order is preserved.
///
/// Returns the number of parts replaced.
pub fn rewrite_contents(contents: &mut [Content], buffer: &ContentBuffer) -> usize {
    let mut replaced = 0;

    for content in contents.iter_mut() {
        for part in content.parts.iter_mut() {
            let Some(file_data) = &part.file_data else {
                continue;
            };
            let Some(bytes) = buffer.get(&file_data.file_uri) else {
                continue;
            };

            tracing::debug!(
                handle = %file_data.file_uri,
                size = bytes.len(),
                "Inlining buffered upload into generation request"
            );
            *part = Part::from_bytes(&bytes, INLINE_MIME_TYPE);
            replaced += 1;
        }
    }

    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Contents;

    #[test]
    fn buffered_reference_becomes_inline_data() {
        let buffer = ContentBuffer::new();
        let payload = b"fake png bytes".to_vec();
        let handle = buffer.put(payload.clone());

        let mut contents =
            Contents::from(Part::from_uri(&handle, INLINE_MIME_TYPE)).into_contents();
        let replaced = rewrite_contents(&mut contents, &buffer);

        assert_eq!(replaced, 1);
        let part = &contents[0].parts[0];
        assert!(part.file_data.is_none());

        let blob = part.inline_data.as_ref().expect("inline data expected");
        assert_eq!(blob.mime_type, INLINE_MIME_TYPE);
        assert_eq!(blob.decode().unwrap(), payload);
    }

    #[test]
    fn unknown_handle_is_forwarded_unchanged() {
        let buffer = ContentBuffer::new();
        let original = Part::from_uri("files/real-upload-123", "image/jpeg");

        let mut contents = Contents::from(original.clone()).into_contents();
        let replaced = rewrite_contents(&mut contents, &buffer);

        assert_eq!(replaced, 0);
        assert_eq!(contents[0].parts[0], original);
    }

    #[test]
    fn non_file_parts_are_untouched() {
        let buffer = ContentBuffer::new();
        buffer.put(b"buffered".to_vec());

        let text = Part::text("describe the attachment");
        let inline = Part::from_bytes(b"already inline", "image/jpeg");
        let mut contents = Contents::from(vec![text.clone(), inline.clone()]).into_contents();

        let replaced = rewrite_contents(&mut contents, &buffer);

        assert_eq!(replaced, 0);
        assert_eq!(contents[0].parts[0], text);
        assert_eq!(contents[0].parts[1], inline);
    }

    #[test]
    fn only_buffered_parts_replaced_order_preserved() {
        let buffer = ContentBuffer::new();
        let first = buffer.put(b"first payload".to_vec());
        let second = buffer.put(b"second payload".to_vec());

        // N = 5 parts, M = 2 buffered references
        let mut contents = Contents::from(vec![
            Part::text("intro"),
            Part::from_uri(&first, INLINE_MIME_TYPE),
            Part::from_uri("files/not-ours", "image/jpeg"),
            Part::from_uri(&second, INLINE_MIME_TYPE),
            Part::text("outro"),
        ])
        .into_contents();

        let replaced = rewrite_contents(&mut contents, &buffer);
        assert_eq!(replaced, 2);

        let parts = &contents[0].parts;
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0].text.as_deref(), Some("intro"));
        assert_eq!(
            parts[1].inline_data.as_ref().unwrap().decode().unwrap(),
            b"first payload"
        );
        assert_eq!(
            parts[2].file_data.as_ref().unwrap().file_uri,
            "files/not-ours"
        );
        assert_eq!(
            parts[3].inline_data.as_ref().unwrap().decode().unwrap(),
            b"second payload"
        );
        assert_eq!(parts[4].text.as_deref(), Some("outro"));
    }

    #[test]
    fn every_block_is_visited() {
        let buffer = ContentBuffer::new();
        let handle = buffer.put(b"shared".to_vec());

        let mut contents = vec![
            Content::user(vec![Part::from_uri(&handle, INLINE_MIME_TYPE)]),
            Content {
                role: Some("model".to_string()),
                parts: vec![Part::text("earlier answer")],
            },
            Content::user(vec![Part::from_uri(&handle, INLINE_MIME_TYPE)]),
        ];

        let replaced = rewrite_contents(&mut contents, &buffer);

        assert_eq!(replaced, 2);
        assert!(contents[0].parts[0].inline_data.is_some());
        assert_eq!(contents[1].parts[0].text.as_deref(), Some("earlier answer"));
        assert!(contents[2].parts[0].inline_data.is_some());
    }

    #[test]
    fn empty_contents_is_a_noop() {
        let buffer = ContentBuffer::new();
        let mut contents: Vec<Content> = Vec::new();
        assert_eq!(rewrite_contents(&mut contents, &buffer), 0);
    }
}
