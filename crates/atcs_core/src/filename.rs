use percent_encoding::percent_decode_str;
use url::Url;

/// `image_{index}.{extension}` for an inline image at 1-based `index`.
pub fn inline_image_filename(index: usize, extension: &str) -> String {
    format!("image_{index}.{extension}")
}

/// Last path segment of `url`, or `image_{index}.png` when there is none.
///
/// Trailing slashes are ignored, so `/img/dir/` yields `dir`. The segment is
/// percent-decoded; a result that is not UTF-8 or could escape the output
/// directory falls back to the indexed name.
pub fn remote_image_filename(url: &Url, index: usize) -> String {
    let trimmed = url.path().trim_end_matches('/');
    let encoded = trimmed.rsplit('/').next().unwrap_or("");
    match percent_decode_str(encoded).decode_utf8() {
        Ok(name) if is_plain_file_name(&name) => name.into_owned(),
        _ => inline_image_filename(index, "png"),
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::{inline_image_filename, remote_image_filename};
    use url::Url;

    fn name(url: &str, index: usize) -> String {
        remote_image_filename(&Url::parse(url).unwrap(), index)
    }

    #[test]
    fn basename_of_path_is_used() {
        assert_eq!(name("https://img.atcoder.jp/abc123/a.png?v=1", 1), "a.png");
        assert_eq!(name("https://img.atcoder.jp/abc123/dir/", 1), "dir");
    }

    #[test]
    fn encoded_segment_is_decoded() {
        let base = Url::parse("https://atcoder.jp/contests/abc123/tasks/abc123_a").unwrap();
        let url = base.join("../img/図 1.png").unwrap();
        assert_eq!(remote_image_filename(&url, 1), "図 1.png");
        assert_eq!(name("https://img.atcoder.jp/a%20b.png", 1), "a b.png");
    }

    #[test]
    fn unsafe_decoded_names_fall_back_to_index() {
        assert_eq!(name("https://img.atcoder.jp/x/..%2F..%2Fetc", 2), "image_2.png");
        assert_eq!(name("https://img.atcoder.jp/x/a%5Cb.png", 3), "image_3.png");
        assert_eq!(name("https://img.atcoder.jp/x/%2E%2E", 4), "image_4.png");
        assert_eq!(name("https://img.atcoder.jp/x/%FF.png", 5), "image_5.png");
    }

    #[test]
    fn empty_path_falls_back_to_index() {
        assert_eq!(name("https://img.atcoder.jp", 3), "image_3.png");
        assert_eq!(name("https://img.atcoder.jp/", 4), "image_4.png");
    }

    #[test]
    fn inline_names_use_position() {
        assert_eq!(inline_image_filename(2, "gif"), "image_2.gif");
    }
}
