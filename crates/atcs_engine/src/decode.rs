use atcs_logging::{atcs_debug, atcs_warn};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use scraper::Html;

/// Decode page bytes to UTF-8 and parse them into a queryable document.
pub fn parse_page(bytes: &[u8], content_type: Option<&str>) -> Html {
    Html::parse_document(&decode_page(bytes, content_type))
}

/// Charset resolution order: byte order mark, then the Content-Type
/// `charset` parameter, then content sniffing.
///
/// Malformed sequences become U+FFFD; a page with a few bad bytes still parses.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_param)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| sniff(bytes));
    atcs_debug!("decoding page as {}", encoding.name());

    // `decode` strips a matching BOM itself.
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        atcs_warn!("page is not valid {}; replaced malformed bytes", used.name());
    }
    text.into_owned()
}

fn sniff(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}
