//! Tree-walking markup resolver
//!
//! Every element below the document root is visited depth-first in document
//! order. An element whose namespace-stripped tag is a reference tag and
//! which carries the file attribute contributes one reference; its children
//! are visited whether or not it matched. The root element itself is never
//! a reference.
//!
//! Documents are decoded before parsing: a byte order mark wins, then the
//! `encoding` named in the XML declaration, then UTF-8.

use crate::errors::{Result, TocSigError};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use roxmltree::{Document, ParsingOptions};
use std::borrow::Cow;
use std::path::Path;

/// Ordered references named by a markup document.
///
/// Unknown encodings, undecodable bytes and parse failures are
/// `MalformedInput`.
pub fn markup_references(
    path: &Path,
    content: &[u8],
    reference_tags: &[String],
    file_attribute: &str,
) -> Result<Vec<String>> {
    let text = decode(path, content)?;

    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(&text, options)
        .map_err(|e| TocSigError::malformed(path, format!("XML parse error: {}", e)))?;

    let references = doc
        .root_element()
        .descendants()
        .skip(1)
        .filter(|node| node.is_element())
        .filter(|node| {
            let tag = node.tag_name().name();
            reference_tags.iter().any(|t| t == tag)
        })
        .filter_map(|node| node.attribute(file_attribute))
        .map(str::to_string)
        .collect();

    Ok(references)
}

fn decode<'a>(path: &Path, content: &'a [u8]) -> Result<Cow<'a, str>> {
    let (encoding, bom_len) = match Encoding::for_bom(content) {
        Some(found) => found,
        None => (sniff_encoding(path, content)?, 0),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(&content[bom_len..])
        .ok_or_else(|| TocSigError::malformed(path, format!("not valid {}", encoding.name())))
}

fn sniff_encoding(path: &Path, content: &[u8]) -> Result<&'static Encoding> {
    // `<?` with no BOM
    if content.starts_with(&[0x3C, 0x00, 0x3F, 0x00]) {
        return Ok(UTF_16LE);
    }
    if content.starts_with(&[0x00, 0x3C, 0x00, 0x3F]) {
        return Ok(UTF_16BE);
    }

    match declared_encoding(content) {
        Some(label) => Encoding::for_label(label).ok_or_else(|| {
            TocSigError::malformed(
                path,
                format!("unknown encoding {:?}", String::from_utf8_lossy(label)),
            )
        }),
        None => Ok(UTF_8),
    }
}

/// The `encoding` pseudo-attribute of a leading XML declaration.
fn declared_encoding(content: &[u8]) -> Option<&[u8]> {
    let rest = content.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|w| w == b"?>")?;
    let declaration = &rest[..end];

    let at = declaration.windows(8).position(|w| w == b"encoding")?;
    let value = skip_space(&declaration[at + 8..]).strip_prefix(b"=")?;
    let value = skip_space(value);
    let (&quote, value) = value.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let close = value.iter().position(|&b| b == quote)?;
    Some(&value[..close])
}

fn skip_space(bytes: &[u8]) -> &[u8] {
    let n = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[n..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn tags() -> Vec<String> {
        vec!["Script".to_string(), "Include".to_string()]
    }

    fn refs(xml: &str) -> Vec<String> {
        markup_references(Path::new("f.xml"), xml.as_bytes(), &tags(), "file").unwrap()
    }

    #[test]
    fn test_document_order() {
        let xml = r#"<Ui>
            <Script file="a.lua"/>
            <Include file="b.xml"/>
            <Script file="c.lua"/>
        </Ui>"#;
        assert_eq!(refs(xml), vec!["a.lua", "b.xml", "c.lua"]);
    }

    #[test]
    fn test_nested_non_matching_elements_are_descended() {
        let xml = r#"<Ui>
            <Frame name="Outer">
                <Scripts>
                    <Script file="inner.lua"/>
                </Scripts>
            </Frame>
            <Script file="after.lua"/>
        </Ui>"#;
        assert_eq!(refs(xml), vec!["inner.lua", "after.lua"]);
    }

    #[test]
    fn test_matching_element_children_are_visited() {
        let xml = r#"<Ui>
            <Include file="outer.xml">
                <Script file="nested.lua"/>
            </Include>
        </Ui>"#;
        assert_eq!(refs(xml), vec!["outer.xml", "nested.lua"]);
    }

    #[test]
    fn test_namespace_is_stripped() {
        let xml = r#"<Ui xmlns="http://www.blizzard.com/wow/ui/"
                        xmlns:ui="http://www.blizzard.com/wow/ui/">
            <Script file="default_ns.lua"/>
            <ui:Include file="prefixed.xml"/>
        </Ui>"#;
        assert_eq!(refs(xml), vec!["default_ns.lua", "prefixed.xml"]);
    }

    #[test]
    fn test_missing_attribute_and_other_attributes_ignored() {
        let xml = r#"<Ui>
            <Script>print("inline")</Script>
            <Script name="a.lua"/>
            <Script File="b.lua"/>
            <Script file="c.lua"/>
        </Ui>"#;
        assert_eq!(refs(xml), vec!["c.lua"]);
    }

    #[test]
    fn test_root_element_is_not_a_reference() {
        let xml = r#"<Include file="self.xml"><Script file="child.lua"/></Include>"#;
        assert_eq!(refs(xml), vec!["child.lua"]);
    }

    #[test]
    fn test_tag_match_is_case_sensitive() {
        assert!(refs(r#"<Ui><script file="a.lua"/></Ui>"#).is_empty());
    }

    #[test]
    fn test_bom_and_declaration_accepted() {
        let xml = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Ui><Script file=\"a.lua\"/></Ui>";
        assert_eq!(refs(xml), vec!["a.lua"]);
    }

    #[test]
    fn test_comments_are_not_elements() {
        let xml = r#"<Ui><!-- <Script file="hidden.lua"/> --><Script file="a.lua"/></Ui>"#;
        assert_eq!(refs(xml), vec!["a.lua"]);
    }

    #[test]
    fn test_malformed_markup_is_error() {
        let err = markup_references(Path::new("bad.xml"), b"<Ui><Script", &tags(), "file")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("bad.xml"));
    }

    #[test]
    fn test_non_utf8_markup_is_error() {
        let err = markup_references(Path::new("bad.xml"), b"<Ui>\xff</Ui>", &tags(), "file")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_declared_latin1_is_decoded() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<Ui><!-- caf\xe9 --><Script file=\"x.lua\"/></Ui>";
        let got = markup_references(Path::new("f.xml"), xml, &tags(), "file").unwrap();
        assert_eq!(got, vec!["x.lua"]);
    }

    #[test]
    fn test_latin1_attribute_value_is_decoded() {
        let xml = b"<?xml version='1.0' encoding='latin1'?><Ui><Script file=\"caf\xe9.lua\"/></Ui>";
        let got = markup_references(Path::new("f.xml"), xml, &tags(), "file").unwrap();
        assert_eq!(got, vec!["caf\u{e9}.lua"]);
    }

    #[test]
    fn test_utf16_with_bom_is_decoded() {
        let text = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-16\"?><Ui><Include file=\"b.xml\"/></Ui>";
        let le: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let be: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();

        for bytes in [le, be] {
            let got = markup_references(Path::new("f.xml"), &bytes, &tags(), "file").unwrap();
            assert_eq!(got, vec!["b.xml"]);
        }
    }

    #[test]
    fn test_utf16_without_bom_is_sniffed() {
        let text = "<?xml version=\"1.0\"?><Ui><Script file=\"a.lua\"/></Ui>";
        let le: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();

        let got = markup_references(Path::new("f.xml"), &le, &tags(), "file").unwrap();
        assert_eq!(got, vec!["a.lua"]);
    }

    #[test]
    fn test_unknown_declared_encoding_is_error() {
        let xml = br#"<?xml version="1.0" encoding="x-no-such-charset"?><Ui/>"#;
        let err = markup_references(Path::new("odd.xml"), xml, &tags(), "file").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("x-no-such-charset"));
    }

    #[test]
    fn test_declared_utf8_with_bad_bytes_is_error() {
        let xml = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><Ui>\xff</Ui>";
        let err = markup_references(Path::new("bad.xml"), xml, &tags(), "file").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_declared_encoding_parsing() {
        assert_eq!(
            declared_encoding(br#"<?xml version="1.0" encoding = 'windows-1252' ?><a/>"#),
            Some(&b"windows-1252"[..])
        );
        assert_eq!(declared_encoding(br#"<?xml version="1.0"?><a/>"#), None);
        assert_eq!(declared_encoding(b"<a encoding=\"latin1\"/>"), None);
    }

    #[test]
    fn test_custom_tags_and_attribute() {
        let got = markup_references(
            Path::new("f.xml"),
            br#"<Root><Import src="x.xml"/><Script file="y.lua"/></Root>"#,
            &["Import".to_string()],
            "src",
        )
        .unwrap();
        assert_eq!(got, vec!["x.xml"]);
    }
}
