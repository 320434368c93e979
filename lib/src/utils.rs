//! Utility functions for authnet library

use crate::constants::XML_ENDPOINT_MARKER;
use crate::error::{GatewayError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Whether a resolved URL points at an XML endpoint.
///
/// Plain substring match on the whole URL, so a host or query containing
/// `xml` also counts.
pub fn is_xml_endpoint(url: &str) -> bool {
    url.contains(XML_ENDPOINT_MARKER)
}

/// Mask a secret for display, keeping only the last four characters
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

/// Strip a UTF-8 byte order mark, which the XML API prepends to its responses
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{feff}').unwrap_or(s)
}

/// Check that `xml` holds exactly one complete, well-nested root element.
pub fn ensure_well_formed_xml(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Ok(Event::Empty(_)) if depth == 0 => roots += 1,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(text)) if depth == 0 => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(GatewayError::decode(format!(
                        "text outside the root element at byte {}",
                        reader.buffer_position()
                    )));
                }
            }
            Ok(Event::CData(_)) if depth == 0 => {
                return Err(GatewayError::decode("CDATA outside the root element"))
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(GatewayError::decode(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    if depth != 0 {
        return Err(GatewayError::decode("truncated XML: unclosed elements"));
    }
    if roots != 1 {
        return Err(GatewayError::decode(format!(
            "expected one root element, found {roots}"
        )));
    }
    Ok(())
}
