//! Font lookups needed to place text: decoding and advance widths.

use std::collections::HashMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Advance used when a font gives no widths, in thousandths of an em.
const FALLBACK_ADVANCE: f32 = 500.0;

/// Advance for two-byte codes of composite fonts without a usable `DW`.
const COMPOSITE_DEFAULT_ADVANCE: f32 = 1000.0;

/// A glyph advance and whether it was the single-byte space code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Advance {
    /// Width in thousandths of an em
    pub width: f32,
    /// Whether word spacing applies to this code
    pub is_space: bool,
}

/// Horizontal metrics of a font, enough to estimate how far text advances.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FontMetrics {
    /// One byte per code with a `Widths` array starting at `first_char`
    Simple {
        first_char: i64,
        widths: Vec<f32>,
        missing_width: f32,
    },
    /// Two bytes per code (Type0 fonts), with per-CID widths from the
    /// descendant's `W` array
    Composite {
        default_width: f32,
        widths: HashMap<u32, f32>,
    },
    /// No metrics available: every byte advances half an em
    Estimated,
}

impl FontMetrics {
    /// Read metrics from a font dictionary.
    pub fn from_dict(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let subtype = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .unwrap_or_default();

        if subtype == b"Type0" {
            let descendant = descendant_font(doc, font);
            let default_width = descendant
                .and_then(|d| d.get(b"DW").ok())
                .and_then(|o| get_number(resolve(doc, o)))
                .unwrap_or(COMPOSITE_DEFAULT_ADVANCE);
            let widths = descendant
                .map(|d| parse_cid_widths(doc, d))
                .unwrap_or_default();
            return FontMetrics::Composite {
                default_width,
                widths,
            };
        }

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| resolve(doc, o).as_i64().ok());
        let widths = font.get(b"Widths").ok().and_then(|o| {
            resolve(doc, o).as_array().ok().map(|arr| {
                arr.iter()
                    .map(|w| get_number(resolve(doc, w)).unwrap_or(0.0))
                    .collect::<Vec<f32>>()
            })
        });

        match (first_char, widths) {
            (Some(first_char), Some(widths)) if !widths.is_empty() => {
                let missing_width = font
                    .get(b"FontDescriptor")
                    .ok()
                    .and_then(|o| resolve(doc, o).as_dict().ok())
                    .and_then(|d| d.get(b"MissingWidth").ok())
                    .and_then(get_number)
                    .unwrap_or(FALLBACK_ADVANCE);
                FontMetrics::Simple {
                    first_char,
                    widths,
                    missing_width,
                }
            }
            _ => FontMetrics::Estimated,
        }
    }

    /// Per-code advances for a string shown with this font.
    pub fn advances(&self, bytes: &[u8]) -> Vec<Advance> {
        match self {
            FontMetrics::Simple {
                first_char,
                widths,
                missing_width,
            } => bytes
                .iter()
                .map(|&b| {
                    let index = i64::from(b) - first_char;
                    let width = usize::try_from(index)
                        .ok()
                        .and_then(|i| widths.get(i))
                        .copied()
                        .unwrap_or(*missing_width);
                    Advance {
                        width,
                        is_space: b == b' ',
                    }
                })
                .collect(),
            FontMetrics::Composite {
                default_width,
                widths,
            } => bytes
                .chunks(2)
                .map(|code| {
                    // Identity-H: the CID is the big-endian code
                    let cid = code.iter().fold(0u32, |cid, &b| (cid << 8) | u32::from(b));
                    Advance {
                        width: widths.get(&cid).copied().unwrap_or(*default_width),
                        is_space: false,
                    }
                })
                .collect(),
            FontMetrics::Estimated => bytes
                .iter()
                .map(|&b| Advance {
                    width: FALLBACK_ADVANCE,
                    is_space: b == b' ',
                })
                .collect(),
        }
    }
}

/// Decoding and metrics for one font resource on a page.
pub(crate) struct PageFont<'a> {
    decoder: Box<dyn Fn(&[u8]) -> String + 'a>,
    pub metrics: FontMetrics,
}

impl<'a> PageFont<'a> {
    /// A font that decodes with `decoder` and advances by `metrics`.
    pub fn new(decoder: impl Fn(&[u8]) -> String + 'a, metrics: FontMetrics) -> Self {
        Self {
            decoder: Box::new(decoder),
            metrics,
        }
    }

    /// A font with no known encoding or widths.
    pub fn fallback() -> Self {
        Self::new(decode_text_simple, FontMetrics::Estimated)
    }

    /// Decode a shown string to Unicode.
    pub fn decode(&self, bytes: &[u8]) -> String {
        (self.decoder)(bytes)
    }
}

/// Build the font table for a page from its font resources.
pub(crate) fn load_page_fonts<'a>(
    doc: &'a LopdfDocument,
    fonts: &std::collections::BTreeMap<Vec<u8>, &'a Dictionary>,
) -> HashMap<Vec<u8>, PageFont<'a>> {
    let mut table = HashMap::with_capacity(fonts.len());
    for (name, &dict) in fonts {
        let metrics = FontMetrics::from_dict(doc, dict);
        let font = match dict.get_font_encoding(doc) {
            Ok(encoding) => PageFont::new(
                move |bytes: &[u8]| {
                    LopdfDocument::decode_text(&encoding, bytes)
                        .unwrap_or_else(|_| decode_text_simple(bytes))
                },
                metrics,
            ),
            Err(e) => {
                log::debug!(
                    "No encoding for font {}: {}",
                    String::from_utf8_lossy(name),
                    e
                );
                PageFont::new(decode_text_simple, metrics)
            }
        };
        table.insert(name.clone(), font);
    }
    table
}

fn descendant_font<'a>(doc: &'a LopdfDocument, font: &'a Dictionary) -> Option<&'a Dictionary> {
    let descendants = resolve(doc, font.get(b"DescendantFonts").ok()?).as_array().ok()?;
    resolve(doc, descendants.first()?).as_dict().ok()
}

/// Read a CIDFont `W` array into a per-CID width table.
///
/// Entries come in two forms: `c [w1 w2 ...]` gives consecutive CIDs from
/// `c`, and `c_first c_last w` gives one width to a whole range.
fn parse_cid_widths(doc: &LopdfDocument, descendant: &Dictionary) -> HashMap<u32, f32> {
    let mut table = HashMap::new();
    let Some(entries) = descendant
        .get(b"W")
        .ok()
        .and_then(|o| resolve(doc, o).as_array().ok())
    else {
        return table;
    };

    let cid_at = |i: usize| {
        entries
            .get(i)
            .and_then(|o| get_number(resolve(doc, o)))
            .filter(|n| *n >= 0.0)
            .map(|n| n as u32)
    };

    let mut i = 0;
    while let Some(first) = cid_at(i) {
        match entries.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(run)) => {
                for (offset, w) in run.iter().enumerate() {
                    if let Some(width) = get_number(resolve(doc, w)) {
                        table.insert(first.saturating_add(offset as u32), width);
                    }
                }
                i += 2;
            }
            Some(_) => {
                let (Some(last), Some(width)) = (
                    cid_at(i + 1),
                    entries.get(i + 2).and_then(|o| get_number(resolve(doc, o))),
                ) else {
                    break;
                };
                for cid in first..=last.min(first.saturating_add(u16::MAX as u32)) {
                    table.insert(cid, width);
                }
                i += 3;
            }
            None => break,
        }
    }

    if i < entries.len() {
        log::debug!("Malformed W array, stopped at entry {}", i);
    }
    table
}

/// Follow a reference one level, returning the object itself otherwise.
fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Extract a number from a PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode bytes when the font offers no encoding.
///
/// Tries UTF-16BE (with BOM), then UTF-8, then Latin-1.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_simple_metrics_lookup() {
        let metrics = FontMetrics::Simple {
            first_char: 65,
            widths: vec![600.0, 700.0],
            missing_width: 250.0,
        };
        let advances = metrics.advances(b"AB C");
        let widths: Vec<f32> = advances.iter().map(|a| a.width).collect();
        assert_eq!(widths, vec![600.0, 700.0, 250.0, 250.0]);
        assert!(advances[2].is_space);
        assert!(!advances[0].is_space);
    }

    #[test]
    fn test_composite_metrics_two_byte_codes() {
        let metrics = FontMetrics::Composite {
            default_width: 1000.0,
            widths: HashMap::new(),
        };
        assert_eq!(metrics.advances(&[0x00, 0x41, 0x00, 0x42]).len(), 2);
    }

    fn type0_font(descendant: Dictionary) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "Calibri",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Dictionary(descendant)],
        }
    }

    #[test]
    fn test_composite_widths_from_w_array() {
        let doc = LopdfDocument::with_version("1.5");
        let font = type0_font(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "DW" => 1000,
            "W" => vec![
                72.into(),
                Object::Array(vec![500.into(), 400.into()]),
                100.into(),
                110.into(),
                250.into(),
            ],
        });

        let metrics = FontMetrics::from_dict(&doc, &font);
        let widths: Vec<f32> = metrics
            .advances(&[0x00, 72, 0x00, 73, 0x00, 105, 0x00, 200])
            .iter()
            .map(|a| a.width)
            .collect();
        assert_eq!(widths, vec![500.0, 400.0, 250.0, 1000.0]);
    }

    #[test]
    fn test_composite_without_w_uses_dw() {
        let doc = LopdfDocument::with_version("1.5");
        let font = type0_font(dictionary! {
            "Subtype" => "CIDFontType2",
            "DW" => 600,
        });
        let metrics = FontMetrics::from_dict(&doc, &font);
        assert_eq!(metrics.advances(&[0x01, 0x02])[0].width, 600.0);

        let bare = type0_font(dictionary! { "Subtype" => "CIDFontType0" });
        let metrics = FontMetrics::from_dict(&doc, &bare);
        assert_eq!(
            metrics.advances(&[0x00, 0x41])[0].width,
            COMPOSITE_DEFAULT_ADVANCE
        );
    }

    #[test]
    fn test_malformed_w_array_keeps_parsed_entries() {
        let doc = LopdfDocument::with_version("1.5");
        let font = type0_font(dictionary! {
            "Subtype" => "CIDFontType2",
            "W" => vec![
                3.into(),
                Object::Array(vec![278.into()]),
                10.into(),
                Object::Name(b"Bad".to_vec()),
            ],
        });
        let metrics = FontMetrics::from_dict(&doc, &font);
        let widths: Vec<f32> = metrics
            .advances(&[0x00, 3, 0x00, 10])
            .iter()
            .map(|a| a.width)
            .collect();
        assert_eq!(widths, vec![278.0, COMPOSITE_DEFAULT_ADVANCE]);
    }

    #[test]
    fn test_metrics_from_dict() {
        let doc = LopdfDocument::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "FirstChar" => 32,
            "Widths" => vec![250.into(), 333.into()],
        };
        let metrics = FontMetrics::from_dict(&doc, &font);
        assert_eq!(
            metrics,
            FontMetrics::Simple {
                first_char: 32,
                widths: vec![250.0, 333.0],
                missing_width: FALLBACK_ADVANCE,
            }
        );

        let base14 = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        assert_eq!(FontMetrics::from_dict(&doc, &base14), FontMetrics::Estimated);
    }

    #[test]
    fn test_get_number() {
        assert_eq!(get_number(&Object::Integer(42)), Some(42.0));
        assert_eq!(get_number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(get_number(&Object::Null), None);
    }
}
