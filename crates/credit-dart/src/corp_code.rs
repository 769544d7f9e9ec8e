//! Decoding of the DART corporation-code archive.
//!
//! The directory endpoint answers with a zip archive holding a single
//! `CORPCODE.xml` document:
//!
//! ```xml
//! <result>
//!   <list>
//!     <corp_code>00126380</corp_code>
//!     <corp_name>삼성전자</corp_name>
//!     <stock_code>005930</stock_code>
//!     <modify_date>20230301</modify_date>
//!   </list>
//! </result>
//! ```
//!
//! When the request is refused the body is a small status document instead.

use std::io::{Cursor, Read};

use chrono::NaiveDate;
use credit_core::{CorpDirectory, CorpEntry, CreditError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use zip::ZipArchive;

/// Name of the XML document inside the archive.
pub const CORP_CODE_ENTRY: &str = "CORPCODE.xml";

/// Decodes a directory response body.
///
/// Zip archives are unpacked and parsed; anything else is read as a DART
/// status document and returned as [`CreditError::RemoteRejection`].
pub fn decode_archive(bytes: &[u8]) -> Result<CorpDirectory> {
    if !bytes.starts_with(b"PK") {
        return Err(status_document_error(bytes));
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CreditError::Parse(format!("Invalid corporation archive: {e}")))?;

    let entry_name = archive
        .file_names()
        .find(|name| name.eq_ignore_ascii_case(CORP_CODE_ENTRY))
        .or_else(|| {
            archive
                .file_names()
                .find(|name| name.to_ascii_lowercase().ends_with(".xml"))
        })
        .map(str::to_string)
        .ok_or_else(|| {
            CreditError::Parse(format!("{CORP_CODE_ENTRY} missing from corporation archive"))
        })?;

    let mut xml = String::new();
    archive
        .by_name(&entry_name)
        .map_err(|e| CreditError::Parse(format!("Failed to open {entry_name}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| CreditError::Parse(format!("Failed to read {entry_name}: {e}")))?;

    parse_corp_codes(&xml)
}

/// Parses the `CORPCODE.xml` document into a directory of listed companies.
pub fn parse_corp_codes(xml: &str) -> Result<CorpDirectory> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut record: Option<RawRecord> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"list" => record = Some(RawRecord::default()),
                b"corp_code" => field = Some(Field::CorpCode),
                b"corp_name" => field = Some(Field::CorpName),
                b"stock_code" => field = Some(Field::StockCode),
                b"modify_date" => field = Some(Field::ModifyDate),
                _ => field = None,
            },
            Ok(Event::Text(text)) => {
                if let (Some(rec), Some(f)) = (record.as_mut(), field) {
                    let value = text
                        .unescape()
                        .map_err(|e| CreditError::Parse(format!("Bad text in {f:?}: {e}")))?;
                    rec.set(f, value.trim());
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"list" {
                    if let Some(rec) = record.take() {
                        if let Some(entry) = rec.into_entry() {
                            entries.push(entry);
                        }
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CreditError::Parse(format!(
                    "Corporation directory XML error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            Ok(_) => {}
        }
    }

    Ok(CorpDirectory::from_entries(entries))
}

#[derive(Clone, Copy, Debug)]
enum Field {
    CorpCode,
    CorpName,
    StockCode,
    ModifyDate,
}

#[derive(Debug, Default)]
struct RawRecord {
    corp_code: String,
    corp_name: String,
    stock_code: String,
    modify_date: String,
}

impl RawRecord {
    fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::CorpCode => &mut self.corp_code,
            Field::CorpName => &mut self.corp_name,
            Field::StockCode => &mut self.stock_code,
            Field::ModifyDate => &mut self.modify_date,
        };
        slot.push_str(value);
    }

    /// Unlisted companies (blank stock code) and records without a corp code
    /// are skipped.
    fn into_entry(self) -> Option<CorpEntry> {
        if self.corp_code.is_empty() || self.stock_code.trim().is_empty() {
            return None;
        }
        let entry = CorpEntry::new(self.corp_code.as_str(), self.stock_code, self.corp_name);
        Some(match NaiveDate::parse_from_str(&self.modify_date, "%Y%m%d") {
            Ok(date) => entry.with_modify_date(date),
            Err(_) => entry,
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatusDocument {
    status: String,
    #[serde(default)]
    message: String,
}

/// Turns a non-archive body into the most specific error available.
fn status_document_error(bytes: &[u8]) -> CreditError {
    if let Ok(doc) = serde_json::from_slice::<StatusDocument>(bytes) {
        return CreditError::RemoteRejection {
            status: doc.status,
            message: doc.message,
        };
    }

    let text = String::from_utf8_lossy(bytes);
    let status = xml_leaf(&text, "status");
    let message = xml_leaf(&text, "message");
    match status {
        Some(status) => CreditError::RemoteRejection {
            status,
            message: message.unwrap_or_default(),
        },
        None => CreditError::Parse(
            "Directory response is neither a zip archive nor a status document".to_string(),
        ),
    }
}

/// Returns the trimmed text of the first `<tag>` element, if any.
fn xml_leaf(xml: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut inside = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => inside = e.name().as_ref() == tag.as_bytes(),
            Ok(Event::Text(text)) if inside => {
                return text.unescape().ok().map(|s| s.trim().to_string());
            }
            Ok(Event::End(_)) => inside = false,
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_core::StockCode;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
    <list>
        <corp_code>00159616</corp_code>
        <corp_name>X Corp</corp_name>
        <stock_code>034020</stock_code>
        <modify_date>20240102</modify_date>
    </list>
    <list>
        <corp_code>00434003</corp_code>
        <corp_name>Unlisted &amp; Co</corp_name>
        <stock_code> </stock_code>
        <modify_date>20170630</modify_date>
    </list>
    <list>
        <corp_code>00126380</corp_code>
        <corp_name>Samsung &amp; Partners</corp_name>
        <stock_code>005930</stock_code>
        <modify_date>not-a-date</modify_date>
    </list>
</result>"#;

    fn zipped(name: &str, body: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_corp_codes() {
        let directory = parse_corp_codes(SAMPLE).unwrap();
        assert_eq!(directory.len(), 2);

        let entry = directory.lookup(&StockCode::new("034020")).unwrap();
        assert_eq!(entry.corp_code.as_str(), "00159616");
        assert_eq!(entry.corp_name, "X Corp");
        assert_eq!(entry.modify_date, NaiveDate::from_ymd_opt(2024, 1, 2));

        let samsung = directory.lookup(&StockCode::new("005930")).unwrap();
        assert_eq!(samsung.corp_name, "Samsung & Partners");
        assert_eq!(samsung.modify_date, None);
    }

    #[test]
    fn test_decode_archive() {
        let directory = decode_archive(&zipped(CORP_CODE_ENTRY, SAMPLE)).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(directory.contains(&StockCode::new("005930")));
    }

    #[test]
    fn test_decode_archive_with_other_xml_name() {
        let directory = decode_archive(&zipped("corpcode_2025.xml", SAMPLE)).unwrap();
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_decode_archive_without_xml() {
        let result = decode_archive(&zipped("readme.txt", "hello"));
        assert!(matches!(result, Err(CreditError::Parse(_))));
    }

    #[test]
    fn test_status_document_xml() {
        let body = "<result><status>010</status><message>등록되지 않은 키입니다.</message></result>";
        match decode_archive(body.as_bytes()) {
            Err(CreditError::RemoteRejection { status, message }) => {
                assert_eq!(status, "010");
                assert_eq!(message, "등록되지 않은 키입니다.");
            }
            other => panic!("expected RemoteRejection, got {other:?}"),
        }
    }

    #[test]
    fn test_status_document_json() {
        let body = r#"{"status":"020","message":"요청 제한을 초과하였습니다."}"#;
        assert!(matches!(
            decode_archive(body.as_bytes()),
            Err(CreditError::RemoteRejection { ref status, .. }) if status == "020"
        ));
    }

    #[test]
    fn test_garbage_body() {
        assert!(matches!(
            decode_archive(b"\x00\x01garbage"),
            Err(CreditError::Parse(_))
        ));
    }
}
