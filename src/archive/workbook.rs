//! Workbook codec for the archive index.
//!
//! The persisted artifact is a plain OOXML spreadsheet built directly on the
//! zip container and sheet XML, one header row plus one row per piece. The
//! name cell packs the piece's folder link and display name into a
//! two-argument `HYPERLINK` formula; section columns hold the literal tokens
//! `Ja`/`Nei`. Freeze-pane, table styling, and column widths are written for
//! visual continuity with earlier artifacts and are never read back.

use crate::archive::hyperlink::LinkCell;
use crate::archive::index::{ArchiveIndex, Piece};
use crate::archive::warn;
use crate::error::ArchiveError;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;

pub const COLUMNS: [&str; 7] = [
    "Navn",
    "Komponist",
    "Arrangør",
    "Partitur",
    "Treblås",
    "Messing",
    "Slagverk",
];

const TOKEN_TRUE: &str = "Ja";
const TOKEN_FALSE: &str = "Nei";

const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";
const SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

pub fn bool_token(value: bool) -> &'static str {
    if value { TOKEN_TRUE } else { TOKEN_FALSE }
}

pub fn token_bool(token: &str) -> bool {
    token == TOKEN_TRUE
}

/// Write the index to the workbook it is bound to.
pub fn save(index: &ArchiveIndex) -> Result<(), ArchiveError> {
    let Some(path) = index.source() else {
        return Err(ArchiveError::Unbound);
    };
    write_workbook(index, path)
}

/// Write the index to a brand-new workbook at `path` and bind it there.
pub fn save_as(index: &mut ArchiveIndex, path: &Path) -> Result<(), ArchiveError> {
    write_workbook(index, path)?;
    index.bind(path);
    Ok(())
}

/// Read the workbook at `path` into a fresh index bound to `path`.
///
/// A missing file or a header-only grid yields an empty index. Every decoded
/// row goes through insert-if-absent, so rows come back sorted and
/// deduplicated no matter what order the file stored them in; a row whose
/// name cell cannot be decomposed is skipped with a warning and the load
/// carries on.
pub fn load(path: &Path) -> Result<ArchiveIndex, ArchiveError> {
    let mut index = ArchiveIndex::new();
    index.bind(path);

    if !path.exists() {
        return Ok(index);
    }

    let bytes = fs::read(path)?;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice()))
        .map_err(|err| ArchiveError::Workbook(err.to_string()))?;

    let shared = read_shared_strings(&mut archive)?;
    let sheet_xml = read_entry(&mut archive, SHEET_PATH)?
        .ok_or_else(|| ArchiveError::Workbook(format!("missing {SHEET_PATH}")))?;
    let rows = parse_sheet(&sheet_xml, &shared)?;

    for (row_number, cells) in &rows {
        if *row_number == 1 {
            continue;
        }
        match decode_row(*row_number, cells) {
            Ok(piece) => {
                index.insert(piece);
            }
            Err(err) => {
                warn::emit("ROW_SKIPPED", &format!("A{row_number}"), &err.to_string());
            }
        }
    }

    Ok(index)
}

fn decode_row(row_number: u32, cells: &BTreeMap<String, RawCell>) -> Result<Piece, ArchiveError> {
    let formula = cells
        .get("A")
        .and_then(|cell| cell.formula.as_deref())
        .unwrap_or("");
    let link = LinkCell::parse(formula)
        .map_err(|err| ArchiveError::malformed_cell(row_number, err.to_string()))?;

    let text = |column: &str| {
        cells
            .get(column)
            .and_then(|cell| cell.value.clone())
            .unwrap_or_default()
    };

    Ok(Piece::new(
        &link.label,
        text("B"),
        text("C"),
        [
            token_bool(&text("D")),
            token_bool(&text("E")),
            token_bool(&text("F")),
            token_bool(&text("G")),
        ],
    ))
}

// --- reading ---------------------------------------------------------------

#[derive(Debug, Default, Clone)]
struct RawCell {
    formula: Option<String>,
    value: Option<String>,
}

type ZipSource<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

fn read_entry(archive: &mut ZipSource<'_>, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(ArchiveError::Workbook(err.to_string())),
    };
    let mut out = Vec::new();
    file.read_to_end(&mut out)?;
    Ok(Some(out))
}

fn read_shared_strings(archive: &mut ZipSource<'_>) -> Result<Vec<String>, ArchiveError> {
    let Some(xml) = read_entry(archive, SHARED_STRINGS_PATH)? else {
        return Ok(Vec::new());
    };

    let mut strings = Vec::new();
    let mut reader = quick_xml::Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut current = String::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_t => {
                current.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(ArchiveError::Workbook(err.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Shared,
    Inline,
    Plain,
}

fn cell_reference(e: &quick_xml::events::BytesStart<'_>) -> (Option<String>, CellKind) {
    let mut reference = None;
    let mut kind = CellKind::Plain;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                reference = String::from_utf8(attr.value.to_vec()).ok();
            }
            b"t" => match attr.value.as_ref() {
                b"s" => kind = CellKind::Shared,
                b"inlineStr" => kind = CellKind::Inline,
                _ => kind = CellKind::Plain,
            },
            _ => {}
        }
    }
    (reference, kind)
}

fn split_reference(reference: &str) -> Option<(String, u32)> {
    let column: String = reference.chars().take_while(char::is_ascii_alphabetic).collect();
    let row = reference[column.len()..].parse::<u32>().ok()?;
    if column.is_empty() { None } else { Some((column, row)) }
}

/// Parse the sheet into `row number -> column letter -> cell`, resolving
/// shared-string and inline-string values to plain text and keeping formula
/// bodies verbatim.
fn parse_sheet(
    xml: &[u8],
    shared: &[String],
) -> Result<BTreeMap<u32, BTreeMap<String, RawCell>>, ArchiveError> {
    let mut rows: BTreeMap<u32, BTreeMap<String, RawCell>> = BTreeMap::new();

    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut current_ref: Option<(String, u32)> = None;
    let mut current_kind = CellKind::Plain;
    let mut cell = RawCell::default();
    let mut in_formula = false;
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"c" => {
                    let (reference, kind) = cell_reference(&e);
                    current_ref = reference.as_deref().and_then(split_reference);
                    current_kind = kind;
                    cell = RawCell::default();
                }
                b"f" if current_ref.is_some() => in_formula = true,
                b"v" if current_ref.is_some() => in_value = true,
                b"t" if current_ref.is_some() && current_kind == CellKind::Inline => {
                    in_inline_text = true;
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                let text = t.unescape().unwrap_or_default();
                if in_formula {
                    cell.formula.get_or_insert_with(String::new).push_str(&text);
                } else if in_value {
                    let resolved = match current_kind {
                        CellKind::Shared => text
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|i| shared.get(i).cloned())
                            .unwrap_or_default(),
                        _ => text.into_owned(),
                    };
                    cell.value.get_or_insert_with(String::new).push_str(&resolved);
                } else if in_inline_text {
                    cell.value.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some((column, row)) = current_ref.take() {
                        if cell.formula.is_some() || cell.value.is_some() {
                            rows.entry(row).or_default().insert(column, std::mem::take(&mut cell));
                        }
                    }
                    in_formula = false;
                    in_value = false;
                    in_inline_text = false;
                }
                b"f" => in_formula = false,
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"c" => {
                // Valueless cell, usually style-only. Nothing to record.
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ArchiveError::Workbook(err.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

// --- writing ---------------------------------------------------------------

fn write_workbook(index: &ArchiveIndex, path: &Path) -> Result<(), ArchiveError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    {
        let mut zip = zip::ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default();
        let row_count = index.len();

        let entries: [(&str, String); 8] = [
            ("[Content_Types].xml", content_types_xml()),
            ("_rels/.rels", root_rels_xml()),
            ("xl/workbook.xml", workbook_xml()),
            ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
            ("xl/styles.xml", styles_xml()),
            (SHEET_PATH, sheet_xml(index)),
            ("xl/worksheets/_rels/sheet1.xml.rels", sheet_rels_xml()),
            ("xl/tables/table1.xml", table_xml(row_count)),
        ];
        for (name, body) in entries {
            zip.start_file(name, options)
                .map_err(|err| ArchiveError::Workbook(err.to_string()))?;
            zip.write_all(body.as_bytes())?;
        }
        zip.finish()
            .map_err(|err| ArchiveError::Workbook(err.to_string()))?;
    }
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

fn content_types_xml() -> String {
    format!(
        "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
         <Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
         <Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>\
         <Override PartName=\"/xl/tables/table1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.table+xml\"/>\
         </Types>"
    )
}

fn root_rels_xml() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
         </Relationships>"
    )
}

fn workbook_xml() -> String {
    format!(
        "{XML_DECL}<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
         <sheets><sheet name=\"Sheet1\" sheetId=\"1\" r:id=\"rId1\"/></sheets>\
         </workbook>"
    )
}

fn workbook_rels_xml() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
         </Relationships>"
    )
}

fn styles_xml() -> String {
    format!(
        "{XML_DECL}<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <fonts count=\"1\"><font><sz val=\"11\"/><name val=\"Calibri\"/></font></fonts>\
         <fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill>\
         <fill><patternFill patternType=\"gray125\"/></fill></fills>\
         <borders count=\"1\"><border/></borders>\
         <cellStyleXfs count=\"1\"><xf/></cellStyleXfs>\
         <cellXfs count=\"1\"><xf/></cellXfs>\
         </styleSheet>"
    )
}

fn inline_cell(out: &mut String, reference: &str, text: &str) {
    out.push_str(&format!(
        "<c r=\"{reference}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        escape(text)
    ));
}

fn sheet_xml(index: &ArchiveIndex) -> String {
    let last_row = index.len() + 1;
    let mut out = String::new();
    out.push_str(XML_DECL);
    out.push_str(
        "<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
    );
    out.push_str(&format!("<dimension ref=\"A1:G{last_row}\"/>"));

    // Keep the header row visible while scrolling.
    out.push_str(
        "<sheetViews><sheetView workbookViewId=\"0\">\
         <pane ySplit=\"1\" topLeftCell=\"A2\" activePane=\"bottomLeft\" state=\"frozen\"/>\
         <selection pane=\"bottomLeft\" activeCell=\"A2\" sqref=\"A2\"/>\
         </sheetView></sheetViews>",
    );
    out.push_str(
        "<cols><col min=\"1\" max=\"1\" width=\"40\" customWidth=\"1\"/>\
         <col min=\"2\" max=\"3\" width=\"30\" customWidth=\"1\"/>\
         <col min=\"4\" max=\"8\" width=\"15\" customWidth=\"1\"/></cols>",
    );

    out.push_str("<sheetData>");
    out.push_str("<row r=\"1\">");
    for (i, column) in COLUMNS.iter().enumerate() {
        inline_cell(&mut out, &format!("{}1", column_letter(i)), column);
    }
    out.push_str("</row>");

    for (i, piece) in index.pieces().enumerate() {
        let row = i + 2;
        let link = LinkCell::for_piece(piece.name());
        out.push_str(&format!("<row r=\"{row}\">"));
        out.push_str(&format!(
            "<c r=\"A{row}\" t=\"str\"><f>{formula}</f><v>{label}</v></c>",
            formula = escape(&link.formula()),
            label = escape(&link.label),
        ));
        inline_cell(&mut out, &format!("B{row}"), &piece.composer);
        inline_cell(&mut out, &format!("C{row}"), &piece.arranger);
        for (j, flag) in piece.sections().into_iter().enumerate() {
            inline_cell(
                &mut out,
                &format!("{}{row}", column_letter(3 + j)),
                bool_token(flag),
            );
        }
        out.push_str("</row>");
    }
    out.push_str("</sheetData>");

    out.push_str("<tableParts count=\"1\"><tablePart r:id=\"rId1\"/></tableParts>");
    out.push_str("</worksheet>");
    out
}

fn column_letter(i: usize) -> char {
    (b'A' + i as u8) as char
}

fn sheet_rels_xml() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/table\" Target=\"../tables/table1.xml\"/>\
         </Relationships>"
    )
}

fn table_xml(row_count: usize) -> String {
    let last_row = row_count + 1;
    let mut columns = String::new();
    for (i, column) in COLUMNS.iter().enumerate() {
        columns.push_str(&format!(
            "<tableColumn id=\"{}\" name=\"{}\"/>",
            i + 1,
            escape(*column)
        ));
    }
    format!(
        "{XML_DECL}<table xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
         id=\"1\" name=\"Arkiv\" displayName=\"Arkiv\" ref=\"A1:G{last_row}\" headerRowCount=\"1\">\
         <autoFilter ref=\"A1:G{last_row}\"/>\
         <tableColumns count=\"7\">{columns}</tableColumns>\
         <tableStyleInfo name=\"TableStyleMedium2\" showFirstColumn=\"0\" showLastColumn=\"0\" \
         showRowStripes=\"0\" showColumnStripes=\"0\"/>\
         </table>"
    )
}
