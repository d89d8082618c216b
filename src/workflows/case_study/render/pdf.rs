use std::fmt::Write as _;

use super::letter::{LetterPage, LineStyle};

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const LEFT_MARGIN: u32 = 56;
const TOP_BASELINE: u32 = 796;

// Objects 1-5 are fixed; each page adds a page object and a content stream.
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FIRST_PAGE_OBJECT: usize = 6;

fn font_for(style: LineStyle) -> (&'static str, u32, u32) {
    // (font resource, size, leading)
    match style {
        LineStyle::Title => ("F2", 20, 24),
        LineStyle::Subtitle => ("F2", 16, 20),
        LineStyle::Heading => ("F2", 12, 16),
        LineStyle::Strong => ("F2", 11, 14),
        LineStyle::Body => ("F1", 11, 14),
        LineStyle::Small => ("F1", 9, 12),
        LineStyle::Footer => ("F3", 8, 11),
    }
}

/// Encodes laid-out pages as a PDF 1.4 document using the standard Helvetica faces.
///
/// The output is ASCII-only and contains no timestamps, so equal pages give equal bytes.
pub(super) fn encode(pages: &[LetterPage]) -> Vec<u8> {
    let mut out = String::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.push_str("%PDF-1.4\n");

    let kids = (0..pages.len())
        .map(|index| format!("{} 0 R", FIRST_PAGE_OBJECT + index * 2))
        .collect::<Vec<_>>()
        .join(" ");

    let mut fixed = vec![
        (CATALOG, format!("<< /Type /Catalog /Pages {PAGES} 0 R >>")),
        (
            PAGES,
            format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                pages.len()
            ),
        ),
    ];
    for (object, base_font) in [
        (3, "Helvetica"),
        (4, "Helvetica-Bold"),
        (5, "Helvetica-Oblique"),
    ] {
        fixed.push((
            object,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>"
            ),
        ));
    }
    for (object, body) in fixed {
        write_object(&mut out, &mut offsets, object, &body);
    }

    for (index, page) in pages.iter().enumerate() {
        let page_object = FIRST_PAGE_OBJECT + index * 2;
        let content_object = page_object + 1;

        write_object(
            &mut out,
            &mut offsets,
            page_object,
            &format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> \
                 /Contents {content_object} 0 R >>"
            ),
        );

        let stream = content_stream(page);
        write_object(
            &mut out,
            &mut offsets,
            content_object,
            &format!(
                "<< /Length {} >>\nstream\n{stream}\nendstream",
                stream.len()
            ),
        );
    }

    let xref_offset = out.len();
    let object_count = offsets.len() + 1;
    writeln!(out, "xref\n0 {object_count}").expect("write xref header");
    out.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        writeln!(out, "{offset:010} 00000 n ").expect("write xref entry");
    }
    writeln!(
        out,
        "trailer\n<< /Size {object_count} /Root {CATALOG} 0 R >>\nstartxref\n{xref_offset}\n%%EOF"
    )
    .expect("write trailer");

    out.into_bytes()
}

fn write_object(out: &mut String, offsets: &mut Vec<usize>, object: usize, body: &str) {
    debug_assert_eq!(offsets.len() + 1, object, "objects must be written in order");
    offsets.push(out.len());
    writeln!(out, "{object} 0 obj\n{body}\nendobj").expect("write object");
}

fn content_stream(page: &LetterPage) -> String {
    let mut stream = String::new();
    let mut baseline = TOP_BASELINE;

    for line in &page.lines {
        let (font, size, leading) = font_for(line.style);
        if !line.text.trim().is_empty() {
            writeln!(
                stream,
                "BT /{font} {size} Tf 1 0 0 1 {LEFT_MARGIN} {baseline} Tm ({}) Tj ET",
                escape_text(&line.text)
            )
            .expect("write text operator");
        }
        baseline = baseline.saturating_sub(leading);
    }

    stream.trim_end().to_string()
}

/// Escapes a string for a PDF literal, mapping non-ASCII into WinAnsi octal escapes.
fn escape_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\u{2022}' => escaped.push_str("\\225"),
            '\u{2013}' => escaped.push_str("\\226"),
            '\u{2014}' => escaped.push_str("\\227"),
            c if c.is_ascii_control() => {}
            c if c.is_ascii() => escaped.push(c),
            c if ('\u{00A0}'..='\u{00FF}').contains(&c) => {
                write!(escaped, "\\{:03o}", c as u32).expect("write octal escape");
            }
            _ => escaped.push('?'),
        }
    }
    escaped
}
