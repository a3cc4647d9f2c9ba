use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

const BODY_WRAP_COLUMNS: usize = 88;

/// Everything the permit PDF prints, already resolved from the DB rows.
pub struct PermitDocument<'a> {
    pub employee_name: &'a str,
    pub employee_code: &'a str,
    pub company: &'a str,
    pub permit_type: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub justification: &'a str,
    pub approved_on: NaiveDate,
}

pub struct CertificationDocument<'a> {
    pub employee_name: &'a str,
    pub employee_code: &'a str,
    pub company: &'a str,
    pub position: &'a str,
    pub hire_date: NaiveDate,
    pub monthly_salary: Option<f64>,
    pub addressee: Option<&'a str>,
    pub issued_on: NaiveDate,
}

pub fn render_permit(doc: &PermitDocument) -> Result<Vec<u8>> {
    let mut lines = vec![
        format!("{}", doc.company),
        String::new(),
        "WORK PERMIT AUTHORIZATION".to_string(),
        String::new(),
        format!("Employee: {} ({})", doc.employee_name, doc.employee_code),
        format!("Permit type: {}", doc.permit_type),
        format!("From {} to {}", doc.start_date, doc.end_date),
    ];

    if let (Some(s), Some(e)) = (doc.start_time, doc.end_time) {
        lines.push(format!("Hours: {} - {}", s.format("%H:%M"), e.format("%H:%M")));
    }

    lines.push(String::new());
    lines.push("Justification:".to_string());
    lines.extend(wrap_text(doc.justification, BODY_WRAP_COLUMNS));
    lines.push(String::new());
    lines.push(format!(
        "All designated approvers signed off. Finalized on {}.",
        doc.approved_on
    ));

    render_lines("Work permit", &lines)
}

pub fn render_certification(doc: &CertificationDocument) -> Result<Vec<u8>> {
    let addressee = doc.addressee.unwrap_or("To whom it may concern");

    let mut body = format!(
        "{} certifies that {} (code {}) has been employed since {} and currently \
         holds the position of {}.",
        doc.company, doc.employee_name, doc.employee_code, doc.hire_date, doc.position
    );
    if let Some(salary) = doc.monthly_salary {
        body.push_str(&format!(" Their current monthly salary is {:.2}.", salary));
    }

    let mut lines = vec![
        format!("{}", doc.company),
        String::new(),
        "LABOR CERTIFICATION".to_string(),
        String::new(),
        format!("{}:", addressee),
        String::new(),
    ];
    lines.extend(wrap_text(&body, BODY_WRAP_COLUMNS));
    lines.push(String::new());
    lines.push(format!("Issued on {}.", doc.issued_on));
    lines.push(String::new());
    lines.push("Human Resources".to_string());

    render_lines("Labor certification", &lines)
}

/// Writes `bytes` as `{prefix}-{uuid}.pdf` under `dir` and returns the file
/// name, which is what gets persisted on the request row.
pub fn store_document(dir: &str, prefix: &str, bytes: &[u8]) -> Result<String> {
    let file_name = format!("{}-{}.pdf", prefix, Uuid::new_v4());
    let path = Path::new(dir).join(&file_name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("failed to write document {}", path.display()))?;
    Ok(file_name)
}

fn render_lines(title: &str, lines: &[String]) -> Result<Vec<u8>> {
    // A4 portrait
    let (doc, page, layer) = PdfDocument::new(title, Mm(210.0), Mm(297.0), "Layer 1");

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let layer = doc.get_page(page).get_layer(layer);

    let mut y = Mm(270.0);
    for (i, line) in lines.iter().enumerate() {
        if !line.is_empty() {
            // First line is the letterhead, printed bold.
            let f: &IndirectFontRef = if i == 0 { &bold } else { &font };
            layer.use_text(line.clone(), 11.0, Mm(25.0), y, f);
        }
        y = y - Mm(7.0);
    }

    save_to_bytes(doc)
}

fn save_to_bytes(doc: PdfDocumentReference) -> Result<Vec<u8>> {
    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)?;
    let bytes = writer
        .into_inner()
        .context("failed to flush PDF buffer")?;
    Ok(bytes)
}

/// Greedy word wrap; never splits a word, so a single oversized token gets a
/// line of its own.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn wrap_respects_column_budget() {
        let lines = wrap_text("one two three four five six seven", 10);
        assert!(lines.iter().all(|l| l.len() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six seven");
    }

    #[test]
    fn wrap_keeps_oversized_token_whole() {
        let lines = wrap_text("short reallyreallylongtoken end", 8);
        assert!(lines.contains(&"reallyreallylongtoken".to_string()));
    }

    #[test]
    fn permit_renders_pdf_bytes() {
        let doc = PermitDocument {
            employee_name: "Laura Gomez",
            employee_code: "EMP-001",
            company: "Acme Holdings",
            permit_type: "paid",
            start_date: d("2026-03-02"),
            end_date: d("2026-03-03"),
            start_time: None,
            end_time: None,
            justification: "Family matter requiring two days away from the office.",
            approved_on: d("2026-02-27"),
        };

        let bytes = render_permit(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn certification_renders_pdf_bytes() {
        let doc = CertificationDocument {
            employee_name: "Laura Gomez",
            employee_code: "EMP-001",
            company: "Acme Holdings",
            position: "Analyst",
            hire_date: d("2024-01-01"),
            monthly_salary: Some(3_200_000.0),
            addressee: Some("Banco Central"),
            issued_on: d("2026-02-27"),
        };

        let bytes = render_certification(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
