//! Paginated export documents.
//!
//! A document is a fixed letterhead, a contextual summary, a tabular body,
//! and a footer. Pagination repeats the letterhead and summary on every
//! page after the first, so a reader holding page 3 of a statement still
//! knows whose statement it is. The actual rendering backend (the PDF
//! library) sits behind [`DocumentSink`]; the plain-text sink here covers
//! file export and tests.

use std::io::{self, Write};

use crate::model::money::{format_currency, format_percentage};
use crate::model::{CertificateRecord, DepositQuote, InvestmentReceipt};

pub const PAGE_WIDTH: usize = 72;
pub const ROWS_PER_PAGE: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letterhead {
    pub institution: String,
    pub title: String,
    pub identity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub width: usize,
    pub align: Align,
}

impl Column {
    pub fn left(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
            align: Align::Left,
        }
    }

    pub fn right(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
            align: Align::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub letterhead: Letterhead,
    pub summary: Vec<(String, String)>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub footer: String,
}

/// One laid-out page of text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<String>,
}

impl Document {
    /// Lay the document out into pages of at most `rows_per_page` body
    /// rows. Every page carries the letterhead and summary; the footer
    /// goes on the last page only.
    pub fn paginate(&self, rows_per_page: usize) -> Vec<Page> {
        let rows_per_page = rows_per_page.max(1);
        let chunks: Vec<&[Vec<String>]> = if self.rows.is_empty() {
            vec![&[]]
        } else {
            self.rows.chunks(rows_per_page).collect()
        };
        let total = chunks.len();

        chunks
            .into_iter()
            .enumerate()
            .map(|(index, rows)| {
                let mut lines = self.head_lines(index + 1, total);
                if !self.columns.is_empty() {
                    lines.push(self.header_row());
                    lines.push("-".repeat(PAGE_WIDTH));
                    for row in rows {
                        lines.push(self.body_row(row));
                    }
                }
                if index + 1 == total {
                    lines.push(String::new());
                    lines.push(self.footer.clone());
                }
                Page { lines }
            })
            .collect()
    }

    fn head_lines(&self, page: usize, total: usize) -> Vec<String> {
        let mut lines = vec![
            center(&self.letterhead.institution),
            center(&self.letterhead.title),
            center(&self.letterhead.identity),
            format!("{:>width$}", format!("Page {page} of {total}"), width = PAGE_WIDTH),
            "=".repeat(PAGE_WIDTH),
        ];
        for (label, value) in &self.summary {
            lines.push(format!("{label}: {value}"));
        }
        lines.push(String::new());
        lines
    }

    fn header_row(&self) -> String {
        self.columns
            .iter()
            .map(|c| pad(&c.header, c.width, c.align))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn body_row(&self, row: &[String]) -> String {
        self.columns
            .iter()
            .zip(row.iter())
            .map(|(c, cell)| pad(cell, c.width, c.align))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn center(text: &str) -> String {
    format!("{:^width$}", text, width = PAGE_WIDTH)
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text, width = width),
        Align::Right => format!("{:>width$}", text, width = width),
    }
}

/// Export seam. The production PDF renderer is an external collaborator
/// implementing this; [`TextSink`] is the built-in fallback.
pub trait DocumentSink {
    fn write_document(&mut self, document: &Document) -> io::Result<()>;
}

pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DocumentSink for TextSink<W> {
    fn write_document(&mut self, document: &Document) -> io::Result<()> {
        let pages = document.paginate(ROWS_PER_PAGE);
        let total = pages.len();
        for (index, page) in pages.iter().enumerate() {
            for line in &page.lines {
                writeln!(self.out, "{line}")?;
            }
            if index + 1 < total {
                writeln!(self.out, "\u{c}")?;
            }
        }
        self.out.flush()
    }
}

/// Build the confirmation document for a committed investment.
pub fn confirmation_document(
    institution: &str,
    customer_label: &str,
    receipt: &InvestmentReceipt,
    term_days: u32,
) -> Document {
    Document {
        letterhead: Letterhead {
            institution: institution.to_string(),
            title: "Term Deposit Confirmation".to_string(),
            identity: customer_label.to_string(),
        },
        summary: vec![
            ("Investment".to_string(), receipt.investment_code.to_string()),
            ("Start date".to_string(), receipt.start_date.to_string()),
            ("Maturity".to_string(), receipt.maturity_date.to_string()),
            ("Term".to_string(), format!("{term_days} days")),
        ],
        columns: vec![Column::left("Concept", 40), Column::right("Amount", 31)],
        rows: vec![
            vec![
                "Principal".to_string(),
                format_currency(receipt.principal),
            ],
            vec![
                "Gross interest".to_string(),
                format_currency(receipt.interest),
            ],
            vec![
                "Withholding".to_string(),
                format_currency(receipt.withholding),
            ],
            vec![
                "Total receivable at maturity".to_string(),
                format_currency(receipt.total_receivable),
            ],
        ],
        footer: "This document certifies the operation described above.".to_string(),
    }
}

/// Build the export document for an issued account certificate.
pub fn certificate_document(institution: &str, record: &CertificateRecord) -> Document {
    let summary = vec![
        (
            "Certificate".to_string(),
            record.certificate_number.clone(),
        ),
        ("Customer".to_string(), record.customer.to_string()),
        ("Issued on".to_string(), record.issued_on.to_string()),
        ("Fee".to_string(), format_currency(record.fee)),
        (
            "Debited account".to_string(),
            record.debited_account.to_string(),
        ),
    ];

    Document {
        letterhead: Letterhead {
            institution: institution.to_string(),
            title: "Account Certificate".to_string(),
            identity: record.customer.to_string(),
        },
        summary,
        columns: vec![Column::left("Certified statement", 71)],
        rows: record
            .statements
            .iter()
            .map(|line| vec![line.clone()])
            .collect(),
        footer: "Issued at the customer's request. Valid with no amendments.".to_string(),
    }
}

/// Display lines for the quote panel; shared by the TUI and documents.
pub fn quote_summary_lines(quote: &DepositQuote, term_days: u32) -> Vec<(String, String)> {
    vec![
        ("Principal".to_string(), format_currency(quote.principal)),
        (
            "Gross interest".to_string(),
            format_currency(quote.gross_interest),
        ),
        (
            "Withholding".to_string(),
            format_currency(quote.withholding),
        ),
        (
            "Total at maturity".to_string(),
            format_currency(quote.total_payable),
        ),
        (
            "Effective period rate".to_string(),
            format_percentage(quote.effective_period_rate()),
        ),
        (
            "Effective annual rate".to_string(),
            format_percentage(quote.effective_annual_rate(term_days)),
        ),
    ]
}
