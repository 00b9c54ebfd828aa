//! CSV rendering.

use ::csv::{Terminator, WriterBuilder};

use super::{FormatError, FormatResult, ReportContext, ReportFormatter};

/// Renders one header record, then rows.
///
/// Section titles become single-cell records ahead of their rows; the totals
/// record comes last.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl ReportFormatter for CsvFormatter {
    fn format(&self, ctx: &ReportContext) -> FormatResult<String> {
        let columns = ctx.columns();
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(columns.iter().map(|(_, label)| label))?;

        for section in &ctx.report.sections {
            if let Some(title) = &section.title {
                writer.write_record([title])?;
            }
            for row in &section.rows {
                writer.write_record(columns.iter().map(|(key, _)| ctx.cell(row, key)))?;
            }
        }

        if let Some(totals) = &ctx.report.totals {
            writer.write_record(columns.iter().map(|(key, _)| ctx.cell(totals, key)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| FormatError::Flush(e.into_error()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::HeaderMap;
    use crate::format::test_support::sample_context;
    use crate::model::Row;
    use crate::postprocess::{ProcessedReport, Section};

    #[test]
    fn test_csv_output() {
        let csv = CsvFormatter.format(&sample_context("csv")).unwrap();
        assert_eq!(
            csv,
            "Page <title>,Amount\r\n\
             Year 2020\r\n\
             Home & About,\"1,200\"\r\n\
             ,30\r\n\
             Year 2021\r\n\
             \"Say \"\"hi\"\", now\",5\r\n\
             ,\"1,235\"\r\n"
        );
    }

    #[test]
    fn test_csv_quotes_line_breaks() {
        let mut headers = HeaderMap::new();
        headers.insert("Note", "Note");
        let report = ProcessedReport {
            sections: vec![Section {
                title: None,
                rows: vec![
                    Row::new().with("Note", "plain"),
                    Row::new().with("Note", "line\nbreak"),
                ],
            }],
            totals: None,
        };
        let ctx = ReportContext::new("Notes", "csv", headers, report);

        let csv = CsvFormatter.format(&ctx).unwrap();
        assert_eq!(csv, "Note\r\nplain\r\n\"line\nbreak\"\r\n");
    }
}
