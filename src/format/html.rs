//! Self-contained HTML rendering.

use std::fmt::Write;

use super::{FormatResult, ReportContext, ReportFormatter};

const STYLES: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#f0f0f0}\
tr.totals td{font-weight:bold;border-top:2px solid #888}\
.generated{color:#888;font-size:small}";

/// Renders a standalone HTML document: one table per section, then totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl ReportFormatter for HtmlFormatter {
    fn format(&self, ctx: &ReportContext) -> FormatResult<String> {
        let columns = ctx.columns();
        let mut out = String::with_capacity(4096);

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        writeln!(out, "<title>{}</title>", html_escape(&ctx.title))?;
        writeln!(out, "<style>{}</style>", STYLES)?;
        out.push_str("</head>\n<body>\n");

        writeln!(out, "<h1>{}</h1>", html_escape(&ctx.title))?;
        if !ctx.description.is_empty() {
            // Keep the author's line breaks
            let description = html_escape(&ctx.description).replace('\n', "<br>\n");
            writeln!(out, "<p class=\"description\">{}</p>", description)?;
        }

        for section in &ctx.report.sections {
            if let Some(title) = &section.title {
                writeln!(out, "<h2>{}</h2>", html_escape(title))?;
            }
            out.push_str("<table>\n<thead>\n<tr>");
            for (_, label) in &columns {
                write!(out, "<th>{}</th>", html_escape(label))?;
            }
            out.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in &section.rows {
                out.push_str("<tr>");
                for (key, _) in &columns {
                    write!(out, "<td>{}</td>", html_escape(&ctx.cell(row, key)))?;
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>\n");
        }

        if let Some(totals) = &ctx.report.totals {
            out.push_str("<table class=\"totals\">\n<tbody>\n<tr class=\"totals\">");
            for (key, _) in &columns {
                write!(out, "<td>{}</td>", html_escape(&ctx.cell(totals, key)))?;
            }
            out.push_str("</tr>\n</tbody>\n</table>\n");
        }

        writeln!(
            out,
            "<p class=\"generated\">Generated {}</p>",
            ctx.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        out.push_str("</body>\n</html>\n");
        Ok(out)
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
