//! HTML report rendering
//!
//! Plain `format!` templating. Every interpolated value coming from input or
//! from a source goes through `html_escape::encode_text`.

use super::ReportSummary;
use crate::models::{AggregatedRecord, SourceEnvelope, SourceOutcome};
use chrono::{DateTime, Utc};
use html_escape::encode_text;

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; }
        .business { border: 1px solid #ddd; margin: 20px 0; padding: 15px; }
        .found { background-color: #e8f5e8; }
        .not-found { background-color: #fff3cd; }
        .error { background-color: #f8d7da; }
        .dataset-result { margin: 10px 0; padding: 10px; border-left: 3px solid #007bff; }
        .summary { background-color: #f8f9fa; padding: 15px; margin: 20px 0; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
"#;

/// Render the complete HTML document
pub fn render_html(records: &[AggregatedRecord], generated_at: DateTime<Utc>) -> String {
    let summary = ReportSummary::from_records(records);
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Business Dataset Search Report</title>
    <style>{style}</style>
</head>
<body>
    <h1>Business Dataset Search Report</h1>
    <p>Generated on: {generated}</p>
"#,
        style = STYLE,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    render_summary(&mut html, &summary);

    html.push_str("    <h2>Detailed Results</h2>\n");
    for record in records {
        render_record(&mut html, record);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_summary(html: &mut String, summary: &ReportSummary) {
    html.push_str(&format!(
        r#"    <div class="summary">
        <h2>Summary</h2>
        <p><strong>Total Businesses Searched:</strong> {total}</p>
        <p><strong>Businesses with Findings:</strong> {with_findings}</p>
"#,
        total = summary.total_businesses,
        with_findings = summary.businesses_with_findings
    ));

    if summary.failed_businesses > 0 {
        html.push_str(&format!(
            "        <p><strong>Businesses that could not be searched:</strong> {}</p>\n",
            summary.failed_businesses
        ));
    }

    html.push_str(
        r#"        <h3>Dataset Search Statistics</h3>
        <table>
            <tr><th>Dataset</th><th>Found</th><th>Not Found</th><th>Unavailable</th><th>Errors</th></tr>
"#,
    );

    for (kind, stats) in &summary.sources {
        html.push_str(&format!(
            "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            encode_text(kind.label()),
            stats.found,
            stats.not_found,
            stats.unavailable,
            stats.error
        ));
    }

    html.push_str("        </table>\n    </div>\n");
}

fn render_record(html: &mut String, record: &AggregatedRecord) {
    let css_class = if record.is_degenerate() {
        "error"
    } else if record.has_findings() {
        "found"
    } else {
        "not-found"
    };

    html.push_str(&format!(
        r#"    <div class="business {css_class}">
        <h3>{name}</h3>
        <p><strong>Search Date:</strong> {timestamp}</p>
"#,
        css_class = css_class,
        name = encode_text(record.identity.name()),
        timestamp = record.timestamp.to_rfc3339()
    ));

    if let Some(location) = record.identity.location_label() {
        html.push_str(&format!(
            "        <p><strong>Location:</strong> {}</p>\n",
            encode_text(&location)
        ));
    }

    if let Some(error) = &record.error {
        html.push_str(&format!(
            "        <p><em>Search failed: {}</em></p>\n",
            encode_text(error)
        ));
    }

    for envelope in &record.envelopes {
        render_envelope(html, envelope);
    }

    html.push_str("    </div>\n");
}

fn render_envelope(html: &mut String, envelope: &SourceEnvelope) {
    html.push_str(&format!(
        "        <div class=\"dataset-result\">\n            <h4>{} - Status: {}</h4>\n",
        encode_text(envelope.source().label()),
        envelope.status().as_str().to_uppercase()
    ));

    match envelope.outcome() {
        SourceOutcome::Found(payload) => {
            let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
            html.push_str(&format!("            <pre>{}</pre>\n", encode_text(&pretty)));
        }
        SourceOutcome::NotFound => {
            html.push_str("            <p><em>No records found</em></p>\n");
        }
        SourceOutcome::RequiresCredential => {
            html.push_str("            <p><em>API key required</em></p>\n");
        }
        SourceOutcome::RequiresOfflineProcessing(notice) => {
            html.push_str(&format!("            <p><em>{}</em></p>\n", encode_text(&notice.note)));
            html.push_str("            <ul>\n");
            for dataset in &notice.datasets_to_check {
                html.push_str(&format!("                <li>{}</li>\n", encode_text(dataset)));
            }
            html.push_str("            </ul>\n");
        }
        SourceOutcome::Error(detail) => {
            html.push_str(&format!("            <p><em>Error: {}</em></p>\n", encode_text(detail)));
        }
    }

    html.push_str("        </div>\n");
}
