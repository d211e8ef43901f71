//! HTML views: input page, result page and error page

use axum::http::StatusCode;
use serde_json::Value;

use crate::payload::SubmittedRecord;
use crate::presenter::DisplayModel;
use crate::schema::FieldSchema;

const TITLE: &str = "Telco Customer Churn";

/// Encode HTML special characters
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

/// Input page wrapping the rendered form table
pub fn input_page(form_markup: &str) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<p>Enter the customer details and submit to score the churn risk.</p>
<form method="post" action="/">
{form}
<button type="submit" class="btn btn-primary">Submit</button>
</form>"#,
        title = TITLE,
        form = form_markup,
    );
    layout(TITLE, &body)
}

/// Result page for one scored submission
pub fn score_page(model: &DisplayModel, submitted: &SubmittedRecord, schema: &FieldSchema) -> String {
    let mut body = format!(
        r#"<h1>{title}</h1>
<div class="alert" role="alert">{message}</div>
<h2>Churn risk: <span class="churn-risk churn-risk-{risk}">{risk}</span></h2>
<table class="probabilities">"#,
        title = TITLE,
        message = escape_html(&model.message),
        risk = escape_html(&model.churn_risk),
    );

    for (label, percent) in model.percentages() {
        body.push_str(&format!(
            r#"<tr><td>{}</td><td>{:.2}%</td></tr>"#,
            escape_html(label),
            percent
        ));
    }
    body.push_str("</table>\n<h3>Scoring result</h3>\n<table class=\"result\">");

    for (field, value) in model.result.fields() {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(field),
            escape_html(&display_value(value))
        ));
    }
    body.push_str("</table>\n<h3>Customer</h3>\n<table class=\"customer\">");

    for field in schema.iter() {
        let value = submitted.get(field.name).unwrap_or("");
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(field.name),
            escape_html(value)
        ));
    }
    body.push_str("</table>\n<p><a href=\"/\">Score another customer</a></p>");

    layout(TITLE, &body)
}

/// Error page shown for failed submissions
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{code} {reason}</h1>
<div class="alert alert-danger" role="alert">{message}</div>
<p><a href="/">Back to the form</a></p>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = escape_html(message),
    );
    layout(TITLE, &body)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
