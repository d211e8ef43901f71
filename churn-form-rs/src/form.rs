//! Form renderer
//!
//! Builds the input table from a `FieldSchema`. Fields are grouped by kind
//! (floats, integers, enumerations) and each group is laid out two cells per
//! row, so a group never shares a row with another.

use crate::schema::{FieldDefinition, FieldKind, FieldSchema};
use crate::views::escape_html;

const FIELDS_PER_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Float,
    Integer,
    Enumeration,
}

fn group_of(field: &FieldDefinition) -> Group {
    match field.kind {
        FieldKind::BoundedFloat { .. } => Group::Float,
        FieldKind::BoundedInteger { .. } => Group::Integer,
        FieldKind::Enumeration { .. } => Group::Enumeration,
    }
}

/// Render the input table for `schema`
pub fn render_form(schema: &FieldSchema) -> String {
    let mut html = String::from("<table>");

    for group in [Group::Float, Group::Integer, Group::Enumeration] {
        let fields: Vec<&FieldDefinition> = schema.iter().filter(|f| group_of(f) == group).collect();

        for row in fields.chunks(FIELDS_PER_ROW) {
            html.push_str("<tr>");
            for field in row {
                html.push_str(&render_cell(field));
            }
            html.push_str("</tr>");
        }
    }

    html.push_str("</table>");
    html
}

fn render_cell(field: &FieldDefinition) -> String {
    let name = escape_html(field.name);

    let control = match field.kind {
        FieldKind::BoundedFloat { min, max, default } => number_input(&name, min, max, "any", default),
        FieldKind::BoundedInteger { min, max, default } => number_input(&name, min, max, "1", default),
        FieldKind::Enumeration { options } => select(&name, options),
    };

    format!("<td>{}{}</td>", name, control)
}

fn number_input<T: std::fmt::Display>(name: &str, min: T, max: T, step: &str, default: T) -> String {
    format!(
        r#"<input type="number" class="form-control" min="{min}" max="{max}" step="{step}" name="{name}" id="{name}" value="{default}" required>"#,
        min = min,
        max = max,
        step = step,
        name = name,
        default = default,
    )
}

fn select(name: &str, options: &[&str]) -> String {
    let mut html = format!(r#"<select class="form-control" name="{0}" id="{0}">"#, name);

    for (idx, option) in options.iter().enumerate() {
        let option = escape_html(option);
        let selected = if idx == 0 { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{0}"{1}>{0}</option>"#,
            option, selected
        ));
    }

    html.push_str("</select>");
    html
}
