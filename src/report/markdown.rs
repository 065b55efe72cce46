//! Markdown audit report.
//!
//! Rendering is a pure function of the summary and context, so a fixed summary
//! always produces the same bytes. The generation timestamp is supplied by the
//! caller through `ReportContext`.

use std::path::Path;

use crate::error::{Result, XrayError};
use crate::models::{
    sample_columns, ConstraintInfo, IndexInfo, LabelInfo, ProcedureInfo, PropertyInfo,
    RelationshipInfo, SchemaSummary,
};
use crate::utils::escape::{code_span, markdown};

#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub generated_at: Option<String>,
    pub dot_path: Option<String>,
    /// Set only when the PNG was actually rendered
    pub png_path: Option<String>,
}

pub fn render_markdown(summary: &SchemaSummary, context: &ReportContext) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Neo4j Audit Report: `{}`\n",
        code_span(&summary.database.name)
    ));
    if let Some(generated_at) = &context.generated_at {
        out.push_str(&format!("*Generated: {}*\n", generated_at));
    }
    out.push('\n');

    general_info(&mut out, summary);
    node_labels(&mut out, &summary.labels);
    relationship_types(&mut out, &summary.relationships);
    indexes(&mut out, &summary.indexes);
    constraints(&mut out, &summary.constraints);
    procedures(&mut out, &summary.procedures);
    diagram(&mut out, context);

    out
}

pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content).map_err(|e| XrayError::file_write(path, e))
}

fn general_info(out: &mut String, summary: &SchemaSummary) {
    let db = &summary.database;
    out.push_str("## General Info\n");
    out.push_str(&format!("- Neo4j version: **{}**\n", markdown(&db.version)));
    out.push_str(&format!(
        "- DB Size: **{}**\n",
        markdown(db.size.as_deref().unwrap_or("Unknown"))
    ));
    out.push_str(&format!("- Node Labels: **{}**\n", summary.labels.len()));
    out.push_str(&format!(
        "- Relationship Types: **{}**\n",
        summary.relationships.len()
    ));
    out.push_str(&format!("- Indexes: **{}**\n", summary.indexes.len()));
    out.push_str(&format!("- Constraints: **{}**\n", summary.constraints.len()));
    out.push_str(&format!("- Procedures: **{}**\n\n", summary.procedures.len()));
}

fn node_labels(out: &mut String, labels: &[LabelInfo]) {
    out.push_str("## Node Labels\n");
    if labels.is_empty() {
        out.push_str("No node labels found.\n\n");
        return;
    }

    for label in labels {
        out.push_str(&format!("### {}\n", markdown(&label.name)));
        out.push_str(&format!("- Node Count: `{}`\n", label.node_count));
        if label.node_count == 0 {
            out.push_str("- 0 nodes: the label exists but has no instances\n");
        }

        out.push_str("\n#### Properties\n\n");
        property_table(out, &label.properties, true);

        out.push_str("\n#### Sample Data\n\n");
        sample_table(out, label);
        out.push('\n');
    }
}

fn property_table(out: &mut String, properties: &[PropertyInfo], with_key: bool) {
    if properties.is_empty() {
        out.push_str("No properties defined.\n");
        return;
    }

    if with_key {
        out.push_str("| Name | Type | Primary Key |\n");
        out.push_str("| ---- | ---- | ----------- |\n");
    } else {
        out.push_str("| Name | Type |\n");
        out.push_str("| ---- | ---- |\n");
    }

    for property in properties {
        let name = markdown(&property.name);
        let data_type = markdown(&property.data_type);
        if with_key {
            let is_pk = if property.is_primary_key { "Yes" } else { "No" };
            out.push_str(&format!("| {} | {} | {} |\n", name, data_type, is_pk));
        } else {
            out.push_str(&format!("| {} | {} |\n", name, data_type));
        }
    }
}

fn sample_table(out: &mut String, label: &LabelInfo) {
    let columns = sample_columns(&label.samples);
    if label.samples.is_empty() || columns.is_empty() {
        out.push_str("No sample data available.\n");
        return;
    }

    let header = columns
        .iter()
        .map(|c| markdown(c))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&format!("| {} |\n", header));
    out.push_str(&format!(
        "| {} |\n",
        columns.iter().map(|_| "----").collect::<Vec<_>>().join(" | ")
    ));

    for sample in &label.samples {
        let row = columns
            .iter()
            .map(|c| {
                sample
                    .get(*c)
                    .map(|v| markdown(&v.to_string()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!("| {} |\n", row));
    }
}

fn relationship_types(out: &mut String, relationships: &[RelationshipInfo]) {
    out.push_str("## Relationship Types\n");
    if relationships.is_empty() {
        out.push_str("No relationship types found.\n\n");
        return;
    }

    for rel in relationships {
        out.push_str(&format!("### {}\n", markdown(&rel.rel_type)));
        out.push_str(&format!("- Relationship Count: `{}`\n", rel.count));

        match rel.primary_endpoint() {
            Some(endpoint) => {
                out.push_str(&format!("- Source: `{}`\n", code_span(&endpoint.source)));
                out.push_str(&format!("- Target: `{}`\n", code_span(&endpoint.target)));
                out.push_str(&format!(
                    "- Pattern: `({})-[:{}]->({})`\n",
                    code_span(&endpoint.source),
                    code_span(&rel.rel_type),
                    code_span(&endpoint.target)
                ));
            }
            None => {
                out.push_str("- 0 relationships: the type exists but has no instances\n");
            }
        }

        if rel.endpoints.len() > 1 {
            out.push_str(&format!("- All sources: {}\n", code_list(&rel.sources())));
            out.push_str(&format!("- All targets: {}\n", code_list(&rel.targets())));
            out.push_str("- Observed patterns:\n");
            for endpoint in &rel.endpoints {
                out.push_str(&format!(
                    "  - `({})-[:{}]->({})`: {}\n",
                    code_span(&endpoint.source),
                    code_span(&rel.rel_type),
                    code_span(&endpoint.target),
                    endpoint.count
                ));
            }
        }

        out.push_str("\n#### Properties\n\n");
        property_table(out, &rel.properties, false);
        out.push('\n');
    }
}

fn code_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("`{}`", code_span(item)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn joined(items: &[String]) -> String {
    markdown(&items.join(", "))
}

fn indexes(out: &mut String, indexes: &[IndexInfo]) {
    out.push_str("## Indexes\n");
    if indexes.is_empty() {
        out.push_str("No indexes defined.\n\n");
        return;
    }

    out.push_str("| Name | Type | Entity | Node Label/Relationship Type | Properties | Uniqueness |\n");
    out.push_str("| ---- | ---- | ------ | ---------------------------- | ---------- | ---------- |\n");
    for index in indexes {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            markdown(&index.name),
            markdown(&index.kind.to_string()),
            markdown(&index.entity_type),
            joined(&index.labels_or_types),
            joined(&index.properties),
            markdown(index.uniqueness.as_deref().unwrap_or(""))
        ));
    }
    out.push('\n');
}

fn constraints(out: &mut String, constraints: &[ConstraintInfo]) {
    out.push_str("## Constraints\n");
    if constraints.is_empty() {
        out.push_str("No constraints defined.\n\n");
        return;
    }

    out.push_str("| Name | Type | Entity | Node Label/Relationship Type | Properties |\n");
    out.push_str("| ---- | ---- | ------ | ---------------------------- | ---------- |\n");
    for constraint in constraints {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            markdown(&constraint.name),
            markdown(&constraint.kind.to_string()),
            markdown(&constraint.entity_type),
            joined(&constraint.labels_or_types),
            joined(&constraint.properties)
        ));
    }
    out.push('\n');
}

fn procedures(out: &mut String, procedures: &[ProcedureInfo]) {
    out.push_str("## Available Procedures\n");
    if procedures.is_empty() {
        out.push_str("No procedures found.\n\n");
        return;
    }

    out.push_str("| Name | Signature | Description |\n");
    out.push_str("| ---- | --------- | ----------- |\n");
    for procedure in procedures {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            markdown(&procedure.name),
            markdown(&procedure.signature),
            markdown(&procedure.description)
        ));
    }
    out.push('\n');
}

fn diagram(out: &mut String, context: &ReportContext) {
    out.push_str("## Graph Diagram\n");
    match &context.dot_path {
        Some(dot) => out.push_str(&format!("- DOT: `{}`\n", code_span(dot))),
        None => out.push_str("- DOT: not generated\n"),
    }
    match &context.png_path {
        Some(png) => out.push_str(&format!(
            "- PNG: `{}`\n\n![Graph diagram](<{}>)\n",
            code_span(png),
            link_destination(png)
        )),
        None => out.push_str("- PNG: not rendered\n"),
    }
}

/// Angle-bracketed link targets may hold spaces and parentheses but not `<`, `>` or newlines.
fn link_destination(path: &str) -> String {
    path.replace('<', "%3C")
        .replace('>', "%3E")
        .replace('\n', "%0A")
}
