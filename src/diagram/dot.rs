//! Graphviz DOT output: one table-shaped node per label, one edge per relationship type.

use std::path::Path;

use crate::config::DiagramOptions;
use crate::error::{Result, XrayError};
use crate::models::{LabelInfo, RelationshipInfo, SchemaSummary};
use crate::utils::escape::{dot_quoted, html};

/// Node used for relationship types whose endpoints were never observed.
/// Label nodes are prefixed, so no label can take this id.
const UNOBSERVED_NODE: &str = "?";

fn label_id(name: &str) -> String {
    dot_quoted(&format!("L:{name}"))
}

pub fn to_dot(summary: &SchemaSummary, options: &DiagramOptions) -> String {
    let mut output = String::new();

    output.push_str("digraph Neo4jGraph {\n");
    output.push_str(&format!(
        "  graph [rankdir={}, fontname=\"Helvetica\", fontsize=12, pad=\"0.5\", nodesep=\"0.5\", ranksep=\"1.5\"];\n",
        options.rankdir
    ));
    output.push_str("  node [shape=plain, fontname=\"Helvetica\", fontsize=10];\n");
    output.push_str("  edge [fontname=\"Helvetica\", fontsize=9, penwidth=1.0];\n\n");

    for label in &summary.labels {
        output.push_str(&format!(
            "  {} [label=<{}>];\n",
            label_id(&label.name),
            node_table(label)
        ));
    }

    if summary.relationships.iter().any(|r| r.primary_endpoint().is_none()) {
        output.push_str(&format!(
            "  {} [shape=point, width=0.15, xlabel=\"unobserved\"];\n",
            dot_quoted(UNOBSERVED_NODE)
        ));
    }

    if !summary.relationships.is_empty() {
        output.push('\n');
    }

    for relationship in &summary.relationships {
        let (source, target) = match relationship.primary_endpoint() {
            Some(endpoint) => (label_id(&endpoint.source), label_id(&endpoint.target)),
            None => (dot_quoted(UNOBSERVED_NODE), dot_quoted(UNOBSERVED_NODE)),
        };
        output.push_str(&format!(
            "  {} -> {} [label={}, fontsize=8, color=\"#5D8AA8\", style={}];\n",
            source,
            target,
            dot_quoted(&edge_label(relationship, options)),
            if relationship.count == 0 { "dashed" } else { "solid" }
        ));
    }

    output.push_str("}\n");
    output
}

/// HTML-like table label: header, column captions, one row per property.
fn node_table(label: &LabelInfo) -> String {
    let mut table = String::new();

    table.push_str("<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">");
    table.push_str(&format!(
        "<TR><TD COLSPAN=\"3\" BGCOLOR=\"#4D7A97\"><FONT COLOR=\"white\"><B>{}</B> ({})</FONT></TD></TR>",
        html(&label.name),
        label.node_count
    ));
    table.push_str("<TR>");
    table.push_str("<TD BGCOLOR=\"#EEEEFF\"><B>Property</B></TD>");
    table.push_str("<TD BGCOLOR=\"#EEEEFF\"><B>Type</B></TD>");
    table.push_str("<TD BGCOLOR=\"#EEEEFF\"><B>PK</B></TD>");
    table.push_str("</TR>");

    if label.properties.is_empty() {
        table.push_str("<TR><TD COLSPAN=\"3\">No properties</TD></TR>");
    }

    for property in &label.properties {
        let pk_cell = if property.is_primary_key {
            "<TD BGCOLOR=\"#E0FFE0\"><B>PK</B></TD>"
        } else {
            "<TD></TD>"
        };
        table.push_str(&format!(
            "<TR><TD ALIGN=\"LEFT\">{}</TD><TD ALIGN=\"LEFT\">{}</TD>{}</TR>",
            html(&property.name),
            html(&property.data_type),
            pk_cell
        ));
    }

    table.push_str("</TABLE>");
    table
}

fn edge_label(relationship: &RelationshipInfo, options: &DiagramOptions) -> String {
    if !options.edge_properties || relationship.properties.is_empty() {
        return relationship.rel_type.clone();
    }

    let props = relationship
        .properties
        .iter()
        .map(|p| format!("{}: {}", p.name, p.data_type))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ({})", relationship.rel_type, props)
}

pub fn write_dot(dot_source: &str, path: &Path) -> Result<()> {
    std::fs::write(path, dot_source).map_err(|e| XrayError::file_write(path, e))
}
