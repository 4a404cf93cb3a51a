//! Graphviz document emission.
//!
//! Layout of the emitted text, top to bottom:
//!
//! 1. `digraph "<graph_name>" {` and the graph `label`
//! 2. a default `node [...]` statement
//! 3. the legend cluster, one node per [`Classification`]
//! 4. ticket nodes; with `group_by_milestone` the ungrouped tickets first,
//!    then one `cluster_<n>` per milestone numbered from 1 in first-seen order
//! 5. edges, in discovery order, dashed in the closed color when the
//!    blocking ticket is closed
//! 6. the closing brace
//!
//! [`wrap_directive`] then puts the text inside the wiki processor block.

use std::fmt::Write as _;

use tracing::debug;

use crate::error::Result;
use crate::graph::{Classification, DepGraph, NodeStyle, partition};
use crate::label::{QUOTE_SPECIALS, RECORD_SPECIALS, escape, format_label, quote};
use crate::model::Ticket;
use crate::options::Options;

const INDENT: &str = "  ";

/// Writes one [`DepGraph`] as a Graphviz document.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    options: &'a Options,
    base_url: &'a str,
}

impl<'a> Emitter<'a> {
    /// `base_url` is prefixed to the ticket id to form each node's `URL`.
    #[must_use]
    pub const fn new(options: &'a Options, base_url: &'a str) -> Self {
        Self { options, base_url }
    }

    /// Serialize `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DepGraphError::Render`] if writing the text fails.
    pub fn document(&self, graph: &DepGraph) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "digraph {} {{", quote(&self.options.graph_name))?;
        writeln!(out, "{INDENT}label={}", quote(&self.options.label))?;
        writeln!(
            out,
            "{INDENT}node [fontsize={}, shape=\"box\"]",
            quote(&self.options.fontsize.to_string())
        )?;
        self.write_legend(&mut out)?;

        let mut clusters = String::new();
        if self.options.group_by_milestone {
            let mut number = 0;
            for cluster in partition(graph) {
                if cluster.is_ungrouped() {
                    for ticket in cluster.tickets {
                        self.write_node(&mut out, INDENT, ticket, graph.is_blocked(ticket.id))?;
                    }
                    continue;
                }
                number += 1;
                let inner = format!("{INDENT}{INDENT}");
                writeln!(clusters, "{INDENT}subgraph cluster_{number} {{")?;
                writeln!(clusters, "{inner}label={}", quote(cluster.milestone))?;
                for ticket in cluster.tickets {
                    self.write_node(&mut clusters, &inner, ticket, graph.is_blocked(ticket.id))?;
                }
                writeln!(clusters, "{INDENT}}}")?;
            }
            debug!(clusters = number, "grouped nodes by milestone");
        } else {
            for ticket in graph.tickets() {
                self.write_node(&mut out, INDENT, ticket, graph.is_blocked(ticket.id))?;
            }
        }
        out.push_str(&clusters);

        let mut edges = String::new();
        for (src, dst) in graph.edges() {
            write!(edges, "{INDENT}{} -> {}", src.id.node_name(), dst.id.node_name())?;
            if src.is_closed() {
                write!(
                    edges,
                    " [style=\"dashed\", color={}]",
                    quote(&self.options.closed.color)
                )?;
            }
            edges.push('\n');
        }
        out.push_str(&edges);

        out.push_str("}\n");
        Ok(out)
    }

    fn write_legend(&self, out: &mut String) -> Result<()> {
        let inner = format!("{INDENT}{INDENT}");
        writeln!(out, "{INDENT}subgraph cluster_legend {{")?;
        writeln!(out, "{inner}label=\"Legend\"")?;
        for class in Classification::LEGEND {
            write!(out, "{inner}{} [label={}", class.legend_node(), quote(class.caption()))?;
            write_style(out, &class.style(self.options))?;
            out.push_str("]\n");
        }
        writeln!(out, "{INDENT}}}")?;
        Ok(())
    }

    fn write_node(
        &self,
        out: &mut String,
        indent: &str,
        ticket: &Ticket,
        blocked: bool,
    ) -> Result<()> {
        write!(
            out,
            "{indent}{} [URL={}, label=\"{}\"",
            ticket.id.node_name(),
            quote(&format!("{}{}", self.base_url, ticket.id)),
            self.node_label(ticket)
        )?;
        if self.options.show_ticket_number {
            out.push_str(", shape=\"record\"");
        }
        write_style(out, &Classification::of(ticket, blocked).style(self.options))?;
        out.push_str("]\n");
        Ok(())
    }

    /// Label text without the surrounding quotes.
    #[must_use]
    pub fn node_label(&self, ticket: &Ticket) -> String {
        let width = self.options.word_wrap_char_limit;
        if self.options.show_ticket_number {
            format!(
                "{{#{}|{}}}",
                escape(&ticket.id.to_string(), RECORD_SPECIALS),
                format_label(&ticket.summary, width, RECORD_SPECIALS)
            )
        } else {
            format_label(&ticket.summary, width, QUOTE_SPECIALS)
        }
    }
}

fn write_style(out: &mut String, style: &NodeStyle) -> Result<()> {
    write!(
        out,
        ", color={}, fontcolor={}",
        quote(&style.color),
        quote(&style.fontcolor)
    )?;
    if style.filled {
        out.push_str(", style=\"filled\"");
    }
    Ok(())
}

/// Wrap a graph document in the wiki `graphviz` processor block.
///
/// With `debug`, a plain preformatted copy of the same text follows.
#[must_use]
pub fn wrap_directive(dot: &str, debug: bool) -> String {
    let mut out = String::with_capacity(dot.len() * 2 + 32);
    out.push_str("{{{\n#!graphviz\n");
    out.push_str(dot);
    out.push_str("}}}\n");
    if debug {
        out.push_str("{{{\n");
        out.push_str(dot);
        out.push_str("}}}\n");
    }
    out
}
