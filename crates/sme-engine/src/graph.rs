//! Graphviz rendering of a wired topology.
//!
//! Buses are boxes (dashed when foreign-driven), processes are ellipses.
//! Edges run from an input bus to the process reading it and from a
//! process to each bus it drives, labelled with the port field name.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::network::Network;

/// Render the topology of `network` as a DOT digraph.
///
/// # Examples
///
/// ```
/// use sme_engine::{render_graph, Mode, Network, NetworkConfig};
///
/// let net = Network::wire("top", NetworkConfig::default(), Mode::Local, |w| {
///     w.bus("data", ["value"])?;
///     Ok(())
/// })
/// .unwrap();
/// assert!(render_graph(&net).contains("b0 [label=\"data\", shape=box];"));
/// ```
pub fn render_graph(network: &Network) -> String {
    let mut dot = format!("digraph \"{}\" {{\n", escape(network.name()));
    dot.push_str("    rankdir=LR;\n");

    for (id, bus) in network.buses().iter() {
        let style = if bus.is_external() { ", style=dashed" } else { "" };
        dot.push_str(&format!(
            "    b{id} [label=\"{}\", shape=box{style}];\n",
            escape(bus.name())
        ));
    }
    for (i, process) in network.processes().iter().enumerate() {
        dot.push_str(&format!(
            "    p{i} [label=\"{}\", shape=ellipse];\n",
            escape(process.name())
        ));
    }
    for (i, process) in network.processes().iter().enumerate() {
        let ports = process.ports();
        for (field, bus) in ports.inputs() {
            dot.push_str(&format!("    b{bus} -> p{i} [label=\"{}\"];\n", escape(field)));
        }
        for (field, bus) in ports.outputs() {
            dot.push_str(&format!("    p{i} -> b{bus} [label=\"{}\"];\n", escape(field)));
        }
    }

    dot.push_str("}\n");
    dot
}

/// Write the DOT rendering of `network` to `out`.
pub fn write_graph<W: Write>(network: &Network, out: &mut W) -> io::Result<()> {
    out.write_all(render_graph(network).as_bytes())
}

/// Write the DOT rendering of `network` to `path`, replacing any
/// existing file.
pub fn write_graph_file(network: &Network, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_graph(network, &mut out)?;
    out.flush()
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
