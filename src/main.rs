//! cascade-select CLI entry point.
//!
//! A small terminal "UI" over the filter core: loads a record collection
//! from JSON, builds the node chain, applies selections given on the
//! command line, and renders each dropdown's state plus the matching
//! records.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::process;

use clap::Parser;

use cascade_select::{Cascade, NodeSpec, Record, Topology, records_from_json};

/// Bundled demo dataset: Delaware park trails.
const DEMO_DATA: &str = include_str!("../demos/trails.json");

/// Cascade-filter a record collection through chained selects.
#[derive(Parser, Debug)]
#[command(
    name = "cascade-select",
    version = env!("CASCADE_SELECT_VERSION"),
    about = "Cascade-filter a record collection through chained selects"
)]
struct Cli {
    /// Record collection JSON file, a bare array or {"records": [...]}
    /// (bundled trail dataset if not provided)
    data: Option<String>,

    /// Node declaration FIELD[:PARENT][:multi], repeatable in chain order
    /// (defaults to the trail demo chain)
    #[arg(short = 'n', long = "node")]
    nodes: Vec<String>,

    /// Selection FIELD=VALUE[,VALUE...], repeatable
    #[arg(short = 's', long = "select")]
    selections: Vec<String>,

    /// Emit machine-readable JSON instead of text
    #[arg(long = "json")]
    json: bool,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let rendered = match run(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, rendered) {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        print!("{}", rendered);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn Error>> {
    let data = match &cli.data {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e))?
        }
        None => DEMO_DATA.to_string(),
    };
    let records = records_from_json(&data)?;

    let topology = if cli.nodes.is_empty() {
        demo_topology()
    } else {
        let nodes = cli
            .nodes
            .iter()
            .map(|s| s.parse::<NodeSpec>())
            .collect::<Result<Vec<_>, _>>()?;
        Topology::new(nodes)
    };

    let mut cascade = Cascade::new();
    cascade.load_topology(records, &topology)?;

    for spec in &cli.selections {
        let (field, values) = spec
            .split_once('=')
            .ok_or_else(|| format!("invalid selection '{}', expected FIELD=VALUE", spec))?;
        let values: Vec<&str> = values.split(',').map(str::trim).collect();
        cascade.select_many(field.trim(), &values)?;
    }

    if cli.json {
        render_json(&cascade)
    } else {
        Ok(render_text(&cascade))
    }
}

/// The original demo chain: Region → City → Park → Trail Type →
/// Accessible (multi).
fn demo_topology() -> Topology {
    Topology::new(vec![
        NodeSpec::root("Region"),
        NodeSpec::child("City", "Region"),
        NodeSpec::child("Park", "City"),
        NodeSpec::child("Type", "Park").label("Trail Type"),
        NodeSpec::child("Accessible", "Type").multi(),
    ])
}

// ─── Text rendering ──────────────────────────────────────────────────────────

fn render_text(cascade: &Cascade) -> String {
    let mut out = String::new();

    for node in cascade.nodes() {
        let chosen = if node.is_active() {
            node.display_text()
        } else {
            "-".to_string()
        };
        out.push_str(&format!("{} [{}]\n", node.label(), chosen));
        out.push_str(&format!(
            "  options: {}\n",
            node.available_values().join(" | ")
        ));
    }

    let selected = cascade.selected_records();
    out.push_str(&format!(
        "\n{} of {} records match",
        selected.len(),
        cascade.records().len()
    ));
    if !cascade.active_filters().is_empty() {
        out.push_str(&format!(
            " (active: {})",
            cascade.active_filters().join(", ")
        ));
    }
    out.push('\n');

    if !selected.is_empty() {
        out.push('\n');
        out.push_str(&render_table(cascade, &selected));
    }
    out
}

/// Aligned record table: chain fields first, then any remaining scalar
/// fields in the order they appear.
fn render_table(cascade: &Cascade, selected: &[&Record]) -> String {
    let mut columns: Vec<String> = cascade.nodes().map(|n| n.field().to_string()).collect();
    for record in selected {
        for (field, value) in record.fields() {
            if value.as_text().is_some() && !columns.iter().any(|c| c == field) {
                columns.push(field.to_string());
            }
        }
    }

    let rows: Vec<Vec<String>> = selected
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| r.text(c).unwrap_or_default())
                .collect()
        })
        .collect();
    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    out.push_str(&format!("  {}\n", header.join("  ").trim_end()));
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect();
        out.push_str(&format!("  {}\n", line.join("  ").trim_end()));
    }
    out
}

// ─── JSON rendering ──────────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct NodeState {
    field: String,
    label: String,
    multi: bool,
    selection: Vec<String>,
    options: Vec<String>,
    visible: usize,
}

#[derive(serde::Serialize)]
struct Summary<'a> {
    nodes: Vec<NodeState>,
    active: Vec<String>,
    matched: usize,
    total: usize,
    records: Vec<&'a Record>,
}

fn render_json(cascade: &Cascade) -> Result<String, Box<dyn Error>> {
    let mut nodes = Vec::new();
    for node in cascade.nodes() {
        nodes.push(NodeState {
            field: node.field().to_string(),
            label: node.label().to_string(),
            multi: node.is_multi(),
            selection: node.selection_values().to_vec(),
            options: node.available_values().to_vec(),
            visible: cascade.visible_records(node.field())?.len(),
        });
    }
    let summary = Summary {
        nodes,
        active: cascade.active_filters().to_vec(),
        matched: cascade.selected_records().len(),
        total: cascade.records().len(),
        records: cascade.selected_records(),
    };
    let mut out = serde_json::to_string_pretty(&summary)?;
    out.push('\n');
    Ok(out)
}
