use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use std::io::{self, BufRead};

use regexp_nfa::{Automaton, Match, Regex, Role};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pattern to compile
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// String to search (each line of stdin if absent)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Print the automaton as graphviz dot instead of searching
    #[arg(short, long, value_name = "KIND")]
    graph: Option<GraphKind>,

    /// Report a match for every start at each offset, not only the leftmost
    #[arg(short, long)]
    exhaustive: bool,

    /// Print capture groups of each match
    #[arg(short, long)]
    captures: bool,

    /// Graph attributes for the dot output, comma separated
    #[arg(
        short,
        long = "attr",
        value_name = "KEY=VALUE",
        value_delimiter = ',',
        value_parser = parse_attr
    )]
    attrs: Vec<Option<Attr>>,
}

type Attr = (String, String);

/// Split `key=value`. A pair with an empty side parses to `None` and is dropped.
fn parse_attr(s: &str) -> Result<Option<Attr>, String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Ok(None);
    }
    Ok(Some((key.to_string(), value.to_string())))
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GraphKind {
    Nfa,
    Dfa,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let re = Regex::new(&args.pattern)
        .with_context(|| format!("Failed to compile {:?}", args.pattern))?;

    if let Some(kind) = args.graph {
        let attrs = args.attrs.iter().flatten().cloned().collect_vec();
        let dot = match kind {
            GraphKind::Nfa => to_dot(re.nfa(), "nfa", &attrs),
            GraphKind::Dfa => to_dot(&re.to_dfa(), "dfa", &attrs),
        };
        println!("{dot}");
        return Ok(());
    }

    match args.input.as_deref() {
        Some(input) => report(&re, input, &args),
        None => {
            for line in io::stdin().lock().lines() {
                report(&re, &line.context("Failed to read stdin")?, &args);
            }
        }
    }
    Ok(())
}

fn report(re: &Regex, subject: &str, args: &Args) {
    let matches = if args.exhaustive {
        re.search_exhaustive(subject)
    } else {
        re.search(subject)
    };
    println!("[{}]", matches.iter().map(|m| m.end).join(", "));
    if args.captures {
        for found in &matches {
            print_captures(found, subject);
        }
    }
}

fn print_captures(found: &Match, subject: &str) {
    println!("end {}:", found.end);
    for (group, span) in found.captures.iter().enumerate() {
        match span {
            Some(span) => println!(
                "  {group}: {}..{} {:?}",
                span.start,
                span.end,
                span.extract(subject)
            ),
            None => println!("  {group}: -"),
        }
    }
}

fn to_dot(automaton: &impl Automaton, name: &str, attrs: &[Attr]) -> String {
    let graph_attrs = attrs
        .iter()
        .map(|(key, value)| format!("\t{key} = \"{}\";", value.escape_default()));
    let nodes = automaton.node_views().into_iter().map(|node| {
        let label = match node.marker {
            Some(marker) if marker.role == Role::CaptureStart => {
                format!("{}\\n({}", node.id, marker.group)
            }
            Some(marker) => format!("{}\\n{})", node.id, marker.group),
            None => node.id.to_string(),
        };
        let style = if node.is_final { ", style = bold" } else { "" };
        format!("\t{} [label = \"{label}\"{style}];", node.id)
    });
    let edges = automaton.coalesced_edges().into_iter().map(|edge| {
        let label = edge
            .ranges
            .iter()
            .map(|range| range.to_string().escape_default().to_string())
            .chain(edge.epsilon.then(|| "ε".to_string()))
            .join(",");
        format!("\t{} -> {} [label = \"{label}\"];", edge.from, edge.to)
    });

    format!(
        "digraph {name} {{\n\
            \trankdir = LR;\n\
            \tnode [shape = circle];\n\
            \tstart [shape = point];\n\
            \tstart -> {};\n\
         {}\n\
         }}",
        automaton.start_id(),
        graph_attrs.chain(nodes).chain(edges).join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_pairs_split_on_the_first_equals() {
        assert_eq!(
            parse_attr("label=a=b"),
            Ok(Some(("label".to_string(), "a=b".to_string())))
        );
        assert_eq!(parse_attr("=LR"), Ok(None));
        assert_eq!(parse_attr("rankdir="), Ok(None));
        assert!(parse_attr("rankdir").is_err());
    }

    #[test]
    fn attr_list_is_comma_separated() {
        let args = Args::try_parse_from([
            "regexp-nfa",
            "ab",
            "-g",
            "nfa",
            "--attr",
            "bgcolor=grey,=x,size=4",
        ])
        .unwrap();
        let attrs = args.attrs.into_iter().flatten().collect_vec();
        assert_eq!(
            attrs,
            vec![
                ("bgcolor".to_string(), "grey".to_string()),
                ("size".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn dot_carries_graph_attributes() {
        let re = Regex::new("a").unwrap();
        let attrs = vec![("label".to_string(), "a \"b\"".to_string())];
        let dot = to_dot(re.nfa(), "nfa", &attrs);
        assert!(dot.starts_with("digraph nfa {\n"));
        assert!(dot.contains("\tlabel = \"a \\\"b\\\"\";\n"));
        assert!(dot.ends_with('}'));
    }
}
