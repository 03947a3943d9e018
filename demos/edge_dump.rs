//! Builds a k2-tree from an edge list and dumps it.
//!
//! Usage: `cargo run --example edge_dump -- [K2_EDGE_FILE]`
//!
//! The file holds one `row col` pair per line; without it a small sample graph
//! is used.

use anyhow::{bail, Context, Result};
use k2tree::{GhostToken, K2Tree};
use std::fs;

fn parse_edges(text: &str) -> Result<Vec<(usize, usize)>> {
    let mut edges = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(row), Some(col), None) = (fields.next(), fields.next(), fields.next()) else {
            bail!("line {}: expected `row col`", lineno + 1);
        };
        let row = row.parse().with_context(|| format!("line {}: bad row", lineno + 1))?;
        let col = col.parse().with_context(|| format!("line {}: bad column", lineno + 1))?;
        edges.push((row, col));
    }
    Ok(edges)
}

fn main() -> Result<()> {
    let edges = match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            parse_edges(&text)?
        }
        None => vec![(0, 1), (1, 3), (3, 0), (5, 6), (6, 2)],
    };
    let vertices = edges.iter().map(|&(r, c)| r.max(c) + 1).max().unwrap_or(0);

    GhostToken::new(|token| -> Result<()> {
        let tree = K2Tree::<2>::from_edges(&token, vertices, &edges)?;
        println!("height {}, size {}, {} edges", tree.height(), tree.size(), tree.edge_count());

        let mut it = tree.edges();
        println!("{it}");
        while !it.is_end() {
            println!("{}", it.current());
            it.advance()?;
        }
        println!("{it}");
        Ok(())
    })
}
