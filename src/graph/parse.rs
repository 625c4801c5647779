//! Reading topologies from their text description.
//!
//! The format is a stream of whitespace-separated tokens: the node count,
//! then one `from to medium bandwidth length` group per physical link.
//! A `#` starts a comment that runs to the end of the line.

use crate::error::{TopologyError, TopologyResult};
use crate::graph::medium::Medium;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const LINK_FIELDS: usize = 5;

struct Token<'a> {
    line: usize,
    text: &'a str,
}

impl Token<'_> {
    fn parse<T: FromStr>(&self, what: &str) -> TopologyResult<T> {
        self.text.parse().map_err(|_| TopologyError::MalformedInput {
            line: self.line,
            reason: format!("{what} '{}' is not a non-negative integer", self.text),
        })
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.lines()
        .enumerate()
        .flat_map(|(i, line)| {
            let content = line.split('#').next().unwrap_or_default();
            content
                .split_whitespace()
                .map(move |text| Token { line: i + 1, text })
        })
        .collect()
}

impl Topology {
    pub fn read<R: BufRead>(mut reader: R) -> TopologyResult<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        text.parse()
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> TopologyResult<Self> {
        let path = path.as_ref();
        let topology = Self::read(BufReader::new(File::open(path)?))?;
        info!(
            path = %path.display(),
            nodes = topology.node_count(),
            links = topology.link_count(),
            "loaded topology"
        );
        Ok(topology)
    }
}

impl FromStr for Topology {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s);
        let (header, fields) = tokens.split_first().ok_or(TopologyError::MalformedInput {
            line: 1,
            reason: "missing node count".to_string(),
        })?;
        let node_count: usize = header.parse("node count")?;
        if node_count >= NodeId::DETACHED.index() {
            return Err(TopologyError::MalformedInput {
                line: header.line,
                reason: format!("node count {node_count} is too large"),
            });
        }

        let trailing = fields.len() % LINK_FIELDS;
        if trailing != 0 {
            let first = &fields[fields.len() - trailing];
            return Err(TopologyError::MalformedInput {
                line: first.line,
                reason: format!(
                    "expected {LINK_FIELDS} fields per link, found {trailing} trailing"
                ),
            });
        }

        let mut topology =
            Topology::try_new(node_count).map_err(|e| TopologyError::MalformedInput {
                line: header.line,
                reason: format!("cannot hold {node_count} nodes: {e}"),
            })?;
        for group in fields.chunks(LINK_FIELDS) {
            let line = group[0].line;
            let from = NodeId(group[0].parse("source node")?);
            let to = NodeId(group[1].parse("target node")?);
            let medium = group[2]
                .text
                .parse::<Medium>()
                .map_err(|e| TopologyError::MalformedInput {
                    line,
                    reason: e.to_string(),
                })?;
            let bandwidth = group[3].parse("bandwidth")?;
            let length = group[4].parse("length")?;

            topology
                .connect(from, to, medium, bandwidth, length)
                .map_err(|e| TopologyError::MalformedInput {
                    line,
                    reason: e.to_string(),
                })?;
        }
        Ok(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{chain, link_tuples};
    use std::io::Cursor;

    #[test]
    fn test_parse_links() {
        let topology: Topology = "4\n\
            0 1 copper 10 230\n\
            1 2 copper 5 460\n\
            2 3 fiber 8 200\n"
            .parse()
            .unwrap();

        assert_eq!(4, topology.node_count());
        assert_eq!(3, topology.link_count());
        assert_eq!(link_tuples(&chain()), link_tuples(&topology));
    }

    #[test]
    fn test_parse_comments_and_free_layout() {
        let topology = Topology::read(Cursor::new(
            "# campus\n3 0 1 copper\n 4 10 # first\n1 2 optical 2 5",
        ))
        .unwrap();

        assert_eq!(2, topology.link_count());
        assert_eq!(Medium::Optical, topology.links(NodeId(2))[0].medium());
    }

    #[test]
    fn test_parse_node_count_only() {
        let topology: Topology = "5".parse().unwrap();
        assert_eq!(5, topology.node_count());
        assert_eq!(0, topology.link_count());
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", 1),
            ("x", 1),
            ("3\n0 1 copper 4", 2),
            ("3\n0 1 copper 4 10\n1 2", 3),
            ("3\n0 -1 copper 4 10", 2),
            ("3\n0 1 copper four 10", 2),
            ("3\n0 1 copper 4 10\n1 3 copper 4 10", 3),
            ("3\n0 1 wireless 4 10", 2),
            ("# header\n18446744073709551615", 2),
            ("\n18446744073709551614 0 1 copper 1 1", 2),
        ];

        for (input, expected_line) in cases {
            match input.parse::<Topology>() {
                Err(TopologyError::MalformedInput { line, .. }) => {
                    assert_eq!(expected_line, line, "input {input:?}")
                }
                other => panic!("input {input:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_display_parses_back() {
        let original = chain();
        let parsed: Topology = original.to_string().parse().unwrap();
        assert_eq!(link_tuples(&original), link_tuples(&parsed));
    }
}
