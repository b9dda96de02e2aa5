//! # EdgeList
//!
//! The EdgeList-Format consists of `header_lines` arbitrary lines, followed by lines `u v`
//! representing an undirected edge. Node ids are arbitrary non-negative integers; they are
//! relabelled to `0..n` in order of first appearance. Additional tokens on a line (e.g. edge
//! weights or timestamps) are ignored, as are empty lines and lines starting with the comment
//! identifier.

use std::io::{ErrorKind, Lines};

use fxhash::FxHashMap;

use super::*;
use crate::{Edge, Node, NumNodes, network::Network, ops::GraphFromScratch, repr::CsrGraph};

/// A GraphReader for the EdgeList-Format
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    /// Number of leading lines that are skipped unconditionally
    header_lines: usize,
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: String,
}

impl Default for EdgeListReader {
    /// No header, `#`-comments (the SNAP/KONECT convention)
    fn default() -> Self {
        Self {
            header_lines: 0,
            comment_identifier: "#".to_string(),
        }
    }
}

/// A graph read from an edge list together with the original id of every node
#[derive(Debug, Clone)]
pub struct LabelledGraph<G> {
    pub graph: G,
    pub labels: Vec<u64>,
}

impl EdgeListReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the number of header lines
    pub fn header_lines(mut self, lines: usize) -> EdgeListReader {
        self.header_lines = lines;
        self
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> EdgeListReader {
        self.comment_identifier = c.into();
        self
    }

    /// Reads a graph and the original id of every node
    pub fn try_read_labelled<G, R>(&self, reader: R) -> Result<LabelledGraph<G>>
    where
        G: GraphFromScratch,
        R: BufRead,
    {
        let mut edges_reader = EdgeListEdgesReader::try_new(reader, self)?;
        let mut edges = Vec::new();
        while let Some(edge) = edges_reader.try_next_edge()? {
            edges.push(edge);
        }

        let labels = edges_reader.into_labels();
        let graph = G::from_edges(labels.len() as NumNodes, edges);
        Ok(LabelledGraph { graph, labels })
    }

    /// Reads a graph and turns its largest connected component into a [`Network`]
    ///
    /// # Errors
    /// Fails with [`CoverError::Io`](crate::error::CoverError::Io) on malformed input and with
    /// [`CoverError::InvalidNetwork`](crate::error::CoverError::InvalidNetwork) if the edge
    /// list is empty.
    pub fn try_read_network<S, P>(&self, name: S, path: P) -> crate::error::Result<Network>
    where
        S: Into<String>,
        P: AsRef<Path>,
    {
        let graph: CsrGraph = self.try_read_graph_file(path)?;
        Network::from_largest_component(name, &graph)
    }
}

impl<G: GraphFromScratch> GraphReader<G> for EdgeListReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        Ok(self.try_read_labelled(reader)?.graph)
    }
}

/// Trait for creating graphs form an EdgeListReader.
/// Used as shorthand for default EdgeListReader settings
pub trait EdgeListRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_edge_list(BufReader::new(File::open(path)?))
    }
}

impl<G> EdgeListRead for G
where
    G: GraphFromScratch,
{
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self> {
        EdgeListReader::default().try_read_graph(reader)
    }
}

/// Real EdgeListReader that consumes the reader
struct EdgeListEdgesReader<'a, R> {
    /// Lines in the reader
    lines: Lines<R>,
    /// Comment identifier
    comment_identifier: &'a str,
    /// Dense id of every original id seen so far
    ids: FxHashMap<u64, Node>,
    /// Original id of every dense id
    labels: Vec<u64>,
}

impl<'a, R: BufRead> EdgeListEdgesReader<'a, R> {
    /// Creates a new EdgeListEdgesReader and skips the header lines
    fn try_new(reader: R, settings: &'a EdgeListReader) -> Result<Self> {
        let mut lines = reader.lines();
        for i in 0..settings.header_lines {
            raise_error_unless!(
                lines.next().transpose()?.is_some(),
                ErrorKind::UnexpectedEof,
                format!("Expected {} header lines, found {i}", settings.header_lines)
            );
        }

        Ok(Self {
            lines,
            comment_identifier: &settings.comment_identifier,
            ids: FxHashMap::default(),
            labels: Vec::new(),
        })
    }

    /// Returns the next non-comment-line if it exists or propagate an error
    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            match self.lines.next() {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line))
                    if line.trim().is_empty()
                        || (!self.comment_identifier.is_empty()
                            && line.starts_with(self.comment_identifier)) =>
                {
                    continue;
                }
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    /// Tries to parse an edge from the next non-comment-line
    fn try_next_edge(&mut self) -> Result<Option<Edge>> {
        let Some(line) = self.next_non_comment_line()? else {
            return Ok(None);
        };

        let mut parts = line.split_whitespace();
        let from: u64 = parse_next_value!(parts, "Source node");
        let dest: u64 = parse_next_value!(parts, "Target node");

        Ok(Some(Edge(self.dense_id(from)?, self.dense_id(dest)?)))
    }

    fn dense_id(&mut self, label: u64) -> Result<Node> {
        if let Some(&id) = self.ids.get(&label) {
            return Ok(id);
        }

        let id = self.labels.len() as Node;
        raise_error_unless!(
            id < crate::INVALID_NODE,
            ErrorKind::InvalidData,
            "Too many distinct nodes"
        );
        self.ids.insert(label, id);
        self.labels.push(label);
        Ok(id)
    }

    fn into_labels(self) -> Vec<u64> {
        self.labels
    }
}
