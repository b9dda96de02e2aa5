/*!
# IO

Utilities for reading networks and for writing and reading benchmark logs.

## Input Formats

- **EdgeList**: one edge `u v` per line, preceded by a configurable number of header lines.
  Node ids are arbitrary non-negative integers and are relabelled to `0..n` in order of
  first appearance (see [`EdgeListReader`]).

## Log Files

Benchmark results are stored as flat, line-oriented text (see [`logfile`] for the format).
[`LogWriter`] and [`read_log`] are exact inverses of each other, as are
[`BenchmarkWriter`] and [`read_benchmark_log`].

## Traits

[`GraphReader`] is implemented by readers for a specific format and provides a convenience
wrapper to read directly from files.
*/

pub mod edge_list;
pub mod logfile;

use std::{
    fs::File,
    io::{BufRead, BufReader, Result},
    path::Path,
};

pub use edge_list::*;
pub use logfile::*;

/// Trait for types that can read graphs in a specific format.
///
/// This trait provides both a low-level method to read from any
/// [`BufRead`] instance and a convenience wrapper to read directly
/// from files.
pub trait GraphReader<G> {
    /// Reads a graph from the given reader according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid representation
    /// of a graph in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Reads a graph from a file according to the settings in `self`.
    ///
    /// Internally wraps the file in a buffered reader.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if its contents
    /// are not a valid representation of a graph in the expected format.
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Shorthand for creating a new IO-error
macro_rules! io_error {
    ($kind: expr, $info: expr) => {
        std::io::Error::new($kind, $info)
    };
}

/// Shorthand for returning `Err(std::io::Error)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(io_error!($kind, $info));
        }
    };
}

/// Tries to parse the next value in an iterator and returns early if it fails
macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next().ok_or_else(|| {
            io_error!(
                ErrorKind::InvalidData,
                format!("Premature end of line when parsing {}.", $name)
            )
        })?;

        next.parse().map_err(|_| {
            io_error!(
                ErrorKind::InvalidData,
                format!("Invalid value {next:?} found. Cannot parse {}.", $name)
            )
        })?
    }};
}

use io_error;
use parse_next_value;
use raise_error_unless;
