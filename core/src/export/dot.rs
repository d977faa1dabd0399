//! Graphviz DOT export
//!
//! Renders a [`NetworkSnapshot`] as a `digraph` with one line per edge of
//! positive capacity, labelled `flow/capacity`:
//!
//! ```text
//! digraph FlowNetwork {
//!     0 -> 1 [label="3/4"];
//! }
//! ```
//!
//! File exports are all-or-nothing: the text is rendered in memory, written
//! to a uniquely named temporary file in the destination directory and
//! persisted over the destination.

use std::io::{self, Write};
use std::path::Path;
use log::{info, warn};
use tempfile::NamedTempFile;

use crate::algorithm::graph::max_flow::{EdmondsKarp, FlowNetwork};
use crate::algorithm::state::NetworkSnapshot;
use crate::algorithm::traits::{FlowError, FlowResult};

/// Renders `snapshot` in DOT syntax
pub fn render_dot(snapshot: &NetworkSnapshot) -> String {
    let mut out = String::with_capacity(24 + snapshot.name.len() + snapshot.edges.len() * 32);
    out.push_str(&format!("digraph {} {{\n", snapshot.name));
    for edge in &snapshot.edges {
        out.push_str(&format!(
            "    {} -> {} [label=\"{}/{}\"];\n",
            edge.from, edge.to, edge.flow, edge.capacity
        ));
    }
    out.push_str("}\n");
    out
}

impl FlowNetwork {
    /// DOT text for the current state of the network
    pub fn to_dot(&self, name: &str) -> FlowResult<String> {
        let snapshot = NetworkSnapshot::capture(self, name)?;
        Ok(render_dot(&snapshot))
    }

    /// Writes the DOT text to an arbitrary sink
    pub fn write_dot<W: Write>(&self, writer: &mut W, name: &str) -> FlowResult<()> {
        let text = self.to_dot(name)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Saves the DOT text to `path`.
    ///
    /// On failure no file is left at `path` by this call and any previous
    /// file there is untouched.
    pub fn save_dot<P: AsRef<Path>>(&self, path: P, name: &str) -> FlowResult<()> {
        let path = path.as_ref();
        let snapshot = NetworkSnapshot::capture(self, name)?;
        write_atomically(path, render_dot(&snapshot).as_bytes())?;

        info!("Saved {} edges to {}", snapshot.edges.len(), path.display());
        Ok(())
    }
}

impl EdmondsKarp {
    /// DOT text for `network` under the configured graph name
    pub fn to_dot(&self, network: &FlowNetwork) -> FlowResult<String> {
        network.to_dot(&self.config().graph_name)
    }

    /// Saves `network` to `path` under the configured graph name
    pub fn save_dot<P: AsRef<Path>>(&self, network: &FlowNetwork, path: P) -> FlowResult<()> {
        network.save_dot(path, &self.config().graph_name)
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> FlowResult<()> {
    let io_error = |source: io::Error| FlowError::Io {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory).map_err(io_error)?;
    let written = file
        .write_all(contents)
        .and_then(|()| file.as_file().sync_all());
    if let Err(source) = written {
        warn!("Export to {} failed while writing, discarding temporary file", path.display());
        return Err(io_error(source));
    }

    // A failed persist drops the temporary file, which removes it
    file.persist(path).map_err(|err| {
        warn!("Export to {} failed, discarding temporary file", path.display());
        io_error(err.error)
    })?;

    Ok(())
}
