use std::path::{Path, PathBuf};

use csv::{Terminator, Writer, WriterBuilder};

use super::{EmitError, Emitter, Lifecycle};
use crate::persist::persist_artifact;

/// Header-less, two-column CSV: one `(label, content)` row per file.
pub struct CsvEmitter {
    writer: Writer<Vec<u8>>,
    state: Lifecycle,
    units: usize,
}

impl CsvEmitter {
    pub fn new() -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());
        Self {
            writer,
            state: Lifecycle::Created,
            units: 0,
        }
    }
}

impl Default for CsvEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for CsvEmitter {
    fn begin(&mut self) -> Result<(), EmitError> {
        self.state.begin("CsvEmitter");
        Ok(())
    }

    fn append(&mut self, label: &str, content: &str) -> Result<(), EmitError> {
        self.state.check_append("CsvEmitter");
        self.writer.write_record([label, content])?;
        self.units += 1;
        Ok(())
    }

    fn finish(&mut self, output: &Path) -> Result<PathBuf, EmitError> {
        self.state.finish("CsvEmitter");
        self.writer.flush()?;
        Ok(persist_artifact(output, self.writer.get_ref())?)
    }

    fn units(&self) -> usize {
        self.units
    }
}
