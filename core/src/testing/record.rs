use std::io::Write;

use super::{
    error::{Error, Result},
    result::Outcome,
};

pub const RECORD_HEADER: &str = "file,status,time,return,stderr";

/// Writes one comma separated line per outcome, flushing after every line.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    sink: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn header(&mut self) -> Result<()> {
        self.line(RECORD_HEADER)
    }

    pub fn emit(&mut self, outcome: &Outcome) -> Result<()> {
        self.line(&format_record(outcome))
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn line(&mut self, s: &str) -> Result<()> {
        writeln!(self.sink, "{}", s)
            .and_then(|()| self.sink.flush())
            .map_err(Error::EmitRecord)
    }
}

pub fn format_record(o: &Outcome) -> String {
    let time = o
        .elapsed
        .map(|t| format!("{:.3}", t.as_secs_f64()))
        .unwrap_or_default();
    let code = o.code.map(|c| c.to_string()).unwrap_or_default();
    format!(
        "{},{},{},{},{}",
        o.filename,
        o.status,
        time,
        code,
        o.escaped_diagnostic()
    )
}
