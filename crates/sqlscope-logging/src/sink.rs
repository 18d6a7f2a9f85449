//! Log sinks and destination resolution
//!
//! A [`Sink`] is anything that accepts whole log records and can be flushed.
//! Sinks synchronize internally, so a shared `Arc<dyn Sink>` can be written
//! from any thread. [`CompositeSink`] fans a record out to several sinks and
//! is what the logger writes to.

use parking_lot::Mutex;
use sqlscope_core::{ConfigurationError, RotationPolicy, STDERR, STDOUT};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

use crate::rotating::RotatingFile;

/// A writable, flushable log destination.
pub trait Sink: Send + Sync {
    /// Write one complete record.
    fn write_all(&self, buf: &[u8]) -> io::Result<()>;

    fn flush(&self) -> io::Result<()>;
}

/// Standard output or standard error.
///
/// Never rotated and never closed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl Sink for StdStream {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().write_all(buf),
            Self::Stderr => io::stderr().lock().write_all(buf),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().flush(),
            Self::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// In-memory sink that keeps everything written to it.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.buf.lock().extend_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Ordered fan-out over several sinks.
///
/// A write reaches every member before returning. A failing member does not
/// stop the others; the first error is returned once all were attempted.
#[derive(Clone, Default)]
pub struct CompositeSink {
    sinks: Arc<Vec<Arc<dyn Sink>>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            sinks: Arc::new(sinks),
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn for_each(&self, mut op: impl FnMut(&dyn Sink) -> io::Result<()>) -> io::Result<()> {
        let mut first_err = None;
        for sink in self.sinks.iter() {
            if let Err(e) = op(sink.as_ref()) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for CompositeSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Sink for CompositeSink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.for_each(|sink| sink.write_all(buf))
    }

    fn flush(&self) -> io::Result<()> {
        self.for_each(|sink| sink.flush())
    }
}

/// `io::Write` handle over a [`CompositeSink`], one per record.
pub struct CompositeWriter<'a> {
    sink: &'a CompositeSink,
}

impl Write for CompositeWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Sink::write_all(self.sink, buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Sink::write_all(self.sink, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Sink::flush(self.sink)
    }
}

impl<'a> MakeWriter<'a> for CompositeSink {
    type Writer = CompositeWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        CompositeWriter { sink: self }
    }
}

/// Maps destination names to sinks.
///
/// Every name other than `stdout`/`stderr` is a rotating file at the
/// policy's filename (or at the name itself when the policy has none). One
/// resolver hands out a single [`RotatingFile`] per path, so the output and
/// error composites share a file handle instead of racing two.
#[derive(Default)]
pub struct SinkResolver {
    files: HashMap<PathBuf, Arc<RotatingFile>>,
}

impl SinkResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every name and combine the results, preserving order.
    pub fn resolve<S: AsRef<str>>(
        &mut self,
        names: &[S],
        rotation: &RotationPolicy,
    ) -> Result<CompositeSink, ConfigurationError> {
        let sinks = names
            .iter()
            .map(|name| self.resolve_one(name.as_ref(), rotation))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompositeSink::new(sinks))
    }

    fn resolve_one(
        &mut self,
        name: &str,
        rotation: &RotationPolicy,
    ) -> Result<Arc<dyn Sink>, ConfigurationError> {
        match name {
            STDOUT => return Ok(Arc::new(StdStream::Stdout)),
            STDERR => return Ok(Arc::new(StdStream::Stderr)),
            _ => {}
        }

        let path = if rotation.filename.as_os_str().is_empty() {
            PathBuf::from(name)
        } else {
            rotation.filename.clone()
        };

        if let Some(file) = self.files.get(&path) {
            return Ok(file.clone());
        }

        let file = Arc::new(RotatingFile::open(&path, rotation).map_err(|source| {
            ConfigurationError::Sink {
                path: path.clone(),
                source,
            }
        })?);
        self.files.insert(path, file.clone());
        Ok(file)
    }
}
