// Output streams the host writes to

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};

/// Identity of an output stream. Two `OutStream` handles compare equal
/// only when they share the same underlying sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamKind {
    Stdout,
    Writer,
}

/// Shared, cloneable handle to a text sink.
#[derive(Clone)]
pub struct OutStream {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    kind: StreamKind,
}

/// In-memory sink whose contents can be read back.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.0.lock().map(|b| b.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::other("buffer lock poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl OutStream {
    /// The process's primary output.
    pub fn stdout() -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(io::stdout()))),
            kind: StreamKind::Stdout,
        }
    }

    /// Wrap an arbitrary writer.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            kind: StreamKind::Writer,
        }
    }

    /// An in-memory stream plus a handle for reading what was written.
    pub fn buffer() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (Self::from_writer(buffer.clone()), buffer)
    }

    pub fn id(&self) -> StreamId {
        StreamId(Arc::as_ptr(&self.sink) as *const () as usize)
    }

    pub fn is_stdout(&self) -> bool {
        self.kind == StreamKind::Stdout
    }

    pub fn is_terminal(&self) -> bool {
        self.is_stdout() && io::stdout().is_terminal()
    }

    /// Column count of the terminal behind this stream, if there is one.
    pub fn columns(&self) -> Option<usize> {
        if !self.is_terminal() {
            return None;
        }
        console::Term::stdout()
            .size_checked()
            .map(|(_rows, cols)| cols as usize)
    }

    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::other("output stream lock poisoned"))?;
        sink.write_all(text.as_bytes())?;
        sink.flush()
    }
}

impl fmt::Debug for OutStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutStream")
            .field("id", &self.id())
            .field("kind", &self.kind)
            .finish()
    }
}
