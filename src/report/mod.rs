// Report module - the reporter plugin host and the pieces it is built from

pub mod decorator;
pub mod error;
pub mod host;
pub mod markup;
pub mod stream;
pub mod unique_stream;

pub use decorator::{ErrorDecorator, KNOWN_TAGS, Palette, PaletteStyles};
pub use error::HostError;
pub use host::{HostContext, HostOptions, ReporterPluginHost, Symbols};
pub use markup::MarkupError;
pub use stream::{OutStream, SharedBuffer, StreamId};
pub use unique_stream::{FirstWriterController, HostId, StreamController};

/// An error object that can render itself for a reporter.
///
/// Implementations may only emit the tags listed in [`KNOWN_TAGS`]; the
/// decorator leaves anything else undecorated.
pub trait RenderableError: Send + Sync {
    /// Render the error through `decorator`, aiming to fit `max_width` columns.
    fn format_message(&self, decorator: &ErrorDecorator, max_width: usize) -> String;
}

/// Plain text renders as itself.
impl RenderableError for String {
    fn format_message(&self, _decorator: &ErrorDecorator, _max_width: usize) -> String {
        self.clone()
    }
}
