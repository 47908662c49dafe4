use std::path::Path;
use std::time::Duration;

use crate::error::Result;

pub mod noop;
pub mod process;

pub use noop::NoopViewer;
pub use process::ProcessViewer;

pub trait TextViewer {
    fn open(&mut self, path: &Path) -> Result<()>;
}

/// Picks the viewer once at startup from the CLI toggles.
pub fn select(
    enabled: bool,
    command: Option<&str>,
    grace: Duration,
) -> Result<Box<dyn TextViewer>> {
    if !enabled {
        return Ok(Box::new(NoopViewer));
    }
    let viewer = match command {
        Some(line) => ProcessViewer::from_command_line(line, grace)?,
        None => ProcessViewer::platform_default(grace),
    };
    Ok(Box::new(viewer))
}

impl<V: TextViewer + ?Sized> TextViewer for Box<V> {
    fn open(&mut self, path: &Path) -> Result<()> {
        (**self).open(path)
    }
}
