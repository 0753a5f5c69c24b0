use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Line-oriented output shared by the console views
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
}

impl Console {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(io::stdout()), format)
    }

    pub fn new(out: Box<dyn Write + Send>, format: OutputFormat) -> Self {
        Self {
            out: Mutex::new(out),
            format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn line(&self, text: impl AsRef<str>) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{}", text.as_ref()).context("Failed to write output")?;
        out.flush().context("Failed to flush output")
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        self.line(text)
    }
}

/// In-memory sink for tests
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_text_and_json() {
        let buffer = SharedBuffer::default();
        let console = Console::new(Box::new(buffer.clone()), OutputFormat::Json);

        console.line("hello").unwrap();
        console.json(&serde_json::json!({ "a": 1 })).unwrap();

        let output = buffer.contents();
        assert!(output.starts_with("hello\n"));
        assert!(output.contains("\"a\": 1"));
        assert!(console.is_json());
    }
}
