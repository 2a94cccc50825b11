//! Shared utilities for integration tests.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A configuration with every required section and file logging into `log_dir`.
#[allow(dead_code)]
pub fn full_config(log_dir: &Path) -> String {
    format!(
        r#"
app:
  name: "Text Morph"
  version: "2.1.0"
api:
  huggingface:
    model_name: "facebook/bart-large-cnn"
    timeout: 45
  groq:
    model_name: "llama-3.1-8b-instant"
summarization:
  abstractive:
    short:
      max_length: 60
      min_length: 20
paraphrasing:
  temperature: 0.7
limits:
  max_input_length: 5000
  min_input_length: 50
features:
  export: true
error_messages:
  text_too_long: "Text too long: {{current}} > {{max}}"
logging:
  level: "DEBUG"
  format: "%(levelname)s - %(message)s"
  file:
    enabled: true
    path: "{}"
    filename: "app.log"
    max_bytes: 10485760
    backup_count: 3
  console:
    enabled: false
    colored: false
"#,
        log_dir.display()
    )
}

/// Write `content` to `name` inside `dir`, returning the path.
pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// In-memory writer usable as a console sink.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
