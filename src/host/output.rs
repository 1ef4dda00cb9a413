use std::cell::RefCell;
use std::rc::Rc;

/// Line-oriented output buffer shared between the host and `print`
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    lines: Rc<RefCell<Vec<String>>>,
    echo: bool,
}

impl OutputSink {
    /// Creates a silent, buffering sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that also writes every line to stdout
    pub fn echoing() -> Self {
        OutputSink {
            lines: Rc::default(),
            echo: true,
        }
    }

    /// Appends text; the two-character sequence `\n` starts a new line
    pub fn write(&self, text: &str) {
        let mut lines = self.lines.borrow_mut();
        for line in text.split("\\n") {
            if self.echo {
                println!("{}", line);
            }
            lines.push(line.to_string());
        }
    }

    /// Drops everything written so far
    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }

    /// Snapshot of the buffered lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Buffered lines joined with newlines
    pub fn contents(&self) -> String {
        self.lines.borrow().join("\n")
    }
}
