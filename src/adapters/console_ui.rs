use crate::ports::Ui;

/// Progress output on the terminal: progress to stdout, failures to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for ConsoleUi {
    fn say(&mut self, message: &str) {
        println!("==> {}", message);
    }

    fn message(&mut self, message: &str) {
        println!("    {}", message);
    }

    fn error(&mut self, message: &str) {
        eprintln!("[ERROR] {}", message);
    }
}
