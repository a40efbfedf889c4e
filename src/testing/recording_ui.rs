use crate::ports::Ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Say,
    Message,
    Error,
}

/// Ui that keeps every line for later assertions.
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub lines: Vec<(Level, String)>,
}

impl RecordingUi {
    fn at(&self, level: Level) -> Vec<String> {
        self.lines.iter().filter(|(l, _)| *l == level).map(|(_, text)| text.clone()).collect()
    }

    pub fn says(&self) -> Vec<String> {
        self.at(Level::Say)
    }

    pub fn messages(&self) -> Vec<String> {
        self.at(Level::Message)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(Level::Error)
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.iter().any(|(_, text)| text.contains(fragment))
    }
}

impl Ui for RecordingUi {
    fn say(&mut self, message: &str) {
        self.lines.push((Level::Say, message.to_string()));
    }

    fn message(&mut self, message: &str) {
        self.lines.push((Level::Message, message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.lines.push((Level::Error, message.to_string()));
    }
}
