/// Sink for operator-facing progress output.
pub trait Ui {
    /// Pipeline-level progress.
    fn say(&mut self, message: &str);

    /// Block detail and streamed remote output.
    fn message(&mut self, message: &str);

    fn error(&mut self, message: &str);
}
