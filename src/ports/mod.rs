mod environment;
mod transport;
mod ui;

pub use environment::EnvProvider;
pub use transport::Transport;
pub use ui::Ui;
