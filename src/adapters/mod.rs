pub mod console_ui;
pub mod local_shell_transport;
pub mod process_env;

pub use console_ui::ConsoleUi;
pub use local_shell_transport::LocalShellTransport;
pub use process_env::ProcessEnv;
