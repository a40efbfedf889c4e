mod fake_transport;
mod recording_ui;
mod static_env;

pub use fake_transport::FakeTransport;
pub use recording_ui::RecordingUi;
pub use static_env::StaticEnv;
