use super::App;
use autotrans_core::clock::{Clock, SystemClock};
use autotrans_core::session::{Session, format_remaining};
use autotrans_core::settings::SettingsStore;

/// Records a fresh session for `channel_id`. A client started afterwards
/// resumes it until the window runs out.
pub fn enable(app: &App, channel_id: &str) {
    app.engine.start(channel_id);
    app.engine.shutdown();
    println!("Auto-translation enabled for channel {} (10:00)", channel_id);
}

pub fn disable(app: &App) {
    app.engine.stop();
    println!("Auto-translation disabled");
}

pub fn status(app: &App) {
    let Some((channel_id, started_at_ms)) = app.settings.get().persisted_session() else {
        println!("Auto-translation is off");
        return;
    };

    let session = Session::new(channel_id, started_at_ms);
    match session.remaining_at(SystemClock.now_ms()) {
        Some(remaining) => println!(
            "Auto-translating channel {} ({} left)",
            session.channel_id(),
            format_remaining(remaining)
        ),
        None => println!(
            "Auto-translation of channel {} has expired",
            session.channel_id()
        ),
    }
}
