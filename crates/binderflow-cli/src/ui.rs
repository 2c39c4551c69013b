use binderflow::engine::progress::{Progress, ProgressCallback};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tracing::warn;

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    Log(String),
}

/// Renders pipeline progress on stderr, one spinner per stage and a bar for
/// per-design work.
pub struct UiManager {
    mp: Arc<MultiProgress>,
    state: StageState,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
    _sentinel_bar: ProgressBar,
}

#[derive(Default)]
struct StageState {
    active_bar: Option<ProgressBar>,
    stage_name: String,
    started_at: Option<Instant>,
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(256);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let mp = Arc::new(MultiProgress::new());
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        let _sentinel_bar = mp.add(ProgressBar::hidden());
        let manager = Self {
            mp,
            state: StageState::default(),
            event_receiver,
            shutdown_receiver,
            _sentinel_bar,
        };

        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.event_receiver.recv() => {
                    self.handle_event(event);
                }
                result = self.shutdown_receiver.changed() => {
                    if result.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }
        // Drain whatever the pipeline reported right before shutdown.
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
        if let Some(bar) = self.state.active_bar.take() {
            bar.finish_and_clear();
        }
        self._sentinel_bar.finish_and_clear();
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(msg) => {
                self.mp.println(msg).ok();
            }
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                if let Some(bar) = self.state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let pb = self.mp.add(ProgressBar::new_spinner());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb.set_style(Self::spinner_style());
                pb.set_message(name.to_string());

                self.state.active_bar = Some(pb);
                self.state.stage_name = name.to_string();
                self.state.started_at = Some(Instant::now());
            }
            Progress::PhaseFinish => {
                if let Some(bar) = self.state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let elapsed = self
                    .state
                    .started_at
                    .take()
                    .map(|t| t.elapsed())
                    .unwrap_or_default();
                self.mp
                    .println(format!(
                        "✓ {} ({})",
                        self.state.stage_name,
                        format_elapsed(elapsed)
                    ))
                    .ok();

                self.state.stage_name.clear();
            }
            Progress::TaskStart { total } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.disable_steady_tick();
                    bar.set_style(Self::bar_style());
                    bar.set_length(total);
                    bar.set_position(0);
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.finish();
                }
            }
            Progress::StatusUpdate { text } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.set_message(format!("{}: {}", self.state.stage_name, text));
                }
            }
            Progress::Message(msg) => {
                self.mp.println(format!("  {}", msg)).ok();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .expect("Invalid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<40} [{bar:40.cyan/blue}] {pos}/{len} [{elapsed}]")
            .expect("Invalid template")
            .progress_chars("━╸ ")
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}

#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress: Progress| {
            if let Err(e) = sender.try_send(UiEvent::Progress(progress)) {
                warn!("Failed to send progress update to UI channel: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_manager() -> UiManager {
        let (manager, _, _) = UiManager::new();
        manager.mp.set_draw_target(ProgressDrawTarget::hidden());
        manager
    }

    fn start(manager: &mut UiManager, name: &'static str) {
        manager.handle_event(UiEvent::Progress(Progress::PhaseStart { name }));
    }

    #[test]
    fn phase_start_creates_spinner_with_stage_name() {
        let mut manager = setup_manager();
        assert!(manager.state.active_bar.is_none());

        start(&mut manager, "Sequence Design");

        let bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(bar.message(), "Sequence Design");
        assert_eq!(manager.state.stage_name, "Sequence Design");
        assert!(manager.state.started_at.is_some());
    }

    #[test]
    fn phase_start_replaces_previous_stage() {
        let mut manager = setup_manager();
        start(&mut manager, "Backbone Generation");
        start(&mut manager, "Sequence Design");

        let bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(bar.message(), "Sequence Design");
    }

    #[test]
    fn phase_finish_clears_stage_state() {
        let mut manager = setup_manager();
        start(&mut manager, "Structure Prediction");

        manager.handle_event(UiEvent::Progress(Progress::PhaseFinish));

        assert!(manager.state.active_bar.is_none());
        assert!(manager.state.stage_name.is_empty());
        assert!(manager.state.started_at.is_none());
    }

    #[test]
    fn scoring_tasks_drive_the_bar() {
        let mut manager = setup_manager();
        start(&mut manager, "Interface Scoring");

        manager.handle_event(UiEvent::Progress(Progress::TaskStart { total: 8 }));
        manager.handle_event(UiEvent::Progress(Progress::TaskIncrement { amount: 3 }));

        let bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(bar.length(), Some(8));
        assert_eq!(bar.position(), 3);

        manager.handle_event(UiEvent::Progress(Progress::TaskFinish));
        assert!(manager.state.active_bar.as_ref().unwrap().is_finished());
    }

    #[test]
    fn status_update_is_appended_to_stage_name() {
        let mut manager = setup_manager();
        start(&mut manager, "Interface Scoring");

        manager.handle_event(UiEvent::Progress(Progress::StatusUpdate {
            text: "Scoring design_3".to_string(),
        }));

        let bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(bar.message(), "Interface Scoring: Scoring design_3");
    }

    #[test]
    fn events_without_active_stage_are_ignored() {
        let mut manager = setup_manager();
        manager.handle_event(UiEvent::Progress(Progress::TaskIncrement { amount: 1 }));
        manager.handle_event(UiEvent::Progress(Progress::Message("note".to_string())));
        manager.handle_event(UiEvent::Log("log line".to_string()));
        assert!(manager.state.active_bar.is_none());
    }

    #[test]
    fn elapsed_time_is_human_readable() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2m 05s");
    }

    #[tokio::test]
    async fn progress_handler_forwards_events() {
        let (sender, mut receiver) = mpsc::channel(1);
        let callback = CliProgressHandler::new(sender).get_callback();

        callback(Progress::PhaseStart { name: "Filtering" });

        match receiver.recv().await.unwrap() {
            UiEvent::Progress(Progress::PhaseStart { name }) => assert_eq!(name, "Filtering"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn manager_stops_on_shutdown_signal() {
        let (manager, sender, shutdown) = UiManager::new();
        manager.mp.set_draw_target(ProgressDrawTarget::hidden());
        let handle = tokio::spawn(manager.run());

        sender
            .send(UiEvent::Progress(Progress::PhaseStart { name: "Backbone Generation" }))
            .await
            .unwrap();
        shutdown.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
