use indicatif::{ProgressBar, ProgressStyle};
use podsplit::{Event, EventSink, Level};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Event sink for the terminal.
///
/// Every event goes to tracing at its own level. While files are being
/// moved, an indicatif bar tracks progress and log lines are printed around it.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, total: u64) {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Moving [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
        ) {
            pb.set_style(
                style
                    .progress_chars("━╸─")
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(80));

        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn advance(&self) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn log(&self, event: &Event) {
        let guard = match self.bar.lock() {
            Ok(guard) => guard,
            Err(_) => return log_event(event),
        };
        match guard.as_ref() {
            Some(pb) => pb.suspend(|| log_event(event)),
            None => log_event(event),
        }
    }
}

impl EventSink for CliReporter {
    fn emit(&self, event: Event) {
        match &event {
            Event::DistributionStarted { files, .. } => {
                self.log(&event);
                self.start_bar(*files as u64);
                return;
            }
            Event::FileMoved { .. } | Event::MoveFailed { .. } => self.advance(),
            Event::DistributionCompleted { .. } => self.finish_bar(),
            _ => {}
        }
        self.log(&event);
    }
}

fn log_event(event: &Event) {
    match event.level() {
        Level::Debug => debug!("{}", event),
        Level::Info => info!("{}", event),
        Level::Warning => warn!("{}", event),
        Level::Error => error!("{}", event),
    }
}
