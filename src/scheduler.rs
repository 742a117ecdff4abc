// file: src/scheduler.rs
// description: weekly trigger computation and the long-running schedule loop
// reference: https://docs.rs/chrono, https://docs.rs/tokio/latest/tokio/signal

use crate::config::ScheduleConfig;
use crate::pipeline::MirrorSync;
use chrono::{DateTime, Datelike, Days, Local, NaiveDateTime, TimeDelta, TimeZone, Utc, Weekday};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTrigger {
    pub weekday: Weekday,
    pub hour: u32,
}

impl Default for WeeklyTrigger {
    fn default() -> Self {
        Self {
            weekday: Weekday::Sun,
            hour: 0,
        }
    }
}

impl WeeklyTrigger {
    /// First instant strictly after `now` on the trigger's weekday and hour.
    ///
    /// A trigger time skipped by a DST transition fires at the first valid
    /// local instant after it.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let today = now.date_naive();
        let days_ahead = (7 + self.weekday.num_days_from_monday()
            - today.weekday().num_days_from_monday())
            % 7;

        for week in 0..3u64 {
            let Some(date) = today.checked_add_days(Days::new(u64::from(days_ahead) + 7 * week))
            else {
                break;
            };
            let Some(naive) = date.and_hms_opt(self.hour, 0, 0) else {
                break;
            };
            if let Some(candidate) = resolve_local(&tz, naive) {
                if candidate > *now {
                    return candidate;
                }
            }
        }

        now.clone() + TimeDelta::weeks(1)
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=2)
        .find_map(|hours| tz.from_local_datetime(&(naive + TimeDelta::hours(hours))).earliest())
}

impl From<&ScheduleConfig> for WeeklyTrigger {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            weekday: config.weekday,
            hour: config.hour,
        }
    }
}

pub struct Scheduler {
    trigger: WeeklyTrigger,
    utc: bool,
}

impl Scheduler {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            trigger: WeeklyTrigger::from(config),
            utc: config.utc,
        }
    }

    pub fn next_run(&self) -> DateTime<Utc> {
        if self.utc {
            self.trigger.next_after(&Utc::now())
        } else {
            self.trigger.next_after(&Local::now()).with_timezone(&Utc)
        }
    }

    /// Runs a pass at every trigger until Ctrl+C.
    ///
    /// A failed pass is logged and the loop waits for the next trigger.
    pub async fn run(&self, sync: &MirrorSync) {
        info!("Starting scheduler...");
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let next = self.next_run();
            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            info!(
                "Next mirror pass at {} (in {:.1}h)",
                next.to_rfc3339(),
                wait.as_secs_f64() / 3600.0
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                result = &mut shutdown => {
                    stopped(result);
                    return;
                }
            }

            tokio::select! {
                result = sync.run() => {
                    if let Err(e) = result {
                        error!("Scheduled mirror pass failed: {}", e);
                    }
                }
                result = &mut shutdown => {
                    warn!("Interrupted during mirror pass");
                    stopped(result);
                    return;
                }
            }
        }
    }
}

fn stopped(signal: std::io::Result<()>) {
    if let Err(e) = signal {
        warn!("Failed to listen for Ctrl+C: {}", e);
    }
    info!("Scheduler stopped.");
}
