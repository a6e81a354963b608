use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashSet;
use tracing::debug;

/// Daily send times (`HH:mm`). Each time fires at most once per calendar day.
#[derive(Debug, Default)]
pub struct ReportSchedule {
    day: Option<NaiveDate>,
    sent_today: HashSet<String>,
}

fn parse_send_time(s: &str) -> Option<(u32, u32)> {
    let (hour, minute) = s.trim().split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

impl ReportSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send times matching `now` to the minute that have not fired yet today.
    /// The returned times are marked as sent.
    pub fn due<S: AsRef<str>>(&mut self, send_times: &[S], now: NaiveDateTime) -> Vec<String> {
        let today = now.date();
        if self.day != Some(today) {
            debug!("New day {}, resetting sent report times", today);
            self.day = Some(today);
            self.sent_today.clear();
        }

        let mut due = Vec::new();
        for send_time in send_times.iter().map(|time| time.as_ref()) {
            if self.sent_today.contains(send_time) {
                continue;
            }
            if parse_send_time(send_time) == Some((now.hour(), now.minute())) {
                self.sent_today.insert(send_time.to_string());
                due.push(send_time.to_string());
            }
        }
        due
    }
}
