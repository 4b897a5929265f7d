use crate::models::{HeatDocument, HeatSample};
use chrono::{Datelike, Duration, Local, NaiveDate};
use rand::Rng;

pub const DAYS_BEFORE_TODAY: i64 = 365;
pub const MAX_VALUE: f64 = 50.0;

pub fn generate() -> Vec<HeatSample> {
    generate_at(Local::now().date_naive(), &mut rand::thread_rng())
}

/// One sample per day from `today - 365 days` through `today`, oldest first.
pub fn generate_at<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Vec<HeatSample> {
    let start = today - Duration::days(DAYS_BEFORE_TODAY);
    start
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| {
            let iso = date_key(date);
            HeatSample {
                x: iso.clone(),
                y: iso_weekday(date),
                d: iso,
                v: rng.gen_range(0.0..MAX_VALUE),
            }
        })
        .collect()
}

/// Monday = "1" through Sunday = "7".
pub fn iso_weekday(date: NaiveDate) -> String {
    let native = date.weekday().num_days_from_sunday();
    (((native + 6) % 7) + 1).to_string()
}

pub fn document(samples: Vec<HeatSample>) -> HeatDocument {
    HeatDocument { heat: samples }
}

pub fn to_pretty_json(doc: &HeatDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
