//! Slot availability for a single court and day.
//!
//! The pipeline is: resolve the weekday's operating window, generate fixed
//! width slot starts inside it, drop slots overlapped by ACTIVE reservations,
//! then answer whether a slot can host a booking of N consecutive slots.
//! Everything here is pure and recomputed per request.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingWindow {
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

impl OperatingWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    fn hours(open: u32, close: u32) -> Self {
        Self {
            open: NaiveTime::from_hms_opt(open, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(close, 0, 0).unwrap_or_default(),
        }
    }
}

/// Weekly opening hours. Every weekday has an entry; `None` marks the day as
/// closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingCalendar {
    #[serde(deserialize_with = "Option::deserialize")]
    pub monday: Option<OperatingWindow>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub tuesday: Option<OperatingWindow>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub wednesday: Option<OperatingWindow>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub thursday: Option<OperatingWindow>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub friday: Option<OperatingWindow>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub saturday: Option<OperatingWindow>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub sunday: Option<OperatingWindow>,
}

impl Default for OperatingCalendar {
    fn default() -> Self {
        let weekday = Some(OperatingWindow::hours(7, 21));
        Self {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: weekday,
            saturday: Some(OperatingWindow::hours(9, 14)),
            sunday: Some(OperatingWindow::hours(9, 12)),
        }
    }
}

impl OperatingCalendar {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let calendar: OperatingCalendar = serde_json::from_str(raw)
            .map_err(|e| format!("invalid operating hours: {}", e))?;
        calendar.validate()?;
        Ok(calendar)
    }

    pub fn validate(&self) -> Result<(), String> {
        for day in ALL_WEEKDAYS {
            if let Some(window) = self.for_weekday(day)
                && window.close <= window.open {
                return Err(format!("{}: close must be after open", day));
            }
        }
        Ok(())
    }

    pub fn for_weekday(&self, day: Weekday) -> Option<OperatingWindow> {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn window_for(&self, date: NaiveDate) -> Option<OperatingWindow> {
        self.for_weekday(date.weekday())
    }

    pub fn is_operating_day(&self, date: NaiveDate) -> bool {
        self.window_for(date).is_some()
    }
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu,
    Weekday::Fri, Weekday::Sat, Weekday::Sun,
];

/// Slot starts in `[open, close)` spaced by `granularity`.
pub fn generate_time_slots(window: OperatingWindow, granularity: Duration) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    if granularity <= Duration::zero() {
        return slots;
    }

    let mut cursor = window.open;
    while cursor < window.close {
        slots.push(cursor);
        let (next, wrapped) = cursor.overflowing_add_signed(granularity);
        if wrapped != 0 {
            break;
        }
        cursor = next;
    }
    slots
}

/// Removes every slot whose `[slot, slot + granularity)` intersects one of
/// the `(start, end)` reservation intervals. Intervals that miss the day's
/// slots or are empty are skipped.
pub fn available_slots(
    slots: &[NaiveTime],
    granularity: Duration,
    reservations: &[(NaiveTime, NaiveTime)],
) -> Vec<NaiveTime> {
    let mut occupied = vec![false; slots.len()];

    for &(start, end) in reservations {
        if end <= start {
            continue;
        }
        for (idx, &slot) in slots.iter().enumerate() {
            let (slot_end, wrapped) = slot.overflowing_add_signed(granularity);
            let slot_end_past_start = wrapped != 0 || slot_end > start;
            if slot < end && slot_end_past_start {
                occupied[idx] = true;
            }
        }
    }

    slots.iter()
        .zip(occupied)
        .filter(|(_, taken)| !taken)
        .map(|(slot, _)| *slot)
        .collect()
}

/// True when `slot` and the `duration_slots - 1` slots after it all exist in
/// `slots` and are all in `available`.
pub fn can_select_slot(
    slot: NaiveTime,
    duration_slots: u32,
    slots: &[NaiveTime],
    available: &[NaiveTime],
) -> bool {
    if duration_slots == 0 {
        return false;
    }
    let Some(start_idx) = slots.iter().position(|s| *s == slot) else {
        return false;
    };

    (0..duration_slots as usize).all(|offset| {
        slots.get(start_idx + offset)
            .is_some_and(|candidate| available.contains(candidate))
    })
}

#[derive(Debug, Clone)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub window: Option<OperatingWindow>,
    pub granularity: Duration,
    pub slots: Vec<NaiveTime>,
    pub available: Vec<NaiveTime>,
}

impl DayAvailability {
    pub fn is_operating(&self) -> bool {
        self.window.is_some()
    }

    pub fn is_available(&self, slot: NaiveTime) -> bool {
        self.available.contains(&slot)
    }

    pub fn is_selectable(&self, slot: NaiveTime, duration_slots: u32) -> bool {
        can_select_slot(slot, duration_slots, &self.slots, &self.available)
    }

    /// End of a booking of `duration_slots` starting at `slot`.
    pub fn end_of(&self, slot: NaiveTime, duration_slots: u32) -> Option<NaiveTime> {
        let span = self.granularity * duration_slots as i32;
        let (end, wrapped) = slot.overflowing_add_signed(span);
        (wrapped == 0).then_some(end)
    }
}

pub fn compute_day_availability(
    calendar: &OperatingCalendar,
    date: NaiveDate,
    granularity: Duration,
    reservations: &[(NaiveTime, NaiveTime)],
) -> DayAvailability {
    let window = calendar.window_for(date);
    let slots = window
        .map(|w| generate_time_slots(w, granularity))
        .unwrap_or_default();
    let available = available_slots(&slots, granularity, reservations);

    DayAvailability { date, window, granularity, slots, available }
}

pub fn format_slot(slot: NaiveTime) -> String {
    slot.format("%H:%M").to_string()
}

pub fn parse_slot(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_slot(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("expected HH:MM, got {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(raw: &str) -> NaiveTime {
        parse_slot(raw).unwrap()
    }

    fn labels(slots: &[NaiveTime]) -> Vec<String> {
        slots.iter().map(|s| format_slot(*s)).collect()
    }

    fn weekday_window() -> OperatingWindow {
        OperatingWindow::new(t("07:00"), t("21:00"))
    }

    #[test]
    fn default_calendar_opens_every_day() {
        let calendar = OperatingCalendar::default();
        // 2026-10-19 is a Monday
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        for offset in 0..7 {
            let date = monday + Duration::days(offset);
            assert!(calendar.is_operating_day(date), "{} should be open", date);
        }

        assert_eq!(calendar.window_for(monday), Some(weekday_window()));
        assert_eq!(
            calendar.window_for(monday + Duration::days(5)),
            Some(OperatingWindow::new(t("09:00"), t("14:00")))
        );
        assert_eq!(
            calendar.window_for(monday + Duration::days(6)),
            Some(OperatingWindow::new(t("09:00"), t("12:00")))
        );
    }

    #[test]
    fn closed_weekday_has_no_slots() {
        let calendar = OperatingCalendar { sunday: None, ..OperatingCalendar::default() };
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();

        assert!(!calendar.is_operating_day(sunday));
        let day = compute_day_availability(&calendar, sunday, Duration::minutes(60), &[]);
        assert!(!day.is_operating());
        assert!(day.slots.is_empty());
        assert!(!day.is_selectable(t("09:00"), 1));
    }

    #[test]
    fn calendar_json_uses_hh_mm_and_null_for_closed() {
        let raw = r#"{
            "monday": {"open": "08:00", "close": "20:00"},
            "tuesday": {"open": "08:00", "close": "20:00"},
            "wednesday": {"open": "08:00", "close": "20:00"},
            "thursday": {"open": "08:00", "close": "20:00"},
            "friday": {"open": "08:00", "close": "22:00"},
            "saturday": {"open": "10:00", "close": "14:00"},
            "sunday": null
        }"#;
        let calendar = OperatingCalendar::from_json(raw).unwrap();
        assert_eq!(calendar.friday, Some(OperatingWindow::new(t("08:00"), t("22:00"))));
        assert_eq!(calendar.sunday, None);

        let inverted = raw.replace(r#""open": "10:00", "close": "14:00""#, r#""open": "14:00", "close": "10:00""#);
        assert!(OperatingCalendar::from_json(&inverted).is_err());

        let missing_day = r#"{"monday": null}"#;
        assert!(OperatingCalendar::from_json(missing_day).is_err());
    }

    #[test]
    fn weekday_window_yields_fourteen_hourly_slots() {
        let slots = generate_time_slots(weekday_window(), Duration::minutes(60));
        assert_eq!(slots.len(), 14);
        assert_eq!(labels(&slots).first().map(String::as_str), Some("07:00"));
        assert_eq!(labels(&slots).last().map(String::as_str), Some("20:00"));
    }

    #[test]
    fn non_positive_granularity_yields_nothing() {
        assert!(generate_time_slots(weekday_window(), Duration::zero()).is_empty());
        assert!(generate_time_slots(weekday_window(), Duration::minutes(-30)).is_empty());
    }

    #[test]
    fn late_window_does_not_wrap_past_midnight() {
        let window = OperatingWindow::new(t("22:00"), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        let slots = generate_time_slots(window, Duration::minutes(60));
        assert_eq!(labels(&slots), vec!["22:00", "23:00"]);
    }

    #[test]
    fn reservation_removes_the_slots_it_covers() {
        let granularity = Duration::minutes(60);
        let slots = generate_time_slots(weekday_window(), granularity);
        let free = available_slots(&slots, granularity, &[(t("10:00"), t("12:00"))]);

        assert_eq!(free.len(), 12);
        assert!(!free.contains(&t("10:00")));
        assert!(!free.contains(&t("11:00")));
        assert!(free.contains(&t("09:00")));
        assert!(free.contains(&t("12:00")));
    }

    #[test]
    fn reservation_ending_at_close_blocks_last_slot() {
        let granularity = Duration::minutes(60);
        let slots = generate_time_slots(weekday_window(), granularity);
        let free = available_slots(&slots, granularity, &[(t("20:00"), t("21:00"))]);
        assert!(!free.contains(&t("20:00")));
        assert!(free.contains(&t("19:00")));
    }

    #[test]
    fn reservations_outside_the_day_are_ignored() {
        let granularity = Duration::minutes(60);
        let slots = generate_time_slots(OperatingWindow::new(t("09:00"), t("12:00")), granularity);
        let free = available_slots(
            &slots,
            granularity,
            &[(t("13:00"), t("15:00")), (t("07:00"), t("08:00")), (t("10:00"), t("10:00"))],
        );
        assert_eq!(free, slots);
    }

    #[test]
    fn two_hour_booking_needs_two_free_slots() {
        let granularity = Duration::minutes(60);
        let slots = generate_time_slots(weekday_window(), granularity);
        let free = available_slots(&slots, granularity, &[(t("10:00"), t("12:00"))]);

        assert!(can_select_slot(t("08:00"), 2, &slots, &free));
        assert!(!can_select_slot(t("09:00"), 2, &slots, &free));
        assert!(can_select_slot(t("09:00"), 1, &slots, &free));
        assert!(!can_select_slot(t("10:00"), 1, &slots, &free));
        assert!(can_select_slot(t("12:00"), 2, &slots, &free));
    }

    #[test]
    fn last_slot_is_never_two_hour_selectable() {
        let granularity = Duration::minutes(60);
        let slots = generate_time_slots(weekday_window(), granularity);
        let free = available_slots(&slots, granularity, &[]);

        assert!(can_select_slot(t("20:00"), 1, &slots, &free));
        assert!(!can_select_slot(t("20:00"), 2, &slots, &free));
    }

    #[test]
    fn off_grid_and_zero_duration_are_not_selectable() {
        let granularity = Duration::minutes(60);
        let slots = generate_time_slots(weekday_window(), granularity);
        let free = available_slots(&slots, granularity, &[]);

        assert!(!can_select_slot(t("10:30"), 1, &slots, &free));
        assert!(!can_select_slot(t("06:00"), 1, &slots, &free));
        assert!(!can_select_slot(t("10:00"), 0, &slots, &free));
    }

    #[test]
    fn day_availability_reports_booking_end() {
        let calendar = OperatingCalendar::default();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let day = compute_day_availability(&calendar, monday, Duration::minutes(60), &[]);

        assert!(day.is_operating());
        assert_eq!(day.end_of(t("19:00"), 2), Some(t("21:00")));
        assert_eq!(day.end_of(NaiveTime::from_hms_opt(23, 0, 0).unwrap(), 2), None);
    }

    proptest! {
        #[test]
        fn slots_are_evenly_spaced_inside_window(
            open_min in 0u32..(20 * 60),
            length_min in 1u32..(4 * 60),
            step in 5i64..180,
        ) {
            let open = NaiveTime::from_num_seconds_from_midnight_opt(open_min * 60, 0).unwrap();
            let close = NaiveTime::from_num_seconds_from_midnight_opt((open_min + length_min) * 60, 0).unwrap();
            let granularity = Duration::minutes(step);
            let slots = generate_time_slots(OperatingWindow::new(open, close), granularity);

            prop_assert_eq!(slots.first().copied(), Some(open));
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], granularity);
            }
            for slot in &slots {
                prop_assert!(*slot < close);
            }
            let (after_last, wrapped) = slots.last().unwrap().overflowing_add_signed(granularity);
            prop_assert!(wrapped != 0 || after_last >= close);
        }

        #[test]
        fn free_slots_never_overlap_reservations(
            bookings in proptest::collection::vec((7u32..21, 1u32..4), 0..6),
        ) {
            let granularity = Duration::minutes(60);
            let slots = generate_time_slots(weekday_window(), granularity);
            let intervals: Vec<(NaiveTime, NaiveTime)> = bookings.iter()
                .map(|(start, len)| {
                    let end = (start + len).min(23);
                    (NaiveTime::from_hms_opt(*start, 0, 0).unwrap(), NaiveTime::from_hms_opt(end, 0, 0).unwrap())
                })
                .collect();
            let free = available_slots(&slots, granularity, &intervals);

            for slot in &free {
                let slot_end = *slot + granularity;
                for (start, end) in &intervals {
                    prop_assert!(!(*slot < *end && slot_end > *start), "{} overlaps {}-{}", slot, start, end);
                }
            }
        }

        #[test]
        fn selectable_iff_run_of_free_slots(
            busy_hours in proptest::collection::vec(7u32..21, 0..8),
            candidate in 7u32..21,
            duration in 1u32..3,
        ) {
            let granularity = Duration::minutes(60);
            let slots = generate_time_slots(weekday_window(), granularity);
            let intervals: Vec<(NaiveTime, NaiveTime)> = busy_hours.iter()
                .map(|h| (NaiveTime::from_hms_opt(*h, 0, 0).unwrap(), NaiveTime::from_hms_opt(h + 1, 0, 0).unwrap()))
                .collect();
            let free = available_slots(&slots, granularity, &intervals);
            let slot = NaiveTime::from_hms_opt(candidate, 0, 0).unwrap();

            let expected = (candidate..candidate + duration)
                .all(|h| h < 21 && !busy_hours.contains(&h));
            prop_assert_eq!(can_select_slot(slot, duration, &slots, &free), expected);
        }
    }
}
