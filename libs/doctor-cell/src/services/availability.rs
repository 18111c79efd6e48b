use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, Days, Duration, Local, NaiveDate, NaiveTime, Weekday};
use tracing::{debug, warn};

use shared_database::{AppState, RecordStore};
use shared_models::Doctor;

use crate::models::{
    AvailabilityError, AvailableDatesResponse, DoctorError, SlotAvailabilityResponse,
};

/// Days ahead of today (inclusive of today) a patient may book.
pub const BOOKING_HORIZON_DAYS: u64 = 30;

pub const SLOT_INTERVAL_MINUTES: i64 = 30;

const SLOT_FORMAT: &str = "%H:%M";

/// A doctor's daily working window, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    /// Parse `HH:MM-HH:MM`. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, AvailabilityError> {
        let malformed = || AvailabilityError::MalformedAvailability(raw.to_string());

        let (start, end) = raw.split_once('-').ok_or_else(malformed)?;
        let start = NaiveTime::parse_from_str(start.trim(), SLOT_FORMAT).map_err(|_| malformed())?;
        let end = NaiveTime::parse_from_str(end.trim(), SLOT_FORMAT).map_err(|_| malformed())?;

        if start > end {
            return Err(malformed());
        }

        Ok(Self { start, end })
    }

    /// Every 30-minute step from `start` that is still `<= end`, as `HH:MM`.
    pub fn slots(&self) -> Vec<String> {
        let step = Duration::minutes(SLOT_INTERVAL_MINUTES);
        let mut slots = Vec::new();
        let mut current = self.start;

        loop {
            slots.push(current.format(SLOT_FORMAT).to_string());

            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 || next > self.end {
                break;
            }
            current = next;
        }

        slots
    }
}

impl FromStr for AvailabilityWindow {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AvailabilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(SLOT_FORMAT),
            self.end.format(SLOT_FORMAT)
        )
    }
}

/// Bookable dates: today and the following days inside the horizon that fall on a working day.
pub fn candidate_dates(today: NaiveDate, working_days: &[Weekday]) -> Vec<NaiveDate> {
    (0..BOOKING_HORIZON_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter(|date| working_days.contains(&date.weekday()))
        .collect()
}

pub fn validate_selected_date(
    selected: NaiveDate,
    today: NaiveDate,
    working_days: &[Weekday],
) -> Result<(), AvailabilityError> {
    if candidate_dates(today, working_days).contains(&selected) {
        Ok(())
    } else {
        Err(AvailabilityError::InvalidDate(selected))
    }
}

/// `grid` minus `booked`, keeping the grid's order.
pub fn offered_slots(grid: &[String], booked: &[String]) -> Vec<String> {
    let booked: HashSet<&str> = booked.iter().map(String::as_str).collect();
    grid.iter()
        .filter(|slot| !booked.contains(slot.as_str()))
        .cloned()
        .collect()
}

/// Open slots for `doctor` on `date`, given the times already booked that day.
///
/// An empty result is returned as-is; callers decide how to surface it.
pub fn compute_available_slots(
    doctor: &Doctor,
    date: NaiveDate,
    today: NaiveDate,
    booked: &[String],
) -> Result<Vec<String>, AvailabilityError> {
    let window = AvailabilityWindow::parse(doctor.availability_or_default())?;
    validate_selected_date(date, today, &doctor.working_days_or_default())?;

    Ok(offered_slots(&window.slots(), booked))
}

/// The clinic's current calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct AvailabilityService {
    store: Arc<dyn RecordStore>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    async fn load_doctor(&self, identity_number: &str) -> Result<Doctor, DoctorError> {
        self.store
            .find_doctor(identity_number)
            .await?
            .ok_or_else(|| DoctorError::NotFound(identity_number.to_string()))
    }

    pub async fn available_dates(
        &self,
        identity_number: &str,
        today: NaiveDate,
    ) -> Result<AvailableDatesResponse, DoctorError> {
        debug!("Listing bookable dates for doctor {}", identity_number);

        let doctor = self.load_doctor(identity_number).await?;
        let working_days = doctor.working_days_or_default();

        Ok(AvailableDatesResponse {
            doctor_identity_number: doctor.doctor_identity_number.clone(),
            working_days: doctor.working_day_names().into_iter().map(str::to_string).collect(),
            available_dates: candidate_dates(today, &working_days),
        })
    }

    /// Offered slots for a doctor on `date`; an empty grid is `NoAvailability`.
    pub async fn available_slots(
        &self,
        identity_number: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<SlotAvailabilityResponse, DoctorError> {
        debug!("Calculating available slots for doctor {} on {}", identity_number, date);

        let doctor = self.load_doctor(identity_number).await?;
        let booked: Vec<String> = self
            .store
            .appointments_for_doctor_on(&doctor, date)
            .await?
            .into_iter()
            .map(|a| a.appointment_time)
            .collect();

        let slots = compute_available_slots(&doctor, date, today, &booked).map_err(|e| {
            warn!("Slot calculation for doctor {} failed: {}", identity_number, e);
            e
        })?;

        if slots.is_empty() {
            return Err(AvailabilityError::NoAvailability.into());
        }

        debug!("Found {} available slots", slots.len());
        Ok(SlotAvailabilityResponse {
            doctor_identity_number: doctor.doctor_identity_number.clone(),
            doctor_name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            date,
            availability: doctor.availability_or_default().to_string(),
            working_days: doctor.working_day_names().into_iter().map(str::to_string).collect(),
            total_slots: slots.len(),
            available_slots: slots,
        })
    }
}
