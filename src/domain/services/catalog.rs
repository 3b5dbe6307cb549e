use crate::domain::models::court::{Court, SportCourts, SportType};
use crate::error::AppError;

/// Groups courts under their sport type, keeping the order of `sport_types`.
/// Sport types without courts are left out, as are courts whose sport type
/// is unknown.
pub fn group_by_sport(sport_types: &[SportType], courts: Vec<Court>) -> Vec<SportCourts> {
    let mut groups: Vec<SportCourts> = sport_types.iter()
        .map(|sport_type| SportCourts { sport_type: sport_type.clone(), courts: Vec::new() })
        .collect();

    for court in courts {
        if let Some(group) = groups.iter_mut().find(|g| g.sport_type.id == court.sport_type_id) {
            group.courts.push(court);
        }
    }

    groups.retain(|g| !g.courts.is_empty());
    groups
}

pub fn validate_court(name: &str, sport_type_id: &str, price_per_hour: f64, max_people: i32) -> Result<(), AppError> {
    if name.trim().is_empty() || sport_type_id.trim().is_empty() {
        return Err(AppError::Validation("Name and sport type are required".into()));
    }
    if !price_per_hour.is_finite() || price_per_hour <= 0.0 {
        return Err(AppError::Validation("Price per hour must be a number greater than 0".into()));
    }
    if max_people <= 0 {
        return Err(AppError::Validation("Maximum number of people must be greater than 0".into()));
    }
    Ok(())
}

pub fn validate_sport_type(name: &str, max_people: i32) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if max_people <= 0 {
        return Err(AppError::Validation("Maximum number of people must be greater than 0".into()));
    }
    Ok(())
}
