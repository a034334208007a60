//! BMI and basal metabolic rate.
//!
//! BMR uses the 1919 Harris-Benedict equations with height in centimetres.
//! Anything not recognised as male takes the female equation.

use chrono::{Datelike, NaiveDate};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_genero(genero: &str) -> Self {
        match genero.trim().to_lowercase().as_str() {
            "masculino" | "hombre" | "male" | "m" | "h" => Sex::Male,
            _ => Sex::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthMetrics {
    pub imc: f64,
    pub bmr: i32,
}

/// Whole years between `birth` and `today`, truncated.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

pub fn bmi(peso: f64, altura: f64) -> f64 {
    round2(peso / (altura * altura))
}

fn bmr_raw(sex: Sex, peso: f64, altura: f64, age: i32) -> f64 {
    let cm = altura * 100.0;
    let age = f64::from(age);
    match sex {
        Sex::Male => 88.36 + 13.4 * peso + 4.8 * cm - 5.7 * age,
        Sex::Female => 447.59 + 9.2 * peso + 3.1 * cm - 4.3 * age,
    }
}

pub fn bmr(sex: Sex, peso: f64, altura: f64, age: i32) -> i32 {
    bmr_raw(sex, peso, altura, age).round() as i32
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn positive(value: Option<f64>, field: &str) -> Result<f64, AppError> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(AppError::BadRequest(format!("{} debe ser mayor que cero", field))),
        None => Err(AppError::BadRequest(format!("{} es obligatorio", field))),
    }
}

/// Derives `imc` and `bmr` as of `today`.
pub fn derive_metrics(
    peso: Option<f64>,
    altura: Option<f64>,
    fecha_nacimiento: Option<NaiveDate>,
    genero: &str,
    today: NaiveDate,
) -> Result<HealthMetrics, AppError> {
    let peso = positive(peso, "peso")?;
    let altura = positive(altura, "altura")?;
    let birth = fecha_nacimiento
        .ok_or_else(|| AppError::BadRequest("fechaNacimiento es obligatorio".to_string()))?;
    if birth > today {
        return Err(AppError::BadRequest(
            "fechaNacimiento no puede estar en el futuro".to_string(),
        ));
    }

    let age = age_on(birth, today);
    let imc = bmi(peso, altura);
    let raw_bmr = bmr_raw(Sex::from_genero(genero), peso, altura, age);
    // Extreme inputs overflow the formulas; imc and bmr must stay representable.
    if !imc.is_finite() || !raw_bmr.is_finite() || raw_bmr.abs() > f64::from(i32::MAX) {
        return Err(AppError::BadRequest(
            "peso y altura fuera de rango".to_string(),
        ));
    }

    Ok(HealthMetrics {
        imc,
        bmr: raw_bmr.round() as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bmi_is_rounded_to_two_decimals() {
        assert_eq!(bmi(70.0, 1.75), 22.86);
        assert_eq!(bmi(50.0, 1.60), 19.53);
    }

    #[test]
    fn male_bmr_for_thirty_year_old() {
        // 88.36 + 938 + 840 - 171
        assert_eq!(bmr(Sex::Male, 70.0, 1.75, 30), 1695);
    }

    #[test]
    fn female_bmr_for_thirty_year_old() {
        // 447.59 + 644 + 542.5 - 129 = 1505.09
        assert_eq!(bmr(Sex::Female, 70.0, 1.75, 30), 1505);
    }

    #[test]
    fn age_truncates_before_birthday() {
        let birth = date(1995, 6, 15);
        assert_eq!(age_on(birth, date(2025, 6, 14)), 29);
        assert_eq!(age_on(birth, date(2025, 6, 15)), 30);
        assert_eq!(age_on(birth, date(2025, 12, 1)), 30);
    }

    #[test]
    fn genero_parsing_defaults_to_female() {
        assert_eq!(Sex::from_genero("Masculino"), Sex::Male);
        assert_eq!(Sex::from_genero(" hombre "), Sex::Male);
        assert_eq!(Sex::from_genero("male"), Sex::Male);
        assert_eq!(Sex::from_genero("femenino"), Sex::Female);
        assert_eq!(Sex::from_genero("otro"), Sex::Female);
    }

    #[test]
    fn derive_metrics_uses_age_from_birth_date() {
        let metrics = derive_metrics(
            Some(70.0),
            Some(1.75),
            Some(date(1995, 1, 10)),
            "masculino",
            date(2025, 3, 1),
        )
        .unwrap();

        assert_eq!(metrics, HealthMetrics { imc: 22.86, bmr: 1695 });
    }

    #[test]
    fn derive_metrics_rejects_missing_or_non_positive_inputs() {
        let today = date(2025, 3, 1);
        let birth = Some(date(1995, 1, 10));

        assert!(matches!(derive_metrics(None, Some(1.7), birth, "m", today), Err(AppError::BadRequest(_))));
        assert!(matches!(derive_metrics(Some(70.0), Some(0.0), birth, "m", today), Err(AppError::BadRequest(_))));
        assert!(matches!(derive_metrics(Some(-1.0), Some(1.7), birth, "m", today), Err(AppError::BadRequest(_))));
        assert!(matches!(derive_metrics(Some(70.0), Some(1.7), None, "m", today), Err(AppError::BadRequest(_))));
        assert!(matches!(
            derive_metrics(Some(70.0), Some(1.7), Some(date(2030, 1, 1)), "m", today),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn derive_metrics_rejects_values_that_overflow() {
        let today = date(2025, 3, 1);
        let birth = Some(date(1995, 1, 10));

        // altura² underflows to zero, which would make imc infinite.
        assert!(matches!(
            derive_metrics(Some(70.0), Some(1e-200), birth, "m", today),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            derive_metrics(Some(1e308), Some(1.75), birth, "m", today),
            Err(AppError::BadRequest(_))
        ));
    }
}
