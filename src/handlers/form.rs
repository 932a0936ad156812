use axum::Json;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::{json, Value};

use crate::features::{
    Area, Categorical, Category, Traffic, Vehicle, Weather, AGENT_AGE_RANGE, AGENT_RATING_RANGE,
};
use crate::utils::geo::Coordinate;

#[derive(Debug, Serialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

#[derive(Debug, Serialize)]
pub struct Choices {
    pub weather: Vec<&'static str>,
    pub traffic: Vec<&'static str>,
    pub vehicle: Vec<&'static str>,
    pub area: Vec<&'static str>,
    pub category: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct FormDefaults {
    pub agent_age: u32,
    pub agent_rating: f64,
    pub weather: Weather,
    pub traffic: Traffic,
    pub vehicle: Vehicle,
    pub area: Area,
    pub category: Category,
    pub order_date: NaiveDate,
    pub order_time: NaiveTime,
    pub pickup_time: NaiveTime,
    pub store: Coordinate,
    pub drop: Coordinate,
}

#[derive(Debug, Serialize)]
pub struct FormSchema {
    pub agent_age: Bounds<u32>,
    pub agent_rating: Bounds<f64>,
    pub choices: Choices,
    pub defaults: FormDefaults,
}

fn default_form(today: NaiveDate) -> FormDefaults {
    FormDefaults {
        agent_age: 25,
        agent_rating: 3.5,
        weather: Weather::ALL[0],
        traffic: Traffic::ALL[0],
        vehicle: Vehicle::ALL[0],
        area: Area::ALL[0],
        category: Category::ALL[0],
        order_date: today,
        order_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        pickup_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or_default(),
        store: Coordinate::new(19.0760, 72.8777),
        drop: Coordinate::new(19.2183, 72.9781),
    }
}

/// Describe the order form: selectable values, bounds and defaults
pub async fn form_schema() -> Json<FormSchema> {
    Json(FormSchema {
        agent_age: Bounds {
            min: *AGENT_AGE_RANGE.start(),
            max: *AGENT_AGE_RANGE.end(),
        },
        agent_rating: Bounds {
            min: *AGENT_RATING_RANGE.start(),
            max: *AGENT_RATING_RANGE.end(),
        },
        choices: Choices {
            weather: Weather::display_names(),
            traffic: Traffic::display_names(),
            vehicle: Vehicle::display_names(),
            area: Area::display_names(),
            category: Category::display_names(),
        },
        defaults: default_form(Local::now().date_naive()),
    })
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
