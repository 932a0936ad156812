//! Order attributes and the fixed-schema feature vector handed to the model.

use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::utils::geo::Coordinate;
use crate::utils::time::minutes_to_pickup;

pub const AGENT_AGE_RANGE: RangeInclusive<u32> = 15..=50;
pub const AGENT_RATING_RANGE: RangeInclusive<f64> = 1.0..=5.0;

/// Column names in the order the model was trained on.
pub const FEATURE_NAMES: [&str; 9] = [
    "Agent_Age",
    "Agent_Rating",
    "Distance_km",
    "Time_to_Pickup_Min",
    "Weather",
    "Traffic",
    "Vehicle",
    "Area",
    "Category",
];

pub const NUMERIC_FEATURES: [&str; 4] = [
    "Agent_Age",
    "Agent_Rating",
    "Distance_km",
    "Time_to_Pickup_Min",
];

pub const CATEGORICAL_FEATURES: [&str; 5] = ["Weather", "Traffic", "Vehicle", "Area", "Category"];

/// A fixed enumeration of order attributes.
///
/// `display_name` is what clients send and see, `label` is the exact string
/// the model vocabulary was built from. Some labels carry a trailing space.
pub trait Categorical: Copy + 'static {
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn display_name(self) -> &'static str;
    fn label(self) -> &'static str;

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.label()).collect()
    }

    fn display_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.display_name()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Sunny,
    Stormy,
    Sandstorms,
    Cloudy,
    Fog,
    Windy,
}

impl Categorical for Weather {
    const FIELD: &'static str = "Weather";
    const ALL: &'static [Self] = &[
        Weather::Sunny,
        Weather::Stormy,
        Weather::Sandstorms,
        Weather::Cloudy,
        Weather::Fog,
        Weather::Windy,
    ];

    fn display_name(self) -> &'static str {
        self.label()
    }

    fn label(self) -> &'static str {
        match self {
            Weather::Sunny => "Sunny",
            Weather::Stormy => "Stormy",
            Weather::Sandstorms => "Sandstorms",
            Weather::Cloudy => "Cloudy",
            Weather::Fog => "Fog",
            Weather::Windy => "Windy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Traffic {
    #[serde(alias = "High ")]
    High,
    #[serde(alias = "Jam ")]
    Jam,
    #[serde(alias = "Low ")]
    Low,
    #[serde(alias = "Medium ")]
    Medium,
}

impl Categorical for Traffic {
    const FIELD: &'static str = "Traffic";
    const ALL: &'static [Self] = &[Traffic::High, Traffic::Jam, Traffic::Low, Traffic::Medium];

    fn display_name(self) -> &'static str {
        match self {
            Traffic::High => "High",
            Traffic::Jam => "Jam",
            Traffic::Low => "Low",
            Traffic::Medium => "Medium",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Traffic::High => "High ",
            Traffic::Jam => "Jam ",
            Traffic::Low => "Low ",
            Traffic::Medium => "Medium ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vehicle {
    #[serde(alias = "motorcycle ")]
    Motorcycle,
    #[serde(alias = "scooter ")]
    Scooter,
    Van,
}

impl Categorical for Vehicle {
    const FIELD: &'static str = "Vehicle";
    const ALL: &'static [Self] = &[Vehicle::Motorcycle, Vehicle::Scooter, Vehicle::Van];

    fn display_name(self) -> &'static str {
        match self {
            Vehicle::Motorcycle => "motorcycle",
            Vehicle::Scooter => "scooter",
            Vehicle::Van => "van",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Vehicle::Motorcycle => "motorcycle ",
            Vehicle::Scooter => "scooter ",
            Vehicle::Van => "van",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    #[serde(alias = "Urban ")]
    Urban,
    // Spelled the way the training data spells it
    #[serde(alias = "Metropolitian ", alias = "Metropolitan")]
    Metropolitian,
    #[serde(rename = "Semi-Urban", alias = "Semi-Urban ")]
    SemiUrban,
    Other,
}

impl Categorical for Area {
    const FIELD: &'static str = "Area";
    const ALL: &'static [Self] = &[Area::Urban, Area::Metropolitian, Area::SemiUrban, Area::Other];

    fn display_name(self) -> &'static str {
        match self {
            Area::Urban => "Urban",
            Area::Metropolitian => "Metropolitian",
            Area::SemiUrban => "Semi-Urban",
            Area::Other => "Other",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Area::Urban => "Urban ",
            Area::Metropolitian => "Metropolitian ",
            Area::SemiUrban => "Semi-Urban ",
            Area::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Clothing,
    Electronics,
    Sports,
    Cosmetics,
    Toys,
    Snacks,
    Shoes,
    Apparel,
    Jewelry,
    Outdoors,
    Grocery,
    Books,
    Kitchen,
    Home,
    #[serde(rename = "Pet Supplies")]
    PetSupplies,
    Skincare,
}

impl Categorical for Category {
    const FIELD: &'static str = "Category";
    const ALL: &'static [Self] = &[
        Category::Clothing,
        Category::Electronics,
        Category::Sports,
        Category::Cosmetics,
        Category::Toys,
        Category::Snacks,
        Category::Shoes,
        Category::Apparel,
        Category::Jewelry,
        Category::Outdoors,
        Category::Grocery,
        Category::Books,
        Category::Kitchen,
        Category::Home,
        Category::PetSupplies,
        Category::Skincare,
    ];

    fn display_name(self) -> &'static str {
        self.label()
    }

    fn label(self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::Sports => "Sports",
            Category::Cosmetics => "Cosmetics",
            Category::Toys => "Toys",
            Category::Snacks => "Snacks",
            Category::Shoes => "Shoes",
            Category::Apparel => "Apparel",
            Category::Jewelry => "Jewelry",
            Category::Outdoors => "Outdoors",
            Category::Grocery => "Grocery",
            Category::Books => "Books",
            Category::Kitchen => "Kitchen",
            Category::Home => "Home",
            Category::PetSupplies => "Pet Supplies",
            Category::Skincare => "Skincare",
        }
    }
}

/// Everything the order form collects for one prediction.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryRequest {
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

/// The two features computed from the order rather than entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub distance_km: f64,
    pub time_to_pickup_min: f64,
}

impl DeliveryRequest {
    /// Enforce the bounds the order form puts on its numeric inputs.
    pub fn validate(&self) -> AppResult<()> {
        if !AGENT_AGE_RANGE.contains(&self.agent_age) {
            return Err(AppError::Validation(format!(
                "agent_age must be between {} and {}, got {}",
                AGENT_AGE_RANGE.start(),
                AGENT_AGE_RANGE.end(),
                self.agent_age
            )));
        }

        if !AGENT_RATING_RANGE.contains(&self.agent_rating) {
            return Err(AppError::Validation(format!(
                "agent_rating must be between {:.1} and {:.1}, got {}",
                AGENT_RATING_RANGE.start(),
                AGENT_RATING_RANGE.end(),
                self.agent_rating
            )));
        }

        let coordinates = [self.store.lat, self.store.lng, self.drop.lat, self.drop.lng];
        if coordinates.iter().any(|v| !v.is_finite()) {
            return Err(AppError::BadRequest("Coordinates must be finite numbers".to_string()));
        }

        Ok(())
    }

    pub fn derive(&self) -> DerivedFeatures {
        DerivedFeatures {
            distance_km: self.store.distance_km(&self.drop),
            time_to_pickup_min: minutes_to_pickup(self.order_date, self.order_time, self.pickup_time),
        }
    }

    pub fn to_feature_vector(&self) -> AppResult<FeatureVector> {
        self.validate()?;
        let derived = self.derive();

        Ok(FeatureVector {
            agent_age: self.agent_age,
            agent_rating: self.agent_rating,
            distance_km: derived.distance_km,
            time_to_pickup_min: derived.time_to_pickup_min,
            weather: self.weather,
            traffic: self.traffic,
            vehicle: self.vehicle,
            area: self.area,
            category: self.category,
        })
    }
}

/// One row of model input. Built per request and never retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    #[serde(rename = "Agent_Age")]
    pub agent_age: u32,
    #[serde(rename = "Agent_Rating")]
    pub agent_rating: f64,
    #[serde(rename = "Distance_km")]
    pub distance_km: f64,
    #[serde(rename = "Time_to_Pickup_Min")]
    pub time_to_pickup_min: f64,
    #[serde(rename = "Weather")]
    pub weather: Weather,
    #[serde(rename = "Traffic")]
    pub traffic: Traffic,
    #[serde(rename = "Vehicle")]
    pub vehicle: Vehicle,
    #[serde(rename = "Area")]
    pub area: Area,
    #[serde(rename = "Category")]
    pub category: Category,
}

impl FeatureVector {
    pub fn numeric(&self, name: &str) -> Option<f64> {
        match name {
            "Agent_Age" => Some(self.agent_age as f64),
            "Agent_Rating" => Some(self.agent_rating),
            "Distance_km" => Some(self.distance_km),
            "Time_to_Pickup_Min" => Some(self.time_to_pickup_min),
            _ => None,
        }
    }

    /// Vocabulary label of a categorical column.
    pub fn categorical(&self, name: &str) -> Option<&'static str> {
        match name {
            "Weather" => Some(self.weather.label()),
            "Traffic" => Some(self.traffic.label()),
            "Vehicle" => Some(self.vehicle.label()),
            "Area" => Some(self.area.label()),
            "Category" => Some(self.category.label()),
            _ => None,
        }
    }
}

/// Vocabulary labels of every categorical column, keyed by column name.
pub fn vocabulary(field: &str) -> Option<Vec<&'static str>> {
    match field {
        "Weather" => Some(Weather::labels()),
        "Traffic" => Some(Traffic::labels()),
        "Vehicle" => Some(Vehicle::labels()),
        "Area" => Some(Area::labels()),
        "Category" => Some(Category::labels()),
        _ => None,
    }
}
