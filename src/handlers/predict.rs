use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::features::{DeliveryRequest, FeatureVector};
use crate::utils::format::{format_duration, format_km, format_minutes};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DerivedFeaturesResponse {
    pub distance_km: f64,
    pub time_to_pickup_min: f64,
    pub distance_display: String,
    pub time_to_pickup_display: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub id: Uuid,
    pub features: FeatureVector,
    pub predicted_minutes: f64,
    pub display: String,
}

/// Preview the calculated distance and time to pickup
pub async fn derived_features(
    AppJson(payload): AppJson<DeliveryRequest>,
) -> AppResult<Json<DerivedFeaturesResponse>> {
    payload.validate()?;
    let derived = payload.derive();

    Ok(Json(DerivedFeaturesResponse {
        distance_km: derived.distance_km,
        time_to_pickup_min: derived.time_to_pickup_min,
        distance_display: format_km(derived.distance_km),
        time_to_pickup_display: format_minutes(derived.time_to_pickup_min),
    }))
}

/// Predict the delivery time for an order
pub async fn predict(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DeliveryRequest>,
) -> AppResult<Json<PredictionResponse>> {
    let features = payload.to_feature_vector()?;
    let id = Uuid::new_v4();

    // The model call is synchronous, keep it off the async workers
    let predictor = state.predictor.clone();
    let input = features.clone();
    let predicted_minutes = tokio::task::spawn_blocking(move || predictor.predict(&input)).await??;

    let display_text = format_duration(predicted_minutes);
    tracing::info!(
        prediction_id = %id,
        distance_km = features.distance_km,
        time_to_pickup_min = features.time_to_pickup_min,
        predicted_minutes,
        display = %display_text,
        "Predicted delivery time"
    );

    Ok(Json(PredictionResponse {
        id,
        features,
        predicted_minutes,
        display: display_text,
    }))
}
