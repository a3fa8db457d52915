use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    client::WeatherClient,
    error::{FetchError, QueryError},
    model::{Units, WeatherQuery, WeatherReport},
    slot::Slot,
};

/// Entry point for the presentation layer.
///
/// Every fetch runs as its own task and publishes into two shared slots: the
/// latest report and the latest error. A success sets the report and clears the
/// error; a failure sets the error and leaves the last report in place.
/// Overlapping fetches are neither serialized nor cancelled, so whichever
/// finishes last wins.
///
/// Clones share the same client and slots.
#[derive(Debug, Clone)]
pub struct WeatherService {
    client: Arc<dyn WeatherClient>,
    units: Units,
    report: Arc<Slot<WeatherReport>>,
    error: Arc<Slot<FetchError>>,
    next_request: Arc<AtomicU64>,
}

impl WeatherService {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self {
            client,
            units: Units::default(),
            report: Arc::new(Slot::new()),
            error: Arc::new(Slot::new()),
            next_request: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Spawns a by-city fetch. Must be called from within a tokio runtime.
    pub fn fetch_by_city(
        &self,
        city: &str,
        api_key: &str,
    ) -> JoinHandle<Result<WeatherReport, FetchError>> {
        let query = WeatherQuery::by_city(city, api_key);
        self.spawn(query)
    }

    /// Spawns a by-coordinates fetch. Must be called from within a tokio runtime.
    pub fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        api_key: &str,
    ) -> JoinHandle<Result<WeatherReport, FetchError>> {
        let query = WeatherQuery::by_coordinates(latitude, longitude, api_key);
        self.spawn(query)
    }

    fn spawn(
        &self,
        query: Result<WeatherQuery, QueryError>,
    ) -> JoinHandle<Result<WeatherReport, FetchError>> {
        let service = self.clone();
        tokio::spawn(async move {
            match query {
                Ok(query) => {
                    let query = query.with_units(service.units);
                    service.fetch(query).await
                }
                Err(err) => {
                    let err = FetchError::from(err);
                    warn!(error = %err, "rejected weather query");
                    service.error.set(err.clone());
                    Err(err)
                }
            }
        })
    }

    /// Runs one fetch on the current task and publishes its outcome.
    pub async fn fetch(&self, query: WeatherQuery) -> Result<WeatherReport, FetchError> {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        debug!(request_id, ?query, "weather fetch pending");

        match self.client.current_weather(&query).await {
            Ok(report) => {
                info!(
                    request_id,
                    city = %report.city_name,
                    temperature = report.temperature,
                    "weather fetch succeeded"
                );
                self.report.set(report.clone());
                self.error.clear();
                Ok(report)
            }
            Err(err) => {
                warn!(request_id, kind = ?err.kind(), error = %err, "weather fetch failed");
                self.error.set(err.clone());
                Err(err)
            }
        }
    }

    pub fn report(&self) -> Option<WeatherReport> {
        self.report.get()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.error.get()
    }

    /// Call once the error has been shown to the user.
    pub fn clear_error(&self) {
        self.error.clear();
    }

    pub fn subscribe_report(&self) -> watch::Receiver<Option<WeatherReport>> {
        self.report.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<FetchError>> {
        self.error.subscribe()
    }
}
