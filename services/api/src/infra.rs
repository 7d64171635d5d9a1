use chrono::{Duration, Utc};
use estimate_readiness::error::AppError;
use estimate_readiness::readiness::{
    PropertyId, PropertyRecord, PropertyStore, ReadinessBackend, StoreError, StoredProperty,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) backend: Arc<ReadinessBackend>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyStore {
    properties: Arc<Mutex<HashMap<PropertyId, StoredProperty>>>,
}

impl InMemoryPropertyStore {
    /// Insert or replace a record. `last_modified` strictly increases per
    /// property so cached reports for the previous version are never reused.
    pub(crate) fn upsert(
        &self,
        id: impl Into<String>,
        record: PropertyRecord,
    ) -> Result<StoredProperty, StoreError> {
        let id = PropertyId(id.into());
        let mut guard = self.lock()?;

        let now = Utc::now();
        let last_modified = match guard.get(&id) {
            Some(existing) if existing.last_modified >= now => {
                existing.last_modified + Duration::microseconds(1)
            }
            _ => now,
        };

        let stored = StoredProperty {
            id: id.clone(),
            record,
            last_modified,
        };
        guard.insert(id, stored.clone());
        Ok(stored)
    }

    pub(crate) fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PropertyId, StoredProperty>>, StoreError> {
        self.properties
            .lock()
            .map_err(|_| StoreError::Unavailable("property store mutex poisoned".to_string()))
    }
}

impl PropertyStore for InMemoryPropertyStore {
    fn fetch(&self, id: &PropertyId) -> Result<Option<StoredProperty>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }
}

pub(crate) fn load_record(path: &Path) -> Result<PropertyRecord, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let record = serde_json::from_str(&raw)?;
    Ok(record)
}

/// A sample property with a short description for demos.
pub(crate) struct SampleProperty {
    pub(crate) id: &'static str,
    pub(crate) description: &'static str,
    pub(crate) record: PropertyRecord,
}

pub(crate) fn sample_properties() -> Vec<SampleProperty> {
    vec![
        SampleProperty {
            id: "maple-court-2b",
            description: "Listing import with only the basics",
            record: PropertyRecord::new(json!({
                "squareFootage": 1200,
                "yearBuilt": 1998,
                "propertyType": "apartment"
            })),
        },
        SampleProperty {
            id: "harbor-view-14",
            description: "Walkthrough started, HVAC survey half done",
            record: PropertyRecord::new(json!({
                "squareFootage": 1850,
                "yearBuilt": 1976,
                "propertyType": "single_family",
                "hvacData": {
                    "currentSystems": ["boiler"],
                    "climateZone": "6A",
                    "buildingConstruction": "brick"
                },
                "plumbingData": {
                    "fullBathrooms": 2,
                    "halfBathrooms": 0,
                    "kitchens": 1,
                    "pipeMaterial": "galvanized"
                },
                "electricalData": {
                    "panelCapacity": 100,
                    "panelAge": 41,
                    "majorAppliances": []
                }
            })),
        },
        SampleProperty {
            id: "cedar-ridge-7",
            description: "Full site survey on file",
            record: PropertyRecord::new(json!({
                "squareFootage": 2400,
                "yearBuilt": 2011,
                "propertyType": "single_family",
                "hvacData": {
                    "currentSystems": ["heat_pump", "gas_furnace"],
                    "climateZone": "5B",
                    "buildingConstruction": "wood_frame",
                    "ceilingHeight": 9,
                    "windowCount": 18,
                    "windowType": "double_pane",
                    "insulationQuality": "good",
                    "utilityCosts": 210,
                    "ductworkAccess": "basement"
                },
                "plumbingData": {
                    "fullBathrooms": 2,
                    "halfBathrooms": 1,
                    "kitchens": 1,
                    "pipeMaterial": "copper",
                    "waterHeaterType": "tank",
                    "waterHeaterAge": 6,
                    "accessPoints": ["crawlspace"],
                    "waterPressureIssues": false,
                    "fixtureQuality": "standard",
                    "washerDryerHookup": true
                },
                "electricalData": {
                    "panelCapacity": 200,
                    "panelAge": 13,
                    "majorAppliances": ["range", "dryer"],
                    "outdoorElectrical": ["landscape_lighting"],
                    "smartFeatures": [],
                    "highDemandFacilities": ["ev_charger"]
                }
            })),
        },
    ]
}

pub(crate) fn seed_sample_properties(store: &InMemoryPropertyStore) -> Result<usize, StoreError> {
    for sample in sample_properties() {
        store.upsert(sample.id, sample.record)?;
    }
    store.count()
}
