use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::readiness::{
    AggregateReadinessReport, LocalReadinessSource, PropertyId, PropertyReadinessService,
    PropertyRecord, PropertyStore, ReadinessSource, ReadinessSourceError, StoreError,
    StoredProperty, Trade, TradeReadinessResult,
};

pub(super) fn computed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn record(value: Value) -> PropertyRecord {
    PropertyRecord::new(value)
}

pub(super) fn empty_record() -> PropertyRecord {
    record(json!({}))
}

/// Square footage, year built and property type only.
pub(super) fn basics_only_record() -> PropertyRecord {
    record(json!({
        "squareFootage": 1200,
        "yearBuilt": 1998,
        "propertyType": "apartment"
    }))
}

/// Every critical and important field for every trade, no nice-to-have data.
pub(super) fn tracked_fields_record() -> PropertyRecord {
    record(json!({
        "squareFootage": 2400,
        "yearBuilt": 1987,
        "propertyType": "single_family",
        "hvacData": {
            "currentSystems": ["gas_furnace", "central_ac"],
            "climateZone": "5A",
            "buildingConstruction": "wood_frame",
            "ceilingHeight": 9,
            "windowCount": 18,
            "windowType": "double_pane",
            "insulationQuality": "average"
        },
        "plumbingData": {
            "fullBathrooms": 2,
            "halfBathrooms": 1,
            "kitchens": 1,
            "pipeMaterial": "copper",
            "waterHeaterType": "tank_gas",
            "waterHeaterAge": 6,
            "accessPoints": "crawlspace",
            "waterPressureIssues": false
        },
        "electricalData": {
            "panelCapacity": 200,
            "panelAge": 12,
            "majorAppliances": ["range", "dryer"],
            "outdoorElectrical": ["landscape_lighting"],
            "smartFeatures": [],
            "highDemandFacilities": ["ev_charger"]
        }
    }))
}

pub(super) fn complete_record() -> PropertyRecord {
    let mut value = tracked_fields_record().into_inner();
    value["hvacData"]["utilityCosts"] = json!({ "monthly": 240 });
    value["hvacData"]["ductworkAccess"] = json!("basement");
    value["plumbingData"]["fixtureQuality"] = json!("standard");
    value["plumbingData"]["washerDryerHookup"] = json!(true);
    PropertyRecord::new(value)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    properties: Mutex<HashMap<PropertyId, StoredProperty>>,
}

impl MemoryStore {
    pub(super) fn put(&self, id: &str, record: PropertyRecord, last_modified: DateTime<Utc>) {
        let id = PropertyId(id.to_string());
        let mut guard = self.properties.lock().expect("store mutex poisoned");
        guard.insert(
            id.clone(),
            StoredProperty {
                id,
                record,
                last_modified,
            },
        );
    }

    pub(super) fn touch(&self, id: &str, record: PropertyRecord) {
        let previous = {
            let guard = self.properties.lock().expect("store mutex poisoned");
            guard
                .get(&PropertyId(id.to_string()))
                .map(|property| property.last_modified)
                .unwrap_or_else(computed_at)
        };
        self.put(id, record, previous + Duration::seconds(1));
    }
}

impl PropertyStore for MemoryStore {
    fn fetch(&self, id: &PropertyId) -> Result<Option<StoredProperty>, StoreError> {
        let guard = self.properties.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableStore;

impl PropertyStore for UnavailableStore {
    fn fetch(&self, _id: &PropertyId) -> Result<Option<StoredProperty>, StoreError> {
        Err(StoreError::Unavailable("replica offline".to_string()))
    }
}

/// Local source that counts how often it is asked for an aggregate.
#[derive(Default)]
pub(super) struct CountingSource {
    inner: LocalReadinessSource,
    aggregates: AtomicUsize,
}

impl CountingSource {
    pub(super) fn aggregate_calls(&self) -> usize {
        self.aggregates.load(Ordering::SeqCst)
    }
}

impl ReadinessSource for CountingSource {
    async fn trade_readiness(
        &self,
        record: &PropertyRecord,
        trade: Trade,
    ) -> Result<TradeReadinessResult, ReadinessSourceError> {
        self.inner.trade_readiness(record, trade).await
    }

    async fn aggregate_readiness(
        &self,
        record: &PropertyRecord,
    ) -> Result<AggregateReadinessReport, ReadinessSourceError> {
        self.aggregates.fetch_add(1, Ordering::SeqCst);
        self.inner.aggregate_readiness(record).await
    }
}

pub(super) fn build_service() -> (
    Arc<PropertyReadinessService<MemoryStore, CountingSource>>,
    Arc<MemoryStore>,
    Arc<CountingSource>,
) {
    let store = Arc::new(MemoryStore::default());
    let source = Arc::new(CountingSource::default());
    let service = Arc::new(PropertyReadinessService::new(
        store.clone(),
        source.clone(),
        64,
    ));
    (service, store, source)
}
