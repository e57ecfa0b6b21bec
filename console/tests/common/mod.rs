//! Fakes and fixtures shared by the integration tests

#![allow(dead_code)]

use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use beereign_console::logging::{Logger, MemorySink};
use beereign_console::notify::NoticeQueue;
use beereign_console::remote::{
    ExactLookup, ListSource, Lookup, Mutations, OptionRequest, RegionSource,
};
use beereign_console::{ConsoleContext, ConsoleError, ConsoleResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    BatchLot, EntityId, Language, ListQuery, NamedRef, Page, Product, ProductBatch, ProductRef,
    RawMaterialBatch, RawMaterialRef, Region,
};

/// Context whose notices and log records can be inspected
pub struct Harness {
    pub context: ConsoleContext,
    pub notices: Arc<NoticeQueue>,
    pub logs: Arc<MemorySink>,
}

pub fn harness() -> Harness {
    let notices = Arc::new(NoticeQueue::default());
    let logs = Arc::new(MemorySink::default());
    let context = ConsoleContext::new(
        Logger::new(logs.clone()),
        notices.clone(),
        Language::Spanish,
    );
    Harness {
        context,
        notices,
        logs,
    }
}

pub fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn lot(id: i64, stock: &str) -> BatchLot {
    BatchLot {
        id: EntityId(id),
        entry_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        expiration_date: None,
        quantity_received: decimal("10"),
        stock: decimal(stock),
        unit_cost: decimal("2.5"),
        total_cost: decimal("25"),
        warehouse_id: EntityId(1),
        employee_id: EntityId(2),
        warehouse: Some(NamedRef {
            id: EntityId(1),
            name: "bodega norte".to_string(),
        }),
        employee: None,
        created_at: None,
    }
}

pub fn raw_batch(id: i64, stock: &str) -> RawMaterialBatch {
    RawMaterialBatch {
        lot: lot(id, stock),
        raw_material_id: EntityId(7),
        raw_material: Some(RawMaterialRef {
            id: EntityId(7),
            name: "cera".to_string(),
            measurement: "kg".to_string(),
        }),
    }
}

pub fn product_batch(id: i64, product_id: i64) -> ProductBatch {
    ProductBatch {
        lot: lot(id, "3"),
        product_id: EntityId(product_id),
        product: Some(ProductRef {
            id: EntityId(product_id),
            name: "miel de abeja".to_string(),
            barcode: None,
        }),
    }
}

pub fn product(id: i64, barcode: &str) -> Product {
    Product {
        id: EntityId(id),
        barcode: barcode.to_string(),
        name: "miel de abeja".to_string(),
        stock: None,
        average_cost: None,
        amount: None,
        created_at: None,
    }
}

pub fn region(id: i64, name: &str) -> Region {
    Region {
        id: EntityId(id),
        name: name.to_string(),
    }
}

type Responder<T> = dyn Fn(&ListQuery) -> (Duration, ConsoleResult<Page<T>>) + Send + Sync;

/// List endpoint answering from a closure after a simulated delay
pub struct FakeListSource<T> {
    calls: Mutex<Vec<ListQuery>>,
    respond: Box<Responder<T>>,
}

impl<T> FakeListSource<T> {
    pub fn new(
        respond: impl Fn(&ListQuery) -> (Duration, ConsoleResult<Page<T>>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Answers every query with the same page, immediately
    pub fn fixed(page: Page<T>) -> Arc<Self>
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::new(move |_| (Duration::ZERO, Ok(page.clone())))
    }

    pub fn calls(&self) -> Vec<ListQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl<T: Send + Sync> ListSource<T> for FakeListSource<T> {
    async fn list_page(&self, query: &ListQuery) -> ConsoleResult<Page<T>> {
        self.calls.lock().unwrap().push(query.clone());
        let (delay, result) = (self.respond)(query);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

/// Exact-code endpoint answering from a closure
pub struct FakeLookup<T> {
    calls: Mutex<Vec<String>>,
    respond: Box<dyn Fn(&str) -> ConsoleResult<Lookup<T>> + Send + Sync>,
}

impl<T> FakeLookup<T> {
    pub fn new(
        respond: impl Fn(&str) -> ConsoleResult<Lookup<T>> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<T: Send + Sync> ExactLookup<T> for FakeLookup<T> {
    async fn lookup_exact(&self, code: &str) -> ConsoleResult<Lookup<T>> {
        self.calls.lock().unwrap().push(code.to_string());
        (self.respond)(code)
    }
}

/// Mutation endpoint that records calls and returns a fixed record
pub struct FakeMutations<T, C, U> {
    saved: T,
    fail: AtomicBool,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub removes: Mutex<Vec<EntityId>>,
    _payloads: PhantomData<fn() -> (C, U)>,
}

impl<T, C, U> FakeMutations<T, C, U> {
    pub fn new(saved: T) -> Arc<Self> {
        Arc::new(Self {
            saved,
            fail: AtomicBool::new(false),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            removes: Mutex::new(Vec::new()),
            _payloads: PhantomData,
        })
    }

    /// Make every following call fail with a server error
    pub fn fail_with_server_error(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn removed(&self) -> Vec<EntityId> {
        self.removes.lock().unwrap().clone()
    }

    fn outcome(&self) -> ConsoleResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ConsoleError::Server {
                status: 500,
                message: "database unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<T, C, U> Mutations<T> for FakeMutations<T, C, U>
where
    T: Clone + Send + Sync,
    C: Serialize + Send + Sync,
    U: Serialize + Send + Sync,
{
    type Create = C;
    type Update = U;

    async fn create(&self, _payload: &C) -> ConsoleResult<T> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.outcome().map(|()| self.saved.clone())
    }

    async fn update(&self, _id: EntityId, _payload: &U) -> ConsoleResult<T> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.outcome().map(|()| self.saved.clone())
    }

    async fn remove(&self, id: EntityId) -> ConsoleResult<()> {
        self.removes.lock().unwrap().push(id);
        self.outcome()
    }
}

/// Countries and provinces, with an optional slow country
pub struct FakeRegions {
    pub province_calls: AtomicUsize,
    slow_country: Option<(EntityId, Duration)>,
}

impl FakeRegions {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            province_calls: AtomicUsize::new(0),
            slow_country: None,
        })
    }

    pub fn with_slow_country(id: i64, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            province_calls: AtomicUsize::new(0),
            slow_country: Some((EntityId(id), delay)),
        })
    }
}

#[async_trait]
impl RegionSource for FakeRegions {
    async fn countries(&self, _request: &OptionRequest) -> ConsoleResult<Vec<Region>> {
        Ok(vec![region(1, "panamá"), region(2, "costa rica")])
    }

    async fn provinces(&self, request: &OptionRequest) -> ConsoleResult<Vec<Region>> {
        self.province_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((slow, delay)) = self.slow_country {
            if request.parent == Some(slow) {
                tokio::time::sleep(delay).await;
            }
        }
        match request.parent {
            Some(EntityId(1)) => Ok(vec![region(10, "chiriquí"), region(11, "veraguas")]),
            Some(EntityId(2)) => Ok(vec![region(20, "guanacaste")]),
            _ => Ok(Vec::new()),
        }
    }
}
