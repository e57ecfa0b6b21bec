//! Country and province selects for warehouse and apiary forms
//!
//! The province select is disabled until a country is chosen, and changing
//! the country drops the chosen province. Option loads carry the query and
//! country they were issued for; answers for a country that is no longer
//! selected are ignored.

use std::sync::Arc;

use shared::{Region, SiteInput};

use crate::context::ConsoleContext;
use crate::error::ConsoleResult;
use crate::remote::{OptionRequest, RegionSource};

const LOG_CONTEXT: &str = "options";

pub struct CascadingSelect {
    source: Arc<dyn RegionSource>,
    context: ConsoleContext,
    country: Option<Region>,
    province: Option<Region>,
    countries: Vec<Region>,
    provinces: Vec<Region>,
}

impl CascadingSelect {
    pub fn new(source: Arc<dyn RegionSource>, context: ConsoleContext) -> Self {
        Self {
            source,
            context,
            country: None,
            province: None,
            countries: Vec::new(),
            provinces: Vec::new(),
        }
    }

    /// Start from an existing record's regions
    pub fn with_selection(mut self, country: Region, province: Region) -> Self {
        self.country = Some(country);
        self.province = Some(province);
        self
    }

    pub fn country(&self) -> Option<&Region> {
        self.country.as_ref()
    }

    pub fn province(&self) -> Option<&Region> {
        self.province.as_ref()
    }

    pub fn country_options(&self) -> &[Region] {
        &self.countries
    }

    pub fn province_options(&self) -> &[Region] {
        &self.provinces
    }

    pub fn province_enabled(&self) -> bool {
        self.country.is_some()
    }

    /// Choose or clear the country; a different country resets the province
    pub fn select_country(&mut self, country: Option<Region>) {
        let same = match (&self.country, &country) {
            (Some(current), Some(next)) => current.id == next.id,
            (None, None) => true,
            _ => false,
        };
        self.country = country;
        if !same {
            self.province = None;
            self.provinces.clear();
        }
    }

    /// Ignored while no country is chosen
    pub fn select_province(&mut self, province: Region) -> bool {
        if !self.province_enabled() {
            return false;
        }
        self.province = Some(province);
        true
    }

    pub fn country_request(&self, query: &str) -> OptionRequest {
        OptionRequest::new(query)
    }

    /// `None` while the province select is disabled
    pub fn province_request(&self, query: &str) -> Option<OptionRequest> {
        self.country
            .as_ref()
            .map(|country| OptionRequest::within(country.id, query))
    }

    pub fn apply_countries(&mut self, result: ConsoleResult<Vec<Region>>) {
        match result {
            Ok(options) => self.countries = options,
            Err(err) => self.report(err),
        }
    }

    /// Apply a province load unless the country changed meanwhile
    pub fn apply_provinces(&mut self, request: &OptionRequest, result: ConsoleResult<Vec<Region>>) {
        let current = self.country.as_ref().map(|c| c.id);
        if request.parent.is_none() || request.parent != current {
            return;
        }
        match result {
            Ok(options) => self.provinces = options,
            Err(err) => self.report(err),
        }
    }

    pub async fn load_countries(&mut self, query: &str) {
        let request = self.country_request(query);
        let result = self.source.countries(&request).await;
        self.apply_countries(result);
    }

    pub async fn load_provinces(&mut self, query: &str) {
        let Some(request) = self.province_request(query) else {
            self.provinces.clear();
            return;
        };
        let result = self.source.provinces(&request).await;
        self.apply_provinces(&request, result);
    }

    /// Copy the selection into a site form
    pub fn fill(&self, input: &mut SiteInput) {
        input.country_id = self.country.as_ref().map(|c| c.id);
        input.province_id = self.province.as_ref().map(|p| p.id);
    }

    fn report(&self, err: crate::error::ConsoleError) {
        self.context
            .logger
            .error(LOG_CONTEXT, format!("option load failed: {}", err));
        self.context
            .notifier
            .error(&err.user_message(self.context.language));
    }
}

impl std::fmt::Debug for CascadingSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadingSelect")
            .field("country", &self.country)
            .field("province", &self.province)
            .finish_non_exhaustive()
    }
}
