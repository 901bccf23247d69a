// src/models/catalog.rs
// DOCUMENTATION: Shared behaviour of the five catalog collections
// PURPOSE: Item kinds, listing filters, sorting and pagination

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::db::{CatalogStore, Storage};
use crate::errors::AppError;

/// Default and maximum page sizes for catalog listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an i64 at the largest page size
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// The catalog collection a booking or favorite points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Experience,
    Accommodation,
    Package,
    Vehicle,
    Restaurant,
}

/// How a booking total is derived from the item's unit price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingUnit {
    PerGuest,
    PerNight,
    PerDay,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Experience,
        ItemKind::Accommodation,
        ItemKind::Package,
        ItemKind::Vehicle,
        ItemKind::Restaurant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Experience => "experience",
            ItemKind::Accommodation => "accommodation",
            ItemKind::Package => "package",
            ItemKind::Vehicle => "vehicle",
            ItemKind::Restaurant => "restaurant",
        }
    }

    /// URL collection segment under /api
    pub fn collection(&self) -> &'static str {
        match self {
            ItemKind::Experience => "experiences",
            ItemKind::Accommodation => "accommodations",
            ItemKind::Package => "packages",
            ItemKind::Vehicle => "vehicles",
            ItemKind::Restaurant => "restaurants",
        }
    }

    pub fn pricing_unit(&self) -> PricingUnit {
        match self {
            ItemKind::Accommodation => PricingUnit::PerNight,
            ItemKind::Vehicle => PricingUnit::PerDay,
            ItemKind::Experience | ItemKind::Package | ItemKind::Restaurant => {
                PricingUnit::PerGuest
            }
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown item kind '{}'", s)))
    }
}

/// Common surface of Experience, Accommodation, Package, VehicleRental and Restaurant
pub trait CatalogEntity: Clone + Serialize + Send + Sync + Unpin + 'static {
    /// Body accepted by POST
    type Draft: DeserializeOwned + Validate + Send + 'static;
    /// Body accepted by PUT, every field optional
    type Patch: DeserializeOwned + Validate + CatalogPatch + Send + 'static;

    const KIND: ItemKind;

    fn id(&self) -> i32;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> &str;
    fn location(&self) -> Option<&str>;
    fn unit_price(&self) -> f64;
    fn rating(&self) -> f64;
    fn featured(&self) -> bool;
    fn created_at(&self) -> DateTime<Utc>;

    /// Largest party a single booking may cover, if limited
    fn capacity(&self) -> Option<i32>;

    fn bookable(&self) -> bool {
        true
    }

    fn from_draft(id: i32, draft: Self::Draft, created_at: DateTime<Utc>) -> Self;
    fn apply_patch(&mut self, patch: Self::Patch);

    /// The sub-store holding this collection
    fn store(storage: &dyn Storage) -> &dyn CatalogStore<Self>;
}

/// Implemented by update bodies so empty updates can be rejected
pub trait CatalogPatch {
    fn is_empty(&self) -> bool;
}

/// Sort options for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
    Title,
}

/// Query string accepted by GET /api/{collection}
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub featured: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub sort: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized listing filter shared by every storage backend
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub featured: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub sort: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        CatalogFilter {
            search: None,
            category: None,
            location: None,
            featured: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            sort: SortOrder::Featured,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CatalogFilter {
    pub fn from_query(query: CatalogQuery) -> Result<Self, AppError> {
        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(AppError::InvalidInput(format!(
                    "minPrice ({}) must not exceed maxPrice ({})",
                    min, max
                )));
            }
        }

        Ok(CatalogFilter {
            search: non_blank(query.q),
            category: non_blank(query.category),
            location: non_blank(query.location),
            featured: query.featured,
            min_price: query.min_price,
            max_price: query.max_price,
            min_rating: query.min_rating,
            sort: query.sort.unwrap_or_default(),
            page: query.page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: query
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        })
    }

    /// Filter selecting featured items only, best rated first
    pub fn featured_only() -> Self {
        CatalogFilter {
            featured: Some(true),
            sort: SortOrder::Rating,
            limit: MAX_PAGE_SIZE,
            ..CatalogFilter::default()
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn matches<T: CatalogEntity>(&self, item: &T) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !item.title().to_lowercase().contains(&needle)
                && !item.description().to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !item.category().eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            match item.location() {
                Some(loc) if loc.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }

        if let Some(featured) = self.featured {
            if item.featured() != featured {
                return false;
            }
        }

        let price = item.unit_price();
        if self.min_price.map_or(false, |min| price < min) {
            return false;
        }
        if self.max_price.map_or(false, |max| price > max) {
            return false;
        }
        if self.min_rating.map_or(false, |min| item.rating() < min) {
            return false;
        }

        true
    }

    pub fn compare<T: CatalogEntity>(&self, a: &T, b: &T) -> Ordering {
        let primary = match self.sort {
            SortOrder::Featured => b
                .featured()
                .cmp(&a.featured())
                .then_with(|| b.rating().total_cmp(&a.rating())),
            SortOrder::PriceAsc => a.unit_price().total_cmp(&b.unit_price()),
            SortOrder::PriceDesc => b.unit_price().total_cmp(&a.unit_price()),
            SortOrder::Rating => b.rating().total_cmp(&a.rating()),
            SortOrder::Newest => b.created_at().cmp(&a.created_at()),
            SortOrder::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

/// Apply a filter, sort and page to an in-memory collection
/// Returns the requested page and the number of matches before paging
pub fn filter_and_sort<T: CatalogEntity>(items: Vec<T>, filter: &CatalogFilter) -> (Vec<T>, i64) {
    let mut matched: Vec<T> = items.into_iter().filter(|i| filter.matches(i)).collect();
    matched.sort_by(|a, b| filter.compare(a, b));

    let total = matched.len() as i64;
    let page = matched
        .into_iter()
        .skip(filter.offset() as usize)
        .take(filter.limit as usize)
        .collect();

    (page, total)
}

/// Paginated listing response
/// DOCUMENTATION: DTO for returning catalog results with pagination metadata
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Current page of items
    pub data: Vec<T>,

    /// Total number of matches (regardless of pagination)
    pub total_count: i64,

    /// Current page number
    pub page: i64,

    /// Results per page
    pub limit: i64,

    /// Whether more results exist on next page
    pub has_more: bool,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, total_count: i64, filter: &CatalogFilter) -> Self {
        ListResponse {
            data,
            total_count,
            page: filter.page,
            limit: filter.limit,
            has_more: total_count > filter.page.saturating_mul(filter.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Experience, NewExperience};
    use chrono::Duration;

    fn experience(id: i32, title: &str, price: f64, rating: f64, featured: bool) -> Experience {
        Experience::from_draft(
            id,
            NewExperience {
                title: title.to_string(),
                description: format!("{} in Fernando de Noronha", title),
                category: if price > 300.0 { "diving" } else { "boat_tour" }.to_string(),
                location: "Baía do Sancho".to_string(),
                duration: "3 horas".to_string(),
                price,
                max_guests: 10,
                image_url: "/images/exp.jpg".to_string(),
                rating: Some(rating),
                featured,
            },
            Utc::now() + Duration::minutes(id as i64),
        )
    }

    fn sample() -> Vec<Experience> {
        vec![
            experience(1, "Mergulho de batismo", 450.0, 4.9, true),
            experience(2, "Passeio de barco", 220.0, 4.7, false),
            experience(3, "Trilha do Atalaia", 150.0, 4.8, true),
            experience(4, "Canoa havaiana", 180.0, 4.2, false),
        ]
    }

    fn ids(items: &[Experience]) -> Vec<i32> {
        items.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_default_sort_puts_featured_first() {
        let (page, total) = filter_and_sort(sample(), &CatalogFilter::default());
        assert_eq!(total, 4);
        assert_eq!(ids(&page), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let filter = CatalogFilter {
            search: Some("BARCO".to_string()),
            ..CatalogFilter::default()
        };
        let (page, _) = filter_and_sort(sample(), &filter);
        assert_eq!(ids(&page), vec![2]);

        let filter = CatalogFilter {
            search: Some("noronha".to_string()),
            ..CatalogFilter::default()
        };
        let (_, total) = filter_and_sort(sample(), &filter);
        assert_eq!(total, 4);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let filter = CatalogFilter {
            min_price: Some(180.0),
            max_price: Some(220.0),
            sort: SortOrder::PriceAsc,
            ..CatalogFilter::default()
        };
        let (page, _) = filter_and_sort(sample(), &filter);
        assert_eq!(ids(&page), vec![4, 2]);
    }

    #[test]
    fn test_category_and_featured_filters() {
        let filter = CatalogFilter {
            category: Some("Boat_Tour".to_string()),
            featured: Some(true),
            ..CatalogFilter::default()
        };
        let (page, _) = filter_and_sort(sample(), &filter);
        assert_eq!(ids(&page), vec![3]);
    }

    #[test]
    fn test_pagination_reports_total_and_has_more() {
        let filter = CatalogFilter {
            sort: SortOrder::Title,
            page: 2,
            limit: 3,
            ..CatalogFilter::default()
        };
        let (page, total) = filter_and_sort(sample(), &filter);
        assert_eq!(total, 4);
        assert_eq!(page.len(), 1);

        let response = ListResponse::new(page, total, &filter);
        assert!(!response.has_more);

        let first = CatalogFilter { page: 1, ..filter };
        let (page, total) = filter_and_sort(sample(), &first);
        assert!(ListResponse::new(page, total, &first).has_more);
    }

    #[test]
    fn test_newest_sort_uses_created_at() {
        let filter = CatalogFilter {
            sort: SortOrder::Newest,
            ..CatalogFilter::default()
        };
        let (page, _) = filter_and_sort(sample(), &filter);
        assert_eq!(ids(&page), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_query_normalization() {
        let filter = CatalogFilter::from_query(CatalogQuery {
            q: Some("   ".to_string()),
            page: Some(0),
            limit: Some(1000),
            ..CatalogQuery::default()
        })
        .unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, MAX_PAGE_SIZE);

        let err = CatalogFilter::from_query(CatalogQuery {
            min_price: Some(500.0),
            max_price: Some(100.0),
            ..CatalogQuery::default()
        });
        assert!(matches!(err, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_huge_page_is_capped() {
        let filter = CatalogFilter::from_query(CatalogQuery {
            page: Some(i64::MAX),
            limit: Some(MAX_PAGE_SIZE),
            ..CatalogQuery::default()
        })
        .unwrap();
        assert_eq!(filter.page, MAX_PAGE);
        assert!(filter.offset() > 0);

        let (page, total) = filter_and_sort(sample(), &filter);
        assert!(page.is_empty());
        assert!(!ListResponse::new(page, total, &filter).has_more);
    }

    #[test]
    fn test_item_kind_round_trip_through_str() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.as_str().parse::<ItemKind>().unwrap(), kind);
        }
        assert!("boat".parse::<ItemKind>().is_err());
    }
}
