// src/geometry.rs
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use geo::{Intersects, LineString, MultiPolygon, Polygon};

use crate::error::{LaiError, Result};

/// Build a polygon from a closed or open exterior ring of `[x, y]` pairs
pub fn polygon_from_ring(ring: &[[f64; 2]]) -> Polygon<f64> {
    Polygon::new(LineString::from(ring.to_vec()), vec![])
}

/// The study area used as a spatial filter. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyArea {
    geometry: MultiPolygon<f64>,
}

impl StudyArea {
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self { geometry }
    }

    /// One polygon per exterior ring. Rings need at least three vertices.
    pub fn from_rings(rings: &[Vec<[f64; 2]>]) -> Result<Self> {
        if rings.is_empty() {
            return Err(LaiError::InvalidConfig(
                "study area needs at least one polygon".to_string(),
            ));
        }

        let mut polygons = Vec::with_capacity(rings.len());
        for (i, ring) in rings.iter().enumerate() {
            if ring.len() < 3 {
                return Err(LaiError::InvalidConfig(format!(
                    "study area ring {} has {} vertices, need at least 3",
                    i,
                    ring.len()
                )));
            }
            polygons.push(polygon_from_ring(ring));
        }

        Ok(Self::new(MultiPolygon::new(polygons)))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    pub fn intersects(&self, footprint: &Polygon<f64>) -> bool {
        self.geometry.intersects(footprint)
    }
}

/// Half-open `[start, end)` range of calendar days, both at 00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(LaiError::InvalidConfig(format!(
                "start date {} must be before end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::default()))
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.end.and_time(NaiveTime::default()))
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start_time() && time < self.end_time()
    }

    /// Length of the study period in days
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
