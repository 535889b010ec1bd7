//! Game-map snapshot: obstacles, table frame, points of interest
//!
//! Delivered once per mission/phase by the vision collaborator; the
//! core only reads it.

use std::collections::HashMap;

use crate::common::error::{NavError, NavResult};
use crate::common::types::{Obstacle, Point2D};

/// A named, arena-relative landmark
#[derive(Debug, Clone, PartialEq)]
pub enum PoiLocation {
    Single(Point2D),
    /// Ordered fallback candidates, tried first to last
    Candidates(Vec<Point2D>),
}

#[derive(Debug, Clone)]
pub struct GameMap {
    pub obstacles: Vec<Obstacle>,
    pub table_corners: [Point2D; 4],
    pois: HashMap<String, PoiLocation>,
}

impl GameMap {
    pub fn new(obstacles: Vec<Obstacle>, table_corners: [Point2D; 4]) -> Self {
        Self { obstacles, table_corners, pois: HashMap::new() }
    }

    /// Competition table with its standard landmarks
    pub fn standard(obstacles: Vec<Obstacle>) -> Self {
        let mut map = Self::new(
            obstacles,
            [
                Point2D::new(0.0, 0.0),
                Point2D::new(231.0, 0.0),
                Point2D::new(231.0, 114.0),
                Point2D::new(0.0, 114.0),
            ],
        );
        map.insert_poi("antenna_start", PoiLocation::Single(Point2D::new(25.0, 85.0)));
        map.insert_poi("antenna_stop", PoiLocation::Single(Point2D::new(25.0, 25.0)));
        map.insert_poi("drawing_zone", PoiLocation::Single(Point2D::new(55.0, 57.0)));
        map.insert_poi("figure", PoiLocation::Single(Point2D::new(160.0, 85.0)));
        map.insert_poi(
            "exit",
            PoiLocation::Candidates(vec![
                Point2D::new(200.0, 85.0),
                Point2D::new(200.0, 57.0),
                Point2D::new(200.0, 30.0),
            ]),
        );
        map
    }

    pub fn insert_poi(&mut self, name: &str, location: PoiLocation) {
        self.pois.insert(name.to_string(), location);
    }

    pub fn poi(&self, name: &str) -> NavResult<&PoiLocation> {
        self.pois
            .get(name)
            .ok_or_else(|| NavError::UnknownPointOfInterest(name.to_string()))
    }

    /// The landmark as a single position (first candidate if several)
    pub fn poi_single(&self, name: &str) -> NavResult<Point2D> {
        match self.poi(name)? {
            PoiLocation::Single(p) => Ok(*p),
            PoiLocation::Candidates(list) => list
                .first()
                .copied()
                .ok_or_else(|| NavError::UnknownPointOfInterest(name.to_string())),
        }
    }

    /// The landmark as an ordered candidate list
    pub fn poi_candidates(&self, name: &str) -> NavResult<Vec<Point2D>> {
        match self.poi(name)? {
            PoiLocation::Single(p) => Ok(vec![*p]),
            PoiLocation::Candidates(list) => Ok(list.clone()),
        }
    }

    pub fn area_min(&self) -> Point2D {
        let x = self.table_corners.iter().fold(f64::INFINITY, |a, c| a.min(c.x));
        let y = self.table_corners.iter().fold(f64::INFINITY, |a, c| a.min(c.y));
        Point2D::new(x, y)
    }

    pub fn area_max(&self) -> Point2D {
        let x = self.table_corners.iter().fold(f64::NEG_INFINITY, |a, c| a.max(c.x));
        let y = self.table_corners.iter().fold(f64::NEG_INFINITY, |a, c| a.max(c.y));
        Point2D::new(x, y)
    }
}
