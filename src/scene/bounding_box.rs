use cgmath::{Point3, Vector3};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn for_extend() -> Self {
        Self {
            min: [std::f64::INFINITY; 3].into(),
            max: [std::f64::NEG_INFINITY; 3].into(),
        }
    }

    pub fn extend(&mut self, point: Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Self {
        let mut extents = Self::for_extend();

        for point in points.into_iter() {
            extents.extend(point);
        }

        extents
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn contains(&self, point: Point3<f64>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }
}
