// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Points, directions and placements

use super::ExportSession;
use crate::cache::direction_key;
use crate::plane::Plane;
use crate::{Error, Point2, Point3, Result, Vector2, Vector3};
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, IfcType};

impl<F: EntityFactory> ExportSession<F> {
    /// IfcCartesianPoint in project length units
    pub fn create_point(&mut self, p: &Point3<f64>) -> Result<EntityHandle> {
        let coords = [self.scale_length(p.x), self.scale_length(p.y), self.scale_length(p.z)];
        self.create(IfcType::IfcCartesianPoint, vec![AttributeValue::floats(&coords)])
    }

    pub fn create_point_2d(&mut self, p: &Point2<f64>) -> Result<EntityHandle> {
        let coords = [self.scale_length(p.x), self.scale_length(p.y)];
        self.create(IfcType::IfcCartesianPoint, vec![AttributeValue::floats(&coords)])
    }

    /// Unit IfcDirection, shared between all users of the same direction
    pub fn create_direction(&mut self, v: &Vector3<f64>) -> Result<EntityHandle> {
        let d = v
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| Error::InvariantViolation("zero-length direction".into()))?;
        let key = direction_key(d.x, d.y, d.z);
        if let Some(handle) = self.cache.directions.find(&key) {
            return Ok(handle);
        }
        let handle = self.create(IfcType::IfcDirection, vec![AttributeValue::floats(&[d.x, d.y, d.z])])?;
        self.cache.directions.register(key, handle);
        Ok(handle)
    }

    pub fn create_direction_2d(&mut self, v: &Vector2<f64>) -> Result<EntityHandle> {
        let d = v
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| Error::InvariantViolation("zero-length direction".into()))?;
        let mut key = direction_key(d.x, d.y, 0.0);
        key[2] = i64::MAX;
        if let Some(handle) = self.cache.directions.find(&key) {
            return Ok(handle);
        }
        let handle = self.create(IfcType::IfcDirection, vec![AttributeValue::floats(&[d.x, d.y])])?;
        self.cache.directions.register(key, handle);
        Ok(handle)
    }

    /// IfcAxis2Placement3D for a plane frame
    pub fn create_axis_placement(&mut self, frame: &Plane) -> Result<EntityHandle> {
        let location = self.create_point(&frame.origin)?;
        let axis = self.create_direction(&frame.normal)?;
        let ref_direction = self.create_direction(&frame.x_axis)?;
        self.create(
            IfcType::IfcAxis2Placement3D,
            vec![location.into(), axis.into(), ref_direction.into()],
        )
    }

    /// IfcAxis2Placement2D
    pub fn create_axis_placement_2d(&mut self, origin: &Point2<f64>, x_axis: &Vector2<f64>) -> Result<EntityHandle> {
        let location = self.create_point_2d(origin)?;
        let ref_direction = self.create_direction_2d(x_axis)?;
        self.create(
            IfcType::IfcAxis2Placement2D,
            vec![location.into(), ref_direction.into()],
        )
    }

    /// IfcLocalPlacement of `frame`, relative to another placement if given
    pub fn create_local_placement(&mut self, relative_to: Option<EntityHandle>, frame: &Plane) -> Result<EntityHandle> {
        let placement = self.create_axis_placement(frame)?;
        self.create(
            IfcType::IfcLocalPlacement,
            vec![AttributeValue::opt_ref(relative_to), placement.into()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::GeometryOptions;
    use super::*;
    use ifc_export_core::{EntityStore, IfcSchemaVersion, LengthUnit};

    fn session() -> ExportSession {
        let options = GeometryOptions {
            length_unit: LengthUnit::Millimetre,
            ..GeometryOptions::default()
        };
        ExportSession::new(EntityStore::new(IfcSchemaVersion::Ifc4), options)
    }

    #[test]
    fn points_are_scaled() {
        let mut s = session();
        let p = s.create_point(&Point3::new(1.0, 0.5, 0.0)).unwrap();
        let e = s.factory().entity(p).unwrap();
        let coords: Vec<f64> = e.get_list(0).unwrap().iter().filter_map(|v| v.as_float()).collect();
        assert_eq!(coords, vec![1000.0, 500.0, 0.0]);
    }

    #[test]
    fn directions_are_shared() {
        let mut s = session();
        let a = s.create_direction(&Vector3::new(0.0, 0.0, 2.0)).unwrap();
        let b = s.create_direction(&Vector3::z()).unwrap();
        let c = s.create_direction_2d(&Vector2::new(0.0, 1.0)).unwrap();
        let d = s.create_direction(&Vector3::y()).unwrap();
        assert_eq!(a, b);
        assert_ne!(c, d);
        assert!(s.create_direction(&Vector3::zeros()).is_err());
    }

    #[test]
    fn placement_references_shared_directions() {
        let mut s = session();
        let placement = s.create_local_placement(None, &Plane::xy()).unwrap();
        let axis = s.factory().entity(placement).unwrap().get_ref(1).unwrap();
        let z = s.create_direction(&Vector3::z()).unwrap();
        assert_eq!(s.factory().entity(axis).unwrap().get_ref(1), Some(z));
    }
}
