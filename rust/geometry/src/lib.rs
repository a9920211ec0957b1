// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Export Geometry
//!
//! Translation of host solids and curves into IFC representation items.
//! The host kernel is consumed through [`GeometrySource`]; entities are
//! written through an [`ExportSession`] wrapping an entity factory.
//!
//! - **Curves**: lines, conics, splines and loops to trimmed curves,
//!   B-splines, polylines and indexed poly-curves
//! - **Boundaries**: outer and inner loop recovery of planar faces
//! - **Extrusions**: profile, depth and direction recovery from solids
//! - **Clipping**: half-space and opening booleans from cut faces
//! - **Representations**: contexts, shape representations, layers, styles
//!
//! [`BrepSolid`] is an in-memory kernel for headless use and tests.

pub mod boundary;
pub mod brep;
pub mod cache;
pub mod clipping;
pub mod curve;
pub mod error;
pub mod extrusion;
pub mod opening;
pub mod plane;
pub mod profile;
pub mod range;
pub mod session;
pub mod source;
pub mod tolerance;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use boundary::{get_face_boundaries, sort_edge_loops, BoundaryComplexity, FaceBoundaries, LoopNest};
pub use brep::BrepSolid;
pub use cache::{CacheMark, EntityCache, ExporterCache, UnitInfo};
pub use clipping::{plan_clipping, ClipBody, ClipEnd, ClipFace, ClipPlan};
pub use curve::{Arc, Curve, CurveKind, CurveLoop, Ellipse, Line, NurbsCurve};
pub use error::{Error, Result};
pub use extrusion::{analyze_extrusion, ExtrusionAnalysis};
pub use opening::{analyze_opening, OpeningExtrusion};
pub use plane::Plane;
pub use profile::Profile2D;
pub use range::IfcRange;
pub use session::{
    merge_degenerate_points, ExportSession, ExtrudedSolid, ExtrusionProfile, GeometryOptions, MaterialInfo,
    RepresentationKind, TessellatedBody,
};
pub use source::{FaceMesh, FaceSurface, GeometrySource, OrientedEdge};
pub use tolerance::Tolerance;
