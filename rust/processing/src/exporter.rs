// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-element export driver
//!
//! Every element is written inside its own transaction. A failing element
//! is rolled back (entities, cache entries and GUIDs) and recorded in the
//! report; only fatal errors stop the export. Railings are written after
//! the ordinary elements of a document, groups after all elements.

use crate::config::ExportOptions;
use crate::element::{Document, ElementCategory, ExportElement, GroupDescriptor};
use crate::error::{ProcessingError, Result};
use crate::properties::export_property_sets;
use crate::report::ExportReport;
use crate::spatial::{rooted, SpatialStructure};
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, EntityStore, IfcSchemaVersion, IfcType};
use ifc_export_geometry::{CacheMark, ClipBody, ExportSession, GeometrySource, Plane, RepresentationKind};
use rustc_hash::FxHashSet;
use tracing::{debug, error, info, warn};

/// Body item of one element and how it was obtained
#[derive(Debug, Clone, Copy)]
struct Body {
    item: EntityHandle,
    kind: RepresentationKind,
    /// Written from the tessellation instead of a swept solid
    degraded: bool,
}

enum SweptBody {
    Written(Body),
    /// Clipping removed the whole body
    Removed,
    NotExtrusion,
}

/// Drives one export session over one or more documents
#[derive(Debug)]
pub struct Exporter<F: EntityFactory = EntityStore> {
    session: ExportSession<F>,
    options: ExportOptions,
    spatial: Option<SpatialStructure>,
    report: ExportReport,
}

impl<F: EntityFactory> Exporter<F> {
    pub fn new(factory: F, options: ExportOptions) -> Result<Self> {
        options.validate()?;
        if factory.schema() != options.schema {
            return Err(ProcessingError::Config(format!(
                "factory writes {} but options ask for {}",
                factory.schema(),
                options.schema
            )));
        }
        let session = ExportSession::new(factory, options.geometry_options());
        Ok(Self {
            session,
            options,
            spatial: None,
            report: ExportReport::default(),
        })
    }

    pub fn session(&self) -> &ExportSession<F> {
        &self.session
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn report(&self) -> &ExportReport {
        &self.report
    }

    /// Containers of the document exported last
    pub fn spatial(&self) -> Option<&SpatialStructure> {
        self.spatial.as_ref()
    }

    /// Export one document.
    ///
    /// The first document creates the project and site. Later documents are
    /// linked documents: per-document caches are reset and a new building
    /// is placed under the same site, or the document is skipped when
    /// linked documents are disabled.
    pub fn export_document<S: GeometrySource>(&mut self, document: &Document<S>) -> Result<()> {
        let spatial = match &self.spatial {
            None => SpatialStructure::create(&mut self.session, &self.options.project_name, &document.name)?,
            Some(_) if !self.options.export_linked_documents => {
                info!(document = %document.name, "linked document export disabled");
                return Ok(());
            }
            Some(current) => {
                self.session.clear_for_linked_document();
                current.for_linked_document(&mut self.session, &document.name)?
            }
        };
        self.spatial = Some(spatial);

        info!(
            document = %document.name,
            elements = document.elements.len(),
            groups = document.groups.len(),
            "exporting document"
        );
        let mut seen = FxHashSet::default();
        for element in document.export_order() {
            if !seen.insert(element.id.as_str()) {
                warn!(element = %element.id, "duplicate element id");
                self.report.record_failure(&element.id, "duplicate element id");
                continue;
            }
            self.export_element(element)?;
        }
        for group in &document.groups {
            self.export_group(group)?;
        }
        self.report.documents += 1;
        Ok(())
    }

    /// Export one element inside its own transaction. Returns the product,
    /// or `None` when the element was skipped or failed.
    pub fn export_element<S: GeometrySource>(&mut self, element: &ExportElement<S>) -> Result<Option<EntityHandle>> {
        let mark = self.session.begin_transaction();
        match self.write_element(element) {
            Ok(Some((product, degraded))) => {
                self.session.commit(&mark);
                self.report.exported += 1;
                if degraded {
                    self.report.degraded += 1;
                }
                debug!(element = %element.id, %product, degraded, "exported element");
                Ok(Some(product))
            }
            Ok(None) => {
                self.discard(&mark);
                self.report.skipped += 1;
                debug!(element = %element.id, "nothing to export");
                Ok(None)
            }
            Err(e) => {
                let discarded = self.discard(&mark);
                if e.is_fatal() {
                    error!(element = %element.id, error = %e, "export aborted");
                    return Err(e);
                }
                warn!(element = %element.id, error = %e, discarded, "element export failed");
                self.report.record_failure(&element.id, e.to_string());
                Ok(None)
            }
        }
    }

    /// Export a group of already exported elements
    pub fn export_group(&mut self, group: &GroupDescriptor) -> Result<Option<EntityHandle>> {
        let mark = self.session.begin_transaction();
        match self.write_group(group) {
            Ok(Some(handle)) => {
                self.session.commit(&mark);
                self.report.groups += 1;
                Ok(Some(handle))
            }
            Ok(None) => {
                self.discard(&mark);
                self.report.skipped += 1;
                debug!(group = %group.id, "group has no exported members");
                Ok(None)
            }
            Err(e) => {
                self.discard(&mark);
                if e.is_fatal() {
                    return Err(e);
                }
                warn!(group = %group.id, error = %e, "group export failed");
                self.report.record_failure(&group.id, e.to_string());
                Ok(None)
            }
        }
    }

    /// End the session: the factory holding every entity, and the report
    pub fn finish(self) -> (F, ExportReport) {
        info!(
            exported = self.report.exported,
            skipped = self.report.skipped,
            degraded = self.report.degraded,
            failed = self.report.failed(),
            entities = self.session.factory().len(),
            "export finished"
        );
        (self.session.finish(), self.report)
    }

    fn discard(&mut self, mark: &CacheMark) -> usize {
        let discarded = self.session.rollback(mark);
        if let Some(spatial) = &mut self.spatial {
            spatial.forget_after(&mark.checkpoint);
        }
        discarded
    }

    fn write_element<S: GeometrySource>(&mut self, element: &ExportElement<S>) -> Result<Option<(EntityHandle, bool)>> {
        let Some(body) = self.create_body(element)? else {
            return Ok(None);
        };
        let session = &mut self.session;
        let spatial = self.spatial.as_mut().ok_or(ProcessingError::MissingSpatialStructure)?;

        if let Some(material) = &element.material {
            session.style_item(body.item, material)?;
        }
        let body_representation = session
            .create_shape_representation(body.kind, &[body.item])?
            .ok_or_else(|| ProcessingError::NoRepresentation(element.id.clone()))?;
        let mut representations = vec![body_representation];
        representations.extend(session.create_bounding_box_representation(&element.solid)?);
        let shape = session.create_product_definition_shape(&representations)?;
        if let Some(layer) = &element.layer {
            session.assign_layer(layer, &[body_representation])?;
        }

        let placement = session.create_local_placement(Some(spatial.storey_placement), &Plane::xy())?;
        let product = create_product(session, element, placement, shape)?;
        session.cache_mut().elements.register(element.id.clone(), product);

        if let Some(material) = &element.material {
            let handle = session.material(material)?;
            session.associate_material(handle, product)?;
        }
        export_property_sets(session, &element.property_sets, product)?;
        spatial.contain(session, product)?;
        Ok(Some((product, body.degraded)))
    }

    /// Swept body when the solid is an extrusion, otherwise the tessellated
    /// fallback. `None` when clipping removes the whole body. The fallback
    /// tessellates the unclipped solid, so elements with clip faces fail
    /// instead.
    fn create_body<S: GeometrySource>(&mut self, element: &ExportElement<S>) -> Result<Option<Body>> {
        let mark = self.session.begin_transaction();
        match self.create_swept_body(element) {
            Ok(SweptBody::Written(body)) => return Ok(Some(body)),
            Ok(SweptBody::Removed) => return Ok(None),
            Ok(SweptBody::NotExtrusion) => {}
            Err(ProcessingError::Geometry(e)) if e.is_soft() => {
                self.session.rollback(&mark);
                debug!(element = %element.id, error = %e, "swept body not possible");
            }
            Err(e) => return Err(e),
        }
        if !element.clip_faces.is_empty() {
            return Err(ProcessingError::ClippingNotRepresentable(element.id.clone()));
        }

        if !self.options.tessellation_fallback {
            return Err(ProcessingError::NoRepresentation(element.id.clone()));
        }
        let tessellated = self
            .session
            .create_tessellated_body(&element.solid)?
            .ok_or_else(|| ProcessingError::NoRepresentation(element.id.clone()))?;
        debug!(element = %element.id, triangles = tessellated.triangles, "tessellated fallback");
        Ok(Some(Body {
            item: tessellated.item,
            kind: tessellated.kind,
            degraded: true,
        }))
    }

    fn create_swept_body<S: GeometrySource>(&mut self, element: &ExportElement<S>) -> Result<SweptBody> {
        let session = &mut self.session;
        let Some(extruded) = session.create_extrusion_from_solid(&element.solid, &element.base_plane, &element.origin)?
        else {
            return Ok(SweptBody::NotExtrusion);
        };
        let mut body = Body {
            item: extruded.solid,
            kind: RepresentationKind::SweptSolid,
            degraded: false,
        };

        if !element.clip_faces.is_empty() {
            let clip_body = ClipBody::from_extrusion(&extruded.profile.analysis);
            match session.create_clipping_from_planar_faces(body.item, &clip_body, &element.clip_faces)? {
                Some(item) if item != body.item => {
                    body.item = item;
                    body.kind = RepresentationKind::Clipping;
                }
                Some(_) => {}
                None => return Ok(SweptBody::Removed),
            }
        }
        for faces in &element.openings {
            body.item = session.create_opening_from_faces(body.item, &element.solid, faces)?;
            body.kind = RepresentationKind::Csg;
        }
        Ok(SweptBody::Written(body))
    }

    fn write_group(&mut self, group: &GroupDescriptor) -> Result<Option<EntityHandle>> {
        let session = &mut self.session;
        let members: Vec<EntityHandle> = group
            .members
            .iter()
            .filter_map(|id| session.cache().elements.handle_of(id))
            .collect();
        if members.is_empty() {
            return Ok(None);
        }

        let mut attributes = rooted(session, Some(group.name.as_str()));
        attributes.push(AttributeValue::Null);
        let handle = session.create(IfcType::IfcGroup, attributes)?;

        let mut attributes = rooted(session, None);
        attributes.push(AttributeValue::refs(&members));
        attributes.push(AttributeValue::Null);
        attributes.push(handle.into());
        session.create(IfcType::IfcRelAssignsToGroup, attributes)?;

        // Nested groups find their members through the registry
        session.cache_mut().elements.register(group.id.clone(), handle);
        debug!(group = %group.id, members = members.len(), "exported group");
        Ok(Some(handle))
    }
}

fn create_product<F: EntityFactory, S: GeometrySource>(
    session: &mut ExportSession<F>,
    element: &ExportElement<S>,
    placement: EntityHandle,
    shape: EntityHandle,
) -> Result<EntityHandle> {
    let guid = session.new_guid(element.guid.as_deref());
    let schema = session.schema();
    let mut attributes = vec![
        AttributeValue::string(guid),
        session.owner_history(),
        AttributeValue::opt_string(element.name.as_deref()),
        AttributeValue::Null,
        AttributeValue::Null,
        placement.into(),
        shape.into(),
        AttributeValue::string(&element.id),
    ];
    for _ in 0..element.category.trailing_attributes(schema) {
        // IfcRoof.ShapeType is mandatory in IFC2x3
        if element.category == ElementCategory::Roof && schema == IfcSchemaVersion::Ifc2x3 {
            attributes.push(AttributeValue::enumeration("NOTDEFINED"));
        } else {
            attributes.push(AttributeValue::Null);
        }
    }
    Ok(session.create(element.category.ifc_type(), attributes)?)
}
