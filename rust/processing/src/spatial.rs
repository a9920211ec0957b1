// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project, owner history and spatial structure
//!
//! One project and one site per output file. Each exported document gets a
//! building and a storey under the shared site; products are contained in
//! the storey through one `IfcRelContainedInSpatialStructure`.

use crate::error::{ProcessingError, Result};
use ifc_export_core::{AttributeValue, Checkpoint, EntityFactory, EntityHandle, IfcType};
use ifc_export_geometry::{ExportSession, Plane};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Index of IfcRelContainedInSpatialStructure.RelatedElements
const RELATED_ELEMENTS: usize = 4;
/// Index of IfcProduct.ObjectPlacement
const OBJECT_PLACEMENT: usize = 5;

const APPLICATION_NAME: &str = "IFC-Export";

/// Owner history shared by every rooted entity of the session
pub fn owner_history<F: EntityFactory>(session: &mut ExportSession<F>) -> Result<EntityHandle> {
    if let Some(handle) = session.cache().owner_history {
        return Ok(handle);
    }
    let null = || AttributeValue::Null;
    let person = session.create(IfcType::IfcPerson, vec![null(), null(), null(), null(), null(), null(), null(), null()])?;
    let organization = session.create(
        IfcType::IfcOrganization,
        vec![null(), AttributeValue::string(APPLICATION_NAME), null(), null(), null()],
    )?;
    let user = session.create(
        IfcType::IfcPersonAndOrganization,
        vec![person.into(), organization.into(), null()],
    )?;
    let application = session.create(
        IfcType::IfcApplication,
        vec![
            organization.into(),
            AttributeValue::string(env!("CARGO_PKG_VERSION")),
            AttributeValue::string(APPLICATION_NAME),
            AttributeValue::string(APPLICATION_NAME),
        ],
    )?;
    let created = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let handle = session.create(
        IfcType::IfcOwnerHistory,
        vec![
            user.into(),
            application.into(),
            null(),
            AttributeValue::enumeration("ADDED"),
            null(),
            null(),
            null(),
            AttributeValue::Integer(created),
        ],
    )?;
    session.cache_mut().owner_history = Some(handle);
    Ok(handle)
}

/// Rooted entity header: GlobalId, OwnerHistory, Name, Description
pub(crate) fn rooted<F: EntityFactory>(session: &mut ExportSession<F>, name: Option<&str>) -> Vec<AttributeValue> {
    let guid = session.new_guid(None);
    vec![
        AttributeValue::string(guid),
        session.owner_history(),
        AttributeValue::opt_string(name),
        AttributeValue::Null,
    ]
}

fn aggregate<F: EntityFactory>(
    session: &mut ExportSession<F>,
    whole: EntityHandle,
    part: EntityHandle,
) -> Result<EntityHandle> {
    let mut attributes = rooted(session, None);
    attributes.push(whole.into());
    attributes.push(AttributeValue::refs(&[part]));
    Ok(session.create(IfcType::IfcRelAggregates, attributes)?)
}

/// Spatial containers of one exported document
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialStructure {
    pub project: EntityHandle,
    pub site: EntityHandle,
    pub building: EntityHandle,
    pub storey: EntityHandle,
    /// Placement products are located relative to
    pub storey_placement: EntityHandle,
    containment: Option<EntityHandle>,
}

impl SpatialStructure {
    /// Project, site, building and storey for the first document. A site
    /// preserved from an earlier document is reused.
    pub fn create<F: EntityFactory>(
        session: &mut ExportSession<F>,
        project_name: &str,
        building_name: &str,
    ) -> Result<Self> {
        owner_history(session)?;
        let project = create_project(session, project_name)?;

        let site = match session.cache().site {
            Some(site) => site,
            None => {
                let placement = session.create_local_placement(None, &Plane::xy())?;
                let mut attributes = rooted(session, Some("Default Site"));
                attributes.extend([
                    AttributeValue::Null,
                    placement.into(),
                    AttributeValue::Null,
                    AttributeValue::Null,
                    AttributeValue::enumeration("ELEMENT"),
                ]);
                attributes.extend(std::iter::repeat(AttributeValue::Null).take(5));
                let site = session.create(IfcType::IfcSite, attributes)?;
                aggregate(session, project, site)?;
                session.cache_mut().site = Some(site);
                site
            }
        };
        Self::under_site(session, project, site, building_name)
    }

    /// Containers for a linked document, sharing this structure's site
    pub fn for_linked_document<F: EntityFactory>(
        &self,
        session: &mut ExportSession<F>,
        building_name: &str,
    ) -> Result<Self> {
        Self::under_site(session, self.project, self.site, building_name)
    }

    fn under_site<F: EntityFactory>(
        session: &mut ExportSession<F>,
        project: EntityHandle,
        site: EntityHandle,
        building_name: &str,
    ) -> Result<Self> {
        let site_placement = session
            .factory()
            .entity(site)
            .and_then(|e| e.get_ref(OBJECT_PLACEMENT))
            .ok_or(ProcessingError::MissingSpatialStructure)?;

        let building_placement = session.create_local_placement(Some(site_placement), &Plane::xy())?;
        let mut attributes = rooted(session, Some(building_name));
        attributes.extend([
            AttributeValue::Null,
            building_placement.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::enumeration("ELEMENT"),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
        ]);
        let building = session.create(IfcType::IfcBuilding, attributes)?;
        aggregate(session, site, building)?;

        let storey_placement = session.create_local_placement(Some(building_placement), &Plane::xy())?;
        let mut attributes = rooted(session, Some("Level 0"));
        attributes.extend([
            AttributeValue::Null,
            storey_placement.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::enumeration("ELEMENT"),
            AttributeValue::Float(0.0),
        ]);
        let storey = session.create(IfcType::IfcBuildingStorey, attributes)?;
        aggregate(session, building, storey)?;

        debug!(%building, %storey, "created spatial structure");
        Ok(Self {
            project,
            site,
            building,
            storey,
            storey_placement,
            containment: None,
        })
    }

    /// Place `product` in the storey
    pub fn contain<F: EntityFactory>(&mut self, session: &mut ExportSession<F>, product: EntityHandle) -> Result<EntityHandle> {
        if let Some(relation) = self.containment {
            session
                .factory_mut()
                .append_to_list(relation, RELATED_ELEMENTS, vec![product.into()])?;
            return Ok(relation);
        }
        let mut attributes = rooted(session, None);
        attributes.push(AttributeValue::refs(&[product]));
        attributes.push(self.storey.into());
        let relation = session.create(IfcType::IfcRelContainedInSpatialStructure, attributes)?;
        self.containment = Some(relation);
        Ok(relation)
    }

    pub fn containment(&self) -> Option<EntityHandle> {
        self.containment
    }

    /// Drop the containment relation if it was created after `checkpoint`
    pub fn forget_after(&mut self, checkpoint: &Checkpoint) {
        if self.containment.map_or(false, |h| checkpoint.is_after(h)) {
            self.containment = None;
        }
    }
}

/// IfcProject with its contexts and unit assignment
fn create_project<F: EntityFactory>(session: &mut ExportSession<F>, name: &str) -> Result<EntityHandle> {
    let mut contexts = Vec::with_capacity(2);
    contexts.extend(session.representation_context(false)?);
    contexts.extend(session.representation_context(true)?);
    let units = session.unit_assignment()?;
    let mut attributes = rooted(session, Some(name));
    attributes.extend([
        AttributeValue::Null,
        AttributeValue::Null,
        AttributeValue::Null,
        AttributeValue::refs(&contexts),
        units.into(),
    ]);
    Ok(session.create(IfcType::IfcProject, attributes)?)
}
