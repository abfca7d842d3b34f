//! The bipartite mesh graph: which gears currently touch which other
//! gears, recomputed every vertical from each pinion/wheel's vertical
//! position (barrel phase 3), and torn down again before the next
//! vertical is chosen (barrel phase 13).

use super::handles::{ComponentId, Direction, MeshPartner, ALWAYS};
use super::Engine;
use crate::error::{EngineError, EngineResult};

impl Engine {
    /// Phase 3: build `meshes` on every gear from each pinion's
    /// `possible_meshes` list, filtered by current vertical position.
    /// Digit wheels never carry mesh rules of their own - a wheel's gear
    /// only ever appears as a rule's *partner*, registered from the
    /// pinion side by `Engine::define_mesh`.
    pub fn compute_meshes(&mut self) {
        for pinion_id in self.pinion_ids() {
            let (gear, vpos, rules) = {
                let p = self.pinion(pinion_id);
                (p.gear, p.vposition, p.possible_meshes.clone())
            };
            for rule in rules {
                if rule.vposition == ALWAYS || rule.vposition == vpos {
                    self.add_mesh_edge(gear, rule.partner);
                }
            }
        }
    }

    fn add_mesh_edge(&mut self, a: super::handles::GearId, b: super::handles::GearId) {
        self.gear_mut(a).meshes.push(MeshPartner::Gear(b));
        self.gear_mut(b).meshes.push(MeshPartner::Gear(a));
    }

    /// Phase 13: clear every gear's mesh list.
    pub fn remove_meshes(&mut self) {
        for gear_id in self.gear_ids() {
            self.gear_mut(gear_id).meshes.clear();
            self.gear_mut(gear_id).driving_gear = None;
        }
    }

    /// Propagate a rotation from `source` (already turning in `direction`)
    /// to every gear currently meshed with it, enqueuing each newly-driven
    /// one on the advance list turning the opposite way. Fails if a
    /// partner is already driven by a different source this time unit.
    pub fn drive_meshed_gears(
        &mut self,
        source: super::handles::GearId,
        direction: Direction,
    ) -> EngineResult<()> {
        let partners = self.gear(source).meshes.clone();
        for partner in partners {
            let MeshPartner::Gear(partner_id) = partner else {
                continue;
            };
            let already_driven = self.gear(partner_id).driving_gear;
            match already_driven {
                Some(driver) if driver != source => {
                    return Err(EngineError::MeshConflict(format!("{:?}", partner_id)));
                }
                Some(_) => continue, // already driven by this same source
                None => {
                    self.gear_mut(partner_id).driving_gear = Some(source);
                    self.gear_mut(partner_id).driven = true;
                    self.gear_mut(partner_id).direction = direction.opposite();
                    if let Some(comp) = self.component_owning_gear(partner_id) {
                        self.enqueue_component(comp, direction.opposite())?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Which component (pinion, wheel, gear) owns a given gear, used to turn
/// a mesh edge back into something the scheduler can advance.
impl Engine {
    pub(crate) fn component_owning_gear(
        &self,
        gear: super::handles::GearId,
    ) -> Option<ComponentId> {
        self.gear_owner.get(&gear).copied()
    }
}
