//! Battlefield spatial model: two sides, each split into a front and a
//! back line
//!
//! Invariant: every live unit appears in the flat roster, in its side's
//! unit list, and in exactly one area, and that area always agrees with
//! the unit's `location`. The only legal membership mutations are
//! `add_unit`, `remove_unit`, and `move_unit` (remove, flip, re-add).

use ahash::AHashMap;

use crate::battle::units::{Unit, UnitSetup};
use crate::catalog::Catalog;
use crate::core::error::Result;
use crate::core::types::{Location, Team, UnitId};

/// One line (front or back) of a side
#[derive(Debug, Clone)]
pub struct Area {
    team: Team,
    location: Location,
    units: Vec<UnitId>,
}

impl Area {
    fn new(team: Team, location: Location) -> Self {
        Self {
            team,
            location,
            units: Vec::new(),
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn add(&mut self, id: UnitId) {
        self.units.push(id);
    }

    fn remove(&mut self, id: UnitId) {
        if let Some(pos) = self.units.iter().position(|u| *u == id) {
            self.units.remove(pos);
        } else {
            tracing::warn!("Removing unit {:?} from area it is not in", id);
        }
    }
}

/// A whole team's section of the battlefield: its front and back lines,
/// plus live and dead unit lists
#[derive(Debug, Clone)]
pub struct Side {
    team: Team,
    front: Area,
    back: Area,
    units: Vec<UnitId>,
    dead: Vec<UnitId>,
}

impl Side {
    fn new(team: Team) -> Self {
        Self {
            team,
            front: Area::new(team, Location::Front),
            back: Area::new(team, Location::Back),
            units: Vec::new(),
            dead: Vec::new(),
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn front(&self) -> &Area {
        &self.front
    }

    pub fn back(&self) -> &Area {
        &self.back
    }

    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn dead(&self) -> &[UnitId] {
        &self.dead
    }

    fn add_unit(&mut self, id: UnitId, location: Location) {
        self.units.push(id);
        match location {
            Location::Front => self.front.add(id),
            Location::Back => self.back.add(id),
            Location::None => {
                tracing::warn!("Adding unit {:?} to side but unknown location", id);
            }
        }
    }

    fn remove_unit(&mut self, id: UnitId, location: Location) {
        if let Some(pos) = self.units.iter().position(|u| *u == id) {
            self.units.remove(pos);
        }
        match location {
            Location::Front => self.front.remove(id),
            Location::Back => self.back.remove(id),
            Location::None => {
                tracing::warn!("Removing unit {:?} from side but unknown location", id);
            }
        }
    }

    fn add_to_dead_list(&mut self, id: UnitId) {
        self.dead.push(id);
    }

    /// The closest occupied line to the enemy; falls back to the front
    /// area when the side is empty
    pub fn frontmost_line(&self) -> &Area {
        if !self.front.is_empty() {
            &self.front
        } else if !self.back.is_empty() {
            &self.back
        } else {
            &self.front
        }
    }

    /// The farthest occupied line from the enemy; falls back to the back
    /// area when the side is empty
    pub fn backmost_line(&self) -> &Area {
        if !self.back.is_empty() {
            &self.back
        } else if !self.front.is_empty() {
            &self.front
        } else {
            &self.back
        }
    }

    pub fn unit_count_in_line(&self, location: Location) -> usize {
        match location {
            Location::Front => self.front.units.len(),
            Location::Back => self.back.units.len(),
            Location::None => 0,
        }
    }
}

/// All units in the encounter, live and dead, with their container
/// bookkeeping
#[derive(Debug, Clone)]
pub struct Battlefield {
    units: AHashMap<UnitId, Unit>,
    /// Live units in spawn order; target-index resolution indexes into this
    roster: Vec<UnitId>,
    blue: Side,
    red: Side,
    dead: Vec<UnitId>,
}

impl Battlefield {
    pub(crate) fn new(catalog: &Catalog, setups: &[UnitSetup]) -> Result<Battlefield> {
        let mut field = Battlefield {
            units: AHashMap::new(),
            roster: Vec::new(),
            blue: Side::new(Team::Blue),
            red: Side::new(Team::Red),
            dead: Vec::new(),
        };
        for (i, setup) in setups.iter().enumerate() {
            let unit = Unit::new(catalog, UnitId(i as u32), setup)?;
            field.add_unit(unit);
        }
        Ok(field)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Live units in spawn order
    pub fn live_units(&self) -> &[UnitId] {
        &self.roster
    }

    pub fn dead_units(&self) -> &[UnitId] {
        &self.dead
    }

    pub fn live_count(&self, team: Team) -> usize {
        match team {
            Team::Blue => self.blue.units.len(),
            Team::Red => self.red.units.len(),
            Team::None => self.roster.len(),
        }
    }

    /// Position in the live roster, or `None` when out of range
    pub fn unit_by_index(&self, unit_index: usize) -> Option<UnitId> {
        self.roster.get(unit_index).copied()
    }

    /// Case-insensitive label lookup over live units
    pub fn unit_by_label(&self, label: &str) -> Option<UnitId> {
        self.roster
            .iter()
            .copied()
            .find(|id| match self.units.get(id) {
                Some(unit) => unit.label.eq_ignore_ascii_case(label),
                None => false,
            })
    }

    pub fn side(&self, team: Team) -> Option<&Side> {
        match team {
            Team::Blue => Some(&self.blue),
            Team::Red => Some(&self.red),
            Team::None => None,
        }
    }

    pub fn area(&self, team: Team, location: Location) -> Option<&Area> {
        let side = self.side(team)?;
        match location {
            Location::Front => Some(side.front()),
            Location::Back => Some(side.back()),
            Location::None => None,
        }
    }

    pub fn frontmost_line(&self, team: Team) -> Option<&Area> {
        self.side(team).map(Side::frontmost_line)
    }

    pub fn backmost_line(&self, team: Team) -> Option<&Area> {
        self.side(team).map(Side::backmost_line)
    }

    pub fn unit_count_in_line(&self, team: Team, location: Location) -> usize {
        self.side(team)
            .map(|side| side.unit_count_in_line(location))
            .unwrap_or(0)
    }

    /// All units ever spawned for a team, live first then dead; `Team::None`
    /// covers the whole battlefield
    pub fn all_units(&self, team: Team) -> Vec<UnitId> {
        match self.side(team) {
            Some(side) => {
                let mut ids = side.units.clone();
                ids.extend_from_slice(&side.dead);
                ids
            }
            None => {
                let mut ids = self.roster.clone();
                ids.extend_from_slice(&self.dead);
                ids
            }
        }
    }

    pub(crate) fn add_unit(&mut self, unit: Unit) {
        let id = unit.id;
        self.units.insert(id, unit);
        self.attach(id);
    }

    /// Remove a unit from all live membership lists; the unit itself stays
    /// in storage so dead units remain queryable
    pub(crate) fn remove_unit(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(&id) else {
            tracing::warn!("Removing unknown unit {:?} from battlefield", id);
            return;
        };
        let (team, location) = (unit.team, unit.location);
        if let Some(pos) = self.roster.iter().position(|u| *u == id) {
            self.roster.remove(pos);
        }
        match team {
            Team::Blue => self.blue.remove_unit(id, location),
            Team::Red => self.red.remove_unit(id, location),
            Team::None => {
                tracing::warn!("Removing unit {:?} from battlefield but unknown team", id);
            }
        }
    }

    /// Swap a unit between the front and back line of its own side
    pub(crate) fn move_unit(&mut self, id: UnitId) {
        if self.units.get(&id).is_none() {
            tracing::warn!("Moving unknown unit {:?}", id);
            return;
        }
        self.remove_unit(id);
        if let Some(unit) = self.units.get_mut(&id) {
            unit.location = unit.location.flipped();
        }
        self.attach(id);
    }

    pub(crate) fn add_to_dead_list(&mut self, id: UnitId) {
        self.dead.push(id);
        let team = self.units.get(&id).map(|unit| unit.team);
        match team {
            Some(Team::Blue) => self.blue.add_to_dead_list(id),
            Some(Team::Red) => self.red.add_to_dead_list(id),
            _ => {
                tracing::warn!("Adding unit {:?} to dead list but unknown team", id);
            }
        }
    }

    fn attach(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(&id) else {
            return;
        };
        let (team, location) = (unit.team, unit.location);
        self.roster.push(id);
        match team {
            Team::Blue => self.blue.add_unit(id, location),
            Team::Red => self.red.add_unit(id, location),
            Team::None => {
                tracing::warn!("Adding unit {:?} to battlefield but unknown team", id);
            }
        }
    }

    fn labels_in(&self, team: Team, location: Location) -> String {
        let labels: Vec<&str> = self
            .roster
            .iter()
            .filter_map(|id| self.units.get(id))
            .filter(|unit| unit.team == team && unit.location == location)
            .map(|unit| unit.label.as_str())
            .collect();
        labels.join(" ")
    }

    /// Textual battlefield layout: red side on top, blue side below
    pub fn format_map(&self) -> String {
        format!(
            "Back:\t{}\nFront:\t{}\n\nFront:\t{}\nBack:\t{}\n",
            self.labels_in(Team::Red, Location::Back),
            self.labels_in(Team::Red, Location::Front),
            self.labels_in(Team::Blue, Location::Front),
            self.labels_in(Team::Blue, Location::Back),
        )
    }

    /// One details block per live unit
    pub fn format_units(&self) -> String {
        let mut ret = String::new();
        for id in &self.roster {
            if let Some(unit) = self.units.get(id) {
                ret.push_str(&unit.details());
                ret.push('\n');
            }
        }
        ret
    }
}
