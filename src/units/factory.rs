//! Builds fresh, undeployed units from templates

use crate::knowledge::Production;
use crate::units::area::AreaTroop;
use crate::units::descriptor::{SummonerDescriptor, UnitDescriptor};
use crate::units::morale::MoraleTroop;
use crate::units::resurrection::ResurrectingTroop;
use crate::units::summoner::Summoner;
use crate::units::troop::Troop;
use crate::units::unit::{Unit, UnitKind};

/// Instantiate the variant a production rule names
pub fn create_unit(production: Production, descriptor: &UnitDescriptor) -> Unit {
    match production {
        Production::Moral => create_moral_unit(descriptor),
        Production::Amoral => create_amoral_unit(descriptor),
        Production::Resurrection => create_resurrection_unit(descriptor),
        Production::Kamikaze => create_kamikaze(descriptor),
    }
}

pub fn create_moral_unit(descriptor: &UnitDescriptor) -> Unit {
    Unit::new(UnitKind::Morale(MoraleTroop::new(descriptor.clone())))
}

pub fn create_amoral_unit(descriptor: &UnitDescriptor) -> Unit {
    Unit::new(UnitKind::Plain(Troop::new(descriptor.clone())))
}

pub fn create_resurrection_unit(descriptor: &UnitDescriptor) -> Unit {
    Unit::new(UnitKind::Resurrecting(ResurrectingTroop::new(descriptor.clone())))
}

pub fn create_kamikaze(descriptor: &UnitDescriptor) -> Unit {
    Unit::new(UnitKind::Area(AreaTroop::new(Troop::new(descriptor.clone()))))
}

pub fn create_summoner(descriptor: &SummonerDescriptor) -> Unit {
    Unit::new(UnitKind::Leader(Summoner::new(descriptor.clone())))
}
