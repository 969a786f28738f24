//! Unit and building names by Brood War unit id.
//!
//! Build and train commands carry a 16-bit unit id. Only ids a player can
//! order directly (or that show up as morph targets) are listed; anything
//! else renders as `Unit #<id>`.

/// Returns the display name of a unit id, if known.
///
/// # Example
///
/// ```
/// use bwrep_parser::units::unit_name;
///
/// assert_eq!(unit_name(106), Some("Command Center"));
/// assert_eq!(unit_name(4000), None);
/// ```
#[must_use]
pub const fn unit_name(id: u16) -> Option<&'static str> {
    let name = match id {
        // Terran units
        0 => "Marine",
        1 => "Ghost",
        2 => "Vulture",
        3 => "Goliath",
        5 => "Siege Tank",
        7 => "SCV",
        8 => "Wraith",
        9 => "Science Vessel",
        11 => "Dropship",
        12 => "Battlecruiser",
        13 => "Spider Mine",
        14 => "Nuclear Missile",
        30 => "Siege Tank (Siege Mode)",
        32 => "Firebat",
        34 => "Medic",
        58 => "Valkyrie",

        // Zerg units
        35 => "Larva",
        36 => "Egg",
        37 => "Zergling",
        38 => "Hydralisk",
        39 => "Ultralisk",
        40 => "Broodling",
        41 => "Drone",
        42 => "Overlord",
        43 => "Mutalisk",
        44 => "Guardian",
        45 => "Queen",
        46 => "Defiler",
        47 => "Scourge",
        50 => "Infested Terran",
        59 => "Mutalisk Cocoon",
        62 => "Devourer",
        103 => "Lurker",

        // Protoss units
        60 => "Corsair",
        61 => "Dark Templar",
        63 => "Dark Archon",
        64 => "Probe",
        65 => "Zealot",
        66 => "Dragoon",
        67 => "High Templar",
        68 => "Archon",
        69 => "Shuttle",
        70 => "Scout",
        71 => "Arbiter",
        72 => "Carrier",
        73 => "Interceptor",
        83 => "Reaver",
        84 => "Observer",
        85 => "Scarab",

        // Terran buildings
        106 => "Command Center",
        107 => "Comsat Station",
        108 => "Nuclear Silo",
        109 => "Supply Depot",
        110 => "Refinery",
        111 => "Barracks",
        112 => "Academy",
        113 => "Factory",
        114 => "Starport",
        115 => "Control Tower",
        116 => "Science Facility",
        117 => "Covert Ops",
        118 => "Physics Lab",
        120 => "Machine Shop",
        122 => "Engineering Bay",
        123 => "Armory",
        124 => "Missile Turret",
        125 => "Bunker",

        // Zerg buildings
        130 => "Infested Command Center",
        131 => "Hatchery",
        132 => "Lair",
        133 => "Hive",
        134 => "Nydus Canal",
        135 => "Hydralisk Den",
        136 => "Defiler Mound",
        137 => "Greater Spire",
        138 => "Queen's Nest",
        139 => "Evolution Chamber",
        140 => "Ultralisk Cavern",
        141 => "Spire",
        142 => "Spawning Pool",
        143 => "Creep Colony",
        144 => "Spore Colony",
        146 => "Sunken Colony",
        149 => "Extractor",

        // Protoss buildings
        154 => "Nexus",
        155 => "Robotics Facility",
        156 => "Pylon",
        157 => "Assimilator",
        159 => "Observatory",
        160 => "Gateway",
        162 => "Photon Cannon",
        163 => "Citadel of Adun",
        164 => "Cybernetics Core",
        165 => "Templar Archives",
        166 => "Forge",
        167 => "Stargate",
        169 => "Fleet Beacon",
        170 => "Arbiter Tribunal",
        171 => "Robotics Support Bay",
        172 => "Shield Battery",

        _ => return None,
    };
    Some(name)
}

/// Returns the display name of a unit id, or `Unit #<id>` if unknown.
#[must_use]
pub fn unit_label(id: u16) -> String {
    unit_name(id).map_or_else(|| format!("Unit #{id}"), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_names() {
        assert_eq!(unit_name(7), Some("SCV"));
        assert_eq!(unit_name(41), Some("Drone"));
        assert_eq!(unit_name(64), Some("Probe"));
    }

    #[test]
    fn test_main_buildings() {
        assert_eq!(unit_name(106), Some("Command Center"));
        assert_eq!(unit_name(131), Some("Hatchery"));
        assert_eq!(unit_name(154), Some("Nexus"));
    }

    #[test]
    fn test_unit_label_fallback() {
        assert_eq!(unit_label(142), "Spawning Pool");
        assert_eq!(unit_label(228), "Unit #228");
    }
}
