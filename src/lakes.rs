/// Lake registry for the laghi.net monitoring service.
///
/// laghi.net publishes more widgets than we care about; this is the
/// whitelist of lakes the service exposes. Configuration may only select
/// from these names.

/// Metadata for one monitored lake.
pub struct Lake {
    /// Canonical name exactly as laghi.net titles it.
    pub name: &'static str,
    /// River basin, published in the sensor attributes.
    pub basin: &'static str,
}

/// All lakes laghi.net publishes in widget 370, west to east.
pub static LAKE_REGISTRY: &[Lake] = &[
    Lake {
        name: "Lago Maggiore",
        basin: "Ticino",
    },
    Lake {
        name: "Lago di Como",
        basin: "Adda",
    },
    Lake {
        name: "Lago d'Iseo",
        basin: "Oglio",
    },
    Lake {
        name: "Lago d'Idro",
        basin: "Chiese",
    },
    Lake {
        name: "Lago di Garda",
        basin: "Mincio",
    },
];

/// Names of every whitelisted lake, in registry order.
pub fn all_lake_names() -> Vec<&'static str> {
    LAKE_REGISTRY.iter().map(|l| l.name).collect()
}

/// Looks up a lake by exact name. Returns `None` if not whitelisted.
pub fn find_lake(name: &str) -> Option<&'static Lake> {
    LAKE_REGISTRY.iter().find(|l| l.name == name)
}

pub fn is_known_lake(name: &str) -> bool {
    find_lake(name).is_some()
}
