//! Conserved mitochondrial marker genes and their reference lengths (bp).

use super::v1::Taxon;

const PLANT_MARKERS: &[(&str, u64)] = &[
    ("nad1", 950),
    ("nad2", 1467),
    ("nad3", 357),
    ("nad4", 1488),
    ("nad5", 2010),
    ("nad6", 618),
    ("nad7", 1185),
    ("nad9", 573),
    ("nad4L", 303),
    ("cob", 1182),
    ("cox1", 1584),
    ("cox2", 783),
    ("cox3", 798),
    ("atp1", 1524),
    ("atp4", 594),
    ("atp6", 768),
    ("atp8", 470),
    ("atp9", 225),
    ("ccmB", 621),
    ("ccmC", 720),
    ("ccmFc", 1320),
    ("ccmFn", 1785),
    ("mttB", 816),
    ("matR", 2000),
];

const FUNGI_MARKERS: &[(&str, u64)] = &[
    ("atp6", 770),
    ("atp8", 150),
    ("atp9", 225),
    ("cob", 1150),
    ("cox1", 1520),
    ("cox2", 750),
    ("cox3", 810),
    ("nad1", 1030),
    ("nad2", 1600),
    ("nad3", 430),
    ("nad4", 880),
    ("nad4L", 290),
    ("nad5", 1950),
    ("nad6", 630),
];

const ANIMAL_MARKERS: &[(&str, u64)] = &[
    ("atp6", 650),
    ("atp8", 165),
    ("CytB", 1100),
    ("cox1", 1500),
    ("cox2", 1520),
    ("cox3", 680),
    ("nad1", 900),
    ("nad2", 1000),
    ("nad3", 350),
    ("nad4", 1350),
    ("nad4L", 290),
    ("nad5", 1800),
    ("nad6", 510),
];

/// Marker table for a taxon.
pub fn markers(taxon: Taxon) -> &'static [(&'static str, u64)] {
    match taxon {
        Taxon::Plant => PLANT_MARKERS,
        Taxon::Fungi => FUNGI_MARKERS,
        Taxon::Animal => ANIMAL_MARKERS,
    }
}

/// Reference length of a marker gene, or `None` if it is not a marker for the taxon.
pub fn marker_length(taxon: Taxon, gene: &str) -> Option<u64> {
    markers(taxon)
        .iter()
        .find(|(name, _)| *name == gene)
        .map(|&(_, len)| len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(markers(Taxon::Plant).len(), 24);
        assert_eq!(markers(Taxon::Fungi).len(), 14);
        assert_eq!(markers(Taxon::Animal).len(), 13);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(marker_length(Taxon::Plant, "nad4L"), Some(303));
        assert_eq!(marker_length(Taxon::Animal, "CytB"), Some(1100));
        assert_eq!(marker_length(Taxon::Animal, "cob"), None);
        assert_eq!(marker_length(Taxon::Plant, "nad4l"), None);
    }
}
